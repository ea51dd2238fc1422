use anyhow::Result;
use log::{error, info};

use qrsticker::bootstrap::initialize_logger;
use qrsticker::build_rocket;
use qrsticker::common::ROCKET_RUNTIME;
use qrsticker::config::AppConfig;

fn main() -> Result<()> {
    initialize_logger();
    let config = AppConfig::from_env()?;

    ROCKET_RUNTIME.block_on(async {
        let rocket_instance = build_rocket(config)?.ignite().await?;
        info!("Sticker registry ready");
        if let Err(e) = rocket_instance.launch().await {
            error!("Rocket server failed: {}", e);
            return Err(anyhow::Error::from(e));
        }
        Ok::<(), anyhow::Error>(())
    })
}
