use std::sync::LazyLock;
use std::thread::available_parallelism;

use tokio::runtime::{Builder, Runtime};

pub static CURRENT_NUM_THREADS: LazyLock<usize> =
    LazyLock::new(|| available_parallelism().map(usize::from).unwrap_or(1));

// Serves the registration form and admin routes. Table rewrites, sticker
// rendering and SMTP sends run on this runtime's blocking pool.
pub static ROCKET_RUNTIME: LazyLock<Runtime> = LazyLock::new(|| {
    Builder::new_multi_thread()
        .worker_threads(*CURRENT_NUM_THREADS)
        .thread_name("sticker-web-worker")
        .enable_all()
        .build()
        .expect("Failed to build web runtime")
});
