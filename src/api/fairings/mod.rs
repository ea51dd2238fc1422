pub mod guards;
pub mod utils;

use jsonwebtoken::{Algorithm, Validation};
use std::sync::LazyLock;

pub static VALIDATION: LazyLock<Validation> = LazyLock::new(|| Validation::new(Algorithm::HS256));
