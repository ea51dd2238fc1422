pub mod registration;

pub use registration::{FIELD_NAMES, Registration};
