pub mod store;

pub use store::{Appended, RecordStore};
