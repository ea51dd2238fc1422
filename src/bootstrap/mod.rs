pub mod logger;

pub use logger::initialize_logger;
