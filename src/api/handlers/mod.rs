pub mod auth;
pub mod intake;
pub mod pages;
pub mod records;
