pub mod artifacts;
pub mod config;
pub mod constants;
pub mod contracts;
pub mod utils;
