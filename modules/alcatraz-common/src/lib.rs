pub mod config;
pub mod fixtures;
pub mod types;

pub use config::Config;
pub use fixtures::*;
pub use types::*;
