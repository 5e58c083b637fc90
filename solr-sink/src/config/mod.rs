//! Configuration and dependency wiring for the sink process.

mod dependencies;
mod settings;

pub use dependencies::Dependencies;
pub use settings::AppConfig;
