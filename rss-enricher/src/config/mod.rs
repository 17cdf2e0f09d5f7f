//! Configuration and dependency wiring for the enrichment service.

mod dependencies;
mod settings;

pub use dependencies::Dependencies;
pub use settings::{load_env_file, EnvFile, Settings};
