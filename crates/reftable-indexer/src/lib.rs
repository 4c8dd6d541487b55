//! Vault scanning and link extraction

pub mod config;
pub mod extractor;
pub mod markdown;
pub mod canvas;
pub mod resolve;
pub mod scanner;


#[cfg(test)]
pub mod test_utils;

pub use config::{load_config, ProjectConfig, VaultConfig, CONFIG_FILE};
pub use extractor::{get_extractor, LinkExtractor};
pub use resolve::Resolver;
pub use scanner::scan_vault;
