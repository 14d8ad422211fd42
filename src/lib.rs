pub use error::{ComposeError, Result};

pub mod cli;
pub mod compose;
pub mod config;
pub mod error;
pub mod generators;
pub mod netlist;
pub mod params;
pub mod paths;
pub mod template;

/// Template libraries shipped with the crate.
pub const TEMPLATES_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/templates");
/// Example run configurations.
pub const CONFIGS_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/configs");
