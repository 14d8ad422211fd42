use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::netlist::MasterId;
use crate::params::Params;
use crate::Result;

/// A top-level composition run: the cell to design and its parameters.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    pub cell: MasterId,
    #[serde(default)]
    pub params: Params,
}

/// Reads a run file. `.json` files are parsed as JSON, anything else as TOML.
pub fn parse_run_config(path: impl AsRef<Path>) -> Result<RunConfig> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let data = match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => serde_json::from_str(&contents)?,
        _ => toml::from_str(&contents)?,
    };
    Ok(data)
}
