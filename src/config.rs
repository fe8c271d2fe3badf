use crate::error::{FixtureError, IoContext, Result};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

/// Read a YAML configuration file into `T`
pub fn load_yaml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading yaml {}", path.display()))?;
    serde_yaml::from_str(&content).map_err(|e| FixtureError::Config {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
