use std::{fs, path::Path};

use anyhow::{Context, Result};
use tier_scaling_core::ScalingConfig;

/// Reads a scaling configuration from a TOML file.
pub(crate) fn load(path: &Path) -> Result<ScalingConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read scaling config at {}", path.display()))?;
    parse(&contents)
        .with_context(|| format!("failed to load scaling config from {}", path.display()))
}

fn parse(contents: &str) -> Result<ScalingConfig> {
    toml::from_str(contents).context("failed to parse scaling config toml contents")
}
