#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Derives the spawn configuration document consumed by the progression mod.
//!
//! The document carries the scaling coefficients of a [`ScalingConfig`]
//! alongside the feature toggles the mod reads. Tier caps are not part of the
//! document; the mod configures them separately.

use std::{fs, io, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tier_scaling_core::ScalingConfig;
use tracing::debug;

/// File name the document is conventionally saved under.
pub const DEFAULT_FILE_NAME: &str = "ucp-spawn.json";

/// Feature switches written into the exported document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExportToggles {
    /// Whether species blocking is enabled.
    pub species_blocking: bool,
    /// Whether species missing from any tier are blocked.
    pub block_unknown_species: bool,
    /// Whether level scaling is enabled.
    pub level_scaling: bool,
    /// Whether spawn-weight scaling is enabled.
    pub weight_scaling: bool,
}

impl Default for ExportToggles {
    fn default() -> Self {
        Self {
            species_blocking: true,
            block_unknown_species: true,
            level_scaling: true,
            weight_scaling: true,
        }
    }
}

/// Spawn configuration document in the mod's on-disk layout.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpawnConfigDocument {
    /// Whether species blocking is enabled.
    pub do_species_blocking: bool,
    /// Whether species missing from any tier are blocked.
    pub block_unknown_species: bool,
    /// Whether level scaling is enabled.
    pub do_level_scaling: bool,
    /// Fraction of the cap gap granted to tiers below the trainer.
    pub tier_cap_scaling: f64,
    /// Ratio deriving the minimum level.
    pub min_level_scaling: f64,
    /// Ratio deriving the most likely level.
    pub avg_level_scaling: f64,
    /// Ratio deriving the maximum level.
    pub max_level_scaling: f64,
    /// Whether spawn-weight scaling is enabled.
    pub do_weight_scaling: bool,
    /// Weight decay per tier below the trainer.
    pub weight_decay_per_tier: f64,
    /// Floor of the weight multiplier.
    pub weight_min_factor: f64,
    /// Weight multiplier of the trainer's own tier.
    pub weight_current_tier_buff: f64,
}

impl SpawnConfigDocument {
    /// Builds the document from a scaling configuration.
    #[must_use]
    pub fn from_config(config: &ScalingConfig, toggles: ExportToggles) -> Self {
        Self {
            do_species_blocking: toggles.species_blocking,
            block_unknown_species: toggles.block_unknown_species,
            do_level_scaling: toggles.level_scaling,
            tier_cap_scaling: config.tier_cap_scaling,
            min_level_scaling: config.min_level_scaling,
            avg_level_scaling: config.avg_level_scaling,
            max_level_scaling: config.max_level_scaling,
            do_weight_scaling: toggles.weight_scaling,
            weight_decay_per_tier: config.weight_decay_per_tier,
            weight_min_factor: config.weight_min_factor,
            weight_current_tier_buff: config.weight_current_tier_buff,
        }
    }

    /// Renders the document as JSON indented by two spaces.
    pub fn to_json_pretty(&self) -> Result<String, ExportError> {
        serde_json::to_string_pretty(self).map_err(ExportError::Serialize)
    }

    /// Writes the rendered document to `path`, replacing any existing file.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<(), ExportError> {
        let path = path.as_ref();
        let json = self.to_json_pretty()?;
        fs::write(path, json).map_err(|source| ExportError::Write {
            path: path.display().to_string(),
            source,
        })?;
        debug!(path = %path.display(), "wrote spawn configuration");
        Ok(())
    }
}

/// Errors raised while exporting the spawn configuration.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The document could not be rendered as JSON.
    #[error("could not serialise spawn configuration: {0}")]
    Serialize(#[source] serde_json::Error),
    /// The rendered document could not be written.
    #[error("could not write spawn configuration to {path}: {source}")]
    Write {
        /// Destination that failed.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggles_default_to_enabled() {
        let toggles = ExportToggles::default();

        assert!(toggles.species_blocking);
        assert!(toggles.block_unknown_species);
        assert!(toggles.level_scaling);
        assert!(toggles.weight_scaling);
    }

    #[test]
    fn document_copies_coefficients() {
        let config = ScalingConfig {
            tier_cap_scaling: 0.4,
            weight_min_factor: 0.3,
            ..ScalingConfig::default()
        };
        let document = SpawnConfigDocument::from_config(&config, ExportToggles::default());

        assert_eq!(document.tier_cap_scaling, 0.4);
        assert_eq!(document.weight_min_factor, 0.3);
        assert_eq!(document.max_level_scaling, 1.1);
    }
}
