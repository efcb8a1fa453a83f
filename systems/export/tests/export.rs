use std::{fs, path::PathBuf, process};

use tier_scaling_core::ScalingConfig;
use tier_scaling_system_export::{ExportError, ExportToggles, SpawnConfigDocument};

const DEFAULT_DOCUMENT: &str = r#"{
  "doSpeciesBlocking": true,
  "blockUnknownSpecies": true,
  "doLevelScaling": true,
  "tierCapScaling": 0.25,
  "minLevelScaling": 0.45,
  "avgLevelScaling": 0.75,
  "maxLevelScaling": 1.1,
  "doWeightScaling": true,
  "weightDecayPerTier": 0.2,
  "weightMinFactor": 0.15,
  "weightCurrentTierBuff": 2.0
}"#;

fn scratch_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("tier-scaling-{}-{name}", process::id()))
}

#[test]
fn default_document_matches_mod_layout() {
    let document =
        SpawnConfigDocument::from_config(&ScalingConfig::default(), ExportToggles::default());

    let json = document.to_json_pretty().expect("document renders");
    assert_eq!(json, DEFAULT_DOCUMENT);
}

#[test]
fn disabled_toggles_are_written_as_false() {
    let toggles = ExportToggles {
        species_blocking: false,
        weight_scaling: false,
        ..ExportToggles::default()
    };
    let document = SpawnConfigDocument::from_config(&ScalingConfig::default(), toggles);

    let value: serde_json::Value =
        serde_json::from_str(&document.to_json_pretty().expect("document renders"))
            .expect("rendered json parses");
    assert_eq!(value["doSpeciesBlocking"], false);
    assert_eq!(value["doWeightScaling"], false);
    assert_eq!(value["doLevelScaling"], true);
}

#[test]
fn written_document_reads_back() {
    let path = scratch_path("written.json");
    let config = ScalingConfig {
        weight_decay_per_tier: 0.35,
        ..ScalingConfig::default()
    };
    let document = SpawnConfigDocument::from_config(&config, ExportToggles::default());

    document.write_to(&path).expect("document writes");
    let contents = fs::read_to_string(&path).expect("document exists");
    fs::remove_file(&path).expect("cleanup");

    let restored: SpawnConfigDocument =
        serde_json::from_str(&contents).expect("document parses");
    assert_eq!(restored, document);
}

#[test]
fn write_failure_names_destination() {
    let path = scratch_path("missing-dir").join("ucp-spawn.json");
    let document =
        SpawnConfigDocument::from_config(&ScalingConfig::default(), ExportToggles::default());

    let error = document
        .write_to(&path)
        .expect_err("parent directory does not exist");
    assert!(matches!(error, ExportError::Write { .. }));
    assert!(error.to_string().contains("ucp-spawn.json"));
}
