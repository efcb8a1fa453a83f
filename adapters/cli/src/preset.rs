use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tier_scaling_core::{ScalingConfig, Tier};

const PRESET_DOMAIN: &str = "ucp";
const PRESET_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded preset payload.
pub(crate) const PRESET_HEADER: &str = "ucp:v1";
/// Delimiter used to separate the prefix, tier count and payload.
const FIELD_DELIMITER: char = ':';

/// Scaling configuration and trainer tier captured for sharing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct PresetSnapshot {
    /// Trainer tier the preset was viewed from.
    pub(crate) trainer_tier: Tier,
    /// Complete scaling configuration.
    pub(crate) config: ScalingConfig,
}

impl PresetSnapshot {
    /// Encodes the preset into a single-line string suitable for clipboard transfer.
    pub(crate) fn encode(&self) -> Result<String, PresetTransferError> {
        let json = serde_json::to_vec(self).map_err(PresetTransferError::Serialize)?;
        let encoded = STANDARD_NO_PAD.encode(json);
        Ok(format!(
            "{PRESET_HEADER}:{}:{encoded}",
            self.config.tier_count()
        ))
    }

    /// Decodes a preset from the provided string representation.
    ///
    /// The string must hold exactly four segments; the tier count segment has
    /// to agree with the number of caps carried by the payload.
    pub(crate) fn decode(value: &str) -> Result<Self, PresetTransferError> {
        let segments: Vec<&str> = value.trim().split(FIELD_DELIMITER).collect();
        let (domain, version, tiers, payload) = match segments.as_slice() {
            [] | [""] => return Err(PresetTransferError::EmptyPayload),
            [_] => return Err(PresetTransferError::MissingVersion),
            [_, _] => return Err(PresetTransferError::MissingTierCount),
            [_, _, _] => return Err(PresetTransferError::MissingPayload),
            [domain, version, tiers, payload] => (*domain, *version, *tiers, *payload),
            [_, _, _, _, trailing @ ..] => {
                return Err(PresetTransferError::TrailingData {
                    segments: trailing.len(),
                })
            }
        };

        check_header(domain, version)?;
        let declared = tiers
            .trim()
            .parse::<usize>()
            .map_err(|_| PresetTransferError::InvalidTierCount(tiers.to_owned()))?;
        let snapshot = decode_payload(payload)?;

        let decoded = snapshot.config.tier_count();
        if decoded != declared {
            return Err(PresetTransferError::TierCountMismatch { declared, decoded });
        }
        Ok(snapshot)
    }
}

fn check_header(domain: &str, version: &str) -> Result<(), PresetTransferError> {
    if domain != PRESET_DOMAIN {
        return Err(PresetTransferError::InvalidPrefix(domain.to_owned()));
    }
    if version != PRESET_VERSION {
        return Err(PresetTransferError::UnsupportedVersion(version.to_owned()));
    }
    Ok(())
}

fn decode_payload(payload: &str) -> Result<PresetSnapshot, PresetTransferError> {
    let bytes = STANDARD_NO_PAD
        .decode(payload.as_bytes())
        .map_err(PresetTransferError::InvalidEncoding)?;
    serde_json::from_slice(&bytes).map_err(PresetTransferError::InvalidPayload)
}

/// Errors that can occur while encoding or decoding preset strings.
#[derive(Debug, Error)]
pub(crate) enum PresetTransferError {
    /// The provided string was empty or contained only whitespace.
    #[error("preset string was empty")]
    EmptyPayload,
    /// The encoded preset did not contain a version segment.
    #[error("preset string is missing the version")]
    MissingVersion,
    /// The encoded preset did not include the tier count.
    #[error("preset string is missing the tier count")]
    MissingTierCount,
    /// The encoded preset did not include the payload segment.
    #[error("preset string is missing the payload")]
    MissingPayload,
    /// The encoded preset used an unexpected prefix segment.
    #[error("preset prefix '{0}' is not supported")]
    InvalidPrefix(String),
    /// The encoded preset used an unsupported version identifier.
    #[error("preset version '{0}' is not supported")]
    UnsupportedVersion(String),
    /// Segments followed the payload.
    #[error("preset string has {segments} unexpected trailing segment(s)")]
    TrailingData {
        /// Number of segments after the payload.
        segments: usize,
    },
    /// The tier count segment was not a number.
    #[error("could not parse tier count '{0}'")]
    InvalidTierCount(String),
    /// The tier count segment disagrees with the decoded caps.
    #[error("preset declares {declared} tiers but carries {decoded} caps")]
    TierCountMismatch {
        /// Tier count named in the header.
        declared: usize,
        /// Number of caps found in the payload.
        decoded: usize,
    },
    /// The base64 payload could not be decoded.
    #[error("could not decode preset payload: {0}")]
    InvalidEncoding(#[source] base64::DecodeError),
    /// The decoded payload could not be deserialised.
    #[error("could not parse preset payload: {0}")]
    InvalidPayload(#[source] serde_json::Error),
    /// The preset could not be serialised.
    #[error("could not serialise preset: {0}")]
    Serialize(#[source] serde_json::Error),
}
