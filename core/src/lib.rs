#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core scaling model shared across the tier scaling workbench.
//!
//! This crate owns the configuration record and the pure formulas that map a
//! trainer's progression tier onto per-tier level ranges and spawn-weight
//! multipliers. Every function receives the configuration explicitly; nothing
//! is cached between calls, so identical inputs always yield identical
//! statistics. Adapters build presentations from the [`TierStats`] sequence
//! returned by [`compute_all_tier_stats`].

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Base level caps shipped with the default configuration, lowest tier first.
pub const DEFAULT_TIER_CAPS: [u32; 7] = [15, 27, 40, 54, 69, 85, 100];

/// Lowest level a derived range may start at.
pub const MIN_LEVEL: i64 = 1;

/// Highest level a derived range may reach once the final cap is applied.
pub const MAX_LEVEL: i64 = 100;

/// One-based progression bracket.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Tier(u32);

impl Tier {
    /// Creates a tier wrapper around the provided one-based index.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the underlying one-based index.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl From<u32> for Tier {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors raised by the scaling model.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ScalingError {
    /// The requested tier does not index into the configured caps.
    #[error("tier {tier} out of range for caps {caps:?}")]
    OutOfRange {
        /// Tier that failed the lookup.
        tier: Tier,
        /// Complete caps list the lookup was performed against.
        caps: Vec<u32>,
    },
}

/// Tunable parameters consumed by every scaling formula.
///
/// No ordering or uniqueness is required of `tier_caps`; the formulas are
/// evaluated literally for whatever caps are supplied.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScalingConfig {
    /// Base level cap per tier; index 0 holds the cap of tier 1.
    pub tier_caps: Vec<u32>,
    /// Weight multiplier applied to the trainer's own tier.
    pub weight_current_tier_buff: f64,
    /// Amount subtracted from the buff per tier of distance below the trainer.
    pub weight_decay_per_tier: f64,
    /// Floor the weight multiplier never drops below.
    pub weight_min_factor: f64,
    /// Ratio applied to the effective cap to derive the minimum level.
    pub min_level_scaling: f64,
    /// Ratio applied to the effective cap to derive the most likely level.
    pub avg_level_scaling: f64,
    /// Ratio applied to the effective cap to derive the maximum level.
    pub max_level_scaling: f64,
    /// Fraction of the cap gap to the trainer tier granted to lower tiers.
    pub tier_cap_scaling: f64,
}

impl Default for ScalingConfig {
    fn default() -> Self {
        Self {
            tier_caps: DEFAULT_TIER_CAPS.to_vec(),
            weight_current_tier_buff: 2.0,
            weight_decay_per_tier: 0.2,
            weight_min_factor: 0.15,
            min_level_scaling: 0.45,
            avg_level_scaling: 0.75,
            max_level_scaling: 1.1,
            tier_cap_scaling: 0.25,
        }
    }
}

impl ScalingConfig {
    /// Number of configured tiers.
    #[must_use]
    pub fn tier_count(&self) -> usize {
        self.tier_caps.len()
    }

    /// Iterates every configured tier in ascending order, starting at 1.
    pub fn tiers(&self) -> impl Iterator<Item = Tier> {
        let count = u32::try_from(self.tier_caps.len()).unwrap_or(u32::MAX);
        (1..=count).map(Tier::new)
    }
}

/// Level range derived from an effective cap.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelRange {
    /// Lowest level, never below [`MIN_LEVEL`]. Not capped from above.
    pub min: i64,
    /// Most likely level. Not capped, so it may exceed `max`.
    pub mode: i64,
    /// Highest level, never above [`MAX_LEVEL`].
    pub max: i64,
    /// Mean of min, mode and max, taken before `max` is capped.
    pub expected_avg: f64,
}

/// Statistics describing a single tier relative to a trainer tier.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TierStats {
    /// Tier the statistics belong to.
    pub tier: Tier,
    /// Configured cap before any buff.
    pub base_cap: u32,
    /// Cap after the below-trainer buff.
    pub effective_cap: f64,
    /// Lowest level the tier spawns at.
    pub level_min: i64,
    /// Most likely spawn level.
    pub level_mode: i64,
    /// Highest level the tier spawns at.
    pub level_max: i64,
    /// Expected spawn level.
    pub level_expected_avg: f64,
    /// Spawn-weight multiplier relative to the trainer tier.
    pub weight_multiplier: f64,
}

impl TierStats {
    /// Evaluates the tier's level distribution curve at the provided level.
    #[must_use]
    pub fn density_at(&self, level: f64) -> f64 {
        triangular_density(
            level,
            self.level_min as f64,
            self.level_mode as f64,
            self.level_max as f64,
        )
    }

    /// Returns whether this tier sits above the provided trainer tier.
    #[must_use]
    pub fn is_above(&self, trainer_tier: Tier) -> bool {
        self.tier > trainer_tier
    }
}

/// Resolves the configured base cap of `tier`.
pub fn tier_cap(tier: Tier, config: &ScalingConfig) -> Result<u32, ScalingError> {
    tier.get()
        .checked_sub(1)
        .and_then(|index| config.tier_caps.get(index as usize))
        .copied()
        .ok_or_else(|| ScalingError::OutOfRange {
            tier,
            caps: config.tier_caps.clone(),
        })
}

/// Computes the cap of `mon_tier` after buffing it toward the trainer tier.
///
/// Tiers below the trainer gain `tier_cap_scaling` times the gap between the
/// two caps. Tiers at or above the trainer keep their base cap. Both tiers are
/// looked up even when no buff applies, so an invalid trainer tier always
/// fails.
pub fn effective_cap(
    mon_tier: Tier,
    trainer_tier: Tier,
    config: &ScalingConfig,
) -> Result<f64, ScalingError> {
    let mon_cap = f64::from(tier_cap(mon_tier, config)?);
    let trainer_cap = f64::from(tier_cap(trainer_tier, config)?);

    if mon_tier < trainer_tier {
        let diff = trainer_cap - mon_cap;
        let buff = diff * config.tier_cap_scaling;
        return Ok(mon_cap + buff);
    }

    Ok(mon_cap)
}

/// Computes the spawn-weight multiplier of `mon_tier` relative to the trainer.
///
/// The multiplier decays linearly with each tier below the trainer and is
/// floored at `weight_min_factor`. Tiers above the trainer see a negative
/// distance and climb past the buff; there is no upper clamp.
#[must_use]
pub fn weight_multiplier(mon_tier: Tier, trainer_tier: Tier, config: &ScalingConfig) -> f64 {
    if mon_tier == trainer_tier {
        return config.weight_current_tier_buff;
    }

    let diff = f64::from(trainer_tier.get()) - f64::from(mon_tier.get());
    let multiplier = config.weight_current_tier_buff - diff * config.weight_decay_per_tier;
    if multiplier < config.weight_min_factor {
        return config.weight_min_factor;
    }
    multiplier
}

/// Derives the level range for an effective cap.
///
/// The expected average is taken after the ordering corrections but before
/// `max` is capped at [`MAX_LEVEL`], so it may reflect a maximum above 100.
#[must_use]
pub fn level_range_from_cap(effective_cap: f64, config: &ScalingConfig) -> LevelRange {
    let mut min = round_level(effective_cap * config.min_level_scaling);
    let mut mode = round_level(effective_cap * config.avg_level_scaling);
    let mut max = round_level(effective_cap * config.max_level_scaling);

    min = min.max(MIN_LEVEL);
    if mode < min {
        mode = min;
    }
    if max < mode {
        max = mode;
    }

    let expected_avg = (min as f64 + mode as f64 + max as f64) / 3.0;

    if max > MAX_LEVEL {
        max = MAX_LEVEL;
    }

    LevelRange {
        min,
        mode,
        max,
        expected_avg,
    }
}

/// Peak-normalised triangular shaping function over `[min, max]`.
///
/// Returns 1 at the mode and falls linearly to 0 at both ends. This shapes
/// chart curves and is not a normalised probability density.
#[must_use]
pub fn triangular_density(x: f64, min: f64, mode: f64, max: f64) -> f64 {
    if x < min || x > max {
        return 0.0;
    }
    if min == max || x == mode {
        return 1.0;
    }
    if x < mode {
        return (x - min) / non_zero(mode - min);
    }
    (max - x) / non_zero(max - mode)
}

/// Computes statistics for every configured tier relative to `trainer_tier`.
///
/// The trainer tier is validated by the per-tier cap lookups; the first
/// failure aborts the whole computation.
pub fn compute_all_tier_stats(
    trainer_tier: Tier,
    config: &ScalingConfig,
) -> Result<Vec<TierStats>, ScalingError> {
    let stats = config
        .tiers()
        .map(|tier| tier_stats(tier, trainer_tier, config))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        trainer_tier = trainer_tier.get(),
        tiers = stats.len(),
        "computed tier statistics"
    );
    Ok(stats)
}

fn tier_stats(
    tier: Tier,
    trainer_tier: Tier,
    config: &ScalingConfig,
) -> Result<TierStats, ScalingError> {
    let base_cap = tier_cap(tier, config)?;
    let effective_cap = effective_cap(tier, trainer_tier, config)?;
    let range = level_range_from_cap(effective_cap, config);
    let weight_multiplier = weight_multiplier(tier, trainer_tier, config);

    Ok(TierStats {
        tier,
        base_cap,
        effective_cap,
        level_min: range.min,
        level_mode: range.mode,
        level_max: range.max,
        level_expected_avg: range.expected_avg,
        weight_multiplier,
    })
}

// `f64::round` rounds half away from zero; the cast saturates and maps NaN to 0.
fn round_level(value: f64) -> i64 {
    value.round() as i64
}

fn non_zero(denominator: f64) -> f64 {
    if denominator == 0.0 || denominator.is_nan() {
        1.0
    } else {
        denominator
    }
}
