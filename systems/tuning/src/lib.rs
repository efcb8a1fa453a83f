#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure tuning system that applies configuration edits with input clamping.
//!
//! Adapters translate user input into [`Edit`] values and submit them to a
//! [`Workbench`], which owns the configuration and trainer tier between
//! computations. Every edit is clamped into a usable value or ignored; no
//! other validation happens here.

use tier_scaling_core::{compute_all_tier_stats, ScalingConfig, ScalingError, Tier, TierStats};
use tracing::debug;

/// Cap assumed for the last tier when extending an empty caps list.
const FALLBACK_LAST_CAP: u32 = 10;
/// Cap increment applied to each tier appended by a tier-count edit.
const APPENDED_CAP_STEP: u32 = 10;

/// Scalar coefficients of the scaling configuration that can be edited.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Parameter {
    /// Ratio deriving the minimum level from the effective cap.
    MinLevelScaling,
    /// Ratio deriving the most likely level from the effective cap.
    AvgLevelScaling,
    /// Ratio deriving the maximum level from the effective cap.
    MaxLevelScaling,
    /// Fraction of the cap gap granted to tiers below the trainer.
    TierCapScaling,
    /// Weight multiplier of the trainer's own tier.
    WeightCurrentTierBuff,
    /// Weight decay per tier below the trainer.
    WeightDecayPerTier,
    /// Floor of the weight multiplier.
    WeightMinFactor,
}

impl Parameter {
    /// Every editable parameter in display order.
    pub const ALL: [Parameter; 7] = [
        Parameter::MinLevelScaling,
        Parameter::AvgLevelScaling,
        Parameter::MaxLevelScaling,
        Parameter::TierCapScaling,
        Parameter::WeightCurrentTierBuff,
        Parameter::WeightDecayPerTier,
        Parameter::WeightMinFactor,
    ];

    /// Human readable label shown next to the input.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::MinLevelScaling => "Min level scaling",
            Self::AvgLevelScaling => "Avg level scaling",
            Self::MaxLevelScaling => "Max level scaling",
            Self::TierCapScaling => "Tier cap scaling",
            Self::WeightCurrentTierBuff => "Weight current tier buff",
            Self::WeightDecayPerTier => "Weight decay per tier",
            Self::WeightMinFactor => "Weight min factor",
        }
    }

    /// Configuration key matching the field name of [`ScalingConfig`].
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::MinLevelScaling => "min_level_scaling",
            Self::AvgLevelScaling => "avg_level_scaling",
            Self::MaxLevelScaling => "max_level_scaling",
            Self::TierCapScaling => "tier_cap_scaling",
            Self::WeightCurrentTierBuff => "weight_current_tier_buff",
            Self::WeightDecayPerTier => "weight_decay_per_tier",
            Self::WeightMinFactor => "weight_min_factor",
        }
    }

    /// Reads the parameter from the provided configuration.
    #[must_use]
    pub fn get(self, config: &ScalingConfig) -> f64 {
        match self {
            Self::MinLevelScaling => config.min_level_scaling,
            Self::AvgLevelScaling => config.avg_level_scaling,
            Self::MaxLevelScaling => config.max_level_scaling,
            Self::TierCapScaling => config.tier_cap_scaling,
            Self::WeightCurrentTierBuff => config.weight_current_tier_buff,
            Self::WeightDecayPerTier => config.weight_decay_per_tier,
            Self::WeightMinFactor => config.weight_min_factor,
        }
    }

    fn slot(self, config: &mut ScalingConfig) -> &mut f64 {
        match self {
            Self::MinLevelScaling => &mut config.min_level_scaling,
            Self::AvgLevelScaling => &mut config.avg_level_scaling,
            Self::MaxLevelScaling => &mut config.max_level_scaling,
            Self::TierCapScaling => &mut config.tier_cap_scaling,
            Self::WeightCurrentTierBuff => &mut config.weight_current_tier_buff,
            Self::WeightDecayPerTier => &mut config.weight_decay_per_tier,
            Self::WeightMinFactor => &mut config.weight_min_factor,
        }
    }
}

/// Edits accepted by the [`Workbench`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Edit {
    /// Resizes the caps list to the provided number of tiers.
    SetTierCount(u32),
    /// Replaces the base cap of a single tier.
    SetTierCap {
        /// Tier whose cap changes.
        tier: Tier,
        /// Raw input value; floored and lifted to at least 1.
        value: f64,
    },
    /// Replaces a scalar coefficient.
    SetParameter {
        /// Coefficient to update.
        parameter: Parameter,
        /// Raw input value; non-finite values are ignored.
        value: f64,
    },
    /// Moves the trainer to a new tier, clamped to the configured range.
    SetTrainerTier(u32),
}

/// Result of applying an [`Edit`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditOutcome {
    /// The edit changed the workbench state (possibly after clamping).
    Applied,
    /// The edit could not be applied and the state is unchanged.
    Ignored,
}

/// Editable configuration together with the trainer tier it is viewed from.
#[derive(Clone, Debug, PartialEq)]
pub struct Workbench {
    config: ScalingConfig,
    trainer_tier: Tier,
}

impl Default for Workbench {
    fn default() -> Self {
        Self::new(ScalingConfig::default(), Tier::new(1))
    }
}

impl Workbench {
    /// Creates a workbench, clamping the trainer tier into the configured range.
    #[must_use]
    pub fn new(config: ScalingConfig, trainer_tier: Tier) -> Self {
        let trainer_tier = clamp_tier(trainer_tier.get(), config.tier_count());
        Self {
            config,
            trainer_tier,
        }
    }

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> &ScalingConfig {
        &self.config
    }

    /// Current trainer tier.
    #[must_use]
    pub fn trainer_tier(&self) -> Tier {
        self.trainer_tier
    }

    /// Computes statistics for every tier from the current state.
    pub fn stats(&self) -> Result<Vec<TierStats>, ScalingError> {
        compute_all_tier_stats(self.trainer_tier, &self.config)
    }

    /// Applies a single edit.
    pub fn apply(&mut self, edit: Edit) -> EditOutcome {
        let outcome = match edit {
            Edit::SetTierCount(count) => self.set_tier_count(count),
            Edit::SetTierCap { tier, value } => self.set_tier_cap(tier, value),
            Edit::SetParameter { parameter, value } => self.set_parameter(parameter, value),
            Edit::SetTrainerTier(value) => {
                self.trainer_tier = clamp_tier(value, self.config.tier_count());
                EditOutcome::Applied
            }
        };
        debug!(?edit, ?outcome, "applied workbench edit");
        outcome
    }

    fn set_tier_count(&mut self, count: u32) -> EditOutcome {
        let target = count.max(1) as usize;
        let caps = &mut self.config.tier_caps;
        let current = caps.len();

        if target <= current {
            caps.truncate(target);
        } else {
            let last = caps
                .last()
                .copied()
                .filter(|cap| *cap != 0)
                .unwrap_or(FALLBACK_LAST_CAP);
            for offset in 1..=(target - current) {
                let offset = u32::try_from(offset).unwrap_or(u32::MAX);
                caps.push(last.saturating_add(APPENDED_CAP_STEP.saturating_mul(offset)));
            }
        }

        if self.trainer_tier.get() as usize > target {
            self.trainer_tier = clamp_tier(self.trainer_tier.get(), target);
        }
        EditOutcome::Applied
    }

    fn set_tier_cap(&mut self, tier: Tier, value: f64) -> EditOutcome {
        let Some(index) = tier.get().checked_sub(1) else {
            return EditOutcome::Ignored;
        };
        let Some(cap) = self.config.tier_caps.get_mut(index as usize) else {
            return EditOutcome::Ignored;
        };
        *cap = clamp_cap(value);
        EditOutcome::Applied
    }

    fn set_parameter(&mut self, parameter: Parameter, value: f64) -> EditOutcome {
        if !value.is_finite() {
            return EditOutcome::Ignored;
        }
        *parameter.slot(&mut self.config) = value;
        EditOutcome::Applied
    }
}

fn clamp_tier(value: u32, tier_count: usize) -> Tier {
    let highest = u32::try_from(tier_count).unwrap_or(u32::MAX).max(1);
    Tier::new(value.clamp(1, highest))
}

// Float-to-int `as` saturates, so oversized caps settle at u32::MAX.
fn clamp_cap(value: f64) -> u32 {
    if !value.is_finite() {
        return 1;
    }
    value.floor().max(1.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_cap_floors_and_lifts() {
        assert_eq!(clamp_cap(12.9), 12);
        assert_eq!(clamp_cap(0.0), 1);
        assert_eq!(clamp_cap(-4.0), 1);
        assert_eq!(clamp_cap(f64::NAN), 1);
    }

    #[test]
    fn clamp_tier_handles_empty_caps() {
        assert_eq!(clamp_tier(5, 0), Tier::new(1));
        assert_eq!(clamp_tier(0, 7), Tier::new(1));
        assert_eq!(clamp_tier(9, 7), Tier::new(7));
    }
}
