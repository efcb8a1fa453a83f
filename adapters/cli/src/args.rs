use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tier_scaling_core::Tier;
use tier_scaling_rendering::{ChartOptions, DEFAULT_BASE_WEIGHT};
use tier_scaling_system_export::{ExportToggles, DEFAULT_FILE_NAME};
use tier_scaling_system_tuning::{Edit, Parameter};

/// Command-line arguments accepted by the workbench.
#[derive(Debug, Parser)]
#[command(
    name = "tier-scaling",
    version,
    about = "Explore how tier caps and scaling coefficients shape spawn levels and weights"
)]
pub(crate) struct Args {
    /// Trainer tier the statistics are computed for (clamped to the tier range).
    #[arg(short, long)]
    pub(crate) trainer_tier: Option<u32>,

    /// TOML file holding a scaling configuration.
    #[arg(short, long, value_name = "PATH")]
    pub(crate) config: Option<PathBuf>,

    /// Preset share string produced by `--print-preset`; takes precedence over `--config`.
    #[arg(long, value_name = "STRING")]
    pub(crate) preset: Option<String>,

    /// Resizes the caps list to this many tiers.
    #[arg(long, value_name = "COUNT")]
    pub(crate) tiers: Option<u32>,

    /// Overrides a single tier cap, e.g. `--cap 3=45`. May be repeated.
    #[arg(long = "cap", value_name = "TIER=CAP", value_parser = parse_cap_edit)]
    pub(crate) caps: Vec<(u32, f64)>,

    /// Ratio deriving the minimum level from the effective cap.
    #[arg(long)]
    pub(crate) min_level_scaling: Option<f64>,

    /// Ratio deriving the most likely level from the effective cap.
    #[arg(long)]
    pub(crate) avg_level_scaling: Option<f64>,

    /// Ratio deriving the maximum level from the effective cap.
    #[arg(long)]
    pub(crate) max_level_scaling: Option<f64>,

    /// Fraction of the cap gap granted to tiers below the trainer.
    #[arg(long)]
    pub(crate) tier_cap_scaling: Option<f64>,

    /// Weight multiplier of the trainer's own tier.
    #[arg(long)]
    pub(crate) weight_current_tier_buff: Option<f64>,

    /// Weight decay per tier below the trainer.
    #[arg(long)]
    pub(crate) weight_decay_per_tier: Option<f64>,

    /// Floor of the weight multiplier.
    #[arg(long)]
    pub(crate) weight_min_factor: Option<f64>,

    /// Hides tiers above the trainer tier from the level chart.
    #[arg(long)]
    pub(crate) hide_locked: bool,

    /// Colours the level chart strips with ANSI escapes.
    #[arg(long)]
    pub(crate) color: bool,

    /// Base spawn weight scaled by each tier's multiplier.
    #[arg(long, default_value_t = DEFAULT_BASE_WEIGHT)]
    pub(crate) base_weight: f64,

    /// Output format for the computed statistics.
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub(crate) format: OutputFormat,

    /// Writes the derived spawn configuration document, to `ucp-spawn.json` when no path is given.
    #[arg(
        long,
        value_name = "PATH",
        num_args = 0..=1,
        default_missing_value = DEFAULT_FILE_NAME
    )]
    pub(crate) export: Option<PathBuf>,

    /// Disables species blocking in the exported document.
    #[arg(long)]
    pub(crate) no_species_blocking: bool,

    /// Stops blocking unknown species in the exported document.
    #[arg(long)]
    pub(crate) no_block_unknown_species: bool,

    /// Disables level scaling in the exported document.
    #[arg(long)]
    pub(crate) no_level_scaling: bool,

    /// Disables weight scaling in the exported document.
    #[arg(long)]
    pub(crate) no_weight_scaling: bool,

    /// Prints a preset share string for the final configuration.
    #[arg(long)]
    pub(crate) print_preset: bool,

    /// Enables debug logging.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

/// Output formats supported by the workbench.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Summary table followed by per-tier level strips.
    Table,
    /// Statistics serialised as JSON.
    Json,
}

impl Args {
    /// Translates the override flags into workbench edits.
    ///
    /// The tier count is resized first so cap overrides can target new tiers,
    /// and the trainer tier is applied last so it clamps to the final range.
    pub(crate) fn edits(&self) -> Vec<Edit> {
        let mut edits = Vec::new();

        if let Some(count) = self.tiers {
            edits.push(Edit::SetTierCount(count));
        }

        edits.extend(self.caps.iter().map(|&(tier, value)| Edit::SetTierCap {
            tier: Tier::new(tier),
            value,
        }));

        edits.extend(Parameter::ALL.into_iter().filter_map(|parameter| {
            self.parameter(parameter)
                .map(|value| Edit::SetParameter { parameter, value })
        }));

        if let Some(tier) = self.trainer_tier {
            edits.push(Edit::SetTrainerTier(tier));
        }

        edits
    }

    /// Chart options selected on the command line.
    pub(crate) fn chart_options(&self) -> ChartOptions {
        ChartOptions {
            show_locked_tiers: !self.hide_locked,
        }
    }

    /// Export toggles selected on the command line.
    pub(crate) fn export_toggles(&self) -> ExportToggles {
        ExportToggles {
            species_blocking: !self.no_species_blocking,
            block_unknown_species: !self.no_block_unknown_species,
            level_scaling: !self.no_level_scaling,
            weight_scaling: !self.no_weight_scaling,
        }
    }

    fn parameter(&self, parameter: Parameter) -> Option<f64> {
        match parameter {
            Parameter::MinLevelScaling => self.min_level_scaling,
            Parameter::AvgLevelScaling => self.avg_level_scaling,
            Parameter::MaxLevelScaling => self.max_level_scaling,
            Parameter::TierCapScaling => self.tier_cap_scaling,
            Parameter::WeightCurrentTierBuff => self.weight_current_tier_buff,
            Parameter::WeightDecayPerTier => self.weight_decay_per_tier,
            Parameter::WeightMinFactor => self.weight_min_factor,
        }
    }
}

fn parse_cap_edit(value: &str) -> Result<(u32, f64), String> {
    let (tier, cap) = value
        .split_once('=')
        .ok_or_else(|| format!("expected TIER=CAP, got `{value}`"))?;
    let tier = tier
        .trim()
        .parse::<u32>()
        .map_err(|error| format!("invalid tier `{tier}`: {error}"))?;
    let cap = cap
        .trim()
        .parse::<f64>()
        .map_err(|error| format!("invalid cap `{cap}`: {error}"))?;
    Ok((tier, cap))
}
