#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line workbench for exploring tier-based spawn level and weight scaling.

mod args;
mod config;
mod preset;
mod terminal;

use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use tier_scaling_core::{ScalingConfig, Tier};
use tier_scaling_rendering::{Presentation, RenderingBackend};
use tier_scaling_system_export::SpawnConfigDocument;
use tier_scaling_system_tuning::{EditOutcome, Workbench};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{
    args::{Args, OutputFormat},
    preset::PresetSnapshot,
    terminal::TerminalBackend,
};

/// Entry point for the tier scaling command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let (config, trainer_tier) = initial_state(&args)?;
    let mut workbench = Workbench::new(config, trainer_tier);
    for edit in args.edits() {
        if workbench.apply(edit) == EditOutcome::Ignored {
            warn!(?edit, "edit had no effect");
        }
    }

    let trainer_tier = workbench.trainer_tier();
    let stats = workbench
        .stats()
        .with_context(|| format!("failed to compute statistics for trainer tier {trainer_tier}"))?;

    if let Some(path) = &args.export {
        SpawnConfigDocument::from_config(workbench.config(), args.export_toggles())
            .write_to(path)
            .context("failed to export spawn configuration")?;
        info!(path = %path.display(), "exported spawn configuration");
    }

    if args.print_preset {
        let snapshot = PresetSnapshot {
            trainer_tier,
            config: workbench.config().clone(),
        };
        println!("{}", snapshot.encode()?);
        return Ok(());
    }

    match args.format {
        OutputFormat::Json => {
            let json =
                serde_json::to_string_pretty(&stats).context("failed to serialise statistics")?;
            println!("{json}");
        }
        OutputFormat::Table => {
            let presentation = Presentation::new(
                "Tier scaling",
                &stats,
                trainer_tier,
                args.chart_options(),
                args.base_weight,
            );
            let mut backend = TerminalBackend::new(io::stdout().lock()).with_color(args.color);
            backend.present(&presentation)?;
            backend.write_parameters(workbench.config())?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

/// Resolves the starting configuration and trainer tier before edits are applied.
fn initial_state(args: &Args) -> Result<(ScalingConfig, Tier)> {
    if let Some(preset) = &args.preset {
        if args.config.is_some() {
            warn!("--preset takes precedence over --config");
        }
        let snapshot = PresetSnapshot::decode(preset).context("failed to load preset")?;
        info!(
            tiers = snapshot.config.tier_count(),
            trainer_tier = %snapshot.trainer_tier,
            "loaded preset"
        );
        return Ok((snapshot.config, snapshot.trainer_tier));
    }

    let config = match &args.config {
        Some(path) => {
            let config = config::load(path)?;
            info!(path = %path.display(), tiers = config.tier_count(), "loaded scaling config");
            config
        }
        None => ScalingConfig::default(),
    };
    Ok((config, Tier::new(1)))
}
