#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared presentation contracts for tier scaling adapters.
//!
//! Statistics from the core are turned into declarative chart series and
//! summary rows here; backends only decide how to draw them.

use anyhow::Result as AnyResult;
use glam::Vec2;
use tier_scaling_core::{Tier, TierStats};

/// Highest level sampled along the chart's horizontal axis.
pub const LEVEL_AXIS_MAX: u32 = 100;

/// Value substituted for exact zeros so curves stay drawable on log-like scales.
pub const DENSITY_FLOOR: f32 = 0.000_01;

/// Base spawn weight the summary table scales by each multiplier.
pub const DEFAULT_BASE_WEIGHT: f64 = 300.0;

/// Dash pattern, in pixels on and off, applied to tiers above the trainer.
pub const LOCKED_DASH_PATTERN: [f32; 2] = [6.0, 4.0];

const ACTIVE_STROKE_ALPHA: u8 = 0xff;
const ACTIVE_FILL_ALPHA: u8 = 0x66;
const LOCKED_STROKE_ALPHA: u8 = 0x2f;
const LOCKED_FILL_ALPHA: u8 = 0x0f;

const SERIES_PALETTE: [Color; 8] = [
    Color::from_rgb_u8(0xff, 0x63, 0x84),
    Color::from_rgb_u8(0x36, 0xa2, 0xeb),
    Color::from_rgb_u8(0xff, 0xcd, 0x56),
    Color::from_rgb_u8(0x4b, 0xc0, 0xc0),
    Color::from_rgb_u8(0x99, 0x66, 0xff),
    Color::from_rgb_u8(0xff, 0x9f, 0x40),
    Color::from_rgb_u8(0x00, 0xc8, 0x53),
    Color::from_rgb_u8(0xd8, 0x1b, 0x60),
];

/// RGBA color used when presenting charts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns the color with its alpha replaced by a byte value.
    #[must_use]
    pub const fn with_alpha_u8(self, alpha: u8) -> Self {
        Self {
            alpha: alpha as f32 / 255.0,
            ..self
        }
    }

    /// Byte RGB channels after compositing the color over black.
    #[must_use]
    pub fn over_black_rgb_u8(self) -> [u8; 3] {
        let alpha = self.alpha.clamp(0.0, 1.0);
        [self.red, self.green, self.blue]
            .map(|channel| (channel.clamp(0.0, 1.0) * alpha * 255.0).round() as u8)
    }
}

/// Toggles that influence which series a chart contains.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChartOptions {
    /// Whether tiers above the trainer tier are drawn.
    pub show_locked_tiers: bool,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            show_locked_tiers: true,
        }
    }
}

/// Level distribution curve of a single tier.
#[derive(Clone, Debug, PartialEq)]
pub struct DensitySeries {
    /// Tier the curve belongs to.
    pub tier: Tier,
    /// Legend label.
    pub label: String,
    /// Sampled `(level, density)` points in ascending level order.
    pub points: Vec<Vec2>,
    /// Line color.
    pub stroke: Color,
    /// Area fill color.
    pub fill: Color,
    /// Dash pattern, present for tiers above the trainer.
    pub dash: Option<[f32; 2]>,
    /// Whether the tier sits above the trainer tier.
    pub locked: bool,
}

impl DensitySeries {
    fn new(stats: &TierStats, trainer_tier: Tier, palette_index: usize) -> Self {
        let locked = stats.is_above(trainer_tier);
        let base = SERIES_PALETTE[palette_index % SERIES_PALETTE.len()];
        let (stroke_alpha, fill_alpha) = if locked {
            (LOCKED_STROKE_ALPHA, LOCKED_FILL_ALPHA)
        } else {
            (ACTIVE_STROKE_ALPHA, ACTIVE_FILL_ALPHA)
        };

        let points = (1..=LEVEL_AXIS_MAX)
            .map(|level| {
                let density = stats.density_at(f64::from(level)) as f32;
                let density = if density == 0.0 {
                    DENSITY_FLOOR
                } else {
                    density
                };
                Vec2::new(level as f32, density)
            })
            .collect();

        Self {
            tier: stats.tier,
            label: format!("Tier {}", stats.tier),
            points,
            stroke: base.with_alpha_u8(stroke_alpha),
            fill: base.with_alpha_u8(fill_alpha),
            dash: locked.then_some(LOCKED_DASH_PATTERN),
            locked,
        }
    }

    /// Density sampled at `level`, if the level lies on the axis.
    #[must_use]
    pub fn density_at_level(&self, level: u32) -> Option<f32> {
        let index = level.checked_sub(1)? as usize;
        self.points.get(index).map(|point| point.y)
    }
}

/// Level distribution chart covering the visible tiers.
#[derive(Clone, Debug, PartialEq)]
pub struct LevelChart {
    /// One curve per visible tier, lowest tier first.
    pub series: Vec<DensitySeries>,
}

impl LevelChart {
    /// Builds the chart from per-tier statistics.
    #[must_use]
    pub fn build(stats: &[TierStats], trainer_tier: Tier, options: ChartOptions) -> Self {
        let series = stats
            .iter()
            .filter(|tier| options.show_locked_tiers || !tier.is_above(trainer_tier))
            .enumerate()
            .map(|(index, tier)| DensitySeries::new(tier, trainer_tier, index))
            .collect();

        Self { series }
    }
}

/// Column headings of the summary table.
pub const SUMMARY_HEADERS: [&str; 8] = [
    "Tier",
    "Unlocked",
    "Level Cap",
    "Minimum Level",
    "Average Level",
    "Max Level",
    "Weight Multiplier",
    "Spawn Weight",
];

/// Single row of the summary table.
#[derive(Clone, Debug, PartialEq)]
pub struct SummaryRow {
    /// Tier described by the row.
    pub tier: Tier,
    /// Whether the tier sits above the trainer tier.
    pub locked: bool,
    /// Configured base cap.
    pub level_cap: u32,
    /// Lowest spawn level.
    pub level_min: i64,
    /// Expected spawn level.
    pub average_level: f64,
    /// Highest spawn level.
    pub level_max: i64,
    /// Spawn-weight multiplier.
    pub weight_multiplier: f64,
    /// Base weight scaled by the multiplier.
    pub adjusted_weight: f64,
}

impl SummaryRow {
    /// Formats the row into display cells matching [`SUMMARY_HEADERS`].
    ///
    /// Locked tiers are marked with `X` in the "Unlocked" column.
    #[must_use]
    pub fn cells(&self) -> [String; 8] {
        [
            self.tier.to_string(),
            if self.locked { "X" } else { "" }.to_owned(),
            self.level_cap.to_string(),
            self.level_min.to_string(),
            format!("{:.0}", self.average_level),
            self.level_max.to_string(),
            format!("{:.2}", self.weight_multiplier),
            format!("{:.0}", self.adjusted_weight),
        ]
    }
}

/// Per-tier summary of level ranges and weights.
#[derive(Clone, Debug, PartialEq)]
pub struct SummaryTable {
    /// Base spawn weight used to derive [`SummaryRow::adjusted_weight`].
    pub base_weight: f64,
    /// Rows in ascending tier order.
    pub rows: Vec<SummaryRow>,
}

impl SummaryTable {
    /// Builds the table from per-tier statistics.
    #[must_use]
    pub fn build(stats: &[TierStats], trainer_tier: Tier, base_weight: f64) -> Self {
        let rows = stats
            .iter()
            .map(|tier| SummaryRow {
                tier: tier.tier,
                locked: tier.is_above(trainer_tier),
                level_cap: tier.base_cap,
                level_min: tier.level_min,
                average_level: tier.level_expected_avg,
                level_max: tier.level_max,
                weight_multiplier: tier.weight_multiplier,
                adjusted_weight: base_weight * tier.weight_multiplier,
            })
            .collect();

        Self { base_weight, rows }
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Heading shown above the output.
    pub title: String,
    /// Trainer tier the statistics were computed for.
    pub trainer_tier: Tier,
    /// Level distribution chart.
    pub chart: LevelChart,
    /// Summary table.
    pub table: SummaryTable,
}

impl Presentation {
    /// Constructs a presentation from per-tier statistics.
    #[must_use]
    pub fn new<T>(
        title: T,
        stats: &[TierStats],
        trainer_tier: Tier,
        options: ChartOptions,
        base_weight: f64,
    ) -> Self
    where
        T: Into<String>,
    {
        Self {
            title: title.into(),
            trainer_tier,
            chart: LevelChart::build(stats, trainer_tier, options),
            table: SummaryTable::build(stats, trainer_tier, base_weight),
        }
    }
}

/// Rendering backend capable of presenting tier scaling results.
pub trait RenderingBackend {
    /// Draws the presentation once.
    fn present(&mut self, presentation: &Presentation) -> AnyResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use tier_scaling_core::{compute_all_tier_stats, ScalingConfig};

    fn default_stats(trainer: u32) -> Vec<TierStats> {
        compute_all_tier_stats(Tier::new(trainer), &ScalingConfig::default())
            .expect("default config covers trainer tier")
    }

    #[test]
    fn chart_samples_every_level() {
        let stats = default_stats(3);
        let chart = LevelChart::build(&stats, Tier::new(3), ChartOptions::default());

        assert_eq!(chart.series.len(), 7);
        for series in &chart.series {
            assert_eq!(series.points.len(), LEVEL_AXIS_MAX as usize);
            assert_eq!(series.points[0].x, 1.0);
            assert_eq!(series.points[99].x, 100.0);
        }
    }

    #[test]
    fn chart_floors_zero_density() {
        let stats = default_stats(3);
        let chart = LevelChart::build(&stats, Tier::new(3), ChartOptions::default());
        let first = &chart.series[0];

        assert_eq!(first.density_at_level(1), Some(DENSITY_FLOOR));
        assert_eq!(first.density_at_level(16), Some(1.0));
        assert_eq!(first.density_at_level(0), None);
        assert_eq!(first.density_at_level(101), None);
    }

    #[test]
    fn compositing_over_black_scales_by_alpha() {
        let opaque = Color::from_rgb_u8(0xff, 0x66, 0x00);
        let faint = opaque.with_alpha_u8(0x33);

        assert_eq!(opaque.over_black_rgb_u8(), [0xff, 0x66, 0x00]);
        assert_eq!(faint.over_black_rgb_u8(), [0x33, 0x14, 0x00]);
    }

    #[test]
    fn chart_hides_locked_tiers_on_request() {
        let stats = default_stats(3);
        let chart = LevelChart::build(
            &stats,
            Tier::new(3),
            ChartOptions {
                show_locked_tiers: false,
            },
        );

        let tiers: Vec<_> = chart.series.iter().map(|series| series.tier.get()).collect();
        assert_eq!(tiers, vec![1, 2, 3]);
        assert!(chart.series.iter().all(|series| !series.locked));
    }

    #[test]
    fn locked_series_are_faint_and_dashed() {
        let stats = default_stats(3);
        let chart = LevelChart::build(&stats, Tier::new(3), ChartOptions::default());
        let unlocked = &chart.series[2];
        let locked = &chart.series[3];

        assert_eq!(unlocked.label, "Tier 3");
        assert!(unlocked.dash.is_none());
        assert_eq!(unlocked.stroke.alpha, 1.0);
        assert_eq!(locked.dash, Some(LOCKED_DASH_PATTERN));
        assert!(locked.stroke.alpha < unlocked.stroke.alpha);
        assert!(locked.fill.alpha < unlocked.fill.alpha);
    }

    #[test]
    fn palette_cycles_after_eight_series() {
        let config = ScalingConfig {
            tier_caps: (1..=9).map(|tier| tier * 10).collect(),
            ..ScalingConfig::default()
        };
        let stats = compute_all_tier_stats(Tier::new(9), &config).expect("valid trainer");
        let chart = LevelChart::build(&stats, Tier::new(9), ChartOptions::default());

        assert_eq!(chart.series[8].stroke, chart.series[0].stroke);
        assert_ne!(chart.series[1].stroke, chart.series[0].stroke);
    }

    #[test]
    fn summary_rows_mark_locked_tiers() {
        let stats = default_stats(3);
        let table = SummaryTable::build(&stats, Tier::new(3), DEFAULT_BASE_WEIGHT);

        let markers: Vec<_> = table.rows.iter().map(|row| row.cells()[1].clone()).collect();
        assert_eq!(markers, vec!["", "", "", "X", "X", "X", "X"]);
    }

    #[test]
    fn summary_row_formats_average_and_weight() {
        let stats = default_stats(3);
        let table = SummaryTable::build(&stats, Tier::new(3), DEFAULT_BASE_WEIGHT);
        let cells = table.rows[0].cells();

        assert_eq!(cells[0], "1");
        assert_eq!(cells[2], "15");
        assert_eq!(cells[3], "10");
        assert_eq!(cells[4], "16");
        assert_eq!(cells[5], "23");
        assert_eq!(cells[6], "1.60");
        assert_eq!(cells[7], "480");
    }

    #[test]
    fn presentation_builds_chart_and_table_together() {
        let stats = default_stats(2);
        let presentation = Presentation::new(
            "Tier scaling",
            &stats,
            Tier::new(2),
            ChartOptions::default(),
            DEFAULT_BASE_WEIGHT,
        );

        assert_eq!(presentation.title, "Tier scaling");
        assert_eq!(presentation.chart.series.len(), presentation.table.rows.len());
    }
}
