use std::io::Write;

use anyhow::{Context, Result};
use tier_scaling_core::ScalingConfig;
use tier_scaling_rendering::{
    Color, DensitySeries, Presentation, RenderingBackend, SummaryTable, DENSITY_FLOOR,
    LEVEL_AXIS_MAX, SUMMARY_HEADERS,
};
use tier_scaling_system_tuning::Parameter;

/// Glyphs used to shade density strips, from empty to peak.
const DENSITY_RAMP: &[u8] = b" .:-=+*#%@";
/// Separator placed between table columns.
const COLUMN_GAP: &str = "  ";
const ANSI_RESET: &str = "\x1b[0m";

/// Rendering backend that writes plain text to any writer.
#[derive(Debug)]
pub(crate) struct TerminalBackend<W> {
    out: W,
    color: bool,
}

impl<W: Write> TerminalBackend<W> {
    /// Creates a backend writing uncoloured text to `out`.
    pub(crate) fn new(out: W) -> Self {
        Self { out, color: false }
    }

    /// Enables or disables ANSI colouring of density strips.
    pub(crate) fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Lists every scaling coefficient with its config file key.
    pub(crate) fn write_parameters(&mut self, config: &ScalingConfig) -> Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "Scaling parameters")?;
        let width = Parameter::ALL
            .iter()
            .map(|parameter| parameter.label().len())
            .max()
            .unwrap_or(0);
        for parameter in Parameter::ALL {
            writeln!(
                self.out,
                "{label:<width$}  {value:>6}  ({key})",
                label = parameter.label(),
                value = parameter.get(config),
                key = parameter.key()
            )?;
        }
        self.out.flush().context("failed to flush terminal output")
    }

    fn write_table(&mut self, table: &SummaryTable) -> Result<()> {
        let rows: Vec<[String; 8]> = table.rows.iter().map(|row| row.cells()).collect();
        let mut widths = SUMMARY_HEADERS.map(str::len);
        for cells in &rows {
            for (width, cell) in widths.iter_mut().zip(cells) {
                *width = (*width).max(cell.len());
            }
        }

        let header = SUMMARY_HEADERS.map(str::to_owned);
        self.write_row(&header, &widths)?;
        let rule_width = widths.iter().sum::<usize>() + COLUMN_GAP.len() * (widths.len() - 1);
        writeln!(self.out, "{}", "-".repeat(rule_width))?;
        for cells in &rows {
            self.write_row(cells, &widths)?;
        }
        Ok(())
    }

    fn write_row(&mut self, cells: &[String; 8], widths: &[usize; 8]) -> Result<()> {
        let line = cells
            .iter()
            .zip(widths)
            .map(|(cell, &width)| format!("{cell:>width$}"))
            .collect::<Vec<_>>()
            .join(COLUMN_GAP);
        writeln!(self.out, "{line}")?;
        Ok(())
    }

    fn write_series(&mut self, series: &DensitySeries, label_width: usize) -> Result<()> {
        let strip = strip(series);
        let strip = if self.color {
            format!(
                "{}{}{strip}{ANSI_RESET}",
                ansi(series.stroke, 38),
                ansi(series.fill, 48)
            )
        } else {
            strip
        };
        let marker = if series.locked { " (locked)" } else { "" };
        writeln!(
            self.out,
            "{label:<label_width$} |{strip}|{marker}",
            label = series.label
        )?;
        Ok(())
    }
}

impl<W: Write> RenderingBackend for TerminalBackend<W> {
    fn present(&mut self, presentation: &Presentation) -> Result<()> {
        writeln!(self.out, "{}", presentation.title)?;
        writeln!(self.out, "Trainer tier: {}", presentation.trainer_tier)?;
        writeln!(self.out)?;

        self.write_table(&presentation.table)?;

        writeln!(self.out)?;
        writeln!(self.out, "Level distribution (levels 1-{LEVEL_AXIS_MAX})")?;
        let label_width = presentation
            .chart
            .series
            .iter()
            .map(|series| series.label.len())
            .max()
            .unwrap_or(0);
        for series in &presentation.chart.series {
            self.write_series(series, label_width)?;
        }

        self.out.flush().context("failed to flush terminal output")
    }
}

/// One glyph per level; dashed series leave their off-phase cells blank.
fn strip(series: &DensitySeries) -> String {
    let dash = series.dash.map(|[on, off]| (on as usize, (on + off) as usize));
    (1..=LEVEL_AXIS_MAX)
        .map(|level| {
            let cell = (level - 1) as usize;
            match dash {
                Some((on, period)) if period > 0 && cell % period >= on => ' ',
                _ => shade(series.density_at_level(level).unwrap_or(DENSITY_FLOOR)),
            }
        })
        .collect()
}

fn shade(density: f32) -> char {
    if density <= DENSITY_FLOOR {
        return ' ';
    }
    let steps = (DENSITY_RAMP.len() - 1) as f32;
    let index = (density.clamp(0.0, 1.0) * steps).round() as usize;
    // Any visible density gets at least the faintest glyph.
    char::from(DENSITY_RAMP[index.max(1)])
}

fn ansi(color: Color, layer: u8) -> String {
    let [red, green, blue] = color.over_black_rgb_u8();
    format!("\x1b[{layer};2;{red};{green};{blue}m")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tier_scaling_core::{compute_all_tier_stats, Tier};
    use tier_scaling_rendering::{ChartOptions, DEFAULT_BASE_WEIGHT};

    fn is_strip(line: &str) -> bool {
        line.starts_with("Tier ") && line.contains('|')
    }

    fn strip_body(line: &str) -> &str {
        line.split('|').nth(1).expect("strip is enclosed in pipes")
    }

    fn render_with(trainer: u32, options: ChartOptions, color: bool) -> String {
        let stats = compute_all_tier_stats(Tier::new(trainer), &ScalingConfig::default())
            .expect("default config covers trainer tier");
        let presentation = Presentation::new(
            "Tier scaling",
            &stats,
            Tier::new(trainer),
            options,
            DEFAULT_BASE_WEIGHT,
        );

        let mut buffer = Vec::new();
        TerminalBackend::new(&mut buffer)
            .with_color(color)
            .present(&presentation)
            .expect("writing to a buffer succeeds");
        String::from_utf8(buffer).expect("output is utf-8")
    }

    fn render(trainer: u32, options: ChartOptions) -> String {
        render_with(trainer, options, false)
    }

    #[test]
    fn shade_maps_floor_to_blank_and_peak_to_densest_glyph() {
        assert_eq!(shade(DENSITY_FLOOR), ' ');
        assert_eq!(shade(1.0), '@');
        assert_eq!(shade(0.01), '.');
    }

    #[test]
    fn table_lists_every_tier_with_headers() {
        let output = render(3, ChartOptions::default());

        assert!(output.starts_with("Tier scaling\nTrainer tier: 3\n"));
        assert!(output.contains("Weight Multiplier"));
        assert!(output.contains("1.60"));
        assert_eq!(output.matches(" (locked)").count(), 4);
    }

    #[test]
    fn strips_span_the_full_level_axis() {
        let output = render(7, ChartOptions::default());
        let strips: Vec<_> = output.lines().filter(|line| is_strip(line)).collect();

        assert_eq!(strips.len(), 7);
        for line in strips {
            let body = strip_body(line);
            assert_eq!(body.chars().count(), LEVEL_AXIS_MAX as usize);
            assert!(body.contains('@'), "strip must reach its peak: {line}");
        }
    }

    #[test]
    fn locked_strips_are_dashed() {
        let output = render(1, ChartOptions::default());
        let locked = output
            .lines()
            .find(|line| line.starts_with("Tier 2 "))
            .expect("tier 2 strip is drawn");

        assert!(locked.ends_with(" (locked)"));
        let cells: Vec<char> = strip_body(locked).chars().collect();
        assert_eq!(cells.len(), LEVEL_AXIS_MAX as usize);
        // Levels 17-20 and 27-30 fall in the off phase of the dash.
        assert!(cells[16..20].iter().all(|cell| *cell == ' '));
        assert!(cells[26..30].iter().all(|cell| *cell == ' '));
        assert!(cells[20..26].iter().any(|cell| *cell != ' '));
    }

    #[test]
    fn hidden_locked_tiers_are_not_drawn() {
        let output = render(
            2,
            ChartOptions {
                show_locked_tiers: false,
            },
        );

        assert_eq!(output.matches(" (locked)").count(), 0);
        assert_eq!(output.lines().filter(|line| is_strip(line)).count(), 2);
    }

    #[test]
    fn colored_strips_use_series_stroke_and_fill() {
        let plain = render(3, ChartOptions::default());
        let colored = render_with(3, ChartOptions::default(), true);

        assert!(!plain.contains('\x1b'));
        assert!(colored.contains("\x1b[38;2;255;99;132m\x1b[48;2;102;40;53m"));
        assert_eq!(colored.matches(ANSI_RESET).count(), 7);
    }

    #[test]
    fn parameters_list_labels_values_and_keys() {
        let mut buffer = Vec::new();
        TerminalBackend::new(&mut buffer)
            .write_parameters(&ScalingConfig::default())
            .expect("writing to a buffer succeeds");
        let output = String::from_utf8(buffer).expect("output is utf-8");

        assert!(output.contains("Scaling parameters"));
        assert_eq!(output.lines().filter(|line| line.ends_with(')')).count(), 7);
        let decay = output
            .lines()
            .find(|line| line.starts_with("Weight decay per tier"))
            .expect("decay row is listed");
        assert!(decay.contains("0.2"));
        assert!(decay.ends_with("(weight_decay_per_tier)"));
    }
}
