//! Plain-text charts for the terminal.

use std::str::FromStr;

use chrono::{Duration, NaiveDate};
use rand::Rng;
use rand_distr::StandardNormal;
use thiserror::Error;

const PLOT_HEIGHT: usize = 10;
const COLUMN_WIDTH: usize = 7;
const BAR_WIDTH: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    Line,
    Bar,
    Scatter,
    Pie,
}

impl ChartKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartKind::Line => "line",
            ChartKind::Bar => "bar",
            ChartKind::Scatter => "scatter",
            ChartKind::Pie => "pie",
        }
    }

    pub const fn all() -> &'static [ChartKind] {
        &[ChartKind::Line, ChartKind::Bar, ChartKind::Scatter, ChartKind::Pie]
    }

    /// Pie charts have no x/y axes.
    pub fn has_axes(&self) -> bool {
        !matches!(self, ChartKind::Pie)
    }
}

impl std::fmt::Display for ChartKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Chart type '{0}' not supported.")]
pub struct UnsupportedChart(pub String);

impl FromStr for ChartKind {
    type Err = UnsupportedChart;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "line" => Ok(ChartKind::Line),
            "bar" => Ok(ChartKind::Bar),
            "scatter" => Ok(ChartKind::Scatter),
            "pie" => Ok(ChartKind::Pie),
            _ => Err(UnsupportedChart(s.to_string())),
        }
    }
}

/// Labelled data points, one value per label.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Series {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl Series {
    pub fn push(&mut self, label: impl Into<String>, value: f64) {
        self.labels.push(label.into());
        self.values.push(value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn points(&self) -> impl Iterator<Item = (&str, f64)> {
        self.labels.iter().map(String::as_str).zip(self.values.iter().copied())
    }
}

/// Seven days of made-up trend data around a single observed value.
///
/// Labels are weekday abbreviations ending with `today`. Each value is
/// `base + (day - 3) * 2` plus standard normal noise, floored at zero. The
/// result is illustrative only.
pub fn synthetic_week<R: Rng>(base: f64, today: NaiveDate, rng: &mut R) -> Series {
    let labels = (0..7i64)
        .rev()
        .map(|back| (today - Duration::days(back)).format("%a").to_string())
        .collect();

    let values = (0..7i32)
        .map(|day| {
            let noise: f64 = rng.sample(StandardNormal);
            (base + (f64::from(day) - 3.0) * 2.0 + noise).max(0.0)
        })
        .collect();

    Series { labels, values }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub kind: ChartKind,
    pub title: String,
    pub series: Series,
    pub x_label: String,
    pub y_label: String,
}

impl Chart {
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.title);
        out.push('\n');

        if self.series.is_empty() {
            out.push_str("(no data)\n");
            return out;
        }

        match self.kind {
            ChartKind::Bar => self.render_bars(&mut out),
            ChartKind::Pie => self.render_pie(&mut out),
            ChartKind::Line | ChartKind::Scatter => self.render_plot(&mut out),
        }

        if self.kind.has_axes() {
            out.push_str(&format!("x: {}   y: {}\n", self.x_label, self.y_label));
        }

        out
    }

    fn label_width(&self) -> usize {
        self.series.labels.iter().map(|l| l.chars().count()).max().unwrap_or(0)
    }

    fn render_bars(&self, out: &mut String) {
        let width = self.label_width();
        let max = self.series.values.iter().copied().fold(0.0_f64, f64::max);

        for (label, value) in self.series.points() {
            let len = scaled(value, max, BAR_WIDTH);
            out.push_str(&format!("{label:>width$} | {} {value:.1}\n", "█".repeat(len)));
        }
    }

    fn render_pie(&self, out: &mut String) {
        let width = self.label_width();
        let total: f64 = self.series.values.iter().map(|v| v.max(0.0)).sum();

        for (label, value) in self.series.points() {
            let share = if total > 0.0 { value.max(0.0) / total * 100.0 } else { 0.0 };
            let len = scaled(share, 100.0, BAR_WIDTH);
            out.push_str(&format!("{label:>width$}  {share:>5.1}% {}\n", "■".repeat(len)));
        }
    }

    fn render_plot(&self, out: &mut String) {
        let values = &self.series.values;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let span = max - min;

        let row_of = |v: f64| -> usize {
            if span <= f64::EPSILON {
                PLOT_HEIGHT / 2
            } else {
                (((v - min) / span) * (PLOT_HEIGHT - 1) as f64).round() as usize
            }
        };

        let columns = values.len() * COLUMN_WIDTH;
        let mut grid = vec![vec![' '; columns]; PLOT_HEIGHT];
        let centre = |i: usize| i * COLUMN_WIDTH + COLUMN_WIDTH / 2;

        if self.kind == ChartKind::Line {
            for (i, pair) in values.windows(2).enumerate() {
                let (x0, x1) = (centre(i), centre(i + 1));
                for x in x0 + 1..x1 {
                    let t = (x - x0) as f64 / (x1 - x0) as f64;
                    let v = pair[0] + (pair[1] - pair[0]) * t;
                    grid[row_of(v)][x] = '·';
                }
            }
        }

        let marker = if self.kind == ChartKind::Line { 'o' } else { '*' };
        for (i, &v) in values.iter().enumerate() {
            grid[row_of(v)][centre(i)] = marker;
        }

        for (row_idx, row) in grid.iter().enumerate().rev() {
            let tick = if row_idx == PLOT_HEIGHT - 1 {
                format!("{max:>8.1}")
            } else if row_idx == 0 {
                format!("{min:>8.1}")
            } else {
                " ".repeat(8)
            };
            let line: String = row.iter().collect();
            out.push_str(&format!("{tick} |{}\n", line.trim_end()));
        }

        out.push_str(&format!("{} +{}\n", " ".repeat(8), "-".repeat(columns)));

        let mut axis = String::new();
        for label in &self.series.labels {
            let short: String = label.chars().take(COLUMN_WIDTH - 1).collect();
            axis.push_str(&format!("{short:^COLUMN_WIDTH$}"));
        }
        out.push_str(&format!("{}  {}\n", " ".repeat(8), axis.trim_end()));
    }
}

fn scaled(value: f64, max: f64, width: usize) -> usize {
    if max <= 0.0 || !value.is_finite() {
        return 0;
    }
    ((value.max(0.0) / max) * width as f64).round() as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    fn chart(kind: ChartKind) -> Chart {
        let mut series = Series::default();
        series.push("Kerala", 30.0);
        series.push("Punjab", 10.0);
        Chart {
            kind,
            title: "Temperature by state".to_string(),
            series,
            x_label: "State".to_string(),
            y_label: "Temperature".to_string(),
        }
    }

    #[test]
    fn parse_known_kinds() {
        for kind in ChartKind::all() {
            assert_eq!(kind.as_str().parse::<ChartKind>(), Ok(*kind));
        }
        assert_eq!(" Bar ".parse::<ChartKind>(), Ok(ChartKind::Bar));
    }

    #[test]
    fn unsupported_kind_has_visible_message() {
        let err = "donut".parse::<ChartKind>().unwrap_err();
        assert_eq!(err.to_string(), "Chart type 'donut' not supported.");
    }

    #[test]
    fn pie_has_no_axis_labels() {
        let text = chart(ChartKind::Pie).render();

        assert!(text.starts_with("Temperature by state\n"));
        assert!(text.contains("75.0%"));
        assert!(text.contains("25.0%"));
        assert!(!text.contains("x: State"));
        assert!(!text.contains("y: Temperature"));
    }

    #[test]
    fn bar_has_axis_labels() {
        let text = chart(ChartKind::Bar).render();

        assert!(text.contains("x: State   y: Temperature"));
        assert!(text.contains("Kerala | "));
        assert!(text.contains("30.0"));
    }

    #[test]
    fn line_and_scatter_plot_every_point() {
        let line = chart(ChartKind::Line).render();
        assert_eq!(line.matches('o').count(), 2);
        assert!(line.contains("x: State"));

        let scatter = chart(ChartKind::Scatter).render();
        assert_eq!(scatter.matches('*').count(), 2);
        assert!(!scatter.contains('·'));
    }

    #[test]
    fn flat_series_does_not_divide_by_zero() {
        let mut c = chart(ChartKind::Line);
        c.series.values = vec![5.0, 5.0];
        let text = c.render();
        assert_eq!(text.matches('o').count(), 2);
    }

    #[test]
    fn empty_series_renders_placeholder() {
        let mut c = chart(ChartKind::Bar);
        c.series = Series::default();
        assert_eq!(c.render(), "Temperature by state\n(no data)\n");
    }

    #[test]
    fn synthetic_week_labels_end_today() {
        let mut rng = StdRng::seed_from_u64(7);
        // 2024-01-07 is a Sunday
        let today = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap();
        let series = synthetic_week(30.0, today, &mut rng);

        assert_eq!(series.labels, ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"]);
        assert_eq!(series.len(), 7);
        for (day, value) in series.values.iter().enumerate() {
            let trend = 30.0 + (day as f64 - 3.0) * 2.0;
            assert!((value - trend).abs() < 6.0, "day {day}: {value} too far from {trend}");
        }
    }

    #[test]
    fn synthetic_week_is_floored_at_zero() {
        let mut rng = StdRng::seed_from_u64(42);
        let today = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap();
        let series = synthetic_week(0.0, today, &mut rng);

        assert!(series.values.iter().all(|v| *v >= 0.0));
    }
}
