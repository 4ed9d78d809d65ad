//! Turning fetched data into reply lines.
//!
//! Everything here is a pure function of its arguments. Randomness for the
//! synthetic trend chart is passed in.

use std::fmt;

use chrono::NaiveDate;
use rand::Rng;

use crate::{
    advice::personalized_advice,
    almanac::{format_local_datetime, format_local_time, moon_phase},
    chart::{Chart, ChartKind, Series, UnsupportedChart, synthetic_week},
    intent::Detail,
    model::{AirQuality, AqiReading, Parameter, WeatherOutcome, WeatherRecord},
    region::Region,
};

pub const NO_STATE_WARNING: &str = "I couldn't identify any Indian state in your prompt. Try again.";
pub const COMPARISON_NEEDS_BOTH: &str =
    "Please specify parameter and chart type to compare multiple states.";
pub const COMPARISON_FAILED: &str = "Could not fetch data for comparison.";
pub const NO_FAVORITES: &str = "Please select at least one state to show favorites.";
pub const SYNTHETIC_NOTE: &str =
    "Trend values are illustrative: generated around today's single reading, not recorded history.";

/// A chart kind as requested by the user; may name an unsupported kind.
pub type ChartChoice = Result<ChartKind, UnsupportedChart>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Heading(String),
    Text(String),
    Bullet(String),
    Info(String),
    Warning(String),
    Error(String),
    Chart(String),
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Line::Heading(s) => write!(f, "== {s} =="),
            Line::Text(s) => f.write_str(s),
            Line::Bullet(s) => write!(f, "  - {s}"),
            Line::Info(s) => write!(f, "info: {s}"),
            Line::Warning(s) => write!(f, "warning: {s}"),
            Line::Error(s) => write!(f, "error: {s}"),
            Line::Chart(s) => f.write_str(s.trim_end()),
        }
    }
}

/// Ordered output of one request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Reply {
    lines: Vec<Line>,
}

impl Reply {
    pub fn push(&mut self, line: Line) {
        self.lines.push(line);
    }

    pub fn extend(&mut self, other: Reply) {
        self.lines.extend(other.lines);
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn has_error(&self) -> bool {
        self.lines.iter().any(|l| matches!(l, Line::Error(_)))
    }

    fn single(line: Line) -> Self {
        Self { lines: vec![line] }
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Everything the single-state reply is built from.
#[derive(Debug, Clone)]
pub struct StateReport<'a> {
    pub region: &'a Region,
    pub record: &'a WeatherRecord,
    pub parameter: Option<Parameter>,
    pub chart: Option<&'a ChartChoice>,
    pub details: &'a [Detail],
    /// Present only when air quality was looked up.
    pub air: Option<&'a AirQuality>,
    pub today: NaiveDate,
}

pub fn no_state() -> Reply {
    Reply::single(Line::Warning(NO_STATE_WARNING.to_string()))
}

pub fn unavailable() -> Reply {
    Reply::single(Line::Error(WeatherOutcome::UNAVAILABLE_MESSAGE.to_string()))
}

pub fn comparison_incomplete() -> Reply {
    Reply::single(Line::Info(COMPARISON_NEEDS_BOTH.to_string()))
}

pub fn single_state<R: Rng>(report: &StateReport<'_>, rng: &mut R) -> Reply {
    let StateReport { region, record, .. } = *report;
    let mut reply = Reply::default();

    reply.push(Line::Heading(format!("{} — {}", region.name, capitalize(&record.description))));

    if let Some(param) = report.parameter {
        reply.push(Line::Text(format!("{}: {}", param.label(), param.display_value(record))));

        if let Some(choice) = report.chart {
            let series = synthetic_week(param.value_of(record), report.today, rng);
            let title = format!("{} in {} - Last 7 Days", param.label(), region.name);
            reply.extend(chart_block(choice, title, series, "Day", param.label()));
            if choice.is_ok() {
                reply.push(Line::Info(SYNTHETIC_NOTE.to_string()));
            }
        }
    }

    for detail in report.details {
        match detail {
            Detail::Humidity => reply.push(Line::Text(format!("Humidity: {} %", record.humidity_pct))),
            Detail::Pressure => {
                reply.push(Line::Text(format!("Pressure: {} hPa", record.pressure_hpa)))
            }
            Detail::Cloud => {
                reply.push(Line::Text(format!("Cloud Coverage: {} %", record.cloud_pct)))
            }
            Detail::Sunrise => reply.push(Line::Text(format!(
                "Sunrise: {}",
                format_local_time(record.sunrise, record.timezone_offset)
            ))),
            Detail::Sunset => reply.push(Line::Text(format!(
                "Sunset: {}",
                format_local_time(record.sunset, record.timezone_offset)
            ))),
            Detail::Moon => {
                reply.push(Line::Text(format!("Moon Phase: {}", moon_phase(report.today))))
            }
            Detail::AirQuality => {
                if let Some(line) = report.air.and_then(aqi_line) {
                    reply.push(line);
                }
            }
            Detail::Alerts => {
                if record.alerts.is_empty() {
                    reply.push(Line::Text("No active weather alerts.".to_string()));
                } else {
                    reply.extend(alert_lines(record));
                }
            }
            Detail::Tips => reply.extend(tip_lines(record)),
        }
    }

    reply
}

/// One real reading per state, charted side by side.
pub fn comparison(parameter: Parameter, chart: &ChartChoice, readings: Series) -> Reply {
    if let Err(unsupported) = chart {
        return Reply::single(Line::Error(unsupported.to_string()));
    }
    if readings.is_empty() {
        return Reply::single(Line::Error(COMPARISON_FAILED.to_string()));
    }

    let title = format!("{} Comparison", parameter.label());
    chart_block(chart, title, readings, "State", parameter.label())
}

/// Full field set for a directly selected state.
pub fn quick_view(
    region: &Region,
    record: &WeatherRecord,
    air: &AirQuality,
    today: NaiveDate,
) -> Reply {
    let mut reply = Reply::default();
    let tz = record.timezone_offset;

    reply.push(Line::Heading(format!("{} — {}", region.name, capitalize(&record.description))));
    for text in [
        format!("Temperature: {} °C", record.temperature_c),
        format!("Humidity: {} %", record.humidity_pct),
        format!("Pressure: {} hPa", record.pressure_hpa),
        format!("Rainfall (last hour): {} mm", record.rainfall_mm),
        format!("Cloud Coverage: {} %", record.cloud_pct),
        format!("Moon Phase: {}", moon_phase(today)),
        format!("Sunrise: {}", format_local_time(record.sunrise, tz)),
        format!("Sunset: {}", format_local_time(record.sunset, tz)),
    ] {
        reply.push(Line::Text(text));
    }

    if let Some(line) = aqi_line(air) {
        reply.push(line);
    }
    if !record.alerts.is_empty() {
        reply.extend(alert_lines(record));
    }
    reply.extend(tip_lines(record));

    reply
}

/// One favorite state's fetched data.
#[derive(Debug, Clone)]
pub struct FavoriteEntry<'a> {
    pub region: &'a Region,
    pub outcome: WeatherOutcome,
    /// Only looked up when the weather was available.
    pub air: Option<AirQuality>,
}

pub fn favorites(entries: &[FavoriteEntry<'_>]) -> Reply {
    if entries.is_empty() {
        return Reply::single(Line::Info(NO_FAVORITES.to_string()));
    }

    let mut reply = Reply::default();
    for entry in entries {
        let Some(record) = entry.outcome.record() else {
            reply.push(Line::Error(format!(
                "{}: {}",
                entry.region.name,
                WeatherOutcome::UNAVAILABLE_MESSAGE
            )));
            continue;
        };

        reply.push(Line::Heading(entry.region.name.to_string()));
        reply.push(Line::Text(format!("Temperature: {} °C", record.temperature_c)));
        reply.push(Line::Text(format!("Humidity: {} %", record.humidity_pct)));
        reply.push(Line::Text(format!("Pressure: {} hPa", record.pressure_hpa)));
        reply.push(Line::Text(format!("Cloud Coverage: {} %", record.cloud_pct)));
        if let Some(line) = entry.air.as_ref().and_then(aqi_line) {
            reply.push(line);
        }
    }

    reply
}

fn chart_block(choice: &ChartChoice, title: String, series: Series, x: &str, y: &str) -> Reply {
    match choice {
        Ok(kind) => {
            let chart = Chart {
                kind: *kind,
                title,
                series,
                x_label: x.to_string(),
                y_label: y.to_string(),
            };
            Reply::single(Line::Chart(chart.render()))
        }
        Err(unsupported) => Reply::single(Line::Error(unsupported.to_string())),
    }
}

fn aqi_line(air: &AirQuality) -> Option<Line> {
    let AqiReading { index, dominant_pollutant } = air.as_ref().ok()?;
    let index = (*index)?;

    let text = match dominant_pollutant {
        Some(pol) => format!("AQI: {index} (Dominant Pollutant: {})", pol.to_uppercase()),
        None => format!("AQI: {index}"),
    };
    Some(Line::Text(text))
}

fn alert_lines(record: &WeatherRecord) -> Reply {
    let tz = record.timezone_offset;
    let when = |ts: Option<i64>| {
        ts.map(|t| format_local_datetime(t, tz)).unwrap_or_else(|| "unknown".to_string())
    };

    let mut reply = Reply::single(Line::Warning("Weather Alerts:".to_string()));
    for alert in &record.alerts {
        reply.push(Line::Bullet(format!(
            "{} from {} to {}",
            alert.event.as_deref().unwrap_or("Alert"),
            when(alert.start),
            when(alert.end),
        )));
    }
    reply
}

fn tip_lines(record: &WeatherRecord) -> Reply {
    let advice =
        personalized_advice(record.temperature_c, record.humidity_pct as f64, record.rainfall_mm);

    let mut reply = Reply::single(Line::Info("Weather Tips:".to_string()));
    for tip in advice {
        reply.push(Line::Bullet(tip.to_string()));
    }
    reply
}

/// First character upper-cased, the rest lower-cased.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        advice::{DEFAULT_TIP, HEAT_TIP},
        model::{Alert, AqiUnavailable, fixtures},
        region::RegionCatalog,
    };
    use rand::{SeedableRng, rngs::StdRng};
    use reqwest::StatusCode;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 7).unwrap()
    }

    fn kerala(catalog: &RegionCatalog) -> &Region {
        catalog.find("Kerala").unwrap()
    }

    fn texts(reply: &Reply) -> Vec<String> {
        reply.lines().iter().map(ToString::to_string).collect()
    }

    #[test]
    fn capitalize_matches_sentence_case() {
        assert_eq!(capitalize("broken CLOUDS"), "Broken clouds");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn heading_and_parameter_line() {
        let catalog = RegionCatalog::india();
        let record = fixtures::record(29.5, 70, 0.0);
        let report = StateReport {
            region: kerala(&catalog),
            record: &record,
            parameter: Some(Parameter::Temperature),
            chart: None,
            details: &[],
            air: None,
            today: today(),
        };

        let reply = single_state(&report, &mut StdRng::seed_from_u64(1));

        assert_eq!(
            reply.lines(),
            [
                Line::Heading("Kerala — Scattered clouds".to_string()),
                Line::Text("Temperature: 29.5 °C".to_string()),
            ]
        );
    }

    #[test]
    fn chart_request_adds_synthetic_chart_and_note() {
        let catalog = RegionCatalog::india();
        let record = fixtures::record(29.5, 70, 0.0);
        let choice: ChartChoice = Ok(ChartKind::Line);
        let report = StateReport {
            region: kerala(&catalog),
            record: &record,
            parameter: Some(Parameter::Temperature),
            chart: Some(&choice),
            details: &[],
            air: None,
            today: today(),
        };

        let reply = single_state(&report, &mut StdRng::seed_from_u64(1));
        let lines = reply.lines();

        let Line::Chart(chart) = &lines[2] else { panic!("expected a chart, got {:?}", lines[2]) };
        assert!(chart.starts_with("Temperature in Kerala - Last 7 Days"));
        assert!(chart.contains("x: Day   y: Temperature"));
        assert_eq!(lines[3], Line::Info(SYNTHETIC_NOTE.to_string()));
    }

    #[test]
    fn pie_chart_has_no_axis_labels() {
        let catalog = RegionCatalog::india();
        let record = fixtures::record(29.5, 70, 0.0);
        let choice: ChartChoice = Ok(ChartKind::Pie);
        let report = StateReport {
            region: kerala(&catalog),
            record: &record,
            parameter: Some(Parameter::Temperature),
            chart: Some(&choice),
            details: &[],
            air: None,
            today: today(),
        };

        let reply = single_state(&report, &mut StdRng::seed_from_u64(3));
        let Line::Chart(chart) = &reply.lines()[2] else { panic!("expected a chart") };

        assert!(!chart.contains("x: Day"));
        assert!(!chart.contains("y: Temperature"));
    }

    #[test]
    fn unsupported_chart_is_a_visible_error() {
        let catalog = RegionCatalog::india();
        let record = fixtures::record(29.5, 70, 0.0);
        let choice: ChartChoice = "donut".parse::<ChartKind>();
        let report = StateReport {
            region: kerala(&catalog),
            record: &record,
            parameter: Some(Parameter::Humidity),
            chart: Some(&choice),
            details: &[],
            air: None,
            today: today(),
        };

        let reply = single_state(&report, &mut StdRng::seed_from_u64(1));

        assert_eq!(reply.lines()[2], Line::Error("Chart type 'donut' not supported.".to_string()));
        assert_eq!(reply.lines().len(), 3);
    }

    #[test]
    fn chart_without_parameter_is_ignored() {
        let catalog = RegionCatalog::india();
        let record = fixtures::record(29.5, 70, 0.0);
        let choice: ChartChoice = Ok(ChartKind::Bar);
        let report = StateReport {
            region: kerala(&catalog),
            record: &record,
            parameter: None,
            chart: Some(&choice),
            details: &[],
            air: None,
            today: today(),
        };

        let reply = single_state(&report, &mut StdRng::seed_from_u64(1));
        assert_eq!(reply.lines().len(), 1);
    }

    #[test]
    fn details_render_in_order() {
        let catalog = RegionCatalog::india();
        let mut record = fixtures::record(36.2, 50, 0.0);
        record.alerts.push(Alert { event: None, start: Some(1_700_000_000), end: None });
        let air: AirQuality =
            Ok(AqiReading { index: Some(152), dominant_pollutant: Some("pm25".to_string()) });
        let details = [Detail::Pressure, Detail::Sunrise, Detail::AirQuality, Detail::Alerts, Detail::Tips];
        let report = StateReport {
            region: kerala(&catalog),
            record: &record,
            parameter: None,
            chart: None,
            details: &details,
            air: Some(&air),
            today: today(),
        };

        let reply = single_state(&report, &mut StdRng::seed_from_u64(1));

        assert_eq!(
            texts(&reply)[1..],
            [
                "Pressure: 1008 hPa".to_string(),
                "Sunrise: 03:43 AM".to_string(),
                "AQI: 152 (Dominant Pollutant: PM25)".to_string(),
                "warning: Weather Alerts:".to_string(),
                "  - Alert from 2023-11-15 03:43 AM to unknown".to_string(),
                "info: Weather Tips:".to_string(),
                format!("  - {HEAT_TIP}"),
            ]
        );
    }

    #[test]
    fn no_alerts_message_and_missing_aqi_is_silent() {
        let catalog = RegionCatalog::india();
        let record = fixtures::record(20.0, 50, 0.0);
        let air: AirQuality = Err(AqiUnavailable::Transport("timed out".into()));
        let details = [Detail::AirQuality, Detail::Alerts];
        let report = StateReport {
            region: kerala(&catalog),
            record: &record,
            parameter: None,
            chart: None,
            details: &details,
            air: Some(&air),
            today: today(),
        };

        let reply = single_state(&report, &mut StdRng::seed_from_u64(1));

        assert_eq!(texts(&reply)[1..], ["No active weather alerts.".to_string()]);
        assert!(!reply.has_error());
    }

    #[test]
    fn comparison_charts_real_values() {
        let mut readings = Series::default();
        readings.push("Goa", 31.0);
        readings.push("Punjab", 18.0);

        let reply = comparison(Parameter::Temperature, &Ok(ChartKind::Bar), readings);
        let Line::Chart(chart) = &reply.lines()[0] else { panic!("expected a chart") };

        assert!(chart.starts_with("Temperature Comparison"));
        assert!(chart.contains("31.0"));
        assert!(chart.contains("x: State   y: Temperature"));
    }

    #[test]
    fn comparison_without_data_is_an_error() {
        let reply = comparison(Parameter::Humidity, &Ok(ChartKind::Pie), Series::default());
        assert_eq!(reply.lines(), [Line::Error(COMPARISON_FAILED.to_string())]);
    }

    #[test]
    fn comparison_with_unsupported_chart_reports_it() {
        let chart: ChartChoice = "radar".parse();
        let reply = comparison(Parameter::Humidity, &chart, Series::default());

        assert_eq!(reply.lines(), [Line::Error("Chart type 'radar' not supported.".to_string())]);
    }

    #[test]
    fn quick_view_shows_full_field_set() {
        let catalog = RegionCatalog::india();
        let record = fixtures::record(20.0, 50, 0.0);
        let air: AirQuality = Err(AqiUnavailable::MissingToken);

        let reply = quick_view(kerala(&catalog), &record, &air, today());
        let lines = texts(&reply);

        assert_eq!(lines[0], "== Kerala — Scattered clouds ==");
        assert_eq!(lines[1], "Temperature: 20 °C");
        assert_eq!(lines[4], "Rainfall (last hour): 0 mm");
        assert_eq!(lines[6], "Moon Phase: Waxing Crescent");
        assert!(!lines.iter().any(|l| l.starts_with("AQI")));
        assert!(!lines.iter().any(|l| l.contains("Weather Alerts")));
        assert_eq!(lines.last().unwrap(), &format!("  - {DEFAULT_TIP}"));
    }

    #[test]
    fn favorites_continue_past_failures() {
        let catalog = RegionCatalog::india();
        let entries = vec![
            FavoriteEntry {
                region: catalog.find("Goa").unwrap(),
                outcome: WeatherOutcome::Unavailable(StatusCode::NOT_FOUND),
                air: None,
            },
            FavoriteEntry {
                region: catalog.find("Sikkim").unwrap(),
                outcome: WeatherOutcome::Observed(fixtures::record(8.0, 85, 1.0)),
                air: Some(Ok(AqiReading { index: Some(40), dominant_pollutant: None })),
            },
        ];

        let lines = texts(&favorites(&entries));

        assert_eq!(
            lines,
            [
                "error: Goa: Could not fetch weather data.",
                "== Sikkim ==",
                "Temperature: 8 °C",
                "Humidity: 85 %",
                "Pressure: 1008 hPa",
                "Cloud Coverage: 40 %",
                "AQI: 40",
            ]
        );
    }

    #[test]
    fn empty_favorites_is_informational() {
        assert_eq!(favorites(&[]).lines(), [Line::Info(NO_FAVORITES.to_string())]);
    }
}
