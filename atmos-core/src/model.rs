use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Current conditions for one city, as reported by the weather service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub temperature_c: f64,
    pub humidity_pct: i64,
    pub pressure_hpa: i64,
    pub description: String,
    pub cloud_pct: i64,
    pub sunrise: i64,
    pub sunset: i64,
    /// Offset from UTC in seconds.
    pub timezone_offset: i64,
    pub rainfall_mm: f64,
    pub alerts: Vec<Alert>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub event: Option<String>,
    pub start: Option<i64>,
    pub end: Option<i64>,
}

/// Result of a weather lookup that reached the service.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherOutcome {
    Observed(WeatherRecord),
    /// The service answered with a non-success status.
    Unavailable(StatusCode),
}

impl WeatherOutcome {
    pub const UNAVAILABLE_MESSAGE: &'static str = "Could not fetch weather data.";

    pub fn record(&self) -> Option<&WeatherRecord> {
        match self {
            WeatherOutcome::Observed(record) => Some(record),
            WeatherOutcome::Unavailable(_) => None,
        }
    }
}

/// A weather quantity the assistant can report or chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parameter {
    Temperature,
    Humidity,
    Pressure,
    Cloud,
    Rainfall,
}

impl Parameter {
    pub fn label(&self) -> &'static str {
        match self {
            Parameter::Temperature => "Temperature",
            Parameter::Humidity => "Humidity",
            Parameter::Pressure => "Pressure",
            Parameter::Cloud => "Cloud",
            Parameter::Rainfall => "Rainfall",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Parameter::Temperature => "°C",
            Parameter::Humidity | Parameter::Cloud => "%",
            Parameter::Pressure => "hPa",
            Parameter::Rainfall => "mm",
        }
    }

    pub fn value_of(&self, record: &WeatherRecord) -> f64 {
        match self {
            Parameter::Temperature => record.temperature_c,
            Parameter::Humidity => record.humidity_pct as f64,
            Parameter::Pressure => record.pressure_hpa as f64,
            Parameter::Cloud => record.cloud_pct as f64,
            Parameter::Rainfall => record.rainfall_mm,
        }
    }

    /// Value with its unit, keeping integer quantities integral.
    pub fn display_value(&self, record: &WeatherRecord) -> String {
        match self {
            Parameter::Temperature => format!("{} {}", record.temperature_c, self.unit()),
            Parameter::Humidity => format!("{} {}", record.humidity_pct, self.unit()),
            Parameter::Pressure => format!("{} {}", record.pressure_hpa, self.unit()),
            Parameter::Cloud => format!("{} {}", record.cloud_pct, self.unit()),
            Parameter::Rainfall => format!("{} {}", record.rainfall_mm, self.unit()),
        }
    }
}

impl std::fmt::Display for Parameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Air quality index and its dominant pollutant code.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AqiReading {
    pub index: Option<i64>,
    pub dominant_pollutant: Option<String>,
}

impl AqiReading {
    pub fn pair(self) -> (Option<i64>, Option<String>) {
        (self.index, self.dominant_pollutant)
    }
}

/// Why no air quality reading is available.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AqiUnavailable {
    #[error("no air quality token configured")]
    MissingToken,
    #[error("air quality request failed: {0}")]
    Transport(String),
    #[error("air quality service returned HTTP {0}")]
    HttpStatus(u16),
    #[error("air quality service reported status '{0}'")]
    Status(String),
    #[error("malformed air quality response: {0}")]
    Malformed(String),
}

/// Best-effort air quality lookup result.
pub type AirQuality = Result<AqiReading, AqiUnavailable>;

/// Collapse every failure into `(None, None)`.
pub fn flatten(air: AirQuality) -> (Option<i64>, Option<String>) {
    air.map(AqiReading::pair).unwrap_or((None, None))
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameter_values_and_units() {
        let rec = fixtures::record(31.5, 70, 1.25);

        assert_eq!(Parameter::Temperature.value_of(&rec), 31.5);
        assert_eq!(Parameter::Humidity.display_value(&rec), "70 %");
        assert_eq!(Parameter::Pressure.display_value(&rec), "1008 hPa");
        assert_eq!(Parameter::Cloud.display_value(&rec), "40 %");
        assert_eq!(Parameter::Rainfall.display_value(&rec), "1.25 mm");
        assert_eq!(Parameter::Temperature.display_value(&rec), "31.5 °C");
    }

    #[test]
    fn outcome_record_only_when_observed() {
        let observed = WeatherOutcome::Observed(fixtures::record(20.0, 50, 0.0));
        assert!(observed.record().is_some());

        let missing = WeatherOutcome::Unavailable(StatusCode::NOT_FOUND);
        assert!(missing.record().is_none());
    }

    #[test]
    fn flatten_unifies_failures() {
        assert_eq!(flatten(Err(AqiUnavailable::MissingToken)), (None, None));
        assert_eq!(flatten(Err(AqiUnavailable::Malformed("eof".into()))), (None, None));

        let ok = AqiReading { index: Some(87), dominant_pollutant: Some("pm25".into()) };
        assert_eq!(flatten(Ok(ok)), (Some(87), Some("pm25".to_string())));
    }
}
