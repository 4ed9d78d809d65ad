use crate::{
    Config,
    model::{AirQuality, WeatherOutcome},
    provider::{openweather::OpenWeatherClient, waqi::WaqiClient},
};
use anyhow::Context;
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;
pub mod waqi;

/// Current-conditions lookup for a city.
///
/// A non-success HTTP status is an [`WeatherOutcome::Unavailable`] value.
/// Transport failures and malformed bodies are errors and end the request.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn current(&self, city: &str) -> anyhow::Result<WeatherOutcome>;
}

/// Best-effort air quality lookup. Never fails; every problem is folded
/// into the `Err` side of [`AirQuality`].
#[async_trait]
pub trait AirQualitySource: Send + Sync + Debug {
    async fn lookup(&self, city: &str) -> AirQuality;
}

/// Build both upstream clients from config.
pub fn sources_from_config(
    config: &Config,
) -> anyhow::Result<(Box<dyn WeatherSource>, Box<dyn AirQualitySource>)> {
    let weather: Box<dyn WeatherSource> = Box::new(OpenWeatherClient::from_config(config)?);
    let air: Box<dyn AirQualitySource> = Box::new(WaqiClient::from_config(config)?);

    Ok((weather, air))
}

/// Shared HTTP client with the configured timeout.
pub(crate) fn http_client(config: &Config) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(config.timeout())
        .build()
        .context("Failed to build HTTP client")
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let cut = (0..=MAX).rev().find(|&i| body.is_char_boundary(i)).unwrap_or(0);
        format!("{}...", &body[..cut])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sources_require_openweather_key() {
        let err = sources_from_config(&Config::default()).unwrap_err();
        assert!(err.to_string().contains("No OpenWeather API key configured"));
    }

    #[test]
    fn sources_build_without_waqi_token() {
        let mut cfg = Config::default();
        cfg.openweather.api_key = Some("KEY".to_string());

        assert!(sources_from_config(&cfg).is_ok());
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let body = "é".repeat(150);
        let cut = truncate_body(&body);

        assert!(cut.ends_with("..."));
        assert!(cut.len() <= 203);
        assert_eq!(truncate_body("short"), "short");
    }
}
