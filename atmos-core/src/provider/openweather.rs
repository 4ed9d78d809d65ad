use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    Config,
    model::{Alert, WeatherOutcome, WeatherRecord},
    provider::{http_client, truncate_body},
};

use super::WeatherSource;

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: String, base_url: impl Into<String>, http: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { api_key, base_url, http }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config.openweather_api_key()?.to_owned();
        Ok(Self::new(api_key, config.openweather.base_url.clone(), http_client(config)?))
    }

    async fn fetch_current(&self, city: &str) -> Result<WeatherOutcome> {
        let url = format!("{}/weather", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[("q", city), ("appid", self.api_key.as_str()), ("units", "metric")])
            .send()
            .await
            .with_context(|| format!("Failed to send request to OpenWeather for '{city}'"))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read OpenWeather current response body")?;

        if !status.is_success() {
            tracing::warn!(%city, %status, body = %truncate_body(&body), "weather lookup rejected");
            return Ok(WeatherOutcome::Unavailable(status));
        }

        let parsed: OwCurrentResponse = serde_json::from_str(&body)
            .with_context(|| format!("Failed to parse OpenWeather current JSON for '{city}'"))?;

        Ok(WeatherOutcome::Observed(parsed.into_record()?))
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: i64,
    pressure: i64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwClouds {
    all: i64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwRain {
    #[serde(rename = "1h", default)]
    one_hour: f64,
}

#[derive(Debug, Deserialize)]
struct OwAlert {
    event: Option<String>,
    start: Option<i64>,
    end: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    main: OwMain,
    weather: Vec<OwWeather>,
    clouds: OwClouds,
    sys: OwSys,
    timezone: i64,
    #[serde(default)]
    rain: Option<OwRain>,
    #[serde(default)]
    alerts: Vec<OwAlert>,
}

impl OwCurrentResponse {
    fn into_record(self) -> Result<WeatherRecord> {
        let description = self
            .weather
            .into_iter()
            .next()
            .map(|w| w.description)
            .ok_or_else(|| anyhow!("OpenWeather response contained no weather conditions"))?;

        let alerts = self
            .alerts
            .into_iter()
            .map(|a| Alert { event: a.event, start: a.start, end: a.end })
            .collect();

        Ok(WeatherRecord {
            temperature_c: self.main.temp,
            humidity_pct: self.main.humidity,
            pressure_hpa: self.main.pressure,
            description,
            cloud_pct: self.clouds.all,
            sunrise: self.sys.sunrise,
            sunset: self.sys.sunset,
            timezone_offset: self.timezone,
            rainfall_mm: self.rain.map(|r| r.one_hour).unwrap_or(0.0),
            alerts,
        })
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherClient {
    async fn current(&self, city: &str) -> Result<WeatherOutcome> {
        tracing::debug!(%city, "fetching current weather");
        self.fetch_current(city).await
    }
}
