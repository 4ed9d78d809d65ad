use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    Config,
    model::{AirQuality, AqiReading, AqiUnavailable},
    provider::http_client,
};

use super::AirQualitySource;

/// Client for the World Air Quality Index city feed.
#[derive(Debug, Clone)]
pub struct WaqiClient {
    token: Option<String>,
    base_url: String,
    http: Client,
}

impl WaqiClient {
    pub fn new(token: Option<String>, base_url: impl Into<String>, http: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { token, base_url, http }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            config.waqi_token().map(str::to_owned),
            config.waqi.base_url.clone(),
            http_client(config)?,
        ))
    }

    async fn fetch(&self, city: &str) -> AirQuality {
        let token = self.token.as_deref().ok_or(AqiUnavailable::MissingToken)?;
        let url = format!("{}/feed/{}/", self.base_url, city);

        let res = self
            .http
            .get(&url)
            .query(&[("token", token)])
            .send()
            .await
            .map_err(|e| AqiUnavailable::Transport(e.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            return Err(AqiUnavailable::HttpStatus(status.as_u16()));
        }

        let body = res.text().await.map_err(|e| AqiUnavailable::Transport(e.to_string()))?;

        let envelope: WaqiEnvelope =
            serde_json::from_str(&body).map_err(|e| AqiUnavailable::Malformed(e.to_string()))?;

        if envelope.status != "ok" {
            return Err(AqiUnavailable::Status(envelope.status));
        }

        let feed: WaqiFeed = serde_json::from_value(envelope.data)
            .map_err(|e| AqiUnavailable::Malformed(e.to_string()))?;

        Ok(feed.into_reading())
    }
}

#[derive(Debug, Deserialize)]
struct WaqiEnvelope {
    status: String,
    #[serde(default)]
    data: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct WaqiFeed {
    // A number, or "-" when the station has no reading.
    aqi: serde_json::Value,
    #[serde(default)]
    dominentpol: Option<String>,
}

impl WaqiFeed {
    fn into_reading(self) -> AqiReading {
        AqiReading {
            index: self.aqi.as_i64(),
            dominant_pollutant: self.dominentpol.filter(|p| !p.is_empty()),
        }
    }
}

#[async_trait]
impl AirQualitySource for WaqiClient {
    async fn lookup(&self, city: &str) -> AirQuality {
        let result = self.fetch(city).await;

        match &result {
            Ok(reading) => tracing::debug!(%city, aqi = ?reading.index, "air quality fetched"),
            Err(AqiUnavailable::MissingToken) => tracing::debug!(%city, "air quality skipped, no token"),
            Err(reason) => tracing::warn!(%city, %reason, "air quality unavailable"),
        }

        result
    }
}
