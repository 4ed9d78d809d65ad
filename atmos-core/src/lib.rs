//! Core library for the `atmos` weather assistant.
//!
//! This crate defines:
//! - The state → city catalog and free-text intent extraction
//! - Clients for the OpenWeather and WAQI upstream services
//! - Weather tips, almanac helpers and plain-text charts
//! - The presenter and the [`Assistant`] that ties a request together
//!
//! It is used by `atmos-cli`, but can also be reused by other front-ends.

pub mod advice;
pub mod almanac;
pub mod assistant;
pub mod chart;
pub mod config;
pub mod intent;
pub mod model;
pub mod present;
pub mod provider;
pub mod region;

pub use assistant::Assistant;
pub use chart::{ChartKind, UnsupportedChart};
pub use config::Config;
pub use intent::{Intent, IntentExtractor, KeywordMatcher, SubstringMatcher};
pub use model::{AirQuality, AqiReading, AqiUnavailable, Parameter, WeatherOutcome, WeatherRecord};
pub use present::{Line, Reply};
pub use provider::{AirQualitySource, WeatherSource, sources_from_config};
pub use region::{Region, RegionCatalog};
