use anyhow::{Result, anyhow};
use chrono::{Local, NaiveDate};

use crate::{
    chart::{ChartKind, Series},
    intent::{Detail, IntentExtractor, Route},
    model::{Parameter, WeatherOutcome},
    present::{self, ChartChoice, FavoriteEntry, Reply, StateReport},
    provider::{AirQualitySource, WeatherSource},
    region::{Region, RegionCatalog},
};

/// Runs one request end to end: extract, fetch, render.
///
/// Fetches happen one after another and nothing is cached, so asking the
/// same thing twice hits the network twice.
#[derive(Debug)]
pub struct Assistant<'a> {
    extractor: IntentExtractor<'a>,
    weather: Box<dyn WeatherSource>,
    air: Box<dyn AirQualitySource>,
}

impl<'a> Assistant<'a> {
    pub fn new(
        catalog: &'a RegionCatalog,
        weather: Box<dyn WeatherSource>,
        air: Box<dyn AirQualitySource>,
    ) -> Self {
        Self { extractor: IntentExtractor::new(catalog), weather, air }
    }

    pub fn catalog(&self) -> &'a RegionCatalog {
        self.extractor.catalog()
    }

    /// Answer a free-text prompt. `chart_override` replaces whatever chart
    /// kind the prompt mentions and may name an unsupported kind.
    ///
    /// Errors only when the weather service could not be reached or sent a
    /// body that does not match its documented shape.
    pub async fn answer(&self, prompt: &str, chart_override: Option<&str>) -> Result<Reply> {
        let intent = self.extractor.extract(prompt);
        let chart: Option<ChartChoice> = match chart_override {
            Some(kind) => Some(kind.parse::<ChartKind>()),
            None => intent.chart.map(Ok),
        };

        tracing::info!(
            states = ?intent.states.iter().map(|r| r.name).collect::<Vec<_>>(),
            parameter = ?intent.parameter,
            chart = ?chart,
            "prompt interpreted"
        );

        match intent.route() {
            Route::NoState => Ok(present::no_state()),
            Route::Single => {
                let details = self.extractor.details(prompt);
                self.answer_single(intent.states[0], intent.parameter, chart.as_ref(), &details)
                    .await
            }
            Route::Comparison => {
                self.answer_comparison(&intent.states, intent.parameter, chart.as_ref()).await
            }
        }
    }

    async fn answer_single(
        &self,
        region: &Region,
        parameter: Option<Parameter>,
        chart: Option<&ChartChoice>,
        details: &[Detail],
    ) -> Result<Reply> {
        let outcome = self.weather.current(region.city).await?;
        let Some(record) = outcome.record() else {
            return Ok(present::unavailable());
        };

        let air = if details.contains(&Detail::AirQuality) {
            Some(self.air.lookup(region.city).await)
        } else {
            None
        };

        let report = StateReport {
            region,
            record,
            parameter,
            chart,
            details,
            air: air.as_ref(),
            today: today(),
        };

        Ok(present::single_state(&report, &mut rand::thread_rng()))
    }

    async fn answer_comparison(
        &self,
        states: &[&Region],
        parameter: Option<Parameter>,
        chart: Option<&ChartChoice>,
    ) -> Result<Reply> {
        let (Some(parameter), Some(chart)) = (parameter, chart) else {
            return Ok(present::comparison_incomplete());
        };
        if chart.is_err() {
            return Ok(present::comparison(parameter, chart, Series::default()));
        }

        let mut readings = Series::default();
        for region in states {
            match self.weather.current(region.city).await? {
                WeatherOutcome::Observed(record) => {
                    readings.push(region.name, parameter.value_of(&record));
                }
                WeatherOutcome::Unavailable(status) => {
                    tracing::warn!(state = region.name, %status, "left out of comparison");
                }
            }
        }

        Ok(present::comparison(parameter, chart, readings))
    }

    /// Full report for one directly selected state.
    pub async fn quick_view(&self, state: &str) -> Result<Reply> {
        let region = self.region(state)?;

        let outcome = self.weather.current(region.city).await?;
        let Some(record) = outcome.record() else {
            return Ok(present::unavailable());
        };
        let air = self.air.lookup(region.city).await;

        Ok(present::quick_view(region, record, &air, today()))
    }

    /// Short report for each selected favorite. A state whose weather is
    /// unavailable gets an error line and the rest still run.
    pub async fn favorites<S: AsRef<str>>(&self, states: &[S]) -> Result<Reply> {
        let regions = states
            .iter()
            .map(|s| self.region(s.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        let mut entries = Vec::with_capacity(regions.len());
        for region in regions {
            let outcome = self.weather.current(region.city).await?;
            let air = match outcome.record() {
                Some(_) => Some(self.air.lookup(region.city).await),
                None => None,
            };
            entries.push(FavoriteEntry { region, outcome, air });
        }

        Ok(present::favorites(&entries))
    }

    fn region(&self, state: &str) -> Result<&'a Region> {
        self.catalog().find(state).ok_or_else(|| {
            anyhow!(
                "Unknown state '{state}'.\n\
                 Hint: run `atmos states` to list the supported states."
            )
        })
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
