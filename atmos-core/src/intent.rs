//! Free-text intent extraction.
//!
//! Extraction is plain keyword containment over the lowercased prompt: no
//! negation, quantities or word boundaries. "goal" matches "Goa", and that is
//! kept on purpose. A stricter [`KeywordMatcher`] can be plugged into
//! [`IntentExtractor`] without touching callers.

use std::fmt::Debug;

use crate::{
    chart::ChartKind,
    model::Parameter,
    region::{Region, RegionCatalog},
};

/// Chart keywords in priority order.
const CHART_KEYWORDS: [(&str, ChartKind); 4] = [
    ("line", ChartKind::Line),
    ("bar", ChartKind::Bar),
    ("scatter", ChartKind::Scatter),
    ("pie", ChartKind::Pie),
];

/// Parameter keywords in priority order. "rainfall" and "rain" are aliases.
const PARAMETER_KEYWORDS: [(&str, Parameter); 6] = [
    ("temperature", Parameter::Temperature),
    ("humidity", Parameter::Humidity),
    ("pressure", Parameter::Pressure),
    ("cloud", Parameter::Cloud),
    ("rainfall", Parameter::Rainfall),
    ("rain", Parameter::Rainfall),
];

/// Extra facts a single-state prompt can ask for, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Detail {
    Humidity,
    Pressure,
    Cloud,
    Sunrise,
    Sunset,
    Moon,
    AirQuality,
    Alerts,
    Tips,
}

impl Detail {
    pub const ALL: [Detail; 9] = [
        Detail::Humidity,
        Detail::Pressure,
        Detail::Cloud,
        Detail::Sunrise,
        Detail::Sunset,
        Detail::Moon,
        Detail::AirQuality,
        Detail::Alerts,
        Detail::Tips,
    ];

    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Detail::Humidity => &["humidity"],
            Detail::Pressure => &["pressure"],
            Detail::Cloud => &["cloud"],
            Detail::Sunrise => &["sunrise"],
            Detail::Sunset => &["sunset"],
            Detail::Moon => &["moon"],
            Detail::AirQuality => &["aqi", "air"],
            Detail::Alerts => &["alert"],
            Detail::Tips => &["tip", "advice", "suggestion"],
        }
    }
}

/// Decides whether a keyword occurs in a (lowercased) text.
pub trait KeywordMatcher: Send + Sync + Debug {
    fn matches(&self, text: &str, keyword: &str) -> bool;
}

/// Substring containment, no word-boundary check.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubstringMatcher;

impl KeywordMatcher for SubstringMatcher {
    fn matches(&self, text: &str, keyword: &str) -> bool {
        text.contains(keyword)
    }
}

/// What a prompt asks for.
#[derive(Debug, Clone, PartialEq)]
pub struct Intent<'a> {
    /// Matched states, in catalog order.
    pub states: Vec<&'a Region>,
    pub parameter: Option<Parameter>,
    pub chart: Option<ChartKind>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    NoState,
    Single,
    Comparison,
}

impl Intent<'_> {
    pub fn route(&self) -> Route {
        match self.states.len() {
            0 => Route::NoState,
            1 => Route::Single,
            _ => Route::Comparison,
        }
    }
}

#[derive(Debug, Clone)]
pub struct IntentExtractor<'a, M = SubstringMatcher> {
    catalog: &'a RegionCatalog,
    matcher: M,
}

impl<'a> IntentExtractor<'a> {
    pub fn new(catalog: &'a RegionCatalog) -> Self {
        Self::with_matcher(catalog, SubstringMatcher)
    }
}

impl<'a, M: KeywordMatcher> IntentExtractor<'a, M> {
    pub fn with_matcher(catalog: &'a RegionCatalog, matcher: M) -> Self {
        Self { catalog, matcher }
    }

    pub fn catalog(&self) -> &'a RegionCatalog {
        self.catalog
    }

    /// Details mentioned anywhere in `text`, in display order.
    pub fn details(&self, text: &str) -> Vec<Detail> {
        let lowered = text.to_lowercase();

        Detail::ALL
            .into_iter()
            .filter(|d| d.keywords().iter().any(|kw| self.matcher.matches(&lowered, kw)))
            .collect()
    }

    pub fn extract(&self, text: &str) -> Intent<'a> {
        let lowered = text.to_lowercase();

        Intent {
            states: self.extract_states(&lowered),
            parameter: self.first_keyword(&lowered, &PARAMETER_KEYWORDS),
            chart: self.first_keyword(&lowered, &CHART_KEYWORDS),
        }
    }

    /// Every state whose lowercased name occurs in `lowered`.
    fn extract_states(&self, lowered: &str) -> Vec<&'a Region> {
        self.catalog
            .iter()
            .filter(|region| self.matcher.matches(lowered, &region.name.to_lowercase()))
            .collect()
    }

    fn first_keyword<T: Copy>(&self, lowered: &str, keywords: &[(&str, T)]) -> Option<T> {
        keywords
            .iter()
            .find(|(kw, _)| self.matcher.matches(lowered, kw))
            .map(|&(_, value)| value)
    }
}
