//! Weather tips derived from current conditions.

pub const HEAT_TIP: &str = "Stay hydrated and avoid going out in the afternoon.";
pub const COLD_TIP: &str = "Wear warm clothes and stay indoors if possible.";
pub const HUMIDITY_TIP: &str = "High humidity! Avoid strenuous activity.";
pub const UMBRELLA_TIP: &str = "Carry an umbrella. Roads might be slippery.";
pub const DEFAULT_TIP: &str = "Weather looks good. Have a great day!";

/// Ordered, never-empty list of tips.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advice(Vec<&'static str>);

impl Advice {
    pub fn tips(&self) -> &[&'static str] {
        &self.0
    }
}

impl IntoIterator for Advice {
    type Item = &'static str;
    type IntoIter = std::vec::IntoIter<&'static str>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Temperature, humidity and rainfall are checked independently, so several
/// tips can fire at once.
pub fn personalized_advice(temperature_c: f64, humidity_pct: f64, rainfall_mm: f64) -> Advice {
    let mut tips = Vec::new();

    if temperature_c > 35.0 {
        tips.push(HEAT_TIP);
    } else if temperature_c < 10.0 {
        tips.push(COLD_TIP);
    }
    if humidity_pct > 80.0 {
        tips.push(HUMIDITY_TIP);
    }
    if rainfall_mm > 0.0 {
        tips.push(UMBRELLA_TIP);
    }
    if tips.is_empty() {
        tips.push(DEFAULT_TIP);
    }

    Advice(tips)
}
