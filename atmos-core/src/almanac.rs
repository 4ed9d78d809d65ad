use chrono::{DateTime, Datelike, NaiveDate};

const SYNODIC_MONTH_DAYS: f64 = 29.530_588_67;

/// Clock time (`07:05 AM`) of a Unix timestamp shifted by `offset_secs`.
pub fn format_local_time(timestamp: i64, offset_secs: i64) -> String {
    format_shifted(timestamp, offset_secs, "%I:%M %p")
}

/// Date and clock time of a Unix timestamp shifted by `offset_secs`.
pub fn format_local_datetime(timestamp: i64, offset_secs: i64) -> String {
    format_shifted(timestamp, offset_secs, "%Y-%m-%d %I:%M %p")
}

fn format_shifted(timestamp: i64, offset_secs: i64, fmt: &str) -> String {
    timestamp
        .checked_add(offset_secs)
        .and_then(|ts| DateTime::from_timestamp(ts, 0))
        .map(|dt| dt.format(fmt).to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoonPhase {
    NewMoon,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    FullMoon,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
}

impl MoonPhase {
    const CYCLE: [MoonPhase; 8] = [
        MoonPhase::NewMoon,
        MoonPhase::WaxingCrescent,
        MoonPhase::FirstQuarter,
        MoonPhase::WaxingGibbous,
        MoonPhase::FullMoon,
        MoonPhase::WaningGibbous,
        MoonPhase::LastQuarter,
        MoonPhase::WaningCrescent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MoonPhase::NewMoon => "New Moon",
            MoonPhase::WaxingCrescent => "Waxing Crescent",
            MoonPhase::FirstQuarter => "First Quarter",
            MoonPhase::WaxingGibbous => "Waxing Gibbous",
            MoonPhase::FullMoon => "Full Moon",
            MoonPhase::WaningGibbous => "Waning Gibbous",
            MoonPhase::LastQuarter => "Last Quarter",
            MoonPhase::WaningCrescent => "Waning Crescent",
        }
    }
}

impl std::fmt::Display for MoonPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rough phase from the day of the year. Good enough for a one-line hint,
/// not for astronomy.
pub fn moon_phase(date: NaiveDate) -> MoonPhase {
    let days = f64::from(date.ordinal());
    let position = (days % SYNODIC_MONTH_DAYS) / SYNODIC_MONTH_DAYS;
    let index = ((position * 8.0) as usize).min(7);

    MoonPhase::CYCLE[index]
}
