use serde::{Deserialize, Serialize};

use crate::units::TempPair;

/// Where a snapshot was taken.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub region: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
}

/// Current conditions as reported by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temp: TempPair,
    pub feels_like: TempPair,
    pub condition_text: String,
    pub humidity: u8,
    pub wind_kph: f64,
    pub wind_dir: String,
    pub gust_kph: Option<f64>,
    pub pressure_mb: f64,
    pub vis_km: f64,
    pub uv: f64,
    pub cloud_pct: u8,
    pub precip_mm: f64,
}

/// Sun and moon data for one forecast day. Times are kept as the provider
/// formats them ("06:58 AM").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Astro {
    pub sunrise: String,
    pub sunset: String,
    pub moonset: String,
    pub moon_phase: String,
    pub moon_illumination: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourForecast {
    /// Local time as "YYYY-MM-DD HH:MM".
    pub time: String,
    pub temp: TempPair,
    pub condition_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayForecast {
    /// ISO date, "YYYY-MM-DD".
    pub date: String,
    pub astro: Astro,
    pub max_temp: TempPair,
    pub min_temp: TempPair,
    pub condition_text: String,
    /// Chronological, normally 24 entries.
    pub hourly: Vec<HourForecast>,
}

/// Combined current + forecast payload for one location.
///
/// Replaced wholesale on every successful fetch. `forecast_days` is kept in
/// chronological order and is never empty for a snapshot produced by a
/// [`crate::WeatherProvider`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub location: Location,
    pub current: CurrentConditions,
    pub forecast_days: Vec<DayForecast>,
}

impl WeatherSnapshot {
    /// First forecast day, i.e. today.
    pub fn today(&self) -> Option<&DayForecast> {
        self.forecast_days.first()
    }
}
