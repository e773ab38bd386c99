use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};

use crate::{
    error::{Endpoint, FetchError},
    model::{Astro, CurrentConditions, DayForecast, HourForecast, Location, WeatherSnapshot},
    units::TempPair,
};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com/v1";

/// WeatherAPI.com client. One fetch issues `current.json` and `forecast.json`
/// concurrently and only succeeds if both do.
#[derive(Clone)]
pub struct WeatherApiProvider {
    api_key: String,
    base_url: String,
    days: u8,
    http: Client,
}

impl std::fmt::Debug for WeatherApiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherApiProvider")
            .field("base_url", &self.base_url)
            .field("days", &self.days)
            .finish_non_exhaustive()
    }
}

impl WeatherApiProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string(), 10)
    }

    pub fn with_base_url(api_key: String, base_url: String, days: u8) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self { api_key, base_url, days, http: Client::new() }
    }

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        query: &[(&str, &str)],
    ) -> Result<T, FetchError> {
        let url = format!("{}/{}", self.base_url, endpoint.path());

        let res = self
            .http
            .get(&url)
            .query(&[("key", self.api_key.as_str())])
            .query(query)
            .send()
            .await
            .map_err(|source| FetchError::Request { endpoint, source })?;

        let status = res.status();
        let body = res.text().await.map_err(|source| FetchError::Request { endpoint, source })?;

        if !status.is_success() {
            return Err(FetchError::Status { endpoint, status, body: truncate_body(&body) });
        }

        serde_json::from_str(&body).map_err(|source| FetchError::Parse { endpoint, source })
    }
}

#[async_trait]
impl WeatherProvider for WeatherApiProvider {
    async fn fetch(&self, query: &str) -> Result<WeatherSnapshot, FetchError> {
        let days = self.days.to_string();

        tracing::debug!(query, "fetching current conditions and forecast");

        let current_query = [("q", query), ("aqi", "yes")];
        let forecast_query =
            [("q", query), ("days", days.as_str()), ("aqi", "yes"), ("alerts", "yes")];

        let (current, forecast) = tokio::join!(
            self.get::<WaCurrentResponse>(Endpoint::Current, &current_query),
            self.get::<WaForecastResponse>(Endpoint::Forecast, &forecast_query),
        );

        into_snapshot(current?, forecast?)
    }
}

fn into_snapshot(
    current: WaCurrentResponse,
    forecast: WaForecastResponse,
) -> Result<WeatherSnapshot, FetchError> {
    if forecast.forecast.forecastday.is_empty() {
        return Err(FetchError::EmptyForecast);
    }

    let WaCurrentResponse { location, current } = current;

    let forecast_days = forecast
        .forecast
        .forecastday
        .into_iter()
        .map(|d| DayForecast {
            date: d.date,
            astro: Astro {
                sunrise: d.astro.sunrise,
                sunset: d.astro.sunset,
                moonset: d.astro.moonset,
                moon_phase: d.astro.moon_phase,
                moon_illumination: d.astro.moon_illumination.to_string(),
            },
            max_temp: TempPair::new(d.day.maxtemp_c, d.day.maxtemp_f),
            min_temp: TempPair::new(d.day.mintemp_c, d.day.mintemp_f),
            condition_text: d.day.condition.text,
            hourly: d
                .hour
                .into_iter()
                .map(|h| HourForecast {
                    time: h.time,
                    temp: TempPair::new(h.temp_c, h.temp_f),
                    condition_text: h.condition.text,
                })
                .collect(),
        })
        .collect();

    Ok(WeatherSnapshot {
        location: Location {
            name: location.name,
            region: location.region,
            country: location.country,
            lat: location.lat,
            lon: location.lon,
        },
        current: CurrentConditions {
            temp: TempPair::new(current.temp_c, current.temp_f),
            feels_like: TempPair::new(current.feelslike_c, current.feelslike_f),
            condition_text: current.condition.text,
            humidity: current.humidity,
            wind_kph: current.wind_kph,
            wind_dir: current.wind_dir,
            gust_kph: current.gust_kph,
            pressure_mb: current.pressure_mb,
            vis_km: current.vis_km,
            uv: current.uv,
            cloud_pct: current.cloud,
            precip_mm: current.precip_mm,
        },
        forecast_days,
    })
}

#[derive(Debug, Deserialize)]
struct WaLocation {
    name: String,
    region: String,
    country: String,
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct WaCondition {
    text: String,
}

#[derive(Debug, Deserialize)]
struct WaCurrent {
    temp_c: f64,
    temp_f: f64,
    feelslike_c: f64,
    feelslike_f: f64,
    condition: WaCondition,
    humidity: u8,
    wind_kph: f64,
    wind_dir: String,
    gust_kph: Option<f64>,
    pressure_mb: f64,
    vis_km: f64,
    uv: f64,
    cloud: u8,
    precip_mm: f64,
}

#[derive(Debug, Deserialize)]
struct WaCurrentResponse {
    location: WaLocation,
    current: WaCurrent,
}

/// Older API versions send illumination as a string, newer ones as a number.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WaIllumination {
    Text(String),
    Number(f64),
}

impl std::fmt::Display for WaIllumination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WaIllumination::Text(s) => f.write_str(s),
            WaIllumination::Number(n) => write!(f, "{n}"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct WaAstro {
    sunrise: String,
    sunset: String,
    moonset: String,
    moon_phase: String,
    moon_illumination: WaIllumination,
}

#[derive(Debug, Deserialize)]
struct WaDay {
    maxtemp_c: f64,
    maxtemp_f: f64,
    mintemp_c: f64,
    mintemp_f: f64,
    condition: WaCondition,
}

#[derive(Debug, Deserialize)]
struct WaForecastHour {
    time: String,
    temp_c: f64,
    temp_f: f64,
    condition: WaCondition,
}

#[derive(Debug, Deserialize)]
struct WaForecastDay {
    date: String,
    astro: WaAstro,
    day: WaDay,
    #[serde(default)]
    hour: Vec<WaForecastHour>,
}

#[derive(Debug, Deserialize)]
struct WaForecast {
    forecastday: Vec<WaForecastDay>,
}

#[derive(Debug, Deserialize)]
struct WaForecastResponse {
    forecast: WaForecast,
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn illumination_accepts_string_or_number() {
        let text: WaIllumination = serde_json::from_str("\"45\"").unwrap();
        let number: WaIllumination = serde_json::from_str("45").unwrap();
        assert_eq!(text.to_string(), "45");
        assert_eq!(number.to_string(), "45");
    }

    #[test]
    fn long_bodies_are_truncated() {
        let body = "é".repeat(300);
        let truncated = truncate_body(&body);
        assert_eq!(truncated.chars().count(), 203);
        assert!(truncated.ends_with("..."));
        assert_eq!(truncate_body("short"), "short");
    }

    #[test]
    fn empty_forecast_is_a_failure() {
        let current: WaCurrentResponse = serde_json::from_value(serde_json::json!({
            "location": {
                "name": "Oslo",
                "region": "Oslo",
                "country": "Norway",
                "lat": 59.91,
                "lon": 10.75
            },
            "current": {
                "temp_c": 4.0, "temp_f": 39.2, "feelslike_c": 1.0, "feelslike_f": 33.8,
                "condition": { "text": "Overcast" }, "humidity": 80, "wind_kph": 11.2,
                "wind_dir": "SW", "pressure_mb": 1009.0, "vis_km": 10.0, "uv": 1.0,
                "cloud": 100, "precip_mm": 0.0
            }
        }))
        .unwrap();
        let forecast = WaForecastResponse { forecast: WaForecast { forecastday: Vec::new() } };

        let err = into_snapshot(current, forecast).unwrap_err();
        assert!(matches!(err, FetchError::EmptyForecast));
    }

    #[test]
    fn base_url_trailing_slash_is_ignored() {
        let provider = WeatherApiProvider::with_base_url("k".into(), "http://x/v1/".into(), 3);
        assert_eq!(provider.base_url, "http://x/v1");
    }
}
