//! Single-shot position lookup.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::error::GeolocationError;

const IP_API_URL: &str = "http://ip-api.com/json/";
const REQUEST_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    /// Provider query form, "lat,lon".
    pub fn query(&self) -> String {
        format!("{},{}", self.lat, self.lon)
    }
}

#[async_trait]
pub trait Geolocator: Send + Sync + std::fmt::Debug {
    async fn locate(&self) -> Result<Coordinates, GeolocationError>;
}

/// Approximate position from the public IP address.
#[derive(Debug, Clone)]
pub struct IpGeolocator {
    url: String,
    http: Client,
}

impl Default for IpGeolocator {
    fn default() -> Self {
        Self::new(IP_API_URL.to_string())
    }
}

impl IpGeolocator {
    pub fn new(url: String) -> Self {
        Self { url, http: Client::new() }
    }
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

#[async_trait]
impl Geolocator for IpGeolocator {
    async fn locate(&self) -> Result<Coordinates, GeolocationError> {
        let res = self
            .http
            .get(&self.url)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .send()
            .await
            .map_err(|e| GeolocationError::Failed(e.to_string()))?;

        if !res.status().is_success() {
            return Err(GeolocationError::Failed(format!("lookup returned {}", res.status())));
        }

        let body: IpApiResponse =
            res.json().await.map_err(|e| GeolocationError::Failed(e.to_string()))?;

        match (body.status.as_str(), body.lat, body.lon) {
            ("success", Some(lat), Some(lon)) => Ok(Coordinates { lat, lon }),
            _ => Err(GeolocationError::Failed(
                body.message.unwrap_or_else(|| "lookup returned no position".to_string()),
            )),
        }
    }
}

/// Always reports the same position.
#[derive(Debug, Clone, Copy)]
pub struct FixedGeolocator(pub Coordinates);

#[async_trait]
impl Geolocator for FixedGeolocator {
    async fn locate(&self) -> Result<Coordinates, GeolocationError> {
        Ok(self.0)
    }
}

/// Stands in when no positioning capability exists.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGeolocator;

#[async_trait]
impl Geolocator for NoGeolocator {
    async fn locate(&self) -> Result<Coordinates, GeolocationError> {
        Err(GeolocationError::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_is_lat_comma_lon() {
        let c = Coordinates { lat: 51.5, lon: -0.12 };
        assert_eq!(c.query(), "51.5,-0.12");
    }

    #[tokio::test]
    async fn fixed_and_missing_geolocators() {
        let here = Coordinates { lat: 1.0, lon: 2.0 };
        assert_eq!(FixedGeolocator(here).locate().await, Ok(here));
        assert_eq!(NoGeolocator.locate().await, Err(GeolocationError::Unavailable));
    }
}
