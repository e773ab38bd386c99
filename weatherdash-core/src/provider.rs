use crate::{
    Config, FetchError, WeatherSnapshot,
    provider::weatherapi::WeatherApiProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod weatherapi;

/// Source of weather snapshots. A fetch is all-or-nothing: there is no
/// partially populated snapshot.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// `query` is free text ("Paris") or "lat,lon".
    async fn fetch(&self, query: &str) -> Result<WeatherSnapshot, FetchError>;
}

/// Construct the WeatherAPI.com provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.api_key()?;

    Ok(Box::new(WeatherApiProvider::with_base_url(
        api_key,
        config.base_url.clone(),
        config.forecast_days,
    )))
}
