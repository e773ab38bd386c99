//! Core library for the `weatherdash` dashboard.
//!
//! This crate defines:
//! - Configuration handling
//! - The WeatherAPI.com fetcher and the shared snapshot model
//! - Condition classification, unit selection and moon helpers
//! - Rendering into named display slots and the session controller
//! - Decorative ambient effects (clouds, rain, stars)
//!
//! It is used by `weatherdash-cli`, but can also drive other front ends through
//! the [`Presenter`] trait.

pub mod ambient;
pub mod app;
pub mod classify;
pub mod config;
pub mod error;
pub mod geolocation;
pub mod model;
pub mod moon;
pub mod provider;
pub mod render;
pub mod theme;
pub mod units;

#[cfg(test)]
mod fixtures;

pub use ambient::{AmbientEffects, AmbientKind, CelestialBody};
pub use app::{AppController, Phase};
pub use classify::{WeatherCategory, classify, condition_glyph};
pub use config::Config;
pub use error::{Endpoint, FetchError, GeolocationError};
pub use geolocation::{Coordinates, Geolocator};
pub use model::WeatherSnapshot;
pub use provider::{WeatherProvider, provider_from_config};
pub use render::{Presenter, Slot};
pub use theme::Theme;
pub use units::UnitPreference;
