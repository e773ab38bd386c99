use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::{moon, provider::weatherapi::DEFAULT_BASE_URL, units::UnitPreference};

/// Overrides `api_key` from the config file when set.
pub const API_KEY_ENV: &str = "WEATHERDASH_API_KEY";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// default_location = "London"
/// unit = "fahrenheit"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// WeatherAPI.com key.
    pub api_key: Option<String>,
    pub base_url: String,
    /// Shown when geolocation fails.
    pub default_location: String,
    pub forecast_days: u8,
    /// Unit the session starts in.
    pub unit: UnitPreference,
    /// Ascending full-moon dates for the countdown.
    pub full_moons: Vec<NaiveDate>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            default_location: "London".to_string(),
            forecast_days: 10,
            unit: UnitPreference::default(),
            full_moons: moon::default_full_moons(),
        }
    }
}

impl Config {
    /// API key from the environment, falling back to the config file.
    pub fn api_key(&self) -> Result<String> {
        if let Some(key) = std::env::var(API_KEY_ENV).ok().filter(|k| !k.trim().is_empty()) {
            return Ok(key);
        }

        self.api_key.clone().filter(|k| !k.trim().is_empty()).ok_or_else(|| {
            anyhow!(
                "No WeatherAPI.com key configured.\n\
                 Hint: run `weatherdash configure` or set {API_KEY_ENV}."
            )
        })
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key.trim().to_string());
    }

    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let mut cfg: Config = toml::from_str(contents)?;
        cfg.full_moons.sort();
        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weatherdash", "weatherdash")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let cfg = Config::from_toml("").expect("empty config parses");
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.default_location, "London");
        assert_eq!(cfg.forecast_days, 10);
        assert!(!cfg.full_moons.is_empty());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let cfg = Config::from_toml(
            r#"
            api_key = "KEY"
            unit = "fahrenheit"
            full_moons = ["2026-12-24", "2026-11-24"]
            "#,
        )
        .expect("config parses");

        assert_eq!(cfg.api_key.as_deref(), Some("KEY"));
        assert_eq!(cfg.unit, UnitPreference::Fahrenheit);
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert_eq!(
            cfg.full_moons,
            vec![
                NaiveDate::from_ymd_opt(2026, 11, 24).unwrap(),
                NaiveDate::from_ymd_opt(2026, 12, 24).unwrap(),
            ]
        );
    }

    #[test]
    fn unknown_unit_is_rejected() {
        assert!(Config::from_toml("unit = \"kelvin\"").is_err());
    }

    #[test]
    fn toml_roundtrip_preserves_settings() {
        let mut cfg = Config::default();
        cfg.set_api_key("  SECRET ".into());
        cfg.default_location = "Oslo".into();

        let text = toml::to_string_pretty(&cfg).expect("serializes");
        let back = Config::from_toml(&text).expect("parses");
        assert_eq!(back, cfg);
        assert_eq!(back.api_key.as_deref(), Some("SECRET"));
    }
}
