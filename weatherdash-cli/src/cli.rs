use std::sync::Arc;

use anyhow::Context;
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use inquire::{Password, Select, Text};
use weatherdash_core::{
    AmbientEffects, AppController, Config, Geolocator, UnitPreference,
    geolocation::{IpGeolocator, NoGeolocator},
    provider_from_config,
};

use crate::{terminal::TerminalPresenter, watch};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherdash", version, about = "Terminal weather dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the WeatherAPI.com key and preferences.
    Configure,

    /// Print the dashboard once and exit.
    Show(Target),

    /// Keep the dashboard on screen and accept commands from stdin.
    Watch {
        #[command(flatten)]
        target: Target,

        /// Redraw interval for the ambient sky, in milliseconds.
        #[arg(long, default_value_t = 500)]
        frame_ms: u64,
    },
}

#[derive(Debug, Args)]
pub struct Target {
    /// City name or "lat,lon". Omit to geolocate.
    pub location: Option<String>,

    /// Start in Fahrenheit regardless of config.
    #[arg(long)]
    pub fahrenheit: bool,

    /// Skip IP geolocation entirely.
    #[arg(long)]
    pub no_geolocate: bool,
}

impl Target {
    fn geolocator(&self) -> Arc<dyn Geolocator> {
        if self.no_geolocate { Arc::new(NoGeolocator) } else { Arc::new(IpGeolocator::default()) }
    }

    fn apply(&self, config: &mut Config) {
        if self.fahrenheit {
            config.unit = UnitPreference::Fahrenheit;
        }
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show(target) => show(target).await,
            Command::Watch { target, frame_ms } => {
                let mut config = Config::load()?;
                target.apply(&mut config);
                let provider = Arc::from(provider_from_config(&config)?);

                watch::run(watch::WatchOptions {
                    config,
                    provider,
                    geolocator: target.geolocator(),
                    location: target.location,
                    frame: std::time::Duration::from_millis(frame_ms.max(16)),
                })
                .await
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let key = Password::new("WeatherAPI.com key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    if !key.trim().is_empty() {
        config.set_api_key(key);
    }

    config.default_location = Text::new("Fallback location when geolocation fails:")
        .with_default(&config.default_location)
        .prompt()
        .context("Failed to read default location")?;

    config.unit = Select::new(
        "Temperature unit:",
        vec![UnitPreference::Celsius, UnitPreference::Fahrenheit],
    )
    .prompt()
    .context("Failed to read temperature unit")?;

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show(target: Target) -> anyhow::Result<()> {
    let mut config = Config::load()?;
    target.apply(&mut config);
    let provider = provider_from_config(&config)?;

    let mut app = AppController::new(&config, Local::now());
    let query = match target.location.as_deref() {
        Some(location) => app.search(location),
        None => {
            let located = target.geolocator().locate().await;
            app.geolocated(located, Local::now())
        }
    };

    let fetched = match query {
        Some(query) => {
            let result = provider.fetch(&query).await;
            app.complete_fetch(&query, result, Local::now())
                .with_context(|| format!("Unable to fetch weather for '{query}'"))
        }
        None => Ok(()),
    };

    let mut screen = TerminalPresenter::default();
    let mut ambient = AmbientEffects::from_entropy();
    app.draw(&mut screen, &mut ambient, Local::now(), std::time::Duration::ZERO);
    print!("{}", screen.render(None));

    fetched
}
