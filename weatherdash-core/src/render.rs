//! Turns a snapshot into display strings.
//!
//! [`render`] is pure in `(snapshot, unit, now)`; writing the result out goes
//! through the [`Presenter`] trait so the same view can drive any front end.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::{
    classify::{WeatherCategory, classify, condition_glyph},
    error::FetchError,
    model::{DayForecast, WeatherSnapshot},
    moon::{days_until_next_full_moon, moon_image_url, phase_glyph},
    theme::Theme,
    units::{UnitPreference, round_half_up, select_temp},
};

/// Named display slots of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    CityName,
    Region,
    Temperature,
    TempUnit,
    FeelsLike,
    FeelsLikeTemp,
    Condition,
    WeatherGlyph,
    Humidity,
    WindSpeed,
    WindDirection,
    WindGust,
    Pressure,
    Visibility,
    UvIndex,
    CloudCover,
    Precipitation,
    Sunrise,
    Sunset,
    MoonIllumination,
    MoonSet,
    NextFullMoon,
    MoonGlyph,
    MoonImage,
    DateTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HourlyItem {
    pub time: String,
    pub glyph: &'static str,
    pub temp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyItem {
    pub day: String,
    pub glyph: &'static str,
    pub max: i64,
    pub min: i64,
}

/// Where rendered values end up.
pub trait Presenter {
    fn set_slot(&mut self, slot: Slot, value: &str);
    fn set_hourly(&mut self, items: &[HourlyItem]);
    fn set_daily(&mut self, items: &[DailyItem]);
    fn set_theme(&mut self, theme: Theme);
    fn set_category(&mut self, category: WeatherCategory);
    fn set_loading(&mut self, loading: bool);
    /// `None` hides the notice.
    fn set_notice(&mut self, notice: Option<&str>);
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub category: WeatherCategory,
    pub slots: Vec<(Slot, String)>,
    pub hourly: Vec<HourlyItem>,
    pub daily: Vec<DailyItem>,
}

impl DashboardView {
    pub fn slot(&self, slot: Slot) -> Option<&str> {
        self.slots.iter().find(|(s, _)| *s == slot).map(|(_, v)| v.as_str())
    }

    pub fn present(&self, presenter: &mut dyn Presenter) {
        presenter.set_category(self.category);
        for (slot, value) in &self.slots {
            presenter.set_slot(*slot, value);
        }
        presenter.set_hourly(&self.hourly);
        presenter.set_daily(&self.daily);
    }
}

/// Hourly entries shown: every second hour of the first 24.
const HOURLY_WINDOW: usize = 24;
const HOURLY_STEP: usize = 2;

/// Builds the dashboard for `snapshot`. A snapshot without forecast days is
/// reported as a fetch failure rather than rendered.
pub fn render<Tz: TimeZone>(
    snapshot: &WeatherSnapshot,
    unit: UnitPreference,
    now: &DateTime<Tz>,
    full_moons: &[NaiveDate],
) -> Result<DashboardView, FetchError> {
    let today = snapshot.today().ok_or(FetchError::EmptyForecast)?;
    let current = &snapshot.current;
    let location = &snapshot.location;

    let feels_like = select_temp(current.feels_like, unit);
    let gust = match current.gust_kph {
        Some(g) if g != 0.0 => format!("{} km/h", round_half_up(g)),
        _ => "N/A".to_string(),
    };
    let countdown = days_until_next_full_moon(full_moons, now.with_timezone(&Utc));

    let slots = vec![
        (Slot::CityName, location.name.clone()),
        (Slot::Region, format!("{}, {}", location.region, location.country)),
        (Slot::Temperature, select_temp(current.temp, unit).to_string()),
        (Slot::TempUnit, unit.label().to_string()),
        (Slot::FeelsLike, format!("Feels like {feels_like}°")),
        (Slot::FeelsLikeTemp, format!("{feels_like}°")),
        (Slot::Condition, current.condition_text.clone()),
        (Slot::WeatherGlyph, condition_glyph(&current.condition_text).to_string()),
        (Slot::Humidity, format!("{}%", current.humidity)),
        (Slot::WindSpeed, format!("{} km/h", round_half_up(current.wind_kph))),
        (Slot::WindDirection, current.wind_dir.clone()),
        (Slot::WindGust, gust),
        (Slot::Pressure, format!("{} mb", current.pressure_mb)),
        (Slot::Visibility, format!("{} km", current.vis_km)),
        (Slot::UvIndex, current.uv.to_string()),
        (Slot::CloudCover, format!("{}%", current.cloud_pct)),
        (Slot::Precipitation, format!("{} mm", current.precip_mm)),
        (Slot::Sunrise, today.astro.sunrise.clone()),
        (Slot::Sunset, today.astro.sunset.clone()),
        (Slot::MoonIllumination, format!("{}%", today.astro.moon_illumination)),
        (Slot::MoonSet, today.astro.moonset.clone()),
        (Slot::NextFullMoon, countdown.to_string()),
        (Slot::MoonGlyph, phase_glyph(&today.astro.moon_phase).to_string()),
        (Slot::MoonImage, moon_image_url(now)),
    ];

    Ok(DashboardView {
        category: classify(&current.condition_text),
        slots,
        hourly: hourly_items(today, unit),
        daily: snapshot.forecast_days.iter().map(|d| daily_item(d, unit)).collect(),
    })
}

fn hourly_items(today: &DayForecast, unit: UnitPreference) -> Vec<HourlyItem> {
    today
        .hourly
        .iter()
        .take(HOURLY_WINDOW)
        .step_by(HOURLY_STEP)
        .map(|h| HourlyItem {
            time: NaiveDateTime::parse_from_str(&h.time, "%Y-%m-%d %H:%M")
                .map(|t| t.format("%H:%M").to_string())
                .unwrap_or_else(|_| h.time.clone()),
            glyph: condition_glyph(&h.condition_text),
            temp: select_temp(h.temp, unit),
        })
        .collect()
}

fn daily_item(day: &DayForecast, unit: UnitPreference) -> DailyItem {
    DailyItem {
        day: NaiveDate::parse_from_str(&day.date, "%Y-%m-%d")
            .map(|d| d.format("%a").to_string())
            .unwrap_or_else(|_| day.date.clone()),
        glyph: condition_glyph(&day.condition_text),
        max: select_temp(day.max_temp, unit),
        min: select_temp(day.min_temp, unit),
    }
}

/// Long-form wall clock, e.g. "Sunday, October 18, 2026 at 02:05 PM".
pub fn clock_text<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    now.format("%A, %B %-d, %Y at %I:%M %p").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 29, 12, 0, 0).unwrap()
    }

    #[test]
    fn renders_current_conditions() {
        let snapshot = fixtures::snapshot("Heavy rain");
        let view = render(&snapshot, UnitPreference::Celsius, &noon(), &fixtures::full_moons())
            .expect("renders");

        assert_eq!(view.category, WeatherCategory::Rain);
        assert_eq!(view.slot(Slot::CityName), Some("London"));
        assert_eq!(view.slot(Slot::Region), Some("City of London, Greater London, United Kingdom"));
        assert_eq!(view.slot(Slot::Temperature), Some("12"));
        assert_eq!(view.slot(Slot::TempUnit), Some("°C"));
        assert_eq!(view.slot(Slot::FeelsLike), Some("Feels like 10°"));
        assert_eq!(view.slot(Slot::WeatherGlyph), Some("⛈️"));
        assert_eq!(view.slot(Slot::WindSpeed), Some("19 km/h"));
        assert_eq!(view.slot(Slot::WindGust), Some("28 km/h"));
        assert_eq!(view.slot(Slot::Pressure), Some("1012 mb"));
        assert_eq!(view.slot(Slot::Visibility), Some("9.5 km"));
        assert_eq!(view.slot(Slot::Precipitation), Some("1.2 mm"));
        assert_eq!(view.slot(Slot::MoonIllumination), Some("54%"));
        assert_eq!(view.slot(Slot::MoonGlyph), Some("🌓"));
        assert_eq!(view.slot(Slot::NextFullMoon), Some("7 days"));
        assert!(view.slot(Slot::MoonImage).is_some_and(|u| u.ends_with("moon.0012.jpg")));
    }

    #[test]
    fn fahrenheit_switches_every_temperature() {
        let snapshot = fixtures::snapshot("Sunny");
        let view = render(&snapshot, UnitPreference::Fahrenheit, &noon(), &[]).expect("renders");

        assert_eq!(view.slot(Slot::Temperature), Some("54"));
        assert_eq!(view.slot(Slot::FeelsLikeTemp), Some("50°"));
        assert_eq!(view.hourly[0].temp, 46);
        assert_eq!((view.daily[0].max, view.daily[0].min), (57, 45));
        assert_eq!(view.slot(Slot::NextFullMoon), Some("—"));
    }

    #[test]
    fn hourly_list_takes_every_second_hour() {
        let snapshot = fixtures::snapshot("Sunny");
        let view = render(&snapshot, UnitPreference::Celsius, &noon(), &[]).expect("renders");

        assert_eq!(view.hourly.len(), 12);
        assert_eq!(view.hourly[0].time, "00:00");
        assert_eq!(view.hourly[1].time, "02:00");
        assert_eq!(view.hourly[11].time, "22:00");
    }

    #[test]
    fn daily_list_uses_short_weekdays() {
        let snapshot = fixtures::snapshot("Sunny");
        let view = render(&snapshot, UnitPreference::Celsius, &noon(), &[]).expect("renders");

        let days: Vec<_> = view.daily.iter().map(|d| d.day.as_str()).collect();
        assert_eq!(days, ["Wed", "Thu", "Fri"]);
        assert_eq!(view.daily[1].glyph, "🌦️");
    }

    #[test]
    fn missing_or_zero_gust_is_not_available() {
        let mut snapshot = fixtures::snapshot("Sunny");
        snapshot.current.gust_kph = Some(0.0);
        let view = render(&snapshot, UnitPreference::Celsius, &noon(), &[]).expect("renders");
        assert_eq!(view.slot(Slot::WindGust), Some("N/A"));

        snapshot.current.gust_kph = None;
        let view = render(&snapshot, UnitPreference::Celsius, &noon(), &[]).expect("renders");
        assert_eq!(view.slot(Slot::WindGust), Some("N/A"));
    }

    #[test]
    fn empty_forecast_is_a_fetch_failure() {
        let mut snapshot = fixtures::snapshot("Sunny");
        snapshot.forecast_days.clear();

        let err = render(&snapshot, UnitPreference::Celsius, &noon(), &[]).unwrap_err();
        assert!(matches!(err, FetchError::EmptyForecast));
    }

    #[test]
    fn clock_text_is_long_form() {
        let now = Utc.with_ymd_and_hms(2026, 10, 18, 14, 5, 0).unwrap();
        assert_eq!(clock_text(&now), "Sunday, October 18, 2026 at 02:05 PM");
    }
}
