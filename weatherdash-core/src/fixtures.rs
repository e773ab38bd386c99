//! Snapshot builders shared by unit tests.

use chrono::NaiveDate;

use crate::{
    model::{Astro, CurrentConditions, DayForecast, HourForecast, Location, WeatherSnapshot},
    units::TempPair,
};

pub(crate) fn snapshot(condition: &str) -> WeatherSnapshot {
    WeatherSnapshot {
        location: Location {
            name: "London".into(),
            region: "City of London, Greater London".into(),
            country: "United Kingdom".into(),
            lat: 51.52,
            lon: -0.11,
        },
        current: CurrentConditions {
            temp: TempPair::new(12.3, 54.1),
            feels_like: TempPair::new(10.2, 50.4),
            condition_text: condition.into(),
            humidity: 82,
            wind_kph: 18.7,
            wind_dir: "WSW".into(),
            gust_kph: Some(27.6),
            pressure_mb: 1012.0,
            vis_km: 9.5,
            uv: 3.0,
            cloud_pct: 75,
            precip_mm: 1.2,
        },
        forecast_days: vec![
            day("2025-10-29", "Moderate rain", (14.0, 57.2), (7.2, 45.0)),
            day("2025-10-30", "Patchy rain possible", (13.1, 55.6), (6.4, 43.5)),
            day("2025-10-31", "Sunny", (15.2, 59.4), (5.0, 41.0)),
        ],
    }
}

fn day(date: &str, condition: &str, max: (f64, f64), min: (f64, f64)) -> DayForecast {
    let hourly = (0..24)
        .map(|h| HourForecast {
            time: format!("{date} {h:02}:00"),
            temp: TempPair::new(7.8 + f64::from(h) * 0.25, 46.0 + f64::from(h) * 0.45),
            condition_text: condition.into(),
        })
        .collect();

    DayForecast {
        date: date.into(),
        astro: Astro {
            sunrise: "07:02 AM".into(),
            sunset: "04:41 PM".into(),
            moonset: "09:14 PM".into(),
            moon_phase: "First Quarter".into(),
            moon_illumination: "54".into(),
        },
        max_temp: TempPair::new(max.0, max.1),
        min_temp: TempPair::new(min.0, min.1),
        condition_text: condition.into(),
        hourly,
    }
}

pub(crate) fn full_moons() -> Vec<NaiveDate> {
    vec![
        NaiveDate::from_ymd_opt(2025, 11, 5).unwrap(),
        NaiveDate::from_ymd_opt(2025, 12, 4).unwrap(),
    ]
}
