//! Lunar phase glyphs and the full-moon countdown.
//!
//! The countdown is a lookup against externally supplied full-moon dates, not
//! an astronomical computation.

use chrono::{DateTime, NaiveDate, Timelike, Utc};

pub const FULL_MOON_GLYPH: &str = "🌕";

const PHASES: &[(&str, &str)] = &[
    ("New Moon", "🌑"),
    ("Waxing Crescent", "🌒"),
    ("First Quarter", "🌓"),
    ("Waxing Gibbous", "🌔"),
    ("Full Moon", FULL_MOON_GLYPH),
    ("Waning Gibbous", "🌖"),
    ("Last Quarter", "🌗"),
    ("Waning Crescent", "🌘"),
];

/// Glyph for a named phase; unknown names (any casing mismatch included) fall
/// back to the full moon.
pub fn phase_glyph(phase_name: &str) -> &'static str {
    PHASES
        .iter()
        .find(|(name, _)| *name == phase_name)
        .map(|(_, glyph)| *glyph)
        .unwrap_or(FULL_MOON_GLYPH)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FullMoonCountdown {
    Days(i64),
    Unknown,
}

impl std::fmt::Display for FullMoonCountdown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FullMoonCountdown::Days(days) => write!(f, "{days} days"),
            FullMoonCountdown::Unknown => f.write_str("—"),
        }
    }
}

const MS_PER_DAY: i64 = 86_400_000;

/// Days until the first reference date (taken as UTC midnight) strictly after
/// `now`, rounded up. `reference_dates` must be in ascending order.
pub fn days_until_next_full_moon(
    reference_dates: &[NaiveDate],
    now: DateTime<Utc>,
) -> FullMoonCountdown {
    let next = reference_dates
        .iter()
        .filter_map(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
        .find(|instant| *instant > now);

    match next {
        Some(instant) => {
            let ms = (instant - now).num_milliseconds();
            // ms > 0 here, so this is a ceiling division.
            FullMoonCountdown::Days((ms + MS_PER_DAY - 1) / MS_PER_DAY)
        }
        None => FullMoonCountdown::Unknown,
    }
}

const MOON_FRAMES_URL: &str =
    "https://svs.gsfc.nasa.gov/vis/a000000/a005415/frames/1800x1800_1x1_30p";

/// Best-effort moon render URL indexed by the current hour. The frame is not
/// guaranteed to exist; callers should fall back to [`phase_glyph`].
pub fn moon_image_url<T: Timelike>(now: &T) -> String {
    format!("{MOON_FRAMES_URL}/moon.{:04}.jpg", now.hour())
}

/// Full-moon dates (UTC) used when the configuration does not supply its own.
pub fn default_full_moons() -> Vec<NaiveDate> {
    const DATES: &[(i32, u32, u32)] = &[
        (2025, 11, 5),
        (2025, 12, 4),
        (2026, 1, 3),
        (2026, 2, 1),
        (2026, 3, 3),
        (2026, 4, 2),
        (2026, 5, 1),
        (2026, 5, 31),
        (2026, 6, 29),
        (2026, 7, 29),
        (2026, 8, 28),
        (2026, 9, 26),
        (2026, 10, 26),
        (2026, 11, 24),
        (2026, 12, 24),
        (2027, 1, 22),
        (2027, 2, 20),
        (2027, 3, 22),
        (2027, 4, 20),
        (2027, 5, 20),
        (2027, 6, 19),
        (2027, 7, 18),
        (2027, 8, 17),
        (2027, 9, 15),
        (2027, 10, 15),
        (2027, 11, 14),
        (2027, 12, 13),
    ];

    DATES
        .iter()
        .filter_map(|&(y, m, d)| NaiveDate::from_ymd_opt(y, m, d))
        .collect()
}
