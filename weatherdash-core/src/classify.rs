//! Condition text → visual category and glyph.
//!
//! The two mappings are deliberately independent: the category is a
//! case-insensitive substring match, the glyph an exact table lookup, so they
//! can disagree ("Clear" is [`WeatherCategory::Clear`] but glyphs to a moon).

use serde::{Deserialize, Serialize};

/// Coarse classification that drives the ambient effects and styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherCategory {
    Clear,
    Rain,
    Snow,
    Thunder,
    Cloudy,
    Default,
}

impl WeatherCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherCategory::Clear => "clear",
            WeatherCategory::Rain => "rain",
            WeatherCategory::Snow => "snow",
            WeatherCategory::Thunder => "thunder",
            WeatherCategory::Cloudy => "cloudy",
            WeatherCategory::Default => "default",
        }
    }
}

impl std::fmt::Display for WeatherCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// Order matters: "Thundery rain showers" must land on rain.
const RULES: &[(&[&str], WeatherCategory)] = &[
    (&["sunny", "clear"], WeatherCategory::Clear),
    (&["rain", "drizzle"], WeatherCategory::Rain),
    (&["snow", "sleet", "ice", "blizzard"], WeatherCategory::Snow),
    (&["thunder"], WeatherCategory::Thunder),
    (&["cloud", "overcast", "mist", "fog"], WeatherCategory::Cloudy),
];

/// Classifies a provider condition description. First matching rule wins.
pub fn classify(condition_text: &str) -> WeatherCategory {
    let text = condition_text.to_lowercase();

    RULES
        .iter()
        .find(|(needles, _)| needles.iter().any(|n| text.contains(n)))
        .map(|(_, category)| *category)
        .unwrap_or(WeatherCategory::Default)
}

pub const FALLBACK_GLYPH: &str = "☁️";

const GLYPHS: &[(&str, &str)] = &[
    ("Sunny", "☀️"),
    ("Clear", "🌙"),
    ("Partly cloudy", "⛅"),
    ("Cloudy", "☁️"),
    ("Overcast", "☁️"),
    ("Mist", "🌫️"),
    ("Patchy rain possible", "🌦️"),
    ("Light rain", "🌦️"),
    ("Moderate rain", "🌧️"),
    ("Heavy rain", "⛈️"),
    ("Thundery outbreaks possible", "⛈️"),
    ("Patchy snow possible", "🌨️"),
    ("Light snow", "🌨️"),
    ("Heavy snow", "❄️"),
    ("Fog", "🌫️"),
];

/// Exact, case-sensitive glyph lookup; anything unknown becomes a cloud.
pub fn condition_glyph(condition_text: &str) -> &'static str {
    GLYPHS
        .iter()
        .find(|(key, _)| *key == condition_text)
        .map(|(_, glyph)| *glyph)
        .unwrap_or(FALLBACK_GLYPH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_order_resolves_ambiguous_phrases() {
        assert_eq!(classify("Thundery outbreaks possible"), WeatherCategory::Thunder);
        assert_eq!(classify("Patchy rain possible"), WeatherCategory::Rain);
        assert_eq!(classify("Moderate or heavy rain with thunder"), WeatherCategory::Rain);
        assert_eq!(classify("Sunny intervals with rain"), WeatherCategory::Clear);
        assert_eq!(classify("Patchy light snow with thunder"), WeatherCategory::Snow);
    }

    #[test]
    fn rain_wins_whenever_no_earlier_rule_matches() {
        let texts =
            ["Light rain", "HEAVY RAIN", "Freezing drizzle", "Torrential rain shower", "rain"];
        for text in texts {
            assert_eq!(classify(text), WeatherCategory::Rain, "{text}");
        }
    }

    #[test]
    fn classifies_remaining_categories() {
        assert_eq!(classify("Blizzard"), WeatherCategory::Snow);
        assert_eq!(classify("Ice pellets"), WeatherCategory::Snow);
        assert_eq!(classify("Overcast"), WeatherCategory::Cloudy);
        assert_eq!(classify("Freezing fog"), WeatherCategory::Cloudy);
        assert_eq!(classify("Partly Cloudy "), WeatherCategory::Cloudy);
        assert_eq!(classify("Dust storm"), WeatherCategory::Default);
        assert_eq!(classify(""), WeatherCategory::Default);
    }

    #[test]
    fn glyph_lookup_is_exact() {
        assert_eq!(condition_glyph("Sunny"), "☀️");
        assert_eq!(condition_glyph("Heavy rain"), "⛈️");
        assert_eq!(condition_glyph("heavy rain"), FALLBACK_GLYPH);
        assert_eq!(condition_glyph("Heavy rain "), FALLBACK_GLYPH);
        assert_eq!(condition_glyph("Blizzard"), FALLBACK_GLYPH);
    }

    #[test]
    fn glyph_and_category_may_disagree() {
        assert_eq!(classify("Clear"), WeatherCategory::Clear);
        assert_eq!(condition_glyph("Clear"), "🌙");
    }
}
