use serde::{Deserialize, Serialize};

/// Temperature unit the dashboard displays. Lives for the session only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitPreference {
    #[default]
    Celsius,
    Fahrenheit,
}

impl UnitPreference {
    pub fn toggled(self) -> Self {
        match self {
            UnitPreference::Celsius => UnitPreference::Fahrenheit,
            UnitPreference::Fahrenheit => UnitPreference::Celsius,
        }
    }

    /// Label shown next to the temperature.
    pub fn label(self) -> &'static str {
        match self {
            UnitPreference::Celsius => "°C",
            UnitPreference::Fahrenheit => "°F",
        }
    }
}

impl std::fmt::Display for UnitPreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A temperature the provider reports in both scales.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TempPair {
    pub c: f64,
    pub f: f64,
}

impl TempPair {
    pub fn new(c: f64, f: f64) -> Self {
        Self { c, f }
    }
}

/// Picks the field matching `unit` and rounds it to a whole degree.
pub fn select_temp(pair: TempPair, unit: UnitPreference) -> i64 {
    let raw = match unit {
        UnitPreference::Celsius => pair.c,
        UnitPreference::Fahrenheit => pair.f,
    };
    round_half_up(raw)
}

/// Rounds halves towards positive infinity, so -2.5 becomes -2.
pub fn round_half_up(value: f64) -> i64 {
    // `f64::round` sends halves away from zero; pull negative halves back up.
    let rounded = value.round();
    let rounded = if value - rounded == 0.5 { rounded + 1.0 } else { rounded };
    rounded as i64
}
