//! Plain-text presentation of the dashboard.

use std::{collections::HashMap, fmt::Write, time::Duration};

use weatherdash_core::{
    AmbientEffects, CelestialBody, Presenter, Slot, Theme, WeatherCategory,
    ambient::AmbientShape,
    render::{DailyItem, HourlyItem},
};

const SKY_WIDTH: usize = 60;

#[derive(Debug, Default)]
pub struct TerminalPresenter {
    slots: HashMap<Slot, String>,
    hourly: Vec<HourlyItem>,
    daily: Vec<DailyItem>,
    theme: Option<Theme>,
    category: Option<WeatherCategory>,
    loading: bool,
    notice: Option<String>,
}

impl Presenter for TerminalPresenter {
    fn set_slot(&mut self, slot: Slot, value: &str) {
        self.slots.insert(slot, value.to_string());
    }

    fn set_hourly(&mut self, items: &[HourlyItem]) {
        self.hourly = items.to_vec();
    }

    fn set_daily(&mut self, items: &[DailyItem]) {
        self.daily = items.to_vec();
    }

    fn set_theme(&mut self, theme: Theme) {
        self.theme = Some(theme);
    }

    fn set_category(&mut self, category: WeatherCategory) {
        self.category = Some(category);
    }

    fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    fn set_notice(&mut self, notice: Option<&str>) {
        self.notice = notice.map(str::to_string);
    }
}

impl TerminalPresenter {
    fn slot(&self, slot: Slot) -> &str {
        self.slots.get(&slot).map(String::as_str).unwrap_or("")
    }

    /// Full dashboard as text. `sky` adds the animated ambient strip.
    pub fn render(&self, sky: Option<(&AmbientEffects, Duration)>) -> String {
        let mut out = String::new();
        let theme = self.theme.unwrap_or(Theme::Day);

        let _ = writeln!(out, "{}  [{theme}]", self.slot(Slot::DateTime));

        if let Some((ambient, elapsed)) = sky {
            let _ = writeln!(out, "{}", sky_line(ambient, elapsed, theme, SKY_WIDTH));
        }

        if self.slots.contains_key(&Slot::CityName) {
            let _ = writeln!(out, "{} · {}", self.slot(Slot::CityName), self.slot(Slot::Region));
            let _ = writeln!(
                out,
                "{}  {}{}  {}  ({})  [{}]",
                self.slot(Slot::WeatherGlyph),
                self.slot(Slot::Temperature),
                self.slot(Slot::TempUnit),
                self.slot(Slot::Condition),
                self.slot(Slot::FeelsLike),
                self.category.map(|c| c.as_str()).unwrap_or("default"),
            );
            let _ = writeln!(
                out,
                "Humidity {}   Wind {} {} (gust {})   Pressure {}",
                self.slot(Slot::Humidity),
                self.slot(Slot::WindSpeed),
                self.slot(Slot::WindDirection),
                self.slot(Slot::WindGust),
                self.slot(Slot::Pressure),
            );
            let _ = writeln!(
                out,
                "Visibility {}   UV {}   Clouds {}   Precipitation {}",
                self.slot(Slot::Visibility),
                self.slot(Slot::UvIndex),
                self.slot(Slot::CloudCover),
                self.slot(Slot::Precipitation),
            );
            let _ = writeln!(
                out,
                "Sunrise {}   Sunset {}",
                self.slot(Slot::Sunrise),
                self.slot(Slot::Sunset)
            );
            let _ = writeln!(
                out,
                "Moon {} {} lit, sets {}   Next full moon: {}",
                self.slot(Slot::MoonGlyph),
                self.slot(Slot::MoonIllumination),
                self.slot(Slot::MoonSet),
                self.slot(Slot::NextFullMoon),
            );

            let hourly: Vec<String> =
                self.hourly.iter().map(|h| format!("{} {} {}°", h.time, h.glyph, h.temp)).collect();
            let _ = writeln!(out, "\nNext 24h: {}", hourly.join(" | "));

            let daily: Vec<String> = self
                .daily
                .iter()
                .map(|d| format!("{} {} {}°/{}°", d.day, d.glyph, d.max, d.min))
                .collect();
            let _ = writeln!(out, "Outlook:  {}", daily.join(" | "));
        } else {
            let _ = writeln!(out, "No weather loaded yet.");
        }

        if self.loading {
            let _ = writeln!(out, "\nLoading…");
        }
        if let Some(notice) = &self.notice {
            let _ = writeln!(out, "\n! {notice}");
        }

        out
    }
}

/// One row of sky: stars by night, drifting clouds, falling rain and the
/// sun or moon in the corner.
pub fn sky_line(ambient: &AmbientEffects, elapsed: Duration, theme: Theme, width: usize) -> String {
    let mut row = vec![' '; width];
    let column = |pct: f64| ((pct / 100.0) * width as f64).clamp(0.0, (width - 1) as f64) as usize;

    for element in ambient.elements() {
        match &element.shape {
            AmbientShape::Star { left_vw, delay, duration, .. } if theme == Theme::Night => {
                let phase = (elapsed + *delay).as_secs_f64() % duration.as_secs_f64();
                let twinkle = phase < duration.as_secs_f64() / 2.0;
                row[column(*left_vw)] = if twinkle { '·' } else { '.' };
            }
            AmbientShape::Cloud { .. } if ambient.cloud_opacity() > 0.0 => {
                if let Some(progress) = element.progress(elapsed) {
                    row[column(progress * 100.0)] = '☁';
                }
            }
            AmbientShape::RainDrop { left_vw, .. } => {
                row[column(*left_vw)] = '/';
            }
            _ => {}
        }
    }

    if let Some(last) = row.last_mut() {
        *last = match CelestialBody::for_theme(theme) {
            CelestialBody::Sun => '☀',
            CelestialBody::Moon => '☾',
        };
    }

    row.into_iter().collect()
}
