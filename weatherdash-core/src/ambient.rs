//! Decorative background elements: drifting clouds, rain and a starfield.
//!
//! Nothing here reads weather data. Elements live in an arena with explicit
//! expiry instants; [`AmbientEffects::tick`] fires every timer that has come
//! due and sweeps whatever has expired, so a slow caller never accumulates
//! stale elements.
//!
//! Time is an elapsed [`Duration`] since the controller was created. The
//! caller owns the clock, which keeps the controller deterministic under test.

use std::{collections::VecDeque, time::Duration};

use rand::{RngExt, SeedableRng, rngs::StdRng};

use crate::{classify::WeatherCategory, theme::Theme};

const CLOUD_BASE_WIDTH_PX: f64 = 120.0;
const CLOUD_BASE_HEIGHT_PX: f64 = 50.0;
const CLOUD_INITIAL_COUNT: u32 = 5;
const CLOUD_INITIAL_STAGGER: Duration = Duration::from_secs(4);
const CLOUD_SPAWN_PERIOD: Duration = Duration::from_secs(8);
const CLOUD_SAFETY_MARGIN: Duration = Duration::from_secs(10);

const RAIN_SPAWN_PERIOD: Duration = Duration::from_millis(30);
const RAINDROP_LIFETIME: Duration = Duration::from_secs(1);

pub const STAR_COUNT: usize = 120;

pub const CLOUD_OPACITY_VISIBLE: f32 = 0.6;
pub const CLOUD_OPACITY_HIDDEN: f32 = 0.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AmbientKind {
    Cloud,
    RainDrop,
    Star,
}

/// Randomised geometry and timing of one element.
#[derive(Debug, Clone, PartialEq)]
pub enum AmbientShape {
    Cloud {
        width_px: f64,
        height_px: f64,
        top_pct: f64,
        duration: Duration,
        delay: Duration,
    },
    RainDrop {
        left_vw: f64,
        duration: Duration,
    },
    Star {
        left_vw: f64,
        top_vh: f64,
        delay: Duration,
        duration: Duration,
    },
}

impl AmbientShape {
    pub fn kind(&self) -> AmbientKind {
        match self {
            AmbientShape::Cloud { .. } => AmbientKind::Cloud,
            AmbientShape::RainDrop { .. } => AmbientKind::RainDrop,
            AmbientShape::Star { .. } => AmbientKind::Star,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AmbientElement {
    pub id: u64,
    pub shape: AmbientShape,
    pub born_at: Duration,
    /// `None` for elements that are never removed (stars).
    pub expires_at: Option<Duration>,
}

impl AmbientElement {
    pub fn kind(&self) -> AmbientKind {
        self.shape.kind()
    }

    fn is_alive(&self, now: Duration) -> bool {
        self.expires_at.is_none_or(|at| at > now)
    }

    /// How far a cloud or raindrop is through one animation run, in `0.0..=1.0`.
    /// `None` before the animation starts, or for stars.
    pub fn progress(&self, now: Duration) -> Option<f64> {
        let (delay, duration) = match self.shape {
            AmbientShape::Cloud { delay, duration, .. } => (delay, duration),
            AmbientShape::RainDrop { duration, .. } => (Duration::ZERO, duration),
            AmbientShape::Star { .. } => return None,
        };

        let started = self.born_at + delay;
        let elapsed = now.checked_sub(started)?;
        Some((elapsed.as_secs_f64() / duration.as_secs_f64()).min(1.0))
    }
}

/// Which celestial decoration the current theme shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CelestialBody {
    Sun,
    Moon,
}

impl CelestialBody {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Day => CelestialBody::Sun,
            Theme::Night => CelestialBody::Moon,
        }
    }
}

#[derive(Debug, Clone)]
struct RepeatingTimer {
    period: Duration,
    next_fire: Duration,
}

impl RepeatingTimer {
    /// Starts a timer whose first firing is one period after `now`.
    fn start(period: Duration, now: Duration) -> Self {
        Self { period, next_fire: now + period }
    }

    /// Returns the next firing instant if it is due and advances past it.
    fn poll(&mut self, now: Duration) -> Option<Duration> {
        if self.next_fire > now {
            return None;
        }
        let fired = self.next_fire;
        self.next_fire += self.period;
        Some(fired)
    }
}

#[derive(Debug)]
pub struct AmbientEffects {
    rng: StdRng,
    next_id: u64,
    elements: Vec<AmbientElement>,
    pending_clouds: VecDeque<Duration>,
    cloud_timer: RepeatingTimer,
    rain_timer: Option<RepeatingTimer>,
    cloud_opacity: f32,
}

impl AmbientEffects {
    /// Creates the controller at elapsed time zero with the starfield in place
    /// and the first clouds scheduled.
    pub fn new(seed: u64) -> Self {
        let mut effects = Self {
            rng: StdRng::seed_from_u64(seed),
            next_id: 0,
            elements: Vec::new(),
            pending_clouds: (0..CLOUD_INITIAL_COUNT).map(|i| CLOUD_INITIAL_STAGGER * i).collect(),
            cloud_timer: RepeatingTimer::start(CLOUD_SPAWN_PERIOD, Duration::ZERO),
            rain_timer: None,
            cloud_opacity: CLOUD_OPACITY_VISIBLE,
        };

        for _ in 0..STAR_COUNT {
            let shape = AmbientShape::Star {
                left_vw: effects.rng.random_range(0.0..100.0),
                top_vh: effects.rng.random_range(0.0..100.0),
                delay: Duration::from_secs_f64(effects.rng.random_range(0.0..4.0)),
                duration: Duration::from_secs_f64(effects.rng.random_range(3.0..6.0)),
            };
            effects.insert(shape, Duration::ZERO, None);
        }

        effects
    }

    pub fn from_entropy() -> Self {
        Self::new(rand::rng().random())
    }

    /// Fires every due timer up to `now` and drops expired elements.
    pub fn tick(&mut self, now: Duration) {
        while self.pending_clouds.front().is_some_and(|at| *at <= now) {
            if let Some(at) = self.pending_clouds.pop_front() {
                self.spawn_cloud(at);
            }
        }

        while let Some(at) = self.cloud_timer.poll(now) {
            self.spawn_cloud(at);
        }

        let mut drops = Vec::new();
        if let Some(timer) = self.rain_timer.as_mut() {
            while let Some(at) = timer.poll(now) {
                // Drops that would already be gone are never materialised.
                if at + RAINDROP_LIFETIME > now {
                    drops.push(at);
                }
            }
        }
        for at in drops {
            self.spawn_raindrop(at);
        }

        let before = self.elements.len();
        self.elements.retain(|e| e.is_alive(now));
        let swept = before - self.elements.len();
        if swept > 0 {
            tracing::trace!(swept, remaining = self.elements.len(), "swept ambient elements");
        }
    }

    /// Starts or stops the raindrop timer. Repeating the current state is a
    /// no-op; returns whether anything changed.
    pub fn set_rain_active(&mut self, on: bool, now: Duration) -> bool {
        match (on, self.rain_timer.is_some()) {
            (true, false) => {
                self.rain_timer = Some(RepeatingTimer::start(RAIN_SPAWN_PERIOD, now));
                tracing::debug!("rain started");
                true
            }
            (false, true) => {
                self.rain_timer = None;
                tracing::debug!("rain stopped");
                true
            }
            _ => false,
        }
    }

    /// Binds the ambient layer to a classified category: clear skies hide the
    /// cloud layer without stopping its timers, and rain falls only for rain.
    pub fn apply_category(&mut self, category: WeatherCategory, now: Duration) {
        self.cloud_opacity = if category == WeatherCategory::Clear {
            CLOUD_OPACITY_HIDDEN
        } else {
            CLOUD_OPACITY_VISIBLE
        };
        self.set_rain_active(category == WeatherCategory::Rain, now);
    }

    pub fn rain_active(&self) -> bool {
        self.rain_timer.is_some()
    }

    pub fn cloud_opacity(&self) -> f32 {
        self.cloud_opacity
    }

    pub fn elements(&self) -> &[AmbientElement] {
        &self.elements
    }

    pub fn count(&self, kind: AmbientKind) -> usize {
        self.elements.iter().filter(|e| e.kind() == kind).count()
    }

    fn spawn_cloud(&mut self, at: Duration) {
        let scale = self.rng.random_range(0.8..1.4);
        let duration = Duration::from_secs_f64(self.rng.random_range(25.0..45.0));
        let shape = AmbientShape::Cloud {
            width_px: CLOUD_BASE_WIDTH_PX * scale,
            height_px: CLOUD_BASE_HEIGHT_PX * scale,
            top_pct: self.rng.random_range(0.0..40.0),
            duration,
            delay: Duration::from_secs_f64(self.rng.random_range(0.0..10.0)),
        };
        self.insert(shape, at, Some(at + duration + CLOUD_SAFETY_MARGIN));
    }

    fn spawn_raindrop(&mut self, at: Duration) {
        let shape = AmbientShape::RainDrop {
            left_vw: self.rng.random_range(0.0..100.0),
            duration: Duration::from_secs_f64(self.rng.random_range(0.5..1.0)),
        };
        self.insert(shape, at, Some(at + RAINDROP_LIFETIME));
    }

    fn insert(&mut self, shape: AmbientShape, born_at: Duration, expires_at: Option<Duration>) {
        let id = self.next_id;
        self.next_id += 1;
        self.elements.push(AmbientElement { id, shape, born_at, expires_at });
    }
}
