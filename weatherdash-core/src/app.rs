//! Session lifecycle: what to fetch, what happened, what to show.
//!
//! The controller never performs I/O. Triggers (`search`, `geolocated`,
//! `retry`) hand back the query the caller should fetch; the caller reports
//! the outcome through [`AppController::complete_fetch`]. Fetches are not
//! sequenced: whichever completes last replaces the snapshot.

use std::time::Duration;

use chrono::{DateTime, Local, NaiveDate, TimeDelta};

use crate::{
    Config,
    ambient::AmbientEffects,
    error::{FetchError, GeolocationError},
    geolocation::Coordinates,
    model::WeatherSnapshot,
    render::{DashboardView, Presenter, Slot, clock_text, render},
    theme::Theme,
    units::UnitPreference,
};

const NOTICE_LIFETIME_SECS: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Loaded,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    GeolocationUnavailable,
    GeolocationFallback,
    FetchFailed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    pub shown_at: DateTime<Local>,
}

/// The only mutable state the dashboard has.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub unit: UnitPreference,
    /// Query reused by retry.
    pub location: Option<String>,
    pub snapshot: Option<WeatherSnapshot>,
    pub theme: Theme,
}

#[derive(Debug)]
pub struct AppController {
    session: Session,
    phase: Phase,
    notice: Option<Notice>,
    default_location: String,
    full_moons: Vec<NaiveDate>,
}

impl AppController {
    pub fn new(config: &Config, now: DateTime<Local>) -> Self {
        Self {
            session: Session {
                unit: config.unit,
                location: None,
                snapshot: None,
                theme: Theme::for_time(&now),
            },
            phase: Phase::Idle,
            notice: None,
            default_location: config.default_location.clone(),
            full_moons: config.full_moons.clone(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Blank input is ignored. Otherwise the query becomes the retry target.
    pub fn search(&mut self, text: &str) -> Option<String> {
        let query = text.trim();
        if query.is_empty() {
            return None;
        }
        self.session.location = Some(query.to_string());
        Some(self.begin_fetch(query))
    }

    /// Handles the outcome of a position request.
    pub fn geolocated(
        &mut self,
        result: Result<Coordinates, GeolocationError>,
        now: DateTime<Local>,
    ) -> Option<String> {
        match result {
            Ok(coords) => {
                let query = coords.query();
                self.session.location = Some(query.clone());
                Some(self.begin_fetch(&query))
            }
            Err(GeolocationError::Unavailable) => {
                self.show_notice(
                    NoticeKind::GeolocationUnavailable,
                    "Geolocation is not supported on this system.".to_string(),
                    now,
                );
                None
            }
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    fallback = %self.default_location,
                    "geolocation failed"
                );
                let fallback = self.default_location.clone();
                self.show_notice(
                    NoticeKind::GeolocationFallback,
                    format!("Unable to get your location. Showing {fallback} weather."),
                    now,
                );
                self.session.location = Some(fallback.clone());
                Some(self.begin_fetch(&fallback))
            }
        }
    }

    /// Dismisses any notice and refetches the last known location, if any.
    pub fn retry(&mut self) -> Option<String> {
        self.notice = None;
        let query = self.session.location.clone()?;
        Some(self.begin_fetch(&query))
    }

    /// Records a finished fetch. Failures leave the previous snapshot in place.
    pub fn complete_fetch(
        &mut self,
        query: &str,
        result: Result<WeatherSnapshot, FetchError>,
        now: DateTime<Local>,
    ) -> Result<(), FetchError> {
        let outcome = result.and_then(|snapshot| {
            render(&snapshot, self.session.unit, &now, &self.full_moons).map(|_| snapshot)
        });

        match outcome {
            Ok(snapshot) => {
                tracing::debug!(query, location = %snapshot.location.name, "fetch succeeded");
                self.session.snapshot = Some(snapshot);
                self.phase = Phase::Loaded;
                Ok(())
            }
            Err(err) => {
                tracing::warn!(query, error = %err, "fetch failed");
                self.phase = Phase::Error;
                self.show_notice(
                    NoticeKind::FetchFailed,
                    "Unable to fetch weather data. Please try again.".to_string(),
                    now,
                );
                Err(err)
            }
        }
    }

    /// Flips the unit. The existing snapshot is re-rendered, never refetched.
    pub fn toggle_unit(&mut self) -> UnitPreference {
        self.session.unit = self.session.unit.toggled();
        self.session.unit
    }

    /// Local override; the next [`Self::refresh_theme`] replaces it.
    pub fn toggle_theme(&mut self) -> Theme {
        self.session.theme = self.session.theme.toggled();
        self.session.theme
    }

    pub fn refresh_theme(&mut self, now: DateTime<Local>) -> Theme {
        self.session.theme = Theme::for_time(&now);
        self.session.theme
    }

    /// Hides a notice once it has been visible long enough. The phase is
    /// left untouched. Returns whether a notice was hidden.
    pub fn expire_notice(&mut self, now: DateTime<Local>) -> bool {
        let expired = self
            .notice
            .as_ref()
            .is_some_and(|n| now - n.shown_at >= TimeDelta::seconds(NOTICE_LIFETIME_SECS));
        if expired {
            self.notice = None;
        }
        expired
    }

    pub fn view(&self, now: DateTime<Local>) -> Option<DashboardView> {
        let snapshot = self.session.snapshot.as_ref()?;
        render(snapshot, self.session.unit, &now, &self.full_moons).ok()
    }

    /// Writes the whole dashboard out and binds the ambient layer to the
    /// current category. `elapsed` is the ambient clock.
    pub fn draw(
        &self,
        presenter: &mut dyn Presenter,
        ambient: &mut AmbientEffects,
        now: DateTime<Local>,
        elapsed: Duration,
    ) {
        presenter.set_theme(self.session.theme);
        presenter.set_slot(Slot::DateTime, &clock_text(&now));
        presenter.set_slot(Slot::TempUnit, self.session.unit.label());

        if let Some(view) = self.view(now) {
            view.present(presenter);
            ambient.apply_category(view.category, elapsed);
        }

        presenter.set_loading(self.phase == Phase::Loading);
        presenter.set_notice(self.notice.as_ref().map(|n| n.message.as_str()));
    }

    fn begin_fetch(&mut self, query: &str) -> String {
        tracing::debug!(query, from = ?self.phase, "loading");
        self.phase = Phase::Loading;
        query.to_string()
    }

    fn show_notice(&mut self, kind: NoticeKind, message: String, now: DateTime<Local>) {
        self.notice = Some(Notice { kind, message, shown_at: now });
    }
}
