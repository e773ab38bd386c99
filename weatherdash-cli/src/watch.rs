//! Live dashboard: one event loop owning the session, fed by stdin commands,
//! timers and completed background fetches.

use std::{sync::Arc, time::Duration};

use anyhow::Result;
use chrono::Local;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
    time::{self, Instant, MissedTickBehavior},
};
use weatherdash_core::{
    AmbientEffects, AppController, Config, Coordinates, FetchError, GeolocationError, Geolocator,
    WeatherProvider, WeatherSnapshot,
};

use crate::terminal::TerminalPresenter;

const CLOCK_PERIOD: Duration = Duration::from_secs(60);
const THEME_PERIOD: Duration = Duration::from_secs(3600);
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

pub struct WatchOptions {
    pub config: Config,
    pub provider: Arc<dyn WeatherProvider>,
    pub geolocator: Arc<dyn Geolocator>,
    pub location: Option<String>,
    pub frame: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Search(String),
    Locate,
    ToggleUnit,
    ToggleTheme,
    Retry,
    Quit,
    Help,
    Nothing,
}

/// Bare text searches; a few words are commands.
pub fn parse_input(line: &str) -> Input {
    let line = line.trim();
    match line.to_lowercase().as_str() {
        "" => Input::Nothing,
        "locate" | "l" => Input::Locate,
        "unit" | "u" => Input::ToggleUnit,
        "theme" | "t" => Input::ToggleTheme,
        "retry" | "r" => Input::Retry,
        "quit" | "q" | "exit" => Input::Quit,
        "help" | "?" => Input::Help,
        _ => Input::Search(strip_search_prefix(line).to_string()),
    }
}

fn strip_search_prefix(line: &str) -> &str {
    const PREFIX: &str = "search ";
    match line.get(..PREFIX.len()) {
        Some(head) if head.eq_ignore_ascii_case(PREFIX) => line[PREFIX.len()..].trim_start(),
        _ => line,
    }
}

/// Maps one read from stdin to an input. `None` means stdin is closed; a line
/// that cannot be decoded is skipped.
fn read_input(line: std::io::Result<Option<String>>) -> Option<Input> {
    match line {
        Ok(Some(line)) => Some(parse_input(&line)),
        Ok(None) => None,
        Err(e) => {
            tracing::warn!(error = %e, "ignoring unreadable input");
            Some(Input::Nothing)
        }
    }
}

const HELP: &str =
    "Type a city to search · locate (l) · unit (u) · theme (t) · retry (r) · quit (q)";

enum Completion {
    Fetched { query: String, result: Result<WeatherSnapshot, FetchError> },
    Located(Result<Coordinates, GeolocationError>),
}

struct Watch {
    app: AppController,
    ambient: AmbientEffects,
    screen: TerminalPresenter,
    provider: Arc<dyn WeatherProvider>,
    geolocator: Arc<dyn Geolocator>,
    tx: mpsc::UnboundedSender<Completion>,
    started: Instant,
    show_help: bool,
}

impl Watch {
    fn fetch(&self, query: Option<String>) {
        let Some(query) = query else { return };
        let provider = Arc::clone(&self.provider);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = provider.fetch(&query).await;
            let _ = tx.send(Completion::Fetched { query, result });
        });
    }

    fn locate(&self) {
        let geolocator = Arc::clone(&self.geolocator);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(Completion::Located(geolocator.locate().await));
        });
    }

    fn handle_input(&mut self, input: Input) -> bool {
        match input {
            Input::Search(text) => {
                let query = self.app.search(&text);
                self.fetch(query);
            }
            Input::Locate => self.locate(),
            Input::ToggleUnit => {
                self.app.toggle_unit();
            }
            Input::ToggleTheme => {
                self.app.toggle_theme();
            }
            Input::Retry => {
                let query = self.app.retry();
                self.fetch(query);
            }
            Input::Help => self.show_help = !self.show_help,
            Input::Quit => return false,
            Input::Nothing => {}
        }
        true
    }

    fn handle_completion(&mut self, completion: Completion) {
        match completion {
            Completion::Fetched { query, result } => {
                // Failures are already logged and surfaced as a notice.
                let _ = self.app.complete_fetch(&query, result, Local::now());
            }
            Completion::Located(result) => {
                let query = self.app.geolocated(result, Local::now());
                self.fetch(query);
            }
        }
    }

    fn redraw(&mut self) {
        let elapsed = self.started.elapsed();
        let now = Local::now();

        self.app.expire_notice(now);
        self.ambient.tick(elapsed);
        self.app.draw(&mut self.screen, &mut self.ambient, now, elapsed);

        let mut frame = String::from(CLEAR_SCREEN);
        frame.push_str(&self.screen.render(Some((&self.ambient, elapsed))));
        if self.show_help {
            frame.push('\n');
            frame.push_str(HELP);
        }
        frame.push_str("\n> ");
        print!("{frame}");
        let _ = std::io::Write::flush(&mut std::io::stdout());
    }
}

pub async fn run(options: WatchOptions) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();

    let mut watch = Watch {
        app: AppController::new(&options.config, Local::now()),
        ambient: AmbientEffects::from_entropy(),
        screen: TerminalPresenter::default(),
        provider: options.provider,
        geolocator: options.geolocator,
        tx,
        started: Instant::now(),
        show_help: true,
    };

    match options.location {
        Some(location) => {
            let query = watch.app.search(&location);
            watch.fetch(query);
        }
        None => watch.locate(),
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let mut frame = time::interval(options.frame);
    frame.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut clock_timer = time::interval_at(Instant::now() + CLOCK_PERIOD, CLOCK_PERIOD);
    let mut theme_timer = time::interval_at(Instant::now() + THEME_PERIOD, THEME_PERIOD);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                match read_input(line) {
                    Some(input) => {
                        if !watch.handle_input(input) {
                            break;
                        }
                    }
                    None => break,
                }
            }
            Some(completion) = rx.recv() => watch.handle_completion(completion),
            _ = frame.tick() => {}
            _ = clock_timer.tick() => {
                tracing::trace!("clock refresh");
            }
            _ = theme_timer.tick() => {
                let theme = watch.app.refresh_theme(Local::now());
                tracing::debug!(%theme, "theme recomputed");
            }
        }

        watch.redraw();
    }

    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands_and_searches() {
        assert_eq!(parse_input("  "), Input::Nothing);
        assert_eq!(parse_input("U"), Input::ToggleUnit);
        assert_eq!(parse_input("theme"), Input::ToggleTheme);
        assert_eq!(parse_input("retry"), Input::Retry);
        assert_eq!(parse_input("l"), Input::Locate);
        assert_eq!(parse_input("q"), Input::Quit);
        assert_eq!(parse_input("New York"), Input::Search("New York".into()));
        assert_eq!(parse_input("search Unity"), Input::Search("Unity".into()));
        assert_eq!(parse_input("48.85,2.35"), Input::Search("48.85,2.35".into()));
    }

    #[test]
    fn search_prefix_ignores_case() {
        assert_eq!(parse_input("Search Paris"), Input::Search("Paris".into()));
        assert_eq!(parse_input("SEARCH  New York"), Input::Search("New York".into()));
        assert_eq!(parse_input("Searchlight"), Input::Search("Searchlight".into()));
    }

    #[test]
    fn unreadable_line_keeps_the_loop_alive() {
        let invalid = std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "stream did not contain valid UTF-8",
        );
        assert_eq!(read_input(Err(invalid)), Some(Input::Nothing));
        assert_eq!(read_input(Ok(Some("q".into()))), Some(Input::Quit));
        assert_eq!(read_input(Ok(None)), None);
    }
}
