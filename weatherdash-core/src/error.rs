use thiserror::Error;

/// Which half of the paired provider request failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Current,
    Forecast,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Current => "current.json",
            Endpoint::Forecast => "forecast.json",
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// A failed fetch. Either half failing fails the whole pair.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {endpoint} failed: {source}")]
    Request {
        endpoint: Endpoint,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} returned status {status}: {body}")]
    Status { endpoint: Endpoint, status: reqwest::StatusCode, body: String },

    #[error("failed to parse {endpoint} response: {source}")]
    Parse {
        endpoint: Endpoint,
        #[source]
        source: serde_json::Error,
    },

    #[error("forecast response contained no forecast days")]
    EmptyForecast,
}

impl FetchError {
    /// The endpoint at fault, if the failure is tied to one.
    pub fn endpoint(&self) -> Option<Endpoint> {
        match self {
            FetchError::Request { endpoint, .. }
            | FetchError::Status { endpoint, .. }
            | FetchError::Parse { endpoint, .. } => Some(*endpoint),
            FetchError::EmptyForecast => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeolocationError {
    #[error("geolocation is not available")]
    Unavailable,
    #[error("geolocation permission denied")]
    Denied,
    #[error("geolocation failed: {0}")]
    Failed(String),
}
