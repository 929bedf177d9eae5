//! Error taxonomy for the resolution and schedule pipeline.

use thiserror::Error;

/// Coarse error kind, used by the session to decide what to tell the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Upstream,
    GeolocationDenied,
    InvalidTimezone,
}

#[derive(Debug, Error)]
pub enum PrayerError {
    #[error("no usable place found for \"{query}\"")]
    NotFound { query: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed {context} payload: {reason}")]
    MalformedPayload { context: String, reason: String },

    #[error("device location unavailable: {reason}")]
    GeolocationDenied { reason: String },

    #[error("unusable timezone \"{timezone}\"")]
    InvalidTimezone { timezone: String },
}

impl PrayerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Http(_)
            | Self::UnexpectedStatus { .. }
            | Self::Deserialize { .. }
            | Self::MalformedPayload { .. } => ErrorKind::Upstream,
            Self::GeolocationDenied { .. } => ErrorKind::GeolocationDenied,
            Self::InvalidTimezone { .. } => ErrorKind::InvalidTimezone,
        }
    }

    pub fn is_upstream(&self) -> bool {
        self.kind() == ErrorKind::Upstream
    }

    pub(crate) fn malformed(context: &str, reason: impl Into<String>) -> Self {
        Self::MalformedPayload {
            context: context.to_string(),
            reason: reason.into(),
        }
    }

    /// The single message shown to the user for this failure.
    pub fn user_message(&self) -> &'static str {
        match self.kind() {
            ErrorKind::NotFound => {
                "Failed to fetch prayer times. Please check the city name and try again."
            }
            ErrorKind::Upstream => "Failed to fetch prayer times. Please try again.",
            ErrorKind::GeolocationDenied => {
                "Unable to get your location. Please allow location access or search by city name."
            }
            ErrorKind::InvalidTimezone => "Unknown timezone, showing device time instead.",
        }
    }
}
