use reqwest::StatusCode;
use thiserror::Error;

/// Why a single fetch did not produce a [`WeatherData`](crate::WeatherData).
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request could not be sent or no response arrived.
    #[error("Network error: {0}")]
    Network(String),

    /// The provider answered with a non-2xx status.
    #[error("Provider responded with status {status}: {body}")]
    Provider { status: StatusCode, body: String },

    /// The body is not JSON or lacks a field `WeatherData` needs.
    #[error("Unexpected response shape: {0}")]
    Shape(String),

    #[error("City name must not be empty")]
    EmptyCity,

    /// The HTTP client could not be built from configuration.
    #[error("Failed to initialize HTTP client: {0}")]
    Client(String),
}

impl FetchError {
    /// Short label for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Network(_) => "network",
            FetchError::Provider { .. } => "provider",
            FetchError::Shape(_) => "shape",
            FetchError::EmptyCity => "empty_city",
            FetchError::Client(_) => "client",
        }
    }
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }

    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
