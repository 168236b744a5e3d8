use thiserror::Error;

/// Rejected user input. Raised before any network call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("Message cannot be empty")]
    EmptyMessage,
}

/// Failures from the weather provider. Display strings are shown to the user as-is.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Invalid Weather API key (401 Unauthorized). Check your WEATHER_API_KEY.")]
    Unauthorized,

    #[error("City '{0}' not found (404). Please check the city name.")]
    NotFound(String),

    #[error("Weather API rate limit exceeded (429). Please wait and try again.")]
    RateLimited,

    #[error("Request timed out while fetching weather for '{0}'.")]
    Timeout(String),

    #[error("Network connection error for '{0}'. Check your internet connection.")]
    ConnectionError(String),

    #[error("Unexpected network error: {0}")]
    Network(String),

    #[error("Weather API returned unexpected status {code}: {body}")]
    UnexpectedStatus { code: u16, body: String },

    #[error("Invalid JSON received from Weather API.")]
    MalformedResponse,
}

/// Failures from the language model.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Language model request failed: {0}")]
    Request(String),

    #[error("Language model returned status {code}: {body}")]
    Status { code: u16, body: String },

    #[error("Failed to decode language model response: {0}")]
    Decode(String),

    #[error("Language model returned no candidates")]
    NoCandidates,

    #[error("Language model returned an empty response.")]
    EmptyOutput,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Cannot parse empty or missing weather data.")]
    EmptyInput,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ComposeError {
    #[error("Language model returned no insight text")]
    EmptyGeneration,

    #[error("Failed to generate insights: {0}")]
    Model(#[from] ModelError),
}

/// Errors that escape [`crate::Assistant::handle`]. Provider and composition
/// failures are folded into the result instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AssistantError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Cap an upstream response body for inclusion in an error message.
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
