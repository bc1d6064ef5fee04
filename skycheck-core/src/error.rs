/// Failures of the device location service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocationError {
    #[error("Permission to access location was denied")]
    PermissionDenied,
    #[error("Location service unavailable")]
    Unavailable,
}

/// Everything that can go wrong while talking to the weather provider.
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The provider answered with a non-success status or `cod`.
    #[error("provider error {code}: {message}")]
    Provider { code: u16, message: String },

    #[error("malformed provider response: {0}")]
    Malformed(String),

    #[error(transparent)]
    Location(#[from] LocationError),

    #[error(
        "No OpenWeather API key configured.\n\
         Hint: run `skycheck configure` or set OPENWEATHER_API_KEY."
    )]
    MissingApiKey,
}

impl WeatherError {
    /// Message reported by the provider itself, if any.
    pub fn provider_message(&self) -> Option<&str> {
        match self {
            WeatherError::Provider { message, .. } if !message.is_empty() => Some(message),
            _ => None,
        }
    }
}
