//! One-shot device position.

use async_trait::async_trait;

use crate::{Config, error::LocationError, model::Coordinates};

#[async_trait]
pub trait LocationSource: Send + Sync {
    async fn current_position(&self) -> Result<Coordinates, LocationError>;
}

/// Position taken from the user's configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfiguredLocation {
    allowed: bool,
    position: Option<Coordinates>,
}

impl ConfiguredLocation {
    pub fn new(allowed: bool, position: Option<Coordinates>) -> Self {
        Self { allowed, position }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.allow_location, config.default_location)
    }
}

#[async_trait]
impl LocationSource for ConfiguredLocation {
    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        if !self.allowed {
            return Err(LocationError::PermissionDenied);
        }
        self.position.ok_or(LocationError::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn denied_wins_over_configured_position() {
        let source = ConfiguredLocation::new(false, Some(Coordinates::default()));
        assert_eq!(source.current_position().await, Err(LocationError::PermissionDenied));
    }

    #[tokio::test]
    async fn missing_position_is_unavailable() {
        let source = ConfiguredLocation::from_config(&Config::default());
        assert_eq!(source.current_position().await, Err(LocationError::Unavailable));
    }

    #[tokio::test]
    async fn configured_position_is_returned() {
        let coords = Coordinates::new(21.0285, 105.8542);
        let source = ConfiguredLocation::new(true, Some(coords));
        assert_eq!(source.current_position().await, Ok(coords));
    }
}
