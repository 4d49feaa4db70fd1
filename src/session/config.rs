//! Session configuration.

use crate::anneal::AnnealConfig;
use crate::catalog::{CatalogConfig, Position};
use crate::route::RouteHorizon;
use std::time::Duration;

/// Everything needed to set up one collection session.
///
/// # Examples
///
/// ```
/// use coin_route::session::SessionConfig;
/// use coin_route::catalog::Position;
/// use std::time::Duration;
///
/// let config = SessionConfig::default()
///     .with_start(Position::new(10, 10))
///     .with_time_limit(30.0)
///     .with_preparation_time(Duration::from_millis(500));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionConfig {
    pub catalog: CatalogConfig,
    pub anneal: AnnealConfig,

    /// Where the agent starts.
    pub start: Position,

    pub horizon: RouteHorizon,

    /// Optimization time spent before the first target is handed out.
    pub preparation_time: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig::default(),
            anneal: AnnealConfig::default(),
            start: Position::new(0, 0),
            horizon: RouteHorizon::default(),
            preparation_time: Duration::from_secs(2),
        }
    }
}

impl SessionConfig {
    pub fn with_catalog(mut self, catalog: CatalogConfig) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_anneal(mut self, anneal: AnnealConfig) -> Self {
        self.anneal = anneal;
        self
    }

    pub fn with_start(mut self, start: Position) -> Self {
        self.start = start;
        self
    }

    pub fn with_time_limit(mut self, time_limit: f64) -> Self {
        self.horizon.time_limit = time_limit;
        self
    }

    pub fn with_speed_factor(mut self, speed_factor: f64) -> Self {
        self.horizon.speed_factor = speed_factor;
        self
    }

    pub fn with_preparation_time(mut self, preparation_time: Duration) -> Self {
        self.preparation_time = preparation_time;
        self
    }

    /// Validates every nested config.
    ///
    /// Placement capacity is checked by [`Session::new`](super::Session::new).
    pub fn validate(&self) -> Result<(), String> {
        self.catalog.validate()?;
        self.anneal.validate()?;
        self.horizon.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SessionConfig::default();
        assert_eq!(config.catalog.count, 100);
        assert_eq!(config.start, Position::new(0, 0));
        assert!((config.horizon.time_limit - 10.0).abs() < 1e-12);
        assert!((config.horizon.speed_factor - 6.0).abs() < 1e-12);
        assert_eq!(config.preparation_time, Duration::from_secs(2));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_propagates_nested_errors() {
        assert!(SessionConfig::default()
            .with_speed_factor(-2.0)
            .validate()
            .is_err());
        assert!(SessionConfig::default()
            .with_anneal(AnnealConfig::default().with_cooling_factor(1.0))
            .validate()
            .is_err());
    }
}
