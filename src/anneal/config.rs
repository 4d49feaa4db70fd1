//! Annealing parameters for the route optimizer.

/// Configuration for the anytime route optimizer.
///
/// Cooling is geometric: after every iteration `T_{k+1} = cooling_factor * T_k`,
/// whether or not the candidate was accepted.
///
/// # Examples
///
/// ```
/// use coin_route::anneal::AnnealConfig;
///
/// let config = AnnealConfig::default()
///     .with_initial_temperature(500.0)
///     .with_cooling_factor(0.95)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnnealConfig {
    /// Starting temperature. Higher values tolerate worse candidates longer.
    pub initial_temperature: f64,

    /// Geometric cooling factor in (0, 1).
    pub cooling_factor: f64,

    /// Seed for neighbor sampling and acceptance draws.
    ///
    /// Independent of the catalog seed. `None` draws a random seed.
    pub seed: Option<u64>,
}

impl Default for AnnealConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 1000.0,
            cooling_factor: 0.90,
            seed: None,
        }
    }
}

impl AnnealConfig {
    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_cooling_factor(mut self, factor: f64) -> Self {
        self.cooling_factor = factor;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.initial_temperature.is_finite() && self.initial_temperature > 0.0) {
            return Err(format!(
                "initial_temperature must be positive and finite, got {}",
                self.initial_temperature
            ));
        }
        if !(self.cooling_factor > 0.0 && self.cooling_factor < 1.0) {
            return Err(format!(
                "cooling_factor must be in (0, 1), got {}",
                self.cooling_factor
            ));
        }
        Ok(())
    }
}
