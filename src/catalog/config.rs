//! Catalog generation parameters.

/// Configuration for generating an item catalog.
///
/// # Examples
///
/// ```
/// use coin_route::catalog::CatalogConfig;
///
/// let config = CatalogConfig::default()
///     .with_grid(10, 10)
///     .with_count(25)
///     .with_seed(7);
/// assert_eq!(config.capacity(), 100);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CatalogConfig {
    /// Grid width. Coordinates are drawn from `[0, width)`.
    pub width: u32,

    /// Grid height. Coordinates are drawn from `[0, height)`.
    pub height: u32,

    /// Number of items to place.
    pub count: usize,

    /// Seed for the placement stream.
    pub seed: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            width: 20,
            height: 20,
            count: 100,
            seed: 1,
        }
    }
}

impl CatalogConfig {
    pub fn with_grid(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Number of distinct cells on the grid.
    pub fn capacity(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Validates the configuration.
    ///
    /// Placement capacity is reported separately by
    /// [`generate`](super::generate) as a typed error.
    pub fn validate(&self) -> Result<(), String> {
        if self.width > i32::MAX as u32 || self.height > i32::MAX as u32 {
            return Err(format!(
                "grid {}x{} exceeds the coordinate range",
                self.width, self.height
            ));
        }
        if self.count > 0 && self.capacity() == 0 {
            return Err("grid must have at least one cell".into());
        }
        Ok(())
    }
}
