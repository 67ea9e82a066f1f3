//! ABC configuration.

/// Configuration for the Artificial Bee Colony search.
///
/// # Examples
///
/// ```
/// use fleet_abc::abc::AbcConfig;
///
/// let config = AbcConfig::default()
///     .with_max_cycles(200)
///     .with_colony_size(40)
///     .with_limit_divider(4)
///     .with_seed(7);
/// assert_eq!(config.food_number(), 20);
/// assert_eq!(config.limit(), 50);
/// ```
#[derive(Debug, Clone)]
pub struct AbcConfig {
    /// Number of employed/onlooker/scout cycles. The run always performs
    /// exactly this many unless cancelled.
    pub max_cycles: usize,

    /// Number of bees. Half of them are employed, so the colony keeps
    /// `colony_size / 2` food sources.
    pub colony_size: usize,

    /// Divides `max_cycles` to obtain the abandonment limit.
    pub limit_divider: usize,

    /// Allows the null aircraft, i.e. cancelling a flight for a fixed
    /// penalty.
    pub cancellation_allowed: bool,

    /// Random draws allowed when looking for a free aircraft before the
    /// search falls back to an exhaustive pick.
    pub max_feasibility_attempts: usize,

    /// Fail the run instead of costing unmatched reference data as zero.
    pub strict_reference_data: bool,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for AbcConfig {
    fn default() -> Self {
        Self {
            max_cycles: 10,
            colony_size: 10,
            limit_divider: 2,
            cancellation_allowed: false,
            max_feasibility_attempts: 1_000,
            strict_reference_data: false,
            seed: None,
        }
    }
}

impl AbcConfig {
    pub fn with_max_cycles(mut self, n: usize) -> Self {
        self.max_cycles = n;
        self
    }

    pub fn with_colony_size(mut self, n: usize) -> Self {
        self.colony_size = n;
        self
    }

    pub fn with_limit_divider(mut self, d: usize) -> Self {
        self.limit_divider = d;
        self
    }

    pub fn with_cancellation(mut self, allowed: bool) -> Self {
        self.cancellation_allowed = allowed;
        self
    }

    pub fn with_max_feasibility_attempts(mut self, n: usize) -> Self {
        self.max_feasibility_attempts = n;
        self
    }

    pub fn with_strict_reference_data(mut self, strict: bool) -> Self {
        self.strict_reference_data = strict;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Number of food sources (employed bees).
    pub fn food_number(&self) -> usize {
        self.colony_size / 2
    }

    /// Trials after which a non-best food source is abandoned.
    pub fn limit(&self) -> usize {
        self.max_cycles / self.limit_divider.max(1)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_cycles == 0 {
            return Err("max_cycles must be positive".into());
        }
        if self.colony_size < 4 {
            return Err(format!(
                "colony_size must be at least 4 (two food sources), got {}",
                self.colony_size
            ));
        }
        if self.limit_divider == 0 {
            return Err("limit_divider must be positive".into());
        }
        if self.max_feasibility_attempts == 0 {
            return Err("max_feasibility_attempts must be positive".into());
        }
        Ok(())
    }
}
