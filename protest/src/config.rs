//! Configuration types for property and stateful runs.

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    InvalidNumRuns(usize),
    InvalidMaxDepth(usize),
    InvalidActionBounds { min: usize, max: usize },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidNumRuns(n) => {
                write!(f, "invalid num_runs: {n} (must be > 0)")
            }
            ConfigError::InvalidMaxDepth(n) => {
                write!(f, "invalid max_depth: {n} (must be > 0)")
            }
            ConfigError::InvalidActionBounds { min, max } => {
                write!(f, "invalid action bounds: min={min} > max={max}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Knobs for collection generators' default length ranges and nesting
/// depth.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Hint for the size of generated collections when no explicit
    /// length range is given.
    pub size_hint: usize,
    /// Maximum nesting depth for recursive generators.
    pub max_depth: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            size_hint: 10,
            max_depth: 5,
        }
    }
}

impl GeneratorConfig {
    pub fn new(size_hint: usize, max_depth: usize) -> Result<Self, ConfigError> {
        if max_depth == 0 {
            return Err(ConfigError::InvalidMaxDepth(max_depth));
        }
        Ok(Self {
            size_hint,
            max_depth,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::InvalidMaxDepth(self.max_depth));
        }
        Ok(())
    }
}

/// Configuration for a single property run.
#[derive(Debug, Clone)]
pub struct TestConfig {
    /// Number of samples to draw before declaring success.
    pub num_runs: usize,
    /// Opaque seed string. Empty means "choose from wall clock".
    pub seed: String,
    /// Print each attempted sample / shrink step as it runs.
    pub verbose: bool,
    pub generator_config: GeneratorConfig,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            num_runs: 200,
            seed: String::new(),
            verbose: false,
            generator_config: GeneratorConfig::default(),
        }
    }
}

impl TestConfig {
    pub fn new(num_runs: usize, seed: impl Into<String>) -> Result<Self, ConfigError> {
        if num_runs == 0 {
            return Err(ConfigError::InvalidNumRuns(num_runs));
        }
        Ok(Self {
            num_runs,
            seed: seed.into(),
            ..Default::default()
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_runs == 0 {
            return Err(ConfigError::InvalidNumRuns(self.num_runs));
        }
        self.generator_config.validate()
    }
}

/// Configuration for a stateful run, extending `TestConfig` with the
/// action-count bounds.
#[derive(Debug, Clone)]
pub struct StatefulConfig {
    pub base: TestConfig,
    pub min_actions: usize,
    pub max_actions: usize,
}

impl Default for StatefulConfig {
    fn default() -> Self {
        Self {
            base: TestConfig::default(),
            min_actions: 1,
            max_actions: 100,
        }
    }
}

impl StatefulConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.base.validate()?;
        if self.min_actions > self.max_actions {
            return Err(ConfigError::InvalidActionBounds {
                min: self.min_actions,
                max: self.max_actions,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_test_config_matches_spec_defaults() {
        let config = TestConfig::default();
        assert_eq!(config.num_runs, 200);
        assert_eq!(config.seed, "");
        assert!(!config.verbose);
    }

    #[test]
    fn zero_num_runs_is_rejected() {
        assert!(matches!(
            TestConfig::new(0, "seed"),
            Err(ConfigError::InvalidNumRuns(0))
        ));
    }

    #[test]
    fn zero_max_depth_is_rejected() {
        assert!(matches!(
            GeneratorConfig::new(10, 0),
            Err(ConfigError::InvalidMaxDepth(0))
        ));
    }

    #[test]
    fn stateful_config_rejects_inverted_bounds() {
        let mut config = StatefulConfig::default();
        config.min_actions = 10;
        config.max_actions = 5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidActionBounds { min: 10, max: 5 })
        ));
    }
}
