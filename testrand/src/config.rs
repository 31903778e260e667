//! Configuration for generation behavior and nullable-value policies.

use std::fmt;

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Invalid max depth (must be > 0)
    InvalidMaxDepth(usize),
    /// Invalid null probability (must be within [0, 1])
    InvalidNullProbability(f32),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidMaxDepth(n) => {
                write!(f, "Invalid max depth: {} (must be > 0)", n)
            }
            ConfigError::InvalidNullProbability(p) => {
                write!(f, "Invalid null probability: {} (must be within [0, 1])", p)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Configuration for generators
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    /// Hint for the size of generated collections and strings when no
    /// length constraint narrows it
    pub size_hint: usize,
    /// Maximum depth for nested generation through parameterized targets
    pub max_depth: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            size_hint: 10,
            max_depth: 5,
        }
    }
}

impl GenerationConfig {
    /// Create a new generation configuration with validation
    pub fn new(size_hint: usize, max_depth: usize) -> Result<Self, ConfigError> {
        let config = Self { size_hint, max_depth };
        config.validate()?;
        Ok(config)
    }

    /// Validate the generation configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::InvalidMaxDepth(self.max_depth));
        }
        Ok(())
    }
}

/// The default probability of a nullable slot staying empty.
pub const DEFAULT_NULL_PROBABILITY: f32 = 0.3;

/// Decides whether a nullable slot receives a value at all.
///
/// The decision belongs to the calling layer, never to a generator: the
/// generator contract always produces a value or fails. The policy is a
/// parameter of the call site, not a registry-wide setting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NullPolicy {
    probability: f32,
}

impl NullPolicy {
    /// Create a policy with the given probability of producing no value.
    pub fn new(probability: f32) -> Result<Self, ConfigError> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(ConfigError::InvalidNullProbability(probability));
        }
        Ok(Self { probability })
    }

    /// A policy that always produces a value.
    pub fn never() -> Self {
        Self { probability: 0.0 }
    }

    /// A policy that never produces a value.
    pub fn always() -> Self {
        Self { probability: 1.0 }
    }

    /// The probability of producing no value.
    pub fn probability(&self) -> f32 {
        self.probability
    }

    /// Draw the nullable decision.
    pub fn should_be_null(&self, rng: &mut dyn rand::RngCore) -> bool {
        use rand::Rng;
        if self.probability <= 0.0 {
            return false;
        }
        if self.probability >= 1.0 {
            return true;
        }
        rng.r#gen_range(0.0f32..1.0) < self.probability
    }
}

impl Default for NullPolicy {
    fn default() -> Self {
        Self {
            probability: DEFAULT_NULL_PROBABILITY,
        }
    }
}
