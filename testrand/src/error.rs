//! Error types for generator resolution and value generation.

use std::fmt;

use crate::extractor::ExtractionError;
use crate::target::TargetType;

/// Failure taxonomy for the resolution and generation paths.
///
/// None of these are retried: every failure is deterministic for a fixed
/// registry and fixed metadata, so a retry would reproduce it.
#[derive(Debug, Clone)]
pub enum GeneratorError {
    /// No registered generator is compatible with the requested target.
    NoGenerator {
        /// The requested target.
        target: String,
    },

    /// Several compatible generators tie on priority.
    ///
    /// Resolution never picks arbitrarily among ties; the full candidate
    /// list is surfaced instead so the registry can be fixed.
    AmbiguousGenerators {
        /// The requested target.
        target: String,
        /// The names of every tied candidate.
        candidates: Vec<String>,
    },

    /// A registration arrived after the registry was sealed.
    RegistrySealed {
        /// The name of the rejected registration.
        name: String,
    },

    /// A generator was invoked for a target outside its declared support.
    UnsupportedTarget {
        /// The generator's name.
        generator: String,
        /// The offending target.
        target: String,
    },

    /// A generated value did not have the type the caller requested.
    ValueType {
        /// The resolved target.
        target: String,
        /// The type the caller asked to downcast to.
        requested: &'static str,
    },

    /// Nested generation exceeded the configured depth limit.
    RecursionLimit {
        /// The target whose generation was cut off.
        target: String,
        /// The configured limit.
        limit: usize,
    },

    /// A pattern constraint the resolved generator cannot synthesize from.
    UnsupportedPattern {
        /// The pattern source.
        pattern: String,
        /// Why synthesis is not possible.
        detail: String,
    },

    /// Constraint extraction failed.
    Extraction(ExtractionError),
}

impl GeneratorError {
    /// Create a no-generator error for a target.
    pub fn no_generator(target: &TargetType) -> Self {
        Self::NoGenerator {
            target: target.name().to_string(),
        }
    }

    /// Create an ambiguity error listing every tied candidate.
    pub fn ambiguous(target: &TargetType, candidates: Vec<String>) -> Self {
        Self::AmbiguousGenerators {
            target: target.name().to_string(),
            candidates,
        }
    }

    /// Create a sealed-registry error for a rejected registration.
    pub fn registry_sealed(name: impl Into<String>) -> Self {
        Self::RegistrySealed { name: name.into() }
    }

    /// Create an unsupported-target error.
    pub fn unsupported_target(generator: impl Into<String>, target: &TargetType) -> Self {
        Self::UnsupportedTarget {
            generator: generator.into(),
            target: target.name().to_string(),
        }
    }

    /// Create a value-type mismatch error.
    pub fn value_type(target: &TargetType, requested: &'static str) -> Self {
        Self::ValueType {
            target: target.name().to_string(),
            requested,
        }
    }

    /// Create a recursion-limit error.
    pub fn recursion_limit(target: &TargetType, limit: usize) -> Self {
        Self::RecursionLimit {
            target: target.name().to_string(),
            limit,
        }
    }

    /// Create an unsupported-pattern error.
    pub fn unsupported_pattern(pattern: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::UnsupportedPattern {
            pattern: pattern.into(),
            detail: detail.into(),
        }
    }
}

impl fmt::Display for GeneratorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeneratorError::NoGenerator { target } => {
                write!(f, "no generator supports values of type {}", target)
            }
            GeneratorError::AmbiguousGenerators { target, candidates } => {
                write!(
                    f,
                    "ambiguous generators for {}: {} candidates tie on priority ({})",
                    target,
                    candidates.len(),
                    candidates.join(", ")
                )
            }
            GeneratorError::RegistrySealed { name } => {
                write!(
                    f,
                    "cannot register {}: the registry is sealed after its first resolution",
                    name
                )
            }
            GeneratorError::UnsupportedTarget { generator, target } => {
                write!(f, "{} does not support values of type {}", generator, target)
            }
            GeneratorError::ValueType { target, requested } => {
                write!(
                    f,
                    "generated value for {} cannot be taken as {}",
                    target, requested
                )
            }
            GeneratorError::RecursionLimit { target, limit } => {
                write!(
                    f,
                    "generation of {} exceeded the nesting limit of {}",
                    target, limit
                )
            }
            GeneratorError::UnsupportedPattern { pattern, detail } => {
                write!(f, "cannot synthesize values for pattern /{}/: {}", pattern, detail)
            }
            GeneratorError::Extraction(err) => write!(f, "extraction failed: {}", err),
        }
    }
}

impl std::error::Error for GeneratorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GeneratorError::Extraction(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ExtractionError> for GeneratorError {
    fn from(err: ExtractionError) -> Self {
        GeneratorError::Extraction(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_generator_display() {
        let err = GeneratorError::no_generator(&TargetType::of::<i32>());
        assert_eq!(format!("{}", err), "no generator supports values of type i32");
    }

    #[test]
    fn test_ambiguous_display_lists_candidates() {
        let err = GeneratorError::ambiguous(
            &TargetType::of::<i32>(),
            vec!["first".to_string(), "second".to_string()],
        );
        let display = format!("{}", err);
        assert!(display.contains("2 candidates"));
        assert!(display.contains("first"));
        assert!(display.contains("second"));
    }

    #[test]
    fn test_extraction_error_is_the_source() {
        use std::error::Error;
        let err = GeneratorError::from(ExtractionError::invalid_bounds("code", "bad"));
        assert!(err.source().is_some());
    }
}
