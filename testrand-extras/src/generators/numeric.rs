//! Digit-bounded decimal generation.

use std::any::TypeId;

use rand::Rng;
use testrand::{GenerationRequest, Generator, GeneratorError, TargetType, Value};

/// Widest digit counts an `f64` can carry exactly through decimal rounding.
const MAX_INTEGER_DIGITS: u32 = 9;
const MAX_FRACTION_DIGITS: u32 = 6;

/// Generator for `f64` values with bounded decimal digit counts.
///
/// Honors a digit-bound constraint when one is present: the produced value
/// has at most `integer` digits before the decimal point and at most
/// `fraction` digits after it. Declared limits wider than an `f64` can
/// represent exactly are clamped to 9 integer and 6 fraction digits.
#[derive(Debug, Clone, Copy)]
pub struct DecimalGenerator {
    integer_digits: u32,
    fraction_digits: u32,
}

impl DecimalGenerator {
    /// Create a generator with the default digit limits (9 integer digits,
    /// 4 fraction digits), applied when no constraint narrows them.
    pub fn new() -> Self {
        Self {
            integer_digits: 9,
            fraction_digits: 4,
        }
    }

    /// Create a generator with explicit default digit limits.
    pub fn with_digits(integer_digits: u32, fraction_digits: u32) -> Self {
        Self {
            integer_digits: integer_digits.min(MAX_INTEGER_DIGITS),
            fraction_digits: fraction_digits.min(MAX_FRACTION_DIGITS),
        }
    }
}

impl Default for DecimalGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator for DecimalGenerator {
    fn supports(&self, target: &TargetType) -> bool {
        target.id() == TypeId::of::<f64>()
    }

    fn generate(
        &self,
        request: &GenerationRequest<'_>,
        rng: &mut dyn rand::RngCore,
    ) -> Result<Value, GeneratorError> {
        let (integer, fraction) = match request.constraints().digit_bounds() {
            Some((integer, fraction)) => (
                integer.min(MAX_INTEGER_DIGITS),
                fraction.min(MAX_FRACTION_DIGITS),
            ),
            None => (self.integer_digits, self.fraction_digits),
        };

        let int_bound = 10u64.pow(integer);
        let int_part = rng.r#gen_range(0..int_bound);
        let frac_scale = 10u64.pow(fraction);
        let frac_part = rng.r#gen_range(0..frac_scale);

        let mut value = int_part as f64 + frac_part as f64 / frac_scale as f64;
        if rng.r#gen::<bool>() {
            value = -value;
        }
        Ok(Box::new(value))
    }

    fn default_value(&self, _target: &TargetType) -> Result<Value, GeneratorError> {
        Ok(Box::new(0.0f64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use testrand::{
        Constraint, ConstraintSet, GenerationConfig, GeneratorRegistry, TypeMatch,
        create_seeded_rng, priority,
    };

    fn decimal_registry() -> GeneratorRegistry {
        let mut registry = GeneratorRegistry::new();
        registry
            .register_parameterizable(
                "decimals",
                DecimalGenerator::new(),
                vec![TypeMatch::exact::<f64>()],
                priority::NATIVE_GENERATORS,
            )
            .unwrap();
        registry
    }

    fn digit_set(integer: u32, fraction: u32) -> ConstraintSet {
        let mut set = ConstraintSet::new();
        set.add(Constraint::digits(integer, fraction)).unwrap();
        set
    }

    #[test]
    fn test_integer_digits_bound_the_magnitude() {
        let registry = decimal_registry();
        let mut rng = create_seeded_rng(21);
        let config = GenerationConfig::default();
        let constraints = digit_set(3, 2);

        for _ in 0..200 {
            let value: f64 = registry
                .random_with(&mut rng, &constraints, &config)
                .unwrap();
            assert!(value.abs() < 1000.0, "too many integer digits: {}", value);
        }
    }

    #[test]
    fn test_fraction_digits_round_cleanly() {
        let registry = decimal_registry();
        let mut rng = create_seeded_rng(22);
        let config = GenerationConfig::default();
        let constraints = digit_set(3, 2);

        for _ in 0..200 {
            let value: f64 = registry
                .random_with(&mut rng, &constraints, &config)
                .unwrap();
            let scaled = value * 100.0;
            assert!(
                (scaled - scaled.round()).abs() < 1e-6,
                "too many fraction digits: {}",
                value
            );
        }
    }

    #[test]
    fn test_unconstrained_requests_use_the_defaults() {
        let registry = decimal_registry();
        let mut rng = create_seeded_rng(23);
        let config = GenerationConfig::default();
        for _ in 0..100 {
            let value: f64 = registry.random(&mut rng, &config).unwrap();
            assert!(value.abs() < 1.0e9);
        }
    }

    #[test]
    fn test_oversized_limits_are_clamped() {
        let registry = decimal_registry();
        let mut rng = create_seeded_rng(24);
        let config = GenerationConfig::default();
        let constraints = digit_set(30, 30);
        for _ in 0..50 {
            let value: f64 = registry
                .random_with(&mut rng, &constraints, &config)
                .unwrap();
            assert!(value.abs() < 1.0e9);
        }
    }

    #[test]
    fn test_default_value_is_zero() {
        let registry = decimal_registry();
        let baseline: f64 = registry.default_value().unwrap();
        assert_eq!(baseline, 0.0);
    }
}
