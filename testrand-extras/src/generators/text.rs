//! String generation driven by length and pattern constraints.

use std::any::TypeId;

use rand::Rng;
use testrand::{GenerationRequest, Generator, GeneratorError, TargetType, Value};

use super::pattern::ParsedPattern;

/// Generator for `String` values.
///
/// A pattern constraint drives synthesis through [`ParsedPattern`]; the
/// pattern then fixes its own length distribution and any length bound is
/// not re-applied on top. Without a pattern, the generator produces
/// alphanumeric strings whose length honors the length bound, defaulting to
/// `[0, size_hint]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringGenerator;

impl StringGenerator {
    /// Create a new string generator
    pub fn new() -> Self {
        Self
    }

    fn random_alphanumeric(len: usize, rng: &mut dyn rand::RngCore) -> String {
        let alphabet = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
        (0..len)
            .map(|_| alphabet[rng.r#gen_range(0..alphabet.len())] as char)
            .collect()
    }
}

impl Generator for StringGenerator {
    fn supports(&self, target: &TargetType) -> bool {
        target.id() == TypeId::of::<String>()
    }

    fn generate(
        &self,
        request: &GenerationRequest<'_>,
        rng: &mut dyn rand::RngCore,
    ) -> Result<Value, GeneratorError> {
        if let Some(pattern) = request.constraints().pattern() {
            let parsed = ParsedPattern::parse(pattern)
                .map_err(|err| GeneratorError::unsupported_pattern(pattern, err.message()))?;
            return Ok(Box::new(parsed.sample(rng)));
        }

        let (min, max) = request
            .constraints()
            .length_bounds()
            .unwrap_or((0, request.config().size_hint));
        // An unconstrained upper bound falls back to the size hint.
        let max = if max == usize::MAX {
            min.max(request.config().size_hint)
        } else {
            max
        };
        let len = rng.r#gen_range(min..=max);
        Ok(Box::new(Self::random_alphanumeric(len, rng)))
    }

    fn default_value(&self, _target: &TargetType) -> Result<Value, GeneratorError> {
        Ok(Box::new(String::new()))
    }
}
