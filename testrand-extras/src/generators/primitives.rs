//! Generators for primitive types.

use std::any::TypeId;

use rand::Rng;
use testrand::{GenerationRequest, Generator, GeneratorError, TargetType, Value};

/// Generator for boolean values
#[derive(Debug, Clone, Copy, Default)]
pub struct BoolGenerator;

impl BoolGenerator {
    /// Create a new boolean generator
    pub fn new() -> Self {
        Self
    }
}

impl Generator for BoolGenerator {
    fn supports(&self, target: &TargetType) -> bool {
        target.id() == TypeId::of::<bool>()
    }

    fn generate(
        &self,
        _request: &GenerationRequest<'_>,
        rng: &mut dyn rand::RngCore,
    ) -> Result<Value, GeneratorError> {
        Ok(Box::new(rng.r#gen::<bool>()))
    }

    fn default_value(&self, _target: &TargetType) -> Result<Value, GeneratorError> {
        Ok(Box::new(false))
    }
}

/// Generator for alphanumeric ASCII characters
#[derive(Debug, Clone, Copy, Default)]
pub struct CharGenerator;

impl CharGenerator {
    /// Create a new character generator
    pub fn new() -> Self {
        Self
    }
}

impl Generator for CharGenerator {
    fn supports(&self, target: &TargetType) -> bool {
        target.id() == TypeId::of::<char>()
    }

    fn generate(
        &self,
        _request: &GenerationRequest<'_>,
        rng: &mut dyn rand::RngCore,
    ) -> Result<Value, GeneratorError> {
        let alphabet = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
        let index = rng.r#gen_range(0..alphabet.len());
        Ok(Box::new(alphabet[index] as char))
    }

    fn default_value(&self, _target: &TargetType) -> Result<Value, GeneratorError> {
        Ok(Box::new('a'))
    }
}

/// Generator for an integer type over a configurable range
///
/// Defaults to the type's full range; narrow it when a test wants friendlier
/// magnitudes.
#[derive(Debug, Clone, Copy)]
pub struct IntGenerator<T> {
    min: T,
    max: T,
}

impl<T> IntGenerator<T>
where
    T: num_traits::PrimInt,
{
    /// Create a generator spanning the type's full range
    pub fn new() -> Self {
        Self {
            min: T::min_value(),
            max: T::max_value(),
        }
    }

    /// Create a generator over an explicit inclusive range
    pub fn with_range(min: T, max: T) -> Self {
        Self { min, max }
    }
}

impl<T: num_traits::PrimInt> Default for IntGenerator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Generator for IntGenerator<T>
where
    T: num_traits::PrimInt
        + rand::distributions::uniform::SampleUniform
        + Send
        + Sync
        + 'static,
{
    fn supports(&self, target: &TargetType) -> bool {
        target.id() == TypeId::of::<T>()
    }

    fn generate(
        &self,
        _request: &GenerationRequest<'_>,
        rng: &mut dyn rand::RngCore,
    ) -> Result<Value, GeneratorError> {
        Ok(Box::new(rng.r#gen_range(self.min..=self.max)))
    }

    fn default_value(&self, _target: &TargetType) -> Result<Value, GeneratorError> {
        Ok(Box::new(T::zero()))
    }
}

/// Generator for `f32` values over a bounded magnitude
#[derive(Debug, Clone, Copy)]
pub struct FloatGenerator {
    magnitude: f32,
}

impl FloatGenerator {
    /// Create a generator over `[-magnitude, magnitude]`
    pub fn new(magnitude: f32) -> Self {
        Self { magnitude }
    }
}

impl Default for FloatGenerator {
    fn default() -> Self {
        Self::new(1.0e6)
    }
}

impl Generator for FloatGenerator {
    fn supports(&self, target: &TargetType) -> bool {
        target.id() == TypeId::of::<f32>()
    }

    fn generate(
        &self,
        _request: &GenerationRequest<'_>,
        rng: &mut dyn rand::RngCore,
    ) -> Result<Value, GeneratorError> {
        Ok(Box::new(rng.r#gen_range(-self.magnitude..=self.magnitude)))
    }

    fn default_value(&self, _target: &TargetType) -> Result<Value, GeneratorError> {
        Ok(Box::new(0.0f32))
    }
}
