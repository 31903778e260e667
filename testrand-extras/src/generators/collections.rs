//! Container generators that delegate element generation back through the
//! registry.

use std::any::{Any, TypeId};
use std::marker::PhantomData;

use rand::Rng;
use testrand::{
    GenerationRequest, Generator, GeneratorError, NullPolicy, TargetType, Value,
};

/// Raw-form marker for `Vec<_>` targets.
pub struct VecMarker;

/// Raw-form marker for `Option<_>` targets.
pub struct OptionMarker;

/// Build the parameterized target for `Vec<T>`.
pub fn vec_target<T: Any + Send>() -> TargetType {
    TargetType::parameterized::<Vec<T>, VecMarker>([TargetType::of::<T>()])
}

/// Build the parameterized target for `Option<T>`.
pub fn option_target<T: Any + Send>() -> TargetType {
    TargetType::parameterized::<Option<T>, OptionMarker>([TargetType::of::<T>()])
}

/// Generator for `Vec<T>` values.
///
/// Declared against the `Vec<_>` raw form; `supports` narrows it to the one
/// element type it can actually build, so several instances can share the
/// raw declaration and resolution picks by requested parameterization.
/// Element values come from the registry, one nesting level deeper. The
/// vector length honors a length-bound constraint, defaulting to
/// `[0, size_hint]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct VecGenerator<T> {
    _element: PhantomData<fn() -> T>,
}

impl<T: Any + Send> VecGenerator<T> {
    /// Create a new vector generator
    pub fn new() -> Self {
        Self { _element: PhantomData }
    }
}

impl<T: Any + Send> Generator for VecGenerator<T> {
    fn supports(&self, target: &TargetType) -> bool {
        target.id() == TypeId::of::<Vec<T>>()
            && target.params().len() == 1
            && target.params()[0].id() == TypeId::of::<T>()
    }

    fn generate(
        &self,
        request: &GenerationRequest<'_>,
        rng: &mut dyn rand::RngCore,
    ) -> Result<Value, GeneratorError> {
        let target = request.target();
        if !self.supports(target) {
            return Err(GeneratorError::unsupported_target("vec generator", target));
        }
        let element_target = &target.params()[0];

        let (min, max) = request
            .constraints()
            .length_bounds()
            .unwrap_or((0, request.config().size_hint));
        let max = if max == usize::MAX {
            min.max(request.config().size_hint)
        } else {
            max
        };
        let len = rng.r#gen_range(min..=max);

        let mut values = Vec::with_capacity(len);
        for _ in 0..len {
            let element = request.generate_nested(element_target, rng)?;
            let element = element
                .downcast::<T>()
                .map_err(|_| GeneratorError::value_type(element_target, std::any::type_name::<T>()))?;
            values.push(*element);
        }
        Ok(Box::new(values))
    }

    fn default_value(&self, _target: &TargetType) -> Result<Value, GeneratorError> {
        Ok(Box::new(Vec::<T>::new()))
    }
}

/// Generator for `Option<T>` values.
///
/// The some/none split is drawn from a [`NullPolicy`] supplied at
/// construction, keeping the probability a parameter of the calling context
/// rather than something baked into the engine. Inner values come from the
/// registry, one nesting level deeper.
#[derive(Debug, Clone, Copy)]
pub struct OptionGenerator<T> {
    policy: NullPolicy,
    _element: PhantomData<fn() -> T>,
}

impl<T: Any + Send> OptionGenerator<T> {
    /// Create an option generator with the given none-probability policy
    pub fn new(policy: NullPolicy) -> Self {
        Self {
            policy,
            _element: PhantomData,
        }
    }
}

impl<T: Any + Send> Default for OptionGenerator<T> {
    fn default() -> Self {
        Self::new(NullPolicy::default())
    }
}

impl<T: Any + Send> Generator for OptionGenerator<T> {
    fn supports(&self, target: &TargetType) -> bool {
        target.id() == TypeId::of::<Option<T>>()
            && target.params().len() == 1
            && target.params()[0].id() == TypeId::of::<T>()
    }

    fn generate(
        &self,
        request: &GenerationRequest<'_>,
        rng: &mut dyn rand::RngCore,
    ) -> Result<Value, GeneratorError> {
        let target = request.target();
        if !self.supports(target) {
            return Err(GeneratorError::unsupported_target("option generator", target));
        }
        if self.policy.should_be_null(rng) {
            return Ok(Box::new(None::<T>));
        }
        let inner = request.generate_nested(&target.params()[0], rng)?;
        let inner = inner.downcast::<T>().map_err(|_| {
            GeneratorError::value_type(&target.params()[0], std::any::type_name::<T>())
        })?;
        Ok(Box::new(Some(*inner)))
    }

    fn default_value(&self, _target: &TargetType) -> Result<Value, GeneratorError> {
        Ok(Box::new(None::<T>))
    }
}
