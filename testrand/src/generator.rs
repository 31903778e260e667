//! The generator contract, registration records and candidate ranking.

use std::any::Any;
use std::cmp::Ordering;
use std::sync::Arc;

use crate::config::GenerationConfig;
use crate::constraints::ConstraintSet;
use crate::error::GeneratorError;
use crate::registry::GeneratorRegistry;
use crate::target::{Specificity, TargetType, TypeMatch};

/// A generated value, type-erased for heterogeneous registry storage.
pub type Value = Box<dyn Any + Send>;

/// Well-known registration priorities.
///
/// Higher priorities win resolution ties among equally specific candidates.
/// Built-ins register below `DEFAULT` so that caller-supplied generators
/// override them without any extra ceremony.
pub mod priority {
    /// The default priority.
    pub const DEFAULT: i32 = 0;
    /// The priority for built-in generators of concrete types.
    pub const NATIVE_GENERATORS: i32 = -1000;
    /// The priority for built-in generators of generic container types.
    pub const GENERIC_GENERATORS: i32 = -2000;
    /// The minimum priority.
    pub const MIN: i32 = i32::MIN;
    /// The maximum priority.
    pub const MAX: i32 = i32::MAX;
}

/// One value-generation request, as seen by a generator.
///
/// Carries the requested target, the (possibly empty) constraint set, the
/// owning registry so container generators can produce their elements, the
/// generation configuration, and the current nesting depth.
pub struct GenerationRequest<'a> {
    target: &'a TargetType,
    constraints: &'a ConstraintSet,
    registry: &'a GeneratorRegistry,
    config: &'a GenerationConfig,
    depth: usize,
}

impl<'a> GenerationRequest<'a> {
    pub(crate) fn new(
        target: &'a TargetType,
        constraints: &'a ConstraintSet,
        registry: &'a GeneratorRegistry,
        config: &'a GenerationConfig,
        depth: usize,
    ) -> Self {
        Self {
            target,
            constraints,
            registry,
            config,
            depth,
        }
    }

    /// The requested target type.
    pub fn target(&self) -> &TargetType {
        self.target
    }

    /// The constraints that apply to this request.
    pub fn constraints(&self) -> &ConstraintSet {
        self.constraints
    }

    /// The registry the request was resolved against.
    pub fn registry(&self) -> &GeneratorRegistry {
        self.registry
    }

    /// The generation configuration.
    pub fn config(&self) -> &GenerationConfig {
        self.config
    }

    /// The current nesting depth.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Generate a value for a nested target, e.g. a container element.
    ///
    /// Delegates back to the registry, one level deeper; fails once the
    /// configured `max_depth` is exhausted so cyclic parameterizations
    /// cannot recurse forever.
    pub fn generate_nested(
        &self,
        target: &TargetType,
        rng: &mut dyn rand::RngCore,
    ) -> Result<Value, GeneratorError> {
        if self.depth + 1 >= self.config.max_depth {
            return Err(GeneratorError::recursion_limit(target, self.config.max_depth));
        }
        self.registry.generate_at_depth(
            target,
            &ConstraintSet::new(),
            self.config,
            rng,
            self.depth + 1,
        )
    }
}

/// Produces random values for the targets it supports.
///
/// One contract covers both plain and parameterizable generators: the
/// request always carries a constraint set, and a generator that cannot act
/// on constraints simply ignores it. Whether a registration is offered
/// constrained requests preferentially is declared at registration time.
pub trait Generator: Send + Sync {
    /// Whether this generator can produce values of the given target.
    ///
    /// Checked in addition to the registration's declared types; a raw-form
    /// registration uses this to reject parameterizations it cannot build.
    fn supports(&self, target: &TargetType) -> bool;

    /// Generate a random value for the requested target.
    fn generate(
        &self,
        request: &GenerationRequest<'_>,
        rng: &mut dyn rand::RngCore,
    ) -> Result<Value, GeneratorError>;

    /// The non-random baseline value for the target.
    fn default_value(&self, target: &TargetType) -> Result<Value, GeneratorError>;
}

/// An immutable record of one registered generator.
impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("declared", &self.declared)
            .field("priority", &self.priority)
            .field("parameterizable", &self.parameterizable)
            .finish_non_exhaustive()
    }
}

pub struct Registration {
    name: String,
    generator: Arc<dyn Generator>,
    declared: Vec<TypeMatch>,
    priority: i32,
    parameterizable: bool,
}

impl Registration {
    pub(crate) fn new(
        name: String,
        generator: Arc<dyn Generator>,
        declared: Vec<TypeMatch>,
        priority: i32,
        parameterizable: bool,
    ) -> Self {
        Self {
            name,
            generator,
            declared,
            priority,
            parameterizable,
        }
    }

    /// The registration's diagnostic name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The registered generator.
    pub fn generator(&self) -> &Arc<dyn Generator> {
        &self.generator
    }

    /// The declared supported types.
    pub fn declared(&self) -> &[TypeMatch] {
        &self.declared
    }

    /// The registration priority.
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Whether this generator acts on constraints.
    pub fn parameterizable(&self) -> bool {
        self.parameterizable
    }

    /// The best specificity among the declared types for a target, if any
    /// declaration matches at all.
    pub fn specificity_for(&self, target: &TargetType) -> Option<Specificity> {
        self.declared
            .iter()
            .filter_map(|declared| declared.matches(target))
            .max()
    }
}

/// Everything resolution needs to rank one compatible candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateRank {
    /// How precisely the candidate's declaration matches the target.
    pub specificity: Specificity,
    /// Whether the candidate acts on constraints.
    pub parameterizable: bool,
    /// The candidate's registration priority.
    pub priority: i32,
}

/// The resolution ordering over compatible candidates.
///
/// Ranks by declared-type specificity, then — only when the request carries
/// a non-empty constraint set — by the parameterizable flag, then by
/// priority. A pure function so the tie-breaking policy is testable without
/// a registry. `Ordering::Equal` between the two best candidates means the
/// resolution must fail as ambiguous rather than pick one arbitrarily.
pub fn compare_candidates(
    left: &CandidateRank,
    right: &CandidateRank,
    constrained: bool,
) -> Ordering {
    let left_param = constrained && left.parameterizable;
    let right_param = constrained && right.parameterizable;
    left.specificity
        .cmp(&right.specificity)
        .then(left_param.cmp(&right_param))
        .then(left.priority.cmp(&right.priority))
}

/// A generator that always produces the same value.
///
/// Mostly useful for tests and for pinning a type to a known fixture.
#[derive(Debug, Clone)]
pub struct ConstantGenerator<T> {
    value: T,
    target: TargetType,
}

impl<T: Clone + Send + Sync + 'static> ConstantGenerator<T> {
    /// Create a new constant generator
    pub fn new(value: T) -> Self {
        Self {
            value,
            target: TargetType::of::<T>(),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> Generator for ConstantGenerator<T> {
    fn supports(&self, target: &TargetType) -> bool {
        target.id() == self.target.id()
    }

    fn generate(
        &self,
        request: &GenerationRequest<'_>,
        _rng: &mut dyn rand::RngCore,
    ) -> Result<Value, GeneratorError> {
        if !self.supports(request.target()) {
            return Err(GeneratorError::unsupported_target(
                "constant generator",
                request.target(),
            ));
        }
        Ok(Box::new(self.value.clone()))
    }

    fn default_value(&self, target: &TargetType) -> Result<Value, GeneratorError> {
        if !self.supports(target) {
            return Err(GeneratorError::unsupported_target("constant generator", target));
        }
        Ok(Box::new(self.value.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rank(specificity: Specificity, parameterizable: bool, priority: i32) -> CandidateRank {
        CandidateRank {
            specificity,
            parameterizable,
            priority,
        }
    }

    #[test]
    fn test_exact_specificity_beats_priority() {
        let exact = rank(Specificity::Exact, false, priority::GENERIC_GENERATORS);
        let raw = rank(Specificity::Raw, false, priority::MAX);
        assert_eq!(compare_candidates(&exact, &raw, false), Ordering::Greater);
    }

    #[test]
    fn test_parameterizable_preferred_only_when_constrained() {
        let plain = rank(Specificity::Exact, false, 10);
        let parameterizable = rank(Specificity::Exact, true, -10);

        // With constraints, the parameterizable candidate wins despite priority.
        assert_eq!(
            compare_candidates(&parameterizable, &plain, true),
            Ordering::Greater
        );
        // Without constraints, priority decides.
        assert_eq!(
            compare_candidates(&parameterizable, &plain, false),
            Ordering::Less
        );
    }

    #[test]
    fn test_priority_breaks_remaining_ties() {
        let low = rank(Specificity::Exact, false, priority::NATIVE_GENERATORS);
        let high = rank(Specificity::Exact, false, priority::DEFAULT);
        assert_eq!(compare_candidates(&high, &low, false), Ordering::Greater);
    }

    #[test]
    fn test_full_tie_is_equal() {
        let a = rank(Specificity::Exact, false, 5);
        let b = rank(Specificity::Exact, true, 5);
        // Unconstrained: the parameterizable flag is not a tie-breaker.
        assert_eq!(compare_candidates(&a, &b, false), Ordering::Equal);
    }

    #[test]
    fn test_priority_constants() {
        assert!(priority::DEFAULT > priority::NATIVE_GENERATORS);
        assert!(priority::NATIVE_GENERATORS > priority::GENERIC_GENERATORS);
        assert!(priority::MAX > priority::DEFAULT);
        assert!(priority::MIN < priority::GENERIC_GENERATORS);
    }
}
