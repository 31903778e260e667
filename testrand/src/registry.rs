//! The generator registry: registration, sealed resolution and caching.

use std::any::Any;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};

use crate::config::{GenerationConfig, NullPolicy};
use crate::constraints::{ConstraintSet, ConstraintSignature};
use crate::error::GeneratorError;
use crate::generator::{
    CandidateRank, GenerationRequest, Generator, Registration, Value, compare_candidates,
};
use crate::target::{TargetType, TypeMatch};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    target: TargetType,
    signature: ConstraintSignature,
}

/// Holds every known generator and resolves which one handles a request.
///
/// The registry has two phases. While open, generators are registered;
/// the first resolution seals it, and from then on the generator set is
/// immutable: a late registration fails with
/// [`GeneratorError::RegistrySealed`]. A sealed registry is safe to share
/// across threads — resolution only reads the registration list, and the
/// resolution cache tolerates duplicate computation because resolution is
/// deterministic for fixed inputs.
///
/// Registries are plain values: build one per test suite instead of sharing
/// process-wide state, and drop it when the suite is done.
pub struct GeneratorRegistry {
    registrations: Vec<Arc<Registration>>,
    sealed: AtomicBool,
    cache: RwLock<HashMap<CacheKey, usize>>,
}

impl GeneratorRegistry {
    /// Create a new empty generator registry
    pub fn new() -> Self {
        Self {
            registrations: Vec::new(),
            sealed: AtomicBool::new(false),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Register a plain generator for the declared types.
    pub fn register<G: Generator + 'static>(
        &mut self,
        name: impl Into<String>,
        generator: G,
        declared: Vec<TypeMatch>,
        priority: i32,
    ) -> Result<(), GeneratorError> {
        self.register_record(name.into(), Arc::new(generator), declared, priority, false)
    }

    /// Register a generator that acts on constraints.
    ///
    /// Parameterizable registrations win resolution against plain ones
    /// whenever the request carries a non-empty constraint set.
    pub fn register_parameterizable<G: Generator + 'static>(
        &mut self,
        name: impl Into<String>,
        generator: G,
        declared: Vec<TypeMatch>,
        priority: i32,
    ) -> Result<(), GeneratorError> {
        self.register_record(name.into(), Arc::new(generator), declared, priority, true)
    }

    fn register_record(
        &mut self,
        name: String,
        generator: Arc<dyn Generator>,
        declared: Vec<TypeMatch>,
        priority: i32,
        parameterizable: bool,
    ) -> Result<(), GeneratorError> {
        if self.is_sealed() {
            return Err(GeneratorError::registry_sealed(name));
        }
        self.registrations.push(Arc::new(Registration::new(
            name,
            generator,
            declared,
            priority,
            parameterizable,
        )));
        Ok(())
    }

    /// Seal the registry, fixing its generator set.
    ///
    /// Sealing happens implicitly on the first resolution; calling it
    /// explicitly just makes the phase change visible at the call site.
    pub fn seal(&self) {
        self.sealed.store(true, AtomicOrdering::SeqCst);
    }

    /// Whether the registry has been sealed.
    pub fn is_sealed(&self) -> bool {
        self.sealed.load(AtomicOrdering::SeqCst)
    }

    /// The number of registered generators.
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    /// Whether the registry holds no generators.
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// The registration records, in registration order.
    pub fn registrations(&self) -> &[Arc<Registration>] {
        &self.registrations
    }

    /// Resolve the generator responsible for a (target, constraints) request.
    ///
    /// Filters to compatible registrations, ranks them by specificity,
    /// constraint capability and priority, and fails deterministically when
    /// the best candidates tie. Results are cached per (target, constraint
    /// signature); signature equality is structural, so equal constraint
    /// sets share a cache entry regardless of how they were built.
    pub fn resolve(
        &self,
        target: &TargetType,
        constraints: &ConstraintSet,
    ) -> Result<Arc<Registration>, GeneratorError> {
        self.seal();
        let key = CacheKey {
            target: target.clone(),
            signature: constraints.signature(),
        };
        if let Ok(cache) = self.cache.read() {
            if let Some(&index) = cache.get(&key) {
                return Ok(Arc::clone(&self.registrations[index]));
            }
        }

        let index = self.resolve_uncached(target, constraints)?;
        tracing::debug!(
            target_type = target.name(),
            generator = self.registrations[index].name(),
            "resolved generator"
        );
        if let Ok(mut cache) = self.cache.write() {
            // A concurrent miss may have raced us here; both computed the
            // same index, so the overwrite is harmless.
            cache.insert(key, index);
        }
        Ok(Arc::clone(&self.registrations[index]))
    }

    fn resolve_uncached(
        &self,
        target: &TargetType,
        constraints: &ConstraintSet,
    ) -> Result<usize, GeneratorError> {
        let constrained = !constraints.is_empty();
        let candidates: Vec<(usize, CandidateRank)> = self
            .registrations
            .iter()
            .enumerate()
            .filter_map(|(index, registration)| {
                let specificity = registration.specificity_for(target)?;
                if !registration.generator().supports(target) {
                    return None;
                }
                Some((
                    index,
                    CandidateRank {
                        specificity,
                        parameterizable: registration.parameterizable(),
                        priority: registration.priority(),
                    },
                ))
            })
            .collect();

        let Some((best_index, best_rank)) = candidates
            .iter()
            .copied()
            .max_by(|(_, a), (_, b)| compare_candidates(a, b, constrained))
        else {
            return Err(GeneratorError::no_generator(target));
        };

        let tied: Vec<&(usize, CandidateRank)> = candidates
            .iter()
            .filter(|(_, rank)| {
                compare_candidates(rank, &best_rank, constrained) == Ordering::Equal
            })
            .collect();
        if tied.len() > 1 {
            let mut names: Vec<String> = tied
                .iter()
                .map(|(index, _)| self.registrations[*index].name().to_string())
                .collect();
            names.sort();
            return Err(GeneratorError::ambiguous(target, names));
        }

        Ok(best_index)
    }

    /// Resolve and generate a type-erased value.
    pub fn generate(
        &self,
        target: &TargetType,
        constraints: &ConstraintSet,
        config: &GenerationConfig,
        rng: &mut dyn rand::RngCore,
    ) -> Result<Value, GeneratorError> {
        self.generate_at_depth(target, constraints, config, rng, 0)
    }

    pub(crate) fn generate_at_depth(
        &self,
        target: &TargetType,
        constraints: &ConstraintSet,
        config: &GenerationConfig,
        rng: &mut dyn rand::RngCore,
        depth: usize,
    ) -> Result<Value, GeneratorError> {
        let registration = self.resolve(target, constraints)?;
        let request = GenerationRequest::new(target, constraints, self, config, depth);
        registration.generator().generate(&request, rng)
    }

    /// Generate an unconstrained random value of a simple type.
    pub fn random<T: Any + Send>(
        &self,
        rng: &mut dyn rand::RngCore,
        config: &GenerationConfig,
    ) -> Result<T, GeneratorError> {
        self.random_with(rng, &ConstraintSet::new(), config)
    }

    /// Generate a constrained random value of a simple type.
    pub fn random_with<T: Any + Send>(
        &self,
        rng: &mut dyn rand::RngCore,
        constraints: &ConstraintSet,
        config: &GenerationConfig,
    ) -> Result<T, GeneratorError> {
        let target = TargetType::of::<T>();
        let value = self.generate(&target, constraints, config, rng)?;
        downcast(value, &target)
    }

    /// Generate a random value for an explicitly-built target.
    ///
    /// The target must identify the same concrete type as `T`; this is the
    /// entry point for parameterized targets, whose raw-form information a
    /// plain `TargetType::of` cannot carry.
    pub fn random_at<T: Any + Send>(
        &self,
        target: &TargetType,
        rng: &mut dyn rand::RngCore,
        constraints: &ConstraintSet,
        config: &GenerationConfig,
    ) -> Result<T, GeneratorError> {
        if target.id() != std::any::TypeId::of::<T>() {
            return Err(GeneratorError::value_type(target, std::any::type_name::<T>()));
        }
        let value = self.generate(target, constraints, config, rng)?;
        downcast(value, target)
    }

    /// Generate a value or, per the supplied policy, no value at all.
    ///
    /// The null decision is drawn here, in the caller-facing layer; the
    /// resolved generator is only consulted when a value is wanted, and it
    /// always produces one or fails.
    pub fn nullable_random<T: Any + Send>(
        &self,
        rng: &mut dyn rand::RngCore,
        policy: &NullPolicy,
        config: &GenerationConfig,
    ) -> Result<Option<T>, GeneratorError> {
        if policy.should_be_null(rng) {
            return Ok(None);
        }
        self.random(rng, config).map(Some)
    }

    /// The resolved generator's non-random baseline value for a type.
    pub fn default_value<T: Any + Send>(&self) -> Result<T, GeneratorError> {
        let target = TargetType::of::<T>();
        let registration = self.resolve(&target, &ConstraintSet::new())?;
        let value = registration.generator().default_value(&target)?;
        downcast(value, &target)
    }
}

impl Default for GeneratorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn downcast<T: Any>(value: Value, target: &TargetType) -> Result<T, GeneratorError> {
    value
        .downcast::<T>()
        .map(|boxed| *boxed)
        .map_err(|_| GeneratorError::value_type(target, std::any::type_name::<T>()))
}
