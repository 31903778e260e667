//! Integration tests for registry resolution behavior.

use std::sync::Arc;

use testrand::{
    ConstantGenerator, Constraint, ConstraintSet, GenerationConfig, GenerationRequest, Generator,
    GeneratorError, GeneratorRegistry, TargetType, TypeMatch, Value, create_seeded_rng, priority,
};

fn pattern_set(regex: &str) -> ConstraintSet {
    let mut set = ConstraintSet::new();
    set.add(Constraint::pattern(regex)).unwrap();
    set
}

#[test]
fn equal_priority_integer_generators_are_reported_together() {
    let mut registry = GeneratorRegistry::new();
    registry
        .register(
            "integers-a",
            ConstantGenerator::new(1i32),
            vec![TypeMatch::exact::<i32>()],
            priority::DEFAULT,
        )
        .unwrap();
    registry
        .register(
            "integers-b",
            ConstantGenerator::new(2i32),
            vec![TypeMatch::exact::<i32>()],
            priority::DEFAULT,
        )
        .unwrap();

    let target = TargetType::of::<i32>();
    match registry.resolve(&target, &ConstraintSet::new()) {
        Err(GeneratorError::AmbiguousGenerators { candidates, .. }) => {
            assert_eq!(candidates.len(), 2);
            assert!(candidates.contains(&"integers-a".to_string()));
            assert!(candidates.contains(&"integers-b".to_string()));
        }
        other => panic!(
            "expected ambiguity, got {:?}",
            other.map(|r| r.name().to_string())
        ),
    }
}

#[test]
fn constraints_flip_the_choice_to_the_parameterizable_generator() {
    let mut registry = GeneratorRegistry::new();
    registry
        .register(
            "plain-strings",
            ConstantGenerator::new(String::from("plain")),
            vec![TypeMatch::exact::<String>()],
            priority::DEFAULT,
        )
        .unwrap();
    registry
        .register_parameterizable(
            "pattern-strings",
            ConstantGenerator::new(String::from("ABC")),
            vec![TypeMatch::exact::<String>()],
            priority::GENERIC_GENERATORS,
        )
        .unwrap();

    let target = TargetType::of::<String>();

    let unconstrained = registry.resolve(&target, &ConstraintSet::new()).unwrap();
    assert_eq!(unconstrained.name(), "plain-strings");

    let constrained = registry
        .resolve(&target, &pattern_set("^[A-Z]+$"))
        .unwrap();
    assert_eq!(constrained.name(), "pattern-strings");
}

#[test]
fn resolution_is_deterministic_across_many_calls() {
    let mut registry = GeneratorRegistry::new();
    registry
        .register(
            "low",
            ConstantGenerator::new(1i64),
            vec![TypeMatch::exact::<i64>()],
            priority::NATIVE_GENERATORS,
        )
        .unwrap();
    registry
        .register(
            "high",
            ConstantGenerator::new(2i64),
            vec![TypeMatch::exact::<i64>()],
            priority::DEFAULT,
        )
        .unwrap();

    let target = TargetType::of::<i64>();
    for _ in 0..100 {
        let chosen = registry.resolve(&target, &ConstraintSet::new()).unwrap();
        assert_eq!(chosen.name(), "high");
    }
}

#[test]
fn concurrent_resolution_agrees_across_threads() {
    let mut registry = GeneratorRegistry::new();
    registry
        .register(
            "answer",
            ConstantGenerator::new(42i32),
            vec![TypeMatch::exact::<i32>()],
            priority::DEFAULT,
        )
        .unwrap();
    registry
        .register_parameterizable(
            "letters",
            ConstantGenerator::new(String::from("XYZ")),
            vec![TypeMatch::exact::<String>()],
            priority::DEFAULT,
        )
        .unwrap();
    registry.seal();
    let registry = Arc::new(registry);

    crossbeam::scope(|scope| {
        for worker in 0..8 {
            let registry = Arc::clone(&registry);
            scope.spawn(move |_| {
                let mut rng = create_seeded_rng(worker);
                let config = GenerationConfig::default();
                for _ in 0..200 {
                    let value: i32 = registry.random(&mut rng, &config).unwrap();
                    assert_eq!(value, 42);

                    let text: String = registry
                        .random_with(&mut rng, &pattern_set("^[A-Z]+$"), &config)
                        .unwrap();
                    assert_eq!(text, "XYZ");
                }
            });
        }
    })
    .unwrap();
}

/// Always delegates back to the registry for its own target, so generation
/// can only terminate via the depth guard.
struct SelfNestingGenerator;

impl Generator for SelfNestingGenerator {
    fn supports(&self, target: &TargetType) -> bool {
        target.id() == std::any::TypeId::of::<u8>()
    }

    fn generate(
        &self,
        request: &GenerationRequest<'_>,
        rng: &mut dyn rand::RngCore,
    ) -> Result<Value, GeneratorError> {
        request.generate_nested(request.target(), rng)
    }

    fn default_value(&self, _target: &TargetType) -> Result<Value, GeneratorError> {
        Ok(Box::new(0u8))
    }
}

#[test]
fn runaway_nested_generation_hits_the_depth_limit() {
    let mut registry = GeneratorRegistry::new();
    registry
        .register(
            "cyclic",
            SelfNestingGenerator,
            vec![TypeMatch::exact::<u8>()],
            priority::DEFAULT,
        )
        .unwrap();

    let mut rng = create_seeded_rng(17);
    let config = GenerationConfig::default();
    let err = registry.random::<u8>(&mut rng, &config).unwrap_err();
    assert!(matches!(err, GeneratorError::RecursionLimit { .. }));
}

#[test]
fn sealed_registry_rejects_registration_from_any_thread() {
    let mut registry = GeneratorRegistry::new();
    registry
        .register(
            "answer",
            ConstantGenerator::new(42i32),
            vec![TypeMatch::exact::<i32>()],
            priority::DEFAULT,
        )
        .unwrap();

    let target = TargetType::of::<i32>();
    registry.resolve(&target, &ConstraintSet::new()).unwrap();

    let err = registry
        .register(
            "late",
            ConstantGenerator::new(0i32),
            vec![TypeMatch::exact::<i32>()],
            priority::MAX,
        )
        .unwrap_err();
    assert!(matches!(err, GeneratorError::RegistrySealed { .. }));

    // The late registration left no trace.
    let chosen = registry.resolve(&target, &ConstraintSet::new()).unwrap();
    assert_eq!(chosen.name(), "answer");
}
