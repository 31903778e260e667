//! # Testrand - Constraint-Aware Random Values for Tests
//!
//! Testrand generates random test data by resolving, for every requested
//! target type, the generator responsible for it — and by extracting
//! declarative constraints (length bounds, digit limits, patterns) from
//! type metadata so the generated values comply with them.
//!
//! ## Quick Start
//!
//! ```rust
//! use testrand::{ConstantGenerator, GenerationConfig, GeneratorRegistry, TypeMatch, priority};
//!
//! let mut registry = GeneratorRegistry::new();
//! registry
//!     .register(
//!         "answer",
//!         ConstantGenerator::new(42i32),
//!         vec![TypeMatch::exact::<i32>()],
//!         priority::DEFAULT,
//!     )
//!     .unwrap();
//!
//! let mut rng = testrand::create_rng();
//! let config = GenerationConfig::default();
//! let value: i32 = registry.random(&mut rng, &config).unwrap();
//! assert_eq!(value, 42);
//! ```
//!
//! Registries are sealed by their first resolution: register everything up
//! front, then share the registry freely across test threads. When several
//! registered generators could serve a request, resolution ranks them by
//! declared-type specificity, constraint capability and priority — and fails
//! with the full candidate list instead of picking arbitrarily when the best
//! candidates tie.

// Public modules
pub mod config;
pub mod constraints;
pub mod coordinator;
pub mod element;
pub mod error;
pub mod extractor;
pub mod generator;
pub mod registry;
pub mod rng;
pub mod target;

// Re-export the main public API
pub use config::{ConfigError, DEFAULT_NULL_PROBABILITY, GenerationConfig, NullPolicy};
pub use constraints::{
    ConflictReason, Constraint, ConstraintConflict, ConstraintKind, ConstraintSet,
    ConstraintSignature,
};
pub use coordinator::ExtractionCoordinator;
pub use element::{DeclaredElement, RawConstraint, SourceKind};
pub use error::GeneratorError;
pub use extractor::{
    ClassExtractor, ComposedPrecedence, ConstructorParamExtractor, ExtractionError,
    FactoryMethodExtractor, FieldExtractor, GetterExtractor, LabeledConflict, ParameterExtractor,
    default_extractors,
};
pub use generator::{
    CandidateRank, ConstantGenerator, GenerationRequest, Generator, Registration, Value,
    compare_candidates, priority,
};
pub use registry::GeneratorRegistry;
pub use rng::{DefaultRngProvider, RngProvider, create_rng, create_seeded_rng};
pub use target::{RawForm, Specificity, TargetType, TypeMatch};
