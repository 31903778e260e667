//! # Testrand Extras
//!
//! Built-in generators, a ready-made registry and sampling helpers for the
//! `testrand` engine.
//!
//! ## Quick Start
//!
//! ```rust
//! use testrand::GenerationConfig;
//! use testrand_extras::default_registry;
//!
//! let registry = default_registry().unwrap();
//! let mut rng = testrand::create_rng();
//! let config = GenerationConfig::default();
//!
//! let number: i32 = registry.random(&mut rng, &config).unwrap();
//! let text: String = registry.random(&mut rng, &config).unwrap();
//! assert!(number >= i32::MIN);
//! assert!(text.len() <= config.size_hint);
//! ```
//!
//! Built-ins register below the default priority, so a caller-supplied
//! generator for the same type wins resolution without further ceremony.

pub mod generators;
pub mod sampling;

pub use generators::collections::{
    OptionGenerator, OptionMarker, VecGenerator, VecMarker, option_target, vec_target,
};
pub use generators::numeric::DecimalGenerator;
pub use generators::pattern::{ParsedPattern, PatternError};
pub use generators::primitives::{BoolGenerator, CharGenerator, FloatGenerator, IntGenerator};
pub use generators::text::StringGenerator;
pub use sampling::{collect_samples, collect_samples_with, null_ratio};

use testrand::{GeneratorError, GeneratorRegistry, NullPolicy, TypeMatch, priority};

/// Convenience re-exports for test modules.
pub mod prelude {
    pub use crate::generators::collections::{
        OptionGenerator, VecGenerator, option_target, vec_target,
    };
    pub use crate::generators::numeric::DecimalGenerator;
    pub use crate::generators::primitives::{
        BoolGenerator, CharGenerator, FloatGenerator, IntGenerator,
    };
    pub use crate::generators::text::StringGenerator;
    pub use crate::sampling::{collect_samples, collect_samples_with, null_ratio};
    pub use crate::default_registry;
}

macro_rules! register_ints {
    ($registry:expr, $($name:literal => $t:ty),* $(,)?) => {
        $(
            $registry.register(
                $name,
                IntGenerator::<$t>::new(),
                vec![TypeMatch::exact::<$t>()],
                priority::NATIVE_GENERATORS,
            )?;
        )*
    };
}

/// Build a registry with every built-in generator registered.
///
/// Concrete-type generators land at `NATIVE_GENERATORS`, container
/// generators at `GENERIC_GENERATORS`. The returned registry is still open:
/// register project-specific generators on top, then let the first
/// resolution seal it.
pub fn default_registry() -> Result<GeneratorRegistry, GeneratorError> {
    let mut registry = GeneratorRegistry::new();

    registry.register(
        "booleans",
        BoolGenerator::new(),
        vec![TypeMatch::exact::<bool>()],
        priority::NATIVE_GENERATORS,
    )?;
    registry.register(
        "characters",
        CharGenerator::new(),
        vec![TypeMatch::exact::<char>()],
        priority::NATIVE_GENERATORS,
    )?;
    register_ints!(
        registry,
        "i8-integers" => i8,
        "i16-integers" => i16,
        "i32-integers" => i32,
        "i64-integers" => i64,
        "u8-integers" => u8,
        "u16-integers" => u16,
        "u32-integers" => u32,
        "u64-integers" => u64,
        "usize-integers" => usize,
        "isize-integers" => isize,
    );
    registry.register(
        "f32-floats",
        FloatGenerator::default(),
        vec![TypeMatch::exact::<f32>()],
        priority::NATIVE_GENERATORS,
    )?;
    registry.register_parameterizable(
        "decimals",
        DecimalGenerator::new(),
        vec![TypeMatch::exact::<f64>()],
        priority::NATIVE_GENERATORS,
    )?;
    registry.register_parameterizable(
        "strings",
        StringGenerator::new(),
        vec![TypeMatch::exact::<String>()],
        priority::NATIVE_GENERATORS,
    )?;

    register_containers(&mut registry)?;

    Ok(registry)
}

macro_rules! register_containers_for {
    ($registry:expr, $($label:literal => $t:ty),* $(,)?) => {
        $(
            $registry.register_parameterizable(
                concat!($label, "-vectors"),
                VecGenerator::<$t>::new(),
                vec![TypeMatch::raw::<VecMarker>()],
                priority::GENERIC_GENERATORS,
            )?;
            $registry.register(
                concat!($label, "-options"),
                OptionGenerator::<$t>::new(NullPolicy::default()),
                vec![TypeMatch::raw::<OptionMarker>()],
                priority::GENERIC_GENERATORS,
            )?;
        )*
    };
}

fn register_containers(registry: &mut GeneratorRegistry) -> Result<(), GeneratorError> {
    register_containers_for!(
        registry,
        "bool" => bool,
        "i32" => i32,
        "i64" => i64,
        "u32" => u32,
        "u64" => u64,
        "f64" => f64,
        "string" => String,
    );
    Ok(())
}
