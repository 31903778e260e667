//! Target type identities and declared-support matching.

use std::any::TypeId;
use std::fmt;

/// Identifies the kind of value a generation request asks for.
///
/// A target is either a simple type (`i32`, `String`) or a parameterized one
/// (`Vec<String>`). Parameterized targets carry the identity of their
/// unparameterized raw form plus one [`TargetType`] per type argument, so a
/// generator registered for "every `Vec<_>`" can be matched against a request
/// for a concrete `Vec<String>`.
///
/// Two parameterizations of the same base type are distinct targets: they
/// wrap distinct concrete [`TypeId`]s and compare unequal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetType {
    id: TypeId,
    name: &'static str,
    raw: Option<RawForm>,
    params: Vec<TargetType>,
}

impl TargetType {
    /// Create a target for a simple (unparameterized) type.
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            raw: None,
            params: Vec::new(),
        }
    }

    /// Create a target for a parameterized type.
    ///
    /// `T` is the concrete type (`Vec<String>`), `M` is the marker type
    /// identifying the raw form shared by all parameterizations, and
    /// `params` are the targets for the type arguments.
    pub fn parameterized<T: 'static, M: 'static>(
        params: impl IntoIterator<Item = TargetType>,
    ) -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            raw: Some(RawForm::of::<M>()),
            params: params.into_iter().collect(),
        }
    }

    /// The concrete type identity of this target.
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// The concrete type name, for diagnostics.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The raw-form identity, if this target is parameterized.
    pub fn raw(&self) -> Option<RawForm> {
        self.raw
    }

    /// The type arguments of a parameterized target.
    pub fn params(&self) -> &[TargetType] {
        &self.params
    }

    /// Whether this target carries type arguments.
    pub fn is_parameterized(&self) -> bool {
        self.raw.is_some()
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Identity of an unparameterized base type, represented by a marker type.
///
/// Rust has no runtime notion of `Vec` without its type argument, so the raw
/// form of a parameterized target is named by an explicit marker type that
/// the generator for that base type defines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawForm {
    id: TypeId,
    name: &'static str,
}

impl RawForm {
    /// Create the raw-form identity for a marker type.
    pub fn of<M: 'static>() -> Self {
        Self {
            id: TypeId::of::<M>(),
            name: std::any::type_name::<M>(),
        }
    }

    /// The marker type name, for diagnostics.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// A generator's declared support for a target type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeMatch {
    /// Matches exactly one concrete type (including its parameterization).
    Exact(TargetType),
    /// Matches every parameterization of a base type.
    Raw(RawForm),
}

impl TypeMatch {
    /// Declare exact support for a concrete type.
    pub fn exact<T: 'static>() -> Self {
        TypeMatch::Exact(TargetType::of::<T>())
    }

    /// Declare exact support for an already-built target.
    pub fn exact_target(target: TargetType) -> Self {
        TypeMatch::Exact(target)
    }

    /// Declare raw-form support via a marker type.
    pub fn raw<M: 'static>() -> Self {
        TypeMatch::Raw(RawForm::of::<M>())
    }

    /// Test this declaration against a requested target.
    ///
    /// Returns the match specificity on success. Exact matches compare the
    /// concrete type identity, so they distinguish parameterizations; raw
    /// matches compare the raw-form marker only.
    pub fn matches(&self, target: &TargetType) -> Option<Specificity> {
        match self {
            TypeMatch::Exact(declared) if declared.id == target.id => Some(Specificity::Exact),
            TypeMatch::Raw(raw) if target.raw == Some(*raw) => Some(Specificity::Raw),
            _ => None,
        }
    }
}

impl fmt::Display for TypeMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeMatch::Exact(target) => write!(f, "exact {}", target),
            TypeMatch::Raw(raw) => write!(f, "raw {}", raw.name),
        }
    }
}

/// How precisely a declaration matches a requested target.
///
/// Exact matches outrank raw-form matches during resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Specificity {
    /// The declaration covers every parameterization of a base type.
    Raw,
    /// The declaration names the requested concrete type.
    Exact,
}

#[cfg(test)]
mod tests {
    use super::*;

    struct VecMarker;

    fn vec_of<T: 'static>() -> TargetType {
        TargetType::parameterized::<Vec<T>, VecMarker>([TargetType::of::<T>()])
    }

    #[test]
    fn test_simple_targets_compare_by_type() {
        assert_eq!(TargetType::of::<i32>(), TargetType::of::<i32>());
        assert_ne!(TargetType::of::<i32>(), TargetType::of::<i64>());
    }

    #[test]
    fn test_parameterizations_are_distinct_targets() {
        let strings = vec_of::<String>();
        let ints = vec_of::<i32>();
        assert_ne!(strings, ints);
        assert_eq!(strings.raw(), ints.raw());
        assert_eq!(strings.params().len(), 1);
        assert_eq!(strings.params()[0], TargetType::of::<String>());
    }

    #[test]
    fn test_exact_match_distinguishes_parameterizations() {
        let declared = TypeMatch::exact::<Vec<String>>();
        assert_eq!(declared.matches(&vec_of::<String>()), Some(Specificity::Exact));
        assert_eq!(declared.matches(&vec_of::<i32>()), None);
    }

    #[test]
    fn test_raw_match_covers_every_parameterization() {
        let declared = TypeMatch::raw::<VecMarker>();
        assert_eq!(declared.matches(&vec_of::<String>()), Some(Specificity::Raw));
        assert_eq!(declared.matches(&vec_of::<i32>()), Some(Specificity::Raw));
        assert_eq!(declared.matches(&TargetType::of::<String>()), None);
    }

    #[test]
    fn test_exact_outranks_raw() {
        assert!(Specificity::Exact > Specificity::Raw);
    }
}
