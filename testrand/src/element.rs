//! Source-level metadata elements that constraints are extracted from.

use std::fmt;

/// The kind of source-level construct a declaration was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// A struct field.
    Field,
    /// An accessor method.
    Getter,
    /// A constructor parameter.
    ConstructorParam,
    /// A static factory method.
    FactoryMethod,
    /// A type-level declaration.
    Class,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SourceKind::Field => "field",
            SourceKind::Getter => "getter",
            SourceKind::ConstructorParam => "constructor parameter",
            SourceKind::FactoryMethod => "factory method",
            SourceKind::Class => "class",
        };
        write!(f, "{}", label)
    }
}

/// A raw constraint declaration, exactly as it appears in the metadata.
///
/// Raw declarations are not yet validated: bounds may be inverted and
/// patterns may not compile. Extractors turn them into checked
/// [`Constraint`](crate::Constraint)s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawConstraint {
    /// A size restriction with optional bounds.
    Size {
        /// Minimum size, if declared.
        min: Option<usize>,
        /// Maximum size, if declared.
        max: Option<usize>,
    },
    /// A digit-count restriction.
    Digits {
        /// Maximum integer digits.
        integer: u32,
        /// Maximum fraction digits.
        fraction: u32,
    },
    /// A regular-expression restriction.
    Pattern {
        /// The declared pattern source.
        regexp: String,
    },
    /// A named declaration that expands into several primitive ones.
    Composed {
        /// The composed declaration's name, for diagnostics.
        name: String,
        /// The declarations it expands into.
        parts: Vec<RawConstraint>,
    },
    /// A declaration the engine carries opaquely.
    Custom {
        /// The declaration name.
        name: String,
        /// The opaque payload.
        payload: String,
    },
}

/// A read-only reference to a metadata-bearing source construct.
///
/// An element names its owner type, the logical property it describes, the
/// kind of construct it is, and the raw declarations found on it. The engine
/// never mutates elements; a field and a getter describing the same property
/// are two elements that normalize to one logical name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredElement {
    owner: String,
    name: String,
    kind: SourceKind,
    declarations: Vec<RawConstraint>,
}

impl DeclaredElement {
    /// Create an element with no declarations.
    pub fn new(owner: impl Into<String>, name: impl Into<String>, kind: SourceKind) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            kind,
            declarations: Vec::new(),
        }
    }

    /// Append a raw declaration, builder style.
    pub fn with_declaration(mut self, declaration: RawConstraint) -> Self {
        self.declarations.push(declaration);
        self
    }

    /// The owner type name.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// The declared (source-level) name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The source construct kind.
    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    /// The raw declarations found on this element.
    pub fn declarations(&self) -> &[RawConstraint] {
        &self.declarations
    }

    /// The logical property name this element contributes to.
    ///
    /// Accessor naming conventions (`get_`, `is_`) are stripped so that a
    /// field `code` and a getter `get_code` merge into one property instead
    /// of being treated as two.
    pub fn logical_name(&self) -> &str {
        if self.kind == SourceKind::Getter {
            for prefix in ["get_", "is_"] {
                if let Some(stripped) = self.name.strip_prefix(prefix) {
                    if !stripped.is_empty() {
                        return stripped;
                    }
                }
            }
        }
        &self.name
    }
}

impl fmt::Display for DeclaredElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}::{}", self.kind, self.owner, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_getter_prefix_normalization() {
        let getter = DeclaredElement::new("Account", "get_code", SourceKind::Getter);
        assert_eq!(getter.logical_name(), "code");

        let flag = DeclaredElement::new("Account", "is_active", SourceKind::Getter);
        assert_eq!(flag.logical_name(), "active");
    }

    #[test]
    fn test_field_name_is_already_logical() {
        let field = DeclaredElement::new("Account", "get_code", SourceKind::Field);
        assert_eq!(field.logical_name(), "get_code");
    }

    #[test]
    fn test_bare_prefix_is_kept() {
        let getter = DeclaredElement::new("Account", "is_", SourceKind::Getter);
        assert_eq!(getter.logical_name(), "is_");
    }

    #[test]
    fn test_field_and_getter_share_a_logical_name() {
        let field = DeclaredElement::new("Account", "code", SourceKind::Field);
        let getter = DeclaredElement::new("Account", "get_code", SourceKind::Getter);
        assert_eq!(field.logical_name(), getter.logical_name());
    }
}
