//! Parameter extractors: one variant per metadata-source kind.

use std::fmt;

use crate::constraints::{Constraint, ConstraintConflict, ConstraintSet};
use crate::element::{DeclaredElement, RawConstraint, SourceKind};

/// Extraction failure taxonomy.
///
/// Malformed metadata (`MalformedPattern`, `InvalidBounds`, `EmptyComposed`,
/// `UnsupportedSource`) propagates immediately: a bad declaration cannot be
/// skipped without risking silently-wrong generated data. `Conflicts` is the
/// aggregate the coordinator builds out of every failed merge in one pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// A declared pattern does not compile.
    MalformedPattern {
        /// The property the pattern was declared on.
        property: String,
        /// The declared pattern source.
        pattern: String,
        /// The compiler's diagnostic.
        detail: String,
    },
    /// A declared bound range is inverted or zero-width.
    InvalidBounds {
        /// The property the bound was declared on.
        property: String,
        /// What is wrong with the declaration.
        detail: String,
    },
    /// A composed declaration with no parts.
    EmptyComposed {
        /// The property the declaration was found on.
        property: String,
        /// The composed declaration's name.
        name: String,
    },
    /// An extractor was handed an element kind it does not own.
    UnsupportedSource {
        /// The extractor's name.
        extractor: &'static str,
        /// The offending element kind.
        kind: SourceKind,
    },
    /// Elements of more than one logical property in a single-property call.
    MixedProperties {
        /// The distinct logical names encountered.
        names: Vec<String>,
    },
    /// Every constraint pair that failed to merge during one resolution.
    Conflicts {
        /// The failed pairs, labeled with their property.
        conflicts: Vec<LabeledConflict>,
    },
}

impl ExtractionError {
    /// Create a malformed-pattern error.
    pub fn malformed_pattern(
        property: impl Into<String>,
        pattern: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self::MalformedPattern {
            property: property.into(),
            pattern: pattern.into(),
            detail: detail.into(),
        }
    }

    /// Create an invalid-bounds error.
    pub fn invalid_bounds(property: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::InvalidBounds {
            property: property.into(),
            detail: detail.into(),
        }
    }
}

impl fmt::Display for ExtractionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionError::MalformedPattern { property, pattern, detail } => {
                write!(f, "malformed pattern /{}/ on {}: {}", pattern, property, detail)
            }
            ExtractionError::InvalidBounds { property, detail } => {
                write!(f, "invalid bounds on {}: {}", property, detail)
            }
            ExtractionError::EmptyComposed { property, name } => {
                write!(f, "composed declaration {} on {} has no parts", name, property)
            }
            ExtractionError::UnsupportedSource { extractor, kind } => {
                write!(f, "{} cannot extract from a {} element", extractor, kind)
            }
            ExtractionError::MixedProperties { names } => {
                write!(
                    f,
                    "elements describe more than one logical property: {}",
                    names.join(", ")
                )
            }
            ExtractionError::Conflicts { conflicts } => {
                write!(f, "{} constraint conflict(s):", conflicts.len())?;
                for conflict in conflicts {
                    write!(f, " [{}: {}]", conflict.property, conflict.conflict)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ExtractionError {}

/// A merge conflict labeled with the logical property it occurred on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledConflict {
    /// The logical property whose constraints conflict.
    pub property: String,
    /// The failed pair.
    pub conflict: ConstraintConflict,
}

/// Precedence between directly declared constraints and constraints that a
/// composed declaration expanded into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComposedPrecedence {
    /// A direct declaration of some kind suppresses composed-expansion
    /// declarations of the same kind on the same element.
    #[default]
    DirectOutranks,
    /// Expanded declarations merge with direct ones under the normal rules.
    MergeWithDirect,
}

/// Extracts a constraint set from one kind of metadata source.
///
/// Variants own exactly one [`SourceKind`] and must not depend on the order
/// they are invoked in relative to other variants.
pub trait ParameterExtractor: Send + Sync {
    /// The extractor's name, for diagnostics.
    fn name(&self) -> &'static str;

    /// Whether this extractor reads elements of the given kind.
    fn supports_source(&self, kind: SourceKind) -> bool;

    /// Extract the constraints declared on the element.
    fn extract(&self, element: &DeclaredElement) -> Result<ConstraintSet, ExtractionError>;
}

/// Convert an element's raw declarations into a checked constraint set.
///
/// Composed declarations are expanded into their primitive parts first, so
/// expanded constraints take part in conflict resolution exactly like
/// directly-declared ones. Same-kind declarations on one element merge here;
/// failed merges are reported as a `Conflicts` aggregate.
fn convert(
    element: &DeclaredElement,
    precedence: ComposedPrecedence,
) -> Result<ConstraintSet, ExtractionError> {
    let property = element.logical_name();
    let mut direct = Vec::new();
    let mut expanded = Vec::new();
    for declaration in element.declarations() {
        match declaration {
            RawConstraint::Composed { name, parts } => {
                if parts.is_empty() {
                    return Err(ExtractionError::EmptyComposed {
                        property: property.to_string(),
                        name: name.clone(),
                    });
                }
                expand_composed(property, parts, &mut expanded)?;
            }
            other => direct.push(check(property, other)?),
        }
    }

    let mut set = ConstraintSet::new();
    let mut conflicts = Vec::new();
    for constraint in &direct {
        add_or_record(&mut set, constraint.clone(), property, &mut conflicts);
    }
    for constraint in expanded {
        let suppressed = precedence == ComposedPrecedence::DirectOutranks
            && direct.iter().any(|d| d.kind() == constraint.kind());
        if !suppressed {
            add_or_record(&mut set, constraint, property, &mut conflicts);
        }
    }

    if conflicts.is_empty() {
        Ok(set)
    } else {
        Err(ExtractionError::Conflicts { conflicts })
    }
}

fn expand_composed(
    property: &str,
    parts: &[RawConstraint],
    out: &mut Vec<Constraint>,
) -> Result<(), ExtractionError> {
    for part in parts {
        match part {
            RawConstraint::Composed { name, parts } => {
                if parts.is_empty() {
                    return Err(ExtractionError::EmptyComposed {
                        property: property.to_string(),
                        name: name.clone(),
                    });
                }
                expand_composed(property, parts, out)?;
            }
            other => out.push(check(property, other)?),
        }
    }
    Ok(())
}

/// Validate one primitive raw declaration.
fn check(property: &str, declaration: &RawConstraint) -> Result<Constraint, ExtractionError> {
    match declaration {
        RawConstraint::Size { min, max } => {
            let min = min.unwrap_or(0);
            let max = max.unwrap_or(usize::MAX);
            if min > max {
                return Err(ExtractionError::invalid_bounds(
                    property,
                    format!("size minimum {} exceeds maximum {}", min, max),
                ));
            }
            Ok(Constraint::length(min, max))
        }
        RawConstraint::Digits { integer, fraction } => {
            if *integer == 0 && *fraction == 0 {
                return Err(ExtractionError::invalid_bounds(
                    property,
                    "digit limits cannot both be zero",
                ));
            }
            Ok(Constraint::digits(*integer, *fraction))
        }
        RawConstraint::Pattern { regexp } => match regex_lite::Regex::new(regexp) {
            Ok(_) => Ok(Constraint::pattern(regexp.clone())),
            Err(err) => Err(ExtractionError::malformed_pattern(
                property,
                regexp.clone(),
                err.to_string(),
            )),
        },
        RawConstraint::Custom { name, payload } => {
            Ok(Constraint::custom(name.clone(), payload.clone()))
        }
        RawConstraint::Composed { .. } => unreachable!("composed declarations expand before check"),
    }
}

fn add_or_record(
    set: &mut ConstraintSet,
    constraint: Constraint,
    property: &str,
    conflicts: &mut Vec<LabeledConflict>,
) {
    if let Err(conflict) = set.add(constraint) {
        conflicts.push(LabeledConflict {
            property: property.to_string(),
            conflict,
        });
    }
}

macro_rules! source_extractor {
    ($(#[$doc:meta])* $name:ident, $label:literal, $kind:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name {
            precedence: ComposedPrecedence,
        }

        impl $name {
            /// Create the extractor with the default composed precedence.
            pub fn new() -> Self {
                Self::default()
            }

            /// Override how composed expansions merge with direct
            /// declarations.
            pub fn with_precedence(precedence: ComposedPrecedence) -> Self {
                Self { precedence }
            }
        }

        impl ParameterExtractor for $name {
            fn name(&self) -> &'static str {
                $label
            }

            fn supports_source(&self, kind: SourceKind) -> bool {
                kind == $kind
            }

            fn extract(
                &self,
                element: &DeclaredElement,
            ) -> Result<ConstraintSet, ExtractionError> {
                if !self.supports_source(element.kind()) {
                    return Err(ExtractionError::UnsupportedSource {
                        extractor: $label,
                        kind: element.kind(),
                    });
                }
                convert(element, self.precedence)
            }
        }
    };
}

source_extractor!(
    /// Reads declarations from struct fields.
    FieldExtractor,
    "field extractor",
    SourceKind::Field
);
source_extractor!(
    /// Reads declarations from accessor methods.
    GetterExtractor,
    "getter extractor",
    SourceKind::Getter
);
source_extractor!(
    /// Reads declarations from constructor parameters.
    ConstructorParamExtractor,
    "constructor parameter extractor",
    SourceKind::ConstructorParam
);
source_extractor!(
    /// Reads declarations from static factory methods.
    FactoryMethodExtractor,
    "factory method extractor",
    SourceKind::FactoryMethod
);
source_extractor!(
    /// Reads type-level declarations.
    ClassExtractor,
    "class extractor",
    SourceKind::Class
);

/// The full built-in extractor set, one variant per source kind.
pub fn default_extractors() -> Vec<Box<dyn ParameterExtractor>> {
    vec![
        Box::new(FieldExtractor::new()),
        Box::new(GetterExtractor::new()),
        Box::new(ConstructorParamExtractor::new()),
        Box::new(FactoryMethodExtractor::new()),
        Box::new(ClassExtractor::new()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(declarations: Vec<RawConstraint>) -> DeclaredElement {
        let mut element = DeclaredElement::new("Account", "code", SourceKind::Field);
        for declaration in declarations {
            element = element.with_declaration(declaration);
        }
        element
    }

    #[test]
    fn test_size_declaration_becomes_length_constraint() {
        let element = field(vec![RawConstraint::Size { min: Some(2), max: Some(5) }]);
        let set = FieldExtractor::new().extract(&element).unwrap();
        assert_eq!(set.length_bounds(), Some((2, 5)));
    }

    #[test]
    fn test_open_bounds_default_to_full_range() {
        let element = field(vec![RawConstraint::Size { min: None, max: Some(5) }]);
        let set = FieldExtractor::new().extract(&element).unwrap();
        assert_eq!(set.length_bounds(), Some((0, 5)));
    }

    #[test]
    fn test_inverted_bounds_are_rejected() {
        let element = field(vec![RawConstraint::Size { min: Some(9), max: Some(5) }]);
        let err = FieldExtractor::new().extract(&element).unwrap_err();
        assert!(matches!(err, ExtractionError::InvalidBounds { .. }));
    }

    #[test]
    fn test_unparseable_pattern_is_rejected() {
        let element = field(vec![RawConstraint::Pattern { regexp: "[unclosed".into() }]);
        let err = FieldExtractor::new().extract(&element).unwrap_err();
        assert!(matches!(err, ExtractionError::MalformedPattern { .. }));
    }

    #[test]
    fn test_wrong_source_kind_is_rejected() {
        let element = DeclaredElement::new("Account", "code", SourceKind::Getter);
        let err = FieldExtractor::new().extract(&element).unwrap_err();
        assert!(matches!(err, ExtractionError::UnsupportedSource { .. }));
    }

    #[test]
    fn test_composed_declaration_expands_into_primitives() {
        let element = field(vec![RawConstraint::Composed {
            name: "short-code".into(),
            parts: vec![
                RawConstraint::Size { min: Some(1), max: Some(8) },
                RawConstraint::Pattern { regexp: "^[A-Z]+$".into() },
            ],
        }]);
        let set = FieldExtractor::new().extract(&element).unwrap();
        assert_eq!(set.length_bounds(), Some((1, 8)));
        assert_eq!(set.pattern(), Some("^[A-Z]+$"));
    }

    #[test]
    fn test_empty_composed_declaration_is_rejected() {
        let element = field(vec![RawConstraint::Composed { name: "empty".into(), parts: vec![] }]);
        let err = FieldExtractor::new().extract(&element).unwrap_err();
        assert!(matches!(err, ExtractionError::EmptyComposed { .. }));
    }

    #[test]
    fn test_direct_declaration_outranks_composed_expansion() {
        let element = field(vec![
            RawConstraint::Size { min: Some(3), max: Some(4) },
            RawConstraint::Composed {
                name: "short-code".into(),
                parts: vec![RawConstraint::Size { min: Some(10), max: Some(20) }],
            },
        ]);
        let set = FieldExtractor::new().extract(&element).unwrap();
        // The direct [3, 4] wins; the expanded [10, 20] would otherwise conflict.
        assert_eq!(set.length_bounds(), Some((3, 4)));
    }

    #[test]
    fn test_merge_with_direct_precedence_surfaces_the_conflict() {
        let element = field(vec![
            RawConstraint::Size { min: Some(3), max: Some(4) },
            RawConstraint::Composed {
                name: "short-code".into(),
                parts: vec![RawConstraint::Size { min: Some(10), max: Some(20) }],
            },
        ]);
        let extractor = FieldExtractor::with_precedence(ComposedPrecedence::MergeWithDirect);
        let err = extractor.extract(&element).unwrap_err();
        assert!(matches!(err, ExtractionError::Conflicts { .. }));
    }

    #[test]
    fn test_conflicting_declarations_on_one_element_accumulate() {
        let element = field(vec![
            RawConstraint::Size { min: Some(2), max: Some(5) },
            RawConstraint::Size { min: Some(6), max: Some(8) },
            RawConstraint::Pattern { regexp: "^a$".into() },
            RawConstraint::Pattern { regexp: "^b$".into() },
        ]);
        match FieldExtractor::new().extract(&element) {
            Err(ExtractionError::Conflicts { conflicts }) => assert_eq!(conflicts.len(), 2),
            other => panic!("expected an aggregate conflict error, got {:?}", other),
        }
    }
}
