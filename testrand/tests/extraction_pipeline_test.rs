//! Integration tests for the extraction pipeline, from raw declarations to
//! merged constraint sets.

use testrand::{
    DeclaredElement, ExtractionCoordinator, ExtractionError, RawConstraint, SourceKind,
};

fn account_code_field() -> DeclaredElement {
    DeclaredElement::new("Account", "code", SourceKind::Field).with_declaration(
        RawConstraint::Size {
            min: Some(1),
            max: Some(10),
        },
    )
}

fn account_code_getter() -> DeclaredElement {
    DeclaredElement::new("Account", "get_code", SourceKind::Getter).with_declaration(
        RawConstraint::Size {
            min: Some(1),
            max: Some(10),
        },
    )
}

#[test]
fn field_and_getter_with_identical_bounds_collapse_to_one_constraint() {
    let coordinator = ExtractionCoordinator::new();
    let set = coordinator
        .resolve(&[account_code_field(), account_code_getter()])
        .unwrap();
    assert_eq!(set.len(), 1);
    assert_eq!(set.length_bounds(), Some((1, 10)));
}

#[test]
fn every_source_kind_contributes_to_the_merge() {
    let coordinator = ExtractionCoordinator::new();
    let elements = [
        account_code_field(),
        DeclaredElement::new("Account", "code", SourceKind::ConstructorParam).with_declaration(
            RawConstraint::Size {
                min: Some(2),
                max: None,
            },
        ),
        DeclaredElement::new("Account", "code", SourceKind::FactoryMethod).with_declaration(
            RawConstraint::Pattern {
                regexp: "^[A-Z0-9]+$".into(),
            },
        ),
        DeclaredElement::new("Account", "code", SourceKind::Class).with_declaration(
            RawConstraint::Custom {
                name: "charset".into(),
                payload: "ascii".into(),
            },
        ),
    ];

    let set = coordinator.resolve(&elements).unwrap();
    assert_eq!(set.length_bounds(), Some((2, 10)));
    assert_eq!(set.pattern(), Some("^[A-Z0-9]+$"));
    assert_eq!(set.len(), 3);
}

#[test]
fn conflicting_sources_fail_with_every_pair_named() {
    let coordinator = ExtractionCoordinator::new();
    let elements = [
        account_code_field(),
        DeclaredElement::new("Account", "get_code", SourceKind::Getter).with_declaration(
            RawConstraint::Size {
                min: Some(20),
                max: Some(30),
            },
        ),
        DeclaredElement::new("Account", "code", SourceKind::Class)
            .with_declaration(RawConstraint::Pattern { regexp: "^a+$".into() })
            .with_declaration(RawConstraint::Pattern { regexp: "^b+$".into() }),
    ];

    match coordinator.resolve(&elements) {
        Err(ExtractionError::Conflicts { conflicts }) => {
            assert_eq!(conflicts.len(), 2);
            assert!(conflicts.iter().all(|c| c.property == "code"));
        }
        other => panic!("expected conflicts, got {:?}", other),
    }
}

#[test]
fn composed_declarations_participate_in_cross_source_conflicts() {
    let coordinator = ExtractionCoordinator::new();
    let elements = [
        DeclaredElement::new("Account", "code", SourceKind::Field).with_declaration(
            RawConstraint::Composed {
                name: "short-code".into(),
                parts: vec![RawConstraint::Size {
                    min: Some(1),
                    max: Some(4),
                }],
            },
        ),
        DeclaredElement::new("Account", "get_code", SourceKind::Getter).with_declaration(
            RawConstraint::Size {
                min: Some(6),
                max: Some(9),
            },
        ),
    ];

    // The expansion happened before the merge, so the conflict is between
    // the expanded [1, 4] and the directly declared [6, 9].
    match coordinator.resolve(&elements) {
        Err(ExtractionError::Conflicts { conflicts }) => assert_eq!(conflicts.len(), 1),
        other => panic!("expected conflicts, got {:?}", other),
    }
}

#[test]
fn whole_type_resolution_reports_each_property_separately() {
    let coordinator = ExtractionCoordinator::new();
    let elements = [
        account_code_field(),
        account_code_getter(),
        DeclaredElement::new("Account", "balance", SourceKind::Field).with_declaration(
            RawConstraint::Digits {
                integer: 12,
                fraction: 2,
            },
        ),
        DeclaredElement::new("Account", "get_balance", SourceKind::Getter).with_declaration(
            RawConstraint::Digits {
                integer: 9,
                fraction: 4,
            },
        ),
    ];

    let resolved = coordinator.resolve_all(&elements).unwrap();
    assert_eq!(resolved.len(), 2);
    assert_eq!(resolved["code"].length_bounds(), Some((1, 10)));
    // Digit limits take the pairwise minimum across sources.
    assert_eq!(resolved["balance"].digit_bounds(), Some((9, 2)));
}
