//! Generation constraints and their merge rules.

use std::fmt;

/// A single declarative restriction on producible values.
///
/// Constraints are immutable value objects; combining two constraints of the
/// same kind goes through [`Constraint::merge`], which either narrows them
/// into one constraint or reports a [`ConstraintConflict`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Constraint {
    /// Bounds the length of a value (string characters, collection elements).
    Length {
        /// Minimum length, inclusive.
        min: usize,
        /// Maximum length, inclusive.
        max: usize,
    },
    /// Bounds the digit counts of a numeric value.
    Digits {
        /// Maximum number of integer digits.
        integer: u32,
        /// Maximum number of fraction digits.
        fraction: u32,
    },
    /// Requires string values to match a regular expression.
    Pattern {
        /// The pattern source, as declared.
        regex: String,
    },
    /// An opaque constraint the engine carries but does not interpret.
    Custom {
        /// The constraint name, used as the merge key.
        name: String,
        /// The opaque payload.
        payload: String,
    },
}

impl Constraint {
    /// A length bound over the inclusive range `[min, max]`.
    pub fn length(min: usize, max: usize) -> Self {
        Constraint::Length { min, max }
    }

    /// A digit bound with the given integer and fraction digit limits.
    pub fn digits(integer: u32, fraction: u32) -> Self {
        Constraint::Digits { integer, fraction }
    }

    /// A pattern constraint with the given regular expression source.
    pub fn pattern(regex: impl Into<String>) -> Self {
        Constraint::Pattern { regex: regex.into() }
    }

    /// An opaque custom constraint.
    pub fn custom(name: impl Into<String>, payload: impl Into<String>) -> Self {
        Constraint::Custom {
            name: name.into(),
            payload: payload.into(),
        }
    }

    /// The kind of this constraint.
    pub fn kind(&self) -> ConstraintKind {
        match self {
            Constraint::Length { .. } => ConstraintKind::Length,
            Constraint::Digits { .. } => ConstraintKind::Digits,
            Constraint::Pattern { .. } => ConstraintKind::Pattern,
            Constraint::Custom { .. } => ConstraintKind::Custom,
        }
    }

    /// Merge two constraints of the same kind.
    ///
    /// - length bounds narrow to the intersection of their ranges; a
    ///   disjoint intersection is a conflict,
    /// - digit bounds take the pairwise minimum of both limits,
    /// - patterns must be textually identical (no attempt is made to
    ///   intersect regular languages),
    /// - custom constraints are opaque: the right-hand side wins and a
    ///   warning is logged.
    ///
    /// For the non-custom kinds the merge is commutative and associative,
    /// which makes extraction results independent of extractor order.
    pub fn merge(self, other: Constraint) -> Result<Constraint, ConstraintConflict> {
        match (self, other) {
            (
                Constraint::Length { min: a_min, max: a_max },
                Constraint::Length { min: b_min, max: b_max },
            ) => {
                let min = a_min.max(b_min);
                let max = a_max.min(b_max);
                if min > max {
                    Err(ConstraintConflict::new(
                        Constraint::Length { min: a_min, max: a_max },
                        Constraint::Length { min: b_min, max: b_max },
                        ConflictReason::DisjointBounds,
                    ))
                } else {
                    Ok(Constraint::Length { min, max })
                }
            }
            (
                Constraint::Digits { integer: a_int, fraction: a_frac },
                Constraint::Digits { integer: b_int, fraction: b_frac },
            ) => Ok(Constraint::Digits {
                integer: a_int.min(b_int),
                fraction: a_frac.min(b_frac),
            }),
            (Constraint::Pattern { regex: a }, Constraint::Pattern { regex: b }) => {
                if a == b {
                    Ok(Constraint::Pattern { regex: a })
                } else {
                    Err(ConstraintConflict::new(
                        Constraint::Pattern { regex: a },
                        Constraint::Pattern { regex: b },
                        ConflictReason::PatternMismatch,
                    ))
                }
            }
            (Constraint::Custom { name: a_name, payload: a_payload }, other @ Constraint::Custom { .. }) => {
                tracing::warn!(
                    name = %a_name,
                    discarded = %a_payload,
                    "overlapping custom constraints, keeping the later declaration"
                );
                Ok(other)
            }
            (left, right) => Err(ConstraintConflict::new(left, right, ConflictReason::KindMismatch)),
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Length { min, max } => write!(f, "length [{}, {}]", min, max),
            Constraint::Digits { integer, fraction } => {
                write!(f, "digits (integer: {}, fraction: {})", integer, fraction)
            }
            Constraint::Pattern { regex } => write!(f, "pattern /{}/", regex),
            Constraint::Custom { name, payload } => write!(f, "custom {} ({})", name, payload),
        }
    }
}

/// Discriminates the constraint kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConstraintKind {
    /// Length bound.
    Length,
    /// Digit bound.
    Digits,
    /// Pattern requirement.
    Pattern,
    /// Opaque custom constraint.
    Custom,
}

/// Two constraints of the same kind that cannot be combined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintConflict {
    left: Constraint,
    right: Constraint,
    reason: ConflictReason,
}

/// Why a merge failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictReason {
    /// Two bounds with an empty intersection.
    DisjointBounds,
    /// Two textually different patterns.
    PatternMismatch,
    /// Constraints of different kinds reached the merge.
    KindMismatch,
}

impl ConstraintConflict {
    fn new(left: Constraint, right: Constraint, reason: ConflictReason) -> Self {
        Self { left, right, reason }
    }

    /// The first of the conflicting constraints.
    pub fn left(&self) -> &Constraint {
        &self.left
    }

    /// The second of the conflicting constraints.
    pub fn right(&self) -> &Constraint {
        &self.right
    }

    /// Why the pair cannot merge.
    pub fn reason(&self) -> ConflictReason {
        self.reason
    }
}

impl fmt::Display for ConstraintConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let detail = match self.reason {
            ConflictReason::DisjointBounds => "the ranges do not intersect",
            ConflictReason::PatternMismatch => "the patterns differ",
            ConflictReason::KindMismatch => "the kinds differ",
        };
        write!(
            f,
            "cannot combine {} with {}: {}",
            self.left, self.right, detail
        )
    }
}

impl std::error::Error for ConstraintConflict {}

/// The constraints that apply to one generation target.
///
/// Insertion merges with any existing constraint of the same kind (custom
/// constraints are keyed by name), so a set never holds two mergeable
/// entries. Declaration order of distinct kinds is preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstraintSet {
    entries: Vec<Constraint>,
}

impl ConstraintSet {
    /// An empty constraint set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a constraint, merging with an existing one of the same kind.
    pub fn add(&mut self, constraint: Constraint) -> Result<(), ConstraintConflict> {
        let key = Self::entry_key(&constraint);
        if let Some(pos) = self.entries.iter().position(|e| Self::entry_key(e) == key) {
            let existing = self.entries[pos].clone();
            self.entries[pos] = existing.merge(constraint)?;
        } else {
            self.entries.push(constraint);
        }
        Ok(())
    }

    /// Fold every constraint of `other` into this set, recording failed
    /// merges instead of stopping at the first one.
    pub fn absorb(&mut self, other: ConstraintSet, conflicts: &mut Vec<ConstraintConflict>) {
        for constraint in other.entries {
            if let Err(conflict) = self.add(constraint) {
                conflicts.push(conflict);
            }
        }
    }

    /// The first constraint of the given kind, if any.
    pub fn get(&self, kind: ConstraintKind) -> Option<&Constraint> {
        self.entries.iter().find(|c| c.kind() == kind)
    }

    /// The effective length bounds, if a length constraint is present.
    pub fn length_bounds(&self) -> Option<(usize, usize)> {
        match self.get(ConstraintKind::Length) {
            Some(Constraint::Length { min, max }) => Some((*min, *max)),
            _ => None,
        }
    }

    /// The effective digit bounds, if a digit constraint is present.
    pub fn digit_bounds(&self) -> Option<(u32, u32)> {
        match self.get(ConstraintKind::Digits) {
            Some(Constraint::Digits { integer, fraction }) => Some((*integer, *fraction)),
            _ => None,
        }
    }

    /// The pattern source, if a pattern constraint is present.
    pub fn pattern(&self) -> Option<&str> {
        match self.get(ConstraintKind::Pattern) {
            Some(Constraint::Pattern { regex }) => Some(regex),
            _ => None,
        }
    }

    /// Iterate the constraints in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Constraint> {
        self.entries.iter()
    }

    /// Number of constraints in the set.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set holds no constraints.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// A structural signature of this set, suitable as a cache key.
    ///
    /// Two sets holding equal constraints produce equal signatures
    /// regardless of declaration order.
    pub fn signature(&self) -> ConstraintSignature {
        let mut entries = self.entries.clone();
        entries.sort_by(|a, b| {
            Self::entry_key(a)
                .cmp(&Self::entry_key(b))
        });
        ConstraintSignature { entries }
    }

    fn entry_key(constraint: &Constraint) -> (ConstraintKind, Option<&str>) {
        match constraint {
            Constraint::Custom { name, .. } => (ConstraintKind::Custom, Some(name)),
            other => (other.kind(), None),
        }
    }
}

impl fmt::Display for ConstraintSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.entries.is_empty() {
            return write!(f, "(unconstrained)");
        }
        for (i, constraint) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", constraint)?;
        }
        Ok(())
    }
}

/// Structural identity of a constraint set, used for resolution caching.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConstraintSignature {
    entries: Vec<Constraint>,
}
