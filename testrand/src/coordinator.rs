//! Coordinates extraction across every applicable extractor variant.

use std::collections::BTreeMap;

use crate::constraints::ConstraintSet;
use crate::element::DeclaredElement;
use crate::extractor::{default_extractors, ExtractionError, LabeledConflict, ParameterExtractor};

/// Discovers the extractors applicable to a declared element, invokes them,
/// and merges their outputs into one constraint set per logical property.
///
/// Elements describing the same logical property (a field and its getter)
/// are normalized by name and merged, never treated as two properties.
/// Failed merges accumulate so a caller sees every conflict in one pass;
/// any other extraction failure propagates immediately.
pub struct ExtractionCoordinator {
    extractors: Vec<Box<dyn ParameterExtractor>>,
}

impl ExtractionCoordinator {
    /// A coordinator over the full built-in extractor set.
    pub fn new() -> Self {
        Self {
            extractors: default_extractors(),
        }
    }

    /// A coordinator over a caller-supplied extractor set.
    pub fn with_extractors(extractors: Vec<Box<dyn ParameterExtractor>>) -> Self {
        Self { extractors }
    }

    /// The extractors this coordinator consults.
    pub fn extractors(&self) -> &[Box<dyn ParameterExtractor>] {
        &self.extractors
    }

    /// Resolve the constraint set for one logical property.
    ///
    /// All elements must normalize to the same logical name; mixing
    /// properties in one call is an error. The result is independent of
    /// element and extractor order: the per-kind merge rules are commutative
    /// and associative.
    pub fn resolve(&self, elements: &[DeclaredElement]) -> Result<ConstraintSet, ExtractionError> {
        let mut names: Vec<String> = elements
            .iter()
            .map(|e| e.logical_name().to_string())
            .collect();
        names.sort();
        names.dedup();
        if names.len() > 1 {
            return Err(ExtractionError::MixedProperties { names });
        }

        let mut conflicts = Vec::new();
        let merged = self.merge_property(elements, &mut conflicts)?;
        if conflicts.is_empty() {
            Ok(merged)
        } else {
            Err(ExtractionError::Conflicts { conflicts })
        }
    }

    /// Resolve constraint sets for every logical property among the
    /// elements of one type.
    ///
    /// Conflicts from all properties accumulate into a single aggregate
    /// failure, so one pass reports everything that is wrong with a type.
    pub fn resolve_all(
        &self,
        elements: &[DeclaredElement],
    ) -> Result<BTreeMap<String, ConstraintSet>, ExtractionError> {
        let mut groups: BTreeMap<String, Vec<&DeclaredElement>> = BTreeMap::new();
        for element in elements {
            groups
                .entry(element.logical_name().to_string())
                .or_default()
                .push(element);
        }

        let mut conflicts = Vec::new();
        let mut resolved = BTreeMap::new();
        for (name, group) in groups {
            let owned: Vec<DeclaredElement> = group.into_iter().cloned().collect();
            let merged = self.merge_property(&owned, &mut conflicts)?;
            resolved.insert(name, merged);
        }

        if conflicts.is_empty() {
            Ok(resolved)
        } else {
            Err(ExtractionError::Conflicts { conflicts })
        }
    }

    /// Invoke every matching extractor on every element and fold the
    /// results into one set, accumulating failed merges.
    fn merge_property(
        &self,
        elements: &[DeclaredElement],
        conflicts: &mut Vec<LabeledConflict>,
    ) -> Result<ConstraintSet, ExtractionError> {
        let mut merged = ConstraintSet::new();
        for element in elements {
            let property = element.logical_name().to_string();
            for extractor in &self.extractors {
                if !extractor.supports_source(element.kind()) {
                    continue;
                }
                match extractor.extract(element) {
                    Ok(set) => {
                        let mut raw = Vec::new();
                        merged.absorb(set, &mut raw);
                        conflicts.extend(raw.into_iter().map(|conflict| LabeledConflict {
                            property: property.clone(),
                            conflict,
                        }));
                    }
                    // A conflict inside one element is still a conflict to
                    // accumulate; anything else is malformed metadata.
                    Err(ExtractionError::Conflicts { conflicts: inner }) => {
                        conflicts.extend(inner);
                    }
                    Err(other) => return Err(other),
                }
            }
        }
        Ok(merged)
    }
}

impl Default for ExtractionCoordinator {
    fn default() -> Self {
        Self::new()
    }
}
