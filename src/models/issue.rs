use std::collections::HashSet;

use itertools::Itertools;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid labels: {0}")]
    UnknownLabels(String),
}

/// Snapshot of the label names known to the target repository, taken once
/// per run. Concurrent label changes on the repository are not reflected.
#[derive(Debug, Clone)]
pub struct LabelRegistry {
    names: HashSet<String>,
}

impl LabelRegistry {
    pub fn new(names: impl IntoIterator<Item = String>) -> Self {
        Self {
            names: names.into_iter().collect(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Issue content returned by the generator. Not modified after construction;
/// either it validates as-is or the run aborts.
#[derive(Debug, Clone, Deserialize)]
pub struct IssueDraft {
    pub title: String,
    pub body: String,
    pub labels: Vec<String>,
}

impl IssueDraft {
    pub fn validate(&self, registry: &LabelRegistry) -> Result<&Self, ValidationError> {
        validate_labels(&self.labels, registry)?;
        Ok(self)
    }
}

/// Every label must already exist in the repository, so that issue creation
/// cannot fail or silently drop labels downstream. Order and duplicates pass
/// through untouched; matching is exact, no case folding.
pub fn validate_labels<'a>(
    labels: &'a [String],
    registry: &LabelRegistry,
) -> Result<&'a [String], ValidationError> {
    let unknown = labels
        .iter()
        .filter(|label| !registry.contains(label))
        .collect::<Vec<_>>();

    if unknown.is_empty() {
        Ok(labels)
    } else {
        Err(ValidationError::UnknownLabels(unknown.into_iter().join(", ")))
    }
}
