use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Which bounded search ran out of attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStage {
    /// Grouping every sample regardless of sex.
    Combined,
    /// Grouping the female subset.
    Female,
    /// Grouping the male subset.
    Male,
    /// Matching female groups with male groups.
    Recombination,
}

impl fmt::Display for SearchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SearchStage::Combined => "combined",
            SearchStage::Female => "female",
            SearchStage::Male => "male",
            SearchStage::Recombination => "recombination",
        };
        f.write_str(name)
    }
}

/// Error type for grouping requests.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GroupingError {
    /// Required columns are absent from the input dataset.
    #[error("dataset is missing required column(s): {}", .missing.join(", "))]
    Schema { missing: Vec<String> },

    /// No candidate passed the dispersion test within the retry ceiling.
    #[error("{stage} search tried {attempts} times; the deviation is too big")]
    RetryExhausted { stage: SearchStage, attempts: usize },

    /// A partition has fewer groups than configured.
    #[error("expected {expected} groups, but got {actual}")]
    Shape { expected: usize, actual: usize },

    /// Grouping parameters violate their constraints.
    #[error("invalid grouping configuration: {0}")]
    InvalidConfig(String),

    /// A subset has fewer samples than the requested number of groups.
    #[error("{subset} subset has {available} sample(s), fewer than the {group_amount} groups requested")]
    InsufficientSamples {
        subset: SearchStage,
        available: usize,
        group_amount: usize,
    },

    /// A weight cell is missing, non-numeric, or non-finite.
    #[error("row {row}: invalid weight: {reason}")]
    InvalidWeight { row: usize, reason: String },

    /// Two partitions cannot be matched group for group.
    #[error("cannot recombine partitions with {left} and {right} groups")]
    GroupCountMismatch { left: usize, right: usize },
}

impl GroupingError {
    /// Returns `true` when a bounded search gave up. Relaxing the
    /// threshold or rerunning the request may succeed.
    pub fn is_retry_exhausted(&self) -> bool {
        matches!(self, GroupingError::RetryExhausted { .. })
    }
}
