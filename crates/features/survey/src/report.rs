use ogmap_kernel::domain::facility::{Combination, Facility};
use serde::Serialize;
use std::fmt;

/// Which collaborator a failed call went to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Search,
    Detail,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Search => "search",
            Self::Detail => "detail",
        })
    }
}

/// A search or detail call that failed; the sweep carried on without its results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallFailure {
    pub stage: Stage,
    pub combination: Combination,
    /// The query text for searches, the place id for detail lookups.
    pub subject: String,
    pub message: String,
}

impl CallFailure {
    pub(crate) fn search(combination: &Combination, error: &impl fmt::Display) -> Self {
        Self {
            stage: Stage::Search,
            combination: combination.clone(),
            subject: combination.query(),
            message: error.to_string(),
        }
    }

    pub(crate) fn detail(
        combination: &Combination,
        place_id: &str,
        error: &impl fmt::Display,
    ) -> Self {
        Self {
            stage: Stage::Detail,
            combination: combination.clone(),
            subject: place_id.to_owned(),
            message: error.to_string(),
        }
    }
}

/// Result of one sweep: the deduplicated facilities plus diagnostics.
#[derive(Debug, Clone)]
pub struct Sweep {
    pub run_id: String,
    /// Unique by id, in first-seen sweep order.
    pub facilities: Vec<Facility>,
    pub combinations: usize,
    /// Candidates returned by all searches, before detail resolution.
    pub candidates: usize,
    /// Resolved facilities dropped because an earlier combination already produced them.
    pub duplicates: usize,
    pub failures: Vec<CallFailure>,
}

impl Sweep {
    #[must_use]
    pub fn count(&self) -> usize {
        self.facilities.len()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    #[must_use]
    pub fn into_facilities(self) -> Vec<Facility> {
        self.facilities
    }
}
