use serde::{Deserialize, Serialize};

use crate::core::types::Rank;

/// A named geochronological interval from the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalRecord {
    /// Unique interval name (e.g., "Early Jurassic")
    pub name: String,

    /// Age of the lower boundary in Ma
    pub start: Option<f64>,

    /// Age of the upper boundary in Ma
    pub end: Option<f64>,

    /// Uncertainty of the lower boundary in Ma
    pub start_uncertainty: Option<f64>,

    /// Uncertainty of the upper boundary in Ma
    pub end_uncertainty: Option<f64>,

    pub rank: Option<Rank>,

    /// Name of the immediately containing interval
    pub part_of: Option<String>,

    /// Provenance of the record (e.g., "ICS2020")
    pub source: String,
}

impl IntervalRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            start: None,
            end: None,
            start_uncertainty: None,
            end_uncertainty: None,
            rank: None,
            part_of: None,
            source: String::new(),
        }
    }

    #[must_use]
    pub fn with_ages(mut self, start: f64, end: f64) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }

    #[must_use]
    pub fn with_uncertainties(mut self, start: Option<f64>, end: Option<f64>) -> Self {
        self.start_uncertainty = start;
        self.end_uncertainty = end;
        self
    }

    #[must_use]
    pub fn with_rank(mut self, rank: Rank) -> Self {
        self.rank = Some(rank);
        self
    }

    #[must_use]
    pub fn with_part_of(mut self, parent: impl Into<String>) -> Self {
        self.part_of = Some(parent.into());
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Span of the interval in Ma, if both boundaries are known
    #[must_use]
    pub fn duration(&self) -> Option<f64> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => Some(start - end),
            _ => None,
        }
    }
}
