use std::collections::{HashMap, HashSet};
use std::fmt::Write as _;
use std::path::Path;

use thiserror::Error;

use crate::core::interval::IntervalRecord;
use crate::core::types::Rank;
use crate::parsing::csv::{parse_csv_file, parse_csv_text, ParseError, RawRecord};
use crate::utils::validation::parse_age;

#[derive(Error, Debug)]
pub enum CatalogLoadError {
    #[error("Failed to read catalog: {0}")]
    ParseError(#[from] ParseError),

    #[error("Record {record} is missing required field '{field}'")]
    MissingField { record: usize, field: &'static str },

    #[error("Duplicate interval name '{0}'")]
    DuplicateName(String),
}

/// Column order used when exporting a catalog
pub const CATALOG_COLUMNS: [&str; 8] = [
    "name",
    "start",
    "start_uncertainty",
    "end",
    "end_uncertainty",
    "rank",
    "part_of",
    "source",
];

/// The interval catalog with a name index.
///
/// There is no way to add or change intervals after loading, so a catalog can
/// be shared freely between threads.
#[derive(Debug, Default)]
pub struct IntervalCatalog {
    /// All intervals, in source order
    intervals: Vec<IntervalRecord>,

    /// Index: interval name -> index in intervals vec
    name_to_index: HashMap<String, usize>,
}

impl IntervalCatalog {
    /// Load the embedded ICS 2020 catalog
    pub fn load_embedded() -> Result<Self, CatalogLoadError> {
        // Validated at compile time via build.rs
        const EMBEDDED_CATALOG: &str = include_str!("../../data/ics2020.csv");
        Self::from_csv(EMBEDDED_CATALOG)
    }

    /// Load catalog from a CSV, TSV, or gzip-compressed file
    pub fn load_from_file(path: &Path) -> Result<Self, CatalogLoadError> {
        let records = parse_csv_file(path)?;
        Self::load(records)
    }

    /// Parse catalog from comma-separated text
    pub fn from_csv(text: &str) -> Result<Self, CatalogLoadError> {
        let records = parse_csv_text(text, b',')?;
        Self::load(records)
    }

    /// Build a catalog from raw records.
    ///
    /// Age and uncertainty cells that are blank or not numbers become unknown.
    /// Blank `rank` and `part_of` cells become unknown as well.
    ///
    /// # Errors
    ///
    /// Returns `CatalogLoadError::MissingField` if a record has no `name` (or
    /// a blank one), or `CatalogLoadError::DuplicateName` if two records share
    /// a name.
    pub fn load<I>(records: I) -> Result<Self, CatalogLoadError>
    where
        I: IntoIterator<Item = RawRecord>,
    {
        let intervals = records
            .into_iter()
            .enumerate()
            .map(|(i, record)| interval_from_record(i + 1, &record))
            .collect::<Result<Vec<_>, _>>()?;

        Self::from_intervals(intervals)
    }

    /// Build a catalog from already-typed intervals
    ///
    /// # Errors
    ///
    /// Returns `CatalogLoadError::DuplicateName` if two intervals share a name.
    pub fn from_intervals(intervals: Vec<IntervalRecord>) -> Result<Self, CatalogLoadError> {
        let mut name_to_index = HashMap::with_capacity(intervals.len());

        for (index, interval) in intervals.iter().enumerate() {
            if name_to_index.insert(interval.name.clone(), index).is_some() {
                return Err(CatalogLoadError::DuplicateName(interval.name.clone()));
            }
        }

        let catalog = Self {
            intervals,
            name_to_index,
        };

        let dangling = catalog
            .intervals
            .iter()
            .filter(|i| {
                i.part_of
                    .as_deref()
                    .is_some_and(|parent| !catalog.name_to_index.contains_key(parent))
            })
            .count();
        if dangling > 0 {
            tracing::warn!(
                "{} intervals name a parent that is not in the catalog",
                dangling
            );
        }

        tracing::debug!("Loaded catalog with {} intervals", catalog.len());
        Ok(catalog)
    }

    /// Get an interval by exact name
    pub fn lookup(&self, name: &str) -> Option<&IntervalRecord> {
        self.name_to_index.get(name).map(|&idx| &self.intervals[idx])
    }

    /// All intervals in source order
    pub fn intervals(&self) -> &[IntervalRecord] {
        &self.intervals
    }

    /// All interval names in source order
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.intervals.iter().map(|i| i.name.as_str())
    }

    /// Containing intervals of `name`, nearest first.
    ///
    /// The walk stops at a parent missing from the catalog or at a name already
    /// visited, so malformed `part_of` chains cannot loop.
    pub fn lineage(&self, name: &str) -> Vec<&IntervalRecord> {
        let mut ancestors = Vec::new();
        let mut visited: HashSet<&str> = HashSet::new();
        visited.insert(name);

        let mut current = self.lookup(name).and_then(|i| i.part_of.as_deref());
        while let Some(parent_name) = current {
            if !visited.insert(parent_name) {
                break;
            }
            let Some(parent) = self.lookup(parent_name) else {
                break;
            };
            ancestors.push(parent);
            current = parent.part_of.as_deref();
        }

        ancestors
    }

    /// Intervals directly contained in `name`, in source order
    pub fn children(&self, name: &str) -> Vec<&IntervalRecord> {
        self.intervals
            .iter()
            .filter(|i| i.part_of.as_deref() == Some(name))
            .collect()
    }

    /// Export catalog to CSV in the same layout it is loaded from.
    ///
    /// Fields containing the delimiter or quotes are quoted.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Csv` if a row cannot be written.
    pub fn to_csv(&self) -> Result<String, ParseError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(CATALOG_COLUMNS)?;

        for interval in &self.intervals {
            writer.write_record([
                interval.name.clone(),
                format_age(interval.start),
                format_age(interval.start_uncertainty),
                format_age(interval.end),
                format_age(interval.end_uncertainty),
                interval.rank.as_ref().map(Rank::to_string).unwrap_or_default(),
                interval.part_of.clone().unwrap_or_default(),
                interval.source.clone(),
            ])?;
        }

        let rows = writer
            .into_inner()
            .map_err(|e| ParseError::Io(e.into_error()))?;

        let mut out = String::new();
        let _ = writeln!(
            out,
            "# geochron catalog export, created {}",
            chrono::Utc::now().to_rfc3339()
        );
        out.push_str(&String::from_utf8_lossy(&rows));
        Ok(out)
    }

    /// Number of intervals in catalog
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    /// Check if catalog is empty
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }
}

fn interval_from_record(
    record_num: usize,
    record: &RawRecord,
) -> Result<IntervalRecord, CatalogLoadError> {
    let name = record
        .get("name")
        .map(|n| n.trim())
        .filter(|n| !n.is_empty())
        .ok_or(CatalogLoadError::MissingField {
            record: record_num,
            field: "name",
        })?;

    let field = |key: &str| record.get(key).map(String::as_str).unwrap_or_default();
    let optional_text = |key: &str| {
        let value = field(key).trim();
        (!value.is_empty()).then(|| value.to_string())
    };

    Ok(IntervalRecord {
        name: name.to_string(),
        start: parse_age(field("start")),
        end: parse_age(field("end")),
        start_uncertainty: parse_age(field("start_uncertainty")),
        end_uncertainty: parse_age(field("end_uncertainty")),
        rank: Rank::parse(field("rank")),
        part_of: optional_text("part_of"),
        source: field("source").trim().to_string(),
    })
}

fn format_age(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
