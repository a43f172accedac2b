//! # geochron
//!
//! A library for tagging geochronological interval names in free text.
//!
//! Geological writing is full of interval names such as "Jurassic",
//! "Early Cretaceous", or "Meghalayan", but the names alone say nothing about
//! when those intervals were. `geochron` finds every interval name in a text
//! and attaches its absolute ages, uncertainties, rank, and parent interval
//! from a catalog derived from the International Chronostratigraphic Chart.
//!
//! ## Features
//!
//! - **Exact phrase matching**: Multi-word names match on whole tokens only
//! - **Case-insensitive by default**: "jurassic" and "JURASSIC" both match "Jurassic"
//! - **Longest match wins**: "Early Jurassic" is one entity, not "Jurassic" plus a stray word
//! - **Explicit unknowns**: Missing ages and uncertainties are `None`, never `0`
//! - **Hierarchy lookup**: Walk from an age up to its eon via `part_of`
//! - **Shareable engine**: Read-only after construction, safe to use from many threads
//!
//! ## Example
//!
//! ```rust,no_run
//! use geochron::{AnnotationEngine, IntervalCatalog};
//!
//! // Load the embedded catalog of ICS intervals
//! let catalog = IntervalCatalog::load_embedded().unwrap();
//! let engine = AnnotationEngine::new(catalog).unwrap();
//!
//! let result = engine.annotate("The Holocene began recently");
//! for entity in &result.entities {
//!     println!("{}: {:?} Ma ({:?})", entity.interval, entity.start_date, entity.rank);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`catalog`]: Interval catalog storage and the phrase index
//! - [`core`]: Core data types for intervals, ranks, and tokens
//! - [`matching`]: Overlap resolution and the annotation engine
//! - [`parsing`]: CSV/TSV catalog parsing
//! - [`cli`]: Command-line interface implementation
//! - [`web`]: Web server for HTTP annotation

pub mod catalog;
pub mod cli;
pub mod core;
pub mod matching;
pub mod parsing;
pub mod utils;
pub mod web;

// Re-export commonly used types for convenience
pub use catalog::index::{IndexBuildError, MatchCandidate, PhraseIndex};
pub use catalog::store::{CatalogLoadError, IntervalCatalog};
pub use core::interval::IntervalRecord;
pub use core::token::{Token, Tokenizer, WordTokenizer};
pub use core::types::Rank;
pub use matching::engine::{AnnotationEngine, AnnotationResult, EngineConfig, EnrichedEntity};
