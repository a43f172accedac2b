//! Interval annotation: overlap resolution and the annotation engine.
//!
//! This module provides the core matching functionality:
//!
//! - [`AnnotationEngine`]: Main entry point for tagging intervals in text
//! - [`resolve`]: Greedy overlap resolution over phrase candidates
//! - [`EnrichedEntity`]: A matched interval joined with its catalog record
//!
//! ## Annotation Pipeline
//!
//! Each call runs the same one-way pipeline:
//!
//! 1. **Tokenize**: Split the text with the engine's tokenizer
//! 2. **Find candidates**: Scan the tokens with the phrase index
//! 3. **Resolve**: Keep the leftmost, then longest, non-overlapping candidates
//! 4. **Enrich**: Join each kept match to its catalog record
//!
//! ## Overlap Policy
//!
//! Candidates are visited by start position, longest first at each position.
//! A candidate is kept unless one of its tokens is already covered, so
//! "Early Jurassic" wins over the nested "Jurassic".
//!
//! ## Example
//!
//! ```rust,no_run
//! use geochron::{AnnotationEngine, IntervalCatalog};
//!
//! let catalog = IntervalCatalog::load_embedded().unwrap();
//! let engine = AnnotationEngine::new(catalog).unwrap();
//!
//! let result = engine.annotate("Ammonites flourished in the Early Jurassic.");
//! for entity in &result.entities {
//!     println!("{} ({:?} - {:?} Ma)", entity.interval, entity.start_date, entity.end_date);
//! }
//! ```

pub mod engine;
pub mod resolver;

pub use engine::{AnnotationEngine, AnnotationResult, EngineConfig, EnrichedEntity};
pub use resolver::{resolve, ResolvedMatch};
