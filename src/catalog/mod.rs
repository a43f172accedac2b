//! Interval catalog storage and phrase indexing.
//!
//! The catalog maps interval names to their ages, rank, and parent interval.
//! An ICS 2020 catalog is compiled into the binary, but custom catalogs can
//! also be loaded from CSV or TSV files.
//!
//! ## Embedded Catalog
//!
//! The default catalog follows the International Chronostratigraphic Chart
//! (v2020/03) from the Hadean down to Holocene ages:
//!
//! - **Eons and eras**: Hadean, Archean, Proterozoic, Phanerozoic, Mesozoic, ...
//! - **Periods and sub-periods**: Cambrian through Quaternary, Mississippian, Pennsylvanian
//! - **Epochs and ages**: Early Jurassic, Miocene, Toarcian, Meghalayan, ...
//!
//! ## Example
//!
//! ```rust,no_run
//! use geochron::IntervalCatalog;
//!
//! // Load embedded catalog
//! let catalog = IntervalCatalog::load_embedded().unwrap();
//!
//! // Get a specific interval
//! let jurassic = catalog.lookup("Jurassic").unwrap();
//! println!("{:?} - {:?} Ma", jurassic.start, jurassic.end);
//!
//! // Walk up the hierarchy
//! for parent in catalog.lineage("Toarcian") {
//!     println!("part of {}", parent.name);
//! }
//! ```
//!
//! ## Phrase Index
//!
//! [`PhraseIndex`](index::PhraseIndex) tokenizes every catalog name and stores
//! the token sequences in a trie, so a single left-to-right scan over a text
//! reports every name occurrence, including names nested in longer names.

pub mod index;
pub mod store;
