//! Core data types for geochronological interval tagging.
//!
//! This module provides the fundamental types used throughout the library:
//!
//! - [`IntervalRecord`]: One catalog entry with ages, uncertainties, rank, and parent
//! - [`Rank`]: The taxonomic level of an interval (eon, era, period, ...)
//! - [`Token`], [`Tokenizer`], [`WordTokenizer`]: Word-like units with stable offsets
//!
//! ## Unknown Values
//!
//! Catalog tables routinely leave ages or uncertainties blank. Those values are
//! carried as `None` and serialized as JSON `null`; they are never coerced to `0`.
//!
//! | Field | Example | Unknown |
//! |-------|---------|---------|
//! | start | 201.3   | `None`  |
//! | start_uncertainty | 0.2 | `None` |
//! | rank  | epoch   | `None`  |
//!
//! [`IntervalRecord`]: interval::IntervalRecord
//! [`Rank`]: types::Rank
//! [`Token`]: token::Token
//! [`Tokenizer`]: token::Tokenizer
//! [`WordTokenizer`]: token::WordTokenizer

pub mod interval;
pub mod token;
pub mod types;
