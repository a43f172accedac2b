//! Parsers for interval catalog tables.
//!
//! The catalog is a delimited text table with one interval per row. A header
//! row names the columns; each following row becomes a raw record mapping
//! column name to cell text. Typing the cells (ages, rank, parent) is left to
//! [`IntervalCatalog::load`](crate::catalog::store::IntervalCatalog::load).
//!
//! ## Example
//!
//! ```rust,no_run
//! use geochron::parsing::csv::{parse_csv_file, parse_csv_text};
//! use std::path::Path;
//!
//! // Parse from a file (plain or gzip-compressed)
//! let records = parse_csv_file(Path::new("intervals.csv.gz")).unwrap();
//!
//! // Or parse from raw text
//! let text = "name,start,end,rank\nHolocene,0.0117,0,epoch\n";
//! let records = parse_csv_text(text, b',').unwrap();
//! assert_eq!(records[0]["name"], "Holocene");
//! ```
//!
//! ## Recognized Columns
//!
//! | Column | Description | Required |
//! |--------|-------------|----------|
//! | name   | Interval name | Yes |
//! | start  | Lower boundary age (Ma) | No |
//! | start_uncertainty | Lower boundary uncertainty (Ma) | No |
//! | end    | Upper boundary age (Ma) | No |
//! | end_uncertainty | Upper boundary uncertainty (Ma) | No |
//! | rank   | eon, era, period, epoch, age, ... | No |
//! | part_of | Name of the containing interval | No |
//! | source | Provenance | No |

pub mod csv;
