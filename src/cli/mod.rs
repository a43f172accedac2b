//! Command-line interface for geochron.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **annotate**: Tag interval names in text from arguments, a file, or stdin
//! - **catalog**: List, show, or export intervals from the catalog
//! - **serve**: Start the HTTP annotation service
//!
//! ## Usage
//!
//! ```text
//! # Annotate a sentence
//! geochron annotate "Ammonites flourished in the Early Jurassic"
//!
//! # Pipe text in
//! cat abstract.txt | geochron annotate -
//!
//! # JSON output for scripting
//! geochron --format json annotate --input abstract.txt
//!
//! # Show an interval and its parents
//! geochron catalog show Toarcian
//!
//! # Start the web service
//! geochron serve --port 8080 --open
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::catalog::store::IntervalCatalog;
use crate::matching::engine::{AnnotationEngine, EngineConfig};

pub mod annotate;
pub mod catalog;

#[derive(Parser)]
#[command(name = "geochron")]
#[command(version)]
#[command(about = "Tag geochronological intervals in free text")]
#[command(
    long_about = "geochron finds named geochronological intervals (eons, eras, periods, epochs, ages) in free text.\n\nEach match is reported with:\n- Start and end ages in Ma, with uncertainties where known\n- The interval's rank and containing interval\n- The source of the catalog record"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Tag interval names in text
    Annotate(annotate::AnnotateArgs),

    /// Inspect the interval catalog
    Catalog(catalog::CatalogArgs),

    /// Start the web server
    Serve(ServeArgs),
}

/// Options that shape how the annotation engine is built
#[derive(clap::Args, Clone, Debug, Default)]
pub struct EngineArgs {
    /// Path to a custom catalog file (CSV, TSV, or gzip-compressed)
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Match interval names with exact case
    #[arg(long)]
    pub case_sensitive: bool,

    /// Title-case text before matching
    #[arg(long)]
    pub title_case: bool,
}

impl EngineArgs {
    /// Load the custom catalog if one was given, otherwise the embedded one
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be read or is invalid.
    pub fn load_catalog(&self) -> anyhow::Result<IntervalCatalog> {
        let catalog = if let Some(path) = &self.catalog {
            IntervalCatalog::load_from_file(path)?
        } else {
            IntervalCatalog::load_embedded()?
        };
        Ok(catalog)
    }

    /// Build an annotation engine from these options
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded or indexed.
    pub fn build_engine(&self) -> anyhow::Result<AnnotationEngine> {
        let catalog = self.load_catalog()?;
        let config = EngineConfig::default()
            .case_sensitive(self.case_sensitive)
            .title_case_input(self.title_case);
        Ok(AnnotationEngine::with_config(catalog, config)?)
    }
}

#[derive(clap::Args)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(short, long, default_value = "8080")]
    pub port: u16,

    /// Address to bind to
    #[arg(short, long, default_value = "127.0.0.1")]
    pub address: String,

    /// Open browser automatically
    #[arg(long)]
    pub open: bool,

    #[command(flatten)]
    pub engine: EngineArgs,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Render an age with its uncertainty, e.g. `201.3 ±0.2`
pub(crate) fn format_age(age: Option<f64>, uncertainty: Option<f64>) -> String {
    match (age, uncertainty) {
        (Some(age), Some(uncertainty)) => format!("{age} ±{uncertainty}"),
        (Some(age), None) => age.to_string(),
        (None, _) => "unknown".to_string(),
    }
}

/// Render an optional value for TSV output, using an empty cell for unknown
pub(crate) fn tsv_cell<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
