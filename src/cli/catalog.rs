use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::catalog::store::IntervalCatalog;
use crate::cli::{format_age, tsv_cell, OutputFormat};
use crate::core::interval::IntervalRecord;
use crate::core::types::Rank;

#[derive(Args)]
pub struct CatalogArgs {
    #[command(subcommand)]
    pub command: CatalogCommands,
}

#[derive(Subcommand)]
pub enum CatalogCommands {
    /// List intervals in the catalog
    List {
        /// Path to custom catalog file
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Filter by rank (e.g., "epoch")
        #[arg(long)]
        rank: Option<String>,

        /// Only intervals directly inside this one (e.g., "Jurassic")
        #[arg(long)]
        part_of: Option<String>,
    },

    /// Show details of a specific interval
    Show {
        /// Interval name (case-insensitive)
        #[arg(required = true)]
        name: String,

        /// Path to custom catalog file
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Export the catalog to a CSV file
    Export {
        /// Output file path
        #[arg(required = true)]
        output: PathBuf,

        /// Path to custom catalog file to export (defaults to embedded)
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
}

/// Execute catalog subcommand
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded, the interval is not
/// found, or the export file cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: CatalogArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    match args.command {
        CatalogCommands::List {
            catalog,
            rank,
            part_of,
        } => {
            let catalog = load_catalog(catalog.as_ref(), verbose)?;
            list_intervals(&catalog, rank.as_deref(), part_of.as_deref(), format)
        }
        CatalogCommands::Show { name, catalog } => {
            let catalog = load_catalog(catalog.as_ref(), verbose)?;
            show_interval(&catalog, &name, format)
        }
        CatalogCommands::Export { output, catalog } => {
            let catalog = load_catalog(catalog.as_ref(), verbose)?;
            std::fs::write(&output, catalog.to_csv()?)?;
            eprintln!(
                "Exported {} intervals to {}",
                catalog.len(),
                output.display()
            );
            Ok(())
        }
    }
}

fn load_catalog(path: Option<&PathBuf>, verbose: bool) -> anyhow::Result<IntervalCatalog> {
    let catalog = if let Some(path) = path {
        IntervalCatalog::load_from_file(path)?
    } else {
        IntervalCatalog::load_embedded()?
    };

    if verbose {
        eprintln!("Loaded catalog with {} intervals", catalog.len());
    }

    Ok(catalog)
}

fn list_intervals(
    catalog: &IntervalCatalog,
    rank: Option<&str>,
    part_of: Option<&str>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let rank_filter = rank.and_then(Rank::parse);

    let intervals: Vec<&IntervalRecord> = catalog
        .intervals()
        .iter()
        .filter(|i| rank_filter.is_none() || i.rank == rank_filter)
        .filter(|i| matches_parent(part_of, i.part_of.as_deref()))
        .collect();

    match format {
        OutputFormat::Text => {
            println!("{:<24} {:<12} {:>18} {:>18}", "NAME", "RANK", "START (Ma)", "END (Ma)");
            println!("{}", "-".repeat(75));
            for interval in &intervals {
                println!(
                    "{:<24} {:<12} {:>18} {:>18}",
                    interval.name,
                    tsv_cell(interval.rank.as_ref()),
                    format_age(interval.start, interval.start_uncertainty),
                    format_age(interval.end, interval.end_uncertainty),
                );
            }
            println!("\nTotal: {} intervals", intervals.len());
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&intervals)?);
        }
        OutputFormat::Tsv => {
            println!("name\trank\tstart\tstart_uncertainty\tend\tend_uncertainty\tpart_of\tsource");
            for interval in &intervals {
                print_tsv_row(interval);
            }
        }
    }

    Ok(())
}

/// True when no `--part-of` filter is set or the parent matches it
fn matches_parent(filter: Option<&str>, parent: Option<&str>) -> bool {
    match filter {
        None => true,
        Some(wanted) => parent.is_some_and(|p| p.eq_ignore_ascii_case(wanted)),
    }
}

fn find_interval<'a>(catalog: &'a IntervalCatalog, name: &str) -> Option<&'a IntervalRecord> {
    catalog.lookup(name).or_else(|| {
        catalog
            .intervals()
            .iter()
            .find(|i| i.name.eq_ignore_ascii_case(name))
    })
}

fn show_interval(
    catalog: &IntervalCatalog,
    name: &str,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let interval = find_interval(catalog, name)
        .ok_or_else(|| anyhow::anyhow!("Interval not found: {name}"))?;
    let lineage = catalog.lineage(&interval.name);
    let children = catalog.children(&interval.name);

    match format {
        OutputFormat::Text => {
            println!("Interval: {}", interval.name);
            if let Some(rank) = &interval.rank {
                println!("Rank: {rank}");
            }
            println!(
                "Start: {} Ma",
                format_age(interval.start, interval.start_uncertainty)
            );
            println!(
                "End: {} Ma",
                format_age(interval.end, interval.end_uncertainty)
            );
            if let Some(duration) = interval.duration() {
                println!("Duration: {duration:.3} Myr");
            }
            if !interval.source.is_empty() {
                println!("Source: {}", interval.source);
            }

            if !lineage.is_empty() {
                let path: Vec<&str> = lineage.iter().map(|i| i.name.as_str()).collect();
                println!("\nPart of: {}", path.join(" < "));
            }

            if !children.is_empty() {
                println!("\nContains ({}):", children.len());
                for child in &children {
                    println!(
                        "  {} ({} to {} Ma)",
                        child.name,
                        format_age(child.start, child.start_uncertainty),
                        format_age(child.end, child.end_uncertainty)
                    );
                }
            }
        }
        OutputFormat::Json => {
            let json = serde_json::json!({
                "interval": interval,
                "lineage": lineage.iter().map(|i| &i.name).collect::<Vec<_>>(),
                "children": children.iter().map(|i| &i.name).collect::<Vec<_>>(),
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Tsv => {
            println!("name\trank\tstart\tstart_uncertainty\tend\tend_uncertainty\tpart_of\tsource");
            print_tsv_row(interval);
        }
    }

    Ok(())
}

fn print_tsv_row(interval: &IntervalRecord) {
    println!(
        "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
        interval.name,
        tsv_cell(interval.rank.as_ref()),
        tsv_cell(interval.start),
        tsv_cell(interval.start_uncertainty),
        tsv_cell(interval.end),
        tsv_cell(interval.end_uncertainty),
        tsv_cell(interval.part_of.as_deref()),
        interval.source,
    );
}
