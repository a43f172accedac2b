use std::io::Read;
use std::path::{Path, PathBuf};

use clap::Args;

use crate::cli::{format_age, tsv_cell, EngineArgs, OutputFormat};
use crate::matching::engine::AnnotationResult;

#[derive(Args)]
pub struct AnnotateArgs {
    /// Text to annotate; words are joined with spaces.
    /// Reads stdin when omitted or '-'
    pub text: Vec<String>,

    /// Read the text from a file instead ('-' for stdin)
    #[arg(short, long, conflicts_with = "text")]
    pub input: Option<PathBuf>,

    #[command(flatten)]
    pub engine: EngineArgs,
}

/// Execute annotate subcommand
///
/// # Errors
///
/// Returns an error if the input cannot be read or the engine cannot be built.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: AnnotateArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let text = read_text(&args)?;
    let engine = args.engine.build_engine()?;

    if verbose {
        eprintln!(
            "Loaded catalog with {} intervals ({} indexed names)",
            engine.catalog().len(),
            engine.index().len()
        );
    }

    let result = engine.annotate(&text);

    if verbose {
        let d = &result.diagnostics;
        eprintln!(
            "{} tokens, {} candidates, {} resolved, {} skipped",
            d.tokens, d.candidates, d.resolved, d.skipped
        );
    }

    match format {
        OutputFormat::Text => print_text_results(&result),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Tsv => print_tsv_results(&result),
    }

    Ok(())
}

fn read_text(args: &AnnotateArgs) -> anyhow::Result<String> {
    if let Some(path) = &args.input {
        return if path == Path::new("-") {
            read_stdin()
        } else {
            Ok(std::fs::read_to_string(path)?)
        };
    }

    if args.text.is_empty() || args.text == ["-"] {
        read_stdin()
    } else {
        Ok(args.text.join(" "))
    }
}

fn read_stdin() -> anyhow::Result<String> {
    let mut text = String::new();
    std::io::stdin().read_to_string(&mut text)?;
    Ok(text)
}

fn print_text_results(result: &AnnotationResult) {
    if !result.has_intervals() {
        eprintln!("No intervals found.");
        return;
    }

    for entity in &result.entities {
        let rank = entity
            .rank
            .as_ref()
            .map_or_else(|| "unknown rank".to_string(), ToString::to_string);
        println!("{} [{}]", entity.interval, rank);
        if entity.interval != entity.name {
            println!("  Catalog name: {}", entity.name);
        }
        println!(
            "  Age: {} to {} Ma",
            format_age(entity.start_date, entity.start_uncertainty),
            format_age(entity.end_date, entity.end_uncertainty)
        );
        if let Some(parent) = &entity.part_of {
            println!("  Part of: {parent}");
        }
        if !entity.source.is_empty() {
            println!("  Source: {}", entity.source);
        }
        println!("  Offsets: {}..{}", entity.span.start, entity.span.end);
    }
}

fn print_tsv_results(result: &AnnotationResult) {
    println!(
        "interval\tname\tstart_date\tstart_uncertainty\tend_date\tend_uncertainty\trank\tpart_of\tsource\tspan_start\tspan_end"
    );
    for entity in &result.entities {
        println!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            entity.interval,
            entity.name,
            tsv_cell(entity.start_date),
            tsv_cell(entity.start_uncertainty),
            tsv_cell(entity.end_date),
            tsv_cell(entity.end_uncertainty),
            tsv_cell(entity.rank.as_ref()),
            tsv_cell(entity.part_of.as_deref()),
            entity.source,
            entity.span.start,
            entity.span.end,
        );
    }
}
