//! pdfmerge - Merge an ordered batch of PDF files into a single document.
//!
//! Command-line front end for the pdfmerge job runner.

mod cli;

use clap::Parser;
use std::path::{Path, PathBuf};
use std::process;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use pdfmerge::config::{Config, OverwriteMode};
use pdfmerge::error::PdfMergeError;
use pdfmerge::io::{PdfReader, PdfWriter};
use pdfmerge::job::JobRunner;
use pdfmerge::output::{
    OutputFormatter, display_merge_statistics, display_plan, display_read_statistics,
};
use pdfmerge::request::{MergeManifest, MergeRequest};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        eprintln!("Error: {err}");
        process::exit(err.exit_code());
    }
}

/// Install the log subscriber. `RUST_LOG` wins over the CLI verbosity.
fn init_tracing(config: &Config) {
    let default_directive = if config.verbose {
        "pdfmerge=debug"
    } else if config.quiet {
        "error"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_directive)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Inputs gathered from the command line or a manifest.
#[derive(Debug, Default)]
struct ResolvedInputs {
    paths: Vec<PathBuf>,
    order: Option<Vec<usize>>,
    output: Option<PathBuf>,
}

/// Collect input paths, order, and output from config and manifest.
///
/// An order given on the command line replaces the manifest's.
async fn resolve_inputs(config: &Config) -> Result<ResolvedInputs, PdfMergeError> {
    let mut resolved = match &config.manifest {
        Some(path) => {
            let manifest = MergeManifest::load(path).await?;
            let base = path.parent().unwrap_or_else(|| Path::new(""));
            ResolvedInputs {
                paths: manifest.files,
                order: manifest.order,
                output: manifest.output.map(|output| base.join(output)),
            }
        }
        None => ResolvedInputs {
            paths: config.inputs.clone(),
            ..Default::default()
        },
    };

    if let Some(order) = &config.order {
        resolved.order = Some(order.as_slice().to_vec());
    }
    if let Some(output) = &config.output {
        resolved.output = Some(output.clone());
    }

    Ok(resolved)
}

/// Main application logic.
async fn run(cli: Cli) -> Result<(), PdfMergeError> {
    cli.validate()?;
    let config = cli.to_config()?;

    init_tracing(&config);

    let formatter = OutputFormatter::from_config(&config);
    formatter.section(&format!("{} v{}", pdfmerge::NAME, pdfmerge::VERSION));

    let inputs = resolve_inputs(&config).await?;
    debug!(
        inputs = inputs.paths.len(),
        order = ?inputs.order,
        output = ?inputs.output,
        "Resolved inputs"
    );

    formatter.info(&format!("Reading {} input file(s)...", inputs.paths.len()));
    let reader = PdfReader::new();
    let (files, read_stats) = reader
        .read_all(&inputs.paths, config.effective_jobs())
        .await?;
    display_read_statistics(&formatter, &read_stats);

    let mut request = MergeRequest::new(files);
    if let Some(order) = inputs.order {
        request = request.with_order(order);
    }
    if let Some(name) = inputs.output.as_deref().and_then(Path::file_name) {
        request = request.with_output_name(name.to_string_lossy());
    }

    let runner = JobRunner::new(config.runner_config());

    if config.dry_run {
        let plan = runner.plan(request).await?;
        display_plan(&formatter, &plan);
        formatter.success("Dry run completed successfully");
        formatter.info("  Run without --dry-run to create the merged PDF");
        return Ok(());
    }

    formatter.info("Merging documents...");
    let output = runner.run_job(request).await?;

    let output_path = output_path(inputs.output, &output.suggested_file_name);
    handle_output_overwrite(&output_path, config.overwrite_mode, &formatter)?;

    let writer = PdfWriter::new();
    writer.can_write(&output_path).await?;
    let write_stats = writer
        .save_with_stats(&output.bytes, &output_path)
        .await?;

    formatter.success(&format!(
        "Merged {} file(s), {} pages into {} ({})",
        output.statistics.files_merged,
        output.statistics.total_pages,
        output_path.display(),
        write_stats.format_file_size()
    ));

    if formatter.is_verbose() {
        formatter.section("Statistics");
        formatter.detail("Job", &output.job_id.to_string());
        display_merge_statistics(&formatter, &output.statistics);
        formatter.detail(
            "Write time",
            &format!("{:.2}s", write_stats.write_time.as_secs_f64()),
        );
    } else if output.statistics.files_skipped > 0 {
        formatter.warning(&format!(
            "Skipped {} file(s) with no pages",
            output.statistics.files_skipped
        ));
    }

    Ok(())
}

/// Where the merged file is written: the requested path, or the suggested
/// name in the current directory.
fn output_path(requested: Option<PathBuf>, suggested_file_name: &str) -> PathBuf {
    requested.unwrap_or_else(|| PathBuf::from(suggested_file_name))
}

/// Handle output file overwrite scenarios.
fn handle_output_overwrite(
    path: &Path,
    mode: OverwriteMode,
    formatter: &OutputFormatter,
) -> Result<(), PdfMergeError> {
    if !path.exists() {
        return Ok(());
    }

    match mode {
        OverwriteMode::Force => Ok(()),
        OverwriteMode::NoClobber => Err(PdfMergeError::output_exists(path.to_path_buf())),
        OverwriteMode::Prompt => {
            // In quiet mode, treat as no-clobber
            if formatter.is_quiet() {
                return Err(PdfMergeError::output_exists(path.to_path_buf()));
            }

            formatter.warning(&format!("Output file already exists: {}", path.display()));

            use std::io::{self, Write};
            print!("Overwrite? [y/N]: ");
            io::stdout().flush().ok();

            let mut response = String::new();
            io::stdin()
                .read_line(&mut response)
                .map_err(|err| PdfMergeError::other(format!("Failed to read input: {err}")))?;

            match response.trim().to_lowercase().as_str() {
                "y" | "yes" => Ok(()),
                _ => Err(PdfMergeError::Cancelled),
            }
        }
    }
}
