//! CLI argument parsing for pdfmerge.
//!
//! This module defines the command-line interface structure using `clap`.
//! It handles argument parsing, early validation, and help text generation.
//!
//! # Examples
//!
//! ```no_run
//! use pdfmerge_cli::cli::Cli;
//! use clap::Parser;
//!
//! let cli = Cli::parse();
//! println!("Merging {} inputs", cli.inputs.len());
//! ```

use clap::Parser;
use std::path::PathBuf;

use pdfmerge::config::{Config, MergeOrder, OverwriteMode};
use pdfmerge::error::{PdfMergeError, Result};
use pdfmerge::utils::collect_paths_for_patterns;

/// Merge an ordered batch of PDF files into a single document.
///
/// Every input is decoded and checked before anything is written. Inputs
/// without pages are skipped, and at least two inputs are required.
#[derive(Parser, Debug)]
#[command(name = "pdfmerge")]
#[command(version)]
#[command(about = "Merge an ordered batch of PDF files into a single document", long_about = None)]
#[command(author)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Input PDF files to merge (in submission order)
    ///
    /// Specify multiple files or use glob patterns. Glob matches are
    /// sorted by name.
    ///
    /// Examples:
    ///   pdfmerge cover.pdf body.pdf -o report.pdf
    ///   pdfmerge 'chapter*.pdf' -o book.pdf
    #[arg(value_name = "FILE", required_unless_present = "manifest")]
    pub inputs: Vec<String>,

    /// Read inputs, order, and output name from a JSON manifest
    ///
    /// Relative paths in the manifest are resolved against the manifest's
    /// directory.
    ///
    /// Example manifest:
    ///   {"files": ["a.pdf", "b.pdf"], "order": [1, 0], "output": "out.pdf"}
    #[arg(short, long, value_name = "FILE", conflicts_with = "inputs")]
    pub manifest: Option<PathBuf>,

    /// Output PDF file path
    ///
    /// Defaults to a name derived from the manifest or a timestamped
    /// `merged_<millis>.pdf` in the current directory.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Merge order as comma-separated 0-based input indices
    ///
    /// Must list every input exactly once. Overrides the manifest's order.
    ///
    /// Example:
    ///   pdfmerge a.pdf b.pdf c.pdf --order 2,0,1 -o out.pdf
    #[arg(long, value_name = "INDICES")]
    pub order: Option<String>,

    /// Directory in which per-job staging directories are created
    ///
    /// Defaults to the system temporary directory. Staging directories are
    /// removed when the job finishes.
    #[arg(long, value_name = "DIR", env = "PDFMERGE_STAGING_DIR")]
    pub staging_dir: Option<PathBuf>,

    /// Dry run - decode inputs and show the merge plan without writing
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Verbose output - show statistics and debug logs
    #[arg(short, long)]
    pub verbose: bool,

    /// Force overwrite of existing output file without confirmation
    #[arg(short, long)]
    pub force: bool,

    /// Never overwrite existing output file
    ///
    /// If the output file already exists, exit with an error
    /// instead of prompting or overwriting.
    #[arg(long, conflicts_with = "force")]
    pub no_clobber: bool,

    /// Suppress all non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Number of input files read concurrently
    ///
    /// Default is number of CPU cores. Use 1 for sequential reads.
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,
}

impl Cli {
    /// Convert CLI arguments into a validated Config.
    ///
    /// Expands glob patterns, parses the merge order, and resolves the
    /// overwrite mode.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A glob pattern is invalid
    /// - The merge order cannot be parsed
    /// - Configuration validation fails
    pub fn to_config(&self) -> Result<Config> {
        let inputs = collect_paths_for_patterns(&self.inputs)?;

        let order = self
            .order
            .as_deref()
            .map(str::parse::<MergeOrder>)
            .transpose()?;

        let overwrite_mode = if self.force {
            OverwriteMode::Force
        } else if self.no_clobber {
            OverwriteMode::NoClobber
        } else {
            OverwriteMode::Prompt
        };

        let config = Config {
            inputs,
            manifest: self.manifest.clone(),
            output: self.output.clone(),
            order,
            overwrite_mode,
            dry_run: self.dry_run,
            verbose: self.verbose,
            quiet: self.quiet,
            staging_dir: self.staging_dir.clone(),
            jobs: self.jobs,
        };

        config.validate().map_err(|e| {
            PdfMergeError::invalid_config(format!("Configuration validation failed: {e}"))
        })?;

        Ok(config)
    }

    /// Validate CLI arguments before processing.
    ///
    /// Performs early validation that doesn't require file I/O.
    ///
    /// # Errors
    ///
    /// Returns an error if any validation checks fail.
    pub fn validate(&self) -> Result<()> {
        if self.inputs.is_empty() && self.manifest.is_none() {
            return Err(PdfMergeError::invalid_config("No input files specified"));
        }

        if let Some(jobs) = self.jobs
            && jobs == 0
        {
            return Err(PdfMergeError::invalid_config(
                "Number of jobs must be at least 1",
            ));
        }

        Ok(())
    }
}
