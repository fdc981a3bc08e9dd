//! Configuration module for pdfmerge.
//!
//! This module transforms CLI arguments into a validated, normalized configuration
//! that drives a merge run. It handles:
//! - Validation of argument combinations
//! - Parsing of explicit merge orders
//! - Application of defaults
//! - Derivation of the job runner settings

use anyhow::{Context, Result, bail};

use crate::PdfMergeError;
use crate::job::RunnerConfig;
use std::{path::PathBuf, str::FromStr};

/// Explicit merge order: input indices, 0-based, in the order they should
/// appear in the output.
///
/// Parsed from a comma-separated list such as `"2,0,1"`. Whether the list is
/// a permutation of the inputs is checked once the number of inputs is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOrder(Vec<usize>);

impl MergeOrder {
    /// Parse a comma-separated list of indices.
    ///
    /// # Arguments
    ///
    /// * `s` - Order string (e.g., "2,0,1")
    ///
    /// # Errors
    ///
    /// Returns an error if the string is empty or an entry is not a
    /// non-negative integer.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdfmerge::config::MergeOrder;
    ///
    /// let order = MergeOrder::parse("2, 0,1").unwrap();
    /// assert_eq!(order.as_slice(), &[2, 0, 1]);
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        if s.trim().is_empty() {
            bail!("Merge order cannot be empty");
        }

        let indices = s
            .split(',')
            .map(|part| {
                let part = part.trim();
                part.parse::<usize>()
                    .with_context(|| format!("Invalid index in merge order: '{part}'"))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self(indices))
    }

    /// The indices in merge order.
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// Take the indices.
    pub fn into_inner(self) -> Vec<usize> {
        self.0
    }
}

impl FromStr for MergeOrder {
    type Err = PdfMergeError;

    fn from_str(s: &str) -> crate::Result<Self> {
        Self::parse(s).map_err(|e| PdfMergeError::invalid_config(format!("{e:#}")))
    }
}

/// Output file overwrite behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwriteMode {
    /// Prompt the user before overwriting (default).
    #[default]
    Prompt,
    /// Always overwrite without prompting.
    Force,
    /// Never overwrite, error if file exists.
    NoClobber,
}

/// Complete configuration for a merge run.
///
/// This structure contains all settings needed to perform a merge,
/// derived and validated from CLI arguments.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Input PDF file paths (in submission order).
    pub inputs: Vec<PathBuf>,

    /// JSON manifest listing the inputs instead.
    pub manifest: Option<PathBuf>,

    /// Output PDF file path; the suggested name in the current directory
    /// when unset.
    pub output: Option<PathBuf>,

    /// Explicit merge order.
    pub order: Option<MergeOrder>,

    /// File overwrite behavior.
    pub overwrite_mode: OverwriteMode,

    /// Dry run mode - validate without creating output.
    pub dry_run: bool,

    /// Verbose output mode.
    pub verbose: bool,

    /// Quiet mode - suppress non-error output.
    pub quiet: bool,

    /// Directory for per-job staging directories.
    pub staging_dir: Option<PathBuf>,

    /// Number of input files read concurrently (None = auto-detect).
    pub jobs: Option<usize>,
}

impl Config {
    /// Returns a reference to inputs.
    pub fn inputs(&self) -> &[PathBuf] {
        self.inputs.as_ref()
    }

    /// Validate the configuration.
    ///
    /// Checks for logical inconsistencies and invalid combinations.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Neither input files nor a manifest are given, or both are
    /// - Verbose and quiet modes are both enabled
    /// - Jobs count is zero
    /// - The output path is also an input
    /// - The staging directory exists but is not a directory
    pub fn validate(&self) -> Result<()> {
        match (self.inputs.is_empty(), &self.manifest) {
            (true, None) => bail!("No input files specified"),
            (false, Some(_)) => bail!("Cannot combine input files with --manifest"),
            _ => {}
        }

        if self.verbose && self.quiet {
            bail!("Cannot use both --verbose and --quiet");
        }

        if let Some(jobs) = self.jobs
            && jobs == 0
        {
            bail!("Number of jobs must be at least 1");
        }

        if let Some(output) = &self.output
            && self.inputs.contains(output)
        {
            bail!(
                "Output file cannot be the same as an input file: {}",
                output.display()
            );
        }

        if let Some(dir) = &self.staging_dir
            && dir.exists()
            && !dir.is_dir()
        {
            bail!("Staging path is not a directory: {}", dir.display());
        }

        Ok(())
    }

    /// Get the effective number of concurrent input reads.
    ///
    /// Returns the configured job count, or the number of CPU cores if auto-detect.
    pub fn effective_jobs(&self) -> usize {
        self.jobs.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }

    /// Check if output should be displayed.
    ///
    /// Returns false if in quiet mode and not doing a dry run.
    pub fn should_print(&self) -> bool {
        !self.quiet || self.dry_run
    }

    /// Settings for the job runner.
    pub fn runner_config(&self) -> RunnerConfig {
        RunnerConfig {
            staging_root: self.staging_dir.clone(),
        }
    }

    /// Requested output name, taken from the output path.
    pub fn output_name(&self) -> Option<String> {
        self.output
            .as_ref()
            .and_then(|path| path.file_name())
            .map(|name| name.to_string_lossy().into_owned())
    }
}
