//! Output formatting and display for pdfmerge.
//!
//! This module handles user-facing output of the command-line front end:
//! status messages, merge plans for dry runs, and merge summaries.
//!
//! # Examples
//!
//! ```no_run
//! use pdfmerge::output::OutputFormatter;
//! use pdfmerge::config::Config;
//!
//! # fn example(config: Config) {
//! let formatter = OutputFormatter::from_config(&config);
//! formatter.info("Starting merge");
//! formatter.success("Merge completed");
//! # }
//! ```

pub mod formatter;

pub use formatter::{MessageLevel, OutputFormatter};

use crate::io::ReadStatistics;
use crate::merge::MergeStatistics;
use crate::utils::format_file_size;
use crate::validation::MergePlan;

/// One line describing a planned source.
pub fn describe_planned_source(name: &str, page_count: usize) -> String {
    match page_count {
        0 => format!("{name} (no pages, skipped)"),
        1 => format!("{name} (1 page)"),
        n => format!("{name} ({n} pages)"),
    }
}

/// Display the merge a dry run would perform.
pub fn display_plan(formatter: &OutputFormatter, plan: &MergePlan) {
    formatter.section("Merge plan:");
    for (index, source) in plan.sources.iter().enumerate() {
        formatter.list_item(
            index + 1,
            &describe_planned_source(&source.name, source.page_count),
        );
    }

    if plan.files_skipped() > 0 {
        formatter.warning(&format!(
            "{} file(s) have no pages and will be skipped",
            plan.files_skipped()
        ));
    }

    formatter.info(&format!(
        "Would merge {} file(s), {} page(s) into {}",
        plan.files_merged(),
        plan.total_pages,
        plan.output_name
    ));
}

/// Display read statistics in verbose mode.
pub fn display_read_statistics(formatter: &OutputFormatter, stats: &ReadStatistics) {
    formatter.debug(&format!(
        "Read {} file(s) in {:.2}s: {}",
        stats.files_read,
        stats.total_time.as_secs_f64(),
        stats.format_total_size()
    ));
}

/// Display a merge summary.
pub fn display_merge_statistics(formatter: &OutputFormatter, stats: &MergeStatistics) {
    if stats.files_skipped > 0 {
        formatter.warning(&format!(
            "Skipped {} file(s) with no pages",
            stats.files_skipped
        ));
    }

    formatter.detail("Files merged", &stats.files_merged.to_string());
    formatter.detail("Total pages", &stats.total_pages.to_string());
    formatter.detail("Output size", &format_file_size(stats.output_size));
    formatter.detail(
        "Merge time",
        &format!("{:.2}s", stats.merge_time.as_secs_f64()),
    );
}
