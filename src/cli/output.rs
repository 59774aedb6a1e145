//! Human-readable console output.
//!
//! Progress lines only; nothing here is a machine-readable contract.

use std::fmt::Write as FmtWrite;

use console::style;

/// Counters accumulated over a run.
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    pub jobs: u64,
    pub opportunities: u64,
    pub batches: u64,
    pub vectors_upserted: u64,
    pub duration_ms: u64,
}

impl RunStats {
    pub fn total_records(&self) -> u64 {
        self.jobs + self.opportunities
    }
}

/// Styled status line, e.g. index creation.
pub fn status(message: &str) {
    println!("{} {}", style(">").cyan().bold(), message);
}

/// Per-source record counts, shown with --verbose or --validate-only.
pub fn source_counts(jobs: u64, opportunities: u64) {
    println!("  tmcf_jobs:          {} records", jobs);
    println!("  uncf_opportunities: {} records", opportunities);
}

/// Validation-only summary.
pub fn validation_summary(stats: &RunStats) {
    source_counts(stats.jobs, stats.opportunities);
    println!(
        "{} {} records ready for indexing",
        style("Validation successful:").green().bold(),
        stats.total_records()
    );
}

/// Final completion message.
pub fn completion_summary(index: &str, stats: &RunStats) -> String {
    let mut output = String::new();
    writeln!(
        output,
        "{}",
        style("All records have been vectorized and upserted.").green().bold()
    )
    .unwrap();
    writeln!(output, "Index:    {}", index).unwrap();
    writeln!(output, "Records:  {}", stats.total_records()).unwrap();
    writeln!(output, "Batches:  {}", stats.batches).unwrap();
    writeln!(output, "Vectors:  {}", stats.vectors_upserted).unwrap();
    writeln!(output, "Duration: {}ms", stats.duration_ms).unwrap();
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_records() {
        let stats = RunStats {
            jobs: 3,
            opportunities: 2,
            ..Default::default()
        };
        assert_eq!(stats.total_records(), 5);
    }

    #[test]
    fn test_completion_summary_contents() {
        let stats = RunStats {
            jobs: 150,
            opportunities: 100,
            batches: 3,
            vectors_upserted: 250,
            duration_ms: 1200,
        };
        let summary = completion_summary("combined-index", &stats);
        assert!(summary.contains("combined-index"));
        assert!(summary.contains("Records:  250"));
        assert!(summary.contains("Batches:  3"));
    }
}
