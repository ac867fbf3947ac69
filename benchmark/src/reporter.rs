// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! JSON report persistence.
//!
//! Saves reports to timestamped JSON files so runs can be compared later.

use crate::metrics::Report;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during report persistence.
#[derive(Debug, Error)]
pub enum ReporterError {
    #[error("Report I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize report: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// JSON reporter for benchmark runs.
pub struct JsonReporter {
    /// Output directory for report files
    output_dir: PathBuf,
}

impl JsonReporter {
    /// Create a new JSON reporter with the specified output directory.
    pub fn new(output_dir: impl AsRef<Path>) -> Result<Self, ReporterError> {
        let output_dir = output_dir.as_ref().to_path_buf();
        fs::create_dir_all(&output_dir)?;
        Ok(Self { output_dir })
    }

    /// Save a report to a JSON file named after the run timestamp and id.
    ///
    /// Returns the path to the created file.
    pub fn save(&self, report: &Report) -> Result<PathBuf, ReporterError> {
        let timestamp = report.timestamp.format("%Y-%m-%dT%H-%M-%SZ");
        let run = report.run_id.simple().to_string();
        let filename = format!("cipherbench_{}_{}.json", timestamp, &run[..8]);
        let filepath = self.output_dir.join(&filename);

        let file = File::create(&filepath)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, report)?;

        tracing::debug!(path = %filepath.display(), "Report saved");
        Ok(filepath)
    }

    /// Load an existing report from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Report, ReporterError> {
        let file = File::open(path)?;
        let report = serde_json::from_reader(file)?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{AggregateResult, ReportContext};
    use cipherbench_core::{
        Algorithm, BenchError, BenchmarkName, BenchmarkSpec, IterationCount, Operation, Payload,
        PayloadSize,
    };
    use tempfile::TempDir;

    fn report() -> Report {
        let payload = Payload::synthetic(PayloadSize::new(64).unwrap());
        let mut report = Report::new(ReportContext::new("test", &payload));
        let spec = BenchmarkSpec::new(
            BenchmarkName::new("rsa2048-keygen").unwrap(),
            Algorithm::Rsa2048,
            Operation::KeyGen,
            PayloadSize::new(0).unwrap(),
            IterationCount::new(1).unwrap(),
            0,
        )
        .unwrap();
        let err = BenchError::EmptySeries {
            name: spec.name().clone(),
        };
        report.add_result(AggregateResult::failed(spec, &err));
        report
    }

    #[test]
    fn test_reporter_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let reporter = JsonReporter::new(temp_dir.path()).unwrap();

        let report = report();
        let path = reporter.save(&report).unwrap();
        assert!(path.exists());

        let loaded = JsonReporter::load(&path).unwrap();
        assert_eq!(loaded.run_id, report.run_id);
        assert_eq!(loaded.results.len(), 1);
        assert_eq!(loaded.results[0].spec.name().as_str(), "rsa2048-keygen");
        assert_eq!(loaded.payload, report.payload);
        assert_eq!(loaded.exit_code(), 1);
    }

    #[test]
    fn test_load_missing_file() {
        let result = JsonReporter::load("/nonexistent/report.json");
        assert!(matches!(result, Err(ReporterError::Io(_))));
    }
}
