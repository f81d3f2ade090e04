//! Persisted job state for resumable report writing.
//!
//! Each job+step pair owns a small state record with an explicit state
//! machine {NotStarted, HeaderWritten, Complete}. The writer reads the state
//! at open time and advances it at the exact point the header is emitted, so
//! an interrupted job can append to its report without duplicating the
//! header.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StateError {
    #[error("Failed to read job state: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse job state: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Where a report-writing step currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportPhase {
    #[default]
    NotStarted,
    HeaderWritten,
    Complete,
}

/// File-backed key-value record of job step phases
#[derive(Debug)]
pub struct JobState {
    path: PathBuf,
    phases: BTreeMap<String, ReportPhase>,
}

impl JobState {
    /// Load the state file, starting empty if it does not exist yet
    ///
    /// # Errors
    ///
    /// Returns `StateError` if an existing file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, StateError> {
        let phases = if path.exists() {
            serde_json::from_str(&std::fs::read_to_string(path)?)?
        } else {
            BTreeMap::new()
        };
        Ok(Self {
            path: path.to_path_buf(),
            phases,
        })
    }

    /// The phase of a job step, `NotStarted` when never recorded
    #[must_use]
    pub fn phase(&self, step: &str) -> ReportPhase {
        self.phases.get(step).copied().unwrap_or_default()
    }

    /// Record a phase and persist immediately
    ///
    /// # Errors
    ///
    /// Returns `StateError` if the state file cannot be written.
    pub fn advance(&mut self, step: &str, phase: ReportPhase) -> Result<(), StateError> {
        self.phases.insert(step.to_string(), phase);
        std::fs::write(&self.path, serde_json::to_string_pretty(&self.phases)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_starts_not_started() {
        let dir = tempfile::tempdir().unwrap();
        let state = JobState::load(&dir.path().join("state.json")).unwrap();
        assert_eq!(state.phase("job1/report"), ReportPhase::NotStarted);
    }

    #[test]
    fn test_advance_persists_across_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let mut state = JobState::load(&path).unwrap();
        state.advance("job1/report", ReportPhase::HeaderWritten).unwrap();

        let reloaded = JobState::load(&path).unwrap();
        assert_eq!(reloaded.phase("job1/report"), ReportPhase::HeaderWritten);
        assert_eq!(reloaded.phase("job2/report"), ReportPhase::NotStarted);
    }
}
