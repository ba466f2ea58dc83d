//! The error type for fatal pipeline failures. Per-record failures are not
//! errors; they are quarantine outcomes carried by
//! [`crate::RecordDisposition`].

use pseudon_core::PseudonError;
use pseudon_index::{IndexError, LinkageError};
use pseudon_rules::WhitelistError;

/// An error that aborts an entire pipeline run.
///
#[derive(Clone, Debug, PartialEq)]
pub enum PipelineError {
  /// A file could not be read or written at the filesystem level.
  FileError { when: String, details: String },

  /// The configured directory roots are unusable, e.g. an output root that
  /// sits inside the input root, or a destination that would escape its
  /// root.
  InvalidPath { details: String },

  /// The whitelist could not be loaded. Raised before any record is
  /// processed.
  WhitelistError(WhitelistError),

  /// The accession number index failed.
  IndexError(IndexError),

  /// The linkage list could not be opened during reconciliation.
  LinkageError(LinkageError),
}

impl PseudonError for PipelineError {
  fn to_lines(&self, task_description: &str) -> Vec<String> {
    match self {
      PipelineError::FileError { when, details } => vec![
        format!("File error {}", task_description),
        "".to_string(),
        format!("  When: {}", when),
        format!("  Details: {}", details),
      ],

      PipelineError::InvalidPath { details } => vec![
        format!("Invalid path {}", task_description),
        "".to_string(),
        format!("  Details: {}", details),
      ],

      PipelineError::WhitelistError(e) => e.to_lines(task_description),
      PipelineError::IndexError(e) => e.to_lines(task_description),
      PipelineError::LinkageError(e) => e.to_lines(task_description),
    }
  }
}
