//! Reconciliation of an external linkage list against the accession number
//! index. Each row of the linkage list pairs an externally assigned fragment
//! of an accession number with the serial number to release it under.

use std::collections::HashSet;
use std::path::Path;

use pseudon_core::PseudonError;

use crate::{Index, IndexError};

/// An error that occurred opening or reading the linkage list. Errors on
/// individual rows are recoverable and are logged and skipped instead.
///
#[derive(Clone, Debug, PartialEq)]
pub enum LinkageError {
  FileError { when: String, details: String },
  IndexError(IndexError),
}

impl PseudonError for LinkageError {
  fn to_lines(&self, task_description: &str) -> Vec<String> {
    match self {
      LinkageError::FileError { when, details } => vec![
        format!("Linkage list error {}", task_description),
        "".to_string(),
        format!("  When: {}", when),
        format!("  Details: {}", details),
      ],

      LinkageError::IndexError(e) => e.to_lines(task_description),
    }
  }
}

/// Counters describing the outcome of a reconciliation pass.
///
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ReconcileSummary {
  /// Rows whose fragment matched an accession number and whose serial number
  /// was stored.
  pub matched: usize,

  /// Rows skipped because their fragment had already been seen in this pass.
  pub duplicates: usize,

  /// Rows whose fragment matched no accession number in the index.
  pub unmatched: usize,

  /// Rows skipped because they were malformed or carried an unusable serial
  /// number.
  pub rejected: usize,
}

/// Merges the linkage list at the given path into the index. Each row must
/// have two fields: the external accession number fragment and the serial
/// number to assign. The first occurrence of a fragment wins; later
/// occurrences are logged and skipped. Fragments are resolved to an original
/// accession number by case-sensitive substring search, which accommodates
/// formatting and prefix differences between the external system and the
/// imaging archive.
///
pub fn reconcile(
  index: &Index,
  links_path: &Path,
  delimiter: u8,
  skip_first_line: bool,
) -> Result<ReconcileSummary, LinkageError> {
  let mut reader = csv::ReaderBuilder::new()
    .delimiter(delimiter)
    .has_headers(skip_first_line)
    .flexible(true)
    .from_path(links_path)
    .map_err(|e| LinkageError::FileError {
      when: format!("Opening linkage list '{}'", links_path.display()),
      details: e.to_string(),
    })?;

  let mut summary = ReconcileSummary::default();
  let mut seen_fragments: HashSet<String> = HashSet::new();

  for row in reader.records() {
    let row = match row {
      Ok(row) => row,
      Err(e) => {
        tracing::warn!("Skipping unreadable linkage list row: {}", e);
        summary.rejected += 1;
        continue;
      }
    };

    if row.len() != 2 {
      tracing::warn!(
        "Linkage list row has {} fields where 2 were expected",
        row.len()
      );
      summary.rejected += 1;
      continue;
    }

    let fragment = &row[0];
    let serial = &row[1];

    if !seen_fragments.insert(fragment.to_string()) {
      tracing::warn!(
        "Invitation number {} appears in linkage list multiple times",
        fragment
      );
      summary.duplicates += 1;
      continue;
    }

    // Serial numbers become output directory names, so anything that could
    // escape the clean root is refused here
    if !is_safe_serial(serial) {
      tracing::warn!(
        "Serial number {:?} for invitation number {} is not usable as a \
         directory name",
        serial,
        fragment
      );
      summary.rejected += 1;
      continue;
    }

    let original = index
      .search(fragment)
      .map_err(LinkageError::IndexError)?;

    match original {
      None => {
        tracing::warn!(
          "Could not find accession number for invitation number {}",
          fragment
        );
        summary.unmatched += 1;
      }

      Some(original) => {
        let affected = index
          .update(&original, serial)
          .map_err(LinkageError::IndexError)?;

        if affected == 0 {
          tracing::warn!(
            "Accession number {} disappeared from the index before its \
             serial number could be stored",
            original
          );
          summary.unmatched += 1;
        } else {
          summary.matched += 1;
        }
      }
    }
  }

  Ok(summary)
}

fn is_safe_serial(serial: &str) -> bool {
  !serial.is_empty()
    && serial != "."
    && serial != ".."
    && !serial.contains('/')
    && !serial.contains('\\')
}
