//! The pipeline orchestrator. Runs the two batch phases over the input tree:
//! building and reconciling the accession number index, then screening,
//! filtering, substituting, and relocating every record.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use pseudon_core::{DataElementValue, DataSet, dictionary};
use pseudon_index::{Index, ReconcileSummary, reconcile};
use pseudon_rules::{
  QuarantineReason, ScreeningConfig, Whitelist, check_data_set,
  filter_data_set,
};

use crate::record_io::{
  RecordReadError, read_record_file, write_record_file,
};
use crate::relocation::{checked_join, copy_into_quarantine, validate_roots};
use crate::PipelineError;

/// The description written to *'(0012,0063) De-identification Method'* on
/// every released record.
pub const DEIDENTIFICATION_METHOD: &str =
  "Pseudonymized by accession number substitution and attribute whitelisting";

/// Why a record was diverted to quarantine rather than released.
///
#[derive(Clone, Debug, PartialEq)]
pub enum QuarantineCause {
  /// A quarantine rule matched the record's attribute values.
  Rule(QuarantineReason),

  /// The record file's content could not be parsed.
  Unreadable { details: String },

  /// The record's accession number could not be resolved to a serial number.
  Resolution { details: String },
}

impl std::fmt::Display for QuarantineCause {
  fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
    match self {
      Self::Rule(reason) => write!(f, "{}", reason),
      Self::Unreadable { details } => {
        write!(f, "could not read record: {}", details)
      }
      Self::Resolution { details } => {
        write!(f, "no serial number resolved: {}", details)
      }
    }
  }
}

/// The terminal state of one record's pass through the pipeline: released
/// into the clean tree under a serial number, or quarantined with a cause.
///
#[derive(Clone, Debug, PartialEq)]
pub enum RecordDisposition {
  Released { serial: String },
  Quarantined { cause: QuarantineCause },
}

/// Counters describing an index build phase.
///
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct IndexBuildSummary {
  /// Records whose accession number was registered in the index.
  pub records_indexed: usize,

  /// Records skipped because they could not be parsed or carried no usable
  /// accession number.
  pub records_skipped: usize,

  /// The outcome of the linkage list reconciliation that followed.
  pub reconcile: ReconcileSummary,
}

/// Counters describing a run phase.
///
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RunSummary {
  /// Records filtered, substituted, and written to the clean tree.
  pub released: usize,

  /// Records copied to the quarantine tree instead.
  pub quarantined: usize,
}

/// Configuration for a [`Pipeline`].
///
#[derive(Clone, Debug)]
pub struct PipelineConfig {
  /// The root directory holding identified input records.
  pub input_root: PathBuf,

  /// The root directory that released records are written into, under one
  /// subdirectory per serial number.
  pub clean_root: PathBuf,

  /// The root directory that quarantined records are copied into, mirroring
  /// the input tree's structure.
  pub quarantine_root: PathBuf,

  /// The path of the SQLite database holding the accession number index.
  pub index_path: PathBuf,

  /// The path of the whitelist JSON document.
  pub whitelist_path: PathBuf,

  /// The path of the linkage list pairing external accession number
  /// fragments with serial numbers.
  pub links_path: PathBuf,

  /// The field delimiter used by the linkage list.
  pub links_delimiter: u8,

  /// Whether the linkage list's first line is a header to skip.
  pub links_skip_first_line: bool,

  /// Configuration for the quarantine rule engine.
  pub screening: ScreeningConfig,
}

/// The pseudonymization pipeline. Constructing one validates the configured
/// roots, loads the whitelist, and opens the accession number index; any
/// failure there aborts before a single record is touched.
///
/// Per-record failures during the phases never abort a run. Fatal filesystem
/// errors do, and the index connection is released when the pipeline is
/// dropped.
///
pub struct Pipeline {
  config: PipelineConfig,
  whitelist: Whitelist,
  index: Index,
}

impl Pipeline {
  /// Creates a new pipeline from the given configuration.
  ///
  pub fn new(config: PipelineConfig) -> Result<Self, PipelineError> {
    validate_roots(
      &config.input_root,
      &config.clean_root,
      &config.quarantine_root,
    )?;

    let whitelist = Whitelist::from_path(&config.whitelist_path)
      .map_err(PipelineError::WhitelistError)?;

    let index =
      Index::open(&config.index_path).map_err(PipelineError::IndexError)?;

    Ok(Self {
      config,
      whitelist,
      index,
    })
  }

  /// The index build phase: registers the accession number of every readable
  /// record under the input root, then merges the linkage list into the
  /// index. Unreadable records are skipped without quarantining as the run
  /// phase will see them again.
  ///
  pub fn build_index(&self) -> Result<IndexBuildSummary, PipelineError> {
    let mut summary = IndexBuildSummary::default();

    for (source_path, _file_name) in self.walk_input_files()? {
      let data_set = match read_record_file(&source_path) {
        Ok(data_set) => data_set,

        Err(RecordReadError::FileError { when, details }) => {
          return Err(PipelineError::FileError { when, details });
        }

        Err(RecordReadError::ParseError { details }) => {
          tracing::debug!(
            "Skipping unreadable record '{}' during index build: {}",
            source_path.display(),
            details
          );
          summary.records_skipped += 1;
          continue;
        }
      };

      match data_set.get_string(dictionary::ACCESSION_NUMBER.tag) {
        Ok(accession_number) => {
          self
            .index
            .insert(accession_number)
            .map_err(PipelineError::IndexError)?;
          summary.records_indexed += 1;
        }

        Err(e) => {
          tracing::warn!(
            "Skipping record '{}' without a usable accession number: {}",
            source_path.display(),
            e
          );
          summary.records_skipped += 1;
        }
      }
    }

    summary.reconcile = reconcile(
      &self.index,
      &self.config.links_path,
      self.config.links_delimiter,
      self.config.links_skip_first_line,
    )
    .map_err(PipelineError::LinkageError)?;

    tracing::info!(
      "Index build complete: {} records indexed, {} skipped, {} linkage \
       rows matched, {} duplicate, {} unmatched, {} rejected",
      summary.records_indexed,
      summary.records_skipped,
      summary.reconcile.matched,
      summary.reconcile.duplicates,
      summary.reconcile.unmatched,
      summary.reconcile.rejected
    );

    Ok(summary)
  }

  /// The run phase: screens, filters, substitutes, and relocates every
  /// record under the input root. Records that fail screening, parsing, or
  /// serial number resolution are copied to the quarantine tree and the run
  /// continues; filesystem-level read failures and all write failures abort
  /// the run.
  ///
  pub fn run(&self) -> Result<RunSummary, PipelineError> {
    let mut summary = RunSummary::default();

    for (source_path, file_name) in self.walk_input_files()? {
      let mut data_set = match read_record_file(&source_path) {
        Ok(data_set) => data_set,

        Err(RecordReadError::FileError { when, details }) => {
          return Err(PipelineError::FileError { when, details });
        }

        Err(RecordReadError::ParseError { details }) => {
          self.quarantine_record(
            &source_path,
            &QuarantineCause::Unreadable { details },
          )?;
          summary.quarantined += 1;
          continue;
        }
      };

      match self.process_data_set(&mut data_set)? {
        RecordDisposition::Quarantined { cause } => {
          self.quarantine_record(&source_path, &cause)?;
          summary.quarantined += 1;
        }

        RecordDisposition::Released { serial } => {
          let destination = checked_join(
            &self.config.clean_root,
            &[serial.as_str(), file_name.as_str()],
          )?;

          if let Some(parent) = destination.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
              PipelineError::FileError {
                when: format!(
                  "Creating clean output directory '{}'",
                  parent.display()
                ),
                details: e.to_string(),
              }
            })?;
          }

          write_record_file(&data_set, &destination).map_err(|e| match e {
            RecordReadError::FileError { when, details } => {
              PipelineError::FileError { when, details }
            }
            RecordReadError::ParseError { details } => {
              PipelineError::FileError {
                when: format!("Writing '{}'", destination.display()),
                details,
              }
            }
          })?;

          tracing::info!(
            "Released '{}' as '{}'",
            source_path.display(),
            destination.display()
          );
          summary.released += 1;
        }
      }
    }

    tracing::info!(
      "Run complete: {} records released, {} quarantined",
      summary.released,
      summary.quarantined
    );

    Ok(summary)
  }

  /// Takes one parsed record through quarantine checking, attribute
  /// filtering, and accession number substitution, mutating it in place.
  /// Returns the record's disposition; only index failures are errors.
  ///
  pub fn process_data_set(
    &self,
    data_set: &mut DataSet,
  ) -> Result<RecordDisposition, PipelineError> {
    if let Some(reason) = check_data_set(data_set, &self.config.screening) {
      return Ok(RecordDisposition::Quarantined {
        cause: QuarantineCause::Rule(reason),
      });
    }

    filter_data_set(data_set, &self.whitelist);

    let accession_number =
      match data_set.get_string(dictionary::ACCESSION_NUMBER.tag) {
        Ok(accession_number) => accession_number.to_string(),
        Err(e) => {
          return Ok(RecordDisposition::Quarantined {
            cause: QuarantineCause::Resolution {
              details: e.to_string(),
            },
          });
        }
      };

    let serial = match self
      .index
      .get(&accession_number)
      .map_err(PipelineError::IndexError)?
    {
      Some(serial) => serial,
      None => {
        return Ok(RecordDisposition::Quarantined {
          cause: QuarantineCause::Resolution {
            details: format!(
              "No serial number for accession number {}",
              accession_number
            ),
          },
        });
      }
    };

    data_set.insert(
      dictionary::ACCESSION_NUMBER.tag,
      DataElementValue::new_string(dictionary::ACCESSION_NUMBER.vr, &serial),
    );
    data_set.insert(
      dictionary::PATIENT_IDENTITY_REMOVED.tag,
      DataElementValue::new_string(
        dictionary::PATIENT_IDENTITY_REMOVED.vr,
        "YES",
      ),
    );
    data_set.insert(
      dictionary::DEIDENTIFICATION_METHOD.tag,
      DataElementValue::new_string(
        dictionary::DEIDENTIFICATION_METHOD.vr,
        DEIDENTIFICATION_METHOD,
      ),
    );

    Ok(RecordDisposition::Released { serial })
  }

  /// Returns the non-hidden files under the input root together with their
  /// file names, in a stable order. Filesystem errors during the walk are
  /// fatal.
  ///
  fn walk_input_files(
    &self,
  ) -> Result<Vec<(PathBuf, String)>, PipelineError> {
    let mut files = vec![];

    for entry in WalkDir::new(&self.config.input_root).sort_by_file_name() {
      let entry = entry.map_err(|e| PipelineError::FileError {
        when: format!(
          "Walking input directory '{}'",
          self.config.input_root.display()
        ),
        details: e.to_string(),
      })?;

      if !entry.file_type().is_file() {
        continue;
      }

      let file_name = match entry.file_name().to_str() {
        Some(file_name) => file_name.to_string(),
        None => {
          return Err(PipelineError::InvalidPath {
            details: format!(
              "File '{}' has a non-UTF-8 name",
              entry.path().display()
            ),
          });
        }
      };

      if file_name.starts_with('.') {
        continue;
      }

      files.push((entry.path().to_path_buf(), file_name));
    }

    Ok(files)
  }

  fn quarantine_record(
    &self,
    source_path: &Path,
    cause: &QuarantineCause,
  ) -> Result<(), PipelineError> {
    tracing::info!(
      "'{}' will be moved to the quarantine directory due to: {}",
      source_path.display(),
      cause
    );

    copy_into_quarantine(
      source_path,
      &self.config.input_root,
      &self.config.quarantine_root,
    )?;

    Ok(())
  }
}
