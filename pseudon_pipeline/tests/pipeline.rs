use std::path::Path;

use tempfile::TempDir;

use pseudon_core::dictionary;
use pseudon_pipeline::{
  DEIDENTIFICATION_METHOD, Pipeline, PipelineConfig, PipelineError,
  read_record_file,
};
use pseudon_rules::ScreeningConfig;

struct TestTree {
  _root: TempDir,
  config: PipelineConfig,
}

fn write_json_file(path: &Path, document: &serde_json::Value) {
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent).unwrap();
  }

  std::fs::write(path, serde_json::to_string_pretty(document).unwrap())
    .unwrap();
}

/// Builds an input tree with one releasable record, one record flagged by
/// the quarantine rules, one record with no linkage entry, one unparsable
/// record, and one hidden file.
///
fn create_test_tree() -> TestTree {
  let root = TempDir::new().unwrap();
  let input_root = root.path().join("input");

  write_json_file(
    &input_root.join("study1").join("good.json"),
    &serde_json::json!({
      "00020010": { "vr": "UI", "Value": ["1.2.840.10008.1.2.1"] },
      "00080050": { "vr": "SH", "Value": ["HOSP-2024-00123"] },
      "00080060": { "vr": "CS", "Value": ["MR"] },
      "0008103E": { "vr": "LO", "Value": ["Routine Brain"] },
      "00100010": { "vr": "PN", "Value": [{ "Alphabetic": "Doe^Jane" }] }
    }),
  );

  write_json_file(
    &input_root.join("screen_save.json"),
    &serde_json::json!({
      "00080050": { "vr": "SH", "Value": ["HOSP-2024-00456"] },
      "00080060": { "vr": "CS", "Value": ["CT"] },
      "0008103E": { "vr": "LO", "Value": ["Save Screen"] }
    }),
  );

  write_json_file(
    &input_root.join("unlinked.json"),
    &serde_json::json!({
      "00080050": { "vr": "SH", "Value": ["HOSP-2024-00789"] },
      "00080060": { "vr": "CS", "Value": ["MR"] }
    }),
  );

  std::fs::write(input_root.join("broken.json"), "not a record").unwrap();
  std::fs::write(input_root.join(".hidden.json"), "ignored").unwrap();

  write_json_file(
    &root.path().join("whitelist.json"),
    &serde_json::json!({
      "8,60": ["*"],
      "8,103e": ["Routine Brain"]
    }),
  );

  std::fs::write(
    root.path().join("links.csv"),
    "00123,S1\n99999,S9\n",
  )
  .unwrap();

  let config = PipelineConfig {
    input_root,
    clean_root: root.path().join("clean"),
    quarantine_root: root.path().join("quarantine"),
    index_path: root.path().join("index.db"),
    whitelist_path: root.path().join("whitelist.json"),
    links_path: root.path().join("links.csv"),
    links_delimiter: b',',
    links_skip_first_line: false,
    screening: ScreeningConfig::default(),
  };

  TestTree {
    _root: root,
    config,
  }
}

#[test]
fn end_to_end_test() {
  let tree = create_test_tree();

  let pipeline = Pipeline::new(tree.config.clone()).unwrap();

  let build_summary = pipeline.build_index().unwrap();
  assert_eq!(build_summary.records_indexed, 3);
  assert_eq!(build_summary.records_skipped, 1);
  assert_eq!(build_summary.reconcile.matched, 1);
  assert_eq!(build_summary.reconcile.unmatched, 1);

  let run_summary = pipeline.run().unwrap();
  assert_eq!(run_summary.released, 1);
  assert_eq!(run_summary.quarantined, 3);

  // The released record is written under its serial number with identifying
  // attributes stripped and the accession number substituted
  let released = read_record_file(
    &tree.config.clean_root.join("S1").join("good.json"),
  )
  .unwrap();

  assert_eq!(
    released.get_string(dictionary::ACCESSION_NUMBER.tag),
    Ok("S1")
  );
  assert_eq!(
    released.get_string(dictionary::PATIENT_IDENTITY_REMOVED.tag),
    Ok("YES")
  );
  assert_eq!(
    released.get_string(dictionary::DEIDENTIFICATION_METHOD.tag),
    Ok(DEIDENTIFICATION_METHOD)
  );
  assert_eq!(
    released.get_string(dictionary::SERIES_DESCRIPTION.tag),
    Ok("Routine Brain")
  );
  assert_eq!(
    released.get_string(dictionary::TRANSFER_SYNTAX_UID.tag),
    Ok("1.2.840.10008.1.2.1")
  );
  assert!(!released.has(dictionary::PATIENT_NAME.tag));

  // Quarantined records are copied unmodified, mirroring the input tree
  for file_name in ["screen_save.json", "unlinked.json", "broken.json"] {
    let quarantined = tree.config.quarantine_root.join(file_name);
    assert!(quarantined.is_file(), "{} was not quarantined", file_name);

    assert_eq!(
      std::fs::read(&quarantined).unwrap(),
      std::fs::read(tree.config.input_root.join(file_name)).unwrap()
    );
  }

  // Hidden files are ignored entirely
  assert!(
    !tree
      .config
      .quarantine_root
      .join(".hidden.json")
      .exists()
  );

  // The source tree is left in place
  assert!(
    tree
      .config
      .input_root
      .join("study1")
      .join("good.json")
      .is_file()
  );
}

#[test]
fn record_without_accession_number_is_skipped_then_quarantined_test() {
  let tree = create_test_tree();

  write_json_file(
    &tree.config.input_root.join("no_accession.json"),
    &serde_json::json!({
      "00080060": { "vr": "CS", "Value": ["MR"] }
    }),
  );

  let pipeline = Pipeline::new(tree.config.clone()).unwrap();

  // The index build skips the record rather than failing
  let build_summary = pipeline.build_index().unwrap();
  assert_eq!(build_summary.records_indexed, 3);
  assert_eq!(build_summary.records_skipped, 2);

  // The run quarantines it with a resolution failure and carries on
  let run_summary = pipeline.run().unwrap();
  assert_eq!(run_summary.released, 1);
  assert_eq!(run_summary.quarantined, 4);

  assert!(
    tree
      .config
      .quarantine_root
      .join("no_accession.json")
      .is_file()
  );
}

#[test]
fn run_is_repeatable_against_persisted_index_test() {
  let tree = create_test_tree();

  {
    let pipeline = Pipeline::new(tree.config.clone()).unwrap();
    pipeline.build_index().unwrap();
  }

  // A fresh pipeline against the same index database resolves serial
  // numbers without rebuilding
  let pipeline = Pipeline::new(tree.config.clone()).unwrap();
  let run_summary = pipeline.run().unwrap();

  assert_eq!(run_summary.released, 1);
}

#[test]
fn missing_whitelist_aborts_before_processing_test() {
  let mut tree = create_test_tree();
  tree.config.whitelist_path =
    tree.config.input_root.parent().unwrap().join("missing.json");

  assert!(matches!(
    Pipeline::new(tree.config.clone()),
    Err(PipelineError::WhitelistError(_))
  ));
}

#[test]
fn output_root_inside_input_root_is_refused_test() {
  let mut tree = create_test_tree();
  tree.config.clean_root = tree.config.input_root.join("clean");

  assert!(matches!(
    Pipeline::new(tree.config.clone()),
    Err(PipelineError::InvalidPath { .. })
  ));
}
