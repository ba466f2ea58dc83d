#[cfg(test)]
mod tests {
  use std::path::Path;

  use walkdir::WalkDir;

  use crate::core::{
    DataElementValue, DataSet, ValueRepresentation, dictionary,
  };
  use crate::index::Index;
  use crate::pipeline::{Pipeline, PipelineConfig};
  use crate::rules::{ScreeningConfig, Whitelist, filter_data_set};

  fn write_record(path: &Path, document: &serde_json::Value) {
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }

    std::fs::write(path, serde_json::to_string(document).unwrap()).unwrap();
  }

  /// Every attribute retained by the filter must be the accession number, a
  /// preserved file meta attribute, or allowed by the whitelist for its
  /// exact value.
  ///
  #[test]
  fn filter_retains_only_vetted_attributes() {
    let whitelist = Whitelist::parse(&serde_json::json!({
      "8,60": ["*"],
      "8,103e": ["Routine Brain", "T1 Axial"]
    }))
    .unwrap();

    let mut data_set = DataSet::new();
    data_set.insert(
      dictionary::TRANSFER_SYNTAX_UID.tag,
      DataElementValue::new_string(
        ValueRepresentation::UniqueIdentifier,
        "1.2.840.10008.1.2.1",
      ),
    );
    data_set.insert(
      dictionary::ACCESSION_NUMBER.tag,
      DataElementValue::new_string(ValueRepresentation::ShortString, "A1"),
    );
    data_set.insert(
      dictionary::MODALITY.tag,
      DataElementValue::new_string(ValueRepresentation::CodeString, "MR"),
    );
    data_set.insert(
      dictionary::SERIES_DESCRIPTION.tag,
      DataElementValue::new_string(
        ValueRepresentation::LongString,
        "Clinical Notes",
      ),
    );
    data_set.insert(
      dictionary::PATIENT_ID.tag,
      DataElementValue::new_string(ValueRepresentation::LongString, "P123"),
    );

    filter_data_set(&mut data_set, &whitelist);

    assert_eq!(
      data_set.tags(),
      vec![
        dictionary::TRANSFER_SYNTAX_UID.tag,
        dictionary::ACCESSION_NUMBER.tag,
        dictionary::MODALITY.tag,
      ]
    );
  }

  /// An end-to-end pass over a small input tree through the public pipeline
  /// API, checking the shape of both output trees.
  ///
  #[test]
  fn pipeline_produces_clean_and_quarantine_trees() {
    let root = tempfile::TempDir::new().unwrap();
    let input_root = root.path().join("input");

    write_record(
      &input_root.join("a").join("brain.json"),
      &serde_json::json!({
        "00080050": { "vr": "SH", "Value": ["HOSP-1"] },
        "00080060": { "vr": "CS", "Value": ["MR"] }
      }),
    );

    // Ultrasound is not in the default allowed modalities
    write_record(
      &input_root.join("b").join("ultrasound.json"),
      &serde_json::json!({
        "00080050": { "vr": "SH", "Value": ["HOSP-2"] },
        "00080060": { "vr": "CS", "Value": ["US"] }
      }),
    );

    std::fs::write(
      root.path().join("whitelist.json"),
      serde_json::to_string(&serde_json::json!({ "8,60": ["*"] })).unwrap(),
    )
    .unwrap();

    std::fs::write(root.path().join("links.csv"), "HOSP-1,S100\n").unwrap();

    let config = PipelineConfig {
      input_root: input_root.clone(),
      clean_root: root.path().join("clean"),
      quarantine_root: root.path().join("quarantine"),
      index_path: root.path().join("index.db"),
      whitelist_path: root.path().join("whitelist.json"),
      links_path: root.path().join("links.csv"),
      links_delimiter: b',',
      links_skip_first_line: false,
      screening: ScreeningConfig::default(),
    };

    let pipeline = Pipeline::new(config.clone()).unwrap();
    pipeline.build_index().unwrap();
    let summary = pipeline.run().unwrap();

    assert_eq!(summary.released, 1);
    assert_eq!(summary.quarantined, 1);

    let clean_files: Vec<_> = WalkDir::new(&config.clean_root)
      .into_iter()
      .filter_map(|entry| entry.ok())
      .filter(|entry| entry.file_type().is_file())
      .map(|entry| {
        entry
          .path()
          .strip_prefix(&config.clean_root)
          .unwrap()
          .to_path_buf()
      })
      .collect();

    assert_eq!(clean_files, vec![Path::new("S100").join("brain.json")]);

    assert!(
      config
        .quarantine_root
        .join("b")
        .join("ultrasound.json")
        .is_file()
    );

    // The assigned serial number is also visible through the index
    let index = Index::open(&config.index_path).unwrap();
    assert_eq!(index.get("HOSP-1"), Ok(Some("S100".to_string())));
    assert_eq!(index.get("HOSP-2"), Ok(None));
  }
}
