//! The whitelist-driven attribute filter that strips a record of every
//! attribute that has not been explicitly vetted.

use pseudon_core::{DataSet, dictionary};

use crate::Whitelist;

// These file meta attributes are necessary to keep the output structurally
// valid, so they always pass the filter.
const PRESERVED_FILE_META: [&dictionary::Item; 7] = [
  &dictionary::FILE_META_INFORMATION_GROUP_LENGTH,
  &dictionary::FILE_META_INFORMATION_VERSION,
  &dictionary::MEDIA_STORAGE_SOP_CLASS_UID,
  &dictionary::MEDIA_STORAGE_SOP_INSTANCE_UID,
  &dictionary::TRANSFER_SYNTAX_UID,
  &dictionary::IMPLEMENTATION_CLASS_UID,
  &dictionary::IMPLEMENTATION_VERSION_NAME,
];

/// Filters a data set in place, deleting every attribute that is neither the
/// accession number, a preserved file meta attribute, nor allowed by the
/// whitelist. The accession number is retained here regardless of whitelist
/// status because it is replaced separately by serial number substitution.
///
pub fn filter_data_set(data_set: &mut DataSet, whitelist: &Whitelist) {
  // The tag set is snapshotted up front as the data set is mutated during
  // the walk
  for tag in data_set.tags() {
    if tag == dictionary::ACCESSION_NUMBER.tag {
      continue;
    }

    if PRESERVED_FILE_META.iter().any(|item| item.tag == tag) {
      continue;
    }

    let allowed = match data_set.get(tag) {
      Some(value) => whitelist.allows(tag, value),
      None => true,
    };

    if !allowed {
      data_set.delete(tag);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  use pseudon_core::{DataElementValue, ValueRepresentation};

  fn test_whitelist() -> Whitelist {
    Whitelist::parse(&serde_json::json!({
      "8,60": ["*"],
      "8,103e": ["Routine Brain"]
    }))
    .unwrap()
  }

  fn test_data_set() -> DataSet {
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
        "Routine Brain",
      ),
    );
    data_set.insert(
      dictionary::PATIENT_NAME.tag,
      DataElementValue::new_string(
        ValueRepresentation::PersonName,
        "Doe^Jane",
      ),
    );

    data_set
  }

  #[test]
  fn removes_attributes_not_on_whitelist_test() {
    let whitelist = test_whitelist();
    let mut data_set = test_data_set();

    filter_data_set(&mut data_set, &whitelist);

    assert!(!data_set.has(dictionary::PATIENT_NAME.tag));
    assert!(data_set.has(dictionary::MODALITY.tag));
    assert!(data_set.has(dictionary::SERIES_DESCRIPTION.tag));
  }

  #[test]
  fn removes_whitelisted_tag_with_disallowed_value_test() {
    let whitelist = test_whitelist();
    let mut data_set = test_data_set();

    data_set.insert(
      dictionary::SERIES_DESCRIPTION.tag,
      DataElementValue::new_string(
        ValueRepresentation::LongString,
        "Sagittal Spine",
      ),
    );

    filter_data_set(&mut data_set, &whitelist);

    assert!(!data_set.has(dictionary::SERIES_DESCRIPTION.tag));
  }

  #[test]
  fn preserves_accession_number_and_file_meta_test() {
    let whitelist = test_whitelist();
    let mut data_set = test_data_set();

    filter_data_set(&mut data_set, &whitelist);

    assert_eq!(
      data_set.get_string(dictionary::ACCESSION_NUMBER.tag),
      Ok("A1")
    );
    assert_eq!(
      data_set.get_string(dictionary::TRANSFER_SYNTAX_UID.tag),
      Ok("1.2.840.10008.1.2.1")
    );
  }

  #[test]
  fn filter_is_idempotent_test() {
    let whitelist = test_whitelist();
    let mut data_set = test_data_set();

    filter_data_set(&mut data_set, &whitelist);
    let filtered_once = data_set.clone();

    filter_data_set(&mut data_set, &whitelist);

    assert_eq!(data_set, filtered_once);
  }
}
