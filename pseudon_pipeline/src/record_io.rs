//! Reading and writing of imaging records stored in the DICOM JSON model,
//! where each record file is an object mapping 8-digit hex tags to
//! `{"vr": …, "Value": […]}` entries.
//!
//! Ref: PS3.18 F.

use std::path::Path;

use pseudon_core::{
  DataElementTag, DataElementValue, DataSet, PseudonError, ValueData,
  ValueRepresentation,
};

/// An error that occurred reading a record file. File errors are fatal to a
/// run, whereas parse errors are structural and quarantine or skip only the
/// affected record.
///
#[derive(Clone, Debug, PartialEq)]
pub enum RecordReadError {
  /// The record file could not be read at the filesystem level.
  FileError { when: String, details: String },

  /// The record file's content is not a valid DICOM JSON record.
  ParseError { details: String },
}

impl PseudonError for RecordReadError {
  fn to_lines(&self, task_description: &str) -> Vec<String> {
    match self {
      RecordReadError::FileError { when, details } => vec![
        format!("Record file error {}", task_description),
        "".to_string(),
        format!("  When: {}", when),
        format!("  Details: {}", details),
      ],

      RecordReadError::ParseError { details } => vec![
        format!("Record parse error {}", task_description),
        "".to_string(),
        format!("  Details: {}", details),
      ],
    }
  }
}

/// Reads the record file at the given path into a data set.
///
pub fn read_record_file(path: &Path) -> Result<DataSet, RecordReadError> {
  let content = std::fs::read_to_string(path).map_err(|e| {
    RecordReadError::FileError {
      when: format!("Reading record file '{}'", path.display()),
      details: e.to_string(),
    }
  })?;

  let document: serde_json::Value =
    serde_json::from_str(&content).map_err(|e| RecordReadError::ParseError {
      details: format!("Invalid JSON: {}", e),
    })?;

  parse_record(&document)
}

/// Parses an already-deserialized DICOM JSON document into a data set.
///
pub fn parse_record(
  document: &serde_json::Value,
) -> Result<DataSet, RecordReadError> {
  let entries =
    document
      .as_object()
      .ok_or_else(|| RecordReadError::ParseError {
        details: "Expected a JSON object at the top level".to_string(),
      })?;

  let mut data_set = DataSet::new();

  for (key, entry) in entries {
    let tag = DataElementTag::from_hex_string(key)
      .map_err(|details| RecordReadError::ParseError { details })?;

    let value = parse_data_element(key, entry)?;

    data_set.insert(tag, value);
  }

  Ok(data_set)
}

fn parse_data_element(
  key: &str,
  entry: &serde_json::Value,
) -> Result<DataElementValue, RecordReadError> {
  let entry = entry
    .as_object()
    .ok_or_else(|| RecordReadError::ParseError {
      details: format!("Expected an object for data element {:?}", key),
    })?;

  let vr = entry
    .get("vr")
    .and_then(|vr| vr.as_str())
    .ok_or_else(|| RecordReadError::ParseError {
      details: format!("Missing vr for data element {:?}", key),
    })?;

  let vr = ValueRepresentation::from_abbreviation(vr)
    .map_err(|details| RecordReadError::ParseError { details })?;

  if let Some(inline_binary) = entry.get("InlineBinary") {
    let base64 =
      inline_binary
        .as_str()
        .ok_or_else(|| RecordReadError::ParseError {
          details: format!(
            "Expected a string InlineBinary for data element {:?}",
            key
          ),
        })?;

    return Ok(DataElementValue::new_inline_binary(vr, base64));
  }

  let members = match entry.get("Value") {
    Some(members) => {
      members
        .as_array()
        .ok_or_else(|| RecordReadError::ParseError {
          details: format!("Expected a Value array for data element {:?}", key),
        })?
    }

    // A data element with no content decodes to an empty value
    None => return Ok(DataElementValue::new_strings(vr, vec![])),
  };

  if members.iter().all(|member| member.as_i64().is_some()) {
    let values = members
      .iter()
      .filter_map(|member| member.as_i64())
      .collect();

    return Ok(DataElementValue::new_ints(vr, values));
  }

  if members.iter().all(|member| member.is_number()) {
    let values = members
      .iter()
      .filter_map(|member| member.as_f64())
      .collect();

    return Ok(DataElementValue::new_floats(vr, values));
  }

  let mut values = Vec::with_capacity(members.len());
  for member in members {
    values.push(parse_string_member(key, member)?);
  }

  Ok(DataElementValue::new_strings(vr, values))
}

// String value members are strings, nulls (which decode to empty strings), or
// person name objects carrying an Alphabetic representation
fn parse_string_member(
  key: &str,
  member: &serde_json::Value,
) -> Result<String, RecordReadError> {
  match member {
    serde_json::Value::String(s) => Ok(s.clone()),

    serde_json::Value::Null => Ok(String::new()),

    serde_json::Value::Object(object) => match object.get("Alphabetic") {
      Some(serde_json::Value::String(s)) => Ok(s.clone()),
      _ => Err(RecordReadError::ParseError {
        details: format!(
          "Expected an Alphabetic person name for data element {:?}",
          key
        ),
      }),
    },

    _ => Err(RecordReadError::ParseError {
      details: format!("Invalid value member for data element {:?}", key),
    }),
  }
}

/// Serializes a data set to the DICOM JSON model.
///
pub fn serialize_record(data_set: &DataSet) -> serde_json::Value {
  let mut document = serde_json::Map::new();

  for (tag, value) in data_set.iter() {
    let mut entry = serde_json::Map::new();

    entry.insert(
      "vr".to_string(),
      serde_json::Value::String(
        value.value_representation().abbreviation().to_string(),
      ),
    );

    match value.data() {
      ValueData::Strings(values) => {
        if !values.is_empty() {
          let members = values
            .iter()
            .map(|s| serialize_string_member(value.value_representation(), s))
            .collect();

          entry.insert("Value".to_string(), serde_json::Value::Array(members));
        }
      }

      ValueData::Ints(values) => {
        if !values.is_empty() {
          let members = values.iter().map(|i| (*i).into()).collect();
          entry.insert("Value".to_string(), serde_json::Value::Array(members));
        }
      }

      ValueData::Floats(values) => {
        if !values.is_empty() {
          let members = values.iter().map(|f| (*f).into()).collect();
          entry.insert("Value".to_string(), serde_json::Value::Array(members));
        }
      }

      ValueData::InlineBinary(base64) => {
        entry.insert(
          "InlineBinary".to_string(),
          serde_json::Value::String(base64.clone()),
        );
      }
    }

    document
      .insert(tag.to_hex_string(), serde_json::Value::Object(entry));
  }

  serde_json::Value::Object(document)
}

fn serialize_string_member(
  vr: ValueRepresentation,
  value: &str,
) -> serde_json::Value {
  if value.is_empty() {
    return serde_json::Value::Null;
  }

  if vr == ValueRepresentation::PersonName {
    let mut person_name = serde_json::Map::new();
    person_name.insert(
      "Alphabetic".to_string(),
      serde_json::Value::String(value.to_string()),
    );

    return serde_json::Value::Object(person_name);
  }

  serde_json::Value::String(value.to_string())
}

/// Writes a data set to the record file at the given path. All write
/// failures are fatal to a run.
///
pub fn write_record_file(
  data_set: &DataSet,
  path: &Path,
) -> Result<(), RecordReadError> {
  let content = serde_json::to_string_pretty(&serialize_record(data_set))
    .map_err(|e| RecordReadError::FileError {
      when: format!("Serializing record file '{}'", path.display()),
      details: e.to_string(),
    })?;

  std::fs::write(path, content).map_err(|e| RecordReadError::FileError {
    when: format!("Writing record file '{}'", path.display()),
    details: e.to_string(),
  })
}
