//! A data element value that holds a value representation along with string,
//! integer, float, or inline binary content of a declared multiplicity.

use crate::ValueRepresentation;

/// A data element value as decoded from the DICOM JSON model. It holds a
/// value representation along with one of the following payloads:
///
/// 1. String values. Used by all of the string VRs. Empty or null values in
///    the source data decode to empty strings.
///
/// 2. Integer values. Signed 64-bit integers, used by the integer VRs.
///
/// 3. Float values. 64-bit floats, used by the floating point VRs.
///
/// 4. Inline binary. A single Base64 string carried through opaquely, used by
///    the binary VRs in the file meta information group.
///
/// The declared value multiplicity is the number of members in the payload.
/// Payloads are not validated against the value representation so that
/// non-conformant data can still be carried through the pipeline, which is a
/// common occurrence in real-world data.
///
#[derive(Clone, Debug, PartialEq)]
pub struct DataElementValue {
  vr: ValueRepresentation,
  data: ValueData,
}

/// The payload of a [`DataElementValue`].
///
#[derive(Clone, Debug, PartialEq)]
pub enum ValueData {
  Strings(Vec<String>),
  Ints(Vec<i64>),
  Floats(Vec<f64>),
  InlineBinary(String),
}

impl DataElementValue {
  /// Creates a new data element value holding a single string.
  ///
  pub fn new_string(vr: ValueRepresentation, value: &str) -> Self {
    Self {
      vr,
      data: ValueData::Strings(vec![value.to_string()]),
    }
  }

  /// Creates a new data element value holding multiple string values.
  ///
  pub fn new_strings(vr: ValueRepresentation, values: Vec<String>) -> Self {
    Self {
      vr,
      data: ValueData::Strings(values),
    }
  }

  /// Creates a new data element value holding integer values.
  ///
  pub fn new_ints(vr: ValueRepresentation, values: Vec<i64>) -> Self {
    Self {
      vr,
      data: ValueData::Ints(values),
    }
  }

  /// Creates a new data element value holding float values.
  ///
  pub fn new_floats(vr: ValueRepresentation, values: Vec<f64>) -> Self {
    Self {
      vr,
      data: ValueData::Floats(values),
    }
  }

  /// Creates a new data element value holding inline binary data, carried as
  /// an opaque Base64 string.
  ///
  pub fn new_inline_binary(vr: ValueRepresentation, base64: &str) -> Self {
    Self {
      vr,
      data: ValueData::InlineBinary(base64.to_string()),
    }
  }

  /// Returns the value representation of a data element value.
  ///
  pub fn value_representation(&self) -> ValueRepresentation {
    self.vr
  }

  /// Returns the payload of a data element value.
  ///
  pub fn data(&self) -> &ValueData {
    &self.data
  }

  /// Returns the declared value multiplicity, i.e. the number of members in
  /// the payload.
  ///
  pub fn multiplicity(&self) -> usize {
    match &self.data {
      ValueData::Strings(values) => values.len(),
      ValueData::Ints(values) => values.len(),
      ValueData::Floats(values) => values.len(),
      ValueData::InlineBinary(_) => 1,
    }
  }

  /// Returns the string members of a data element value, or `None` if the
  /// payload is not made of strings.
  ///
  pub fn strings(&self) -> Option<&[String]> {
    match &self.data {
      ValueData::Strings(values) => Some(values),
      _ => None,
    }
  }

  /// Returns the content of a data element value that holds exactly one
  /// string.
  ///
  pub fn single_string(&self) -> Option<&str> {
    match &self.data {
      ValueData::Strings(values) if values.len() == 1 => {
        Some(values[0].as_str())
      }
      _ => None,
    }
  }

  /// Returns the text form of each member of a data element value's payload.
  /// Inline binary data is a single opaque member.
  ///
  pub fn member_texts(&self) -> Vec<String> {
    match &self.data {
      ValueData::Strings(values) => values.clone(),
      ValueData::Ints(values) => {
        values.iter().map(|i| i.to_string()).collect()
      }
      ValueData::Floats(values) => {
        values.iter().map(|f| f.to_string()).collect()
      }
      ValueData::InlineBinary(base64) => vec![base64.clone()],
    }
  }

  /// Formats a data element value's payload as its canonical text form:
  /// members joined with the DICOM multi-value separator `\`.
  ///
  pub fn to_text(&self) -> String {
    match &self.data {
      ValueData::Strings(values) => values.join("\\"),

      ValueData::Ints(values) => values
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join("\\"),

      ValueData::Floats(values) => values
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join("\\"),

      ValueData::InlineBinary(base64) => base64.clone(),
    }
  }
}
