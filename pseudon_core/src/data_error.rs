//! An error that occurred when reading typed values out of a data set.

use crate::{DataElementTag, PseudonError, dictionary};

/// An error that occurred when reading typed values out of a data set.
///
#[derive(Clone, Debug, PartialEq)]
pub enum DataError {
  /// The requested data element is not present in the data set.
  TagNotPresent { tag: DataElementTag },

  /// The data element is present but its value does not have the requested
  /// type or multiplicity.
  ValueInvalid { tag: DataElementTag, details: String },
}

impl DataError {
  /// Constructs a new 'Tag not present' data error.
  ///
  pub fn new_tag_not_present(tag: DataElementTag) -> Self {
    Self::TagNotPresent { tag }
  }

  /// Constructs a new 'Value invalid' data error.
  ///
  pub fn new_value_invalid(tag: DataElementTag, details: String) -> Self {
    Self::ValueInvalid { tag, details }
  }

  /// Returns the tag of the data element the error relates to.
  ///
  pub fn tag(&self) -> DataElementTag {
    match self {
      Self::TagNotPresent { tag } => *tag,
      Self::ValueInvalid { tag, .. } => *tag,
    }
  }
}

impl std::fmt::Display for DataError {
  fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
    match self {
      Self::TagNotPresent { tag } => {
        write!(f, "Tag not present: {}", dictionary::tag_with_name(*tag))
      }

      Self::ValueInvalid { tag, details } => write!(
        f,
        "Invalid value for {}: {}",
        dictionary::tag_with_name(*tag),
        details
      ),
    }
  }
}

impl PseudonError for DataError {
  fn to_lines(&self, task_description: &str) -> Vec<String> {
    vec![
      format!("Data error {}", task_description),
      "".to_string(),
      format!("  Details: {}", self),
    ]
  }
}
