//! The whitelist of attribute values that are allowed to pass through the
//! attribute filter unaltered.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use pseudon_core::{
  DataElementTag, DataElementValue, PseudonError, dictionary,
};

/// The allowed values for a single attribute tag.
///
#[derive(Clone, Debug, PartialEq)]
pub enum AllowedValues {
  /// Any value is allowed and value comparison is bypassed entirely. Stored
  /// for tags whose whitelist entry contains the `"*"` wildcard.
  Any,

  /// Only the contained normalized values are allowed.
  Values(HashSet<String>),
}

/// A whitelist mapping attribute tags to their allowed values. Tags that have
/// no entry are denied. Immutable once loaded.
///
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Whitelist(HashMap<DataElementTag, AllowedValues>);

/// An error that occurred when loading a whitelist.
///
#[derive(Clone, Debug, PartialEq)]
pub enum WhitelistError {
  /// The whitelist file could not be read.
  FileError { when: String, details: String },

  /// The whitelist document is not structured as a mapping from
  /// `"group,element"` strings to arrays of allowed value strings.
  DocumentInvalid { details: String },
}

impl PseudonError for WhitelistError {
  fn to_lines(&self, task_description: &str) -> Vec<String> {
    match self {
      WhitelistError::FileError { when, details } => vec![
        format!("Whitelist file error {}", task_description),
        "".to_string(),
        format!("  When: {}", when),
        format!("  Details: {}", details),
      ],

      WhitelistError::DocumentInvalid { details } => vec![
        format!("Whitelist document invalid {}", task_description),
        "".to_string(),
        format!("  Details: {}", details),
      ],
    }
  }
}

impl Whitelist {
  /// Loads a whitelist from a JSON file that maps `"group,element"` hex pair
  /// strings to arrays of allowed value strings, e.g.
  ///
  /// ```json
  /// {
  ///   "8,60": ["*"],
  ///   "8,103e": ["routine brain", "t1 axial"]
  /// }
  /// ```
  ///
  pub fn from_path(path: &Path) -> Result<Self, WhitelistError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
      WhitelistError::FileError {
        when: format!("Reading whitelist file '{}'", path.display()),
        details: e.to_string(),
      }
    })?;

    let document: serde_json::Value =
      serde_json::from_str(&content).map_err(|e| {
        WhitelistError::DocumentInvalid {
          details: format!("Invalid JSON: {}", e),
        }
      })?;

    Self::parse(&document)
  }

  /// Parses a whitelist from an already-deserialized JSON document.
  ///
  pub fn parse(document: &serde_json::Value) -> Result<Self, WhitelistError> {
    let entries =
      document
        .as_object()
        .ok_or_else(|| WhitelistError::DocumentInvalid {
          details: "Expected a JSON object at the top level".to_string(),
        })?;

    let mut whitelist = HashMap::new();

    for (key, allowed) in entries {
      let tag = DataElementTag::from_pair_string(key)
        .map_err(|details| WhitelistError::DocumentInvalid { details })?;

      let allowed =
        allowed
          .as_array()
          .ok_or_else(|| WhitelistError::DocumentInvalid {
            details: format!("Expected an array of strings for {:?}", key),
          })?;

      let mut values = HashSet::new();
      let mut is_wildcard = false;

      for entry in allowed {
        let entry =
          entry
            .as_str()
            .ok_or_else(|| WhitelistError::DocumentInvalid {
              details: format!("Expected an array of strings for {:?}", key),
            })?;

        if entry == "*" {
          is_wildcard = true;
        } else {
          values.insert(normalize(entry));
        }
      }

      let allowed_values = if is_wildcard {
        AllowedValues::Any
      } else {
        AllowedValues::Values(values)
      };

      whitelist.insert(tag, allowed_values);
    }

    Ok(Self(whitelist))
  }

  /// Returns the number of tags that have a whitelist entry.
  ///
  pub fn len(&self) -> usize {
    self.0.len()
  }

  /// Returns whether a whitelist has no entries.
  ///
  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  /// Returns whether the given value is allowed for the given tag. Tags
  /// without a whitelist entry are always denied. Rejected values are logged
  /// together with the attribute's name for audit purposes.
  ///
  pub fn allows(
    &self,
    tag: DataElementTag,
    value: &DataElementValue,
  ) -> bool {
    match self.0.get(&tag) {
      None => false,

      Some(AllowedValues::Any) => true,

      Some(AllowedValues::Values(values)) => {
        let text = value.to_text();

        if values.contains(&normalize(&text)) {
          true
        } else {
          tracing::info!(
            "{:?} not in whitelist for {}",
            text,
            dictionary::tag_with_name(tag)
          );

          false
        }
      }
    }
  }
}

static PUNCTUATION_PATTERN: LazyLock<Regex> =
  LazyLock::new(|| Regex::new("[-_,.]").unwrap());

static REPEATED_SPACES_PATTERN: LazyLock<Regex> =
  LazyLock::new(|| Regex::new("  +").unwrap());

/// Normalizes a value for whitelist comparison: surrounding whitespace is
/// trimmed, the result is lowercased, the characters `-`, `_`, `,`, and `.`
/// are deleted, and runs of spaces collapse to a single space.
///
pub fn normalize(value: &str) -> String {
  let value = value.trim().to_lowercase();
  let value = PUNCTUATION_PATTERN.replace_all(&value, "");

  REPEATED_SPACES_PATTERN.replace_all(&value, " ").to_string()
}
