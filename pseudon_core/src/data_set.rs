//! An in-memory representation of one imaging record: an ordered mapping from
//! data element tags to data element values.

use std::collections::BTreeMap;

use crate::{DataElementTag, DataElementValue, DataError};

/// A data set that maps data element tags to data element values, ordered by
/// tag. Tags are unique within a data set; inserting an existing tag replaces
/// its value.
///
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DataSet(BTreeMap<DataElementTag, DataElementValue>);

impl DataSet {
  /// Creates a new empty data set.
  ///
  pub fn new() -> Self {
    Self(BTreeMap::new())
  }

  /// Returns the number of data elements in a data set.
  ///
  pub fn len(&self) -> usize {
    self.0.len()
  }

  /// Returns whether a data set is empty.
  ///
  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  /// Returns whether a data element with the given tag is present.
  ///
  pub fn has(&self, tag: DataElementTag) -> bool {
    self.0.contains_key(&tag)
  }

  /// Inserts a data element, replacing any existing value for the tag.
  ///
  pub fn insert(&mut self, tag: DataElementTag, value: DataElementValue) {
    self.0.insert(tag, value);
  }

  /// Returns the value of the data element with the given tag, if present.
  ///
  pub fn get(&self, tag: DataElementTag) -> Option<&DataElementValue> {
    self.0.get(&tag)
  }

  /// Returns the content of the single-valued string data element with the
  /// given tag. Returns an error if the tag is absent or the value is not
  /// exactly one string.
  ///
  pub fn get_string(&self, tag: DataElementTag) -> Result<&str, DataError> {
    let value = self
      .0
      .get(&tag)
      .ok_or_else(|| DataError::new_tag_not_present(tag))?;

    value.single_string().ok_or_else(|| {
      DataError::new_value_invalid(
        tag,
        "Expected a single string value".to_string(),
      )
    })
  }

  /// Deletes the data element with the given tag. Returns whether a data
  /// element was removed.
  ///
  pub fn delete(&mut self, tag: DataElementTag) -> bool {
    self.0.remove(&tag).is_some()
  }

  /// Returns a snapshot of the tags currently in a data set, in tag order.
  /// Use this when deleting data elements while walking a data set, as the
  /// map itself must not be mutated mid-iteration.
  ///
  pub fn tags(&self) -> Vec<DataElementTag> {
    self.0.keys().copied().collect()
  }

  /// Retains only the data elements for which the predicate returns true.
  ///
  pub fn retain(
    &mut self,
    mut predicate: impl FnMut(DataElementTag, &DataElementValue) -> bool,
  ) {
    self.0.retain(|tag, value| predicate(*tag, value));
  }

  /// Iterates over the data elements in a data set in tag order.
  ///
  pub fn iter(
    &self,
  ) -> impl Iterator<Item = (DataElementTag, &DataElementValue)> {
    self.0.iter().map(|(tag, value)| (*tag, value))
  }
}
