//! The persistent accession number index. Each row maps an original
//! accession number, which is unique across the store, to an optional
//! assigned serial number.

use std::path::Path;

use rusqlite::{Connection, OptionalExtension, params};

use pseudon_core::PseudonError;

const TABLE_NAME: &str = "accession_numbers";

const TABLE_EXISTS: &str = "SELECT name FROM sqlite_master WHERE name = ?1";

const CREATE_TABLE: &str = "CREATE TABLE accession_numbers \
   (id INTEGER PRIMARY KEY AUTOINCREMENT, original TEXT NOT NULL, \
    serial TEXT, UNIQUE(original))";

const INSERT: &str =
  "INSERT OR IGNORE INTO accession_numbers (original) VALUES (?1)";

const GET: &str = "SELECT serial FROM accession_numbers WHERE original = ?1";

// instr() is used rather than LIKE because the substring match must be
// case-sensitive and must treat the fragment literally
const SEARCH: &str = "SELECT original FROM accession_numbers \
   WHERE instr(original, ?1) > 0 LIMIT 1";

const UPDATE: &str =
  "UPDATE accession_numbers SET serial = ?1 WHERE original = ?2";

const COUNT: &str = "SELECT COUNT(*) FROM accession_numbers";

/// An error raised by the accession number index. All index errors are fatal
/// to a run.
///
#[derive(Clone, Debug, PartialEq)]
pub enum IndexError {
  SqlError { when: String, details: String },
}

impl IndexError {
  fn new_sql_error(when: &str, error: rusqlite::Error) -> Self {
    Self::SqlError {
      when: when.to_string(),
      details: error.to_string(),
    }
  }
}

impl PseudonError for IndexError {
  fn to_lines(&self, task_description: &str) -> Vec<String> {
    match self {
      IndexError::SqlError { when, details } => vec![
        format!("Index error {}", task_description),
        "".to_string(),
        format!("  When: {}", when),
        format!("  Details: {}", details),
      ],
    }
  }
}

/// The persistent accession number index. The backing table is created
/// lazily on first insert, so lookups against an index that has never been
/// written to return absence rather than an error.
///
pub struct Index {
  connection: Connection,
}

impl Index {
  /// Opens the index stored in the database file at the given path, creating
  /// the file if it doesn't exist.
  ///
  pub fn open(path: &Path) -> Result<Self, IndexError> {
    let connection = Connection::open(path).map_err(|e| {
      IndexError::new_sql_error(
        &format!("Opening index database '{}'", path.display()),
        e,
      )
    })?;

    Ok(Self { connection })
  }

  /// Opens a transient in-memory index.
  ///
  pub fn open_in_memory() -> Result<Self, IndexError> {
    let connection = Connection::open_in_memory().map_err(|e| {
      IndexError::new_sql_error("Opening in-memory index database", e)
    })?;

    Ok(Self { connection })
  }

  /// Registers an original accession number in the index. Does nothing if
  /// the accession number is already present.
  ///
  pub fn insert(&self, original: &str) -> Result<(), IndexError> {
    if !self.table_exists()? {
      self
        .connection
        .execute(CREATE_TABLE, [])
        .map_err(|e| IndexError::new_sql_error("Creating index table", e))?;
    }

    self
      .connection
      .execute(INSERT, params![original])
      .map_err(|e| IndexError::new_sql_error("Inserting into index", e))?;

    Ok(())
  }

  /// Returns the serial number assigned to the given original accession
  /// number. Returns `None` when the accession number is absent, when no
  /// serial number has been assigned to it yet, or when the index has never
  /// been written to.
  ///
  pub fn get(&self, original: &str) -> Result<Option<String>, IndexError> {
    if !self.table_exists()? {
      return Ok(None);
    }

    let serial = self
      .connection
      .query_row(GET, params![original], |row| {
        row.get::<_, Option<String>>(0)
      })
      .optional()
      .map_err(|e| IndexError::new_sql_error("Querying index", e))?;

    Ok(serial.flatten())
  }

  /// Returns the first original accession number that contains the given
  /// fragment as a case-sensitive substring, in insertion order. Returns
  /// `None` when nothing matches or the index has never been written to.
  ///
  pub fn search(&self, fragment: &str) -> Result<Option<String>, IndexError> {
    if !self.table_exists()? {
      return Ok(None);
    }

    self
      .connection
      .query_row(SEARCH, params![fragment], |row| row.get(0))
      .optional()
      .map_err(|e| IndexError::new_sql_error("Searching index", e))
  }

  /// Sets the serial number for an existing original accession number,
  /// overwriting any previous assignment. Returns the number of rows
  /// affected, which is zero when the accession number is not present.
  ///
  pub fn update(
    &self,
    original: &str,
    serial: &str,
  ) -> Result<usize, IndexError> {
    if !self.table_exists()? {
      return Ok(0);
    }

    self
      .connection
      .execute(UPDATE, params![serial, original])
      .map_err(|e| IndexError::new_sql_error("Updating index", e))
  }

  /// Returns the number of accession numbers in the index.
  ///
  pub fn len(&self) -> Result<usize, IndexError> {
    if !self.table_exists()? {
      return Ok(0);
    }

    let count = self
      .connection
      .query_row(COUNT, [], |row| row.get::<_, i64>(0))
      .map_err(|e| IndexError::new_sql_error("Counting index rows", e))?;

    Ok(count as usize)
  }

  /// Returns whether the index contains no accession numbers.
  ///
  pub fn is_empty(&self) -> Result<bool, IndexError> {
    Ok(self.len()? == 0)
  }

  fn table_exists(&self) -> Result<bool, IndexError> {
    self
      .connection
      .query_row(TABLE_EXISTS, params![TABLE_NAME], |_row| Ok(()))
      .optional()
      .map(|row| row.is_some())
      .map_err(|e| {
        IndexError::new_sql_error("Checking whether index table exists", e)
      })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn lookups_on_unwritten_index_return_absent_test() {
    let index = Index::open_in_memory().unwrap();

    assert_eq!(index.get("A1"), Ok(None));
    assert_eq!(index.search("A"), Ok(None));
    assert_eq!(index.update("A1", "S1"), Ok(0));
    assert_eq!(index.len(), Ok(0));
  }

  #[test]
  fn insert_is_idempotent_test() {
    let index = Index::open_in_memory().unwrap();

    index.insert("A1").unwrap();
    index.insert("A1").unwrap();

    assert_eq!(index.len(), Ok(1));
  }

  #[test]
  fn get_returns_assigned_serial_test() {
    let index = Index::open_in_memory().unwrap();

    index.insert("A1").unwrap();
    assert_eq!(index.get("A1"), Ok(None));

    assert_eq!(index.update("A1", "S1"), Ok(1));
    assert_eq!(index.get("A1"), Ok(Some("S1".to_string())));

    // Repeated updates overwrite, last write wins
    assert_eq!(index.update("A1", "S2"), Ok(1));
    assert_eq!(index.get("A1"), Ok(Some("S2".to_string())));

    assert_eq!(index.get("A2"), Ok(None));
  }

  #[test]
  fn update_of_absent_row_affects_nothing_test() {
    let index = Index::open_in_memory().unwrap();

    index.insert("A1").unwrap();

    assert_eq!(index.update("A2", "S1"), Ok(0));
    assert_eq!(index.get("A1"), Ok(None));
  }

  #[test]
  fn search_is_case_sensitive_substring_test() {
    let index = Index::open_in_memory().unwrap();

    index.insert("HOSP-2024-00123").unwrap();
    index.insert("HOSP-2024-00456").unwrap();

    assert_eq!(
      index.search("00123"),
      Ok(Some("HOSP-2024-00123".to_string()))
    );
    assert_eq!(index.search("hosp"), Ok(None));
    assert_eq!(index.search("2024-99"), Ok(None));
  }

  #[test]
  fn search_returns_first_match_in_insertion_order_test() {
    let index = Index::open_in_memory().unwrap();

    index.insert("A-100").unwrap();
    index.insert("A-1001").unwrap();

    assert_eq!(index.search("100"), Ok(Some("A-100".to_string())));
  }

  #[test]
  fn search_treats_pattern_characters_literally_test() {
    let index = Index::open_in_memory().unwrap();

    index.insert("A1B2").unwrap();

    assert_eq!(index.search("%"), Ok(None));
    assert_eq!(index.search("A_B"), Ok(None));
  }

  #[test]
  fn index_survives_reopen_test() {
    let db_file = tempfile::NamedTempFile::new().unwrap();

    {
      let index = Index::open(db_file.path()).unwrap();
      index.insert("A1").unwrap();
      index.update("A1", "S1").unwrap();
    }

    let index = Index::open(db_file.path()).unwrap();
    assert_eq!(index.get("A1"), Ok(Some("S1".to_string())));
  }
}
