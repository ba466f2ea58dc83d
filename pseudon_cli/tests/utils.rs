use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A temporary directory tree holding two input records, a whitelist, and a
/// linkage list, along with the output locations a CLI invocation needs.
///
pub struct TestTree {
  root: TempDir,
}

#[allow(dead_code)]
impl TestTree {
  pub fn root(&self) -> &Path {
    self.root.path()
  }

  pub fn input_dir(&self) -> PathBuf {
    self.root.path().join("input")
  }

  pub fn clean_dir(&self) -> PathBuf {
    self.root.path().join("clean")
  }

  pub fn quarantine_dir(&self) -> PathBuf {
    self.root.path().join("quarantine")
  }

  pub fn index_file(&self) -> PathBuf {
    self.root.path().join("index.db")
  }

  pub fn links_file(&self) -> PathBuf {
    self.root.path().join("links.csv")
  }

  pub fn whitelist_file(&self) -> PathBuf {
    self.root.path().join("whitelist.json")
  }
}

#[allow(dead_code)]
pub fn create_test_tree() -> TestTree {
  let tree = TestTree {
    root: TempDir::new().unwrap(),
  };

  std::fs::create_dir_all(tree.input_dir()).unwrap();

  write_json(
    &tree.input_dir().join("brain.json"),
    &serde_json::json!({
      "00080050": { "vr": "SH", "Value": ["HOSP-1"] },
      "00080060": { "vr": "CS", "Value": ["MR"] },
      "0008103E": { "vr": "LO", "Value": ["Routine Brain"] },
      "00100010": { "vr": "PN", "Value": [{ "Alphabetic": "Doe^Jane" }] }
    }),
  );

  write_json(
    &tree.input_dir().join("ultrasound.json"),
    &serde_json::json!({
      "00080050": { "vr": "SH", "Value": ["HOSP-2"] },
      "00080060": { "vr": "CS", "Value": ["US"] }
    }),
  );

  write_json(
    &tree.whitelist_file(),
    &serde_json::json!({
      "8,60": ["*"],
      "8,103e": ["*"]
    }),
  );

  std::fs::write(tree.links_file(), "HOSP-1,S1\nHOSP-2,S2\n").unwrap();

  tree
}

fn write_json(path: &Path, document: &serde_json::Value) {
  std::fs::write(path, serde_json::to_string_pretty(document).unwrap())
    .unwrap();
}
