//! Validated relocation of files into the quarantine and clean output trees.
//! All destination paths are built through a checked join so that a write can
//! never escape its configured root.

use std::path::{Component, Path, PathBuf};

use crate::PipelineError;

/// Validates the configured directory roots before any record is processed.
/// The input root must be an existing directory, and neither output root may
/// equal or sit inside the input root.
///
pub fn validate_roots(
  input_root: &Path,
  clean_root: &Path,
  quarantine_root: &Path,
) -> Result<(), PipelineError> {
  if !input_root.is_dir() {
    return Err(PipelineError::InvalidPath {
      details: format!(
        "Input root '{}' is not a directory",
        input_root.display()
      ),
    });
  }

  let absolute_input = absolute(input_root)?;

  for output_root in [clean_root, quarantine_root] {
    let absolute_output = absolute(output_root)?;

    if absolute_output.starts_with(&absolute_input) {
      return Err(PipelineError::InvalidPath {
        details: format!(
          "Output root '{}' cannot be inside or equal to the input root '{}'",
          output_root.display(),
          input_root.display()
        ),
      });
    }
  }

  Ok(())
}

/// Joins path components onto a destination root, refusing any component
/// that could cause the resulting path to escape the root: parent and
/// current-directory components, root components, and components containing
/// a path separator.
///
pub fn checked_join(
  root: &Path,
  components: &[&str],
) -> Result<PathBuf, PipelineError> {
  let mut result = root.to_path_buf();

  for component in components {
    let is_safe = !component.is_empty()
      && *component != "."
      && *component != ".."
      && !component.contains('/')
      && !component.contains('\\');

    if !is_safe {
      return Err(PipelineError::InvalidPath {
        details: format!(
          "Path component {:?} is not allowed under '{}'",
          component,
          root.display()
        ),
      });
    }

    result.push(component);
  }

  Ok(result)
}

/// Returns the destination path for quarantining the given source file: the
/// quarantine root plus the source's path relative to the input root, so the
/// quarantine tree mirrors the input tree.
///
pub fn quarantine_destination(
  source_path: &Path,
  input_root: &Path,
  quarantine_root: &Path,
) -> Result<PathBuf, PipelineError> {
  let relative_path =
    source_path.strip_prefix(input_root).map_err(|_| {
      PipelineError::InvalidPath {
        details: format!(
          "File '{}' is not under the input root '{}'",
          source_path.display(),
          input_root.display()
        ),
      }
    })?;

  let components = relative_path
    .components()
    .map(|component| match component {
      Component::Normal(part) => part.to_str().ok_or_else(|| {
        PipelineError::InvalidPath {
          details: format!(
            "File '{}' has a non-UTF-8 path component",
            source_path.display()
          ),
        }
      }),

      _ => Err(PipelineError::InvalidPath {
        details: format!(
          "File '{}' has an unexpected path component",
          source_path.display()
        ),
      }),
    })
    .collect::<Result<Vec<_>, _>>()?;

  checked_join(quarantine_root, &components)
}

/// Copies the given source file into the quarantine tree, creating
/// destination directories as needed. Returns the path the copy was written
/// to. Failures here are fatal to the run.
///
pub fn copy_into_quarantine(
  source_path: &Path,
  input_root: &Path,
  quarantine_root: &Path,
) -> Result<PathBuf, PipelineError> {
  let destination =
    quarantine_destination(source_path, input_root, quarantine_root)?;

  if let Some(parent) = destination.parent() {
    std::fs::create_dir_all(parent).map_err(|e| PipelineError::FileError {
      when: format!("Creating quarantine directory '{}'", parent.display()),
      details: e.to_string(),
    })?;
  }

  std::fs::copy(source_path, &destination).map_err(|e| {
    PipelineError::FileError {
      when: format!(
        "Copying '{}' to quarantine '{}'",
        source_path.display(),
        destination.display()
      ),
      details: e.to_string(),
    }
  })?;

  Ok(destination)
}

fn absolute(path: &Path) -> Result<PathBuf, PipelineError> {
  std::path::absolute(path).map_err(|e| PipelineError::InvalidPath {
    details: format!(
      "Could not resolve path '{}': {}",
      path.display(),
      e
    ),
  })
}
