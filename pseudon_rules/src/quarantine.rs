//! The quarantine rule engine that decides whether a record is unsafe to
//! release. Rules are checked in a fixed order and the first match wins.

use pseudon_core::{DataSet, dictionary};

// Value checks follow the TCIA pixel-checker filter list:
// - ImageType and SeriesDescription must not contain the word SAVE, to avoid
//   screen saves/captures
// - Manufacturer must not be North American Imaging (DICOM Box) or PACSGEAR
// - BurnedInAnnotation must not be YES
const SUSPECT_MANUFACTURERS: [&str; 2] =
  ["north american imaging, inc", "pacsgear"];

const SUSPECT_MODEL_NAMES: [&str; 1] = ["the dicom box"];

/// The reason a record was flagged by the quarantine rule engine.
///
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum QuarantineReason {
  /// The series description contains "patient protocol".
  PatientProtocol,

  /// The series description or image type indicates a screen capture.
  LikelyScreenCapture,

  /// A modality value is not in the allowed modality set, or is empty.
  ModalityNotAllowed,

  /// The modality attribute is absent entirely.
  ModalityMissing,

  /// The burned-in annotation attribute declares burnt-in data.
  BurntInData,

  /// The manufacturer matches a known suspect vendor.
  ManufacturerSuspect,

  /// The manufacturer model name matches a known suspect model.
  ModelNameSuspect,
}

impl std::fmt::Display for QuarantineReason {
  fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
    let reason = match self {
      Self::PatientProtocol => "patient protocol",
      Self::LikelyScreenCapture => "likely screen capture",
      Self::ModalityNotAllowed => "modality not allowed",
      Self::ModalityMissing => "modality missing",
      Self::BurntInData => "burnt-in data",
      Self::ManufacturerSuspect => "manufacturer is suspect",
      Self::ModelNameSuspect => "manufacturer model name is suspect",
    };

    f.write_str(reason)
  }
}

/// Configuration for the quarantine rule engine.
///
#[derive(Clone, Debug, PartialEq)]
pub struct ScreeningConfig {
  allowed_modalities: Vec<String>,
}

impl ScreeningConfig {
  /// Creates a new screening config with the given allowed modalities, which
  /// are compared case-insensitively.
  ///
  pub fn new(allowed_modalities: &[String]) -> Self {
    Self {
      allowed_modalities: allowed_modalities
        .iter()
        .map(|modality| modality.to_lowercase())
        .collect(),
    }
  }

  fn is_modality_allowed(&self, modality: &str) -> bool {
    self
      .allowed_modalities
      .iter()
      .any(|allowed| allowed == modality)
  }
}

impl Default for ScreeningConfig {
  /// The default screening config allows the MR and CT modalities.
  ///
  fn default() -> Self {
    Self::new(&["mr".to_string(), "ct".to_string()])
  }
}

/// Checks a data set against the quarantine rules and returns the reason it
/// must be quarantined, if any. Rules are evaluated in a fixed order and the
/// first match wins. All comparisons are trimmed and case-insensitive, and a
/// single non-conforming member of a multi-valued attribute is sufficient to
/// flag the whole record.
///
pub fn check_data_set(
  data_set: &DataSet,
  config: &ScreeningConfig,
) -> Option<QuarantineReason> {
  if let Some(value) = data_set.get(dictionary::SERIES_DESCRIPTION.tag) {
    let series_description = value.to_text().trim().to_lowercase();

    if series_description.contains("patient protocol") {
      return Some(QuarantineReason::PatientProtocol);
    }

    if series_description.contains("save") {
      return Some(QuarantineReason::LikelyScreenCapture);
    }
  }

  match data_set.get(dictionary::MODALITY.tag) {
    Some(value) => {
      for modality in value.member_texts() {
        if !config.is_modality_allowed(modality.trim().to_lowercase().as_str())
        {
          return Some(QuarantineReason::ModalityNotAllowed);
        }
      }
    }

    None => return Some(QuarantineReason::ModalityMissing),
  }

  if let Some(value) = data_set.get(dictionary::BURNED_IN_ANNOTATION.tag) {
    let burnt_in = value.to_text().trim().to_lowercase();

    if burnt_in == "yes" || burnt_in == "y" {
      return Some(QuarantineReason::BurntInData);
    }
  }

  if let Some(value) = data_set.get(dictionary::IMAGE_TYPE.tag) {
    for image_type in value.member_texts() {
      if image_type.trim().to_lowercase().contains("save") {
        return Some(QuarantineReason::LikelyScreenCapture);
      }
    }
  }

  if let Some(value) = data_set.get(dictionary::MANUFACTURER.tag) {
    let manufacturer = value.to_text().trim().to_lowercase();

    if SUSPECT_MANUFACTURERS
      .iter()
      .any(|suspect| manufacturer.contains(suspect))
    {
      return Some(QuarantineReason::ManufacturerSuspect);
    }
  }

  if let Some(value) = data_set.get(dictionary::MANUFACTURER_MODEL_NAME.tag) {
    let model_name = value.to_text().trim().to_lowercase();

    if SUSPECT_MODEL_NAMES
      .iter()
      .any(|suspect| model_name.contains(suspect))
    {
      return Some(QuarantineReason::ModelNameSuspect);
    }
  }

  None
}
