//! Provides a dictionary of the data elements used by the pseudonymization
//! pipeline, along with human-readable names for audit logging.

use crate::{DataElementTag, ValueRepresentation};

/// A single data element in the dictionary.
///
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Item {
  pub tag: DataElementTag,
  pub name: &'static str,
  pub vr: ValueRepresentation,
}

pub const FILE_META_INFORMATION_GROUP_LENGTH: Item = Item {
  tag: DataElementTag::new(0x0002, 0x0000),
  name: "File Meta Information Group Length",
  vr: ValueRepresentation::UnsignedLong,
};

pub const FILE_META_INFORMATION_VERSION: Item = Item {
  tag: DataElementTag::new(0x0002, 0x0001),
  name: "File Meta Information Version",
  vr: ValueRepresentation::OtherByteString,
};

pub const MEDIA_STORAGE_SOP_CLASS_UID: Item = Item {
  tag: DataElementTag::new(0x0002, 0x0002),
  name: "Media Storage SOP Class UID",
  vr: ValueRepresentation::UniqueIdentifier,
};

pub const MEDIA_STORAGE_SOP_INSTANCE_UID: Item = Item {
  tag: DataElementTag::new(0x0002, 0x0003),
  name: "Media Storage SOP Instance UID",
  vr: ValueRepresentation::UniqueIdentifier,
};

pub const TRANSFER_SYNTAX_UID: Item = Item {
  tag: DataElementTag::new(0x0002, 0x0010),
  name: "Transfer Syntax UID",
  vr: ValueRepresentation::UniqueIdentifier,
};

pub const IMPLEMENTATION_CLASS_UID: Item = Item {
  tag: DataElementTag::new(0x0002, 0x0012),
  name: "Implementation Class UID",
  vr: ValueRepresentation::UniqueIdentifier,
};

pub const IMPLEMENTATION_VERSION_NAME: Item = Item {
  tag: DataElementTag::new(0x0002, 0x0013),
  name: "Implementation Version Name",
  vr: ValueRepresentation::ShortString,
};

pub const IMAGE_TYPE: Item = Item {
  tag: DataElementTag::new(0x0008, 0x0008),
  name: "Image Type",
  vr: ValueRepresentation::CodeString,
};

pub const SOP_CLASS_UID: Item = Item {
  tag: DataElementTag::new(0x0008, 0x0016),
  name: "SOP Class UID",
  vr: ValueRepresentation::UniqueIdentifier,
};

pub const SOP_INSTANCE_UID: Item = Item {
  tag: DataElementTag::new(0x0008, 0x0018),
  name: "SOP Instance UID",
  vr: ValueRepresentation::UniqueIdentifier,
};

pub const ACCESSION_NUMBER: Item = Item {
  tag: DataElementTag::new(0x0008, 0x0050),
  name: "Accession Number",
  vr: ValueRepresentation::ShortString,
};

pub const MODALITY: Item = Item {
  tag: DataElementTag::new(0x0008, 0x0060),
  name: "Modality",
  vr: ValueRepresentation::CodeString,
};

pub const MANUFACTURER: Item = Item {
  tag: DataElementTag::new(0x0008, 0x0070),
  name: "Manufacturer",
  vr: ValueRepresentation::LongString,
};

pub const SERIES_DESCRIPTION: Item = Item {
  tag: DataElementTag::new(0x0008, 0x103E),
  name: "Series Description",
  vr: ValueRepresentation::LongString,
};

pub const MANUFACTURER_MODEL_NAME: Item = Item {
  tag: DataElementTag::new(0x0008, 0x1090),
  name: "Manufacturer Model Name",
  vr: ValueRepresentation::LongString,
};

pub const PATIENT_NAME: Item = Item {
  tag: DataElementTag::new(0x0010, 0x0010),
  name: "Patient Name",
  vr: ValueRepresentation::PersonName,
};

pub const PATIENT_ID: Item = Item {
  tag: DataElementTag::new(0x0010, 0x0020),
  name: "Patient ID",
  vr: ValueRepresentation::LongString,
};

pub const PATIENT_IDENTITY_REMOVED: Item = Item {
  tag: DataElementTag::new(0x0012, 0x0062),
  name: "Patient Identity Removed",
  vr: ValueRepresentation::CodeString,
};

pub const DEIDENTIFICATION_METHOD: Item = Item {
  tag: DataElementTag::new(0x0012, 0x0063),
  name: "De-identification Method",
  vr: ValueRepresentation::LongString,
};

pub const BURNED_IN_ANNOTATION: Item = Item {
  tag: DataElementTag::new(0x0028, 0x0301),
  name: "Burned In Annotation",
  vr: ValueRepresentation::CodeString,
};

const ITEMS: [&Item; 20] = [
  &FILE_META_INFORMATION_GROUP_LENGTH,
  &FILE_META_INFORMATION_VERSION,
  &MEDIA_STORAGE_SOP_CLASS_UID,
  &MEDIA_STORAGE_SOP_INSTANCE_UID,
  &TRANSFER_SYNTAX_UID,
  &IMPLEMENTATION_CLASS_UID,
  &IMPLEMENTATION_VERSION_NAME,
  &IMAGE_TYPE,
  &SOP_CLASS_UID,
  &SOP_INSTANCE_UID,
  &ACCESSION_NUMBER,
  &MODALITY,
  &MANUFACTURER,
  &SERIES_DESCRIPTION,
  &MANUFACTURER_MODEL_NAME,
  &PATIENT_NAME,
  &PATIENT_ID,
  &PATIENT_IDENTITY_REMOVED,
  &DEIDENTIFICATION_METHOD,
  &BURNED_IN_ANNOTATION,
];

/// Returns the dictionary item for the given tag, if there is one.
///
pub fn find(tag: DataElementTag) -> Option<&'static Item> {
  ITEMS.iter().find(|item| item.tag == tag).copied()
}

/// Returns the human-readable name for the given tag. Unrecognized tags
/// return `"Unknown"`.
///
pub fn tag_name(tag: DataElementTag) -> &'static str {
  match find(tag) {
    Some(item) => item.name,
    None => "Unknown",
  }
}

/// Formats a tag together with its human-readable name, e.g. `"(0008,0050)
/// Accession Number"`.
///
pub fn tag_with_name(tag: DataElementTag) -> String {
  format!("{} {}", tag, tag_name(tag))
}
