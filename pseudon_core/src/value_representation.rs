//! DICOM value representations (VRs) and conversion to and from their
//! two-letter abbreviations.

/// A DICOM value representation, which specifies the data type and format of
/// a data element's value.
///
/// Ref: PS3.5 6.2.
///
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ValueRepresentation {
  AgeString,
  ApplicationEntity,
  AttributeTag,
  CodeString,
  Date,
  DateTime,
  DecimalString,
  FloatingPointDouble,
  FloatingPointSingle,
  IntegerString,
  LongString,
  LongText,
  OtherByteString,
  OtherDoubleString,
  OtherFloatString,
  OtherLongString,
  OtherVeryLongString,
  OtherWordString,
  PersonName,
  Sequence,
  ShortString,
  ShortText,
  SignedLong,
  SignedShort,
  SignedVeryLong,
  Time,
  UniqueIdentifier,
  UniversalResourceIdentifier,
  Unknown,
  UnlimitedCharacters,
  UnlimitedText,
  UnsignedLong,
  UnsignedShort,
  UnsignedVeryLong,
}

impl ValueRepresentation {
  /// Parses a value representation from its two-letter abbreviation, e.g.
  /// `"SH"` for [`ValueRepresentation::ShortString`].
  ///
  pub fn from_abbreviation(s: &str) -> Result<Self, String> {
    match s {
      "AE" => Ok(Self::ApplicationEntity),
      "AS" => Ok(Self::AgeString),
      "AT" => Ok(Self::AttributeTag),
      "CS" => Ok(Self::CodeString),
      "DA" => Ok(Self::Date),
      "DS" => Ok(Self::DecimalString),
      "DT" => Ok(Self::DateTime),
      "FD" => Ok(Self::FloatingPointDouble),
      "FL" => Ok(Self::FloatingPointSingle),
      "IS" => Ok(Self::IntegerString),
      "LO" => Ok(Self::LongString),
      "LT" => Ok(Self::LongText),
      "OB" => Ok(Self::OtherByteString),
      "OD" => Ok(Self::OtherDoubleString),
      "OF" => Ok(Self::OtherFloatString),
      "OL" => Ok(Self::OtherLongString),
      "OV" => Ok(Self::OtherVeryLongString),
      "OW" => Ok(Self::OtherWordString),
      "PN" => Ok(Self::PersonName),
      "SH" => Ok(Self::ShortString),
      "SL" => Ok(Self::SignedLong),
      "SQ" => Ok(Self::Sequence),
      "SS" => Ok(Self::SignedShort),
      "ST" => Ok(Self::ShortText),
      "SV" => Ok(Self::SignedVeryLong),
      "TM" => Ok(Self::Time),
      "UC" => Ok(Self::UnlimitedCharacters),
      "UI" => Ok(Self::UniqueIdentifier),
      "UL" => Ok(Self::UnsignedLong),
      "UN" => Ok(Self::Unknown),
      "UR" => Ok(Self::UniversalResourceIdentifier),
      "US" => Ok(Self::UnsignedShort),
      "UT" => Ok(Self::UnlimitedText),
      "UV" => Ok(Self::UnsignedVeryLong),
      _ => Err(format!("Invalid value representation: {:?}", s)),
    }
  }

  /// Returns the two-letter abbreviation for a value representation.
  ///
  pub fn abbreviation(&self) -> &'static str {
    match self {
      Self::AgeString => "AS",
      Self::ApplicationEntity => "AE",
      Self::AttributeTag => "AT",
      Self::CodeString => "CS",
      Self::Date => "DA",
      Self::DateTime => "DT",
      Self::DecimalString => "DS",
      Self::FloatingPointDouble => "FD",
      Self::FloatingPointSingle => "FL",
      Self::IntegerString => "IS",
      Self::LongString => "LO",
      Self::LongText => "LT",
      Self::OtherByteString => "OB",
      Self::OtherDoubleString => "OD",
      Self::OtherFloatString => "OF",
      Self::OtherLongString => "OL",
      Self::OtherVeryLongString => "OV",
      Self::OtherWordString => "OW",
      Self::PersonName => "PN",
      Self::Sequence => "SQ",
      Self::ShortString => "SH",
      Self::ShortText => "ST",
      Self::SignedLong => "SL",
      Self::SignedShort => "SS",
      Self::SignedVeryLong => "SV",
      Self::Time => "TM",
      Self::UniqueIdentifier => "UI",
      Self::UniversalResourceIdentifier => "UR",
      Self::Unknown => "UN",
      Self::UnlimitedCharacters => "UC",
      Self::UnlimitedText => "UT",
      Self::UnsignedLong => "UL",
      Self::UnsignedShort => "US",
      Self::UnsignedVeryLong => "UV",
    }
  }

  /// Returns whether a value representation's data is a string.
  ///
  pub fn is_string(&self) -> bool {
    matches!(
      self,
      Self::AgeString
        | Self::ApplicationEntity
        | Self::CodeString
        | Self::Date
        | Self::DateTime
        | Self::DecimalString
        | Self::IntegerString
        | Self::LongString
        | Self::LongText
        | Self::PersonName
        | Self::ShortString
        | Self::ShortText
        | Self::Time
        | Self::UniqueIdentifier
        | Self::UniversalResourceIdentifier
        | Self::UnlimitedCharacters
        | Self::UnlimitedText
    )
  }
}

impl std::fmt::Display for ValueRepresentation {
  fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
    f.write_str(self.abbreviation())
  }
}
