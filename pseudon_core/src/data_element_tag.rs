//! A data element tag, which is a pair of unsigned 16-bit group and element
//! numbers that identifies a single attribute in a data set.

/// A data element tag that is a pair of 16-bit unsigned integers specifying a
/// group number and an element number.
///
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct DataElementTag {
  pub group: u16,
  pub element: u16,
}

impl DataElementTag {
  /// Creates a new data element tag with the given group and element numbers.
  ///
  pub const fn new(group: u16, element: u16) -> Self {
    Self { group, element }
  }

  /// Returns whether the tag is in the File Meta Information group.
  ///
  pub fn is_file_meta_information(&self) -> bool {
    self.group == 0x0002
  }

  /// Parses a data element tag from a `"group,element"` hex pair string, e.g.
  /// `"8,103e"` for *'(0008,103E) Series Description'*. This is the key format
  /// used by whitelist documents. Leading zeros are optional and the hex
  /// digits are case-insensitive.
  ///
  pub fn from_pair_string(s: &str) -> Result<Self, String> {
    let make_error = || format!("Invalid data element tag pair: {:?}", s);

    let (group, element) = s.split_once(',').ok_or_else(make_error)?;

    let parse_hex_u16 = |part: &str| {
      let part = part.trim();

      if part.is_empty() || part.len() > 4 {
        return Err(make_error());
      }

      u16::from_str_radix(part, 16).map_err(|_| make_error())
    };

    Ok(Self {
      group: parse_hex_u16(group)?,
      element: parse_hex_u16(element)?,
    })
  }

  /// Parses a data element tag from an 8-character hex string, e.g.
  /// `"0008103E"`. This is the key format used by the DICOM JSON model.
  ///
  pub fn from_hex_string(s: &str) -> Result<Self, String> {
    if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
      return Err(format!("Invalid data element tag: {:?}", s));
    }

    let group = u16::from_str_radix(&s[0..4], 16)
      .map_err(|_| format!("Invalid data element tag: {:?}", s))?;
    let element = u16::from_str_radix(&s[4..8], 16)
      .map_err(|_| format!("Invalid data element tag: {:?}", s))?;

    Ok(Self { group, element })
  }

  /// Formats a data element tag as an 8-character uppercase hex string, e.g.
  /// `"0008103E"`.
  ///
  pub fn to_hex_string(&self) -> String {
    format!("{:04X}{:04X}", self.group, self.element)
  }
}

impl std::fmt::Display for DataElementTag {
  /// Formats a data element tag as `"(gggg,eeee)"`.
  ///
  fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
    write!(f, "({:04X},{:04X})", self.group, self.element)
  }
}
