use std::io::{Error, ErrorKind};

use crate::edi_constants::{UNA_TAG, UNB_TAG};
use crate::edi_errors::{EdiError, EdiResult};

/// Envelope formats this crate understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdiFormat {
  #[default]
  Edifact,
}

/// The active delimiter set of one interchange.
///
/// Built once per interchange, either from format defaults or from the
/// interchange's own leading characters, and immutable afterwards.
/// `merge` produces a new value instead of mutating.
#[derive(Debug, Clone, Default)]
pub struct DelimiterContext {
  component_separator: Option<char>,
  data_separator: Option<char>,
  release_indicator: Option<char>,
  repetition_separator: Option<char>,
  segment_terminator: Option<char>,
  format: EdiFormat,
}

impl DelimiterContext {
  pub fn new(
    component_separator: Option<char>,
    data_separator: Option<char>,
    release_indicator: Option<char>,
    repetition_separator: Option<char>,
    segment_terminator: Option<char>,
  ) -> Self {
    DelimiterContext {
      component_separator,
      data_separator,
      release_indicator,
      repetition_separator,
      segment_terminator,
      format: EdiFormat::Edifact,
    }
  }

  /// The canonical delimiter set for a format.
  pub fn from_format(format: EdiFormat) -> Self {
    match format {
      EdiFormat::Edifact => DelimiterContext {
        component_separator: Some(':'),
        data_separator: Some('+'),
        release_indicator: Some('?'),
        repetition_separator: Some('*'),
        segment_terminator: Some('\''),
        format: EdiFormat::Edifact,
      },
    }
  }

  /// Extracts the delimiter set from the leading characters of an
  /// interchange.
  ///
  /// A leading UNB means the interchange relies on the format defaults.
  /// A leading UNA declares the delimiters explicitly: the six characters
  /// after the tag are positioned as
  /// `[component, data, reserved, release, reserved, terminator]`.
  pub fn from_raw_header(contents: &str) -> EdiResult<Self> {
    if contents.is_empty() {
      return Err(EdiError::InvalidArgument("contents"));
    }
    let contents = contents.replace("\r\n", "");

    let lead: String = contents.chars().take(3).collect::<String>().to_uppercase();
    match lead.as_str() {
      UNB_TAG => Ok(Self::from_format(EdiFormat::Edifact)),
      UNA_TAG => {
        let una: Vec<char> = contents.chars().skip(3).take(6).collect();
        if una.len() < 6 {
          return Err(EdiError::format_with_cause(
            "can't find UNA interchange delimiters",
            Error::from(ErrorKind::UnexpectedEof),
          ));
        }
        Ok(DelimiterContext {
          component_separator: Some(una[0]),
          data_separator: Some(una[1]),
          release_indicator: Some(una[3]),
          repetition_separator: Some('*'),
          segment_terminator: Some(una[5]),
          format: EdiFormat::Edifact,
        })
      }
      other => Err(EdiError::format(format!("can't identify format by: {}", other))),
    }
  }

  /// Whether the delimiters equal the format's canonical defaults.
  pub fn is_default(&self) -> bool {
    *self == Self::from_format(self.format)
  }

  /// Overlays the set fields of `other` onto `self`, letting an
  /// interchange's self-declared delimiters override a caller default.
  pub fn merge(&self, other: &DelimiterContext) -> DelimiterContext {
    DelimiterContext {
      component_separator: other.component_separator.or(self.component_separator),
      data_separator: other.data_separator.or(self.data_separator),
      release_indicator: other.release_indicator.or(self.release_indicator),
      repetition_separator: other.repetition_separator.or(self.repetition_separator),
      segment_terminator: other.segment_terminator.or(self.segment_terminator),
      format: self.format,
    }
  }

  /// Separators must be pairwise distinct within one interchange.
  /// The release indicator is exempt.
  pub fn is_valid(&self, format: EdiFormat) -> bool {
    if self.format != format {
      return false;
    }
    let mut seen: Vec<char> = Vec::new();
    for separator in self.structural_delimiters().into_iter().flatten() {
      if seen.contains(&separator) {
        return false;
      }
      seen.push(separator);
    }
    true
  }

  /// Prefixes every delimiter occurrence in `line` with the release
  /// indicator. A plain character scan, not token-aware.
  pub fn escape_line(&self, line: &str) -> String {
    let mut result = String::with_capacity(line.len());
    for symbol in line.chars() {
      if self.is_delimiter(symbol) {
        if let Some(release) = self.release_indicator {
          result.push(release);
        }
      }
      result.push(symbol);
    }
    result
  }

  pub fn component_separator(&self) -> Option<char> {
    self.component_separator
  }

  pub fn data_separator(&self) -> Option<char> {
    self.data_separator
  }

  pub fn release_indicator(&self) -> Option<char> {
    self.release_indicator
  }

  pub fn repetition_separator(&self) -> Option<char> {
    self.repetition_separator
  }

  pub fn segment_terminator(&self) -> Option<char> {
    self.segment_terminator
  }

  pub fn format(&self) -> EdiFormat {
    self.format
  }

  fn structural_delimiters(&self) -> [Option<char>; 4] {
    [
      self.component_separator,
      self.data_separator,
      self.repetition_separator,
      self.segment_terminator,
    ]
  }

  fn is_delimiter(&self, symbol: char) -> bool {
    self.structural_delimiters().contains(&Some(symbol))
  }
}

// Equality is over the five delimiter fields only.
impl PartialEq for DelimiterContext {
  fn eq(&self, other: &Self) -> bool {
    self.component_separator == other.component_separator
      && self.data_separator == other.data_separator
      && self.release_indicator == other.release_indicator
      && self.repetition_separator == other.repetition_separator
      && self.segment_terminator == other.segment_terminator
  }
}

impl Eq for DelimiterContext {}

#[cfg(test)]
mod test {
  use super::DelimiterContext;
  use super::EdiFormat;
  use crate::edi_errors::EdiError;

  #[test]
  fn edifact_defaults() {
    let context = DelimiterContext::from_format(EdiFormat::Edifact);
    assert_eq!(context.component_separator(), Some(':'));
    assert_eq!(context.data_separator(), Some('+'));
    assert_eq!(context.release_indicator(), Some('?'));
    assert_eq!(context.repetition_separator(), Some('*'));
    assert_eq!(context.segment_terminator(), Some('\''));
    assert!(context.is_default());
  }

  #[test]
  fn unb_header_uses_defaults() {
    let context = DelimiterContext::from_raw_header("UNB+UNOA:1+SENDER'").unwrap();
    assert!(context.is_default());
  }

  #[test]
  fn lowercase_header_is_accepted() {
    let context = DelimiterContext::from_raw_header("unb+UNOA:1+SENDER'").unwrap();
    assert!(context.is_default());
  }

  #[test]
  fn una_declares_delimiters() {
    let context = DelimiterContext::from_raw_header("UNA:+.? 'UNB+UNOA:1'").unwrap();
    assert_eq!(context.component_separator(), Some(':'));
    assert_eq!(context.data_separator(), Some('+'));
    assert_eq!(context.release_indicator(), Some('?'));
    assert_eq!(context.segment_terminator(), Some('\''));
    assert!(context.is_default());
  }

  #[test]
  fn una_overrides_terminator() {
    let context = DelimiterContext::from_raw_header("UNA:+.? ~UNB+UNOA:1~").unwrap();
    assert_eq!(context.segment_terminator(), Some('~'));
    assert!(!context.is_default());
  }

  #[test]
  fn una_survives_line_endings() {
    let context = DelimiterContext::from_raw_header("\r\nUNA:+.? 'UNB'").unwrap();
    assert_eq!(context.segment_terminator(), Some('\''));
  }

  #[test]
  fn truncated_una_is_a_format_error() {
    let res = DelimiterContext::from_raw_header("UNA:+");
    match res {
      Err(EdiError::Format { message, source }) => {
        assert_eq!(message, "can't find UNA interchange delimiters");
        assert!(source.is_some());
      }
      _ => panic!("expected a format error"),
    }
  }

  #[test]
  fn unknown_tag_names_the_offender() {
    let res = DelimiterContext::from_raw_header("XXX+1'");
    match res {
      Err(EdiError::Format { message, .. }) => {
        assert_eq!(message, "can't identify format by: XXX");
      }
      _ => panic!("expected a format error"),
    }
  }

  #[test]
  fn empty_header_is_caller_misuse() {
    match DelimiterContext::from_raw_header("") {
      Err(EdiError::InvalidArgument(_)) => (),
      _ => panic!("expected an argument error"),
    }
  }

  #[test]
  fn merge_overlays_set_fields() {
    let base = DelimiterContext::from_format(EdiFormat::Edifact);
    let declared = DelimiterContext::new(None, None, None, None, Some('~'));
    let merged = base.merge(&declared);
    assert_eq!(merged.segment_terminator(), Some('~'));
    assert_eq!(merged.data_separator(), Some('+'));
    assert_eq!(merged.release_indicator(), Some('?'));
  }

  #[test]
  fn merge_keeps_unset_fields() {
    let base = DelimiterContext::new(Some(':'), Some('+'), None, None, None);
    let merged = base.merge(&DelimiterContext::default());
    assert_eq!(merged.component_separator(), Some(':'));
    assert_eq!(merged.segment_terminator(), None);
  }

  #[test]
  fn equality_ignores_format() {
    let a = DelimiterContext::from_format(EdiFormat::Edifact);
    let b = DelimiterContext::new(Some(':'), Some('+'), Some('?'), Some('*'), Some('\''));
    assert_eq!(a, b);
  }

  #[test]
  fn colliding_separators_are_invalid() {
    let context = DelimiterContext::new(Some('+'), Some('+'), Some('?'), Some('*'), Some('\''));
    assert!(!context.is_valid(EdiFormat::Edifact));
  }

  #[test]
  fn release_indicator_may_collide() {
    let context = DelimiterContext::new(Some(':'), Some('+'), Some('+'), Some('*'), Some('\''));
    assert!(context.is_valid(EdiFormat::Edifact));
  }

  #[test]
  fn defaults_are_valid() {
    let context = DelimiterContext::from_format(EdiFormat::Edifact);
    assert!(context.is_valid(EdiFormat::Edifact));
  }

  #[test]
  fn escape_line_prefixes_delimiters() {
    let context = DelimiterContext::from_format(EdiFormat::Edifact);
    assert_eq!(context.escape_line("10+20:30"), "10?+20?:30");
    assert_eq!(context.escape_line("plain"), "plain");
  }

  #[test]
  fn escape_line_without_release_is_identity() {
    let context = DelimiterContext::new(Some(':'), Some('+'), None, Some('*'), Some('\''));
    assert_eq!(context.escape_line("10+20"), "10+20");
  }
}
