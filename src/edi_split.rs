use std::io::Read;

use crate::edi_constants::UNA_TAG;
use crate::edi_delimiters::DelimiterContext;
use crate::edi_errors::{EdiError, EdiResult};

/// Splits `contents` on `separator`, honoring the release character.
///
/// A separator preceded by an unescaped `escape` is literal data. Two
/// consecutive escape characters collapse to one literal escape, so an
/// escaped escape followed by a real separator still splits. The final
/// field is always emitted; when `keep_empty` is false, empty fields are
/// dropped from the result.
pub fn escape_split(
  contents: &str,
  separator: char,
  escape: Option<char>,
  keep_empty: bool,
) -> Vec<String> {
  let Some(escape) = escape else {
    return plain_split(contents, separator, keep_empty);
  };

  let escape_pair: String = [escape, escape].iter().collect();
  let mut result: Vec<String> = Vec::new();
  let mut line = String::new();
  let mut previous: Option<char> = None;

  for symbol in contents.chars() {
    if symbol == separator {
      if previous != Some(escape) {
        // An escaped escape right before the separator leaves a spare
        // release character behind; drop it before emitting.
        if line.ends_with(&escape_pair) {
          line.pop();
        }
        result.push(std::mem::take(&mut line));
        previous = None;
        continue;
      }
      // The separator is escaped: the release character is not data,
      // the separator itself is.
      line.pop();
    }
    line.push(symbol);
    if previous == Some(symbol) && symbol == escape {
      previous = None;
    } else {
      previous = Some(symbol);
    }
  }
  result.push(line);

  if !keep_empty {
    result.retain(|field| !field.is_empty());
  }
  result
}

fn plain_split(contents: &str, separator: char, keep_empty: bool) -> Vec<String> {
  contents
    .split(separator)
    .filter(|field| keep_empty || !field.is_empty())
    .map(str::to_string)
    .collect()
}

/// Splits an interchange into trimmed segments, dropping blank ones.
pub fn get_segments(contents: &str, context: &DelimiterContext) -> EdiResult<Vec<String>> {
  if contents.is_empty() {
    return Err(EdiError::InvalidArgument("contents"));
  }
  let terminator = context
    .segment_terminator()
    .ok_or(EdiError::InvalidArgument("context"))?;

  // Line endings are noise between segments unless they terminate them.
  let contents = if terminator == '\n' || terminator == '\r' {
    contents.to_string()
  } else {
    contents.replace("\r\n", "")
  };

  let segments = escape_split(&contents, terminator, context.release_indicator(), false);
  Ok(segments.iter().map(|s| s.trim().to_string()).collect())
}

/// Splits a segment into composite data elements, dropping the tag.
pub fn get_composite_data_elements(
  segment: &str,
  context: &DelimiterContext,
) -> EdiResult<Vec<String>> {
  if segment.is_empty() {
    return Err(EdiError::InvalidArgument("segment"));
  }
  let separator = context
    .data_separator()
    .ok_or(EdiError::InvalidArgument("context"))?;
  let fields = escape_split(segment, separator, context.release_indicator(), true);
  Ok(fields.into_iter().skip(1).collect())
}

/// Splits a composite data element into component data elements.
pub fn get_component_data_elements(
  composite: &str,
  context: &DelimiterContext,
) -> EdiResult<Vec<String>> {
  if composite.is_empty() {
    return Err(EdiError::InvalidArgument("composite"));
  }
  let separator = context
    .component_separator()
    .ok_or(EdiError::InvalidArgument("context"))?;
  Ok(escape_split(composite, separator, context.release_indicator(), true))
}

/// Splits a data element value into its repetitions.
pub fn get_repetitions(value: &str, context: &DelimiterContext) -> EdiResult<Vec<String>> {
  let separator = context
    .repetition_separator()
    .ok_or(EdiError::InvalidArgument("context"))?;
  Ok(escape_split(value, separator, context.release_indicator(), true))
}

/// The tag of a segment: the literal UNA marker when the segment starts
/// with it, otherwise everything before the first data-element separator.
pub fn get_segment_name(segment: &str, context: &DelimiterContext) -> EdiResult<String> {
  if segment.is_empty() {
    return Err(EdiError::InvalidArgument("segment"));
  }
  if segment.starts_with(UNA_TAG) {
    return Ok(UNA_TAG.to_string());
  }
  let separator = context
    .data_separator()
    .ok_or(EdiError::InvalidArgument("context"))?;
  Ok(segment.split(separator).next().unwrap_or_default().to_string())
}

/// Drains a readable source into a string.
pub fn to_edi_string<T: Read>(io_source: &mut T) -> EdiResult<String> {
  let mut contents = String::new();
  io_source.read_to_string(&mut contents)?;
  Ok(contents)
}
