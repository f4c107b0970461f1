use std::io::Error;
use std::io::Read;

use tracing::trace;

pub const DEFAULT_RELEASE: char = '?';
pub const DEFAULT_TERMINATOR: char = '\'';

/// Pulls one terminator-delimited segment at a time from a byte stream.
///
/// Reads a single byte per step, so memory use is bounded by segment
/// size rather than interchange size.
#[derive(Debug)]
pub struct SegmentReader<T: Read> {
  io_source: T,
}

impl<T: Read> SegmentReader<T> {
  pub fn new(io_source: T) -> Self {
    SegmentReader { io_source }
  }

  /// Reads the next segment, including its trailing terminator.
  ///
  /// A terminator preceded by the release character is literal data and
  /// does not end the segment. Control characters are discarded, except
  /// when the terminator is itself one (a newline terminator must work).
  /// Returns `None` once the stream is exhausted.
  pub fn read_segment(
    &mut self,
    escape: Option<char>,
    terminator: Option<char>,
  ) -> Result<Option<String>, Error> {
    let escape = escape.unwrap_or(DEFAULT_RELEASE);
    let terminator = terminator.unwrap_or(DEFAULT_TERMINATOR);
    let escaped_terminator: String = [escape, terminator].iter().collect();

    let mut line = String::new();
    let mut buff = [0; 1];
    loop {
      let size = self.io_source.read(&mut buff)?;
      if size == 0 {
        break;
      }
      let symbol = buff[0] as char;
      if symbol.is_control() && symbol != terminator {
        continue;
      }
      line.push(symbol);

      if !line.ends_with(terminator) {
        continue;
      }
      if line.ends_with(&escaped_terminator) {
        continue;
      }
      // Keep a single terminator: cut at the last occurrence in case
      // escape handling left a residual duplicate behind.
      if let Some(index) = line.rfind(terminator) {
        if index > 0 {
          line.truncate(index);
        }
      }
      if !line.is_empty() {
        break;
      }
    }

    if line.is_empty() {
      return Ok(None);
    }
    line.push(terminator);
    trace!(length = line.len(), "segment read");
    Ok(Some(line))
  }

  /// Releases the underlying stream.
  pub fn into_inner(self) -> T {
    self.io_source
  }
}
