use std::io::{Read, Seek, SeekFrom};

use tracing::debug;

use crate::edi_constants::{UNB_TAG, UNZ_TAG};
use crate::edi_delimiters::DelimiterContext;
use crate::edi_errors::EdiResult;
use crate::edi_segments::SegmentReader;
use crate::edi_split::get_segment_name;

// Enough for a UNA declaration plus leading line endings.
const HEADER_PROBE_LEN: usize = 64;

/// How a segment tag participates in envelope framing.
///
/// Group-level tags are deliberately not classified; they frame at the
/// message level like any ordinary segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EnvelopeTag {
  Header,
  Trailer,
  Other,
}

impl EnvelopeTag {
  fn classify(name: &str) -> Self {
    match name {
      UNB_TAG => EnvelopeTag::Header,
      UNZ_TAG => EnvelopeTag::Trailer,
      _ => EnvelopeTag::Other,
    }
  }
}

/// Frames a flat segment stream into messages.
///
/// Owns the stream for its lifetime; dropping the framer releases it on
/// every path, parse failures included.
#[derive(Debug)]
pub struct EdiStream<T: Read> {
  reader: SegmentReader<T>,
  context: DelimiterContext,
  envelope: Vec<String>,
}

impl<T: Read + Seek> EdiStream<T> {
  /// Detects the delimiter context from the start of the stream, then
  /// rewinds so framing sees the interchange from the top.
  pub fn new(mut io_source: T) -> EdiResult<Self> {
    let context = detect_context(&mut io_source)?;
    io_source.seek(SeekFrom::Start(0))?;
    debug!(default_delimiters = context.is_default(), "interchange context detected");
    Ok(EdiStream {
      reader: SegmentReader::new(io_source),
      context,
      envelope: Vec::new(),
    })
  }

  /// Like [`EdiStream::new`], but overlays the detected delimiters onto a
  /// caller-supplied default context.
  pub fn with_context(mut io_source: T, default_context: DelimiterContext) -> EdiResult<Self> {
    let detected = detect_context(&mut io_source)?;
    io_source.seek(SeekFrom::Start(0))?;
    Ok(EdiStream {
      reader: SegmentReader::new(io_source),
      context: default_context.merge(&detected),
      envelope: Vec::new(),
    })
  }
}

impl<T: Read> EdiStream<T> {
  /// Reads segments until a trailer closes the current message.
  ///
  /// Each call resumes where the previous one stopped. `Ok(None)` means
  /// the stream was exhausted before a trailer appeared; callers use it
  /// to detect the end of the interchange.
  pub fn next_message(&mut self) -> EdiResult<Option<Vec<String>>> {
    let mut message: Vec<String> = Vec::new();
    loop {
      let segment = self.reader.read_segment(
        self.context.release_indicator(),
        self.context.segment_terminator(),
      )?;
      let Some(segment) = segment else {
        return Ok(None);
      };
      if segment.is_empty() {
        continue;
      }
      let name = get_segment_name(&segment, &self.context)?;
      match EnvelopeTag::classify(&name) {
        EnvelopeTag::Header => {
          message.push(segment.clone());
          self.envelope.push(segment);
        }
        EnvelopeTag::Trailer => {
          message.push(segment);
          // The header became message-scoped once its message closed;
          // its envelope entry is spent.
          self.envelope.pop();
          debug!(segments = message.len(), "message framed");
          return Ok(Some(message));
        }
        EnvelopeTag::Other => {
          message.push(segment);
        }
      }
    }
  }

  pub fn context(&self) -> &DelimiterContext {
    &self.context
  }

  /// Header segments retained across message boundaries.
  pub fn envelope(&self) -> &[String] {
    &self.envelope
  }
}

impl<T: Read> Iterator for EdiStream<T> {
  type Item = EdiResult<Vec<String>>;

  fn next(&mut self) -> Option<Self::Item> {
    match self.next_message() {
      Ok(Some(message)) => Some(Ok(message)),
      Ok(None) => None,
      Err(e) => Some(Err(e)),
    }
  }
}

fn detect_context<T: Read>(io_source: &mut T) -> EdiResult<DelimiterContext> {
  let mut buff = [0; HEADER_PROBE_LEN];
  let mut filled = 0;
  while filled < buff.len() {
    let size = io_source.read(&mut buff[filled..])?;
    if size == 0 {
      break;
    }
    filled += size;
  }
  let header: String = buff[..filled].iter().map(|b| *b as char).collect();
  DelimiterContext::from_raw_header(&header)
}
