pub mod edifact_streamer {
  pub use crate::edi_delimiters::DelimiterContext;
  pub use crate::edi_delimiters::EdiFormat;
  pub use crate::edi_errors::EdiError;
  pub use crate::edi_errors::EdiResult;
  pub use crate::edi_segments::SegmentReader;
  pub use crate::edi_split::escape_split;
  pub use crate::edi_split::get_component_data_elements;
  pub use crate::edi_split::get_composite_data_elements;
  pub use crate::edi_split::get_repetitions;
  pub use crate::edi_split::get_segment_name;
  pub use crate::edi_split::get_segments;
  pub use crate::edi_split::to_edi_string;
  pub use crate::edi_stream::EdiStream;
}

mod edi_constants;
mod edi_delimiters;
mod edi_errors;
mod edi_segments;
mod edi_split;
mod edi_stream;
