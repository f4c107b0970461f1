use thiserror::Error;

pub type EdiResult<T> = Result<T, EdiError>;

/// Errors reported by the tokenizer and framer.
#[derive(Debug, Error)]
pub enum EdiError {
  /// The input does not look like a supported interchange, or its
  /// delimiter declaration is malformed.
  #[error("{message}")]
  Format {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
  },

  /// Caller misuse: an empty required input or an unconfigured context.
  #[error("invalid argument: {0}")]
  InvalidArgument(&'static str),

  /// Transport failures pass through unmodified.
  #[error(transparent)]
  Io(#[from] std::io::Error),
}

impl EdiError {
  pub fn format(message: impl Into<String>) -> Self {
    EdiError::Format {
      message: message.into(),
      source: None,
    }
  }

  pub fn format_with_cause(
    message: impl Into<String>,
    cause: impl std::error::Error + Send + Sync + 'static,
  ) -> Self {
    EdiError::Format {
      message: message.into(),
      source: Some(Box::new(cause)),
    }
  }
}
