use std::fmt;
use std::sync::Arc;

/// Location of a decode failure inside a JSON input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub line: usize,
    pub col: usize,
}

/// Detailed error information with source location
#[derive(Debug, Clone)]
pub struct ErrorDetails {
    pub message: String,
    pub span: Span,
    pub source_id: String,
    pub source_text: Arc<str>,
}

impl ErrorDetails {
    /// Byte offset of the span inside `source_text`, clamped to the text length
    pub fn offset(&self) -> usize {
        let mut offset = 0;
        for (index, line) in self.source_text.split_inclusive('\n').enumerate() {
            if index + 1 == self.span.line {
                let col = self.span.col.saturating_sub(1).min(line.len());
                return offset + col;
            }
            offset += line.len();
        }
        self.source_text.len()
    }
}

/// Error types for loading models and situations
#[derive(Debug, Clone)]
pub enum FootprintError {
    /// The rule registry could not be decoded
    Registry(Box<ErrorDetails>),

    /// A situation could not be decoded
    Situation(Box<ErrorDetails>),

    /// A fun-facts catalogue could not be decoded
    Catalogue(Box<ErrorDetails>),

    /// A dotted-name was re-entered while it was still being resolved
    CircularReference(String),

    /// Resource limit exceeded
    ResourceLimitExceeded {
        limit_name: String,
        limit_value: String,
        actual_value: String,
        suggestion: String,
    },
}

impl FootprintError {
    /// Create a registry decode error from a serde_json failure
    pub fn registry(
        err: &serde_json::Error,
        source_id: impl Into<String>,
        source_text: Arc<str>,
    ) -> Self {
        Self::Registry(Box::new(details_from_json(err, source_id, source_text)))
    }

    /// Create a situation decode error from a serde_json failure
    pub fn situation(
        err: &serde_json::Error,
        source_id: impl Into<String>,
        source_text: Arc<str>,
    ) -> Self {
        Self::Situation(Box::new(details_from_json(err, source_id, source_text)))
    }

    /// Create a catalogue decode error from a serde_json failure
    pub fn catalogue(
        err: &serde_json::Error,
        source_id: impl Into<String>,
        source_text: Arc<str>,
    ) -> Self {
        Self::Catalogue(Box::new(details_from_json(err, source_id, source_text)))
    }

    /// Source details for decode errors
    pub fn details(&self) -> Option<&ErrorDetails> {
        match self {
            FootprintError::Registry(details)
            | FootprintError::Situation(details)
            | FootprintError::Catalogue(details) => Some(details),
            _ => None,
        }
    }

    pub(crate) fn input_too_large(limit_name: &str, limit: usize, actual: usize) -> Self {
        Self::ResourceLimitExceeded {
            limit_name: limit_name.to_string(),
            limit_value: format!("{} bytes", limit),
            actual_value: format!("{} bytes", actual),
            suggestion: format!("Reduce the input to {} bytes or less", limit),
        }
    }
}

fn details_from_json(
    err: &serde_json::Error,
    source_id: impl Into<String>,
    source_text: Arc<str>,
) -> ErrorDetails {
    // serde_json appends " at line L column C" to its Display output
    let message = err.to_string();
    let message = match message.rfind(" at line ") {
        Some(index) => message[..index].to_string(),
        None => message,
    };
    ErrorDetails {
        message,
        span: Span {
            line: err.line(),
            col: err.column(),
        },
        source_id: source_id.into(),
        source_text,
    }
}

impl fmt::Display for FootprintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FootprintError::Registry(details) => {
                write!(
                    f,
                    "Registry error: {} at {}:{}:{}",
                    details.message, details.source_id, details.span.line, details.span.col
                )
            }
            FootprintError::Situation(details) => {
                write!(
                    f,
                    "Situation error: {} at {}:{}:{}",
                    details.message, details.source_id, details.span.line, details.span.col
                )
            }
            FootprintError::Catalogue(details) => {
                write!(
                    f,
                    "Catalogue error: {} at {}:{}:{}",
                    details.message, details.source_id, details.span.line, details.span.col
                )
            }
            FootprintError::CircularReference(msg) => write!(f, "Circular reference: {}", msg),
            FootprintError::ResourceLimitExceeded {
                limit_name,
                limit_value,
                actual_value,
                suggestion,
            } => {
                write!(
                    f,
                    "Resource limit exceeded: {} (limit: {}, actual: {}). {}",
                    limit_name, limit_value, actual_value, suggestion
                )
            }
        }
    }
}

impl std::error::Error for FootprintError {}

