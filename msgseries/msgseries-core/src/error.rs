//! Error types for the decoding layer.

/// Error returned by [`Deserializer`](crate::Deserializer) implementations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecodeError {
    /// The payload ended before the requested value could be read.
    #[error("unexpected end of payload: needed {needed} bytes, {remaining} left")]
    UnexpectedEof { needed: usize, remaining: usize },

    /// The bytes were present but do not form a valid value.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// The payload uses a feature the deserializer does not implement.
    #[error("unsupported: {0}")]
    Unsupported(String),

    /// A decoded value had a different type than the caller required.
    #[error(transparent)]
    ValueType(#[from] ValueTypeError),
}

/// Error returned by [`SchemaProvider`](crate::SchemaProvider) implementations.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// Schema text could not be parsed.
    #[error("failed to parse schema '{schema_name}': {source}")]
    SchemaParse {
        schema_name: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Schema text parsed but references are missing or inconsistent.
    #[error("invalid schema '{schema_name}': {detail}")]
    SchemaInvalid { schema_name: String, detail: String },
}

/// A [`Value`](crate::Value) was accessed as the wrong variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected {expected}, got {actual}")]
pub struct ValueTypeError {
    pub expected: String,
    pub actual: &'static str,
}

impl ValueTypeError {
    pub fn new(expected: impl Into<String>, actual: &'static str) -> Self {
        Self {
            expected: expected.into(),
            actual,
        }
    }
}
