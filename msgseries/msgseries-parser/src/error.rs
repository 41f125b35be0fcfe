//! Error types for message parsing.

use msgseries_core::{DecodeError, FieldPath};

/// Failure of one [`MessageParser::parse`](crate::MessageParser::parse) call.
///
/// Errors are local to the message that produced them; the parser stays
/// usable for the next message.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    /// The payload does not match the shape being decoded at `path`.
    #[error("payload does not match schema at '{path}': {source}")]
    SchemaMismatch {
        path: String,
        #[source]
        source: DecodeError,
    },

    /// A runtime array length exceeded the configured bound under the strict policy.
    #[error("array at '{path}' has {len} elements, limit is {max}")]
    OversizedArray { path: String, len: usize, max: usize },

    /// A values message arrived before the names of its channel were announced.
    #[error("no signal names registered for channel '{channel}'")]
    MissingSchema { channel: String },
}

impl ParseError {
    pub(crate) fn mismatch(path: &FieldPath, source: DecodeError) -> Self {
        Self::SchemaMismatch {
            path: path.to_string(),
            source,
        }
    }
}
