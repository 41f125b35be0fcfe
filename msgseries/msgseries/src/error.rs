//! Error types for the MCAP reader.

use msgseries_core::SchemaError;
use msgseries_parser::ParseError;

/// Errors produced by [`McapSeriesReader`](crate::McapSeriesReader).
#[derive(Debug, thiserror::Error)]
pub enum McapReaderError {
    /// I/O error while opening or memory-mapping a file.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Error from the underlying `mcap` crate (bad magic, CRC mismatch, ...).
    #[error(transparent)]
    Mcap(#[from] mcap::McapError),

    /// The MCAP file has no summary section.
    #[error("MCAP summary not available in {path}")]
    SummaryNotAvailable { path: String },

    /// The requested topic was not found in the MCAP file.
    #[error("topic '{topic}' not found")]
    TopicNotFound { topic: String },

    /// Multiple channels found for the same topic in the MCAP file.
    #[error("multiple channels found for topic '{topic}'")]
    MultipleChannels { topic: String },

    /// A channel that was about to be parsed has no schema attached.
    #[error("schema not available for topic '{topic}' (channel id {channel_id})")]
    SchemaNotAvailable { topic: String, channel_id: u16 },

    /// No [`SchemaProvider`](msgseries_core::SchemaProvider) was registered
    /// for the encoding pair found on a channel.
    #[error(
        "no schema provider registered for schema_encoding='{schema_encoding}', message_encoding='{message_encoding}' on topic '{topic}'"
    )]
    NoProvider {
        schema_encoding: String,
        message_encoding: String,
        topic: String,
    },

    /// The provider could not turn the channel schema into a field tree.
    #[error("schema derivation failed for topic '{topic}': {source}")]
    SchemaDerivationFailed {
        topic: String,
        #[source]
        source: SchemaError,
    },

    /// A message failed to parse. Only returned in fail-fast mode.
    #[error("message parse failed for topic '{topic}' at log_time {log_time}: {source}")]
    MessageParseFailed {
        topic: String,
        log_time: u64,
        #[source]
        source: ParseError,
    },
}
