//! Encoding-agnostic core types and capability contracts for `msgseries`.
//!
//! This crate defines the schema tree ([`MessageSchema`]) that message
//! parsers walk, the hierarchical [`FieldPath`] naming every series, and the
//! two external capabilities the parser is written against:
//! [`Deserializer`] (sequential primitive decoding) and [`SeriesStore`]
//! (append-only series storage). [`MemorySeriesStore`] is the in-process
//! store used by the reader and the tests.

mod deserializer;
mod encoding;
mod error;
mod path;
mod provider;
mod schema;
mod store;
mod value;

pub use deserializer::Deserializer;
pub use encoding::{EncodingKey, MessageEncoding, SchemaEncoding};
pub use error::{DecodeError, SchemaError, ValueTypeError};
pub use path::FieldPath;
pub use provider::{SchemaProvider, TopicSchema};
pub use schema::{FieldNode, FieldType, MessageSchema, PrimitiveKind, RecordDef, format_schema};
pub use store::{MemorySeriesStore, Series, SeriesHandle, SeriesStore};
pub use value::Value;
