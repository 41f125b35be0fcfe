//! Flattening of decoded messages into scalar time series.
//!
//! A [`MessageParser`] is bound to one message source (topic), its
//! [`MessageSchema`](msgseries_core::MessageSchema) and a
//! [`Deserializer`](msgseries_core::Deserializer). On the first message it
//! picks a [`HandlerKind`]: a dedicated routine for well-known types
//! (headers, poses, IMU, odometry, diagnostics, joint states, TF, debug,
//! statistics and TSL signal sets, DataTamer snapshots) or generic schema
//! descent. Each call then writes one sample
//! per numeric leaf into a [`SeriesStore`](msgseries_core::SeriesStore)
//! under a slash-joined [`FieldPath`](msgseries_core::FieldPath).
//!
//! Parsers that exchange signal names (names/values message pairs) share a
//! [`SchemaRegistry`]. Oversized runtime arrays are handled according to
//! the parser's [`TruncationPolicy`].

mod context;
mod error;
mod generic;
mod handlers;
mod parser;
mod policy;
mod registry;
mod shapes;

pub use error::ParseError;
pub use handlers::HandlerKind;
pub use parser::{MessageParser, ParserOptions};
pub use policy::{DEFAULT_MAX_ARRAY_SIZE, PolicyParseError, TruncationPolicy};
pub use registry::SchemaRegistry;
