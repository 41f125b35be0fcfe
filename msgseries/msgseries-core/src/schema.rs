//! Field tree describing the layout of one message type.

mod format;
mod types;

pub use format::format_schema;
pub use types::{FieldNode, FieldType, MessageSchema, PrimitiveKind, RecordDef};
