//! Shared ROS 2 type system and CDR decoding used by `msgseries-ros2msg`.
//!
//! Key components:
//! - [`ast`] — struct definitions produced by schema text parsers
//! - [`type_resolver`] — type-name resolution and injection of ROS 2 builtin types
//! - [`schema`] — [`ResolvedSchema`] → [`msgseries_core::MessageSchema`] conversion
//! - [`cdr`] — [`CdrDeserializer`], the [`msgseries_core::Deserializer`] for CDR payloads

pub mod ast;
mod cdr;
mod error;
mod schema;
mod type_resolver;

pub use ast::{FieldDef, ParsedSection, PrimitiveType, StructDef, TypeExpr};
pub use cdr::CdrDeserializer;
pub use error::Ros2Error;
pub use schema::resolved_schema_to_message_schema;
pub use type_resolver::{
    ResolvedField, ResolvedSchema, ResolvedStruct, ResolvedType, ensure_builtin_structs,
    resolve_parsed_section, resolve_struct,
};
