//! ROS 2 .msg schema provider for `msgseries`.
//!
//! Implements [`SchemaProvider`] for the
//! `(schema_encoding = ros2msg, message_encoding = cdr)` key.
//!
//! # Pipeline
//!
//! ```text
//! schema bytes (UTF-8 .msg, with `MSG:` dependency sections)
//!   └─ split_sections          – one section per type definition
//!       └─ parse_msg           – re_ros_msg parser → StructDef
//!           └─ resolve_parsed_section – type resolution → ResolvedSchema
//!               └─ resolved_schema_to_message_schema → MessageSchema
//! ```
//!
//! Every [`TopicSchema`] gets its own [`CdrDeserializer`].

mod bundle;
mod parser;

use std::sync::Arc;

use msgseries_core::{
    EncodingKey, MessageEncoding, MessageSchema, SchemaEncoding, SchemaError, SchemaProvider,
    TopicSchema,
};
use msgseries_ros2_common::{
    CdrDeserializer, ParsedSection, Ros2Error, resolve_parsed_section,
    resolved_schema_to_message_schema,
};

pub use bundle::{MsgSection, split_sections};
pub use parser::{parse_msg, parse_schema_name};

/// [`SchemaProvider`] for ROS 2 .msg schemas with CDR-encoded messages.
#[derive(Debug, Default)]
pub struct Ros2MsgSchemaProvider;

impl Ros2MsgSchemaProvider {
    pub fn new() -> Self {
        Self
    }
}

impl SchemaProvider for Ros2MsgSchemaProvider {
    fn encoding_key(&self) -> EncodingKey {
        EncodingKey::new(SchemaEncoding::Ros2Msg, MessageEncoding::Cdr)
    }

    fn build_topic_schema(
        &self,
        schema_name: &str,
        schema_data: &[u8],
    ) -> Result<TopicSchema, SchemaError> {
        let schema = resolve_message_schema(schema_name, schema_data)?;
        Ok(TopicSchema {
            schema: Arc::new(schema),
            deserializer: Box::new(CdrDeserializer::new()),
        })
    }
}

/// Parse and resolve a recorded .msg schema into a [`MessageSchema`].
pub fn resolve_message_schema(
    schema_name: &str,
    schema_data: &[u8],
) -> Result<MessageSchema, SchemaError> {
    let parse_err = |source: Box<dyn std::error::Error + Send + Sync>| SchemaError::SchemaParse {
        schema_name: schema_name.to_string(),
        source,
    };
    let invalid = |e: Ros2Error| SchemaError::SchemaInvalid {
        schema_name: schema_name.to_string(),
        detail: e.0,
    };

    let text = std::str::from_utf8(schema_data).map_err(|e| parse_err(Box::new(e)))?;
    let sections = split_sections(schema_name, text).map_err(|e| parse_err(Box::new(e)))?;

    let mut parsed = ParsedSection::default();
    let mut root = None;
    for section in sections {
        let def = parse_msg(&section.type_name, &section.body).map_err(|e| parse_err(Box::new(e)))?;
        let key = def.full_name.clone();
        root.get_or_insert_with(|| key.clone());
        if parsed.structs.contains_key(&key) {
            tracing::trace!(type_name = %section.type_name, "ignoring repeated msg section");
            continue;
        }
        parsed.structs.insert(key, def);
    }
    let root = root.ok_or_else(|| invalid(Ros2Error("schema has no sections".to_string())))?;

    let resolved = resolve_parsed_section(parsed, root).map_err(invalid)?;
    let schema = resolved_schema_to_message_schema(&resolved).map_err(invalid)?;
    tracing::debug!(schema_name, fields = schema.root.fields.len(), "resolved msg schema");
    Ok(schema)
}
