//! Pluggable resolution of channel schemas into field trees.

use std::sync::Arc;

use crate::{
    deserializer::Deserializer, encoding::EncodingKey, error::SchemaError,
    schema::MessageSchema,
};

/// Everything a parser needs for one message source: the resolved field
/// tree and a deserializer that understands the payload encoding.
pub struct TopicSchema {
    pub schema: Arc<MessageSchema>,
    pub deserializer: Box<dyn Deserializer>,
}

/// Factory that turns channel schema metadata into a [`TopicSchema`].
///
/// Implementations are registered with the reader and dispatched on
/// [`EncodingKey`]. One [`TopicSchema`] is built per message source.
pub trait SchemaProvider: Send + Sync {
    /// Returns the encoding pair this provider handles.
    fn encoding_key(&self) -> EncodingKey;

    /// Resolve `schema_data` (named `schema_name`) for a new message source.
    fn build_topic_schema(
        &self,
        schema_name: &str,
        schema_data: &[u8],
    ) -> Result<TopicSchema, SchemaError>;
}
