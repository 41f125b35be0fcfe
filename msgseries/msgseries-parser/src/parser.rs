//! Per-source message parser.

use std::{collections::HashMap, sync::Arc};

use msgseries_core::{
    Deserializer, FieldPath, MessageSchema, SeriesHandle, SeriesStore, TopicSchema,
};

use crate::{
    context::{ParseContext, Warnings},
    error::ParseError,
    handlers::HandlerKind,
    policy::TruncationPolicy,
    registry::SchemaRegistry,
    shapes::{HeaderLayout, find_header_layout, header_layout},
};

/// Per-source parsing options.
#[derive(Debug, Clone, PartialEq)]
pub struct ParserOptions {
    pub truncation: TruncationPolicy,
    /// Use the message's top-level header stamp instead of the caller's
    /// timestamp when one is present.
    pub use_header_stamp: bool,
    /// Registry channel for names/values message pairs. Defaults to the
    /// topic without its last segment.
    pub debug_channel: Option<String>,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            truncation: TruncationPolicy::default(),
            use_header_stamp: true,
            debug_channel: None,
        }
    }
}

impl ParserOptions {
    pub fn with_truncation(mut self, truncation: TruncationPolicy) -> Self {
        self.truncation = truncation;
        self
    }

    pub fn with_header_stamp(mut self, enable: bool) -> Self {
        self.use_header_stamp = enable;
        self
    }

    pub fn with_debug_channel(mut self, channel: impl Into<String>) -> Self {
        self.debug_channel = Some(channel.into());
        self
    }
}

/// Flattens the messages of one source into scalar series.
///
/// The handler is chosen from the schema on the first [`parse`] and kept
/// for the lifetime of the parser. Series handles are cached as well, so
/// every call must receive the same store.
///
/// [`parse`]: MessageParser::parse
pub struct MessageParser {
    topic: String,
    prefix: FieldPath,
    schema: Arc<MessageSchema>,
    deserializer: Box<dyn Deserializer>,
    registry: SchemaRegistry,
    options: ParserOptions,
    channel: String,
    handler: Option<HandlerKind>,
    header_layout: HeaderLayout,
    has_header: bool,
    handles: HashMap<FieldPath, SeriesHandle>,
    warnings: Warnings,
}

impl MessageParser {
    pub fn new(
        topic: &str,
        schema: Arc<MessageSchema>,
        deserializer: Box<dyn Deserializer>,
        registry: SchemaRegistry,
    ) -> Self {
        Self {
            topic: topic.to_string(),
            prefix: FieldPath::root(topic),
            schema,
            deserializer,
            registry,
            options: ParserOptions::default(),
            channel: default_channel(topic),
            handler: None,
            header_layout: HeaderLayout::default(),
            has_header: false,
            handles: HashMap::new(),
            warnings: Warnings::default(),
        }
    }

    pub fn from_topic_schema(topic: &str, topic_schema: TopicSchema, registry: SchemaRegistry) -> Self {
        Self::new(topic, topic_schema.schema, topic_schema.deserializer, registry)
    }

    pub fn with_options(mut self, options: ParserOptions) -> Self {
        self.channel = options
            .debug_channel
            .clone()
            .unwrap_or_else(|| default_channel(&self.topic));
        self.options = options;
        self
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn schema(&self) -> &MessageSchema {
        &self.schema
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Handler in use; `None` until the first message.
    pub fn handler(&self) -> Option<HandlerKind> {
        self.handler
    }

    /// Whether the message has a top-level `header`. Known after the first
    /// message.
    pub fn has_header(&self) -> bool {
        self.has_header
    }

    pub fn debug_channel(&self) -> &str {
        &self.channel
    }

    pub fn set_large_arrays_policy(&mut self, clamp: bool, max_size: usize) {
        self.options.truncation.clamp = clamp;
        self.options.truncation.max_size = max_size;
    }

    pub fn enable_truncation_check(&mut self, enable: bool) {
        self.options.truncation.strict_check = enable;
    }

    pub fn set_use_header_stamp(&mut self, enable: bool) {
        self.options.use_header_stamp = enable;
    }

    pub fn set_debug_channel(&mut self, channel: &str) {
        self.options.debug_channel = Some(channel.to_string());
        self.channel = channel.to_string();
    }

    /// Decode `raw` and append its samples to `store`.
    ///
    /// Returns the timestamp given to the samples: the header stamp when the
    /// message has one and header stamps are enabled, `timestamp_in`
    /// otherwise. On error, samples decoded before the failure are still
    /// appended.
    pub fn parse<S: SeriesStore + ?Sized>(
        &mut self,
        store: &mut S,
        raw: &[u8],
        timestamp_in: f64,
    ) -> Result<f64, ParseError> {
        let handler = self.select_handler();
        self.deserializer
            .init(raw)
            .map_err(|source| ParseError::mismatch(&self.prefix, source))?;

        let mut ctx = ParseContext::new(
            self.deserializer.as_mut(),
            &self.registry,
            &self.channel,
            self.options.truncation,
            self.header_layout,
            &mut self.warnings,
        );
        let result = handler.run(&mut ctx, &self.schema.root, &self.prefix);
        let (writes, stamp) = ctx.finish();

        let timestamp = match stamp {
            Some(stamp) if self.options.use_header_stamp => stamp,
            _ => timestamp_in,
        };
        for (path, value) in writes {
            let handle = *self
                .handles
                .entry(path)
                .or_insert_with_key(|path| store.get_or_create(path));
            store.append(handle, timestamp, value);
        }

        if result.is_ok() && self.deserializer.bytes_left() > 0 {
            tracing::trace!(
                topic = %self.topic,
                bytes_left = self.deserializer.bytes_left(),
                "trailing bytes after message"
            );
        }
        result.map(|()| timestamp)
    }

    fn select_handler(&mut self) -> HandlerKind {
        if let Some(handler) = self.handler {
            return handler;
        }
        let root = &self.schema.root;
        let handler = HandlerKind::select(root);
        self.header_layout = find_header_layout(root).unwrap_or_default();
        self.has_header = handler == HandlerKind::Header
            || root
                .field("header")
                .and_then(|f| f.ty.as_record())
                .and_then(header_layout)
                .is_some();
        tracing::debug!(
            topic = %self.topic,
            type_name = %root.type_name,
            handler = ?handler,
            has_header = self.has_header,
            "selected handler"
        );
        self.handler = Some(handler);
        handler
    }
}

/// Topic without its last segment; a single-segment topic is its own channel.
fn default_channel(topic: &str) -> String {
    let normalized = FieldPath::root(topic);
    match normalized.as_str().rsplit_once('/') {
        Some((parent, _)) => parent.to_string(),
        None => normalized.to_string(),
    }
}
