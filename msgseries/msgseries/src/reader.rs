//! MCAP file reader that flattens every message into scalar series.

use std::{
    collections::{BTreeMap, BTreeSet, HashMap, hash_map::Entry},
    fs,
    path::Path,
    sync::Arc,
};

use memmap2::Mmap;
use msgseries_core::{
    EncodingKey, MemorySeriesStore, MessageEncoding, MessageSchema, SchemaEncoding,
    SchemaProvider, SeriesStore, TopicSchema,
};
#[cfg(feature = "ros2msg")]
use msgseries_ros2msg::Ros2MsgSchemaProvider;
use msgseries_parser::{MessageParser, ParserOptions, SchemaRegistry};

use crate::error::McapReaderError;

/// Reads an MCAP file and parses messages with parsers built from
/// registered [`SchemaProvider`]s.
///
/// Messages are processed in log order. One [`MessageParser`] is created
/// per channel on its first message, and all parsers of one read share a
/// [`SchemaRegistry`] so names/values topic pairs resolve across channels.
pub struct McapSeriesReader {
    providers: HashMap<EncodingKey, Arc<dyn SchemaProvider>>,
    options: ParserOptions,
    topics: Option<BTreeSet<String>>,
    fail_fast: bool,
}

/// Builder for configuring [`McapSeriesReader`].
pub struct McapSeriesReaderBuilder {
    providers: Vec<Arc<dyn SchemaProvider>>,
    options: ParserOptions,
    topics: Option<BTreeSet<String>>,
    fail_fast: bool,
}

/// Per-topic outcome of a read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicReport {
    pub parsed: u64,
    pub failed: u64,
    /// Why the topic was not parsed at all (no schema, no provider, ...).
    pub skipped: Option<String>,
}

/// Outcome of [`McapSeriesReader::read_into`], keyed by topic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadReport {
    pub topics: BTreeMap<String, TopicReport>,
}

impl ReadReport {
    pub fn topic(&self, topic: &str) -> Option<&TopicReport> {
        self.topics.get(topic)
    }

    pub fn parsed(&self) -> u64 {
        self.topics.values().map(|t| t.parsed).sum()
    }

    pub fn failed(&self) -> u64 {
        self.topics.values().map(|t| t.failed).sum()
    }
}

struct ChannelState {
    topic: String,
    parser: Option<MessageParser>,
    report: TopicReport,
}

impl McapSeriesReader {
    /// Create a builder for [`McapSeriesReader`].
    pub fn builder() -> McapSeriesReaderBuilder {
        McapSeriesReaderBuilder {
            providers: Vec::new(),
            options: ParserOptions::default(),
            topics: None,
            fail_fast: false,
        }
    }

    pub fn new() -> Self {
        Self {
            providers: HashMap::new(),
            options: ParserOptions::default(),
            topics: None,
            fail_fast: false,
        }
    }

    /// Register a provider for a specific encoding pair.
    pub fn register_provider(&mut self, provider: Box<dyn SchemaProvider>) {
        self.register_shared_provider(Arc::from(provider));
    }

    /// Register a shared provider for a specific encoding pair.
    pub fn register_shared_provider(&mut self, provider: Arc<dyn SchemaProvider>) {
        let key = provider.encoding_key();
        tracing::trace!(key = %key, "registered schema provider");
        self.providers.insert(key, provider);
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    fn mmap_file(&self, path: &Path) -> Result<Mmap, McapReaderError> {
        let file = fs::File::open(path)?;
        Ok(unsafe { Mmap::map(&file) }?)
    }

    fn wants(&self, topic: &str) -> bool {
        self.topics.as_ref().is_none_or(|topics| topics.contains(topic))
    }

    fn find_provider(
        &self,
        topic: &str,
        schema_enc: &SchemaEncoding,
        message_enc: &MessageEncoding,
    ) -> Result<&Arc<dyn SchemaProvider>, McapReaderError> {
        let key = EncodingKey::new(schema_enc.clone(), message_enc.clone());
        self.providers
            .get(&key)
            .ok_or_else(|| McapReaderError::NoProvider {
                schema_encoding: schema_enc.to_string(),
                message_encoding: message_enc.to_string(),
                topic: topic.to_string(),
            })
    }

    fn resolve_topic_schema(
        &self,
        channel: &mcap::Channel,
    ) -> Result<TopicSchema, McapReaderError> {
        let schema = channel
            .schema
            .as_ref()
            .ok_or_else(|| McapReaderError::SchemaNotAvailable {
                topic: channel.topic.clone(),
                channel_id: channel.id,
            })?;
        let schema_enc = SchemaEncoding::from(schema.encoding.as_str());
        let message_enc = MessageEncoding::from(channel.message_encoding.as_str());
        let provider = self.find_provider(&channel.topic, &schema_enc, &message_enc)?;
        provider
            .build_topic_schema(&schema.name, &schema.data)
            .map_err(|source| McapReaderError::SchemaDerivationFailed {
                topic: channel.topic.clone(),
                source,
            })
    }

    fn open_channel(
        &self,
        channel: &mcap::Channel,
        registry: &SchemaRegistry,
    ) -> Result<ChannelState, McapReaderError> {
        let mut state = ChannelState {
            topic: channel.topic.clone(),
            parser: None,
            report: TopicReport::default(),
        };
        match self.resolve_topic_schema(channel) {
            Ok(topic_schema) => {
                let parser =
                    MessageParser::from_topic_schema(&channel.topic, topic_schema, registry.clone())
                        .with_options(self.options.clone());
                state.parser = Some(parser);
            }
            Err(err) if self.fail_fast => return Err(err),
            Err(err) => {
                tracing::warn!(topic = %channel.topic, error = %err, "skipping topic");
                state.report.skipped = Some(err.to_string());
            }
        }
        Ok(state)
    }

    /// Parse every selected message of the file into `store`.
    ///
    /// Each message is stamped with its `log_time` unless the parser finds a
    /// header stamp. Failed messages are counted and logged; with
    /// [`fail_fast`](McapSeriesReaderBuilder::fail_fast) the first failure
    /// aborts the read instead.
    pub fn read_into<S: SeriesStore + ?Sized>(
        &self,
        path: &Path,
        store: &mut S,
    ) -> Result<ReadReport, McapReaderError> {
        let mmap = self.mmap_file(path)?;
        let registry = SchemaRegistry::new();
        let mut channels: HashMap<u16, ChannelState> = HashMap::new();

        for message in mcap::MessageStream::new(&mmap)? {
            let message = message?;
            let channel = &message.channel;
            if !self.wants(&channel.topic) {
                continue;
            }

            let state = match channels.entry(channel.id) {
                Entry::Occupied(entry) => entry.into_mut(),
                Entry::Vacant(entry) => {
                    entry.insert(self.open_channel(channel, &registry)?)
                }
            };
            let Some(parser) = state.parser.as_mut() else {
                continue;
            };

            match parser.parse(&mut *store, &message.data, log_time_secs(message.log_time)) {
                Ok(_) => state.report.parsed += 1,
                Err(source) if self.fail_fast => {
                    return Err(McapReaderError::MessageParseFailed {
                        topic: state.topic.clone(),
                        log_time: message.log_time,
                        source,
                    });
                }
                Err(err) => {
                    state.report.failed += 1;
                    tracing::warn!(
                        topic = %state.topic,
                        log_time = message.log_time,
                        error = %err,
                        "failed to parse message"
                    );
                }
            }
        }

        let mut report = ReadReport::default();
        for state in channels.into_values() {
            let entry = report.topics.entry(state.topic).or_default();
            entry.parsed += state.report.parsed;
            entry.failed += state.report.failed;
            if entry.skipped.is_none() {
                entry.skipped = state.report.skipped;
            }
        }
        Ok(report)
    }

    /// Parse the file into a fresh [`MemorySeriesStore`].
    pub fn read(&self, path: &Path) -> Result<(MemorySeriesStore, ReadReport), McapReaderError> {
        let mut store = MemorySeriesStore::new();
        let report = self.read_into(path, &mut store)?;
        Ok((store, report))
    }

    /// Resolve and return the field tree for a topic without reading message
    /// payloads.
    ///
    /// The MCAP summary section is required.
    pub fn topic_schema(
        &self,
        path: &Path,
        topic: &str,
    ) -> Result<Arc<MessageSchema>, McapReaderError> {
        let mmap = self.mmap_file(path)?;
        let summary =
            mcap::read::Summary::read(&mmap)?.ok_or_else(|| McapReaderError::SummaryNotAvailable {
                path: path.display().to_string(),
            })?;
        let channel = get_channel_from_summary(&summary, topic)?;
        Ok(self.resolve_topic_schema(channel)?.schema)
    }
}

impl Default for McapSeriesReader {
    fn default() -> Self {
        Self::new()
    }
}

impl McapSeriesReaderBuilder {
    /// Register a schema provider.
    pub fn with_provider(mut self, provider: Box<dyn SchemaProvider>) -> Self {
        self.providers.push(Arc::from(provider));
        self
    }

    /// Register all built-in providers (ROS 2 .msg over CDR).
    pub fn with_default_providers(self) -> Self {
        let s = self;
        #[cfg(feature = "ros2msg")]
        let s = s.with_provider(Box::new(Ros2MsgSchemaProvider::new()));
        s
    }

    /// Options applied to every parser the reader creates.
    pub fn with_options(mut self, options: ParserOptions) -> Self {
        self.options = options;
        self
    }

    /// Restrict the read to these topics. Other channels are ignored.
    pub fn with_topics<I, T>(mut self, topics: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.topics = Some(topics.into_iter().map(Into::into).collect());
        self
    }

    /// Abort on the first unusable channel or failed message instead of
    /// counting and continuing.
    pub fn fail_fast(mut self, enable: bool) -> Self {
        self.fail_fast = enable;
        self
    }

    /// Build the reader.
    pub fn build(self) -> McapSeriesReader {
        let mut reader = McapSeriesReader::new();
        reader.options = self.options;
        reader.topics = self.topics;
        reader.fail_fast = self.fail_fast;
        for provider in self.providers {
            reader.register_shared_provider(provider);
        }
        reader
    }
}

fn log_time_secs(log_time: u64) -> f64 {
    log_time as f64 / 1e9
}

fn get_channel_from_summary<'a>(
    summary: &'a mcap::read::Summary,
    topic: &str,
) -> Result<&'a Arc<mcap::Channel<'a>>, McapReaderError> {
    let mut channels = summary.channels.values().filter(|ch| ch.topic == topic);
    let first = channels
        .next()
        .ok_or_else(|| McapReaderError::TopicNotFound {
            topic: topic.to_string(),
        })?;
    if channels.next().is_some() {
        return Err(McapReaderError::MultipleChannels {
            topic: topic.to_string(),
        });
    }
    Ok(first)
}
