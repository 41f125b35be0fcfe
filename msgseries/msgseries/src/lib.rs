mod error;
mod reader;

pub use error::McapReaderError;
pub use msgseries_core as core;
pub use msgseries_parser as parser;
pub use reader::{McapSeriesReader, McapSeriesReaderBuilder, ReadReport, TopicReport};
