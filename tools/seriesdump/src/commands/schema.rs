use std::{fs, path::PathBuf};

use anyhow::Result;
use clap::Args;
use msgseries::{McapSeriesReader, core::format_schema};

#[derive(Args)]
pub struct SchemaArgs {
    /// Path to the mcap file
    input: PathBuf,

    /// Topic to describe
    #[arg(short, long)]
    topic: String,

    /// Output file path (stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl SchemaArgs {
    pub fn run(self) -> Result<()> {
        let reader = McapSeriesReader::builder().with_default_providers().build();
        let schema = reader.topic_schema(&self.input, &self.topic)?;
        let text = format_schema(&schema)?;

        match self.output {
            Some(path) => fs::write(path, text)?,
            None => print!("{text}"),
        }
        Ok(())
    }
}
