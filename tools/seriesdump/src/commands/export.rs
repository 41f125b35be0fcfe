use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::{
    format::OutputFormat,
    options::{ReadOptions, print_report},
    writer::{BatchWriter, long_schema, series_batch},
};

#[derive(Args)]
pub struct ExportArgs {
    /// Path to the mcap file
    input: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Csv)]
    format: OutputFormat,

    /// Output file path (stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[command(flatten)]
    read: ReadOptions,
}

impl ExportArgs {
    pub fn run(self) -> Result<()> {
        let reader = self.read.reader();
        let (store, report) = reader.read(&self.input)?;
        print_report(&report);
        tracing::debug!(
            series = store.len(),
            points = store.point_count(),
            "read complete"
        );

        let mut series: Vec<_> = store.iter().filter(|s| !s.is_empty()).collect();
        if series.is_empty() {
            anyhow::bail!("No samples found in {}", self.input.display());
        }
        series.sort_by(|a, b| a.path().as_str().cmp(b.path().as_str()));

        let schema = long_schema();
        let mut writer = BatchWriter::new(self.format, self.output.as_deref())?;
        for s in series {
            writer.write_batch(&series_batch(&schema, s)?)?;
        }
        writer.finish()?;

        if let Some(path) = &self.output {
            eprintln!("Written {} samples to {}", store.point_count(), path.display());
        }
        Ok(())
    }
}
