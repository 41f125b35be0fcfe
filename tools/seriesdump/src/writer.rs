use std::{
    fs,
    io::{self, BufWriter, Write},
    path::Path,
    sync::Arc,
};

use anyhow::Result;
use arrow::{
    array::{ArrayRef, Float64Array, StringArray},
    datatypes::{DataType, Field, Schema, SchemaRef},
    record_batch::RecordBatch,
};
use msgseries::core::Series;

use crate::format::OutputFormat;

/// Long-format schema: one row per sample.
pub fn long_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new("path", DataType::Utf8, false),
        Field::new("timestamp", DataType::Float64, false),
        Field::new("value", DataType::Float64, false),
    ]))
}

/// All samples of one series as a batch of [`long_schema`] rows.
pub fn series_batch(schema: &SchemaRef, series: &Series) -> Result<RecordBatch> {
    let n = series.len();
    let paths: ArrayRef = Arc::new(StringArray::from(vec![series.path().as_str(); n]));
    let timestamps: ArrayRef = Arc::new(Float64Array::from_iter_values(
        series.points().iter().map(|&(t, _)| t),
    ));
    let values: ArrayRef = Arc::new(Float64Array::from_iter_values(series.values()));
    Ok(RecordBatch::try_new(
        Arc::clone(schema),
        vec![paths, timestamps, values],
    )?)
}

/// Streams batches to a file or stdout in the selected format.
pub struct BatchWriter {
    dest: Box<dyn Write>,
    format: OutputFormat,
    header_written: bool,
}

impl BatchWriter {
    pub fn new(format: OutputFormat, output: Option<&Path>) -> Result<Self> {
        let dest: Box<dyn Write> = match output {
            Some(path) => Box::new(BufWriter::new(fs::File::create(path)?)),
            None => Box::new(BufWriter::new(io::stdout().lock())),
        };
        Ok(Self {
            dest,
            format,
            header_written: false,
        })
    }

    pub fn write_batch(&mut self, batch: &RecordBatch) -> Result<()> {
        match self.format {
            OutputFormat::Csv => {
                let mut csv_writer = arrow::csv::WriterBuilder::new()
                    .with_header(!self.header_written)
                    .build(&mut self.dest);
                csv_writer.write(batch)?;
                self.header_written = true;
            }
            OutputFormat::Jsonl => {
                let mut json_writer = arrow::json::LineDelimitedWriter::new(&mut self.dest);
                json_writer.write(batch)?;
                json_writer.finish()?;
            }
        }
        Ok(())
    }

    pub fn finish(mut self) -> Result<()> {
        self.dest.flush()?;
        Ok(())
    }
}
