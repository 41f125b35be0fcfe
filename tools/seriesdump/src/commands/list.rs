use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::options::{ReadOptions, print_report};

#[derive(Args)]
pub struct ListArgs {
    /// Path to the mcap file
    input: PathBuf,

    #[command(flatten)]
    read: ReadOptions,
}

impl ListArgs {
    pub fn run(self) -> Result<()> {
        let reader = self.read.reader();
        let (store, report) = reader.read(&self.input)?;
        print_report(&report);
        tracing::debug!(
            series = store.len(),
            points = store.point_count(),
            "read complete"
        );

        let mut rows: Vec<(&str, usize)> = store
            .iter()
            .map(|s| (s.path().as_str(), s.len()))
            .collect();
        rows.sort_unstable();
        let width = rows.iter().map(|(path, _)| path.len()).max().unwrap_or(0);
        for (path, count) in rows {
            println!("{path:<width$}  {count}");
        }
        Ok(())
    }
}
