use clap::Args;
use msgseries::{
    McapSeriesReader, ReadReport,
    parser::{ParserOptions, TruncationPolicy},
};

/// Flags shared by the commands that parse message payloads.
#[derive(Args)]
pub struct ReadOptions {
    /// Only parse these topics (repeatable)
    #[arg(short, long = "topic")]
    topics: Vec<String>,

    /// Array policy: clamp[:N] | strict[:N] | permissive
    #[arg(long, default_value_t = TruncationPolicy::default())]
    truncation: TruncationPolicy,

    /// Stamp samples with log_time even when the message has a header
    #[arg(long)]
    no_header_stamp: bool,

    /// Stop at the first message that fails to parse
    #[arg(long)]
    fail_fast: bool,
}

impl ReadOptions {
    pub fn reader(&self) -> McapSeriesReader {
        let options = ParserOptions::default()
            .with_truncation(self.truncation)
            .with_header_stamp(!self.no_header_stamp);
        let builder = McapSeriesReader::builder()
            .with_default_providers()
            .with_options(options)
            .fail_fast(self.fail_fast);
        if self.topics.is_empty() {
            builder.build()
        } else {
            builder.with_topics(self.topics.iter().cloned()).build()
        }
    }
}

/// Print per-topic outcomes to stderr, keeping stdout for data.
pub fn print_report(report: &ReadReport) {
    for (topic, outcome) in &report.topics {
        match &outcome.skipped {
            Some(reason) => eprintln!("{topic}: skipped ({reason})"),
            None if outcome.failed > 0 => eprintln!(
                "{topic}: {} parsed, {} failed",
                outcome.parsed, outcome.failed
            ),
            None => {}
        }
    }
}
