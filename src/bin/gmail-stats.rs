#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! CLI reporting per-sender message counts for a Gmail mailbox

use clap::Parser;
use gmail_inbox_stats::{
    GmailClient, GmailConfig, Label, MailClient, Report, StatsConfig, StatsPipeline,
};
use serde::Serialize;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gmail-stats")]
#[command(about = "Count Gmail messages per sender and list the busiest senders")]
struct Args {
    /// Mailbox to read (`me` for the authenticated account)
    #[arg(long)]
    user: Option<String>,

    /// Gmail search query scoping the messages (e.g. "label:INBOX")
    #[arg(long)]
    query: Option<String>,

    /// Maximum number of concurrent message fetches
    #[arg(long)]
    workers: Option<usize>,

    /// Only report senders with more messages than this
    #[arg(long)]
    threshold: Option<u64>,

    /// Skip the label listing
    #[arg(long)]
    no_labels: bool,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

impl Args {
    fn apply(&self, mut config: StatsConfig) -> StatsConfig {
        if let Some(user) = &self.user {
            config.user.clone_from(user);
        }
        if let Some(query) = &self.query {
            config.query.clone_from(query);
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if let Some(threshold) = self.threshold {
            config.threshold = threshold;
        }
        config
    }
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    labels: Option<&'a [Label]>,
    query: &'a str,
    result_size_estimate: Option<u64>,
    report: &'a Report,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let stats_config = args.apply(StatsConfig::from_env()?);
    stats_config.validate()?;

    let client = Arc::new(GmailClient::authenticate(GmailConfig::from_env()?)?);

    let labels = if args.no_labels {
        None
    } else {
        Some(client.list_labels(&stats_config.user).await?)
    };

    let mut pipeline = StatsPipeline::new(client, stats_config);
    let report = pipeline.run().await?;

    let config = pipeline.config();
    if args.json {
        let output = JsonOutput {
            labels: labels.as_deref(),
            query: &config.query,
            result_size_estimate: pipeline.result_size_estimate(),
            report: &report,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        if let Some(labels) = &labels {
            print_labels(labels);
        }
        println!(
            "Query {} Result size: {}",
            config.query,
            pipeline.result_size_estimate().unwrap_or_default()
        );
        print_report(&report);
    }

    Ok(())
}

fn print_labels(labels: &[Label]) {
    if labels.is_empty() {
        println!("No labels found.");
        return;
    }

    println!("Labels:");
    for label in labels {
        println!("- {}", label.name);
    }
}

fn print_report(report: &Report) {
    println!("RESULTS ORDERED AND FILTERED");
    for line in report.lines() {
        println!("{line}");
    }

    let summary = &report.summary;
    if summary.failed > 0 {
        eprintln!(
            "{} of {} message(s) could not be fetched",
            summary.failed, summary.collected
        );
    }
}
