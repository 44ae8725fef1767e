//! Stats pipeline
//!
//! Drives one run: collect every matching message reference, fetch
//! each sender with a bounded number of concurrent tasks, then turn
//! the tally into a [`Report`].
//!
//! ```text
//! Idle -> Collecting -> Fetching -> Aggregated -> Reported
//! ```
//!
//! Only the collection step can fail the run. A message whose fetch
//! fails is logged and left out of the tally.

use crate::client::MailClient;
use crate::collector::{Collected, collect_all};
use crate::config::StatsConfig;
use crate::error::{FetchError, PipelineError};
use crate::extract::Extraction;
use crate::fetcher::fetch_sender;
use crate::message::MessageRef;
use crate::report::{Report, Summary};
use crate::tally::SenderTally;
use futures::StreamExt;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Where a pipeline is in its run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Collecting,
    Fetching,
    Aggregated,
    Reported,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Collecting => "collecting",
            Self::Fetching => "fetching",
            Self::Aggregated => "aggregated",
            Self::Reported => "reported",
        };
        f.write_str(name)
    }
}

/// Result of processing a single message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Tallied { fallback: bool },
    NoSender,
    Failed,
}

/// One run of the per-sender statistics.
pub struct StatsPipeline<C: ?Sized> {
    client: Arc<C>,
    config: StatsConfig,
    stage: Stage,
    result_size_estimate: Option<u64>,
}

impl<C> StatsPipeline<C>
where
    C: MailClient + ?Sized + 'static,
{
    #[must_use]
    pub const fn new(client: Arc<C>, config: StatsConfig) -> Self {
        Self {
            client,
            config,
            stage: Stage::Idle,
            result_size_estimate: None,
        }
    }

    #[must_use]
    pub const fn stage(&self) -> Stage {
        self.stage
    }

    #[must_use]
    pub const fn config(&self) -> &StatsConfig {
        &self.config
    }

    /// The listing's own estimate of the message count, once
    /// collection has run.
    #[must_use]
    pub const fn result_size_estimate(&self) -> Option<u64> {
        self.result_size_estimate
    }

    /// Run every stage and return the report.
    ///
    /// # Errors
    ///
    /// [`PipelineError::Auth`] when the listing rejects the credential,
    /// [`PipelineError::Collection`] for any other listing failure.
    /// Per-message failures never surface here.
    pub async fn run(&mut self) -> Result<Report, PipelineError> {
        self.advance(Stage::Collecting);
        let Collected {
            message_refs,
            result_size_estimate,
        } = collect_all(&*self.client, &self.config.user, &self.config.query)
            .await
            .map_err(PipelineError::from_listing)?;
        self.result_size_estimate = Some(result_size_estimate);

        self.advance(Stage::Fetching);
        let tally = Arc::new(SenderTally::new());
        let summary = self.fetch_all(message_refs, &tally).await;

        self.advance(Stage::Aggregated);
        let counts = tally.snapshot();
        info!(
            "Tallied {} of {} messages from {} senders ({} failed, {} without sender)",
            summary.tallied,
            summary.collected,
            counts.len(),
            summary.failed,
            summary.no_sender
        );

        let report = Report::from_tally(counts, self.config.threshold, summary);
        self.advance(Stage::Reported);
        Ok(report)
    }

    // -- private helpers --

    fn advance(&mut self, next: Stage) {
        debug!("Pipeline {} -> {}", self.stage, next);
        self.stage = next;
    }

    /// Fan out one task per message, at most `workers` at a time, and
    /// wait for all of them.
    async fn fetch_all(&self, message_refs: Vec<MessageRef>, tally: &Arc<SenderTally>) -> Summary {
        let mut summary = Summary {
            collected: message_refs.len(),
            ..Summary::default()
        };

        let mut outcomes = futures::stream::iter(message_refs)
            .map(|message_ref| {
                let client = Arc::clone(&self.client);
                let tally = Arc::clone(tally);
                let user = self.config.user.clone();
                tokio::spawn(async move { process(&*client, &user, &message_ref, &tally).await })
            })
            .buffer_unordered(self.config.workers.max(1));

        while let Some(joined) = outcomes.next().await {
            let outcome = joined.unwrap_or_else(|e| {
                warn!("Fetch task aborted: {}", e);
                Outcome::Failed
            });
            match outcome {
                Outcome::Tallied { fallback } => {
                    summary.tallied += 1;
                    if fallback {
                        summary.fallback += 1;
                    }
                }
                Outcome::NoSender => summary.no_sender += 1,
                Outcome::Failed => summary.failed += 1,
            }
        }

        summary
    }
}

async fn process<C>(client: &C, user: &str, message_ref: &MessageRef, tally: &SenderTally) -> Outcome
where
    C: MailClient + ?Sized,
{
    match fetch_sender(client, user, message_ref).await {
        Ok(extraction) => {
            let fallback = extraction.is_fallback();
            if let Extraction::Fallback(raw) = &extraction {
                debug!("No address in From header of {}: {:?}", message_ref.id, raw);
            }
            tally.increment(extraction.as_str());
            Outcome::Tallied { fallback }
        }
        Err(FetchError::NoSender) => Outcome::NoSender,
        Err(FetchError::Client(e)) => {
            warn!("Failed to fetch message {}: {}", message_ref.id, e);
            Outcome::Failed
        }
    }
}
