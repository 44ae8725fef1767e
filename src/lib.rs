//! Gmail inbox statistics
//!
//! Counts the messages matching a Gmail search query per sender
//! address and reports the senders above a threshold, least frequent
//! first. Message headers are fetched concurrently through the
//! [`MailClient`] trait; [`GmailClient`] implements it over the Gmail
//! REST API.
//!
//! The entry point is [`StatsPipeline`].

mod client;
mod collector;
mod config;
mod error;
mod extract;
mod fetcher;
mod message;
mod pipeline;
mod report;
mod tally;

pub use client::{GmailClient, HEADERS_ONLY, MailClient};
pub use collector::{Collected, collect_all};
pub use config::{GmailConfig, StatsConfig};
pub use error::{Error, FetchError, PipelineError, Result};
pub use extract::{Extraction, extract, extract_address};
pub use fetcher::{FROM_HEADER, fetch_sender};
pub use message::{Header, Label, Message, MessagePage, MessageRef};
pub use pipeline::{Stage, StatsPipeline};
pub use report::{Report, ResultEntry, Summary};
pub use tally::{SenderTally, TallyMap};
