//! Paginated collection of message references

use crate::client::MailClient;
use crate::error::Result;
use crate::message::MessageRef;
use tracing::{debug, info, warn};

/// Every message reference matching a query, in listing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collected {
    pub message_refs: Vec<MessageRef>,
    /// The first page's estimate of the total; may disagree with
    /// `message_refs.len()`.
    pub result_size_estimate: u64,
}

/// List all messages matching `query`, following continuation tokens
/// until the listing is exhausted.
///
/// A page that carries a token but no messages ends the listing, so a
/// misbehaving server cannot keep the loop alive.
///
/// # Errors
///
/// Returns the first listing error; pages already read are discarded.
pub async fn collect_all<C>(client: &C, user: &str, query: &str) -> Result<Collected>
where
    C: MailClient + ?Sized,
{
    let mut page = client.list_messages(user, query, None).await?;
    let result_size_estimate = page.result_size_estimate;
    info!("Query {} result size estimate: {}", query, result_size_estimate);

    let mut message_refs = Vec::new();
    let mut pages = 1_usize;

    loop {
        if page.messages.is_empty() {
            if page.next_page_token.is_some() {
                warn!("Page {} is empty but has a continuation token; stopping", pages);
            }
            break;
        }

        debug!("Page {}: {} messages", pages, page.messages.len());
        message_refs.append(&mut page.messages);

        let Some(token) = page.next_page_token.take() else {
            break;
        };
        page = client.list_messages(user, query, Some(&token)).await?;
        pages += 1;
    }

    info!("Collected {} messages in {} page(s)", message_refs.len(), pages);
    Ok(Collected {
        message_refs,
        result_size_estimate,
    })
}
