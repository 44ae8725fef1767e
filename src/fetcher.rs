//! Per-message sender lookup

use crate::client::{HEADERS_ONLY, MailClient};
use crate::error::FetchError;
use crate::extract::{Extraction, extract_address};
use crate::message::MessageRef;

/// Header carrying the sender; matched case-sensitively.
pub const FROM_HEADER: &str = "From";

/// Fetch the headers of one message and extract its sender.
///
/// # Errors
///
/// [`FetchError::Client`] when the mail client call fails,
/// [`FetchError::NoSender`] when the message has no `From` header.
pub async fn fetch_sender<C>(
    client: &C,
    user: &str,
    message_ref: &MessageRef,
) -> Result<Extraction, FetchError>
where
    C: MailClient + ?Sized,
{
    let message = client.get_message(user, &message_ref.id, HEADERS_ONLY).await?;
    message
        .header(FROM_HEADER)
        .map(extract_address)
        .ok_or(FetchError::NoSender)
}
