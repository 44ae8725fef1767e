//! Gmail data model
//!
//! Only the parts of the Gmail REST resources the stats pipeline
//! reads are modelled. Field names follow the API's camelCase JSON.

use serde::{Deserialize, Serialize};

/// Reference to a message in the mailbox, as returned by a listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRef {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
}

impl MessageRef {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            thread_id: None,
        }
    }
}

/// One page of a `users.messages.list` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePage {
    #[serde(default)]
    pub messages: Vec<MessageRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
    /// Server-side guess of the total; informational only.
    #[serde(default)]
    pub result_size_estimate: u64,
}

/// A message header (`From`, `Subject`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub value: String,
}

impl Header {
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A message restricted to its headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
    pub headers: Vec<Header>,
}

impl Message {
    /// First header whose name is exactly `name`.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.name == name)
            .map(|h| h.value.as_str())
    }
}

/// Wire shape of `users.messages.get` with `fields=payload/headers`.
#[derive(Debug, Default, Deserialize)]
pub struct MessageResource {
    #[serde(default)]
    payload: Option<MessagePayload>,
}

#[derive(Debug, Default, Deserialize)]
struct MessagePayload {
    #[serde(default)]
    headers: Vec<Header>,
}

impl From<MessageResource> for Message {
    fn from(resource: MessageResource) -> Self {
        Self {
            headers: resource.payload.map(|p| p.headers).unwrap_or_default(),
        }
    }
}

/// A mailbox label (`INBOX`, `SPAM`, user labels).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    #[serde(default)]
    pub id: String,
    pub name: String,
}

/// Wire shape of `users.labels.list`.
#[derive(Debug, Default, Deserialize)]
pub struct LabelList {
    #[serde(default)]
    pub labels: Vec<Label>,
}
