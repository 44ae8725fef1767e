//! Gmail API client
//!
//! [`MailClient`] is the seam the pipeline talks to; [`GmailClient`]
//! implements it over the Gmail REST API with `reqwest`. Tests swap
//! in their own implementations.

use crate::config::GmailConfig;
use crate::error::{Error, Result};
use crate::message::{Label, LabelList, Message, MessagePage, MessageResource};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

/// Field mask restricting a message fetch to its headers.
pub const HEADERS_ONLY: &str = "payload/headers";

/// Operations the stats pipeline needs from a mail service.
///
/// Implementations are shared across fetch tasks, so every method
/// takes `&self` and must be safe to call concurrently.
#[async_trait]
pub trait MailClient: Send + Sync {
    /// One page of message references matching `query`.
    async fn list_messages(
        &self,
        user: &str,
        query: &str,
        page_token: Option<&str>,
    ) -> Result<MessagePage>;

    /// A single message, limited to the parts named by `fields`.
    async fn get_message(&self, user: &str, id: &str, fields: &str) -> Result<Message>;

    /// All labels of the mailbox.
    async fn list_labels(&self, user: &str) -> Result<Vec<Label>>;
}

/// Read-only Gmail REST client
#[derive(Debug, Clone)]
pub struct GmailClient {
    http: reqwest::Client,
    base: Url,
}

impl GmailClient {
    /// Build a client that sends `config.access_token` as a bearer
    /// token on every request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Auth`] for an empty or malformed token and
    /// [`Error::Config`] for an unusable API base URL.
    pub fn authenticate(config: GmailConfig) -> Result<Self> {
        let token = config.access_token.trim();
        if token.is_empty() {
            return Err(Error::Auth("access token is empty".into()));
        }

        let mut bearer = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|e| Error::Auth(format!("Invalid access token: {e}")))?;
        bearer.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, bearer);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        let base = Url::parse(&config.api_base)
            .map_err(|e| Error::Config(format!("Invalid GMAIL_API_BASE: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(Error::Config(format!(
                "Invalid GMAIL_API_BASE: {} cannot be a base URL",
                config.api_base
            )));
        }

        info!("Gmail client ready for {}", base);
        Ok(Self { http, base })
    }

    // -- private helpers --

    fn endpoint(&self, user: &str, rest: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| Error::Config(format!("{} cannot be a base URL", self.base)))?
            .pop_if_empty()
            .extend(["gmail", "v1", "users", user])
            .extend(rest);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, query: &[(&str, &str)]) -> Result<T> {
        debug!("GET {}", url.path());

        let resp = self.http.get(url).query(query).send().await?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Auth(format!("Gmail rejected credential ({status}): {body}")));
        }
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = resp.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl MailClient for GmailClient {
    async fn list_messages(
        &self,
        user: &str,
        query: &str,
        page_token: Option<&str>,
    ) -> Result<MessagePage> {
        let url = self.endpoint(user, &["messages"])?;
        let mut params = vec![("q", query)];
        if let Some(token) = page_token {
            params.push(("pageToken", token));
        }
        self.get_json(url, &params).await
    }

    async fn get_message(&self, user: &str, id: &str, fields: &str) -> Result<Message> {
        let url = self.endpoint(user, &["messages", id])?;
        let params = [
            ("format", "metadata"),
            ("metadataHeaders", "From"),
            ("fields", fields),
        ];
        let resource: MessageResource = self.get_json(url, &params).await?;
        Ok(resource.into())
    }

    async fn list_labels(&self, user: &str) -> Result<Vec<Label>> {
        let url = self.endpoint(user, &["labels"])?;
        let list: LabelList = self.get_json(url, &[]).await?;
        Ok(list.labels)
    }
}
