//! In-process fake Gmail server for integration testing
//!
//! # How the Gmail REST API is used here
//!
//! Every call is a plain `GET` carrying the OAuth access token as a
//! bearer credential:
//!
//! ```text
//!   GET /gmail/v1/users/me/messages?q=label%3AINBOX HTTP/1.1
//!   Authorization: Bearer <token>
//! ```
//!
//! Listings are paginated. A page names its successor with
//! `nextPageToken`, which the client echoes back as `pageToken`:
//!
//! ```text
//!   { "messages": [{"id": "m1"}, ...],
//!     "nextPageToken": "50",
//!     "resultSizeEstimate": 120 }
//! ```
//!
//! Single messages are fetched with `format=metadata` and a field mask
//! so only headers travel over the wire:
//!
//! ```text
//!   GET /gmail/v1/users/me/messages/m1?format=metadata
//!       &metadataHeaders=From&fields=payload%2Fheaders
//!   { "payload": { "headers": [{"name": "From", "value": "..."}] } }
//! ```
//!
//! A wrong or missing bearer token is answered with 401, which the
//! client must surface as an authentication failure.

use super::handlers::{handle_get_message, handle_labels, handle_list_messages};
use super::io::{Response, write_response};
use super::mailbox::Mailbox;
use reqwest::Url;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, BufReader};
use tokio::net::TcpListener;

/// A parsed request line plus the one header the server cares about.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: String,
    pub segments: Vec<String>,
    pub query: Vec<(String, String)>,
    pub authorization: Option<String>,
}

impl Request {
    /// Parse a request target such as `/a/b?x=1`.
    pub fn new(method: &str, target: &str, authorization: Option<String>) -> Option<Self> {
        let url = Url::parse(&format!("http://fake.gmail{target}")).ok()?;
        let segments = url
            .path_segments()
            .map(|segs| segs.map(ToString::to_string).collect())
            .unwrap_or_default();
        let query = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        Some(Self {
            method: method.to_string(),
            segments,
            query,
            authorization,
        })
    }

    /// First value of a query parameter.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Every value of a repeated query parameter.
    pub fn params(&self, name: &str) -> Vec<&str> {
        self.query
            .iter()
            .filter(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
            .collect()
    }
}

/// A fake Gmail server on localhost with an OS-assigned port.
///
/// Plain HTTP is enough: the client takes its base URL from
/// configuration, so tests point it at `http://127.0.0.1:<port>`.
pub struct FakeGmailServer {
    base_url: String,
    requests: Arc<Mutex<Vec<Request>>>,
    /// Handle to the background task so it lives as long as the server.
    _handle: tokio::task::JoinHandle<()>,
}

impl FakeGmailServer {
    /// Start a new fake server with the given mailbox state.
    ///
    /// The server runs until the `FakeGmailServer` is dropped.
    pub async fn start(mailbox: Mailbox) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind to ephemeral port");
        let port = listener.local_addr().unwrap().port();

        let mailbox = Arc::new(mailbox);
        let requests = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&requests);

        // Each incoming connection gets its own task.
        let handle = tokio::spawn(async move {
            loop {
                let Ok((stream, _addr)) = listener.accept().await else {
                    break;
                };
                let mailbox = Arc::clone(&mailbox);
                let log = Arc::clone(&log);
                tokio::spawn(async move {
                    handle_connection(stream, &mailbox, &log).await;
                });
            }
        });

        Self {
            base_url: format!("http://127.0.0.1:{port}"),
            requests,
            _handle: handle,
        }
    }

    /// Base URL to hand to `GmailConfig::api_base`.
    pub fn base_url(&self) -> String {
        self.base_url.clone()
    }

    /// Every request served so far, in arrival order.
    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }
}

/// Read one request, answer it, and close the connection.
async fn handle_connection<S: AsyncRead + AsyncWrite + Unpin>(
    stream: S,
    mailbox: &Mailbox,
    log: &Mutex<Vec<Request>>,
) {
    let mut reader = BufReader::new(stream);

    let mut line = String::new();
    if reader.read_line(&mut line).await.is_err() {
        return;
    }
    let mut parts = line.split_whitespace();
    let (Some(method), Some(target)) = (parts.next(), parts.next()) else {
        return;
    };
    let (method, target) = (method.to_string(), target.to_string());

    // Headers end at the first empty line. GET requests carry no body.
    let mut authorization = None;
    loop {
        let mut header = String::new();
        match reader.read_line(&mut header).await {
            Ok(0) | Err(_) => return,
            Ok(_) => {}
        }
        let header = header.trim_end();
        if header.is_empty() {
            break;
        }
        if let Some((name, value)) = header.split_once(':') {
            if name.trim().eq_ignore_ascii_case("authorization") {
                authorization = Some(value.trim().to_string());
            }
        }
    }

    let response = match Request::new(&method, &target, authorization) {
        Some(request) => {
            log.lock().unwrap().push(request.clone());
            route(&request, mailbox)
        }
        None => Response::error(400, "Malformed request target"),
    };

    let _ = write_response(&mut reader, &response).await;
}

/// Check the bearer token, then dispatch on the path below
/// `/gmail/v1/users/{user}/`.
fn route(request: &Request, mailbox: &Mailbox) -> Response {
    let expected = format!("Bearer {}", mailbox.token);
    if request.authorization.as_deref() != Some(expected.as_str()) {
        return Response::error(401, "Request had invalid authentication credentials.");
    }
    if request.method != "GET" {
        return Response::error(400, "Only GET is supported");
    }

    let segments: Vec<&str> = request.segments.iter().map(String::as_str).collect();
    match segments.as_slice() {
        ["gmail", "v1", "users", _user, "labels"] => handle_labels(mailbox),
        ["gmail", "v1", "users", _user, "messages"] => handle_list_messages(request, mailbox),
        ["gmail", "v1", "users", _user, "messages", id] => {
            handle_get_message(request, id, mailbox)
        }
        _ => Response::error(404, "Not Found"),
    }
}
