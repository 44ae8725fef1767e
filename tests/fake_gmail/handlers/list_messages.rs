//! `users.messages.list` handler.
//!
//! Pages through the messages matching `q`, `page_size` at a time.
//! The continuation token is simply the offset of the next page.
//!
//! ```text
//! GET /gmail/v1/users/me/messages?q=label:INBOX&pageToken=2
//! { "messages": [{"id": "m3", "threadId": "m3"}],
//!   "resultSizeEstimate": 3 }
//! ```

use crate::fake_gmail::io::Response;
use crate::fake_gmail::mailbox::Mailbox;
use crate::fake_gmail::server::Request;
use serde_json::json;

/// Answer one listing page.
pub fn handle_list_messages(request: &Request, mailbox: &Mailbox) -> Response {
    let offset = match request.param("pageToken").map(str::parse::<usize>) {
        None => 0,
        Some(Ok(offset)) => offset,
        Some(Err(_)) => return Response::error(400, "Invalid pageToken"),
    };

    let matching = mailbox.matching(request.param("q").unwrap_or(""));
    let end = (offset + mailbox.page_size).min(matching.len());
    let page = matching.get(offset..end).unwrap_or_default();

    let mut body = json!({ "resultSizeEstimate": matching.len() });
    // Gmail omits the field entirely for an empty result.
    if !page.is_empty() {
        body["messages"] = page
            .iter()
            .map(|m| json!({ "id": m.id, "threadId": m.id }))
            .collect();
    }
    if end < matching.len() {
        body["nextPageToken"] = json!(end.to_string());
    }
    Response::ok(&body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake_gmail::mailbox::MailboxBuilder;
    use serde_json::Value;

    fn request(target: &str) -> Request {
        Request::new("GET", target, None).unwrap()
    }

    fn body(response: &Response) -> Value {
        serde_json::from_str(&response.body).unwrap()
    }

    fn mailbox_of(n: usize) -> Mailbox {
        (0..n)
            .fold(MailboxBuilder::new().page_size(2), |b, i| {
                b.message(&format!("m{i}"), Some("a@x.com"))
            })
            .build()
    }

    #[test]
    fn first_page_has_token() {
        let response = handle_list_messages(&request("/m?q=label:INBOX"), &mailbox_of(3));
        let json = body(&response);

        assert_eq!(json["messages"].as_array().unwrap().len(), 2);
        assert_eq!(json["nextPageToken"], "2");
        assert_eq!(json["resultSizeEstimate"], 3);
    }

    #[test]
    fn last_page_has_no_token() {
        let response = handle_list_messages(&request("/m?pageToken=2"), &mailbox_of(3));
        let json = body(&response);

        assert_eq!(json["messages"][0]["id"], "m2");
        assert!(json.get("nextPageToken").is_none());
    }

    #[test]
    fn label_query_filters() {
        let mailbox = MailboxBuilder::new()
            .message("m1", Some("a@x.com"))
            .message_in("m2", "SPAM", Some("b@x.com"))
            .build();
        let response = handle_list_messages(&request("/m?q=label%3Aspam"), &mailbox);
        let json = body(&response);

        assert_eq!(json["messages"].as_array().unwrap().len(), 1);
        assert_eq!(json["messages"][0]["id"], "m2");
    }

    #[test]
    fn empty_result_omits_messages() {
        let response = handle_list_messages(&request("/m"), &MailboxBuilder::new().build());
        let json = body(&response);

        assert!(json.get("messages").is_none());
        assert_eq!(json["resultSizeEstimate"], 0);
    }

    #[test]
    fn bad_token_is_400() {
        let response = handle_list_messages(&request("/m?pageToken=abc"), &mailbox_of(1));
        assert_eq!(response.status, 400);
    }
}
