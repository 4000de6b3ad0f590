//! Shared HTTP plumbing for the Jira and Confluence clients.
//!
//! Every request goes through one `reqwest::Client` built with the configured
//! timeout, and every response is checked against the exact statuses the
//! calling operation accepts.

use crate::config::AuthContext;
use crate::error::{PublishError, Result, Service};
use reqwest::{Method, RequestBuilder, StatusCode};
use std::time::Duration;

pub fn build_client(timeout: Duration) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(concat!("release-notes-publisher/", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
        .build()?;
    Ok(client)
}

/// Join a base URL and an absolute API path without doubling or dropping `/`.
pub fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Start an authenticated request.
pub fn request(
    client: &reqwest::Client,
    method: Method,
    url: &str,
    auth: &AuthContext,
) -> RequestBuilder {
    tracing::debug!(%method, url, "sending request");
    client
        .request(method, url)
        .basic_auth(auth.user(), Some(auth.secret()))
}

/// Pass the response through if its status is one of `expected`, otherwise
/// turn it into [`PublishError::Api`] carrying the server's message.
pub async fn expect_status(
    service: Service,
    resp: reqwest::Response,
    expected: &[StatusCode],
) -> Result<reqwest::Response> {
    let status = resp.status();
    if expected.contains(&status) {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(PublishError::Api {
        service,
        status: status.as_u16(),
        message: error_message(&body),
    })
}

/// Pull the human readable part out of an Atlassian error body.
///
/// Confluence answers with `{"message": ...}`, Jira with
/// `{"errorMessages": [...], "errors": {...}}`. Anything else is returned raw.
fn error_message(body: &str) -> String {
    let Ok(json) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.trim().to_string();
    };

    if let Some(message) = json.get("message").and_then(|m| m.as_str()) {
        return message.to_string();
    }

    let mut parts: Vec<String> = json
        .get("errorMessages")
        .and_then(|m| m.as_array())
        .map(|msgs| {
            msgs.iter()
                .filter_map(|m| m.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default();

    if let Some(errors) = json.get("errors").and_then(|e| e.as_object()) {
        for (field, message) in errors {
            if let Some(message) = message.as_str() {
                parts.push(format!("{}: {}", field, message));
            }
        }
    }

    if parts.is_empty() {
        body.trim().to_string()
    } else {
        parts.join("; ")
    }
}
