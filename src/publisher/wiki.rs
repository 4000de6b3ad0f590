use crate::confluence::{ConfluenceClient, PagePayload};
use crate::error::Result;
use std::fmt;

/// Separator between the existing page body and an appended note.
pub const APPEND_SEPARATOR: &str = "<br />";

/// Where the note ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageAction {
    Created { page_id: String },
    Updated { page_id: String, version: u64 },
}

impl fmt::Display for PageAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageAction::Created { page_id } => write!(f, "created page {}", page_id),
            PageAction::Updated { page_id, version } => {
                write!(f, "updated page {} to version {}", page_id, version)
            }
        }
    }
}

/// Target of a publish: the page title plus where a new page would go.
#[derive(Debug, Clone)]
pub struct PageTarget<'a> {
    pub title: &'a str,
    pub space_key: &'a str,
    pub parent_page_id: &'a str,
}

/// Append `html` to the page titled `target.title`, creating the page if the
/// space has none with that title.
pub async fn publish_note(
    confluence: &ConfluenceClient,
    target: &PageTarget<'_>,
    html: &str,
) -> Result<PageAction> {
    let existing = confluence.find_page(target.title, target.space_key).await?;

    match existing {
        Some(page) => {
            tracing::info!(page_id = %page.id, title = %page.title, "page exists, appending note");
            let version = confluence.page_version(&page.id).await?;
            let body = confluence.page_body(&page.id).await?;

            let next_version = version + 1;
            let payload = PagePayload::new(
                target.title,
                target.space_key,
                target.parent_page_id,
                format!("{}{}{}", body, APPEND_SEPARATOR, html),
            )
            .with_version(next_version);
            confluence.update_page(&page.id, &payload).await?;

            Ok(PageAction::Updated {
                page_id: page.id,
                version: next_version,
            })
        }
        None => {
            tracing::info!(title = target.title, space = target.space_key, "creating page");
            let payload = PagePayload::new(
                target.title,
                target.space_key,
                target.parent_page_id,
                html.to_string(),
            );
            let page_id = confluence.create_page(&payload).await?;
            Ok(PageAction::Created { page_id })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthContext;
    use crate::error::PublishError;
    use crate::http::build_client;
    use mockito::{Matcher, Server};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::time::Duration;

    const TARGET: PageTarget<'static> = PageTarget {
        title: "Release - 2.0.0",
        space_key: "REL",
        parent_page_id: "132221",
    };

    fn client(server: &Server) -> ConfluenceClient {
        ConfluenceClient::new(
            build_client(Duration::from_secs(5)).unwrap(),
            server.url(),
            AuthContext::new("bot@example.com", "s3cr3t"),
        )
    }

    async fn search_returns(server: &mut Server, results: serde_json::Value) -> mockito::Mock {
        server
            .mock("GET", "/rest/api/content")
            .match_query(Matcher::UrlEncoded("title".into(), "Release - 2.0.0".into()))
            .with_status(200)
            .with_body(json!({ "results": results }).to_string())
            .create_async()
            .await
    }

    #[tokio::test]
    async fn existing_page_gets_note_appended_and_version_bumped() {
        let mut server = Server::new_async().await;
        let _mock = search_returns(&mut server, json!([{ "id": "555", "title": "Release - 2.0.0" }])).await;
        let _mock = server
            .mock("GET", "/rest/api/content/555/history")
            .with_status(200)
            .with_body(json!({ "lastUpdated": { "number": 3 }, "latest": true }).to_string())
            .create_async()
            .await;
        let _mock = server
            .mock("GET", "/rest/api/content/555")
            .match_query(Matcher::UrlEncoded("expand".into(), "body.storage".into()))
            .with_status(200)
            .with_body(
                json!({ "id": "555", "body": { "storage": { "value": "<p>B</p>", "representation": "storage" } } })
                    .to_string(),
            )
            .create_async()
            .await;
        let update = server
            .mock("PUT", "/rest/api/content/555")
            .match_body(Matcher::PartialJson(json!({
                "title": "Release - 2.0.0",
                "version": { "number": 4 },
                "body": { "storage": { "value": "<p>B</p><br /><div>H</div>", "representation": "storage" } }
            })))
            .with_status(200)
            .with_body(json!({ "id": "555" }).to_string())
            .expect(1)
            .create_async()
            .await;
        let create = server
            .mock("POST", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let action = publish_note(&client(&server), &TARGET, "<div>H</div>").await.unwrap();

        assert_eq!(
            action,
            PageAction::Updated {
                page_id: "555".into(),
                version: 4
            }
        );
        update.assert_async().await;
        create.assert_async().await;
    }

    #[tokio::test]
    async fn missing_page_is_created_with_note_only() {
        let mut server = Server::new_async().await;
        let _mock = search_returns(&mut server, json!([])).await;
        let create = server
            .mock("POST", "/rest/api/content")
            .match_body(Matcher::Json(json!({
                "type": "page",
                "title": "Release - 2.0.0",
                "space": { "key": "REL" },
                "ancestors": [{ "id": "132221" }],
                "body": { "storage": { "value": "<div>H</div>", "representation": "storage" } }
            })))
            .with_status(200)
            .with_body(json!({ "id": "777", "title": "Release - 2.0.0" }).to_string())
            .expect(1)
            .create_async()
            .await;
        let update = server.mock("PUT", Matcher::Any).expect(0).create_async().await;

        let action = publish_note(&client(&server), &TARGET, "<div>H</div>").await.unwrap();

        assert_eq!(action, PageAction::Created { page_id: "777".into() });
        create.assert_async().await;
        update.assert_async().await;
    }

    #[tokio::test]
    async fn rejected_create_fails_the_publish() {
        let mut server = Server::new_async().await;
        let _mock = search_returns(&mut server, json!([])).await;
        let _mock = server
            .mock("POST", "/rest/api/content")
            .with_status(400)
            .with_body(json!({ "message": "A page with this title already exists" }).to_string())
            .create_async()
            .await;

        let err = publish_note(&client(&server), &TARGET, "<div>H</div>").await.unwrap_err();
        assert!(matches!(err, PublishError::Api { status: 400, ref message, .. } if message.contains("already exists")));
    }

    #[tokio::test]
    async fn rejected_update_fails_the_publish() {
        let mut server = Server::new_async().await;
        let _mock = search_returns(&mut server, json!([{ "id": "555" }])).await;
        let _mock = server
            .mock("GET", "/rest/api/content/555/history")
            .with_status(200)
            .with_body(json!({ "lastUpdated": { "number": 1 } }).to_string())
            .create_async()
            .await;
        let _mock = server
            .mock("GET", "/rest/api/content/555")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(json!({ "id": "555", "body": { "storage": { "value": "", "representation": "storage" } } }).to_string())
            .create_async()
            .await;
        let _mock = server
            .mock("PUT", "/rest/api/content/555")
            .with_status(409)
            .with_body(json!({ "message": "Version must be incremented on update" }).to_string())
            .create_async()
            .await;

        let err = publish_note(&client(&server), &TARGET, "<div>H</div>").await.unwrap_err();
        assert!(matches!(err, PublishError::Api { status: 409, .. }));
    }
}
