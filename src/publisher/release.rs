use crate::error::Result;
use crate::jira::{JiraClient, NewVersion};
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRelease {
    pub id: String,
    pub created: bool,
}

/// Find the project's release named `name`, creating it when absent.
pub async fn resolve_release(
    jira: &JiraClient,
    project_key: &str,
    name: &str,
    release_date: NaiveDate,
) -> Result<ResolvedRelease> {
    if let Some(existing) = jira.find_version(project_key, name).await? {
        tracing::info!(
            id = %existing.id,
            released = existing.released,
            archived = existing.archived,
            "release {} already exists",
            name
        );
        return Ok(ResolvedRelease {
            id: existing.id,
            created: false,
        });
    }

    let project_id = jira.project_id(project_key).await?;
    let created = jira
        .create_version(&NewVersion {
            name: name.to_string(),
            description: format!("Version {}", name),
            project_id,
            archived: false,
            released: true,
            release_date,
        })
        .await?;

    tracing::info!(id = %created.id, %release_date, "created release {}", name);
    Ok(ResolvedRelease {
        id: created.id,
        created: true,
    })
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

    fn client(server: &Server) -> JiraClient {
        JiraClient::new(
            build_client(Duration::from_secs(5)).unwrap(),
            server.url(),
            AuthContext::new("bot@example.com", "s3cr3t"),
        )
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    async fn versions(server: &mut Server, names: &[(&str, &str)]) -> mockito::Mock {
        let values: Vec<_> = names
            .iter()
            .map(|(id, name)| json!({ "id": id, "name": name, "released": true, "archived": false }))
            .collect();
        server
            .mock("GET", "/rest/api/3/project/ABC/version")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(json!({ "values": values, "isLast": true }).to_string())
            .create_async()
            .await
    }

    #[tokio::test]
    async fn existing_release_is_not_recreated() {
        let mut server = Server::new_async().await;
        let _mock = versions(&mut server, &[("10", "1.9.0"), ("11", "2.0.0")]).await;
        let create = server
            .mock("POST", "/rest/api/3/version")
            .expect(0)
            .create_async()
            .await;

        let release = resolve_release(&client(&server), "ABC", "2.0.0", date()).await.unwrap();

        assert_eq!(
            release,
            ResolvedRelease {
                id: "11".into(),
                created: false
            }
        );
        create.assert_async().await;
    }

    #[tokio::test]
    async fn missing_release_is_created_once() {
        let mut server = Server::new_async().await;
        let _mock = versions(&mut server, &[("10", "1.9.0")]).await;
        let _mock = server
            .mock("GET", "/rest/api/3/project/ABC")
            .with_status(200)
            .with_body(json!({ "id": "10000", "key": "ABC" }).to_string())
            .create_async()
            .await;
        let create = server
            .mock("POST", "/rest/api/3/version")
            .match_body(Matcher::Json(json!({
                "name": "2.0.0",
                "description": "Version 2.0.0",
                "projectId": 10000,
                "archived": false,
                "released": true,
                "releaseDate": "2026-10-18"
            })))
            .with_status(201)
            .with_body(json!({ "id": "12", "name": "2.0.0", "released": true }).to_string())
            .expect(1)
            .create_async()
            .await;

        let release = resolve_release(&client(&server), "ABC", "2.0.0", date()).await.unwrap();

        assert_eq!(
            release,
            ResolvedRelease {
                id: "12".into(),
                created: true
            }
        );
        create.assert_async().await;
    }

    #[tokio::test]
    async fn create_must_answer_created() {
        let mut server = Server::new_async().await;
        let _mock = versions(&mut server, &[]).await;
        let _mock = server
            .mock("GET", "/rest/api/3/project/ABC")
            .with_status(200)
            .with_body(json!({ "id": "10000" }).to_string())
            .create_async()
            .await;
        let _mock = server
            .mock("POST", "/rest/api/3/version")
            .with_status(400)
            .with_body(json!({ "errorMessages": [], "errors": { "name": "A version with this name already exists in this project." } }).to_string())
            .create_async()
            .await;

        let err = resolve_release(&client(&server), "ABC", "2.0.0", date()).await.unwrap_err();
        assert!(matches!(err, PublishError::Api { status: 400, .. }));
        assert!(err.to_string().contains("already exists"));
    }
}
