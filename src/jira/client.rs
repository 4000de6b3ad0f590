use super::types::{FixVersionUpdate, Issue, NewVersion, Project, SearchPage, Version, VersionPage};
use crate::config::AuthContext;
use crate::error::{PublishError, Result, Service};
use crate::http::{expect_status, join_url, request};
use reqwest::{Method, StatusCode};

const SEARCH: &str = "/rest/api/3/search";
const VERSION: &str = "/rest/api/3/version";
const PROJECT: &str = "/rest/api/3/project";
const ISSUE: &str = "/rest/api/2/issue";

/// What the search should match besides the project.
#[derive(Debug, Clone)]
pub struct IssueFilter<'a> {
    pub project_key: &'a str,
    pub fix_version: &'a str,
    pub status: &'a str,
    /// Only this field is requested besides the key.
    pub field: &'a str,
    pub page_size: u32,
}

pub struct JiraClient {
    http: reqwest::Client,
    base_url: String,
    auth: AuthContext,
}

impl JiraClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, auth: AuthContext) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            auth,
        }
    }

    /// Every issue matching `filter`, in Jira's order.
    ///
    /// Pages of up to `page_size` are requested until one comes back empty.
    pub async fn search_issues(&self, filter: &IssueFilter<'_>) -> Result<Vec<Issue>> {
        if filter.page_size == 0 {
            return Err(PublishError::Config("page_size must be at least 1".into()));
        }

        let url = join_url(&self.base_url, SEARCH);
        let jql = completed_issues_jql(filter.project_key, filter.fix_version, filter.status);
        tracing::debug!(%jql, "searching issues");

        let max_results = filter.page_size.to_string();
        let mut issues = Vec::new();
        let mut start_at: u64 = 0;

        loop {
            let start = start_at.to_string();
            let resp = request(&self.http, Method::GET, &url, &self.auth)
                .query(&[
                    ("jql", jql.as_str()),
                    ("startAt", start.as_str()),
                    ("maxResults", max_results.as_str()),
                    ("fields", filter.field),
                ])
                .send()
                .await?;
            let page: SearchPage = expect_status(Service::Jira, resp, &[StatusCode::OK])
                .await?
                .json()
                .await?;

            if page.issues.is_empty() {
                break;
            }

            tracing::debug!(
                start_at,
                received = page.issues.len(),
                total = ?page.total,
                "fetched issue page"
            );
            // Jira may cap maxResults below page_size, so advance by what came back.
            start_at += page.issues.len() as u64;
            issues.extend(page.issues);
        }

        Ok(issues)
    }

    /// All versions of a project, following pages until Jira reports the last.
    pub async fn list_versions(&self, project_key: &str) -> Result<Vec<Version>> {
        let url = join_url(
            &self.base_url,
            &format!("{}/{}/version", PROJECT, urlencoding::encode(project_key)),
        );

        let mut versions = Vec::new();
        loop {
            let start = versions.len().to_string();
            let resp = request(&self.http, Method::GET, &url, &self.auth)
                .query(&[("startAt", start.as_str())])
                .send()
                .await?;
            let page: VersionPage = expect_status(Service::Jira, resp, &[StatusCode::OK])
                .await?
                .json()
                .await?;

            let last = page.is_last.unwrap_or(true) || page.values.is_empty();
            versions.extend(page.values);
            if last {
                break;
            }
        }

        Ok(versions)
    }

    /// The project's release with exactly this name, if any.
    pub async fn find_version(&self, project_key: &str, name: &str) -> Result<Option<Version>> {
        let versions = self.list_versions(project_key).await?;
        Ok(versions.into_iter().find(|v| v.name == name))
    }

    /// Numeric id of a project, needed when creating versions.
    pub async fn project_id(&self, project_key: &str) -> Result<u64> {
        let url = join_url(
            &self.base_url,
            &format!("{}/{}", PROJECT, urlencoding::encode(project_key)),
        );
        let resp = request(&self.http, Method::GET, &url, &self.auth)
            .send()
            .await?;
        let project: Project = expect_status(Service::Jira, resp, &[StatusCode::OK])
            .await?
            .json()
            .await?;

        project.id.parse().map_err(|_| PublishError::MissingField {
            service: Service::Jira,
            field: "project.id",
        })
    }

    pub async fn create_version(&self, version: &NewVersion) -> Result<Version> {
        let url = join_url(&self.base_url, VERSION);
        let resp = request(&self.http, Method::POST, &url, &self.auth)
            .json(version)
            .send()
            .await?;
        let created = expect_status(Service::Jira, resp, &[StatusCode::CREATED])
            .await?
            .json()
            .await?;
        Ok(created)
    }

    /// Replace an issue's fix versions with `version`.
    pub async fn set_fix_version(&self, issue_key: &str, version: &str) -> Result<()> {
        let url = join_url(
            &self.base_url,
            &format!("{}/{}", ISSUE, urlencoding::encode(issue_key)),
        );
        let resp = request(&self.http, Method::PUT, &url, &self.auth)
            .json(&FixVersionUpdate::new(version))
            .send()
            .await?;
        expect_status(Service::Jira, resp, &[StatusCode::NO_CONTENT]).await?;
        Ok(())
    }
}

/// JQL for done issues of a project that carry the pending fix version.
pub fn completed_issues_jql(project_key: &str, fix_version: &str, status: &str) -> String {
    format!(
        "project = {} AND fixVersion = {} AND status = {}",
        jql_literal(project_key),
        jql_literal(fix_version),
        jql_literal(status)
    )
}

/// Quote a value as a JQL string literal.
fn jql_literal(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        if c == '"' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}
