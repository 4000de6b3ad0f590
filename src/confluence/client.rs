use super::types::{ContentSearch, History, Page, PagePayload, PageRef};
use crate::config::AuthContext;
use crate::error::{PublishError, Result, Service};
use crate::http::{expect_status, join_url, request};
use reqwest::{Method, StatusCode};

const CONTENT: &str = "/rest/api/content";

pub struct ConfluenceClient {
    http: reqwest::Client,
    base_url: String,
    auth: AuthContext,
}

impl ConfluenceClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, auth: AuthContext) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            auth,
        }
    }

    fn content_url(&self, page_id: &str, suffix: &str) -> String {
        join_url(
            &self.base_url,
            &format!("{}/{}{}", CONTENT, urlencoding::encode(page_id), suffix),
        )
    }

    /// The page with exactly this title in `space_key`, if one exists.
    pub async fn find_page(&self, title: &str, space_key: &str) -> Result<Option<PageRef>> {
        let url = join_url(&self.base_url, CONTENT);
        let resp = request(&self.http, Method::GET, &url, &self.auth)
            .query(&[
                ("type", "page"),
                ("title", title),
                ("spaceKey", space_key),
                ("limit", "1"),
            ])
            .send()
            .await?;
        let search: ContentSearch = expect_status(Service::Confluence, resp, &[StatusCode::OK])
            .await?
            .json()
            .await?;
        Ok(search.results.into_iter().next())
    }

    /// Current storage-format body of a page.
    pub async fn page_body(&self, page_id: &str) -> Result<String> {
        let url = self.content_url(page_id, "");
        let resp = request(&self.http, Method::GET, &url, &self.auth)
            .query(&[("expand", "body.storage")])
            .send()
            .await?;
        let page: Page = expect_status(Service::Confluence, resp, &[StatusCode::OK])
            .await?
            .json()
            .await?;

        page.body
            .map(|body| body.storage.value)
            .ok_or(PublishError::MissingField {
                service: Service::Confluence,
                field: "body.storage",
            })
    }

    /// Number of the page's latest version.
    pub async fn page_version(&self, page_id: &str) -> Result<u64> {
        let url = self.content_url(page_id, "/history");
        let resp = request(&self.http, Method::GET, &url, &self.auth)
            .send()
            .await?;
        let history: History = expect_status(Service::Confluence, resp, &[StatusCode::OK])
            .await?
            .json()
            .await?;
        Ok(history.last_updated.number)
    }

    /// Confluence answers a create with 200, some deployments with 201.
    pub async fn create_page(&self, payload: &PagePayload) -> Result<String> {
        let url = join_url(&self.base_url, CONTENT);
        let resp = request(&self.http, Method::POST, &url, &self.auth)
            .json(payload)
            .send()
            .await?;
        let page: Page = expect_status(
            Service::Confluence,
            resp,
            &[StatusCode::OK, StatusCode::CREATED],
        )
        .await?
        .json()
        .await?;
        Ok(page.id)
    }

    pub async fn update_page(&self, page_id: &str, payload: &PagePayload) -> Result<()> {
        let url = self.content_url(page_id, "");
        let resp = request(&self.http, Method::PUT, &url, &self.auth)
            .json(payload)
            .send()
            .await?;
        expect_status(Service::Confluence, resp, &[StatusCode::OK]).await?;
        Ok(())
    }
}
