pub mod issues;
pub mod release;
pub mod wiki;

pub use release::ResolvedRelease;
pub use wiki::{PageAction, PageTarget};

use crate::config::PublisherConfig;
use crate::confluence::ConfluenceClient;
use crate::error::Result;
use crate::http::build_client;
use crate::jira::{Issue, IssueFilter, JiraClient};
use crate::notes::{choose_banner, IndexSource, NoteRenderer};

/// Outcome of a complete run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub issues: usize,
    pub page: PageAction,
    pub release: ResolvedRelease,
    pub updated_issues: usize,
}

/// Drives one publication: fetch, render, publish, resolve release, retag.
pub struct ReleasePublisher<'a> {
    jira: JiraClient,
    confluence: ConfluenceClient,
    renderer: NoteRenderer,
    config: &'a PublisherConfig,
}

impl<'a> ReleasePublisher<'a> {
    pub fn new(config: &'a PublisherConfig) -> Result<Self> {
        let http = build_client(config.timeout())?;
        Ok(Self {
            jira: JiraClient::new(http.clone(), config.jira_api.clone(), config.auth.clone()),
            confluence: ConfluenceClient::new(
                http,
                config.confluence_api.clone(),
                config.auth.clone(),
            ),
            renderer: NoteRenderer::new(config.jira_api.clone())?,
            config,
        })
    }

    /// All done issues waiting for the next release.
    pub async fn fetch_issues(&self) -> Result<Vec<Issue>> {
        let settings = &self.config.settings;
        let filter = IssueFilter {
            project_key: &self.config.project_key,
            fix_version: &settings.pending_fix_version,
            status: &settings.done_status,
            field: &self.config.release_note_field,
            page_size: settings.page_size,
        };
        let issues = self.jira.search_issues(&filter).await?;
        tracing::info!(count = issues.len(), project = %self.config.project_key, "fetched completed issues");
        Ok(issues)
    }

    pub fn render(&self, issues: &[Issue], banner_source: &mut dyn IndexSource) -> Result<String> {
        let banner = if self.config.celebrate {
            Some(choose_banner(banner_source))
        } else {
            None
        };
        self.renderer
            .render(issues, &self.config.release_note_field, banner)
    }

    /// Fetch and render without writing anything.
    pub async fn preview(&self, banner_source: &mut dyn IndexSource) -> Result<String> {
        let issues = self.fetch_issues().await?;
        self.render(&issues, banner_source)
    }

    /// Run all steps in order. The first failure stops the run; effects of
    /// earlier steps stay in place.
    pub async fn run(&self, banner_source: &mut dyn IndexSource) -> Result<RunSummary> {
        self.config.validate()?;
        let version = &self.config.release_version;

        let completed = self.fetch_issues().await?;
        let html = self.render(&completed, banner_source)?;

        let title = self.config.page_title();
        let target = PageTarget {
            title: &title,
            space_key: &self.config.space_key,
            parent_page_id: &self.config.parent_page_id,
        };
        let page = wiki::publish_note(&self.confluence, &target, &html).await?;
        tracing::info!(%title, "{}", page);

        let release = release::resolve_release(
            &self.jira,
            &self.config.project_key,
            version,
            self.config.release_date,
        )
        .await?;

        let updated_issues = issues::update_fix_versions(&self.jira, &completed, version).await?;
        tracing::info!(updated_issues, %version, "fix versions set");

        Ok(RunSummary {
            issues: completed.len(),
            page,
            release,
            updated_issues,
        })
    }
}
