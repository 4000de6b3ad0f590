use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

mod config;
mod confluence;
mod error;
mod http;
mod jira;
mod notes;
mod publisher;

use config::{AuthContext, PublisherConfig};
use notes::OsRandom;
use publisher::ReleasePublisher;

/// Single-dash abbreviations accepted for compatibility with existing
/// pipelines, mapped to their long flag.
const LEGACY_FLAGS: [(&str, &str); 9] = [
    ("-rv", "--releaseVersion"),
    ("-au", "--atlassianUser"),
    ("-ap", "--atlassianPassword"),
    ("-jp", "--jiraProject"),
    ("-rnf", "--releaseNoteCustomField"),
    ("-cs", "--confluenceSpaceName"),
    ("-ca", "--confluencePageAncestor"),
    ("-jAPI", "--jiraAPI"),
    ("-cAPI", "--confluenceAPI"),
];

#[derive(Parser)]
#[command(name = "release-notes-publisher")]
#[command(about = "Publish release notes for completed Jira issues to Confluence and tag the release")]
struct Cli {
    /// Release version, e.g. 1.1.2 (optional with --dry-run)
    #[arg(long = "releaseVersion", value_name = "VERSION")]
    release_version: Option<String>,

    /// Atlassian account
    #[arg(long = "atlassianUser", env = "ATLASSIAN_USER", value_name = "USER")]
    atlassian_user: String,

    /// Atlassian password or API token
    #[arg(
        long = "atlassianPassword",
        env = "ATLASSIAN_PASSWORD",
        hide_env_values = true,
        value_name = "SECRET"
    )]
    atlassian_password: String,

    /// Jira project key
    #[arg(long = "jiraProject", value_name = "KEY")]
    jira_project: String,

    /// Jira custom field holding the release note text, e.g. customfield_10001
    #[arg(long = "releaseNoteCustomField", value_name = "FIELD")]
    release_note_field: String,

    /// Confluence space key the page lives in
    #[arg(long = "confluenceSpaceName", value_name = "SPACE")]
    space_key: String,

    /// Confluence parent page id for new pages
    #[arg(long = "confluencePageAncestor", value_name = "PAGE_ID")]
    parent_page_id: String,

    /// Jira REST API base URL
    #[arg(long = "jiraAPI", value_name = "URL")]
    jira_api: String,

    /// Confluence REST API base URL
    #[arg(long = "confluenceAPI", value_name = "URL")]
    confluence_api: String,

    /// Release date for a newly created Jira version (defaults to today)
    #[arg(long = "releaseDate", value_name = "YYYY-MM-DD")]
    release_date: Option<NaiveDate>,

    /// TOML file overriding the default settings
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Put a celebratory banner above the note
    #[arg(long)]
    celebrate: bool,

    /// Fetch and render the note to stdout without publishing anything
    #[arg(long)]
    dry_run: bool,
}

/// Rewrite legacy single-dash flags (`-rv 1.0`, `-rv=1.0`) to their long form.
/// Nothing after `--` is touched.
fn expand_legacy_flags<I>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut passthrough = false;
    args.into_iter()
        .map(|arg| {
            if passthrough {
                return arg;
            }
            if arg == "--" {
                passthrough = true;
                return arg;
            }
            let (flag, value) = match arg.split_once('=') {
                Some((flag, value)) => (flag, Some(value)),
                None => (arg.as_str(), None),
            };
            match LEGACY_FLAGS.iter().find(|(short, _)| *short == flag) {
                Some((_, long)) => match value {
                    Some(value) => format!("{}={}", long, value),
                    None => long.to_string(),
                },
                None => arg,
            }
        })
        .collect()
}

/// Process arguments as text. Bytes that are not UTF-8 become U+FFFD.
fn command_line<I>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = OsString>,
{
    expand_legacy_flags(
        args.into_iter()
            .map(|arg| arg.to_string_lossy().into_owned()),
    )
}

impl Cli {
    fn into_config(self, settings: config::Settings) -> PublisherConfig {
        PublisherConfig {
            auth: AuthContext::new(self.atlassian_user, self.atlassian_password),
            jira_api: self.jira_api,
            confluence_api: self.confluence_api,
            project_key: self.jira_project,
            release_note_field: self.release_note_field,
            space_key: self.space_key,
            parent_page_id: self.parent_page_id,
            release_version: self.release_version.unwrap_or_default(),
            release_date: self
                .release_date
                .unwrap_or_else(|| chrono::Local::now().date_naive()),
            celebrate: self.celebrate,
            settings,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse_from(command_line(std::env::args_os()));
    let dry_run = cli.dry_run;
    let settings = config::load_settings(cli.config.as_deref()).context("failed to load settings")?;
    let config = cli.into_config(settings);

    tracing::info!(
        version = %config.release_version,
        user = %config.auth.user(),
        project = %config.project_key,
        field = %config.release_note_field,
        space = %config.space_key,
        parent = %config.parent_page_id,
        jira = %config.jira_api,
        confluence = %config.confluence_api,
        "starting release note publication"
    );

    let publisher = ReleasePublisher::new(&config)?;
    let mut banner_source = OsRandom;

    if dry_run {
        let html = publisher.preview(&mut banner_source).await?;
        println!("{}", html);
        return Ok(());
    }

    let summary = publisher
        .run(&mut banner_source)
        .await
        .context("release publication failed")?;

    println!("Release {} published:", config.release_version);
    println!("  issues:  {}", summary.issues);
    println!("  page:    {} ({})", config.page_title(), summary.page);
    println!(
        "  release: {} ({})",
        summary.release.id,
        if summary.release.created { "created" } else { "existing" }
    );
    println!("  tagged:  {}", summary.updated_issues);

    Ok(())
}
