use thiserror::Error;

/// Which remote service produced a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Jira,
    Confluence,
}

impl std::fmt::Display for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Service::Jira => write!(f, "Jira"),
            Service::Confluence => write!(f, "Confluence"),
        }
    }
}

#[derive(Debug, Error)]
pub enum PublishError {
    /// Connection failure, timeout or an undecodable response body.
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a status the operation does not accept.
    #[error("{service} API error ({status}): {message}")]
    Api {
        service: Service,
        status: u16,
        message: String,
    },

    #[error("{service} response is missing `{field}`")]
    MissingField {
        service: Service,
        field: &'static str,
    },

    /// Fix-version update failed; later issues were not attempted.
    #[error("failed to set fix version on {key}: {source}")]
    IssueUpdate {
        key: String,
        #[source]
        source: Box<PublishError>,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("template error: {0}")]
    Render(String),
}

impl From<handlebars::RenderError> for PublishError {
    fn from(err: handlebars::RenderError) -> Self {
        PublishError::Render(err.to_string())
    }
}

impl From<handlebars::TemplateError> for PublishError {
    fn from(err: handlebars::TemplateError) -> Self {
        PublishError::Render(err.to_string())
    }
}

pub type Result<T, E = PublishError> = std::result::Result<T, E>;
