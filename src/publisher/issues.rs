use crate::error::{PublishError, Result};
use crate::jira::{Issue, JiraClient};

/// Tag every issue with `version`, in order, stopping at the first failure.
///
/// Returns the number of updated issues. On failure the error names the
/// issue that could not be updated; issues after it are left untouched.
pub async fn update_fix_versions(
    jira: &JiraClient,
    issues: &[Issue],
    version: &str,
) -> Result<usize> {
    for (done, issue) in issues.iter().enumerate() {
        if let Err(e) = jira.set_fix_version(&issue.key, version).await {
            tracing::error!(
                key = %issue.key,
                updated = done,
                remaining = issues.len() - done,
                "fix version update failed, stopping"
            );
            return Err(PublishError::IssueUpdate {
                key: issue.key.clone(),
                source: Box::new(e),
            });
        }
        tracing::debug!(key = %issue.key, version, "fix version set");
    }
    Ok(issues.len())
}
