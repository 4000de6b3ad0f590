pub mod client;
pub mod types;

pub use client::{IssueFilter, JiraClient};
pub use types::{Issue, NewVersion};
