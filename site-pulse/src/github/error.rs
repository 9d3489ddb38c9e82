//! GitHub provider error types.

use thiserror::Error;

/// Errors that can occur while fetching GitHub repository or package data.
#[derive(Debug, Error)]
pub enum GitHubError {
    /// GitHub API error.
    #[error("GitHub API error: {0}")]
    Api(#[from] octocrab::Error),

    /// HTTP error from the page-scrape tier.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The classified path does not contain an "owner/repo" pair.
    #[error("Malformed repository path '{path}'")]
    MalformedPath { path: String },
}
