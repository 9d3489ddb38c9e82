//! GitHub data acquisition with layered fallbacks.
//!
//! Repository facts are fetched through up to three tiers (authenticated
//! API, public API, HTML scrape) and container-package facts through the
//! same API tiers plus a per-candidate page scrape. Only exhaustion of every
//! tier fails a repository lookup; package lookup is best effort and never
//! fails the caller.

mod api;
mod error;
mod naming;
mod scrape;

pub use error::GitHubError;
pub use naming::package_name_variants;

use crate::fallback::{first_success, Attempt};
use octocrab::Octocrab;
use std::time::Duration;
use tracing::debug;

/// Resolved repository facts, produced fresh per request.
#[derive(Debug, Clone)]
pub struct RepoInfo {
    /// Repository name (the part after the owner).
    pub name: String,

    /// Full "owner/repo" path.
    pub full_name: String,

    /// Last push/commit timestamp, RFC 3339.
    pub pushed_at: Option<String>,

    /// Last update timestamp, RFC 3339.
    pub updated_at: Option<String>,

    /// Latest release tag, if the repository has releases.
    pub release_tag: Option<String>,

    /// Publish timestamp of the latest release.
    pub release_published_at: Option<String>,

    /// Default branch name (e.g. "main").
    pub default_branch: String,

    /// Package names discovered while scraping; empty on the API tiers.
    pub packages: Vec<String>,
}

/// The registry a package belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageKind {
    /// A container image package.
    Container,
}

/// Resolved container-package facts.
///
/// An absent `version` is meaningful (the package exists but no version
/// could be determined) and must propagate as-is.
#[derive(Debug, Clone)]
pub struct PackageInfo {
    /// Package name.
    pub name: String,

    /// Latest version string, if discoverable.
    pub version: Option<String>,

    /// Last-updated timestamp, if discoverable.
    pub updated_at: Option<String>,

    /// Package kind.
    pub kind: PackageKind,
}

/// GitHub provider client holding one instance per fallback tier.
///
/// The credential is injected at construction so the credentialed and
/// public paths stay independently testable.
pub struct GitHubClient {
    auth: Option<Octocrab>,
    public: Octocrab,
    http: reqwest::Client,
}

impl GitHubClient {
    /// Builds a client; the authenticated tier exists only if a token is given.
    ///
    /// # Errors
    ///
    /// Returns [`GitHubError`] if an underlying client cannot be constructed.
    pub fn new(token: Option<String>) -> Result<Self, GitHubError> {
        let auth = match token {
            Some(token) => Some(Octocrab::builder().personal_token(token).build()?),
            None => None,
        };
        let public = Octocrab::builder().build()?;
        let http = reqwest::Client::builder()
            .user_agent(scrape::BROWSER_USER_AGENT)
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self { auth, public, http })
    }

    /// Fetches repository facts through the fallback tiers.
    ///
    /// Tier order: authenticated API (when a token is configured), public
    /// API, page scrape. Fails only when every tier fails, with the
    /// innermost failure as the error.
    ///
    /// # Errors
    ///
    /// Returns [`GitHubError`] on tier exhaustion or a malformed path.
    pub async fn repo_info(&self, path: &str) -> Result<RepoInfo, GitHubError> {
        let (owner, repo) = split_repo_path(path)?;

        let mut attempts = Vec::new();
        if let Some(auth) = &self.auth {
            attempts.push(Attempt::new(
                "authenticated api",
                api::fetch_repo(auth, owner, repo),
            ));
        }
        attempts.push(Attempt::new(
            "public api",
            api::fetch_repo(&self.public, owner, repo),
        ));
        attempts.push(Attempt::new("page scrape", scrape::scrape_repo(&self.http, path)));

        first_success("repo info", attempts).await
    }

    /// Resolves container-package facts for a repository, best effort.
    ///
    /// Candidate names are tried in priority tiers: the explicit override,
    /// names discovered during repository scraping, then generated variants
    /// of the repository name. The first tier producing a package wins.
    /// Every failure is swallowed; package absence is not an error.
    pub async fn package_info(
        &self,
        path: &str,
        override_name: Option<&str>,
        discovered: &[String],
    ) -> Option<PackageInfo> {
        let Ok((owner, repo)) = split_repo_path(path) else {
            return None;
        };

        let mut tiers: Vec<Vec<String>> = Vec::new();
        if let Some(name) = override_name {
            tiers.push(vec![name.to_string()]);
        }
        if !discovered.is_empty() {
            tiers.push(discovered.to_vec());
        }
        tiers.push(naming::package_name_variants(repo));

        let repo_path = format!("{owner}/{repo}");
        for candidates in tiers {
            if let Some(package) = self.lookup_candidates(owner, &repo_path, &candidates).await {
                return Some(package);
            }
        }
        None
    }

    /// Re-runs the API tiers over generated name variants, keeping only a
    /// result that actually carries a version.
    ///
    /// Used when an earlier lookup found a package name but no parseable
    /// version.
    pub async fn package_version_via_api(&self, path: &str) -> Option<PackageInfo> {
        let Ok((owner, repo)) = split_repo_path(path) else {
            return None;
        };

        for candidate in naming::package_name_variants(repo) {
            if let Some(package) = self.api_package(owner, &candidate).await {
                if package.version.is_some() {
                    return Some(package);
                }
            }
        }
        None
    }

    /// Tries every candidate against the API tiers, then every candidate
    /// against the page scrape.
    async fn lookup_candidates(
        &self,
        owner: &str,
        repo_path: &str,
        candidates: &[String],
    ) -> Option<PackageInfo> {
        for candidate in candidates {
            if let Some(package) = self.api_package(owner, candidate).await {
                return Some(package);
            }
        }

        for candidate in candidates {
            match scrape::scrape_package(&self.http, repo_path, candidate).await {
                Ok(Some(package)) => {
                    debug!(candidate = %candidate, "package page scrape succeeded");
                    return Some(package);
                }
                Ok(None) => {}
                Err(err) => {
                    debug!(candidate = %candidate, error = %err, "package page scrape failed");
                }
            }
        }

        None
    }

    /// Exact-name package lookup: authenticated API, then public API.
    async fn api_package(&self, owner: &str, name: &str) -> Option<PackageInfo> {
        if let Some(auth) = &self.auth {
            match api::fetch_package(auth, owner, name).await {
                Ok(package) => return Some(package),
                Err(err) => {
                    debug!(name, error = %err, "authenticated package lookup failed");
                }
            }
        }

        match api::fetch_package(&self.public, owner, name).await {
            Ok(package) => Some(package),
            Err(err) => {
                debug!(name, error = %err, "public package lookup failed");
                None
            }
        }
    }
}

/// Splits a classified path into its "owner/repo" head.
///
/// Deeper path segments (e.g. a copied "/releases" suffix) are ignored for
/// API routes but preserved by callers that scrape the full path.
fn split_repo_path(path: &str) -> Result<(&str, &str), GitHubError> {
    let mut segments = path.split('/');
    match (segments.next(), segments.next()) {
        (Some(owner), Some(repo)) if !owner.is_empty() && !repo.is_empty() => Ok((owner, repo)),
        _ => Err(GitHubError::MalformedPath {
            path: path.to_string(),
        }),
    }
}
