//! GitHub HTML page-scrape tier.
//!
//! Last-resort data source when both API tiers fail (no token, rate limits,
//! private-ish metadata). Pages are fetched with browser-like headers and
//! fed through the heuristic extractors in [`crate::extract`].

use super::{GitHubError, PackageInfo, PackageKind, RepoInfo};
use crate::extract;
use reqwest::header::ACCEPT;
use reqwest::Client;
use tracing::debug;

pub(super) const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

const BROWSER_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// The commit-history page is fetched for this branch; the scrape tier has
/// no reliable default-branch source of its own.
const COMMITS_BRANCH: &str = "main";

/// Fetches a page as text, treating non-2xx statuses as failures.
async fn fetch_html(http: &Client, url: &str) -> Result<String, reqwest::Error> {
    http.get(url)
        .header(ACCEPT, BROWSER_ACCEPT)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await
}

/// Scrapes repository facts from the repository and commit-history pages.
///
/// The commit-history page's first commit timestamp always overrides the
/// repository page's, since the repository page may render stale data.
/// Package names linked from the repository page are collected as a side
/// product for the package-lookup stage.
///
/// # Errors
///
/// Fails only if the repository page itself cannot be fetched; a failed
/// commit-history or packages-listing sub-request degrades to page data.
pub(super) async fn scrape_repo(http: &Client, path: &str) -> Result<RepoInfo, GitHubError> {
    let html = fetch_html(http, &format!("https://github.com/{path}")).await?;

    let full_name = extract::repo_full_name(&html).unwrap_or_else(|| path.to_string());
    let name = full_name
        .split('/')
        .nth(1)
        .unwrap_or_default()
        .to_string();

    let mut pushed_at = extract::commit_timestamp(&html);
    let mut updated_at = extract::update_timestamp(&html);
    let release_tag = extract::release_tag(&html);
    let packages = discover_packages(http, &html, path).await;

    let commits_url = format!("https://github.com/{path}/commits/{COMMITS_BRANCH}/");
    match fetch_html(http, &commits_url).await {
        Ok(commits_html) => {
            if let Some(latest) = extract::commit_timestamp(&commits_html) {
                if updated_at.is_none() {
                    updated_at = Some(latest.clone());
                }
                pushed_at = Some(latest);
            } else {
                debug!(path, "commit-history page had no commit timestamp");
            }
        }
        Err(err) => {
            debug!(path, error = %err, "failed to fetch commit-history page");
        }
    }

    // A tag link without API data has no publish timestamp of its own; the
    // page's update time is the closest stand-in.
    let release_published_at = release_tag.as_ref().and(updated_at.clone());

    Ok(RepoInfo {
        name,
        full_name,
        pushed_at,
        updated_at,
        release_tag,
        release_published_at,
        default_branch: COMMITS_BRANCH.to_string(),
        packages,
    })
}

/// Discovers container-package names tied to a repository page.
///
/// Prefers the dedicated `packages_list` fragment endpoint when the page
/// references one; falls back to scanning the page itself for package links.
async fn discover_packages(http: &Client, html: &str, path: &str) -> Vec<String> {
    if let Some(owner_repo) = extract::packages_list_endpoint(html) {
        let current_repository = path.split('/').nth(1).unwrap_or_default();
        let url = format!(
            "https://github.com/{owner_repo}/packages_list?current_repository={current_repository}"
        );
        match fetch_html(http, &url).await {
            Ok(listing) => {
                let found = extract::package_links(&listing);
                if !found.is_empty() {
                    debug!(path, count = found.len(), "found packages via packages_list");
                    return found;
                }
            }
            Err(err) => {
                debug!(path, error = %err, "packages_list request failed");
            }
        }
    }

    extract::package_links(html)
}

/// Scrapes a container-package page for one candidate name.
///
/// Returns `Ok(None)` when the page yields neither a name nor a version.
/// An undiscoverable version stays absent; it is never defaulted.
///
/// # Errors
///
/// Fails if the package page cannot be fetched (including 404 for a
/// candidate name that does not exist).
pub(super) async fn scrape_package(
    http: &Client,
    repo_path: &str,
    candidate: &str,
) -> Result<Option<PackageInfo>, reqwest::Error> {
    let url = format!("https://github.com/{repo_path}/pkgs/container/{candidate}");
    let html = fetch_html(http, &url).await?;

    let fallback_name = repo_path
        .split('/')
        .nth(1)
        .unwrap_or(candidate)
        .to_ascii_lowercase();
    let name = extract::package_name(&html).unwrap_or(fallback_name);
    let version = extract::package_version(&html);
    let updated_at = extract::package_update_time(&html);

    if name.is_empty() && version.is_none() {
        return Ok(None);
    }

    Ok(Some(PackageInfo {
        name,
        version,
        updated_at,
        kind: PackageKind::Container,
    }))
}
