//! GitHub REST API tier.
//!
//! Thin wrappers over octocrab used by both the authenticated and public
//! fallback tiers; the caller decides which client instance to pass.

use super::{GitHubError, PackageInfo, PackageKind, RepoInfo};
use chrono::{DateTime, SecondsFormat, Utc};
use octocrab::Octocrab;
use serde::Deserialize;

fn format_timestamp(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Fetches repository metadata and its most recent release as one pair.
///
/// The two calls are issued concurrently and both must succeed; a missing
/// release list entry (no releases yet) is not a failure.
///
/// # Errors
///
/// Returns [`GitHubError::Api`] if either call fails.
pub(super) async fn fetch_repo(
    octocrab: &Octocrab,
    owner: &str,
    repo: &str,
) -> Result<RepoInfo, GitHubError> {
    let repos = octocrab.repos(owner, repo);
    let releases_handler = repos.releases();
    let (repository, releases) = tokio::try_join!(
        repos.get(),
        releases_handler.list().per_page(1).send()
    )?;

    let latest = releases.items.into_iter().next();

    Ok(RepoInfo {
        name: repository.name,
        full_name: repository
            .full_name
            .unwrap_or_else(|| format!("{owner}/{repo}")),
        pushed_at: repository.pushed_at.map(format_timestamp),
        updated_at: repository.updated_at.map(format_timestamp),
        release_tag: latest.as_ref().map(|release| release.tag_name.clone()),
        release_published_at: latest
            .as_ref()
            .and_then(|release| release.published_at)
            .map(format_timestamp),
        default_branch: repository
            .default_branch
            .unwrap_or_else(|| "main".to_string()),
        packages: Vec::new(),
    })
}

/// A container package as returned by the GitHub Packages API.
#[derive(Debug, Deserialize)]
pub(super) struct ApiPackage {
    pub name: String,
    #[serde(default)]
    pub latest_version: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl From<ApiPackage> for PackageInfo {
    fn from(package: ApiPackage) -> Self {
        Self {
            name: package.name,
            version: package.latest_version,
            updated_at: package.updated_at,
            kind: PackageKind::Container,
        }
    }
}

/// Looks up a container package by exact name.
///
/// Tries the organization route first, then the user route; package owners
/// can be either and the URL shape is the only difference.
///
/// # Errors
///
/// Returns [`GitHubError::Api`] if the package exists under neither route.
pub(super) async fn fetch_package(
    octocrab: &Octocrab,
    owner: &str,
    name: &str,
) -> Result<PackageInfo, GitHubError> {
    let org_route = format!("/orgs/{owner}/packages/container/{name}");
    match octocrab.get::<ApiPackage, _, ()>(&org_route, None).await {
        Ok(package) => Ok(package.into()),
        Err(_) => {
            let user_route = format!("/users/{owner}/packages/container/{name}");
            let package: ApiPackage = octocrab.get(&user_route, None::<&()>).await?;
            Ok(package.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_package_deserializes_full_payload() {
        let package: ApiPackage = serde_json::from_str(
            r#"{
                "name": "my-image",
                "package_type": "container",
                "latest_version": "1.2.3",
                "updated_at": "2025-06-01T00:00:00Z"
            }"#,
        )
        .unwrap();

        let info = PackageInfo::from(package);
        assert_eq!(info.name, "my-image");
        assert_eq!(info.version.as_deref(), Some("1.2.3"));
        assert_eq!(info.updated_at.as_deref(), Some("2025-06-01T00:00:00Z"));
        assert_eq!(info.kind, PackageKind::Container);
    }

    #[test]
    fn test_api_package_preserves_absent_version() {
        let package: ApiPackage =
            serde_json::from_str(r#"{ "name": "my-image" }"#).unwrap();
        let info = PackageInfo::from(package);
        // absence must propagate, never default to a placeholder
        assert_eq!(info.version, None);
        assert_eq!(info.updated_at, None);
    }
}
