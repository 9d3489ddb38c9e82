//! Per-site status resolution.
//!
//! Orchestrates classification and the provider clients for one site and
//! always produces exactly one [`StatusRecord`]; every failure is converted
//! into an error record rather than propagated.

use crate::classify::{classify, ClassifyError, ProviderKind};
use crate::config::Site;
use crate::github::{GitHubClient, GitHubError};
use crate::registry::{DockerHubClient, RegistryError};
use crate::status::{Status, StatusRecord};
use thiserror::Error;
use tracing::{info_span, warn, Instrument};

const GITHUB_REPO_LABEL: &str = "GitHub repository";
const GITHUB_PACKAGE_LABEL: &str = "GitHub package";
const DOCKER_HUB_LABEL: &str = "Docker Hub image";

/// Internal resolution failure; only its message survives into the record.
#[derive(Debug, Error)]
enum ResolveError {
    #[error(transparent)]
    Classify(#[from] ClassifyError),

    #[error(transparent)]
    GitHub(#[from] GitHubError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Resolves one site into a status record.
///
/// Never fails: classification errors, tier-exhausted fetches, and registry
/// failures all become error records carrying the failure message.
pub async fn resolve_site(
    github: &GitHubClient,
    registry: &DockerHubClient,
    site: &Site,
) -> StatusRecord {
    let span = info_span!("resolve", site = %site.name);

    async {
        match try_resolve(github, registry, site).await {
            Ok(record) => record,
            Err(err) => {
                warn!(url = %site.url, error = %err, "Site resolution failed");
                StatusRecord::failure(site, err.to_string())
            }
        }
    }
    .instrument(span)
    .await
}

async fn try_resolve(
    github: &GitHubClient,
    registry: &DockerHubClient,
    site: &Site,
) -> Result<StatusRecord, ResolveError> {
    let classified = classify(&site.url)?;

    match classified.kind {
        ProviderKind::GitHubRepo | ProviderKind::GitHubPackage => {
            let repo = github.repo_info(&classified.path).await?;

            let override_name = site
                .pkgname
                .as_deref()
                .or(classified.package_path.as_deref());
            let mut package = github
                .package_info(&classified.path, override_name, &repo.packages)
                .await;

            // Scraping can surface a package name without a parseable
            // version; give the API tiers one more chance before settling.
            if let Some(found) = &package {
                if found.version.is_none() {
                    if let Some(better) = github.package_version_via_api(&classified.path).await {
                        package = Some(better);
                    }
                }
            }

            let label = match classified.kind {
                ProviderKind::GitHubPackage => GITHUB_PACKAGE_LABEL,
                _ => GITHUB_REPO_LABEL,
            };

            Ok(StatusRecord {
                name: site.name.clone(),
                url: site.url.clone(),
                desc: site.desc.clone(),
                kind: label.to_string(),
                last_commit_time: repo.pushed_at,
                latest_version: repo.release_tag,
                last_update_time: repo.release_published_at,
                package_version: package.as_ref().and_then(|p| p.version.clone()),
                package_update_time: package.and_then(|p| p.updated_at),
                status: Status::Success,
                error_message: None,
            })
        }

        ProviderKind::DockerHub => {
            let tags = registry.list_tags(&classified.path).await?;
            let latest = tags.into_iter().next();

            Ok(StatusRecord {
                name: site.name.clone(),
                url: site.url.clone(),
                desc: site.desc.clone(),
                kind: DOCKER_HUB_LABEL.to_string(),
                last_commit_time: None,
                latest_version: latest.as_ref().map(|tag| tag.name.clone()),
                last_update_time: latest.and_then(|tag| tag.last_updated),
                package_version: None,
                package_update_time: None,
                status: Status::Success,
                error_message: None,
            })
        }
    }
}
