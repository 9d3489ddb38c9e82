//! Site URL classification.
//!
//! Maps a configured URL onto the provider that serves its data: a GitHub
//! repository, a GitHub container package, or a Docker Hub image. Pure
//! string work, no I/O.

use thiserror::Error;
use url::Url;

/// Path segment marking a GitHub container-package page.
const PACKAGE_MARKER: &str = "/pkgs/container/";

/// Errors that can occur during URL classification.
#[derive(Debug, Error)]
pub enum ClassifyError {
    /// The URL matches none of the recognized provider shapes.
    #[error("Unsupported URL format: {url}")]
    UnsupportedUrl { url: String },
}

/// The class of external source a site URL identifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// A repository hosted on github.com.
    GitHubRepo,

    /// A container package page hosted on github.com.
    GitHubPackage,

    /// An image hosted on Docker Hub.
    DockerHub,
}

/// A classified site URL with its canonical provider path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedUrl {
    /// Provider kind derived from the URL shape.
    pub kind: ProviderKind,

    /// Canonical "owner/repo" (GitHub) or "namespace/repository" (Docker Hub) path.
    pub path: String,

    /// Package segment after the container marker, for [`ProviderKind::GitHubPackage`].
    pub package_path: Option<String>,
}

/// Classifies a site URL into a provider kind and canonical path.
///
/// Rules, checked in order:
/// 1. github.com URL containing `/pkgs/container/` -> GitHub package.
/// 2. Any other github.com URL -> GitHub repository, with a trailing
///    `/tags` segment stripped.
/// 3. `hub.docker.com/r/{namespace}/{repository}` -> Docker Hub image.
///
/// # Errors
///
/// Returns [`ClassifyError::UnsupportedUrl`] for any other shape.
pub fn classify(url: &str) -> Result<ClassifiedUrl, ClassifyError> {
    let unsupported = || ClassifyError::UnsupportedUrl {
        url: url.to_string(),
    };

    let parsed = Url::parse(url).map_err(|_| unsupported())?;
    let host = parsed.host_str().ok_or_else(unsupported)?;

    if host == "github.com" || host.ends_with(".github.com") {
        let path = parsed.path().trim_matches('/');
        if path.is_empty() {
            return Err(unsupported());
        }

        if let Some((repo_path, package_path)) = path.split_once(PACKAGE_MARKER) {
            if repo_path.is_empty() || package_path.is_empty() {
                return Err(unsupported());
            }
            return Ok(ClassifiedUrl {
                kind: ProviderKind::GitHubPackage,
                path: repo_path.to_string(),
                package_path: Some(package_path.trim_end_matches('/').to_string()),
            });
        }

        let path = path.strip_suffix("/tags").unwrap_or(path);
        return Ok(ClassifiedUrl {
            kind: ProviderKind::GitHubRepo,
            path: path.to_string(),
            package_path: None,
        });
    }

    if host == "hub.docker.com" {
        let mut segments = parsed.path_segments().ok_or_else(unsupported)?;
        if segments.next() == Some("r") {
            if let (Some(namespace), Some(repository)) = (segments.next(), segments.next()) {
                if !namespace.is_empty() && !repository.is_empty() {
                    return Ok(ClassifiedUrl {
                        kind: ProviderKind::DockerHub,
                        path: format!("{namespace}/{repository}"),
                        package_path: None,
                    });
                }
            }
        }
    }

    Err(unsupported())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_github_repo_url() {
        let classified = classify("https://github.com/o/r").unwrap();
        assert_eq!(classified.kind, ProviderKind::GitHubRepo);
        assert_eq!(classified.path, "o/r");
        assert_eq!(classified.package_path, None);
    }

    #[test]
    fn test_github_repo_url_strips_tags_segment() {
        let classified = classify("https://github.com/o/r/tags").unwrap();
        assert_eq!(classified.kind, ProviderKind::GitHubRepo);
        assert_eq!(classified.path, "o/r");
    }

    #[test]
    fn test_github_package_url() {
        let classified = classify("https://github.com/o/r/pkgs/container/p").unwrap();
        assert_eq!(classified.kind, ProviderKind::GitHubPackage);
        assert_eq!(classified.path, "o/r");
        assert_eq!(classified.package_path.as_deref(), Some("p"));
    }

    #[test]
    fn test_docker_hub_url() {
        let classified = classify("https://hub.docker.com/r/o/p").unwrap();
        assert_eq!(classified.kind, ProviderKind::DockerHub);
        assert_eq!(classified.path, "o/p");
        assert_eq!(classified.package_path, None);
    }

    #[test]
    fn test_docker_hub_url_with_extra_segments() {
        let classified = classify("https://hub.docker.com/r/o/p/tags").unwrap();
        assert_eq!(classified.kind, ProviderKind::DockerHub);
        assert_eq!(classified.path, "o/p");
    }

    #[test]
    fn test_unsupported_host() {
        assert!(matches!(
            classify("https://gitlab.com/o/r"),
            Err(ClassifyError::UnsupportedUrl { .. })
        ));
    }

    #[test]
    fn test_bare_github_host_is_unsupported() {
        assert!(classify("https://github.com/").is_err());
    }

    #[test]
    fn test_docker_hub_without_repository_path_is_unsupported() {
        assert!(classify("https://hub.docker.com/search").is_err());
    }

    #[test]
    fn test_not_a_url() {
        assert!(classify("not a url").is_err());
    }
}
