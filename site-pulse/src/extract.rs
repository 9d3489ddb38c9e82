//! Heuristic field extraction from GitHub HTML pages.
//!
//! Page markup is unversioned and changes without notice, so every field is
//! backed by an ordered list of independent pattern strategies. The first
//! strategy producing a non-empty value wins; a miss on every strategy is not
//! an error, the field is simply absent.

use chrono::{DateTime, SecondsFormat};
use once_cell::sync::Lazy;
use regex::Regex;

/// A single extraction strategy over raw page text.
type Strategy = fn(&str) -> Option<String>;

static COMMITTED_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""committedDate":"([^"]+)""#).expect("valid regex"));

static RELATIVE_TIME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"relative-time[^>]*datetime="([^"]*)""#).expect("valid regex"));

static PUSHED_META: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<meta name="octolytics-dimension-repository_last_pushed" content="(\d+)""#)
        .expect("valid regex")
});

static REPO_NWO_META: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<meta name="octolytics-dimension-repo_nwo" content="([^"]*)""#)
        .expect("valid regex")
});

static ISO_DATETIME_ATTR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"datetime="(\d{4}-\d{2}-\d{2}[^"]*)""#).expect("valid regex"));

static RELEASE_TAG_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"href="/[^"/]+/[^"/]+/releases/tag/([^"]+)""#).expect("valid regex")
});

static PACKAGE_TITLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<title>Package\s+([^\s·]+)\s+·").expect("valid regex"));

static PACKAGE_HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<h1[^>]*class="[^"]*f3[^"]*"[^>]*>([^<]+)<"#).expect("valid regex")
});

static DOCKER_PULL_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"docker pull ghcr\.io/[^/]+/([^:]+):").expect("valid regex"));

static DOCKER_PULL_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"docker pull ghcr\.io/[^/]+/[^:]+:([^\s"@]+)"#).expect("valid regex")
});

static PACKAGE_VERSION_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"href="/[^"/]+/pkgs/container/[^"/]+/(\d+[^"]*)""#).expect("valid regex")
});

static SEMVER_TEXT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[^>]*>(\d+\.\d+\.\d+[^<]*)<").expect("valid regex"));

static HEADING_TITLE_AGO: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<h3[^>]*title="([^"]+)"[^>]*>\d+\s+(?:minute|hour|day|week|month|year)s?\s+ago</h3>"#)
        .expect("valid regex")
});

static TIME_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<time[^>]*datetime="([^"]*)""#).expect("valid regex"));

static PACKAGES_LIST_SRC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"src="/([^"/]+/[^"/]+)/packages_list[^"]*""#).expect("valid regex")
});

static PACKAGE_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"/users/[^"/]+/packages/container/package/([^"\s/]+)"#).expect("valid regex")
});

/// Runs strategies in priority order, returning the first non-empty match.
fn first_match(strategies: &[Strategy], html: &str) -> Option<String> {
    strategies
        .iter()
        .find_map(|strategy| strategy(html).filter(|value| !value.is_empty()))
}

fn capture_first(pattern: &Regex, html: &str) -> Option<String> {
    pattern.captures(html).map(|captures| captures[1].to_string())
}

fn capture_last(pattern: &Regex, html: &str) -> Option<String> {
    pattern
        .captures_iter(html)
        .last()
        .map(|captures| captures[1].to_string())
}

fn first_committed_date(html: &str) -> Option<String> {
    capture_first(&COMMITTED_DATE, html)
}

fn last_committed_date(html: &str) -> Option<String> {
    capture_last(&COMMITTED_DATE, html)
}

fn first_relative_time(html: &str) -> Option<String> {
    capture_first(&RELATIVE_TIME, html)
}

fn last_relative_time(html: &str) -> Option<String> {
    capture_last(&RELATIVE_TIME, html)
}

fn first_iso_datetime_attr(html: &str) -> Option<String> {
    capture_first(&ISO_DATETIME_ATTR, html)
}

/// The last-pushed meta field carries epoch seconds, not a formatted date.
fn pushed_meta_epoch(html: &str) -> Option<String> {
    capture_first(&PUSHED_META, html)
        .and_then(|raw| raw.parse::<i64>().ok())
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
}

fn docker_pull_name(html: &str) -> Option<String> {
    capture_first(&DOCKER_PULL_NAME, html).map(|name| name.trim().to_string())
}

fn docker_pull_tag(html: &str) -> Option<String> {
    capture_first(&DOCKER_PULL_TAG, html)
}

fn package_title_name(html: &str) -> Option<String> {
    capture_first(&PACKAGE_TITLE, html).map(|name| name.trim().to_string())
}

fn package_heading_name(html: &str) -> Option<String> {
    capture_first(&PACKAGE_HEADING, html).map(|name| name.trim().to_string())
}

fn package_version_link(html: &str) -> Option<String> {
    capture_first(&PACKAGE_VERSION_LINK, html)
}

fn semver_text(html: &str) -> Option<String> {
    capture_first(&SEMVER_TEXT, html)
}

fn heading_title_ago(html: &str) -> Option<String> {
    capture_first(&HEADING_TITLE_AGO, html)
}

fn time_tag(html: &str) -> Option<String> {
    capture_first(&TIME_TAG, html)
}

/// Extracts the most recent commit timestamp from a repository or commit-history page.
///
/// The structured `committedDate` JSON field is listed most-recent first, so
/// the first occurrence is preferred over relative-time markup.
pub fn commit_timestamp(html: &str) -> Option<String> {
    first_match(
        &[first_committed_date, first_relative_time, pushed_meta_epoch],
        html,
    )
}

/// Extracts the last-update timestamp from a repository page.
pub fn update_timestamp(html: &str) -> Option<String> {
    first_match(
        &[last_relative_time, first_iso_datetime_attr, last_committed_date],
        html,
    )
}

/// Extracts the latest release tag from a repository page.
pub fn release_tag(html: &str) -> Option<String> {
    capture_first(&RELEASE_TAG_LINK, html)
}

/// Extracts the package name from a container-package page.
///
/// Callers fall back to the lower-cased repository name when every strategy misses.
pub fn package_name(html: &str) -> Option<String> {
    first_match(
        &[package_title_name, package_heading_name, docker_pull_name],
        html,
    )
}

/// Extracts the latest package version from a container-package page.
pub fn package_version(html: &str) -> Option<String> {
    first_match(&[docker_pull_tag, package_version_link, semver_text], html)
}

/// Extracts the package last-updated timestamp from a container-package page.
pub fn package_update_time(html: &str) -> Option<String> {
    first_match(&[heading_title_ago, first_relative_time, time_tag], html)
}

/// Extracts the "owner/repo" name from a repository page's meta tags.
pub fn repo_full_name(html: &str) -> Option<String> {
    capture_first(&REPO_NWO_META, html).filter(|name| !name.is_empty())
}

/// Finds the in-page `packages_list` endpoint path ("owner/repo"), if present.
pub fn packages_list_endpoint(html: &str) -> Option<String> {
    capture_first(&PACKAGES_LIST_SRC, html)
}

/// Collects container-package names linked from a page, deduplicated in order.
pub fn package_links(html: &str) -> Vec<String> {
    let mut names = Vec::new();
    for captures in PACKAGE_LINK.captures_iter(html) {
        let name = captures[1].to_string();
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_timestamp_prefers_committed_date_over_relative_time() {
        let html = r#"
            <relative-time datetime="2025-01-01T00:00:00Z"></relative-time>
            {"committedDate":"2025-06-01T12:00:00Z"}
        "#;
        assert_eq!(
            commit_timestamp(html).as_deref(),
            Some("2025-06-01T12:00:00Z")
        );
    }

    #[test]
    fn test_commit_timestamp_falls_back_to_relative_time() {
        let html = r#"<relative-time datetime="2025-01-01T00:00:00Z">"#;
        assert_eq!(
            commit_timestamp(html).as_deref(),
            Some("2025-01-01T00:00:00Z")
        );
    }

    #[test]
    fn test_commit_timestamp_converts_epoch_meta() {
        let html = r#"<meta name="octolytics-dimension-repository_last_pushed" content="1700000000">"#;
        assert_eq!(
            commit_timestamp(html).as_deref(),
            Some("2023-11-14T22:13:20Z")
        );
    }

    #[test]
    fn test_commit_timestamp_takes_first_committed_date() {
        let html = r#"{"committedDate":"2025-06-01T12:00:00Z"},{"committedDate":"2025-05-01T12:00:00Z"}"#;
        assert_eq!(
            commit_timestamp(html).as_deref(),
            Some("2025-06-01T12:00:00Z")
        );
    }

    #[test]
    fn test_update_timestamp_takes_last_relative_time() {
        let html = r#"
            <relative-time datetime="2025-01-01T00:00:00Z">
            <relative-time datetime="2025-03-01T00:00:00Z">
        "#;
        assert_eq!(
            update_timestamp(html).as_deref(),
            Some("2025-03-01T00:00:00Z")
        );
    }

    #[test]
    fn test_update_timestamp_single_relative_time() {
        let html = r#"<relative-time datetime="2025-01-01T00:00:00Z">"#;
        assert_eq!(
            update_timestamp(html).as_deref(),
            Some("2025-01-01T00:00:00Z")
        );
    }

    #[test]
    fn test_update_timestamp_falls_back_to_last_committed_date() {
        let html = r#"{"committedDate":"2025-06-01T12:00:00Z"},{"committedDate":"2025-05-01T12:00:00Z"}"#;
        assert_eq!(
            update_timestamp(html).as_deref(),
            Some("2025-05-01T12:00:00Z")
        );
    }

    #[test]
    fn test_release_tag() {
        let html = r#"<a href="/owner/repo/releases/tag/v1.2.3">v1.2.3</a>"#;
        assert_eq!(release_tag(html).as_deref(), Some("v1.2.3"));
    }

    #[test]
    fn test_package_name_from_title() {
        let html = "<title>Package my-image · owner/repo</title>";
        assert_eq!(package_name(html).as_deref(), Some("my-image"));
    }

    #[test]
    fn test_package_name_from_heading() {
        let html = r#"<h1 class="d-flex f3 text-normal">my-image</h1>"#;
        assert_eq!(package_name(html).as_deref(), Some("my-image"));
    }

    #[test]
    fn test_package_name_from_pull_command() {
        let html = "docker pull ghcr.io/owner/my-image:1.0.0";
        assert_eq!(package_name(html).as_deref(), Some("my-image"));
    }

    #[test]
    fn test_package_version_from_pull_command() {
        let html = "docker pull ghcr.io/owner/my-image:1.0.0";
        assert_eq!(package_version(html).as_deref(), Some("1.0.0"));
    }

    #[test]
    fn test_package_version_from_version_link() {
        let html = r#"<a href="/owner/pkgs/container/my-image/12345?tag=2.1">2.1</a>"#;
        assert_eq!(package_version(html).as_deref(), Some("12345?tag=2.1"));
    }

    #[test]
    fn test_package_version_from_semver_text() {
        let html = "<span>3.2.1</span>";
        assert_eq!(package_version(html).as_deref(), Some("3.2.1"));
    }

    #[test]
    fn test_package_update_time_from_heading_title() {
        let html = r#"<h3 class="f5" title="Jun 1, 2025, 12:00 PM GMT">3 days ago</h3>"#;
        assert_eq!(
            package_update_time(html).as_deref(),
            Some("Jun 1, 2025, 12:00 PM GMT")
        );
    }

    #[test]
    fn test_package_update_time_from_time_tag() {
        let html = r#"<time datetime="2025-06-01T00:00:00Z">"#;
        assert_eq!(
            package_update_time(html).as_deref(),
            Some("2025-06-01T00:00:00Z")
        );
    }

    #[test]
    fn test_repo_full_name() {
        let html = r#"<meta name="octolytics-dimension-repo_nwo" content="owner/repo">"#;
        assert_eq!(repo_full_name(html).as_deref(), Some("owner/repo"));
    }

    #[test]
    fn test_repo_full_name_empty_is_none() {
        let html = r#"<meta name="octolytics-dimension-repo_nwo" content="">"#;
        assert_eq!(repo_full_name(html), None);
    }

    #[test]
    fn test_packages_list_endpoint() {
        let html = r#"<include-fragment src="/owner/repo/packages_list?x=1">"#;
        assert_eq!(packages_list_endpoint(html).as_deref(), Some("owner/repo"));
    }

    #[test]
    fn test_package_links_deduplicates_in_order() {
        let html = r#"
            <a href="/users/owner/packages/container/package/alpha">alpha</a>
            <a href="/users/owner/packages/container/package/beta">beta</a>
            <a href="/users/owner/packages/container/package/alpha">alpha again</a>
        "#;
        assert_eq!(package_links(html), vec!["alpha", "beta"]);
    }

    #[test]
    fn test_extraction_miss_is_none() {
        assert_eq!(commit_timestamp("<html></html>"), None);
        assert_eq!(release_tag("<html></html>"), None);
        assert_eq!(package_version("<html></html>"), None);
    }
}
