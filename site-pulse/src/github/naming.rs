//! Container-package name guessing.
//!
//! Package names frequently differ from their repository name in small,
//! predictable ways (casing, separators, a "-docker" suffix). When no
//! explicit name is known, these variants are tried in order.

use once_cell::sync::Lazy;
use regex::Regex;

/// Common repository-name suffixes that rarely appear in package names.
static COMMON_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-(tv|app|image|container|docker)$").expect("valid regex"));

/// Generates candidate package names for a repository, most likely first.
///
/// The list is deterministic, free of duplicates and empty entries:
/// the lower-cased name itself, hyphens stripped, underscores stripped,
/// non-alphanumerics stripped, the first hyphen-delimited segment, and the
/// name with a common suffix removed.
#[must_use]
pub fn package_name_variants(repo_name: &str) -> Vec<String> {
    let base = repo_name.to_ascii_lowercase();

    let candidates = [
        base.clone(),
        base.replace('-', ""),
        base.replace('_', ""),
        base.chars().filter(|c| c.is_ascii_alphanumeric()).collect(),
        base.split('-').next().unwrap_or(&base).to_string(),
        COMMON_SUFFIX.replace(&base, "").into_owned(),
    ];

    let mut variants = Vec::new();
    for candidate in candidates {
        if !candidate.is_empty() && !variants.contains(&candidate) {
            variants.push(candidate);
        }
    }
    variants
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variants_for_hyphenated_name() {
        assert_eq!(
            package_name_variants("uptime-kuma"),
            vec!["uptime-kuma", "uptimekuma", "uptime"]
        );
    }

    #[test]
    fn test_variants_strip_common_suffix() {
        assert_eq!(
            package_name_variants("neko-tv"),
            vec!["neko-tv", "nekotv", "neko"]
        );
    }

    #[test]
    fn test_variants_lowercase_and_strip_underscores() {
        assert_eq!(
            package_name_variants("My_App"),
            vec!["my_app", "myapp"]
        );
    }

    #[test]
    fn test_variants_are_idempotent_and_unique() {
        let first = package_name_variants("some-project_x");
        let second = package_name_variants("some-project_x");
        assert_eq!(first, second);

        let mut deduped = first.clone();
        deduped.dedup();
        assert_eq!(first, deduped);
        for (i, variant) in first.iter().enumerate() {
            assert!(!first[i + 1..].contains(variant));
        }
    }

    #[test]
    fn test_plain_name_yields_single_variant() {
        assert_eq!(package_name_variants("caddy"), vec!["caddy"]);
    }
}
