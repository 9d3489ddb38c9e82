//! Orchestrates a full freshness-snapshot run.

use crate::config::{load_config, ConfigError};
use crate::github::{GitHubClient, GitHubError};
use crate::registry::{DockerHubClient, RegistryError};
use crate::resolver::resolve_site;
use crate::status::{Snapshot, Status, StatusRecord};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::timeout;
use tracing::{info, warn};

/// Default per-site resolution timeout.
const DEFAULT_SITE_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for running a snapshot.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Path to the site configuration document.
    config_path: PathBuf,
    /// Path the snapshot is written to.
    output_path: PathBuf,
    /// Optional GitHub token for the authenticated API tier.
    token: Option<String>,
    /// Upper bound on one site's total resolution time.
    site_timeout: Duration,
}

impl RunnerConfig {
    /// Creates a new configuration for a run.
    pub fn new(config_path: PathBuf, output_path: PathBuf, token: Option<String>) -> Self {
        Self {
            config_path,
            output_path,
            token,
            site_timeout: DEFAULT_SITE_TIMEOUT,
        }
    }

    /// Sets a custom per-site timeout.
    pub fn with_site_timeout(mut self, site_timeout: Duration) -> Self {
        self.site_timeout = site_timeout;
        self
    }

    /// Returns the configuration document path.
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Returns the snapshot output path.
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Returns the per-site timeout.
    pub fn site_timeout(&self) -> Duration {
        self.site_timeout
    }
}

/// Errors that can abort a whole run.
///
/// Per-site failures never surface here; they are recorded in the snapshot.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// Configuration loading errors.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// GitHub client initialization errors.
    #[error(transparent)]
    GitHub(#[from] GitHubError),

    /// Registry client initialization errors.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Snapshot serialization errors.
    #[error("Failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Snapshot write errors.
    #[error("Failed to write snapshot '{path}': {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Totals reported after a run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Number of configured sites processed.
    pub total_sites: usize,

    /// Records with status "success".
    pub succeeded: usize,

    /// Records with status "error".
    pub failed: usize,

    /// Where the snapshot was written.
    pub output_path: PathBuf,
}

/// Orchestrates a full snapshot run over the configured sites.
pub struct Runner {
    config: RunnerConfig,
    github: GitHubClient,
    registry: DockerHubClient,
}

impl Runner {
    /// Builds a runner from the provided configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] if a provider client cannot be constructed.
    pub fn new(config: RunnerConfig) -> Result<Self, RunnerError> {
        let github = GitHubClient::new(config.token.clone())?;
        let registry = DockerHubClient::new()?;
        Ok(Self {
            config,
            github,
            registry,
        })
    }

    /// Executes the full run: load config, resolve every site in order,
    /// write the snapshot.
    ///
    /// Sites are processed strictly sequentially so one slow or hanging
    /// upstream cannot starve or rate-limit the rest. A site exceeding the
    /// timeout gets an error record and its pending work is abandoned; the
    /// batch always continues and the snapshot is always written.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] only for configuration load failures or a
    /// failed snapshot write, never for per-site failures.
    pub async fn run(&self) -> Result<RunSummary, RunnerError> {
        let config = load_config(&self.config.config_path)?;
        let total = config.sites.len();
        let timeout_secs = self.config.site_timeout.as_secs();

        let mut records = Vec::with_capacity(total);
        for (index, site) in config.sites.iter().enumerate() {
            info!(
                site = %site.name,
                url = %site.url,
                index = index + 1,
                total,
                "Resolving site"
            );

            let record = match timeout(
                self.config.site_timeout,
                resolve_site(&self.github, &self.registry, site),
            )
            .await
            {
                Ok(record) => record,
                Err(_) => {
                    warn!(site = %site.name, timeout_secs, "Site resolution timed out");
                    StatusRecord::timeout(site, timeout_secs)
                }
            };
            records.push(record);
        }

        let snapshot = Snapshot::new(records);
        self.write_snapshot(&snapshot)?;

        let summary = RunSummary {
            total_sites: snapshot.metadata.total_sites,
            succeeded: snapshot.metadata.success_count,
            failed: snapshot.metadata.error_count,
            output_path: self.config.output_path.clone(),
        };
        info!(
            total = summary.total_sites,
            succeeded = summary.succeeded,
            failed = summary.failed,
            "Run complete"
        );
        Ok(summary)
    }

    fn write_snapshot(&self, snapshot: &Snapshot) -> Result<(), RunnerError> {
        let path = &self.config.output_path;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| RunnerError::Write {
                    path: parent.display().to_string(),
                    source: e,
                })?;
            }
        }

        let json = serde_json::to_string_pretty(snapshot)?;
        std::fs::write(path, json).map_err(|e| RunnerError::Write {
            path: path.display().to_string(),
            source: e,
        })?;

        info!(path = %path.display(), "Snapshot written");
        Ok(())
    }
}

/// Tallies a record slice the way the snapshot metadata does.
///
/// Exposed for callers that post-process an already-written snapshot.
#[must_use]
pub fn tally_success(records: &[StatusRecord]) -> usize {
    records
        .iter()
        .filter(|record| record.status == Status::Success)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runner_config_defaults() {
        let config = RunnerConfig::new(
            PathBuf::from("config.json"),
            PathBuf::from("data/sites.json"),
            None,
        );
        assert_eq!(config.site_timeout(), Duration::from_secs(30));
        assert_eq!(config.config_path(), Path::new("config.json"));
        assert_eq!(config.output_path(), Path::new("data/sites.json"));
    }

    #[test]
    fn test_runner_config_custom_timeout() {
        let config = RunnerConfig::new(PathBuf::from("c"), PathBuf::from("o"), None)
            .with_site_timeout(Duration::from_secs(5));
        assert_eq!(config.site_timeout(), Duration::from_secs(5));
    }
}
