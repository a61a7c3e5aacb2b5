//! Resolved run settings.

use std::time::Duration;

use reqwest::Url;

use crate::error::{MirrorError, Result};
use crate::mirror::{validate_destination, FailurePolicy};

/// Environment variable consulted when no token is passed on the command line.
pub const TOKEN_ENV: &str = "GITLAB_TOKEN";

/// Default GitLab instance.
pub const DEFAULT_URL: &str = "https://gitlab.com";

/// Validated settings for one mirror run.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Source namespace path or id.
    pub source: String,
    /// Name of the top-level group to create.
    pub destination: String,
    /// Base URL of the instance.
    pub url: Url,
    pub token: String,
    /// Maximum forks in flight.
    pub concurrency: usize,
    pub policy: FailurePolicy,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Settings {
    /// Validate raw values.
    ///
    /// Everything that can be checked locally is checked here, so a bad
    /// configuration fails before the first remote call.
    ///
    /// # Errors
    ///
    /// - [`MirrorError::Configuration`] for a missing token, bad URL, or
    ///   zero concurrency
    /// - [`MirrorError::InvalidDestination`] for a nested or empty destination
    pub fn new(
        source: &str,
        destination: &str,
        url: &str,
        token: Option<&str>,
        concurrency: usize,
        policy: FailurePolicy,
        timeout: Duration,
    ) -> Result<Self> {
        let token = token
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| MirrorError::Configuration {
                message: format!(
                    "API token required: not found in options or the {TOKEN_ENV} environment variable"
                ),
            })?;

        let url = Url::parse(url).map_err(|err| MirrorError::Configuration {
            message: format!("invalid URL '{url}': {err}"),
        })?;

        if concurrency == 0 {
            return Err(MirrorError::Configuration {
                message: "concurrency must be at least 1".to_string(),
            });
        }

        if source.trim().is_empty() {
            return Err(MirrorError::Configuration {
                message: "source namespace is empty".to_string(),
            });
        }
        validate_destination(destination)?;

        Ok(Self {
            source: source.to_string(),
            destination: destination.to_string(),
            url,
            token: token.to_string(),
            concurrency,
            policy,
            timeout,
        })
    }
}
