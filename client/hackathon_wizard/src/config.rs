//! Wizard configuration loaded from environment variables.

use std::time::Duration;

use crate::errors::{Result, WizardError};

/// Delay between a successful publish and navigation to the new hackathon.
pub const DEFAULT_REDIRECT_DELAY_MS: u64 = 1500;

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the hackathon REST API (e.g. http://localhost:3001)
    pub api_url: String,
    /// Organization the hackathon is created under
    pub organization_id: Option<String>,
    /// Bearer token sent with every request
    pub api_token: Option<String>,
    /// Connected wallet address; publishing is refused without one
    pub wallet_address: Option<String>,
    /// Existing draft to resume
    pub draft_id: Option<String>,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
    /// Post-publish redirect delay in milliseconds
    pub redirect_delay_ms: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Config {
            api_url: env_var("HACKATHON_API_URL")
                .unwrap_or_else(|_| "http://localhost:3001".to_string()),
            organization_id: optional_env_var("ORGANIZATION_ID"),
            api_token: optional_env_var("API_TOKEN"),
            wallet_address: optional_env_var("WALLET_ADDRESS"),
            draft_id: optional_env_var("DRAFT_ID"),
            request_timeout_secs: env_var("REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .map_err(|_| WizardError::Config("Invalid REQUEST_TIMEOUT_SECS".to_string()))?,
            redirect_delay_ms: env_var("PUBLISH_REDIRECT_DELAY_MS")
                .unwrap_or_else(|_| DEFAULT_REDIRECT_DELAY_MS.to_string())
                .parse()
                .map_err(|_| {
                    WizardError::Config("Invalid PUBLISH_REDIRECT_DELAY_MS".to_string())
                })?,
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn redirect_delay(&self) -> Duration {
        Duration::from_millis(self.redirect_delay_ms)
    }
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| WizardError::Config(format!("Missing env var: {key}")))
}

/// Unset and blank variables both count as absent.
fn optional_env_var(key: &str) -> Option<String> {
    env_var(key).ok().filter(|v| !v.trim().is_empty())
}
