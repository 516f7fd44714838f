//! Application-wide error types.

use thiserror::Error;

use crate::schema::ValidationErrors;
use crate::steps::StepKey;

#[derive(Debug, Error)]
pub enum WizardError {
    #[error("Organization is required to save a hackathon")]
    MissingOrganization,

    #[error("Draft has not been created yet; save the information step first")]
    MissingDraft,

    #[error("Please complete all steps before publishing (missing: {})", join_steps(.0))]
    IncompleteSteps(Vec<StepKey>),

    #[error("Connect a wallet before publishing")]
    WalletNotConnected,

    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Request cancelled")]
    Cancelled,

    #[error("Failed to load draft: {0}")]
    DraftLoad(String),

    #[error("Transform error: {0}")]
    Transform(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl WizardError {
    /// `true` for failures detected before any request was sent.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::MissingOrganization
                | Self::MissingDraft
                | Self::IncompleteSteps(_)
                | Self::WalletNotConnected
                | Self::Validation(_)
        )
    }
}

fn join_steps(steps: &[StepKey]) -> String {
    steps
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, WizardError>;
