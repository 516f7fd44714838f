//! `hackathon-wizard` — drives one wizard session from a JSON script.
//!
//! The script holds any of the six step forms plus an optional `publish`
//! flag. Steps are saved in canonical order through the same session logic
//! a UI would use; `DRAFT_ID` resumes an existing draft first.

use std::sync::Arc;

use anyhow::{anyhow, Context};
use hackathon_wizard::steps::DATA_STEPS;
use hackathon_wizard::{Config, HttpDraftService, StepDataMap, WizardSession};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Deserialize)]
struct WizardScript {
    #[serde(flatten)]
    steps: StepDataMap,
    #[serde(default)]
    publish: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging (RUST_LOG controls verbosity).
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Load optional .env file (ignored if missing).
    let _ = dotenvy::dotenv();

    let config = Config::from_env().map_err(|e| anyhow!("{e}"))?;

    let path = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow!("usage: hackathon-wizard <script.json>"))?;
    let raw = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("reading {path}"))?;
    let script: WizardScript =
        serde_json::from_str(&raw).with_context(|| format!("parsing {path}"))?;

    let service = Arc::new(HttpDraftService::new(
        &config.api_url,
        config.api_token.clone(),
        config.request_timeout(),
    )?);

    // Ctrl-C cancels whatever request is in flight.
    let shutdown = CancellationToken::new();
    let on_signal = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling");
            on_signal.cancel();
        }
    });

    let session = WizardSession::from_config(&config, service).with_cancellation_token(shutdown);

    if let Some(draft_id) = config.draft_id.as_deref() {
        session.load_draft(draft_id).await?;
        info!("Resuming draft {draft_id} at {}", session.active_step());
    }

    for key in DATA_STEPS {
        if let Some(data) = script.steps.get(key) {
            let outcome = session.save_step(data).await?;
            info!(
                "Saved {} (draft {}), next: {}",
                outcome.step, outcome.draft_id, outcome.active
            );
        }
    }

    if script.publish {
        let outcome = session.publish().await?;
        let target = outcome.wait_for_redirect().await;
        println!("{target}");
    } else if let Some(draft_id) = session.draft_id() {
        println!("draft {draft_id}");
    }

    Ok(())
}
