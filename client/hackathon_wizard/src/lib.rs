//! # Hackathon Wizard
//!
//! Core of the seven-step hackathon creation wizard: information, timeline,
//! participation, rewards, judging, collaboration, review & publish.
//!
//! | Module        | Role                                                      |
//! |---------------|-----------------------------------------------------------|
//! | [`steps`]     | Step identifiers, canonical order, per-step state         |
//! | [`forms`]     | UI-side form shapes and the in-memory step map            |
//! | [`schema`]    | Local per-step validation                                 |
//! | [`hackathon`] | Backend wire schema (drafts, publish payload, hackathons) |
//! | [`transform`] | Pure form ⇄ backend mapping                               |
//! | [`gate`]      | Step reachability and completion bookkeeping              |
//! | [`service`]   | Draft persistence boundary + REST client                  |
//! | [`wizard`]    | Session orchestrator: save, load, save-as-draft, publish  |
//!
//! The surrounding UI is expected to own one [`WizardSession`] per editing
//! session and to render from its accessors.

pub mod config;
pub mod errors;
pub mod forms;
pub mod gate;
pub mod hackathon;
pub mod notify;
pub mod schema;
pub mod service;
pub mod steps;
pub mod transform;
pub mod wizard;

#[cfg(test)]
mod fixtures;

pub use config::Config;
pub use errors::{Result, WizardError};
pub use forms::{StepData, StepDataMap};
pub use gate::StepGate;
pub use hackathon::{DraftRecord, Hackathon, HackathonData, PublishPayload};
pub use notify::{Notifier, TracingNotifier};
pub use service::{DraftService, HttpDraftService};
pub use steps::{StepKey, StepState, StepStatus, STEP_ORDER};
pub use wizard::{DraftLoadState, LoadOutcome, PublishOutcome, SaveOutcome, WizardSession};
