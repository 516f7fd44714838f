//! Wizard session — draft persistence orchestration and the publish flow.
//!
//! One [`WizardSession`] owns all mutable state of a single editing session:
//! the in-memory step data, the draft identifier, the [`StepGate`], the
//! per-step loading flags and the page-level draft load state. Every public
//! operation reports its outcome to the [`Notifier`] as well as returning
//! it, and only advances the gate once the backend has confirmed the write.
//!
//! ```text
//! save_step(information) ──create──► draft_id assigned ──► gate.advance
//! save_step(other)       ──update──► same draft_id     ──► gate.advance
//! publish                ──publish─► review completed  ──► redirect after delay
//! ```
//!
//! Operations take `&self`, so a host can share the session (e.g. behind an
//! `Arc`), read state and edit other steps while a save is in flight. The
//! state lock is never held across a network call.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::{Config, DEFAULT_REDIRECT_DELAY_MS};
use crate::errors::{Result, WizardError};
use crate::forms::{StepData, StepDataMap};
use crate::gate::StepGate;
use crate::hackathon::{Hackathon, DRAFT_STATUS};
use crate::notify::{Notifier, TracingNotifier};
use crate::schema;
use crate::service::DraftService;
use crate::steps::StepKey;
use crate::transform;

/// In-flight markers, one per step plus one for whole-draft saves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadingFlags {
    steps: [bool; 7],
    draft: bool,
}

impl LoadingFlags {
    pub fn is_loading(&self, step: StepKey) -> bool {
        self.steps[step.index()]
    }

    pub fn is_saving_draft(&self) -> bool {
        self.draft
    }

    pub fn any(&self) -> bool {
        self.draft || self.steps.iter().any(|l| *l)
    }

    fn slot(&mut self, slot: LoadingSlot) -> &mut bool {
        match slot {
            LoadingSlot::Step(step) => &mut self.steps[step.index()],
            LoadingSlot::Draft => &mut self.draft,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum LoadingSlot {
    Step(StepKey),
    Draft,
}

/// Raises one loading flag for as long as it lives, so the flag is cleared
/// on success, failure and when the caller drops the operation.
struct LoadingGuard<'a> {
    flags: &'a watch::Sender<LoadingFlags>,
    slot: LoadingSlot,
}

impl<'a> LoadingGuard<'a> {
    fn raise(flags: &'a watch::Sender<LoadingFlags>, slot: LoadingSlot) -> Self {
        flags.send_modify(|f| *f.slot(slot) = true);
        Self { flags, slot }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        let slot = self.slot;
        self.flags.send_modify(|f| *f.slot(slot) = false);
    }
}

/// Page-level state of the draft load path.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DraftLoadState {
    #[default]
    Idle,
    Loading,
    Loaded(String),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOutcome {
    pub step: StepKey,
    pub draft_id: String,
    /// `true` when this save created the draft.
    pub created: bool,
    /// Active step after the save.
    pub active: StepKey,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded { draft_id: String, active: StepKey },
    /// The draft was already loaded into this session; nothing was fetched.
    AlreadyLoaded,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PublishOutcome {
    pub hackathon: Hackathon,
    /// Detail page of the new hackathon.
    pub redirect_path: String,
    pub redirect_after: Duration,
}

impl PublishOutcome {
    /// Wait out the redirect delay, then yield the path to navigate to.
    pub async fn wait_for_redirect(&self) -> &str {
        tokio::time::sleep(self.redirect_after).await;
        &self.redirect_path
    }
}

#[derive(Debug, Default)]
struct SessionState {
    organization_id: Option<String>,
    wallet_address: Option<String>,
    draft_id: Option<String>,
    step_data: StepDataMap,
    gate: StepGate,
    load_state: DraftLoadState,
    /// Draft already bound to this session, either loaded or created here.
    initialized_draft: Option<String>,
}

impl SessionState {
    /// Record a draft id handed out by the backend. The first one wins.
    fn bind_draft(&mut self, draft_id: &str) -> bool {
        if self.draft_id.is_some() {
            return false;
        }
        self.draft_id = Some(draft_id.to_string());
        self.initialized_draft = Some(draft_id.to_string());
        true
    }
}

pub struct WizardSession {
    service: Arc<dyn DraftService>,
    notifier: Arc<dyn Notifier>,
    state: Mutex<SessionState>,
    loading: watch::Sender<LoadingFlags>,
    redirect_delay: Duration,
    cancel: CancellationToken,
}

impl WizardSession {
    pub fn new(service: Arc<dyn DraftService>, organization_id: Option<String>) -> Self {
        let (loading, _) = watch::channel(LoadingFlags::default());
        Self {
            service,
            notifier: Arc::new(TracingNotifier),
            state: Mutex::new(SessionState {
                organization_id,
                ..SessionState::default()
            }),
            loading,
            redirect_delay: Duration::from_millis(DEFAULT_REDIRECT_DELAY_MS),
            cancel: CancellationToken::new(),
        }
    }

    pub fn from_config(config: &Config, service: Arc<dyn DraftService>) -> Self {
        Self::new(service, config.organization_id.clone())
            .with_wallet(config.wallet_address.clone())
            .with_redirect_delay(config.redirect_delay())
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_wallet(mut self, wallet_address: Option<String>) -> Self {
        self.state.get_mut().wallet_address = wallet_address;
        self
    }

    pub fn with_redirect_delay(mut self, delay: Duration) -> Self {
        self.redirect_delay = delay;
        self
    }

    /// Tie the session's network calls to a host-owned token.
    pub fn with_cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    // ─────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────

    pub fn draft_id(&self) -> Option<String> {
        self.state.lock().draft_id.clone()
    }

    /// Snapshot of the in-memory step data.
    pub fn step_data(&self) -> StepDataMap {
        self.state.lock().step_data.clone()
    }

    pub fn gate(&self) -> StepGate {
        self.state.lock().gate.clone()
    }

    pub fn active_step(&self) -> StepKey {
        self.state.lock().gate.active()
    }

    pub fn loading(&self) -> LoadingFlags {
        *self.loading.borrow()
    }

    /// Receiver that observes every loading flag change, including while a
    /// call is still in flight.
    pub fn watch_loading(&self) -> watch::Receiver<LoadingFlags> {
        self.loading.subscribe()
    }

    pub fn load_state(&self) -> DraftLoadState {
        self.state.lock().load_state.clone()
    }

    pub fn set_wallet_address(&self, wallet_address: Option<String>) {
        self.state.lock().wallet_address = wallet_address;
    }

    /// Keep unsaved edits for a step in memory. Nothing is persisted and the
    /// gate is untouched.
    pub fn set_step_data(&self, data: StepData) {
        self.state.lock().step_data.insert(data);
    }

    pub fn navigate_to(&self, step: StepKey, skip_gate_check: bool) -> bool {
        self.state.lock().gate.navigate_to(step, skip_gate_check)
    }

    /// Child token that is cancelled together with this session.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.child_token()
    }

    /// Cancel every in-flight and future network call of this session.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    fn organization_id(&self) -> Result<String> {
        self.state
            .lock()
            .organization_id
            .clone()
            .ok_or(WizardError::MissingOrganization)
    }

    // ─────────────────────────────────────────────────────────
    // Step save
    // ─────────────────────────────────────────────────────────

    /// Validate and persist one step, then advance the gate.
    ///
    /// The first `information` save creates the draft; every later save
    /// updates just that step's section of the same draft.
    pub async fn save_step(&self, data: StepData) -> Result<SaveOutcome> {
        let step = data.key();
        let result = self.persist_step(data).await;
        match &result {
            Ok(outcome) => {
                let verb = if outcome.created { "created" } else { "saved" };
                self.notifier.success(&format!("{} {verb}", step.label()));
            }
            Err(e) => {
                warn!(step = %step, "step save failed: {e}");
                self.notifier.error(&e.to_string());
            }
        }
        result
    }

    async fn persist_step(&self, data: StepData) -> Result<SaveOutcome> {
        let step = data.key();
        schema::validate(&data).map_err(WizardError::Validation)?;

        let (organization_id, draft_id, sections) = {
            let mut state = self.state.lock();
            let organization_id = state
                .organization_id
                .clone()
                .ok_or(WizardError::MissingOrganization)?;
            if step != StepKey::Information && state.draft_id.is_none() {
                return Err(WizardError::MissingDraft);
            }

            state.step_data.insert(data);
            let transformed = transform::to_api(&state.step_data);
            debug!(step = %step, "transformed step data");
            let key = match state.draft_id {
                None => StepKey::Information,
                Some(_) => step,
            };
            (
                organization_id,
                state.draft_id.clone(),
                transform::section_only(&transformed, key),
            )
        };

        let response = {
            let _loading = LoadingGuard::raise(&self.loading, LoadingSlot::Step(step));
            match &draft_id {
                None => {
                    self.guarded(self.service.create_draft(&organization_id, &sections))
                        .await
                }
                Some(draft_id) => {
                    self.guarded(self.service.update_draft(&organization_id, draft_id, &sections))
                        .await
                }
            }
        };
        let record = response?;

        let mut state = self.state.lock();
        let created = draft_id.is_none() && state.bind_draft(&record.id);
        if created {
            info!(draft_id = %record.id, "draft created");
        } else {
            info!(draft_id = %record.id, step = %step, "draft updated");
        }

        state.gate.advance(step);
        Ok(SaveOutcome {
            step,
            draft_id: state.draft_id.clone().unwrap_or(record.id),
            created,
            active: state.gate.active(),
        })
    }

    // ─────────────────────────────────────────────────────────
    // Save as draft
    // ─────────────────────────────────────────────────────────

    /// Persist every section currently in memory without touching the gate.
    pub async fn save_as_draft(&self) -> Result<String> {
        let result = self.persist_all().await;
        match &result {
            Ok(_) => self.notifier.success("Draft saved"),
            Err(e) => {
                warn!("save as draft failed: {e}");
                self.notifier.error(&e.to_string());
            }
        }
        result
    }

    async fn persist_all(&self) -> Result<String> {
        let (organization_id, draft_id, sections) = {
            let state = self.state.lock();
            let organization_id = state
                .organization_id
                .clone()
                .ok_or(WizardError::MissingOrganization)?;
            (
                organization_id,
                state.draft_id.clone(),
                transform::to_api(&state.step_data),
            )
        };

        let response = {
            let _loading = LoadingGuard::raise(&self.loading, LoadingSlot::Draft);
            match &draft_id {
                None => {
                    self.guarded(self.service.create_draft(&organization_id, &sections))
                        .await
                }
                Some(draft_id) => {
                    self.guarded(self.service.update_draft(&organization_id, draft_id, &sections))
                        .await
                }
            }
        };
        let record = response?;

        let mut state = self.state.lock();
        if draft_id.is_none() && state.bind_draft(&record.id) {
            info!(draft_id = %record.id, "draft created");
        }
        Ok(state.draft_id.clone().unwrap_or(record.id))
    }

    // ─────────────────────────────────────────────────────────
    // Draft load
    // ─────────────────────────────────────────────────────────

    /// Fetch an existing draft and rehydrate the session from it.
    ///
    /// Runs at most once per distinct draft id; repeated calls for a draft
    /// that is already bound to this session (loaded earlier, or created by
    /// one of its saves) return [`LoadOutcome::AlreadyLoaded`] and leave
    /// in-progress edits alone.
    pub async fn load_draft(&self, draft_id: &str) -> Result<LoadOutcome> {
        {
            let mut state = self.state.lock();
            if state.initialized_draft.as_deref() == Some(draft_id) {
                debug!(draft_id, "draft already initialised");
                return Ok(LoadOutcome::AlreadyLoaded);
            }
            state.load_state = DraftLoadState::Loading;
        }

        match self.fetch_and_rehydrate(draft_id).await {
            Ok(active) => {
                info!(draft_id, active = %active, "draft loaded");
                {
                    let mut state = self.state.lock();
                    state.initialized_draft = Some(draft_id.to_string());
                    state.load_state = DraftLoadState::Loaded(draft_id.to_string());
                }
                self.notifier.success("Draft loaded");
                Ok(LoadOutcome::Loaded {
                    draft_id: draft_id.to_string(),
                    active,
                })
            }
            Err(e) => {
                let message = e.to_string();
                warn!(draft_id, "draft load failed: {message}");
                self.state.lock().load_state = DraftLoadState::Failed(message.clone());
                self.notifier.error(&message);
                match e {
                    WizardError::Cancelled | WizardError::MissingOrganization => Err(e),
                    WizardError::DraftLoad(_) => Err(e),
                    _ => Err(WizardError::DraftLoad(message)),
                }
            }
        }
    }

    async fn fetch_and_rehydrate(&self, draft_id: &str) -> Result<StepKey> {
        let organization_id = self.organization_id()?;

        let record = self
            .guarded(self.service.fetch_draft(&organization_id, draft_id))
            .await?;
        if record.status != DRAFT_STATUS {
            return Err(WizardError::DraftLoad(format!(
                "draft {draft_id} is no longer editable (status: {})",
                record.status
            )));
        }

        let step_data = transform::from_api(&record.data)?;
        let mut state = self.state.lock();
        state.gate.rehydrate(|k| step_data.contains(k));
        state.step_data = step_data;
        state.draft_id = Some(record.id);
        Ok(state.gate.active())
    }

    // ─────────────────────────────────────────────────────────
    // Publish
    // ─────────────────────────────────────────────────────────

    /// Assemble the complete payload and publish it.
    ///
    /// Refused without a network call when any step is missing or no wallet
    /// is connected. On success the review step is marked completed and the
    /// outcome carries the detail path to navigate to after the redirect delay.
    pub async fn publish(&self) -> Result<PublishOutcome> {
        let result = self.publish_inner().await;
        match &result {
            Ok(_) => self.notifier.success("Hackathon published successfully!"),
            Err(e) => {
                warn!("publish failed: {e}");
                self.notifier.error(&e.to_string());
            }
        }
        result
    }

    async fn publish_inner(&self) -> Result<PublishOutcome> {
        let (organization_id, payload, wallet) = {
            let state = self.state.lock();
            let organization_id = state
                .organization_id
                .clone()
                .ok_or(WizardError::MissingOrganization)?;
            let payload =
                transform::to_publish_payload(&state.step_data, state.draft_id.as_deref())?;
            let wallet = state
                .wallet_address
                .clone()
                .ok_or(WizardError::WalletNotConnected)?;
            (organization_id, payload, wallet)
        };

        let hackathon = {
            let _loading = LoadingGuard::raise(&self.loading, LoadingSlot::Step(StepKey::Review));
            self.guarded(self.service.publish(&organization_id, &payload))
                .await?
        };

        info!(
            hackathon_id = %hackathon.id,
            wallet = %wallet,
            "hackathon published; escrow funding may proceed"
        );
        self.state.lock().gate.complete(StepKey::Review);

        Ok(PublishOutcome {
            redirect_path: format!("/hackathons/{}", hackathon.id),
            redirect_after: self.redirect_delay,
            hackathon,
        })
    }

    /// Race `fut` against session cancellation.
    async fn guarded<T>(&self, fut: impl Future<Output = Result<T>>) -> Result<T> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(WizardError::Cancelled),
            result = fut => result,
        }
    }
}
