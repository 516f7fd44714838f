//! Step gate — reachability and completion bookkeeping for the wizard.
//!
//! ```text
//! information ─► timeline ─► participation ─► rewards ─► judging ─► collaboration ─► review
//! ```
//!
//! A step is reachable when it is at or behind the active step, or exactly
//! one ahead of a completed active step. `review` is reachable only once
//! `collaboration` is completed. Navigating forward resets every step past
//! the destination, and the destination itself must be saved again before
//! anything beyond it opens up.

use serde::Serialize;
use tracing::debug;

use crate::steps::{StepKey, StepState, StepStatus, DATA_STEPS, STEP_ORDER};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepGate {
    states: [StepState; 7],
    active: StepKey,
}

impl Default for StepGate {
    fn default() -> Self {
        Self::new()
    }
}

impl StepGate {
    /// Fresh wizard: `information` active, everything else pending.
    pub fn new() -> Self {
        let mut states = [StepState::PENDING; 7];
        states[StepKey::Information.index()].status = StepStatus::Active;
        Self {
            states,
            active: StepKey::Information,
        }
    }

    pub fn active(&self) -> StepKey {
        self.active
    }

    pub fn state(&self, step: StepKey) -> StepState {
        self.states[step.index()]
    }

    pub fn is_completed(&self, step: StepKey) -> bool {
        self.state(step).is_completed
    }

    /// Every step with its current state, in canonical order.
    pub fn states(&self) -> impl Iterator<Item = (StepKey, StepState)> + '_ {
        STEP_ORDER.iter().map(move |k| (*k, self.state(*k)))
    }

    pub fn can_access(&self, step: StepKey) -> bool {
        if step == StepKey::Review {
            return self.is_completed(StepKey::Collaboration);
        }
        let target = step.index();
        let active = self.active.index();
        target <= active || (target == active + 1 && self.is_completed(self.active))
    }

    /// Move to `step`. Returns `false` (and changes nothing) when the gate
    /// check is enforced and the step is not reachable.
    pub fn navigate_to(&mut self, step: StepKey, skip_gate_check: bool) -> bool {
        if !skip_gate_check && !self.can_access(step) {
            debug!(step = %step, active = %self.active, "navigation blocked");
            return false;
        }

        self.release_active();

        if step.index() > self.active.index() {
            for later in &STEP_ORDER[step.index() + 1..] {
                self.states[later.index()] = StepState::PENDING;
            }
            self.states[step.index()] = StepState {
                status: StepStatus::Active,
                is_completed: false,
            };
        } else {
            self.states[step.index()].status = StepStatus::Active;
        }

        debug!(from = %self.active, to = %step, "navigated");
        self.active = step;
        true
    }

    /// Record a successful save of `step`: mark it completed and activate the
    /// step after it. Saving `review` only marks it completed.
    pub fn advance(&mut self, step: StepKey) {
        if step != self.active {
            self.release_active();
        }
        self.states[step.index()] = StepState::COMPLETED;

        match step.next() {
            Some(next) => {
                self.states[next.index()].status = StepStatus::Active;
                debug!(completed = %step, active = %next, "advanced");
                self.active = next;
            }
            None => {
                debug!(completed = %step, "final step completed");
                self.active = step;
            }
        }
    }

    /// Mark `step` completed without moving the active pointer.
    pub fn complete(&mut self, step: StepKey) {
        self.states[step.index()] = StepState::COMPLETED;
    }

    /// Rebuild state for a loaded draft. `has_data` reports whether a data
    /// step's section is present. The first incomplete data step becomes
    /// active; when all six are complete, `information` is activated.
    pub fn rehydrate(&mut self, has_data: impl Fn(StepKey) -> bool) {
        let mut states = [StepState::PENDING; 7];
        for step in DATA_STEPS {
            if has_data(step) {
                states[step.index()] = StepState::COMPLETED;
            }
        }

        let active = DATA_STEPS
            .into_iter()
            .find(|s| !states[s.index()].is_completed)
            .unwrap_or(StepKey::Information);
        states[active.index()].status = StepStatus::Active;

        debug!(active = %active, "rehydrated step gate");
        self.states = states;
        self.active = active;
    }

    /// Drop the `active` status from the current step, leaving its
    /// completion flag untouched.
    fn release_active(&mut self) {
        let current = &mut self.states[self.active.index()];
        current.status = if current.is_completed {
            StepStatus::Completed
        } else {
            StepStatus::Pending
        };
    }
}
