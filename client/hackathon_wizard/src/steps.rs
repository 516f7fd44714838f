//! Wizard step identifiers and per-step bookkeeping state.

use serde::{Deserialize, Serialize};

/// The seven stages of the hackathon creation wizard, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKey {
    Information,
    Timeline,
    Participation,
    Rewards,
    Judging,
    Collaboration,
    Review,
}

/// Canonical step order. Index positions drive all gating decisions.
pub const STEP_ORDER: [StepKey; 7] = [
    StepKey::Information,
    StepKey::Timeline,
    StepKey::Participation,
    StepKey::Rewards,
    StepKey::Judging,
    StepKey::Collaboration,
    StepKey::Review,
];

/// The six steps that carry form data (everything but `Review`).
pub const DATA_STEPS: [StepKey; 6] = [
    StepKey::Information,
    StepKey::Timeline,
    StepKey::Participation,
    StepKey::Rewards,
    StepKey::Judging,
    StepKey::Collaboration,
];

impl StepKey {
    /// Zero-based position in [`STEP_ORDER`].
    pub fn index(self) -> usize {
        match self {
            Self::Information => 0,
            Self::Timeline => 1,
            Self::Participation => 2,
            Self::Rewards => 3,
            Self::Judging => 4,
            Self::Collaboration => 5,
            Self::Review => 6,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        STEP_ORDER.get(index).copied()
    }

    /// The step after this one, or `None` for `Review`.
    pub fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Information => "information",
            Self::Timeline => "timeline",
            Self::Participation => "participation",
            Self::Rewards => "rewards",
            Self::Judging => "judging",
            Self::Collaboration => "collaboration",
            Self::Review => "review",
        }
    }

    /// Human-readable label for the step.
    pub fn label(self) -> &'static str {
        match self {
            Self::Information => "Information",
            Self::Timeline => "Timeline",
            Self::Participation => "Participation",
            Self::Rewards => "Rewards",
            Self::Judging => "Judging Criteria",
            Self::Collaboration => "Collaboration",
            Self::Review => "Review & Publish",
        }
    }
}

impl std::fmt::Display for StepKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display status of a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    #[default]
    Pending,
    Active,
    Completed,
}

/// Status plus completion flag for one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StepState {
    pub status: StepStatus,
    pub is_completed: bool,
}

impl StepState {
    pub const PENDING: StepState = StepState {
        status: StepStatus::Pending,
        is_completed: false,
    };

    pub const COMPLETED: StepState = StepState {
        status: StepStatus::Completed,
        is_completed: true,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_matches_order() {
        for (i, step) in STEP_ORDER.iter().enumerate() {
            assert_eq!(step.index(), i);
            assert_eq!(StepKey::from_index(i), Some(*step));
        }
        assert_eq!(StepKey::from_index(7), None);
    }

    #[test]
    fn next_walks_forward_and_stops_at_review() {
        assert_eq!(StepKey::Information.next(), Some(StepKey::Timeline));
        assert_eq!(StepKey::Collaboration.next(), Some(StepKey::Review));
        assert_eq!(StepKey::Review.next(), None);
    }

    #[test]
    fn data_steps_exclude_review() {
        assert!(!DATA_STEPS.contains(&StepKey::Review));
        assert_eq!(DATA_STEPS.len(), 6);
    }

    #[test]
    fn serde_uses_snake_case_keys() {
        let json = serde_json::to_string(&StepKey::Collaboration).unwrap();
        assert_eq!(json, "\"collaboration\"");
    }
}
