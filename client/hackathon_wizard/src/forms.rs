//! Per-step form shapes held in wizard memory.
//!
//! These are the UI-friendly shapes: dates are real timestamps, enumerations
//! are Rust enums, prize amounts are kept as the raw strings the user typed,
//! and list items carry a client-side `id` so they have a stable key while
//! being edited. [`crate::transform`] maps them to and from the nested
//! backend schema in [`crate::hackathon`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::steps::{StepKey, DATA_STEPS};

/// Currency applied to a prize tier when none is supplied.
pub const DEFAULT_CURRENCY: &str = "USDC";

// ─────────────────────────────────────────────────────────
// Information
// ─────────────────────────────────────────────────────────

/// Fixed set of hackathon categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Defi,
    Nfts,
    Daos,
    Layer2,
    CrossChain,
    Gaming,
    SocialImpact,
    Ai,
    DeveloperTools,
    Other,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Self::Defi,
        Self::Nfts,
        Self::Daos,
        Self::Layer2,
        Self::CrossChain,
        Self::Gaming,
        Self::SocialImpact,
        Self::Ai,
        Self::DeveloperTools,
        Self::Other,
    ];

    /// The literal the backend stores for this category.
    pub fn as_backend_str(self) -> &'static str {
        match self {
            Self::Defi => "DeFi",
            Self::Nfts => "NFTs",
            Self::Daos => "DAOs",
            Self::Layer2 => "Layer 2",
            Self::CrossChain => "Cross-chain",
            Self::Gaming => "Web3 Gaming",
            Self::SocialImpact => "Social Impact",
            Self::Ai => "AI & Blockchain",
            Self::DeveloperTools => "Developer Tools",
            Self::Other => "Other",
        }
    }

    pub fn from_backend_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_backend_str() == s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VenueType {
    Virtual,
    Physical,
}

impl VenueType {
    pub fn as_backend_str(self) -> &'static str {
        match self {
            Self::Virtual => "virtual",
            Self::Physical => "physical",
        }
    }

    pub fn from_backend_str(s: &str) -> Option<Self> {
        match s {
            "virtual" => Some(Self::Virtual),
            "physical" => Some(Self::Physical),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InformationForm {
    pub name: String,
    pub banner: String,
    pub description: String,
    pub category: Category,
    pub venue_type: VenueType,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub venue_name: Option<String>,
    #[serde(default)]
    pub venue_address: Option<String>,
}

// ─────────────────────────────────────────────────────────
// Timeline
// ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseForm {
    pub name: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineForm {
    pub start_date: DateTime<Utc>,
    pub submission_deadline: DateTime<Utc>,
    /// End of judging.
    pub end_date: DateTime<Utc>,
    /// Winner announcement date.
    pub registration_deadline: DateTime<Utc>,
    #[serde(default)]
    pub phases: Vec<PhaseForm>,
}

// ─────────────────────────────────────────────────────────
// Participation
// ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantType {
    Individual,
    Team,
    TeamOrIndividual,
}

impl ParticipantType {
    pub fn as_backend_str(self) -> &'static str {
        match self {
            Self::Individual => "individual",
            Self::Team => "team",
            Self::TeamOrIndividual => "team_or_individual",
        }
    }

    pub fn from_backend_str(s: &str) -> Option<Self> {
        match s {
            "individual" => Some(Self::Individual),
            "team" => Some(Self::Team),
            "team_or_individual" => Some(Self::TeamOrIndividual),
            _ => None,
        }
    }

    /// Whether team size bounds apply.
    pub fn allows_teams(self) -> bool {
        !matches!(self, Self::Individual)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipationForm {
    pub participant_type: ParticipantType,
    #[serde(default)]
    pub team_min: Option<u8>,
    #[serde(default)]
    pub team_max: Option<u8>,
    #[serde(default)]
    pub require_github: bool,
    #[serde(default)]
    pub require_demo_video: bool,
    #[serde(default)]
    pub require_other_links: bool,
    #[serde(default)]
    pub tabs: TabVisibility,
}

/// Which tabs of the public hackathon page are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabVisibility {
    pub details: bool,
    pub participants: bool,
    pub resources: bool,
    pub submission: bool,
    pub discussion: bool,
    pub winners: bool,
}

impl Default for TabVisibility {
    fn default() -> Self {
        Self {
            details: true,
            participants: true,
            resources: true,
            submission: true,
            discussion: true,
            winners: true,
        }
    }
}

// ─────────────────────────────────────────────────────────
// Rewards
// ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrizeTierForm {
    #[serde(default)]
    pub id: String,
    pub place: String,
    /// Amount exactly as entered; parsed during validation and transform.
    pub prize_amount: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub pass_mark: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardsForm {
    pub prize_tiers: Vec<PrizeTierForm>,
}

// ─────────────────────────────────────────────────────────
// Judging
// ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionForm {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub weight: f64,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgingForm {
    #[serde(default)]
    pub criteria: Vec<CriterionForm>,
}

// ─────────────────────────────────────────────────────────
// Collaboration
// ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SponsorForm {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollaborationForm {
    pub contact_email: String,
    #[serde(default)]
    pub telegram: Option<String>,
    #[serde(default)]
    pub discord: Option<String>,
    #[serde(default)]
    pub social_links: Vec<String>,
    pub sponsors_partners: Vec<SponsorForm>,
}

// ─────────────────────────────────────────────────────────
// Tagged union and the in-memory step map
// ─────────────────────────────────────────────────────────

/// Form data for exactly one step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum StepData {
    Information(InformationForm),
    Timeline(TimelineForm),
    Participation(ParticipationForm),
    Rewards(RewardsForm),
    Judging(JudgingForm),
    Collaboration(CollaborationForm),
}

impl StepData {
    pub fn key(&self) -> StepKey {
        match self {
            Self::Information(_) => StepKey::Information,
            Self::Timeline(_) => StepKey::Timeline,
            Self::Participation(_) => StepKey::Participation,
            Self::Rewards(_) => StepKey::Rewards,
            Self::Judging(_) => StepKey::Judging,
            Self::Collaboration(_) => StepKey::Collaboration,
        }
    }
}

/// Everything the user has entered so far, one optional slot per step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepDataMap {
    #[serde(default)]
    pub information: Option<InformationForm>,
    #[serde(default)]
    pub timeline: Option<TimelineForm>,
    #[serde(default)]
    pub participation: Option<ParticipationForm>,
    #[serde(default)]
    pub rewards: Option<RewardsForm>,
    #[serde(default)]
    pub judging: Option<JudgingForm>,
    #[serde(default)]
    pub collaboration: Option<CollaborationForm>,
}

impl StepDataMap {
    /// Store `data` in its slot, replacing whatever was there.
    pub fn insert(&mut self, data: StepData) {
        match data {
            StepData::Information(d) => self.information = Some(d),
            StepData::Timeline(d) => self.timeline = Some(d),
            StepData::Participation(d) => self.participation = Some(d),
            StepData::Rewards(d) => self.rewards = Some(d),
            StepData::Judging(d) => self.judging = Some(d),
            StepData::Collaboration(d) => self.collaboration = Some(d),
        }
    }

    /// Return the stored data for `key` as a [`StepData`] value.
    pub fn get(&self, key: StepKey) -> Option<StepData> {
        match key {
            StepKey::Information => self.information.clone().map(StepData::Information),
            StepKey::Timeline => self.timeline.clone().map(StepData::Timeline),
            StepKey::Participation => self.participation.clone().map(StepData::Participation),
            StepKey::Rewards => self.rewards.clone().map(StepData::Rewards),
            StepKey::Judging => self.judging.clone().map(StepData::Judging),
            StepKey::Collaboration => self.collaboration.clone().map(StepData::Collaboration),
            StepKey::Review => None,
        }
    }

    pub fn contains(&self, key: StepKey) -> bool {
        match key {
            StepKey::Information => self.information.is_some(),
            StepKey::Timeline => self.timeline.is_some(),
            StepKey::Participation => self.participation.is_some(),
            StepKey::Rewards => self.rewards.is_some(),
            StepKey::Judging => self.judging.is_some(),
            StepKey::Collaboration => self.collaboration.is_some(),
            StepKey::Review => false,
        }
    }

    /// Data steps without a value, in canonical order.
    pub fn missing(&self) -> Vec<StepKey> {
        DATA_STEPS
            .into_iter()
            .filter(|k| !self.contains(*k))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing().is_empty()
    }
}
