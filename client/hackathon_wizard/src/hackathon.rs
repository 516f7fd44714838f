//! Backend wire types — the nested `HackathonData` schema shared by drafts,
//! publish payloads and published hackathons.
//!
//! All fields are camelCase on the wire. Enumerations travel as the
//! backend's string literals; dates travel as ISO-8601 strings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status string carried by unpublished drafts.
pub const DRAFT_STATUS: &str = "draft";
/// Status string carried by drafts and hackathons once published.
pub const PUBLISHED_STATUS: &str = "published";

// ─────────────────────────────────────────────────────────
// Sections
// ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Venue {
    #[serde(rename = "type")]
    pub venue_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue_address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InformationSection {
    pub title: String,
    pub banner: String,
    pub description: String,
    pub category: String,
    pub venue: Venue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Phase {
    pub name: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineSection {
    pub start_date: String,
    pub submission_deadline: String,
    pub judging_date: String,
    pub winner_announcement_date: String,
    #[serde(default)]
    pub phases: Vec<Phase>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSize {
    pub min: u8,
    pub max: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRequirements {
    pub require_github: bool,
    pub require_demo_video: bool,
    pub require_other_links: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabVisibilitySection {
    pub details_tab: bool,
    pub participants_tab: bool,
    pub resources_tab: bool,
    pub submission_tab: bool,
    pub discussion_tab: bool,
    pub winners_tab: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipationSection {
    pub participant_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_size: Option<TeamSize>,
    pub submission_requirements: SubmissionRequirements,
    pub tab_visibility: TabVisibilitySection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrizeTier {
    pub position: String,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub currency: String,
    pub pass_mark: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardsSection {
    pub prize_tiers: Vec<PrizeTier>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Criterion {
    pub title: String,
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JudgingSection {
    #[serde(default)]
    pub criteria: Vec<Criterion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SponsorPartner {
    pub sponsor_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sponsor_logo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partner_link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollaborationSection {
    pub contact_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telegram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discord: Option<String>,
    #[serde(default)]
    pub social_links: Vec<String>,
    pub sponsors_partners: Vec<SponsorPartner>,
}

// ─────────────────────────────────────────────────────────
// Aggregates
// ─────────────────────────────────────────────────────────

/// Partial hackathon content: any subset of the six sections.
///
/// Used as the body of create-draft and update-draft, and flattened into
/// [`DraftRecord`] responses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HackathonData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub information: Option<InformationSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeline: Option<TimelineSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participation: Option<ParticipationSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rewards: Option<RewardsSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub judging: Option<JudgingSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collaboration: Option<CollaborationSection>,
}

impl HackathonData {
    /// Overlay every section present in `update` onto `self`.
    pub fn merge(&mut self, update: HackathonData) {
        if update.information.is_some() {
            self.information = update.information;
        }
        if update.timeline.is_some() {
            self.timeline = update.timeline;
        }
        if update.participation.is_some() {
            self.participation = update.participation;
        }
        if update.rewards.is_some() {
            self.rewards = update.rewards;
        }
        if update.judging.is_some() {
            self.judging = update.judging;
        }
        if update.collaboration.is_some() {
            self.collaboration = update.collaboration;
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Complete hackathon content; the body of a publish request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishPayload {
    /// Draft this payload was assembled from, if it was ever persisted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draft_id: Option<String>,
    pub information: InformationSection,
    pub timeline: TimelineSection,
    pub participation: ParticipationSection,
    pub rewards: RewardsSection,
    pub judging: JudgingSection,
    pub collaboration: CollaborationSection,
}

impl PublishPayload {
    pub fn into_data(self) -> HackathonData {
        HackathonData {
            information: Some(self.information),
            timeline: Some(self.timeline),
            participation: Some(self.participation),
            rewards: Some(self.rewards),
            judging: Some(self.judging),
            collaboration: Some(self.collaboration),
        }
    }
}

/// A persisted, unpublished hackathon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub organization_id: String,
    pub status: String,
    #[serde(flatten)]
    pub data: HackathonData,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A published hackathon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hackathon {
    #[serde(rename = "_id")]
    pub id: String,
    pub organization_id: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draft_id: Option<String>,
    #[serde(flatten)]
    pub data: HackathonData,
    pub created_at: DateTime<Utc>,
}

/// Standard response envelope used by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiEnvelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn judging(title: &str) -> JudgingSection {
        JudgingSection {
            criteria: vec![Criterion {
                title: title.to_string(),
                weight: 100.0,
                description: None,
            }],
        }
    }

    #[test]
    fn merge_overlays_only_present_sections() {
        let mut base = HackathonData {
            judging: Some(judging("Impact")),
            ..Default::default()
        };
        base.merge(HackathonData {
            rewards: Some(RewardsSection { prize_tiers: vec![] }),
            ..Default::default()
        });
        assert_eq!(base.judging, Some(judging("Impact")));
        assert!(base.rewards.is_some());

        base.merge(HackathonData {
            judging: Some(judging("Design")),
            ..Default::default()
        });
        assert_eq!(base.judging, Some(judging("Design")));
    }

    #[test]
    fn partial_data_omits_absent_sections() {
        let data = HackathonData {
            judging: Some(judging("Impact")),
            ..Default::default()
        };
        let value = serde_json::to_value(&data).unwrap();
        assert_eq!(
            value,
            json!({ "judging": { "criteria": [{ "title": "Impact", "weight": 100.0 }] } })
        );
    }

    #[test]
    fn draft_record_reads_flattened_sections() {
        let raw = json!({
            "_id": "42",
            "organizationId": "org-1",
            "status": "draft",
            "judging": { "criteria": [{ "title": "Impact", "weight": 100 }] },
            "createdAt": "2025-01-01T00:00:00Z",
            "updatedAt": "2025-01-02T00:00:00Z"
        });
        let record: DraftRecord = serde_json::from_value(raw).unwrap();
        assert_eq!(record.id, "42");
        assert_eq!(record.status, DRAFT_STATUS);
        assert_eq!(record.data.judging, Some(judging("Impact")));
        assert!(record.data.information.is_none());
    }

    #[test]
    fn envelope_error_has_no_data() {
        let env: ApiEnvelope<DraftRecord> = ApiEnvelope::error("not found");
        let value = serde_json::to_value(&env).unwrap();
        assert_eq!(value, json!({ "success": false, "message": "not found" }));
    }

    #[test]
    fn envelope_without_data_reads_for_any_payload() {
        let raw = json!({ "success": false, "message": "Draft 9 not found" });
        let env: ApiEnvelope<DraftRecord> = serde_json::from_value(raw).unwrap();
        assert!(!env.success);
        assert!(env.data.is_none());
        assert_eq!(env.message.as_deref(), Some("Draft 9 not found"));
    }
}
