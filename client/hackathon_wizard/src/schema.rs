//! Per-step validation contracts.
//!
//! Each `validate_*` function checks one form shape locally (no network) and
//! returns every violation it finds as a field-scoped [`FieldError`]. Field
//! paths use the form's own field names, with list items addressed as
//! `prize_tiers[1].prize_amount`.

use std::fmt;

use serde::Serialize;
use validator::{ValidateEmail, ValidateUrl};

use crate::forms::{
    CollaborationForm, InformationForm, JudgingForm, ParticipationForm, RewardsForm, StepData,
    TimelineForm, VenueType,
};

pub const TITLE_MIN: usize = 3;
pub const TITLE_MAX: usize = 100;
pub const DESCRIPTION_MIN: usize = 10;
pub const DESCRIPTION_MAX: usize = 5000;
pub const TEAM_SIZE_MIN: u8 = 1;
pub const TEAM_SIZE_MAX: u8 = 20;
pub const WEIGHT_TOTAL: f64 = 100.0;
/// Allowed distance of the summed judging weights from [`WEIGHT_TOTAL`].
pub const WEIGHT_TOLERANCE: f64 = 0.01;

/// A single violation attached to one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// All violations found for one step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// First message recorded against `field`, if any.
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

/// Validate whichever step `data` belongs to.
pub fn validate(data: &StepData) -> Result<(), ValidationErrors> {
    match data {
        StepData::Information(d) => validate_information(d),
        StepData::Timeline(d) => validate_timeline(d),
        StepData::Participation(d) => validate_participation(d),
        StepData::Rewards(d) => validate_rewards(d),
        StepData::Judging(d) => validate_judging(d),
        StepData::Collaboration(d) => validate_collaboration(d),
    }
}

pub fn validate_information(form: &InformationForm) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let title_len = form.name.trim().chars().count();
    if !(TITLE_MIN..=TITLE_MAX).contains(&title_len) {
        errors.push(
            "name",
            format!("Title must be between {TITLE_MIN} and {TITLE_MAX} characters"),
        );
    }

    if is_blank(&form.banner) {
        errors.push("banner", "Banner image is required");
    } else if !is_valid_url(&form.banner) {
        errors.push("banner", "Banner must be a valid URL");
    }

    let description_len = form.description.trim().chars().count();
    if !(DESCRIPTION_MIN..=DESCRIPTION_MAX).contains(&description_len) {
        errors.push(
            "description",
            format!(
                "Description must be between {DESCRIPTION_MIN} and {DESCRIPTION_MAX} characters"
            ),
        );
    }

    if form.venue_type == VenueType::Physical {
        let venue_fields = [
            ("country", &form.country, "Country is required"),
            ("state", &form.state, "State is required"),
            ("city", &form.city, "City is required"),
            ("venue_name", &form.venue_name, "Venue name is required"),
            ("venue_address", &form.venue_address, "Venue address is required"),
        ];
        for (field, value, message) in venue_fields {
            if value.as_deref().map_or(true, is_blank) {
                errors.push(field, message);
            }
        }
    }

    errors.into_result()
}

pub fn validate_timeline(form: &TimelineForm) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if form.submission_deadline <= form.start_date {
        errors.push("submission_deadline", "Submission deadline must be after the start date");
    }
    if form.end_date <= form.submission_deadline {
        errors.push("end_date", "Judging date must be after the submission deadline");
    }
    if form.registration_deadline <= form.end_date {
        errors.push("registration_deadline", "Winner announcement must be after the judging date");
    }

    for (i, phase) in form.phases.iter().enumerate() {
        if is_blank(&phase.name) {
            errors.push(format!("phases[{i}].name"), "Phase name is required");
        }
        if phase.end_date <= phase.start_date {
            errors.push(format!("phases[{i}].end_date"), "Phase must end after it starts");
        }
    }

    errors.into_result()
}

pub fn validate_participation(form: &ParticipationForm) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if form.participant_type.allows_teams() {
        let range = TEAM_SIZE_MIN..=TEAM_SIZE_MAX;
        match form.team_min {
            None => errors.push("team_min", "Minimum team size is required"),
            Some(n) if !range.contains(&n) => errors.push(
                "team_min",
                format!("Team size must be between {TEAM_SIZE_MIN} and {TEAM_SIZE_MAX}"),
            ),
            Some(_) => {}
        }
        match form.team_max {
            None => errors.push("team_max", "Maximum team size is required"),
            Some(n) if !range.contains(&n) => errors.push(
                "team_max",
                format!("Team size must be between {TEAM_SIZE_MIN} and {TEAM_SIZE_MAX}"),
            ),
            Some(_) => {}
        }
        if let (Some(min), Some(max)) = (form.team_min, form.team_max) {
            if min > max {
                errors.push(
                    "team_max",
                    "Maximum team size must be at least the minimum",
                );
            }
        }
    }

    errors.into_result()
}

pub fn validate_rewards(form: &RewardsForm) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if form.prize_tiers.is_empty() {
        errors.push("prize_tiers", "At least one prize tier is required");
    }

    for (i, tier) in form.prize_tiers.iter().enumerate() {
        if is_blank(&tier.place) {
            errors.push(format!("prize_tiers[{i}].place"), "Place is required");
        }

        let amount = tier.prize_amount.trim();
        if amount.is_empty() {
            errors.push(
                format!("prize_tiers[{i}].prize_amount"),
                "Prize amount is required",
            );
        } else {
            match parse_amount(amount) {
                Some(n) if n >= 0.0 => {}
                Some(_) => errors.push(
                    format!("prize_tiers[{i}].prize_amount"),
                    "Prize amount cannot be negative",
                ),
                None => errors.push(
                    format!("prize_tiers[{i}].prize_amount"),
                    "Prize amount must be a valid number",
                ),
            }
        }

        if !(0.0..=100.0).contains(&tier.pass_mark) {
            errors.push(
                format!("prize_tiers[{i}].pass_mark"),
                "Pass mark must be between 0 and 100",
            );
        }
    }

    errors.into_result()
}

pub fn validate_judging(form: &JudgingForm) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    for (i, criterion) in form.criteria.iter().enumerate() {
        if is_blank(&criterion.name) {
            errors.push(format!("criteria[{i}].name"), "Criterion name is required");
        }
        if !(0.0..=100.0).contains(&criterion.weight) {
            errors.push(
                format!("criteria[{i}].weight"),
                "Weight must be between 0 and 100",
            );
        }
    }

    if !form.criteria.is_empty() {
        let total: f64 = form.criteria.iter().map(|c| c.weight).sum();
        if (total - WEIGHT_TOTAL).abs() > WEIGHT_TOLERANCE {
            errors.push(
                "criteria[0].weight",
                format!("Criteria weights must add up to 100% (currently {total}%)"),
            );
        }
    }

    errors.into_result()
}

pub fn validate_collaboration(form: &CollaborationForm) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if is_blank(&form.contact_email) || !form.contact_email.trim().validate_email() {
        errors.push("contact_email", "A valid contact email is required");
    }

    for (i, link) in form.social_links.iter().enumerate() {
        if !is_blank(link) && !is_valid_url(link) {
            errors.push(format!("social_links[{i}]"), "Must be a valid URL");
        }
    }

    if form.sponsors_partners.is_empty() {
        errors.push(
            "sponsors_partners",
            "At least one sponsor or partner is required",
        );
    }

    for (i, sponsor) in form.sponsors_partners.iter().enumerate() {
        if is_blank(&sponsor.name) {
            errors.push(
                format!("sponsors_partners[{i}].name"),
                "Sponsor name is required",
            );
        }
        if let Some(logo) = sponsor.logo.as_deref() {
            if !is_blank(logo) && !is_valid_url(logo) {
                errors.push(
                    format!("sponsors_partners[{i}].logo"),
                    "Logo must be a valid URL",
                );
            }
        }
        if let Some(link) = sponsor.link.as_deref() {
            if !is_blank(link) && !is_valid_url(link) {
                errors.push(
                    format!("sponsors_partners[{i}].link"),
                    "Link must be a valid URL",
                );
            }
        }
    }

    errors.into_result()
}

/// Parse a user-entered amount; `None` for anything that is not a finite number.
pub(crate) fn parse_amount(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

fn is_valid_url(s: &str) -> bool {
    s.trim().validate_url()
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::forms::{
        Category, CriterionForm, ParticipantType, PhaseForm, PrizeTierForm, SponsorForm,
        TabVisibility,
    };

    fn information() -> InformationForm {
        InformationForm {
            name: "Stellar Build Week".to_string(),
            banner: "https://cdn.example.com/banner.png".to_string(),
            description: "A week of building on Soroban.".to_string(),
            category: Category::Defi,
            venue_type: VenueType::Virtual,
            country: None,
            state: None,
            city: None,
            venue_name: None,
            venue_address: None,
        }
    }

    fn timeline(days: [u32; 4]) -> TimelineForm {
        let at = |d: u32| Utc.with_ymd_and_hms(2025, 1, d, 0, 0, 0).unwrap();
        TimelineForm {
            start_date: at(days[0]),
            submission_deadline: at(days[1]),
            end_date: at(days[2]),
            registration_deadline: at(days[3]),
            phases: vec![],
        }
    }

    fn criteria(weights: &[f64]) -> JudgingForm {
        JudgingForm {
            criteria: weights
                .iter()
                .enumerate()
                .map(|(i, w)| CriterionForm {
                    id: format!("criterion-{i}"),
                    name: format!("Criterion {i}"),
                    weight: *w,
                    description: None,
                })
                .collect(),
        }
    }

    fn tier(amount: &str) -> PrizeTierForm {
        PrizeTierForm {
            id: "tier-0".to_string(),
            place: "1st Place".to_string(),
            prize_amount: amount.to_string(),
            description: None,
            currency: None,
            pass_mark: 70.0,
        }
    }

    fn collaboration() -> CollaborationForm {
        CollaborationForm {
            contact_email: "team@example.org".to_string(),
            telegram: Some("@buildweek".to_string()),
            discord: None,
            social_links: vec!["https://x.com/buildweek".to_string(), "".to_string()],
            sponsors_partners: vec![SponsorForm {
                id: "sponsor-0".to_string(),
                name: "Stellar Foundation".to_string(),
                logo: Some("https://cdn.example.com/sdf.png".to_string()),
                link: None,
            }],
        }
    }

    // ── Information ──────────────────────────────────────

    #[test]
    fn information_valid_virtual() {
        assert!(validate_information(&information()).is_ok());
    }

    #[test]
    fn information_title_bounds() {
        let mut form = information();
        form.name = "ab".to_string();
        let errs = validate_information(&form).unwrap_err();
        assert!(errs.message_for("name").is_some());

        form.name = "x".repeat(101);
        assert!(validate_information(&form).is_err());

        form.name = "abc".to_string();
        assert!(validate_information(&form).is_ok());
    }

    #[test]
    fn information_physical_requires_venue_fields() {
        let mut form = information();
        form.venue_type = VenueType::Physical;
        form.city = Some("Lagos".to_string());
        let errs = validate_information(&form).unwrap_err();
        for field in ["country", "state", "venue_name", "venue_address"] {
            assert!(errs.message_for(field).is_some(), "missing error for {field}");
        }
        assert!(errs.message_for("city").is_none());
    }

    #[test]
    fn information_rejects_non_url_banner() {
        let mut form = information();
        form.banner = "banner.png".to_string();
        let errs = validate_information(&form).unwrap_err();
        assert_eq!(errs.message_for("banner"), Some("Banner must be a valid URL"));
    }

    // ── Timeline ─────────────────────────────────────────

    #[test]
    fn timeline_strictly_ordered_is_accepted() {
        assert!(validate_timeline(&timeline([1, 2, 3, 4])).is_ok());
    }

    #[test]
    fn timeline_equal_dates_are_rejected() {
        let errs = validate_timeline(&timeline([1, 1, 3, 4])).unwrap_err();
        assert!(errs.message_for("submission_deadline").is_some());

        assert!(validate_timeline(&timeline([1, 2, 2, 4])).is_err());
        assert!(validate_timeline(&timeline([1, 2, 3, 3])).is_err());
    }

    #[test]
    fn timeline_phase_must_end_after_start() {
        let mut form = timeline([1, 2, 3, 4]);
        form.phases.push(PhaseForm {
            name: "Ideation".to_string(),
            start_date: form.submission_deadline,
            end_date: form.start_date,
            description: None,
        });
        let errs = validate_timeline(&form).unwrap_err();
        assert!(errs.message_for("phases[0].end_date").is_some());
    }

    // ── Participation ────────────────────────────────────

    #[test]
    fn participation_individual_ignores_team_bounds() {
        let form = ParticipationForm {
            participant_type: ParticipantType::Individual,
            team_min: None,
            team_max: None,
            require_github: true,
            require_demo_video: false,
            require_other_links: false,
            tabs: TabVisibility::default(),
        };
        assert!(validate_participation(&form).is_ok());
    }

    #[test]
    fn participation_team_bounds() {
        let mut form = ParticipationForm {
            participant_type: ParticipantType::TeamOrIndividual,
            team_min: Some(2),
            team_max: Some(5),
            require_github: false,
            require_demo_video: false,
            require_other_links: false,
            tabs: TabVisibility::default(),
        };
        assert!(validate_participation(&form).is_ok());

        form.team_min = Some(6);
        assert!(validate_participation(&form).is_err());

        form.team_min = Some(0);
        form.team_max = Some(21);
        let errs = validate_participation(&form).unwrap_err();
        assert!(errs.message_for("team_min").is_some());
        assert!(errs.message_for("team_max").is_some());

        form.team_min = None;
        form.team_max = Some(4);
        assert!(validate_participation(&form).is_err());
    }

    // ── Rewards ──────────────────────────────────────────

    #[test]
    fn rewards_require_at_least_one_tier() {
        let errs = validate_rewards(&RewardsForm {
            prize_tiers: vec![],
        })
        .unwrap_err();
        assert!(errs.message_for("prize_tiers").is_some());
    }

    #[test]
    fn rewards_reject_unparseable_amount() {
        let errs = validate_rewards(&RewardsForm {
            prize_tiers: vec![tier("abc")],
        })
        .unwrap_err();
        assert_eq!(
            errs.message_for("prize_tiers[0].prize_amount"),
            Some("Prize amount must be a valid number")
        );
    }

    #[test]
    fn rewards_reject_negative_amount_and_bad_pass_mark() {
        let mut bad = tier("-5");
        bad.pass_mark = 101.0;
        let errs = validate_rewards(&RewardsForm {
            prize_tiers: vec![bad],
        })
        .unwrap_err();
        assert!(errs.message_for("prize_tiers[0].prize_amount").is_some());
        assert!(errs.message_for("prize_tiers[0].pass_mark").is_some());
    }

    #[test]
    fn rewards_accept_numeric_amount() {
        assert!(validate_rewards(&RewardsForm {
            prize_tiers: vec![tier("1000")],
        })
        .is_ok());
    }

    // ── Judging ──────────────────────────────────────────

    #[test]
    fn judging_weights_must_sum_to_hundred() {
        let errs = validate_judging(&criteria(&[50.0, 49.0])).unwrap_err();
        assert!(errs.message_for("criteria[0].weight").is_some());
        assert_eq!(errs.errors().len(), 1);
    }

    #[test]
    fn judging_weight_tolerance() {
        assert!(validate_judging(&criteria(&[50.01, 49.99])).is_ok());
        assert!(validate_judging(&criteria(&[50.0, 49.995])).is_ok());
        assert!(validate_judging(&criteria(&[50.0, 49.98])).is_err());
    }

    #[test]
    fn judging_empty_list_is_accepted() {
        assert!(validate_judging(&criteria(&[])).is_ok());
    }

    #[test]
    fn judging_weight_out_of_range() {
        let errs = validate_judging(&criteria(&[120.0, -20.0])).unwrap_err();
        assert!(errs.message_for("criteria[0].weight").is_some());
        assert!(errs.message_for("criteria[1].weight").is_some());
    }

    // ── Collaboration ────────────────────────────────────

    #[test]
    fn collaboration_valid_with_blank_social_link() {
        assert!(validate_collaboration(&collaboration()).is_ok());
    }

    #[test]
    fn collaboration_rejects_bad_email_and_links() {
        let mut form = collaboration();
        form.contact_email = "not-an-email".to_string();
        form.social_links = vec!["nope".to_string()];
        form.sponsors_partners[0].link = Some("also nope".to_string());
        let errs = validate_collaboration(&form).unwrap_err();
        assert!(errs.message_for("contact_email").is_some());
        assert!(errs.message_for("social_links[0]").is_some());
        assert!(errs.message_for("sponsors_partners[0].link").is_some());
    }

    #[test]
    fn collaboration_email_is_trimmed_and_required() {
        let mut form = collaboration();
        form.contact_email = "  team@example.org ".to_string();
        assert!(validate_collaboration(&form).is_ok());

        form.contact_email = "   ".to_string();
        let errs = validate_collaboration(&form).unwrap_err();
        assert!(errs.message_for("contact_email").is_some());
    }

    #[test]
    fn collaboration_requires_a_sponsor() {
        let mut form = collaboration();
        form.sponsors_partners.clear();
        let errs = validate_collaboration(&form).unwrap_err();
        assert!(errs.message_for("sponsors_partners").is_some());
    }

    #[test]
    fn dispatch_by_step_kind() {
        assert!(validate(&StepData::Judging(criteria(&[100.0]))).is_ok());
        assert!(validate(&StepData::Rewards(RewardsForm {
            prize_tiers: vec![tier("abc")],
        }))
        .is_err());
    }

    #[test]
    fn display_joins_field_errors() {
        let mut errs = ValidationErrors::new();
        errs.push("name", "Title is required");
        errs.push("banner", "Banner image is required");
        assert_eq!(
            errs.to_string(),
            "name: Title is required; banner: Banner image is required"
        );
    }
}
