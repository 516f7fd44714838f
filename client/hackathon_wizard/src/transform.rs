//! Bidirectional mapping between wizard form shapes and the backend schema.
//!
//! Forward (`*_to_api`) is total: it renames fields, flattens enums into
//! their backend literals, formats dates as ISO-8601, defaults missing
//! amounts to `0` and currencies to [`DEFAULT_CURRENCY`], and drops blank
//! links. Reverse (`*_from_api`) undoes that and synthesises the
//! client-side list identifiers (`tier-{i}`, `criterion-{i}`,
//! `sponsor-{i}`); it fails only on records the backend should never have
//! produced (unknown enum literals, unparseable dates).
//!
//! Both directions are pure.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::errors::{Result, WizardError};
use crate::forms::{
    Category, CollaborationForm, CriterionForm, InformationForm, JudgingForm, ParticipantType,
    ParticipationForm, PhaseForm, PrizeTierForm, RewardsForm, SponsorForm, StepData, StepDataMap,
    TabVisibility, TimelineForm, VenueType, DEFAULT_CURRENCY,
};
use crate::hackathon::{
    CollaborationSection, Criterion, HackathonData, InformationSection, JudgingSection,
    ParticipationSection, Phase, PrizeTier, PublishPayload, RewardsSection, SponsorPartner,
    SubmissionRequirements, TabVisibilitySection, TeamSize, TimelineSection, Venue,
};
use crate::schema::parse_amount;
use crate::steps::StepKey;

// ─────────────────────────────────────────────────────────
// Aggregate mappings
// ─────────────────────────────────────────────────────────

/// Forward-map every section present in `map`.
pub fn to_api(map: &StepDataMap) -> HackathonData {
    HackathonData {
        information: map.information.as_ref().map(information_to_api),
        timeline: map.timeline.as_ref().map(timeline_to_api),
        participation: map.participation.as_ref().map(participation_to_api),
        rewards: map.rewards.as_ref().map(rewards_to_api),
        judging: map.judging.as_ref().map(judging_to_api),
        collaboration: map.collaboration.as_ref().map(collaboration_to_api),
    }
}

/// Forward-map a single step's data into an otherwise empty [`HackathonData`].
pub fn step_to_api(data: &StepData) -> HackathonData {
    let mut out = HackathonData::default();
    match data {
        StepData::Information(d) => out.information = Some(information_to_api(d)),
        StepData::Timeline(d) => out.timeline = Some(timeline_to_api(d)),
        StepData::Participation(d) => out.participation = Some(participation_to_api(d)),
        StepData::Rewards(d) => out.rewards = Some(rewards_to_api(d)),
        StepData::Judging(d) => out.judging = Some(judging_to_api(d)),
        StepData::Collaboration(d) => out.collaboration = Some(collaboration_to_api(d)),
    }
    out
}

/// Keep only the section belonging to `key`.
pub fn section_only(data: &HackathonData, key: StepKey) -> HackathonData {
    let mut out = HackathonData::default();
    match key {
        StepKey::Information => out.information = data.information.clone(),
        StepKey::Timeline => out.timeline = data.timeline.clone(),
        StepKey::Participation => out.participation = data.participation.clone(),
        StepKey::Rewards => out.rewards = data.rewards.clone(),
        StepKey::Judging => out.judging = data.judging.clone(),
        StepKey::Collaboration => out.collaboration = data.collaboration.clone(),
        StepKey::Review => {}
    }
    out
}

/// Build the publish body. Fails with [`WizardError::IncompleteSteps`] when
/// any of the six sections is absent.
pub fn to_publish_payload(map: &StepDataMap, draft_id: Option<&str>) -> Result<PublishPayload> {
    match (
        &map.information,
        &map.timeline,
        &map.participation,
        &map.rewards,
        &map.judging,
        &map.collaboration,
    ) {
        (
            Some(info),
            Some(timeline),
            Some(participation),
            Some(rewards),
            Some(judging),
            Some(collab),
        ) => Ok(PublishPayload {
            draft_id: draft_id.map(String::from),
            information: information_to_api(info),
            timeline: timeline_to_api(timeline),
            participation: participation_to_api(participation),
            rewards: rewards_to_api(rewards),
            judging: judging_to_api(judging),
            collaboration: collaboration_to_api(collab),
        }),
        _ => Err(WizardError::IncompleteSteps(map.missing())),
    }
}

/// Reverse-map every section present in `data`.
pub fn from_api(data: &HackathonData) -> Result<StepDataMap> {
    Ok(StepDataMap {
        information: data.information.as_ref().map(information_from_api).transpose()?,
        timeline: data.timeline.as_ref().map(timeline_from_api).transpose()?,
        participation: data
            .participation
            .as_ref()
            .map(participation_from_api)
            .transpose()?,
        rewards: data.rewards.as_ref().map(rewards_from_api),
        judging: data.judging.as_ref().map(judging_from_api),
        collaboration: data.collaboration.as_ref().map(collaboration_from_api),
    })
}

// ─────────────────────────────────────────────────────────
// Information
// ─────────────────────────────────────────────────────────

pub fn information_to_api(form: &InformationForm) -> InformationSection {
    InformationSection {
        title: form.name.clone(),
        banner: form.banner.clone(),
        description: form.description.clone(),
        category: form.category.as_backend_str().to_string(),
        venue: Venue {
            venue_type: form.venue_type.as_backend_str().to_string(),
            country: form.country.clone(),
            state: form.state.clone(),
            city: form.city.clone(),
            venue_name: form.venue_name.clone(),
            venue_address: form.venue_address.clone(),
        },
    }
}

pub fn information_from_api(section: &InformationSection) -> Result<InformationForm> {
    let category = Category::from_backend_str(&section.category).ok_or_else(|| {
        WizardError::Transform(format!("unknown category '{}'", section.category))
    })?;
    let venue_type = VenueType::from_backend_str(&section.venue.venue_type).ok_or_else(|| {
        WizardError::Transform(format!("unknown venue type '{}'", section.venue.venue_type))
    })?;

    Ok(InformationForm {
        name: section.title.clone(),
        banner: section.banner.clone(),
        description: section.description.clone(),
        category,
        venue_type,
        country: section.venue.country.clone(),
        state: section.venue.state.clone(),
        city: section.venue.city.clone(),
        venue_name: section.venue.venue_name.clone(),
        venue_address: section.venue.venue_address.clone(),
    })
}

// ─────────────────────────────────────────────────────────
// Timeline
// ─────────────────────────────────────────────────────────

pub fn timeline_to_api(form: &TimelineForm) -> TimelineSection {
    TimelineSection {
        start_date: format_date(&form.start_date),
        submission_deadline: format_date(&form.submission_deadline),
        judging_date: format_date(&form.end_date),
        winner_announcement_date: format_date(&form.registration_deadline),
        phases: form
            .phases
            .iter()
            .map(|p| Phase {
                name: p.name.clone(),
                start_date: format_date(&p.start_date),
                end_date: format_date(&p.end_date),
                description: p.description.clone(),
            })
            .collect(),
    }
}

pub fn timeline_from_api(section: &TimelineSection) -> Result<TimelineForm> {
    let phases = section
        .phases
        .iter()
        .map(|p| {
            Ok(PhaseForm {
                name: p.name.clone(),
                start_date: parse_date(&p.start_date, "phase.startDate")?,
                end_date: parse_date(&p.end_date, "phase.endDate")?,
                description: p.description.clone(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(TimelineForm {
        start_date: parse_date(&section.start_date, "startDate")?,
        submission_deadline: parse_date(&section.submission_deadline, "submissionDeadline")?,
        end_date: parse_date(&section.judging_date, "judgingDate")?,
        registration_deadline: parse_date(
            &section.winner_announcement_date,
            "winnerAnnouncementDate",
        )?,
        phases,
    })
}

// ─────────────────────────────────────────────────────────
// Participation
// ─────────────────────────────────────────────────────────

pub fn participation_to_api(form: &ParticipationForm) -> ParticipationSection {
    let team_size = match (form.participant_type.allows_teams(), form.team_min, form.team_max) {
        (true, Some(min), Some(max)) => Some(TeamSize { min, max }),
        _ => None,
    };

    ParticipationSection {
        participant_type: form.participant_type.as_backend_str().to_string(),
        team_size,
        submission_requirements: SubmissionRequirements {
            require_github: form.require_github,
            require_demo_video: form.require_demo_video,
            require_other_links: form.require_other_links,
        },
        tab_visibility: TabVisibilitySection {
            details_tab: form.tabs.details,
            participants_tab: form.tabs.participants,
            resources_tab: form.tabs.resources,
            submission_tab: form.tabs.submission,
            discussion_tab: form.tabs.discussion,
            winners_tab: form.tabs.winners,
        },
    }
}

pub fn participation_from_api(section: &ParticipationSection) -> Result<ParticipationForm> {
    let participant_type = ParticipantType::from_backend_str(&section.participant_type)
        .ok_or_else(|| {
            WizardError::Transform(format!(
                "unknown participant type '{}'",
                section.participant_type
            ))
        })?;
    let tabs = &section.tab_visibility;

    Ok(ParticipationForm {
        participant_type,
        team_min: section.team_size.map(|t| t.min),
        team_max: section.team_size.map(|t| t.max),
        require_github: section.submission_requirements.require_github,
        require_demo_video: section.submission_requirements.require_demo_video,
        require_other_links: section.submission_requirements.require_other_links,
        tabs: TabVisibility {
            details: tabs.details_tab,
            participants: tabs.participants_tab,
            resources: tabs.resources_tab,
            submission: tabs.submission_tab,
            discussion: tabs.discussion_tab,
            winners: tabs.winners_tab,
        },
    })
}

// ─────────────────────────────────────────────────────────
// Rewards
// ─────────────────────────────────────────────────────────

pub fn rewards_to_api(form: &RewardsForm) -> RewardsSection {
    RewardsSection {
        prize_tiers: form
            .prize_tiers
            .iter()
            .map(|t| PrizeTier {
                position: t.place.clone(),
                amount: parse_amount(&t.prize_amount).unwrap_or(0.0),
                description: t.description.clone(),
                currency: t
                    .currency
                    .as_deref()
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .unwrap_or(DEFAULT_CURRENCY)
                    .to_string(),
                pass_mark: t.pass_mark,
            })
            .collect(),
    }
}

pub fn rewards_from_api(section: &RewardsSection) -> RewardsForm {
    RewardsForm {
        prize_tiers: section
            .prize_tiers
            .iter()
            .enumerate()
            .map(|(i, t)| PrizeTierForm {
                id: format!("tier-{i}"),
                place: t.position.clone(),
                prize_amount: t.amount.to_string(),
                description: t.description.clone(),
                currency: Some(t.currency.clone()),
                pass_mark: t.pass_mark,
            })
            .collect(),
    }
}

// ─────────────────────────────────────────────────────────
// Judging
// ─────────────────────────────────────────────────────────

pub fn judging_to_api(form: &JudgingForm) -> JudgingSection {
    JudgingSection {
        criteria: form
            .criteria
            .iter()
            .map(|c| Criterion {
                title: c.name.clone(),
                weight: c.weight,
                description: c.description.clone(),
            })
            .collect(),
    }
}

pub fn judging_from_api(section: &JudgingSection) -> JudgingForm {
    JudgingForm {
        criteria: section
            .criteria
            .iter()
            .enumerate()
            .map(|(i, c)| CriterionForm {
                id: format!("criterion-{i}"),
                name: c.title.clone(),
                weight: c.weight,
                description: c.description.clone(),
            })
            .collect(),
    }
}

// ─────────────────────────────────────────────────────────
// Collaboration
// ─────────────────────────────────────────────────────────

pub fn collaboration_to_api(form: &CollaborationForm) -> CollaborationSection {
    CollaborationSection {
        contact_email: form.contact_email.trim().to_string(),
        telegram: non_blank(form.telegram.as_deref()),
        discord: non_blank(form.discord.as_deref()),
        social_links: form
            .social_links
            .iter()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect(),
        sponsors_partners: form
            .sponsors_partners
            .iter()
            .map(|s| SponsorPartner {
                sponsor_name: s.name.clone(),
                sponsor_logo: non_blank(s.logo.as_deref()),
                partner_link: non_blank(s.link.as_deref()),
            })
            .collect(),
    }
}

pub fn collaboration_from_api(section: &CollaborationSection) -> CollaborationForm {
    CollaborationForm {
        contact_email: section.contact_email.clone(),
        telegram: section.telegram.clone(),
        discord: section.discord.clone(),
        social_links: section.social_links.clone(),
        sponsors_partners: section
            .sponsors_partners
            .iter()
            .enumerate()
            .map(|(i, s)| SponsorForm {
                id: format!("sponsor-{i}"),
                name: s.sponsor_name.clone(),
                logo: s.sponsor_logo.clone(),
                link: s.partner_link.clone(),
            })
            .collect(),
    }
}

// ─────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────

/// ISO-8601 with milliseconds; finer precision is kept when present so the
/// reverse mapping yields the same instant.
fn format_date(dt: &DateTime<Utc>) -> String {
    let format = if dt.timestamp_subsec_nanos() % 1_000_000 == 0 {
        SecondsFormat::Millis
    } else {
        SecondsFormat::AutoSi
    };
    dt.to_rfc3339_opts(format, true)
}

fn parse_date(raw: &str, field: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| WizardError::Transform(format!("invalid {field} '{raw}': {e}")))
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::fixtures::{date, full_map};

    #[test]
    fn round_trip_preserves_every_section() {
        let map = full_map();
        let back = from_api(&to_api(&map)).unwrap();
        assert_eq!(back, map);
    }

    #[test]
    fn round_trip_preserves_minimal_shapes() {
        let mut map = full_map();
        if let Some(info) = map.information.as_mut() {
            info.venue_type = VenueType::Virtual;
            info.country = None;
            info.state = None;
            info.city = None;
            info.venue_name = None;
            info.venue_address = None;
        }
        if let Some(timeline) = map.timeline.as_mut() {
            timeline.start_date = date(1, 1) + Duration::microseconds(1500);
            timeline.submission_deadline = date(1, 1) + Duration::microseconds(1900);
            timeline.phases.clear();
        }
        if let Some(participation) = map.participation.as_mut() {
            participation.participant_type = ParticipantType::Individual;
            participation.team_min = None;
            participation.team_max = None;
        }
        if let Some(rewards) = map.rewards.as_mut() {
            rewards.prize_tiers[0].currency = None;
        }

        let back = from_api(&to_api(&map)).unwrap();

        let timeline = back.timeline.as_ref().unwrap();
        assert!(timeline.start_date < timeline.submission_deadline);
        assert_eq!(back.timeline, map.timeline);
        assert_eq!(back.information, map.information);
        assert_eq!(back.participation, map.participation);

        // An absent currency comes back as the default it was sent as.
        if let Some(rewards) = map.rewards.as_mut() {
            rewards.prize_tiers[0].currency = Some(DEFAULT_CURRENCY.to_string());
        }
        assert_eq!(back.rewards, map.rewards);
    }

    #[test]
    fn whole_millisecond_dates_keep_millisecond_format() {
        let sub_ms = date(1, 1) + Duration::microseconds(1500);
        assert_eq!(format_date(&date(1, 1)), "2025-01-01T00:00:00.000Z");
        assert_eq!(format_date(&sub_ms), "2025-01-01T00:00:00.001500Z");
        assert_eq!(parse_date(&format_date(&sub_ms), "startDate").unwrap(), sub_ms);
    }

    #[test]
    fn round_trip_regenerates_list_ids() {
        let mut map = full_map();
        if let Some(judging) = map.judging.as_mut() {
            judging.criteria[0].id = "local-abc".to_string();
        }
        let back = from_api(&to_api(&map)).unwrap();
        let criteria = &back.judging.unwrap().criteria;
        assert_eq!(criteria[0].id, "criterion-0");
        assert_eq!(criteria[1].id, "criterion-1");
        assert_eq!(criteria[0].name, "Innovation");
    }

    #[test]
    fn forward_renames_fields() {
        let api = to_api(&full_map());
        let info = api.information.unwrap();
        assert_eq!(info.title, "Soroban Summer");
        assert_eq!(info.category, "DeFi");
        assert_eq!(info.venue.venue_type, "physical");

        let timeline = api.timeline.unwrap();
        assert_eq!(timeline.judging_date, "2025-03-01T00:00:00.000Z");
        assert_eq!(timeline.winner_announcement_date, "2025-04-01T00:00:00.000Z");

        let tier = &api.rewards.unwrap().prize_tiers[0];
        assert_eq!(tier.position, "1st Place");

        let criterion = &api.judging.unwrap().criteria[0];
        assert_eq!(criterion.title, "Innovation");

        let participation = api.participation.unwrap();
        assert_eq!(participation.participant_type, "team");
        assert_eq!(participation.team_size, Some(TeamSize { min: 2, max: 5 }));
    }

    #[test]
    fn forward_defaults_amount_and_currency() {
        let form = RewardsForm {
            prize_tiers: vec![
                PrizeTierForm {
                    id: "tier-0".to_string(),
                    place: "1st".to_string(),
                    prize_amount: "1000".to_string(),
                    description: None,
                    currency: None,
                    pass_mark: 0.0,
                },
                PrizeTierForm {
                    id: "tier-1".to_string(),
                    place: "2nd".to_string(),
                    prize_amount: "".to_string(),
                    description: None,
                    currency: Some("  ".to_string()),
                    pass_mark: 0.0,
                },
            ],
        };
        let section = rewards_to_api(&form);
        assert_eq!(section.prize_tiers[0].amount, 1000.0);
        assert_eq!(section.prize_tiers[0].currency, "USDC");
        assert_eq!(section.prize_tiers[1].amount, 0.0);
        assert_eq!(section.prize_tiers[1].currency, "USDC");
    }

    #[test]
    fn forward_strips_blank_social_links() {
        let mut form = full_map().collaboration.unwrap();
        form.social_links = vec![
            "".to_string(),
            " https://discord.gg/x ".to_string(),
            "   ".to_string(),
        ];
        form.sponsors_partners[0].logo = Some("".to_string());
        let section = collaboration_to_api(&form);
        assert_eq!(section.social_links, vec!["https://discord.gg/x".to_string()]);
        assert_eq!(section.sponsors_partners[0].sponsor_logo, None);
    }

    #[test]
    fn individual_participation_drops_team_size() {
        let form = ParticipationForm {
            participant_type: ParticipantType::Individual,
            team_min: Some(1),
            team_max: Some(3),
            require_github: false,
            require_demo_video: false,
            require_other_links: false,
            tabs: TabVisibility::default(),
        };
        assert_eq!(participation_to_api(&form).team_size, None);
    }

    #[test]
    fn step_to_api_fills_only_its_section() {
        let map = full_map();
        let data = step_to_api(&map.get(StepKey::Rewards).unwrap());
        assert!(data.rewards.is_some());
        assert!(data.information.is_none());
        assert!(data.collaboration.is_none());
    }

    #[test]
    fn section_only_filters_aggregate() {
        let api = to_api(&full_map());
        let only = section_only(&api, StepKey::Timeline);
        assert_eq!(only.timeline, api.timeline);
        assert!(only.information.is_none());
        assert!(section_only(&api, StepKey::Review).is_empty());
    }

    #[test]
    fn publish_payload_requires_all_sections() {
        let mut map = full_map();
        map.rewards = None;
        match to_publish_payload(&map, Some("d1")) {
            Err(WizardError::IncompleteSteps(missing)) => {
                assert_eq!(missing, vec![StepKey::Rewards])
            }
            other => panic!("expected IncompleteSteps, got {other:?}"),
        }
    }

    #[test]
    fn publish_payload_carries_draft_id() {
        let payload = to_publish_payload(&full_map(), Some("d1")).unwrap();
        assert_eq!(payload.draft_id.as_deref(), Some("d1"));
        assert_eq!(payload.information.title, "Soroban Summer");
    }

    #[test]
    fn reverse_rejects_unknown_literals() {
        let mut api = to_api(&full_map());
        if let Some(info) = api.information.as_mut() {
            info.category = "Knitting".to_string();
        }
        assert!(matches!(from_api(&api), Err(WizardError::Transform(_))));
    }

    #[test]
    fn reverse_rejects_bad_dates() {
        let mut api = to_api(&full_map());
        if let Some(timeline) = api.timeline.as_mut() {
            timeline.start_date = "next tuesday".to_string();
        }
        assert!(matches!(from_api(&api), Err(WizardError::Transform(_))));
    }

    #[test]
    fn reverse_accepts_offset_dates() {
        let mut api = to_api(&full_map());
        if let Some(timeline) = api.timeline.as_mut() {
            timeline.start_date = "2025-01-01T01:00:00+01:00".to_string();
        }
        let back = from_api(&api).unwrap();
        assert_eq!(back.timeline.unwrap().start_date, date(1, 1));
    }
}
