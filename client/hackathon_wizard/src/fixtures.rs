//! Shared form fixtures for unit tests.

use chrono::{DateTime, TimeZone, Utc};

use crate::forms::{
    Category, CollaborationForm, CriterionForm, InformationForm, JudgingForm, ParticipantType,
    ParticipationForm, PhaseForm, PrizeTierForm, RewardsForm, SponsorForm, StepDataMap,
    TabVisibility, TimelineForm, VenueType,
};

pub(crate) fn date(month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, month, day, 0, 0, 0).unwrap()
}

pub(crate) fn full_map() -> StepDataMap {
    StepDataMap {
        information: Some(InformationForm {
            name: "Soroban Summer".to_string(),
            banner: "https://cdn.example.com/banner.png".to_string(),
            description: "Build smart contracts on Stellar.".to_string(),
            category: Category::Defi,
            venue_type: VenueType::Physical,
            country: Some("Nigeria".to_string()),
            state: Some("Lagos".to_string()),
            city: Some("Ikeja".to_string()),
            venue_name: Some("Hub One".to_string()),
            venue_address: Some("1 Allen Ave".to_string()),
        }),
        timeline: Some(TimelineForm {
            start_date: date(1, 1),
            submission_deadline: date(2, 1),
            end_date: date(3, 1),
            registration_deadline: date(4, 1),
            phases: vec![PhaseForm {
                name: "Ideation".to_string(),
                start_date: date(1, 1),
                end_date: date(1, 15),
                description: Some("Form teams".to_string()),
            }],
        }),
        participation: Some(ParticipationForm {
            participant_type: ParticipantType::Team,
            team_min: Some(2),
            team_max: Some(5),
            require_github: true,
            require_demo_video: true,
            require_other_links: false,
            tabs: TabVisibility {
                discussion: false,
                ..TabVisibility::default()
            },
        }),
        rewards: Some(RewardsForm {
            prize_tiers: vec![
                PrizeTierForm {
                    id: "tier-0".to_string(),
                    place: "1st Place".to_string(),
                    prize_amount: "1000".to_string(),
                    description: Some("Grand prize".to_string()),
                    currency: Some("USDC".to_string()),
                    pass_mark: 80.0,
                },
                PrizeTierForm {
                    id: "tier-1".to_string(),
                    place: "2nd Place".to_string(),
                    prize_amount: "250.5".to_string(),
                    description: None,
                    currency: Some("XLM".to_string()),
                    pass_mark: 60.0,
                },
            ],
        }),
        judging: Some(JudgingForm {
            criteria: vec![
                CriterionForm {
                    id: "criterion-0".to_string(),
                    name: "Innovation".to_string(),
                    weight: 60.0,
                    description: None,
                },
                CriterionForm {
                    id: "criterion-1".to_string(),
                    name: "Execution".to_string(),
                    weight: 40.0,
                    description: Some("Does it work?".to_string()),
                },
            ],
        }),
        collaboration: Some(CollaborationForm {
            contact_email: "hello@example.org".to_string(),
            telegram: Some("@soroban".to_string()),
            discord: None,
            social_links: vec!["https://x.com/soroban".to_string()],
            sponsors_partners: vec![SponsorForm {
                id: "sponsor-0".to_string(),
                name: "SDF".to_string(),
                logo: Some("https://cdn.example.com/sdf.png".to_string()),
                link: Some("https://stellar.org".to_string()),
            }],
        }),
    }
}

