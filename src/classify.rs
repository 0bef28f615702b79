//! Channel classifiers: one activity (calls) or a whole activity
//! collection (email/LinkedIn) → funnel-stage tallies.
//!
//! The two shapes are deliberately different. Call outcomes are mutually
//! exclusive: the `CallStatus` match is total, so exactly one counter
//! increments per call activity. Email/LinkedIn stages are independent
//! boolean memberships evaluated per contact over the entire collection:
//! one status can satisfy several stages at once, and a contact counts at
//! most once per stage no matter how many activities qualify.

use std::collections::HashMap;

use crate::period::{resolve_date, Period};
use crate::types::{
    is_truthy_flag, Activity, CallStatus, Channel, EngagementStatus, FunnelSnapshot, Granularity,
};

/// Route one call outcome into its counter. Total match over the closed
/// enum keeps the mutual-exclusivity contract checkable at compile time.
pub fn apply_call_status(snapshot: &mut FunnelSnapshot, status: CallStatus) {
    match status {
        CallStatus::Interested => snapshot.interested += 1,
        CallStatus::NotInterested => snapshot.not_interested += 1,
        CallStatus::Ring => snapshot.ring += 1,
        CallStatus::Busy => snapshot.busy += 1,
        CallStatus::HangUp => snapshot.hang_up += 1,
        CallStatus::CallBack => snapshot.call_back += 1,
        CallStatus::SwitchOff => snapshot.switch_off += 1,
        CallStatus::DetailsShared => snapshot.details_shared += 1,
        CallStatus::Future => snapshot.future += 1,
        CallStatus::Invalid => snapshot.invalid += 1,
        CallStatus::DemoBooked => snapshot.demo_booked += 1,
        CallStatus::Unknown => snapshot.unknown_status += 1,
    }
}

/// Email/LinkedIn funnel stages. `Sent` maps to `emailSent` or
/// `connectionSent` depending on the channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngagementStage {
    Sent,
    Accepted,
    Cip,
    MeetingProposed,
    Scheduled,
    Completed,
    Sql,
}

impl EngagementStage {
    pub const ALL: [EngagementStage; 7] = [
        EngagementStage::Sent,
        EngagementStage::Accepted,
        EngagementStage::Cip,
        EngagementStage::MeetingProposed,
        EngagementStage::Scheduled,
        EngagementStage::Completed,
        EngagementStage::Sql,
    ];
}

/// Notes longer than this mark an Interested email contact as SQL.
const SQL_NOTES_THRESHOLD: usize = 50;

/// Does this single activity satisfy the stage predicate for its channel?
/// Stages are not mutually exclusive: "Meeting Completed" satisfies
/// `Accepted`, `Completed`, and `Sql` at once.
pub fn stage_holds(channel: Channel, stage: EngagementStage, activity: &Activity) -> bool {
    let status = activity.engagement_status();
    match channel {
        Channel::Email => match stage {
            EngagementStage::Sent => activity
                .email_date
                .as_deref()
                .map(|d| !d.trim().is_empty())
                .unwrap_or(false),
            EngagementStage::Accepted => matches!(
                status,
                EngagementStatus::Interested
                    | EngagementStatus::MeetingProposed
                    | EngagementStatus::MeetingScheduled
                    | EngagementStatus::MeetingCompleted
            ),
            EngagementStage::Cip => matches!(
                status,
                EngagementStatus::Interested | EngagementStatus::OutOfOffice
            ),
            EngagementStage::MeetingProposed => status == EngagementStatus::MeetingProposed,
            EngagementStage::Scheduled => {
                status == EngagementStatus::MeetingScheduled
                    || activity
                        .next_action_date
                        .as_deref()
                        .map(|d| !d.trim().is_empty())
                        .unwrap_or(false)
            }
            EngagementStage::Completed => status == EngagementStatus::MeetingCompleted,
            EngagementStage::Sql => {
                status == EngagementStatus::MeetingCompleted
                    || (status == EngagementStatus::Interested
                        && activity.notes_char_count() > SQL_NOTES_THRESHOLD)
            }
        },
        Channel::Linkedin => match stage {
            EngagementStage::Sent => is_truthy_flag(activity.ln_request_sent.as_deref()),
            EngagementStage::Accepted => is_truthy_flag(activity.connected.as_deref()),
            EngagementStage::Cip => status == EngagementStatus::Cip,
            EngagementStage::MeetingProposed => status == EngagementStatus::MeetingProposed,
            EngagementStage::Scheduled => status == EngagementStatus::MeetingScheduled,
            EngagementStage::Completed => status == EngagementStatus::MeetingCompleted,
            EngagementStage::Sql => matches!(
                status,
                EngagementStatus::MeetingCompleted | EngagementStatus::Interested
            ),
        },
        // Calls use the mutually exclusive status counters, not stages.
        Channel::Call => false,
    }
}

/// Per-contact stage memberships built over a whole channel collection.
///
/// Each membership records the period of the activity that established it:
/// the chronologically first qualifying activity for that contact and
/// stage. Activities with no resolvable date cannot establish membership.
#[derive(Debug, Default)]
pub struct Memberships {
    established: HashMap<(String, EngagementStage), Period>,
}

impl Memberships {
    /// Fold the collection into membership sets. Input order breaks date
    /// ties so reruns on identical inputs are bit-identical.
    pub fn build(channel: Channel, activities: &[&Activity], granularity: Granularity) -> Self {
        let mut dated: Vec<(chrono::NaiveDate, usize, &Activity)> = activities
            .iter()
            .enumerate()
            .filter_map(|(idx, a)| {
                a.raw_date()
                    .and_then(resolve_date)
                    .map(|d| (d, idx, *a))
            })
            .collect();
        dated.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));

        let mut established = HashMap::new();
        for (date, _, activity) in dated {
            for stage in EngagementStage::ALL {
                if stage_holds(channel, stage, activity) {
                    established
                        .entry((activity.contact_id.clone(), stage))
                        .or_insert_with(|| Period::from_date(date, granularity));
                }
            }
        }

        Memberships { established }
    }

    /// Membership counts per period key for one stage.
    pub fn counts_by_period(&self, stage: EngagementStage) -> HashMap<String, u64> {
        let mut counts: HashMap<String, u64> = HashMap::new();
        for ((_, s), period) in &self.established {
            if *s == stage {
                *counts.entry(period.key.clone()).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Distinct contacts holding a stage, across all periods.
    pub fn total(&self, stage: EngagementStage) -> u64 {
        self.established.keys().filter(|(_, s)| *s == stage).count() as u64
    }
}
