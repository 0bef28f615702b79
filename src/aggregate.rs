//! Funnel aggregator: contacts + activities → period-indexed counter table.
//!
//! One pass per channel. The period list is the union of contact creation
//! dates and activity resolved dates, sorted by real calendar date; every
//! period gets a zero-initialized snapshot before any counting, so quiet
//! periods show zeros instead of being absent. Records with no resolvable
//! date are skipped, never fatal.

use std::collections::BTreeMap;

use crate::classify::{apply_call_status, EngagementStage, Memberships};
use crate::period::{ordered_periods, Period};
use crate::touches::{group_call_touches, group_engagement_followups};
use crate::types::{Activity, Channel, Contact, FunnelSnapshot, Granularity};

/// Aggregation output: chronologically ordered periods plus one snapshot
/// per period key. `periods` is the ordering authority; the map exists for
/// keyed lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunnelTable {
    pub periods: Vec<Period>,
    pub snapshots: BTreeMap<String, FunnelSnapshot>,
}

impl FunnelTable {
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }
}

/// Fold one channel's view of the data into a `FunnelTable`.
///
/// `activities` may span all channels; only `channel`'s records count.
pub fn aggregate_channel(
    channel: Channel,
    granularity: Granularity,
    contacts: &[Contact],
    activities: &[Activity],
) -> FunnelTable {
    let channel_activities: Vec<&Activity> =
        activities.iter().filter(|a| a.channel == channel).collect();

    // Contact creation dates; undatable contacts bucket nowhere.
    let contact_periods: Vec<Period> = contacts
        .iter()
        .filter_map(|c| {
            let period = c
                .created_at
                .as_deref()
                .and_then(|raw| Period::from_raw(raw, granularity));
            if period.is_none() && c.created_at.is_some() {
                log::debug!("contact {} has unresolvable createdAt; skipping", c.id);
            }
            period
        })
        .collect();

    // Activity resolved dates (channel date falling back to createdAt).
    let activity_periods: Vec<Period> = channel_activities
        .iter()
        .filter_map(|a| {
            let period = a
                .raw_date()
                .and_then(|raw| Period::from_raw(raw, granularity));
            if period.is_none() {
                log::debug!("activity {} has no resolvable date; skipping", a.id);
            }
            period
        })
        .collect();

    let mut all_periods = contact_periods.clone();
    all_periods.extend(activity_periods.iter().cloned());
    let periods = ordered_periods(all_periods);

    let mut snapshots: BTreeMap<String, FunnelSnapshot> = periods
        .iter()
        .map(|p| (p.key.clone(), FunnelSnapshot::default()))
        .collect();

    // dataAllocated: one per contact, in its creation period.
    for period in &contact_periods {
        if let Some(snap) = snapshots.get_mut(&period.key) {
            snap.data_allocated += 1;
        }
    }

    match channel {
        Channel::Call => {
            // Raw volume + mutually exclusive outcome counters, per activity.
            for activity in &channel_activities {
                let Some(period) = activity
                    .raw_date()
                    .and_then(|raw| Period::from_raw(raw, granularity))
                else {
                    continue;
                };
                if let Some(snap) = snapshots.get_mut(&period.key) {
                    snap.total_calls += 1;
                    apply_call_status(snap, activity.call_status());
                }
            }

            let touches = group_call_touches(&channel_activities, granularity);
            for (key, count) in touches.fresh_by_period {
                if let Some(snap) = snapshots.get_mut(&key) {
                    snap.fresh_calls = count;
                }
            }
            for (key, count) in touches.follow_up_by_period {
                if let Some(snap) = snapshots.get_mut(&key) {
                    snap.follow_ups = count;
                }
            }
        }
        Channel::Email | Channel::Linkedin => {
            let memberships = Memberships::build(channel, &channel_activities, granularity);
            for stage in EngagementStage::ALL {
                for (key, count) in memberships.counts_by_period(stage) {
                    let Some(snap) = snapshots.get_mut(&key) else {
                        continue;
                    };
                    match stage {
                        EngagementStage::Sent => {
                            if channel == Channel::Email {
                                snap.email_sent = count;
                            } else {
                                snap.connection_sent = count;
                            }
                        }
                        EngagementStage::Accepted => snap.accepted = count,
                        EngagementStage::Cip => snap.cip = count,
                        EngagementStage::MeetingProposed => snap.meeting_proposed = count,
                        EngagementStage::Scheduled => snap.scheduled = count,
                        EngagementStage::Completed => snap.completed = count,
                        EngagementStage::Sql => snap.sql = count,
                    }
                }
            }

            let followups =
                group_engagement_followups(channel, &channel_activities, granularity);
            for (key, count) in followups {
                if let Some(snap) = snapshots.get_mut(&key) {
                    snap.followups = count;
                }
            }
        }
    }

    FunnelTable { periods, snapshots }
}
