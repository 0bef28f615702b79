//! Metrics calculator: percentages and scalar pipeline rates.
//!
//! Every ratio goes through `percentage`, which rounds to one decimal and
//! defines the zero-baseline case as 0 rather than NaN/Infinity. Scalar
//! pipeline metrics summarize the whole input set, not individual periods.

use std::collections::{BTreeMap, HashSet};

use crate::classify::{stage_holds, EngagementStage};
use crate::types::{Activity, CallStatus, Channel, Contact};

/// `round((value / baseline) * 100, 1)`; baseline 0 yields 0.
pub fn percentage(value: u64, baseline: u64) -> f64 {
    if baseline == 0 {
        return 0.0;
    }
    let pct = (value as f64 / baseline as f64) * 100.0;
    (pct * 10.0).round() / 10.0
}

/// Per-period stage percentages: one ratio per period, value over that
/// period's baseline counter.
pub fn period_percentages(values: &[u64], baselines: &[u64]) -> Vec<f64> {
    values
        .iter()
        .zip(baselines.iter())
        .map(|(v, b)| percentage(*v, *b))
        .collect()
}

fn stage_label_is_won(stage: Option<&str>) -> bool {
    matches!(
        stage.map(str::trim),
        Some(s) if s.eq_ignore_ascii_case("won") || s.eq_ignore_ascii_case("closed won")
    )
}

/// Scalar pipeline summary across all channels.
///
/// - `winRate`: contacts whose pipeline stage label is Won / Closed Won,
///   over total contacts.
/// - `meetingRate`: contacts with a completed meeting (email/LinkedIn
///   "Meeting Completed", or a "Demo Booked" call), over total contacts.
/// - `sqlRate`: contacts in any channel's SQL membership, over the
///   prospect baseline (total contacts).
pub fn pipeline_metrics(contacts: &[Contact], activities: &[Activity]) -> BTreeMap<String, f64> {
    let total = contacts.len() as u64;

    let won = contacts
        .iter()
        .filter(|c| stage_label_is_won(c.stage.as_deref()))
        .count() as u64;

    let mut meeting_contacts: HashSet<&str> = HashSet::new();
    let mut sql_contacts: HashSet<&str> = HashSet::new();
    for activity in activities {
        match activity.channel {
            Channel::Call => {
                if activity.call_status() == CallStatus::DemoBooked {
                    meeting_contacts.insert(activity.contact_id.as_str());
                }
            }
            Channel::Email | Channel::Linkedin => {
                if stage_holds(activity.channel, EngagementStage::Completed, activity) {
                    meeting_contacts.insert(activity.contact_id.as_str());
                }
                if stage_holds(activity.channel, EngagementStage::Sql, activity) {
                    sql_contacts.insert(activity.contact_id.as_str());
                }
            }
        }
    }

    let mut metrics = BTreeMap::new();
    metrics.insert("winRate".to_string(), percentage(won, total));
    metrics.insert(
        "meetingRate".to_string(),
        percentage(meeting_contacts.len() as u64, total),
    );
    metrics.insert(
        "sqlRate".to_string(),
        percentage(sql_contacts.len() as u64, total),
    );
    metrics
}
