//! Report assembler: aggregated table + metrics → presentation shape.
//!
//! Pure reshape. The chart side gets one value array per counter, parallel
//! to the ordered period list; the table side gets labelled rows, some
//! carrying a formula annotation combining two counters. Any lookup that
//! misses substitutes 0.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::aggregate::aggregate_channel;
use crate::metrics::{percentage, pipeline_metrics};
use crate::types::{Activity, Channel, Contact, FunnelSnapshot, Granularity};

/// Counter series per channel, in presentation order.
const CALL_SERIES: &[&str] = &[
    "dataAllocated",
    "totalCalls",
    "interested",
    "notInterested",
    "ring",
    "busy",
    "hangUp",
    "callBack",
    "switchOff",
    "detailsShared",
    "future",
    "invalid",
    "demoBooked",
    "unknownStatus",
    "freshCalls",
    "followUps",
];

const EMAIL_SERIES: &[&str] = &[
    "dataAllocated",
    "emailSent",
    "accepted",
    "cip",
    "meetingProposed",
    "scheduled",
    "completed",
    "sql",
    "followups",
];

const LINKEDIN_SERIES: &[&str] = &[
    "dataAllocated",
    "connectionSent",
    "accepted",
    "cip",
    "meetingProposed",
    "scheduled",
    "completed",
    "sql",
    "followups",
];

fn series_names(channel: Channel) -> &'static [&'static str] {
    match channel {
        Channel::Call => CALL_SERIES,
        Channel::Email => EMAIL_SERIES,
        Channel::Linkedin => LINKEDIN_SERIES,
    }
}

/// Row labels and formula annotations for the table view.
fn row_specs(channel: Channel) -> Vec<(&'static str, &'static str, Option<&'static str>)> {
    match channel {
        Channel::Call => vec![
            ("Data Allocated", "dataAllocated", None),
            ("Total Calls", "totalCalls", Some("(fresh + follow-ups)")),
            ("Interested", "interested", None),
            ("Not Interested", "notInterested", None),
            ("Ring", "ring", None),
            ("Busy", "busy", None),
            ("Hang Up", "hangUp", None),
            ("Call Back", "callBack", None),
            ("Switch Off", "switchOff", None),
            ("Details Shared", "detailsShared", None),
            ("Future", "future", None),
            ("Invalid", "invalid", None),
            ("Demo Booked", "demoBooked", None),
            ("Unknown Status", "unknownStatus", None),
            ("Fresh Calls", "freshCalls", None),
            ("Follow-ups", "followUps", None),
        ],
        Channel::Email => vec![
            ("Data Allocated", "dataAllocated", None),
            ("Emails Sent", "emailSent", None),
            ("Accepted", "accepted", None),
            ("CIP", "cip", None),
            ("Meeting Proposed", "meetingProposed", None),
            ("Meeting Scheduled", "scheduled", None),
            ("Meeting Completed", "completed", None),
            ("SQL", "sql", None),
            ("Follow-ups", "followups", None),
        ],
        Channel::Linkedin => vec![
            ("Data Allocated", "dataAllocated", None),
            ("Connections Sent", "connectionSent", None),
            ("Accepted", "accepted", None),
            ("CIP", "cip", None),
            ("Meeting Proposed", "meetingProposed", None),
            ("Meeting Scheduled", "scheduled", None),
            ("Meeting Completed", "completed", None),
            ("SQL", "sql", None),
            ("Follow-ups", "followups", None),
        ],
    }
}

/// One table row: a counter across all periods.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
    pub label: String,
    pub values: Vec<u64>,
    /// Annotation combining two counters, e.g. "(fresh + follow-ups)".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,
}

/// The full report consumed by the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunnelReport {
    pub channel: Channel,
    pub granularity: Granularity,
    /// Chronologically ascending, deduplicated period keys.
    pub periods: Vec<String>,
    pub snapshots: BTreeMap<String, FunnelSnapshot>,
    /// One value array per counter name, parallel to `periods`.
    pub series: BTreeMap<String, Vec<u64>>,
    pub rows: Vec<ReportRow>,
    /// Scalar summary rates (winRate, meetingRate, sqlRate).
    pub metrics: BTreeMap<String, f64>,
}

impl FunnelReport {
    /// Per-period percentages of one series against a baseline series,
    /// both aligned to `periods`. Missing series read as all zeros.
    pub fn series_percent_of(&self, series: &str, baseline: &str) -> Vec<f64> {
        let zeros = vec![0u64; self.periods.len()];
        let values = self.series.get(series).unwrap_or(&zeros);
        let bases = self.series.get(baseline).unwrap_or(&zeros);
        values
            .iter()
            .zip(bases.iter())
            .map(|(v, b)| percentage(*v, *b))
            .collect()
    }
}

/// Compute one channel's funnel report.
///
/// `activities` may contain all channels (and, for the all-projects view,
/// all projects concatenated); the funnel counts only `channel`'s records,
/// while the scalar pipeline metrics summarize the whole input set.
pub fn compute(
    channel: Channel,
    granularity: Granularity,
    contacts: &[Contact],
    activities: &[Activity],
) -> FunnelReport {
    let table = aggregate_channel(channel, granularity, contacts, activities);
    let metrics = pipeline_metrics(contacts, activities);

    let periods: Vec<String> = table.periods.iter().map(|p| p.key.clone()).collect();

    let mut series: BTreeMap<String, Vec<u64>> = BTreeMap::new();
    for name in series_names(channel) {
        let values: Vec<u64> = periods
            .iter()
            .map(|key| {
                table
                    .snapshots
                    .get(key)
                    .map(|s| s.counter(name))
                    .unwrap_or(0)
            })
            .collect();
        series.insert((*name).to_string(), values);
    }

    let rows: Vec<ReportRow> = row_specs(channel)
        .into_iter()
        .map(|(label, counter, formula)| ReportRow {
            label: label.to_string(),
            values: series.get(counter).cloned().unwrap_or_default(),
            formula: formula.map(|f| f.to_string()),
        })
        .collect();

    log::debug!(
        "computed {} funnel: {} periods, {} activities in scope",
        channel.as_str(),
        periods.len(),
        activities.iter().filter(|a| a.channel == channel).count(),
    );

    FunnelReport {
        channel,
        granularity,
        periods,
        snapshots: table.snapshots,
        series,
        rows,
        metrics,
    }
}

/// Restrict activities to one project. Pass the unfiltered list for the
/// all-projects view; cross-project aggregation is plain concatenation.
pub fn filter_project<'a>(activities: &'a [Activity], project_id: &str) -> Vec<&'a Activity> {
    activities
        .iter()
        .filter(|a| a.project_id.as_deref() == Some(project_id))
        .collect()
}
