//! Touch grouper: fresh (first) touches vs. follow-ups.
//!
//! The three channels use different rules on purpose; they are observed
//! business logic, not variations of one rule, and they stay separate
//! pending product clarification:
//!
//! - Calls tally per activity. An activity is fresh when it is tagged
//!   "1st call", or when it carries no call number and lands in the
//!   contact's first-touch period. Everything else is a follow-up.
//! - Email/LinkedIn tally once per contact. A contact trips the
//!   `followups` counter when it has more than one note-bearing activity
//!   (email additionally: more than one activity at all).

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::period::{resolve_date, Period};
use crate::types::{Activity, Channel, Granularity};

const FIRST_CALL_TAG: &str = "1st call";

/// Per-period-key fresh/follow-up tallies for the call channel.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CallTouches {
    pub fresh_by_period: HashMap<String, u64>,
    pub follow_up_by_period: HashMap<String, u64>,
}

/// Date-sorted view of a channel's activities, input order breaking ties.
/// Undatable activities drop out here; they belong to no period.
fn dated_activities<'a>(activities: &[&'a Activity]) -> Vec<(NaiveDate, &'a Activity)> {
    let mut dated: Vec<(NaiveDate, usize, &Activity)> = activities
        .iter()
        .enumerate()
        .filter_map(|(idx, a)| a.raw_date().and_then(resolve_date).map(|d| (d, idx, *a)))
        .collect();
    dated.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));
    dated.into_iter().map(|(d, _, a)| (d, a)).collect()
}

fn is_first_call(activity: &Activity) -> bool {
    activity
        .call_number
        .as_deref()
        .map(|n| n.trim() == FIRST_CALL_TAG)
        .unwrap_or(false)
}

fn has_call_number(activity: &Activity) -> bool {
    activity
        .call_number
        .as_deref()
        .map(|n| !n.trim().is_empty())
        .unwrap_or(false)
}

/// Group call activities into fresh touches and follow-ups, per activity.
pub fn group_call_touches(activities: &[&Activity], granularity: Granularity) -> CallTouches {
    let dated = dated_activities(activities);

    // Pass 1: each contact's first-touch period, i.e. the period of its
    // earliest activity tagged "1st call".
    let mut first_touch: HashMap<&str, String> = HashMap::new();
    for (date, activity) in &dated {
        if is_first_call(activity) {
            first_touch
                .entry(activity.contact_id.as_str())
                .or_insert_with(|| Period::from_date(*date, granularity).key);
        }
    }

    // Pass 2: tally every activity against its own period.
    let mut touches = CallTouches::default();
    for (date, activity) in &dated {
        let period = Period::from_date(*date, granularity);
        let fresh = is_first_call(activity)
            || (!has_call_number(activity)
                && first_touch.get(activity.contact_id.as_str()) == Some(&period.key));
        if fresh {
            *touches.fresh_by_period.entry(period.key).or_insert(0) += 1;
        } else {
            *touches.follow_up_by_period.entry(period.key).or_insert(0) += 1;
        }
    }

    touches
}

/// Group email/LinkedIn activities into per-contact follow-up counts.
///
/// Walks each contact's activities in date order and attributes the single
/// increment to the period of the activity at which the channel's threshold
/// first trips, so the tally lands in a deterministic bucket.
pub fn group_engagement_followups(
    channel: Channel,
    activities: &[&Activity],
    granularity: Granularity,
) -> HashMap<String, u64> {
    let dated = dated_activities(activities);

    #[derive(Default)]
    struct ContactProgress {
        total: u64,
        noted: u64,
        tripped: bool,
    }

    let mut progress: HashMap<&str, ContactProgress> = HashMap::new();
    let mut followups_by_period: HashMap<String, u64> = HashMap::new();

    for (date, activity) in &dated {
        let entry = progress.entry(activity.contact_id.as_str()).or_default();
        if entry.tripped {
            continue;
        }

        entry.total += 1;
        if activity.has_notes() {
            entry.noted += 1;
        }

        let tripped = entry.noted > 1 || (channel == Channel::Email && entry.total > 1);
        if tripped {
            entry.tripped = true;
            let key = Period::from_date(*date, granularity).key;
            *followups_by_period.entry(key).or_insert(0) += 1;
        }
    }

    followups_by_period
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(id: &str, contact: &str, date: &str, number: Option<&str>) -> Activity {
        Activity {
            id: id.to_string(),
            contact_id: contact.to_string(),
            project_id: None,
            channel: Channel::Call,
            created_at: None,
            call_status: Some("Ring".to_string()),
            call_number: number.map(|n| n.to_string()),
            call_date: Some(date.to_string()),
            status: None,
            email_date: None,
            next_action_date: None,
            conversation_notes: None,
            ln_request_sent: None,
            connected: None,
            linkedin_date: None,
        }
    }

    fn email(id: &str, contact: &str, date: &str, notes: Option<&str>) -> Activity {
        Activity {
            id: id.to_string(),
            contact_id: contact.to_string(),
            project_id: None,
            channel: Channel::Email,
            created_at: None,
            call_status: None,
            call_number: None,
            call_date: None,
            status: None,
            email_date: Some(date.to_string()),
            next_action_date: None,
            conversation_notes: notes.map(|n| n.to_string()),
            ln_request_sent: None,
            connected: None,
            linkedin_date: None,
        }
    }

    fn linkedin(id: &str, contact: &str, date: &str, notes: Option<&str>) -> Activity {
        Activity {
            channel: Channel::Linkedin,
            linkedin_date: Some(date.to_string()),
            email_date: None,
            ..email(id, contact, "", notes)
        }
    }

    #[test]
    fn first_call_tag_is_fresh() {
        let a = call("a1", "c1", "2024-01-05", Some("1st call"));
        let touches = group_call_touches(&[&a], Granularity::Day);
        assert_eq!(touches.fresh_by_period.get("5 Jan '24"), Some(&1));
        assert!(touches.follow_up_by_period.is_empty());
    }

    #[test]
    fn second_call_same_day_is_follow_up() {
        let a1 = call("a1", "c1", "2024-01-05", Some("1st call"));
        let a2 = call("a2", "c1", "2024-01-05", Some("2nd call"));
        let touches = group_call_touches(&[&a1, &a2], Granularity::Day);
        assert_eq!(touches.fresh_by_period.get("5 Jan '24"), Some(&1));
        assert_eq!(touches.follow_up_by_period.get("5 Jan '24"), Some(&1));
    }

    #[test]
    fn untagged_call_in_first_touch_period_is_fresh() {
        let a1 = call("a1", "c1", "2024-01-05", Some("1st call"));
        let a2 = call("a2", "c1", "2024-01-05", None);
        let a3 = call("a3", "c1", "2024-01-09", None);
        let touches = group_call_touches(&[&a1, &a2, &a3], Granularity::Day);
        assert_eq!(touches.fresh_by_period.get("5 Jan '24"), Some(&2));
        assert_eq!(touches.follow_up_by_period.get("9 Jan '24"), Some(&1));
    }

    #[test]
    fn untagged_call_without_first_touch_is_follow_up() {
        let a = call("a1", "c1", "2024-01-05", None);
        let touches = group_call_touches(&[&a], Granularity::Day);
        assert_eq!(touches.follow_up_by_period.get("5 Jan '24"), Some(&1));
    }

    #[test]
    fn email_second_activity_trips_followup_once() {
        let a1 = email("a1", "c1", "2024-02-01", None);
        let a2 = email("a2", "c1", "2024-02-03", None);
        let a3 = email("a3", "c1", "2024-02-05", None);
        let tally = group_engagement_followups(Channel::Email, &[&a1, &a2, &a3], Granularity::Day);
        // One increment per contact, at the second activity's period.
        assert_eq!(tally.get("3 Feb '24"), Some(&1));
        assert_eq!(tally.values().sum::<u64>(), 1);
    }

    #[test]
    fn email_single_activity_never_trips() {
        let a = email("a1", "c1", "2024-02-01", Some("long chat"));
        let tally = group_engagement_followups(Channel::Email, &[&a], Granularity::Day);
        assert!(tally.is_empty());
    }

    #[test]
    fn linkedin_requires_second_noted_activity() {
        let a1 = linkedin("a1", "c1", "2024-03-01", Some("intro"));
        let a2 = linkedin("a2", "c1", "2024-03-04", None);
        let a3 = linkedin("a3", "c1", "2024-03-08", Some("reply"));
        let refs: Vec<&Activity> = vec![&a1, &a2, &a3];

        let tally = group_engagement_followups(Channel::Linkedin, &refs, Granularity::Day);
        // Two activities alone don't trip LinkedIn; the second *noted* one does.
        assert_eq!(tally.get("8 Mar '24"), Some(&1));
        assert_eq!(tally.values().sum::<u64>(), 1);
    }

    #[test]
    fn followups_count_per_contact_not_per_activity() {
        let a1 = email("a1", "c1", "2024-02-01", None);
        let a2 = email("a2", "c1", "2024-02-02", None);
        let b1 = email("b1", "c2", "2024-02-02", None);
        let b2 = email("b2", "c2", "2024-02-02", None);
        let refs: Vec<&Activity> = vec![&a1, &a2, &b1, &b2];

        let tally = group_engagement_followups(Channel::Email, &refs, Granularity::Day);
        assert_eq!(tally.get("2 Feb '24"), Some(&2));
        assert_eq!(tally.values().sum::<u64>(), 2);
    }
}
