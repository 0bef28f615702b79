//! End-to-end pipeline scenarios: raw JSON in, assembled report out.

use serde_json::json;

use outreachos::json_loader::{load_activities, load_contacts};
use outreachos::{compute, Channel, Granularity, ReportCache};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn fixture() -> (Vec<outreachos::Contact>, Vec<outreachos::Activity>) {
    let contacts = load_contacts(&json!([
        { "id": "1", "name": "Ada", "createdAt": "2024-01-05", "stage": "Won" },
        { "id": "2", "name": "Grace", "createdAt": "2024-02-01" },
        { "id": "3", "name": "Edsger", "createdAt": "2025-03-03" }
    ]))
    .unwrap();

    let activities = load_activities(&json!([
        {
            "id": "a1", "contactId": "1", "type": "call",
            "callStatus": "Interested", "callNumber": "1st call",
            "callDate": "2024-01-05"
        },
        {
            "id": "a2", "contactId": "1", "type": "call",
            "callStatus": "Busy", "callNumber": "2nd call",
            "callDate": "2024-01-05"
        },
        {
            "id": "a3", "contactId": "2", "type": "email",
            "status": "Meeting Completed", "emailDate": "2024-02-01"
        },
        {
            "id": "a4", "contactId": "3", "type": "call",
            "callStatus": "Ring", "callDate": "2025-03-03"
        },
        // No channel date, no createdAt: belongs to no period.
        { "id": "a5", "contactId": "2", "type": "call", "callStatus": "Busy" }
    ]))
    .unwrap();

    (contacts, activities)
}

#[test]
fn call_funnel_scenario() {
    init_logging();
    let (contacts, activities) = fixture();
    let report = compute(Channel::Call, Granularity::Day, &contacts, &activities);

    let snap = &report.snapshots["5 Jan '24"];
    assert_eq!(snap.data_allocated, 1);
    assert_eq!(snap.interested, 1);
    assert_eq!(snap.busy, 1);
    assert_eq!(snap.total_calls, 2);
    assert_eq!(snap.fresh_calls, 1);
    assert_eq!(snap.follow_ups, 1);
}

#[test]
fn period_list_is_chronological_and_deduplicated() {
    init_logging();
    let (contacts, activities) = fixture();
    let report = compute(Channel::Call, Granularity::Day, &contacts, &activities);

    // "12 Feb" style keys would sort before "5 Jan" lexically; the report
    // must order by real calendar date instead.
    assert_eq!(report.periods, vec!["5 Jan '24", "1 Feb '24", "3 Mar '25"]);
    let mut deduped = report.periods.clone();
    deduped.dedup();
    assert_eq!(deduped, report.periods);
}

#[test]
fn total_calls_conserved_across_periods() {
    let (contacts, activities) = fixture();
    let report = compute(Channel::Call, Granularity::Day, &contacts, &activities);

    let datable_calls = activities
        .iter()
        .filter(|a| a.channel == Channel::Call && a.raw_date().is_some())
        .count() as u64;
    let total: u64 = report.snapshots.values().map(|s| s.total_calls).sum();
    assert_eq!(total, datable_calls);
    assert_eq!(total, 3);
}

#[test]
fn email_non_exclusive_stages() {
    let (contacts, activities) = fixture();
    let report = compute(Channel::Email, Granularity::Day, &contacts, &activities);

    let snap = &report.snapshots["1 Feb '24"];
    assert_eq!(snap.accepted, 1);
    assert_eq!(snap.completed, 1);
    assert_eq!(snap.sql, 1);
}

#[test]
fn empty_inputs_yield_empty_report() {
    let report = compute(Channel::Linkedin, Granularity::Month, &[], &[]);
    assert!(report.periods.is_empty());
    assert!(report.snapshots.is_empty());
    assert_eq!(report.metrics["sqlRate"], 0.0);
    assert_eq!(report.metrics["winRate"], 0.0);
}

#[test]
fn pipeline_metrics_over_full_input() {
    let (contacts, activities) = fixture();
    let report = compute(Channel::Call, Granularity::Day, &contacts, &activities);

    // 1 of 3 contacts Won; 1 of 3 with a completed meeting (email); the
    // same contact is SQL.
    assert_eq!(report.metrics["winRate"], 33.3);
    assert_eq!(report.metrics["meetingRate"], 33.3);
    assert_eq!(report.metrics["sqlRate"], 33.3);
}

#[test]
fn recompute_is_bit_identical_and_cache_reuses_it() {
    let (contacts, activities) = fixture();

    let first = compute(Channel::Call, Granularity::Day, &contacts, &activities);
    let second = compute(Channel::Call, Granularity::Day, &contacts, &activities);
    assert_eq!(first, second);

    let cache = ReportCache::new();
    let a = cache.get_or_compute(Some("p1"), Channel::Call, Granularity::Day, &contacts, &activities);
    let b = cache.get_or_compute(Some("p1"), Channel::Call, Granularity::Day, &contacts, &activities);
    assert_eq!(cache.len(), 1);
    assert_eq!(*a, *b);
}

#[test]
fn monthly_report_buckets_and_series_align() {
    let (contacts, activities) = fixture();
    let report = compute(Channel::Call, Granularity::Month, &contacts, &activities);

    assert_eq!(report.periods, vec!["Jan '24", "Feb '24", "Mar '25"]);
    assert_eq!(report.series["totalCalls"], vec![2, 0, 1]);
    assert_eq!(report.series["dataAllocated"], vec![1, 1, 1]);

    let percent = report.series_percent_of("interested", "totalCalls");
    assert_eq!(percent, vec![50.0, 0.0, 0.0]);
}
