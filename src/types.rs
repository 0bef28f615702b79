//! Shared data model for the funnel analytics engine.
//!
//! Contacts and Activities arrive already normalized from the persistence
//! layer (see `json_loader` for the raw-JSON path). The engine treats both
//! as immutable inputs: every computation allocates fresh output structures
//! and never writes back into these records.

use serde::{Deserialize, Serialize};

/// Outreach medium. Every activity belongs to exactly one channel; fields
/// for the other channels are absent on the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Call,
    Email,
    Linkedin,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Call => "call",
            Self::Email => "email",
            Self::Linkedin => "linkedin",
        }
    }
}

/// Bucket width for trend reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    Month,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Month => "month",
        }
    }
}

/// A prospect record. Only `id` and `createdAt` matter to the aggregator;
/// the rest ride along for the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_phone: Option<String>,
    #[serde(default)]
    pub linkedin_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    /// Pipeline stage label, e.g. "Won" / "Closed Won".
    #[serde(default)]
    pub stage: Option<String>,
}

/// One logged outreach event. Timestamps stay raw strings here; resolution
/// into calendar dates (with format fallback) happens in `period`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub contact_id: String,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(rename = "type")]
    pub channel: Channel,
    #[serde(default)]
    pub created_at: Option<String>,

    // Call fields
    #[serde(default)]
    pub call_status: Option<String>,
    /// "1st call" / "2nd call" / "3rd call", or absent.
    #[serde(default)]
    pub call_number: Option<String>,
    #[serde(default)]
    pub call_date: Option<String>,

    // Email + LinkedIn shared vocabulary
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub email_date: Option<String>,
    #[serde(default)]
    pub next_action_date: Option<String>,
    #[serde(default)]
    pub conversation_notes: Option<String>,

    // LinkedIn fields
    #[serde(default)]
    pub ln_request_sent: Option<String>,
    #[serde(default)]
    pub connected: Option<String>,
    #[serde(default)]
    pub linkedin_date: Option<String>,
}

impl Activity {
    /// Channel-specific date field, falling back to the creation timestamp.
    /// Empty/whitespace strings count as absent.
    pub fn raw_date(&self) -> Option<&str> {
        let channel_date = match self.channel {
            Channel::Call => self.call_date.as_deref(),
            Channel::Email => self.email_date.as_deref(),
            Channel::Linkedin => self.linkedin_date.as_deref(),
        };
        channel_date
            .filter(|s| !s.trim().is_empty())
            .or_else(|| self.created_at.as_deref().filter(|s| !s.trim().is_empty()))
    }

    pub fn call_status(&self) -> CallStatus {
        CallStatus::from_label(self.call_status.as_deref().unwrap_or(""))
    }

    pub fn engagement_status(&self) -> EngagementStatus {
        EngagementStatus::from_label(self.status.as_deref().unwrap_or(""))
    }

    pub fn has_notes(&self) -> bool {
        self.conversation_notes
            .as_deref()
            .map(|n| !n.trim().is_empty())
            .unwrap_or(false)
    }

    pub fn notes_char_count(&self) -> usize {
        self.conversation_notes
            .as_deref()
            .map(|n| n.chars().count())
            .unwrap_or(0)
    }
}

/// "Yes"-style flag fields (`lnRequestSent`, `connected`). The import path
/// maps JSON `true` to "Yes", so both spellings are accepted here.
pub fn is_truthy_flag(value: Option<&str>) -> bool {
    matches!(
        value.map(str::trim),
        Some(s) if s.eq_ignore_ascii_case("yes") || s.eq_ignore_ascii_case("true")
    )
}

/// Call outcome vocabulary, closed. Labels come from the CRM call log
/// verbatim; anything unrecognized lands in the explicit `Unknown` bucket
/// so the counter match stays total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallStatus {
    Interested,
    NotInterested,
    Ring,
    Busy,
    HangUp,
    CallBack,
    SwitchOff,
    DetailsShared,
    Future,
    Invalid,
    DemoBooked,
    Unknown,
}

impl CallStatus {
    /// Exact label match. Absent or unlisted labels map to `Unknown`.
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "Interested" => Self::Interested,
            "Not Interested" => Self::NotInterested,
            "Ring" => Self::Ring,
            "Busy" => Self::Busy,
            "Hang Up" => Self::HangUp,
            "Call Back" => Self::CallBack,
            "Switch Off" => Self::SwitchOff,
            "Details Shared" => Self::DetailsShared,
            "Future" => Self::Future,
            "Invalid" => Self::Invalid,
            "Demo Booked" => Self::DemoBooked,
            _ => Self::Unknown,
        }
    }
}

/// Email/LinkedIn status vocabulary (shared where the labels overlap).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngagementStatus {
    Interested,
    NotInterested,
    MeetingProposed,
    MeetingScheduled,
    MeetingCompleted,
    OutOfOffice,
    Cip,
    Unknown,
}

impl EngagementStatus {
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "Interested" => Self::Interested,
            "Not Interested" => Self::NotInterested,
            "Meeting Proposed" => Self::MeetingProposed,
            "Meeting Scheduled" => Self::MeetingScheduled,
            "Meeting Completed" => Self::MeetingCompleted,
            "Out of Office" => Self::OutOfOffice,
            "CIP" => Self::Cip,
            _ => Self::Unknown,
        }
    }
}

/// Per-period counter set. One fixed shape covers all three channels;
/// counters that don't apply to a channel simply stay zero. A period that
/// exists in the period list always has a snapshot, even if every counter
/// is zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunnelSnapshot {
    pub data_allocated: u64,

    // Call channel: raw volume + mutually exclusive status counters
    pub total_calls: u64,
    pub interested: u64,
    pub not_interested: u64,
    pub ring: u64,
    pub busy: u64,
    pub hang_up: u64,
    pub call_back: u64,
    pub switch_off: u64,
    pub details_shared: u64,
    pub future: u64,
    pub invalid: u64,
    pub demo_booked: u64,
    pub unknown_status: u64,
    pub fresh_calls: u64,
    pub follow_ups: u64,

    // Email/LinkedIn: per-contact membership counters
    pub email_sent: u64,
    pub connection_sent: u64,
    pub accepted: u64,
    pub cip: u64,
    pub meeting_proposed: u64,
    pub scheduled: u64,
    pub completed: u64,
    pub sql: u64,
    /// Once-per-contact follow-up tally (email/LinkedIn rule; distinct from
    /// the per-activity `followUps` used by calls).
    pub followups: u64,
}

impl FunnelSnapshot {
    /// Look up a counter by its serialized (camelCase) name. Unknown names
    /// read as 0, matching the assembler's missing-value rule.
    pub fn counter(&self, name: &str) -> u64 {
        match name {
            "dataAllocated" => self.data_allocated,
            "totalCalls" => self.total_calls,
            "interested" => self.interested,
            "notInterested" => self.not_interested,
            "ring" => self.ring,
            "busy" => self.busy,
            "hangUp" => self.hang_up,
            "callBack" => self.call_back,
            "switchOff" => self.switch_off,
            "detailsShared" => self.details_shared,
            "future" => self.future,
            "invalid" => self.invalid,
            "demoBooked" => self.demo_booked,
            "unknownStatus" => self.unknown_status,
            "freshCalls" => self.fresh_calls,
            "followUps" => self.follow_ups,
            "emailSent" => self.email_sent,
            "connectionSent" => self.connection_sent,
            "accepted" => self.accepted,
            "cip" => self.cip,
            "meetingProposed" => self.meeting_proposed,
            "scheduled" => self.scheduled,
            "completed" => self.completed,
            "sql" => self.sql,
            "followups" => self.followups,
            _ => 0,
        }
    }
}
