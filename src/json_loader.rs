//! JSON normalization for collaborator-supplied collections.
//!
//! The persistence API hands over plain JSON arrays. This module maps them
//! into typed `Contact`/`Activity` records: malformed elements are skipped
//! with a warning (per-record tolerance, never fatal), while a top-level
//! value that isn't an array at all is an error. Flag fields that arrive
//! as JSON booleans are normalized to the "Yes"/"No" strings the rest of
//! the engine matches on.

use serde::Deserialize;
use serde_json::Value;

use crate::error::EngineError;
use crate::types::{Activity, Channel, Contact};

/// Raw activity shape as delivered over the wire. Channel arrives as a
/// string and flags may be booleans, so this mirrors the payload before
/// conversion into the typed record.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsonActivity {
    id: String,
    contact_id: String,
    #[serde(default)]
    project_id: Option<String>,
    #[serde(rename = "type")]
    activity_type: String,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    call_status: Option<String>,
    #[serde(default)]
    call_number: Option<String>,
    #[serde(default)]
    call_date: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    email_date: Option<String>,
    #[serde(default)]
    next_action_date: Option<String>,
    #[serde(default)]
    conversation_notes: Option<String>,
    #[serde(default)]
    ln_request_sent: Option<Value>,
    #[serde(default)]
    connected: Option<Value>,
    #[serde(default)]
    linkedin_date: Option<String>,
}

/// "Yes"/"No"/string passthrough for flags that sometimes arrive as JSON
/// booleans.
fn flag_to_string(value: Option<Value>) -> Option<String> {
    match value {
        Some(Value::Bool(true)) => Some("Yes".to_string()),
        Some(Value::Bool(false)) => Some("No".to_string()),
        Some(Value::String(s)) => Some(s),
        _ => None,
    }
}

/// Normalize a JSON array into typed contacts. Elements that fail to parse
/// are skipped with a warning.
pub fn load_contacts(value: &Value) -> Result<Vec<Contact>, EngineError> {
    let items = value
        .as_array()
        .ok_or_else(|| EngineError::InvalidInput("expected a JSON array of contacts".into()))?;

    let mut contacts = Vec::with_capacity(items.len());
    for item in items {
        match serde_json::from_value::<Contact>(item.clone()) {
            Ok(contact) => contacts.push(contact),
            Err(e) => log::warn!("skipping malformed contact record: {}", e),
        }
    }
    Ok(contacts)
}

/// Normalize a JSON array into typed activities. Elements that fail to
/// parse or carry an unrecognized channel are skipped with a warning.
pub fn load_activities(value: &Value) -> Result<Vec<Activity>, EngineError> {
    let items = value
        .as_array()
        .ok_or_else(|| EngineError::InvalidInput("expected a JSON array of activities".into()))?;

    let mut activities = Vec::with_capacity(items.len());
    for item in items {
        let raw: JsonActivity = match serde_json::from_value(item.clone()) {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!("skipping malformed activity record: {}", e);
                continue;
            }
        };

        let channel = match raw.activity_type.as_str() {
            "call" => Channel::Call,
            "email" => Channel::Email,
            "linkedin" => Channel::Linkedin,
            other => {
                log::warn!("skipping activity {} with unknown channel {:?}", raw.id, other);
                continue;
            }
        };

        activities.push(Activity {
            id: raw.id,
            contact_id: raw.contact_id,
            project_id: raw.project_id,
            channel,
            created_at: raw.created_at,
            call_status: raw.call_status,
            call_number: raw.call_number,
            call_date: raw.call_date,
            status: raw.status,
            email_date: raw.email_date,
            next_action_date: raw.next_action_date,
            conversation_notes: raw.conversation_notes,
            ln_request_sent: flag_to_string(raw.ln_request_sent),
            connected: flag_to_string(raw.connected),
            linkedin_date: raw.linkedin_date,
        });
    }
    Ok(activities)
}
