//! Memoized report lookups keyed by input identity.
//!
//! The key is a sha256 fingerprint of (project, channel, granularity, the
//! serialized contact and activity collections). Any change to the input
//! set changes the fingerprint, so stale entries are simply never hit
//! again; `invalidate_all` exists for callers that want to bound memory.
//! Computation stays pure, so a cache hit and a recompute are
//! indistinguishable to the caller.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use sha2::{Digest, Sha256};

use crate::report::{compute, FunnelReport};
use crate::types::{Activity, Channel, Contact, Granularity};

#[derive(Debug, Default)]
pub struct ReportCache {
    entries: Mutex<HashMap<String, Arc<FunnelReport>>>,
}

impl ReportCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached report for these exact inputs, computing and
    /// storing it on a miss. A poisoned lock degrades to recomputing.
    pub fn get_or_compute(
        &self,
        project_id: Option<&str>,
        channel: Channel,
        granularity: Granularity,
        contacts: &[Contact],
        activities: &[Activity],
    ) -> Arc<FunnelReport> {
        let key = cache_key(project_id, channel, granularity, contacts, activities);

        if let Ok(entries) = self.entries.lock() {
            if let Some(hit) = entries.get(&key) {
                log::debug!("report cache hit for {}", &key[..12]);
                return Arc::clone(hit);
            }
        }

        let report = Arc::new(compute(channel, granularity, contacts, activities));
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key, Arc::clone(&report));
        }
        report
    }

    pub fn invalidate_all(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Fingerprint the full input identity. Field order in the serialized
/// records is fixed by the struct definitions, so equal inputs always hash
/// equal.
fn cache_key(
    project_id: Option<&str>,
    channel: Channel,
    granularity: Granularity,
    contacts: &[Contact],
    activities: &[Activity],
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(project_id.unwrap_or("all").as_bytes());
    hasher.update([0u8]);
    hasher.update(channel.as_str().as_bytes());
    hasher.update([0u8]);
    hasher.update(granularity.as_str().as_bytes());
    hasher.update([0u8]);
    // Serialization of plain data structs cannot fail; an error would only
    // mean an unkeyed (recomputed) entry anyway.
    let _ = serde_json::to_writer(&mut hasher, contacts);
    hasher.update([0u8]);
    let _ = serde_json::to_writer(&mut hasher, activities);
    hex::encode(hasher.finalize())
}
