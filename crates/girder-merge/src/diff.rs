//! Top-level field diffing between two entity snapshots.
//!
//! Two fields differ iff their JSON values are structurally unequal:
//! object comparison is key-order independent, array comparison is order
//! dependent. Bookkeeping fields (`id`, creation/update stamps) are
//! skipped in both the snake and camel spellings connectors produce.

use serde_json::{Map, Value};

use girder_core::constants::BOOKKEEPING_FIELDS;

/// Ordered set of top-level field names whose values differ.
///
/// Local's key order first, then remote-only keys in remote order. Pure:
/// no side effects. An empty result means the two snapshots agree on every
/// non-bookkeeping field.
pub fn diff_fields(local: &Map<String, Value>, remote: &Map<String, Value>) -> Vec<String> {
    let mut affected = Vec::new();

    for (key, local_value) in local {
        if is_bookkeeping(key) {
            continue;
        }
        match remote.get(key) {
            Some(remote_value) if remote_value == local_value => {}
            _ => affected.push(key.clone()),
        }
    }

    for key in remote.keys() {
        if is_bookkeeping(key) {
            continue;
        }
        if !local.contains_key(key) {
            affected.push(key.clone());
        }
    }

    affected
}

fn is_bookkeeping(field: &str) -> bool {
    BOOKKEEPING_FIELDS.contains(&field)
}
