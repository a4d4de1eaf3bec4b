//! Depth-bounded structural merge of two entity trees.
//!
//! Deterministic and depth-first. Local wins on primitive collisions,
//! arrays union by value with local order preserved, objects merge over
//! the union of their keys. Termination is guaranteed by the explicit
//! depth counter, not by structural analysis; inputs are assumed acyclic.

use serde_json::{Map, Value};

/// Merge `remote` into `local`, recursing at most `max_depth` levels.
///
/// - At or past the depth bound the local subtree is returned unchanged.
/// - A `Null` local defers to remote; any other primitive keeps local.
/// - Arrays: local's elements in order, then each remote element not
///   already present by deep equality, in remote order.
/// - Objects: union of both key sets; shared keys merge one level deeper,
///   one-sided keys are copied verbatim.
/// - Mismatched container kinds (array vs object) keep local.
pub fn merge_values(local: &Value, remote: &Value, max_depth: usize) -> Value {
    merge_at(local, remote, max_depth, 0)
}

fn merge_at(local: &Value, remote: &Value, max_depth: usize, depth: usize) -> Value {
    if depth >= max_depth {
        return local.clone();
    }
    match (local, remote) {
        (Value::Object(l), Value::Object(r)) => {
            Value::Object(merge_objects(l, r, max_depth, depth))
        }
        (Value::Array(l), Value::Array(r)) => Value::Array(merge_arrays(l, r)),
        (Value::Null, _) => remote.clone(),
        _ => local.clone(),
    }
}

fn merge_objects(
    local: &Map<String, Value>,
    remote: &Map<String, Value>,
    max_depth: usize,
    depth: usize,
) -> Map<String, Value> {
    let mut merged = Map::new();
    for (key, local_value) in local {
        match remote.get(key) {
            Some(remote_value) => {
                merged.insert(
                    key.clone(),
                    merge_at(local_value, remote_value, max_depth, depth + 1),
                );
            }
            None => {
                merged.insert(key.clone(), local_value.clone());
            }
        }
    }
    for (key, remote_value) in remote {
        if !local.contains_key(key) {
            merged.insert(key.clone(), remote_value.clone());
        }
    }
    merged
}

// Set-union by value. Deep equality does not terminate on cyclic inputs;
// entity trees are acyclic.
fn merge_arrays(local: &[Value], remote: &[Value]) -> Vec<Value> {
    let mut merged = local.to_vec();
    for item in remote {
        if !merged.contains(item) {
            merged.push(item.clone());
        }
    }
    merged
}
