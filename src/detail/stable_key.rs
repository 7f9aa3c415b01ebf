//! CRDT stable-key mode (§4.3c, §5, §6).
//!
//! Grounded on `crdt_detail_parser.rs`, with two corrections required by the
//! spec and documented in DESIGN.md:
//! 1. The teacher hashes with `std::collections::hash_map::DefaultHasher`,
//!    which is process/architecture-dependent. This uses SHA-256 (`sha2`),
//!    the portable primitive §5/§6 require.
//! 2. The teacher's `is_stable_key`/`parse_stable_key` split on `_` and check
//!    for exactly two parts, which breaks because the URL-safe base64
//!    alphabet itself contains `_`. The hash segment is fixed to exactly 16
//!    url-safe base64 characters (§6's normative format), so parsing takes a
//!    fixed 16-char prefix plus a trailing `_<index>` instead of a naive split.

use crate::detail::tree::{element_to_value, value_to_element, DetailElement};
use crate::error::DetailError;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::collections::HashMap;

const SALT: &str = "stable_key_salt";
const HASH_LEN: usize = 16;
const TAG_KEY: &str = "_tag";

/// `base64url_nopad(sha256(uid ∥ tagName ∥ "stable_key_salt")[0..8]) ∥ "_" ∥ index`.
pub fn generate_stable_key(uid: &str, tag_name: &str, index: usize) -> String {
    let mut hasher = Sha256::new();
    hasher.update(uid.as_bytes());
    hasher.update(tag_name.as_bytes());
    hasher.update(SALT.as_bytes());
    let digest = hasher.finalize();
    let prefix = URL_SAFE_NO_PAD.encode(&digest[..8]);
    debug_assert_eq!(prefix.len(), HASH_LEN);
    format!("{prefix}_{index}")
}

/// Whether `key` matches `<16 url-safe base64 chars>_<non-negative integer>`.
pub fn is_stable_key(key: &str) -> bool {
    parse_stable_key(key).is_some()
}

/// Splits a stable key into its hash prefix and index, if it matches the
/// normative format.
pub fn parse_stable_key(key: &str) -> Option<(&str, u64)> {
    if key.len() <= HASH_LEN + 1 {
        return None;
    }
    let (prefix, rest) = key.split_at(HASH_LEN);
    let index_str = rest.strip_prefix('_')?;
    let index = index_str.parse::<u64>().ok()?;
    if prefix.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
        Some((prefix, index))
    } else {
        None
    }
}

/// Groups children by tag, producing stable keys for any tag occurring more
/// than once and leaving singleton tags under their natural name (§4.3c).
/// Scoped to the direct children of `<detail>` (Open Question resolution E.2).
pub fn to_stable_key_map(uid: &str, children: &[DetailElement]) -> Map<String, Value> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<&DetailElement>> = HashMap::new();
    for child in children {
        groups.entry(child.name.clone()).or_insert_with(|| {
            order.push(child.name.clone());
            Vec::new()
        });
        groups.get_mut(&child.name).unwrap().push(child);
    }

    let mut map = Map::new();
    for tag in order {
        let group = groups.remove(&tag).unwrap();
        if group.len() == 1 {
            map.insert(tag.clone(), element_to_value(group[0]));
        } else {
            for (i, el) in group.iter().enumerate() {
                let key = generate_stable_key(uid, &tag, i);
                let mut value = element_to_value(el);
                if let Value::Object(obj) = &mut value {
                    obj.insert(TAG_KEY.to_string(), Value::String(tag.clone()));
                } else {
                    let mut obj = Map::new();
                    obj.insert("_text".to_string(), value);
                    obj.insert(TAG_KEY.to_string(), Value::String(tag.clone()));
                    value = Value::Object(obj);
                }
                map.insert(key, value);
            }
        }
    }
    map
}

/// Reverses `to_stable_key_map`: groups stable keys by `_tag`, orders within a
/// group by the integer suffix, and falls back to treating non-stable keys as
/// singleton direct tags.
pub fn from_stable_key_map(map: &Map<String, Value>) -> Result<Vec<DetailElement>, DetailError> {
    let mut singles: Vec<(String, &Value)> = Vec::new();
    let mut grouped: HashMap<String, Vec<(u64, &Value)>> = HashMap::new();
    let mut group_order: Vec<String> = Vec::new();

    for (key, value) in map {
        if is_stable_key(key) {
            let (_, index) = parse_stable_key(key).unwrap();
            let tag = match value.get(TAG_KEY).and_then(Value::as_str) {
                Some(t) => t.to_string(),
                None => return Err(DetailError::MissingTag(key.clone())),
            };
            grouped.entry(tag.clone()).or_insert_with(|| {
                group_order.push(tag.clone());
                Vec::new()
            });
            grouped.get_mut(&tag).unwrap().push((index, value));
        } else {
            singles.push((key.clone(), value));
        }
    }

    let mut out = Vec::new();
    for (key, value) in singles {
        out.push(value_to_element(&key, value));
    }
    for tag in group_order {
        let mut entries = grouped.remove(&tag).unwrap();
        entries.sort_by_key(|(i, _)| *i);
        for (_, value) in entries {
            let mut value = value.clone();
            if let Value::Object(obj) = &mut value {
                obj.remove(TAG_KEY);
            }
            out.push(value_to_element(&tag, &value));
        }
    }
    Ok(out)
}
