// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Node-group topology configuration.
//!
//! Additional node groups describe extra compute pools attached to a rack
//! (general workloads and build workloads). The serialized form accepted
//! from callers is one of: inline JSON (a value starting with `[`), a path
//! to a `.json` file, or base64-encoded JSON. After validation the set is
//! stably sorted by id and re-encoded as base64 JSON, which is the
//! canonical storage/transport form.

use crate::error::{Error, Result};
use base64::{Engine as _, engine::general_purpose};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Capacity purchasing model for a node group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CapacityType {
    OnDemand,
    Spot,
}

/// Tag keys reserved by the platform, matched case-insensitively.
const RESERVED_TAG_KEYS: [&str; 2] = ["name", "rack"];

/// Minimum disk size in GB for a node group member.
const MIN_DISK_GB: i64 = 20;

static NAME_VALIDATOR: OnceLock<regex::Regex> = OnceLock::new();

/// The platform name pattern: lowercase alphanumeric with dashes,
/// starting with a letter.
pub fn name_validator() -> &'static regex::Regex {
    NAME_VALIDATOR.get_or_init(|| {
        regex::Regex::new(r"\A[a-z][a-z0-9-]*\z").expect("name pattern compiles")
    })
}

/// One node group in an additional-node-groups document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeGroupConfig {
    /// Unique within the set once assigned. `null` in the wire form until
    /// id assignment runs.
    pub id: Option<i64>,
    /// Instance type, e.g. `m5.large`. Required.
    #[serde(rename = "type", default)]
    pub node_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disk: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity_type: Option<CapacityType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_size: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_size: Option<i64>,
    /// Node label; must match the platform name pattern. Required when
    /// `dedicated` is set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ami_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dedicated: Option<bool>,
    /// CSV of `k=v` pairs. Keys `name` and `rack` are reserved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
}

impl NodeGroupConfig {
    /// Validate one entry against the per-field constraints.
    pub fn validate(&self) -> Result<()> {
        if self.node_type.is_empty() {
            return Err(Error::validation("type", "node type is required"));
        }
        if let Some(disk) = self.disk {
            if disk < MIN_DISK_GB {
                return Err(Error::validation(
                    "disk",
                    format!("node disk is less than {MIN_DISK_GB}: '{disk}'"),
                ));
            }
        }
        if let Some(min) = self.min_size {
            if min < 0 {
                return Err(Error::validation("min_size", format!("invalid min size: '{min}'")));
            }
        }
        if let Some(max) = self.max_size {
            if max < 0 {
                return Err(Error::validation("max_size", format!("invalid max size: '{max}'")));
            }
        }
        if let (Some(min), Some(max)) = (self.min_size, self.max_size) {
            if min > max {
                return Err(Error::validation(
                    "min_size",
                    format!("min size '{min}' must be less or equal to max size '{max}'"),
                ));
            }
        }
        if let Some(label) = &self.label {
            if !name_validator().is_match(label) {
                return Err(Error::validation(
                    "label",
                    format!("label value '{label}' invalid, must be lowercase alphanumeric with dashes"),
                ));
            }
        }
        if self.dedicated == Some(true) && self.label.is_none() {
            return Err(Error::validation(
                "label",
                "label is required when dedicated option is set",
            ));
        }
        if let Some(tags) = &self.tags {
            validate_tag_pairs(tags)?;
        }
        Ok(())
    }
}

/// Validate a CSV of `k=v` tag pairs, rejecting reserved keys.
fn validate_tag_pairs(tags: &str) -> Result<()> {
    for part in tags.split(',') {
        let mut kv = part.splitn(2, '=');
        let key = kv.next().unwrap_or_default();
        if kv.next().is_none() {
            return Err(Error::validation("tags", "invalid 'tags', use format: k1=v1,k2=v2"));
        }
        if RESERVED_TAG_KEYS.contains(&key.to_lowercase().as_str()) {
            return Err(Error::validation(
                "tags",
                format!("reserved tag key '{key}' is not allowed"),
            ));
        }
    }
    Ok(())
}

/// An ordered set of additional node groups.
///
/// Invariant: either every member carries an explicit id or none does.
/// Ids are unique; when no member specifies one, validation assigns
/// `1..N` matching input order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdditionalNodeGroups(pub Vec<NodeGroupConfig>);

impl AdditionalNodeGroups {
    /// Validate every member and the set-wide id invariants, assigning
    /// ids `1..N` in place when none were given.
    pub fn validate(&mut self) -> Result<()> {
        let mut id_count = 0;
        let mut seen = std::collections::HashSet::new();
        for group in &self.0 {
            group.validate()?;
            if let Some(id) = group.id {
                id_count += 1;
                if !seen.insert(id) {
                    return Err(Error::validation(
                        "id",
                        format!("duplicate node group id is found: {id}"),
                    ));
                }
            }
        }

        if id_count > 0 && id_count != self.0.len() {
            return Err(Error::validation("id", "some node groups missing id property"));
        }

        if id_count == 0 {
            for (i, group) in self.0.iter_mut().enumerate() {
                group.id = Some(i as i64 + 1);
            }
        }
        Ok(())
    }

    /// Resolve the serialized form for parameter `key`.
    ///
    /// A value starting with `[` is parsed as JSON directly; a value
    /// ending in `.json` is read from disk; anything else is
    /// base64-decoded before JSON parsing.
    pub fn decode(key: &str, raw: &str) -> Result<Self> {
        let data = if raw.starts_with('[') {
            raw.as_bytes().to_vec()
        } else if raw.ends_with(".json") {
            std::fs::read(raw).map_err(|e| Error::Decode {
                key: key.to_string(),
                reason: format!("failed to read the file: {e}"),
            })?
        } else {
            general_purpose::STANDARD
                .decode(raw)
                .map_err(|e| Error::Decode {
                    key: key.to_string(),
                    reason: e.to_string(),
                })?
        };

        serde_json::from_slice(&data).map_err(|e| Error::Decode {
            key: key.to_string(),
            reason: e.to_string(),
        })
    }

    /// Encode the set as base64 JSON, the canonical transport form.
    pub fn encode(&self, key: &str) -> Result<String> {
        let data = serde_json::to_vec(&self.0).map_err(|e| Error::Decode {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        Ok(general_purpose::STANDARD.encode(data))
    }

    /// Stable sort by id ascending. A missing id sorts first; after
    /// validation every id is assigned, so the missing arm only matters
    /// for sets sorted before validation.
    pub fn sort_by_id(&mut self) {
        self.0.sort_by(|a, b| match (a.id, b.id) {
            (None, None) => std::cmp::Ordering::Equal,
            (None, Some(_)) => std::cmp::Ordering::Less,
            (Some(_), None) => std::cmp::Ordering::Greater,
            (Some(x), Some(y)) => x.cmp(&y),
        });
    }
}

/// Run the full decode → validate → sort → re-encode pipeline for the
/// node-group parameter `key`, returning the canonical encoded value.
pub fn canonicalize(key: &str, raw: &str) -> Result<String> {
    let mut groups = AdditionalNodeGroups::decode(key, raw)?;
    groups.validate()?;
    groups.sort_by_id();
    groups.encode(key)
}

/// Decode a canonical base64 node-group value back to its JSON text for
/// display. Values that do not decode cleanly are returned unchanged,
/// which keeps legacy plain-text values readable.
pub fn decode_for_display(value: &str) -> String {
    match general_purpose::STANDARD.decode(value) {
        Ok(data) => String::from_utf8(data).unwrap_or_else(|_| value.to_string()),
        Err(_) => value.to_string(),
    }
}
