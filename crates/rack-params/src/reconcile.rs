// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Parameter set reconciliation.
//!
//! Two surfaces live here. [`reconcile_rack_params`] is the map-level
//! pipeline for rack parameters: it enforces install-only keys, paired
//! keys, tag formatting, and canonicalizes node-group topology values.
//! [`ParameterSet`] is the resource-scoped collection built from the
//! fixed catalog: construction with defaults and generated credentials,
//! whole-set validation, and guarded in-place updates.
//!
//! All validation completes before any value could reach a provisioning
//! backend; the first failure aborts the whole reconciliation with no
//! partial application.

use crate::catalog::{self, PARAM_AUTH_TOKEN};
use crate::credential::generate_secure_password;
use crate::error::{Error, Result};
use crate::node_group;
use crate::parameter::Parameter;
use std::collections::BTreeMap;

/// Only supported during rack installation.
pub const PARAM_HIGH_AVAILABILITY: &str = "high_availability";
/// Scheduled scale-down time; must be paired with scale-up.
pub const PARAM_SCHEDULE_RACK_SCALE_DOWN: &str = "ScheduleRackScaleDown";
/// Scheduled scale-up time; must be paired with scale-down.
pub const PARAM_SCHEDULE_RACK_SCALE_UP: &str = "ScheduleRackScaleUp";
/// Free-form rack tags, `k1=v1,k2=v2`.
pub const PARAM_RACK_TAGS: &str = "tags";

/// Node-group topology parameters canonicalized through the
/// decode → validate → re-encode pipeline.
pub const NODE_GROUP_PARAM_KEYS: [&str; 2] = [
    "additional_node_groups_config",
    "additional_build_groups_config",
];

/// Length of auto-generated auth tokens.
const AUTH_TOKEN_LENGTH: usize = 20;

/// Validate a proposed rack parameter map and canonicalize it in place.
///
/// Node-group values are replaced with their canonical base64 JSON
/// encoding; every other value passes through untouched. The first
/// failure aborts with no partial mutation visible to the provisioning
/// backend (the map may hold already-canonicalized node-group values,
/// which are semantically identical to their input).
pub fn reconcile_rack_params(params: &mut BTreeMap<String, String>) -> Result<()> {
    if params.get(PARAM_HIGH_AVAILABILITY).is_some_and(|v| !v.is_empty()) {
        return Err(Error::UnsupportedMutation {
            key: PARAM_HIGH_AVAILABILITY.to_string(),
        });
    }

    let down = params.get(PARAM_SCHEDULE_RACK_SCALE_DOWN).map_or("", String::as_str);
    let up = params.get(PARAM_SCHEDULE_RACK_SCALE_UP).map_or("", String::as_str);
    if (down.is_empty() || up.is_empty()) && (!down.is_empty() || !up.is_empty()) {
        return Err(Error::IncompletePair {
            first: PARAM_SCHEDULE_RACK_SCALE_DOWN,
            second: PARAM_SCHEDULE_RACK_SCALE_UP,
        });
    }

    // format: "key1=val1,key2=val2"
    if let Some(tags) = params.get(PARAM_RACK_TAGS) {
        for pair in tags.split(',') {
            if pair.split('=').count() != 2 {
                return Err(Error::validation(PARAM_RACK_TAGS, "invalid value for tags param"));
            }
        }
    }

    for key in NODE_GROUP_PARAM_KEYS {
        let raw = match params.get(key) {
            Some(v) if !v.is_empty() => v.clone(),
            _ => continue,
        };
        let canonical = node_group::canonicalize(key, &raw)?;
        tracing::debug!(key = %key, "canonicalized node group topology");
        params.insert(key.to_string(), canonical);
    }

    Ok(())
}

/// The parameter set of one provisioned resource, keyed by catalog name.
///
/// One set exists per resource instance and is owned by its caller; the
/// engine never shares a set across resources or threads.
#[derive(Debug, Clone, Default)]
pub struct ParameterSet {
    params: BTreeMap<String, Parameter>,
}

impl ParameterSet {
    /// Build the full catalog set for a new resource.
    ///
    /// Every catalog entry is constructed, substituting defaults where no
    /// override is given. Unknown override keys are rejected. A required
    /// but empty `AuthToken` is auto-populated with a generated secure
    /// credential; this runs at creation time, before any cloud state
    /// exists, so immutability is not consulted.
    pub fn from_catalog(overrides: &BTreeMap<String, String>) -> Result<Self> {
        for key in overrides.keys() {
            if !catalog::is_recognized(key) {
                return Err(Error::validation(key, "unknown parameter"));
            }
        }

        let mut params = BTreeMap::new();
        for name in catalog::parameter_names() {
            let value = overrides.get(*name).map_or("", String::as_str);
            params.insert(
                name.to_string(),
                Parameter::new(*name, value, catalog::metadata(name)),
            );
        }

        let mut set = ParameterSet { params };
        set.populate_generated()?;
        Ok(set)
    }

    fn populate_generated(&mut self) -> Result<()> {
        if let Some(param) = self.params.get_mut(PARAM_AUTH_TOKEN) {
            if param.is_required()? && param.is_value_empty() {
                let token = generate_secure_password(AUTH_TOKEN_LENGTH)?;
                param.initialize(&token);
                tracing::debug!(key = PARAM_AUTH_TOKEN, "auto-populated generated credential");
            }
        }
        Ok(())
    }

    /// Validate every member against its metadata contract.
    pub fn validate(&self) -> Result<()> {
        for param in self.params.values() {
            param.validate()?;
        }
        Ok(())
    }

    /// Apply a proposed update map to the live set.
    ///
    /// Each entry is diffed through [`Parameter::update`], which rejects
    /// immutable changes; the first failure aborts before anything could
    /// be submitted. Returns the canonical map of set values, ready for
    /// the provisioning backend.
    pub fn apply(&mut self, updates: &BTreeMap<String, String>) -> Result<BTreeMap<String, String>> {
        for (key, value) in updates {
            let param = self
                .params
                .get_mut(key)
                .ok_or_else(|| Error::validation(key, "unknown parameter"))?;
            if param.update(value)? {
                tracing::debug!(key = %key, "parameter updated");
            }
        }
        self.validate()?;
        Ok(self.to_map())
    }

    /// Re-attach catalog metadata to every member, e.g. after a version
    /// upgrade refreshed the catalog schema.
    pub fn refresh_metadata(&mut self) -> Result<()> {
        for (key, param) in &mut self.params {
            param.update_metadata(catalog::metadata(key))?;
        }
        Ok(())
    }

    /// Look up one parameter by catalog name.
    pub fn get(&self, key: &str) -> Option<&Parameter> {
        self.params.get(key)
    }

    /// The canonical `key → value` map of all set values.
    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.params
            .iter()
            .filter_map(|(key, param)| param.value_opt().map(|v| (key.clone(), v.to_string())))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{PARAM_ENGINE, PARAM_ENGINE_VERSION, PARAM_REPLICATION_GROUP_ID, PARAM_SUBNET_IDS, PARAM_VPC};

    fn map(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn install_overrides() -> BTreeMap<String, String> {
        map(&[
            (PARAM_REPLICATION_GROUP_ID, "rack-cache-1"),
            (PARAM_SUBNET_IDS, "subnet-1,subnet-2"),
            (PARAM_VPC, "vpc-1"),
        ])
    }

    // ========================================================================
    // Map-level reconciliation
    // ========================================================================

    #[test]
    fn test_high_availability_rejected_post_install() {
        let mut params = map(&[(PARAM_HIGH_AVAILABILITY, "true")]);
        assert!(matches!(
            reconcile_rack_params(&mut params),
            Err(Error::UnsupportedMutation { key }) if key == PARAM_HIGH_AVAILABILITY
        ));
    }

    #[test]
    fn test_scale_down_alone_fails_pairing() {
        let mut params = map(&[(PARAM_SCHEDULE_RACK_SCALE_DOWN, "02:00")]);
        assert!(matches!(
            reconcile_rack_params(&mut params),
            Err(Error::IncompletePair { .. })
        ));
    }

    #[test]
    fn test_scale_pair_together_passes() {
        let mut params = map(&[
            (PARAM_SCHEDULE_RACK_SCALE_DOWN, "02:00"),
            (PARAM_SCHEDULE_RACK_SCALE_UP, "08:00"),
        ]);
        assert!(reconcile_rack_params(&mut params).is_ok());
    }

    #[test]
    fn test_malformed_rack_tags_fail() {
        let mut params = map(&[(PARAM_RACK_TAGS, "team")]);
        assert!(reconcile_rack_params(&mut params).is_err());

        let mut params = map(&[(PARAM_RACK_TAGS, "team=infra,env")]);
        assert!(reconcile_rack_params(&mut params).is_err());
    }

    #[test]
    fn test_well_formed_rack_tags_pass() {
        let mut params = map(&[(PARAM_RACK_TAGS, "team=infra,env=prod")]);
        assert!(reconcile_rack_params(&mut params).is_ok());
    }

    #[test]
    fn test_node_groups_canonicalized_with_assigned_ids() {
        let mut params = map(&[(
            "additional_node_groups_config",
            r#"[{"type":"m5.large"},{"type":"m5.xlarge"}]"#,
        )]);
        reconcile_rack_params(&mut params).unwrap();

        let canonical = &params["additional_node_groups_config"];
        assert!(!canonical.starts_with('['), "value must be re-encoded");

        let groups =
            crate::node_group::AdditionalNodeGroups::decode("additional_node_groups_config", canonical)
                .unwrap();
        assert_eq!(groups.0[0].id, Some(1));
        assert_eq!(groups.0[0].node_type, "m5.large");
        assert_eq!(groups.0[1].id, Some(2));
        assert_eq!(groups.0[1].node_type, "m5.xlarge");
    }

    #[test]
    fn test_invalid_node_group_value_aborts() {
        let mut params = map(&[("additional_build_groups_config", "not json or base64 ***")]);
        assert!(matches!(
            reconcile_rack_params(&mut params),
            Err(Error::Decode { key, .. }) if key == "additional_build_groups_config"
        ));
    }

    #[test]
    fn test_empty_map_is_fine() {
        let mut params = BTreeMap::new();
        assert!(reconcile_rack_params(&mut params).is_ok());
    }

    // ========================================================================
    // ParameterSet
    // ========================================================================

    #[test]
    fn test_from_catalog_applies_defaults() {
        let set = ParameterSet::from_catalog(&install_overrides()).unwrap();
        assert_eq!(set.get(PARAM_ENGINE).unwrap().value_opt(), Some("redis"));
        assert_eq!(set.get("Port").unwrap().value_opt(), Some("6379"));
    }

    #[test]
    fn test_from_catalog_populates_auth_token() {
        let set = ParameterSet::from_catalog(&install_overrides()).unwrap();
        let token = set.get(PARAM_AUTH_TOKEN).unwrap().value().unwrap();
        assert_eq!(token.len(), AUTH_TOKEN_LENGTH);
    }

    #[test]
    fn test_from_catalog_rejects_unknown_override() {
        let mut overrides = install_overrides();
        overrides.insert("NoSuchParameter".to_string(), "x".to_string());
        assert!(ParameterSet::from_catalog(&overrides).is_err());
    }

    #[test]
    fn test_validate_fails_when_required_missing() {
        // No ReplicationGroupId, SubnetIds, or VPC supplied.
        let set = ParameterSet::from_catalog(&BTreeMap::new()).unwrap();
        assert!(set.validate().is_err());
    }

    #[test]
    fn test_apply_updates_mutable_parameter() {
        let mut set = ParameterSet::from_catalog(&install_overrides()).unwrap();
        let out = set.apply(&map(&[(PARAM_ENGINE_VERSION, "7.1")])).unwrap();
        assert_eq!(out[PARAM_ENGINE_VERSION], "7.1");
    }

    #[test]
    fn test_apply_rejects_immutable_change() {
        let mut set = ParameterSet::from_catalog(&install_overrides()).unwrap();
        let err = set.apply(&map(&[(PARAM_ENGINE, "valkey")])).unwrap_err();
        assert!(matches!(err, Error::ImmutabilityViolation { key } if key == PARAM_ENGINE));
        // Nothing was applied.
        assert_eq!(set.get(PARAM_ENGINE).unwrap().value_opt(), Some("redis"));
    }

    #[test]
    fn test_apply_equal_immutable_value_is_noop() {
        let mut set = ParameterSet::from_catalog(&install_overrides()).unwrap();
        assert!(set.apply(&map(&[(PARAM_ENGINE, "redis")])).is_ok());
    }

    #[test]
    fn test_apply_rejects_unknown_key() {
        let mut set = ParameterSet::from_catalog(&install_overrides()).unwrap();
        assert!(set.apply(&map(&[("bogus", "x")])).is_err());
    }

    #[test]
    fn test_refresh_metadata_keeps_set_valid() {
        let mut set = ParameterSet::from_catalog(&install_overrides()).unwrap();
        set.refresh_metadata().unwrap();
        assert!(set.validate().is_ok());
    }

    #[test]
    fn test_to_map_skips_unset_values() {
        let set = ParameterSet::from_catalog(&install_overrides()).unwrap();
        let out = set.to_map();
        assert!(out.contains_key(PARAM_ENGINE));
        // No default and no override.
        assert!(!out.contains_key("CacheClusterId"));
    }
}
