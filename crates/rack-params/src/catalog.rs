// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Fixed catalog of recognized resource parameters.
//!
//! The catalog is a read-only registry built once at first use. Parameter
//! names are compatibility-fixed: they mirror the field names of the cloud
//! provisioning backend and must not be renamed. Each entry carries the
//! metadata that governs the parameter lifecycle: whether a value is
//! required, whether the backing cloud field is immutable once the
//! resource exists, and an optional default applied at construction.

use std::collections::HashMap;
use std::sync::OnceLock;

pub const PARAM_REPLICATION_GROUP_ID: &str = "ReplicationGroupId";
pub const PARAM_AT_REST_ENCRYPTION_ENABLED: &str = "AtRestEncryptionEnabled";
pub const PARAM_AUTH_TOKEN: &str = "AuthToken";
pub const PARAM_AUTOMATIC_FAILOVER_ENABLED: &str = "AutomaticFailoverEnabled";
pub const PARAM_AUTO_MINOR_VERSION_UPGRADE: &str = "AutoMinorVersionUpgrade";
pub const PARAM_CACHE_NODE_TYPE: &str = "CacheNodeType";
pub const PARAM_CACHE_SUBNET_GROUP_NAME: &str = "CacheSubnetGroupName";
pub const PARAM_CACHE_PARAMETER_GROUP_NAME: &str = "CacheParameterGroupName";
pub const PARAM_ENGINE: &str = "Engine";
pub const PARAM_ENGINE_VERSION: &str = "EngineVersion";
pub const PARAM_NUM_CACHE_CLUSTERS: &str = "NumCacheClusters";
pub const PARAM_PORT: &str = "Port";
pub const PARAM_REPLICATION_GROUP_DESCRIPTION: &str = "ReplicationGroupDescription";
pub const PARAM_SECURITY_GROUP_IDS: &str = "SecurityGroupIds";
pub const PARAM_TRANSIT_ENCRYPTION_ENABLED: &str = "TransitEncryptionEnabled";
pub const PARAM_CACHE_CLUSTER_ID: &str = "CacheClusterId";
pub const PARAM_NUM_CACHE_NODES: &str = "NumCacheNodes";
pub const PARAM_TRANSIT_ENCRYPTION_MODE: &str = "TransitEncryptionMode";

// custom defined params
pub const PARAM_DELETION_PROTECTION: &str = "DeletionProtection";
/// Used to create the subnet group.
pub const PARAM_SUBNET_IDS: &str = "SubnetIds";
/// Used to create the subnet group and security groups.
pub const PARAM_VPC: &str = "VPC";
/// Apply changes immediately instead of the next maintenance window.
pub const PARAM_APPLY_IMMEDIATELY: &str = "ApplyImmediately";
pub const PARAM_IMPORT: &str = "Import";

/// Metadata governing a parameter's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterMetadata {
    /// A non-empty value must be present for the resource to provision.
    pub required: bool,
    /// The backing cloud field cannot change without resource replacement.
    pub immutable: bool,
    /// Default substituted at construction when no value is supplied.
    pub default: Option<&'static str>,
}

impl ParameterMetadata {
    const fn new(required: bool, immutable: bool, default: Option<&'static str>) -> Self {
        ParameterMetadata {
            required,
            immutable,
            default,
        }
    }
}

/// Every recognized parameter name, in catalog order.
pub fn parameter_names() -> &'static [&'static str] {
    &[
        PARAM_REPLICATION_GROUP_ID,
        PARAM_AT_REST_ENCRYPTION_ENABLED,
        PARAM_AUTH_TOKEN,
        PARAM_AUTOMATIC_FAILOVER_ENABLED,
        PARAM_AUTO_MINOR_VERSION_UPGRADE,
        PARAM_CACHE_NODE_TYPE,
        PARAM_CACHE_SUBNET_GROUP_NAME,
        PARAM_CACHE_PARAMETER_GROUP_NAME,
        PARAM_ENGINE,
        PARAM_ENGINE_VERSION,
        PARAM_NUM_CACHE_CLUSTERS,
        PARAM_PORT,
        PARAM_REPLICATION_GROUP_DESCRIPTION,
        PARAM_SECURITY_GROUP_IDS,
        PARAM_TRANSIT_ENCRYPTION_ENABLED,
        PARAM_CACHE_CLUSTER_ID,
        PARAM_NUM_CACHE_NODES,
        PARAM_TRANSIT_ENCRYPTION_MODE,
        PARAM_DELETION_PROTECTION,
        PARAM_SUBNET_IDS,
        PARAM_VPC,
        PARAM_APPLY_IMMEDIATELY,
        PARAM_IMPORT,
    ]
}

static CATALOG: OnceLock<HashMap<&'static str, ParameterMetadata>> = OnceLock::new();

fn catalog() -> &'static HashMap<&'static str, ParameterMetadata> {
    CATALOG.get_or_init(|| {
        let mut m = HashMap::new();
        m.insert(
            PARAM_REPLICATION_GROUP_ID,
            ParameterMetadata::new(true, true, None),
        );
        m.insert(
            PARAM_AT_REST_ENCRYPTION_ENABLED,
            ParameterMetadata::new(false, true, Some("true")),
        );
        m.insert(PARAM_AUTH_TOKEN, ParameterMetadata::new(true, false, None));
        m.insert(
            PARAM_AUTOMATIC_FAILOVER_ENABLED,
            ParameterMetadata::new(false, false, Some("true")),
        );
        m.insert(
            PARAM_AUTO_MINOR_VERSION_UPGRADE,
            ParameterMetadata::new(false, false, Some("true")),
        );
        m.insert(
            PARAM_CACHE_NODE_TYPE,
            ParameterMetadata::new(true, false, Some("cache.t3.micro")),
        );
        m.insert(
            PARAM_CACHE_SUBNET_GROUP_NAME,
            ParameterMetadata::new(false, true, None),
        );
        m.insert(
            PARAM_CACHE_PARAMETER_GROUP_NAME,
            ParameterMetadata::new(false, false, None),
        );
        m.insert(PARAM_ENGINE, ParameterMetadata::new(true, true, Some("redis")));
        m.insert(
            PARAM_ENGINE_VERSION,
            ParameterMetadata::new(false, false, Some("7.0")),
        );
        m.insert(
            PARAM_NUM_CACHE_CLUSTERS,
            ParameterMetadata::new(false, false, Some("2")),
        );
        m.insert(PARAM_PORT, ParameterMetadata::new(false, true, Some("6379")));
        m.insert(
            PARAM_REPLICATION_GROUP_DESCRIPTION,
            ParameterMetadata::new(true, false, Some("rack managed replication group")),
        );
        m.insert(
            PARAM_SECURITY_GROUP_IDS,
            ParameterMetadata::new(false, false, None),
        );
        m.insert(
            PARAM_TRANSIT_ENCRYPTION_ENABLED,
            ParameterMetadata::new(false, true, Some("true")),
        );
        m.insert(
            PARAM_CACHE_CLUSTER_ID,
            ParameterMetadata::new(false, true, None),
        );
        m.insert(
            PARAM_NUM_CACHE_NODES,
            ParameterMetadata::new(false, false, None),
        );
        m.insert(
            PARAM_TRANSIT_ENCRYPTION_MODE,
            ParameterMetadata::new(false, false, None),
        );
        m.insert(
            PARAM_DELETION_PROTECTION,
            ParameterMetadata::new(false, false, Some("false")),
        );
        m.insert(PARAM_SUBNET_IDS, ParameterMetadata::new(true, true, None));
        m.insert(PARAM_VPC, ParameterMetadata::new(true, true, None));
        m.insert(
            PARAM_APPLY_IMMEDIATELY,
            ParameterMetadata::new(false, false, Some("false")),
        );
        m.insert(PARAM_IMPORT, ParameterMetadata::new(false, true, Some("false")));
        m
    })
}

/// Look up the metadata for a recognized parameter name.
///
/// Returns `None` for names outside the fixed catalog.
pub fn metadata(name: &str) -> Option<ParameterMetadata> {
    catalog().get(name).copied()
}

/// Whether the catalog recognizes the given parameter name.
pub fn is_recognized(name: &str) -> bool {
    catalog().contains_key(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_name_has_metadata() {
        for name in parameter_names() {
            assert!(
                metadata(name).is_some(),
                "catalog entry missing for {}",
                name
            );
        }
    }

    #[test]
    fn test_catalog_covers_exactly_the_name_list() {
        assert_eq!(catalog().len(), parameter_names().len());
    }

    #[test]
    fn test_unknown_name_is_not_recognized() {
        assert!(metadata("NoSuchParameter").is_none());
        assert!(!is_recognized("NoSuchParameter"));
    }

    #[test]
    fn test_immutable_flags() {
        assert!(metadata(PARAM_REPLICATION_GROUP_ID).unwrap().immutable);
        assert!(metadata(PARAM_ENGINE).unwrap().immutable);
        assert!(metadata(PARAM_VPC).unwrap().immutable);
        assert!(!metadata(PARAM_ENGINE_VERSION).unwrap().immutable);
        assert!(!metadata(PARAM_APPLY_IMMEDIATELY).unwrap().immutable);
    }

    #[test]
    fn test_defaults() {
        assert_eq!(metadata(PARAM_ENGINE).unwrap().default, Some("redis"));
        assert_eq!(metadata(PARAM_PORT).unwrap().default, Some("6379"));
        assert_eq!(metadata(PARAM_REPLICATION_GROUP_ID).unwrap().default, None);
    }
}
