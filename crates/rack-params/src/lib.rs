// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Rack Params - Resource Parameter Provisioning Engine
//!
//! This crate validates and transforms the named configuration parameters
//! that govern cloud-managed stateful services (managed databases and
//! cache clusters) attached to a rack. It is the validation core that an
//! orchestrator drives before any call to a cloud provisioning backend.
//!
//! # Pipeline
//!
//! ```text
//!     ┌─────────────┐      ┌──────────────────┐      ┌─────────────┐
//!     │  Proposed   │      │   Reconciler     │      │  Canonical  │
//!     │  key→value  │─────▶│  catalog rules   │─────▶│  key→value  │
//!     │    map      │      │  diff + guards   │      │     map     │
//!     └─────────────┘      └──────────────────┘      └─────────────┘
//!                                  │
//!               ┌──────────────────┼──────────────────┐
//!               ▼                  ▼                  ▼
//!        ┌────────────┐    ┌─────────────┐    ┌─────────────┐
//!        │ Parameter  │    │ Node group  │    │ Credential  │
//!        │ lifecycle  │    │ validator   │    │ generator   │
//!        └────────────┘    └─────────────┘    └─────────────┘
//! ```
//!
//! The engine performs no network I/O: it only validates and transforms
//! parameter data. Cloud fields that cannot change in place are guarded
//! by per-parameter immutability metadata, so a destructive recreation
//! can never be triggered by an in-place update slipping through.
//!
//! # Usage
//!
//! ```
//! use rack_params::reconcile::reconcile_rack_params;
//! use std::collections::BTreeMap;
//!
//! let mut proposed = BTreeMap::from([(
//!     "additional_node_groups_config".to_string(),
//!     r#"[{"type":"m5.large"}]"#.to_string(),
//! )]);
//!
//! // Validates and replaces the value with its canonical base64 form.
//! reconcile_rack_params(&mut proposed)?;
//! # Ok::<(), rack_params::Error>(())
//! ```

pub mod catalog;
pub mod convert;
pub mod credential;
pub mod error;
pub mod node_group;
pub mod parameter;
pub mod reconcile;

pub use catalog::{ParameterMetadata, metadata, parameter_names};
pub use credential::generate_secure_password;
pub use error::{Error, Result};
pub use node_group::{AdditionalNodeGroups, CapacityType, NodeGroupConfig};
pub use parameter::Parameter;
pub use reconcile::{ParameterSet, reconcile_rack_params};
