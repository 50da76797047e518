// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Parameter entity and its lifecycle.
//!
//! A [`Parameter`] pairs one catalog key with an optional value and the
//! catalog metadata that governs it. An unset value and an explicitly
//! empty string are both "empty" but only the former is representable
//! after an update clears the value.
//!
//! Lifecycle: constructed (optionally substituting the metadata default)
//! → [`Parameter::initialize`] exactly once at resource creation, which
//! bypasses immutability because no prior cloud state exists → zero or
//! more [`Parameter::update`] calls while the resource is live, each
//! checked against the immutability contract → discarded when the owning
//! resource is deprovisioned. One set per resource instance; parameters
//! are never shared across resources.

use crate::catalog::ParameterMetadata;
use crate::error::{Error, Result};

/// One named configuration value governing resource provisioning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    key: String,
    value: Option<String>,
    meta: Option<ParameterMetadata>,
}

impl Parameter {
    /// Create a parameter, substituting the metadata default when no value
    /// is supplied. An empty `value` is treated as absent.
    pub fn new(key: impl Into<String>, value: &str, meta: Option<ParameterMetadata>) -> Self {
        let mut value = value.to_string();
        if value.is_empty() {
            if let Some(default) = meta.and_then(|m| m.default) {
                value = default.to_string();
            }
        }
        Parameter {
            key: key.into(),
            value: (!value.is_empty()).then_some(value),
            meta,
        }
    }

    /// Create a parameter from an already-optional value, with no default
    /// substitution. Preserves the unset/empty distinction of the source.
    pub fn with_value_opt(
        key: impl Into<String>,
        value: Option<String>,
        meta: Option<ParameterMetadata>,
    ) -> Self {
        Parameter {
            key: key.into(),
            value,
            meta,
        }
    }

    /// Check the parameter against its metadata contract.
    ///
    /// Fails when the key is empty, when no metadata is attached, or when
    /// a required value is missing.
    pub fn validate(&self) -> Result<()> {
        if self.key.is_empty() {
            return Err(Error::MissingKey);
        }
        let meta = self.meta.ok_or_else(|| Error::MissingMetadata {
            key: self.key.clone(),
        })?;
        if meta.required && self.is_value_empty() {
            return Err(Error::validation(&self.key, "parameter value is required"));
        }
        Ok(())
    }

    /// True when the value is unset or the empty string.
    pub fn is_value_empty(&self) -> bool {
        self.value.as_deref().is_none_or(str::is_empty)
    }

    /// Set the value unconditionally. Only valid at resource creation,
    /// before any cloud state exists; immutability is not consulted.
    pub fn initialize(&mut self, v: &str) {
        self.value = Some(v.to_string());
    }

    /// Propose a new value for a live resource.
    ///
    /// Returns `Ok(false)` when `v` equals the current value (a no-op that
    /// short-circuits before the metadata is touched). Fails with
    /// [`Error::ImmutabilityViolation`] when the metadata marks the field
    /// immutable; the error variant itself signals that a change was
    /// attempted and rejected. Otherwise sets the value, clearing it to
    /// unset when `v` is empty, and returns `Ok(true)`.
    pub fn update(&mut self, v: &str) -> Result<bool> {
        if let Some(current) = &self.value {
            if current == v {
                return Ok(false);
            }
        }

        if self.meta.is_some_and(|m| m.immutable) {
            return Err(Error::ImmutabilityViolation {
                key: self.key.clone(),
            });
        }

        self.value = (!v.is_empty()).then(|| v.to_string());
        Ok(true)
    }

    /// Replace the metadata wholesale, e.g. when the catalog schema is
    /// refreshed on a version upgrade. Fails when no metadata is given.
    pub fn update_metadata(&mut self, m: Option<ParameterMetadata>) -> Result<()> {
        let m = m.ok_or(Error::MissingMetadata {
            key: self.key.clone(),
        })?;
        self.meta = Some(m);
        Ok(())
    }

    /// The catalog key, fixed at creation.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The current value. Fails when the value is empty.
    pub fn value(&self) -> Result<&str> {
        match self.value.as_deref() {
            Some(v) if !v.is_empty() => Ok(v),
            _ => Err(Error::ValueNotFound {
                key: self.key.clone(),
            }),
        }
    }

    /// The current value as an option, preserving the unset/empty split.
    pub fn value_opt(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Whether the metadata marks this parameter required. Fails when no
    /// metadata is attached.
    pub fn is_required(&self) -> Result<bool> {
        let meta = self.meta.ok_or_else(|| Error::MissingMetadata {
            key: self.key.clone(),
        })?;
        Ok(meta.required)
    }
}
