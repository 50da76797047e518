// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error types for rack-params.
//!
//! Every validation failure surfaces as exactly one structured error and
//! propagates synchronously to the caller. The engine never retries,
//! suppresses, or logs errors on its own; retry and backoff policy belong
//! to the orchestration layer that drives it.

use thiserror::Error;

/// Errors produced by the parameter provisioning engine.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Input failed a validation rule. User-facing, never auto-retried.
    #[error("validation failed for '{field}': {message}")]
    Validation {
        /// The parameter or field that failed validation.
        field: String,
        /// The validation error message.
        message: String,
    },

    /// An immutable parameter was asked to change in place. Distinct from
    /// generic validation so callers can render "field cannot be changed".
    #[error("immutable parameter '{key}' modification not allowed")]
    ImmutabilityViolation {
        /// The parameter whose immutability contract was violated.
        key: String,
    },

    /// Malformed JSON or base64, or a failed file read, while resolving a
    /// serialized parameter value.
    #[error("invalid value for parameter '{key}': {reason}")]
    Decode {
        /// The parameter carrying the offending value.
        key: String,
        /// Decode failure details.
        reason: String,
    },

    /// The secure random source failed during credential generation.
    #[error("secure random source failed: {0}")]
    Entropy(String),

    /// A requested credential length is below the minimum quota sum.
    #[error("length must be at least {min} characters")]
    LengthTooShort {
        /// Minimum acceptable length.
        min: usize,
    },

    /// A parameter has no key defined.
    #[error("param key is not defined")]
    MissingKey,

    /// A parameter has no catalog metadata attached.
    #[error("param metadata is not defined for '{key}'")]
    MissingMetadata {
        /// The parameter without metadata.
        key: String,
    },

    /// A parameter value was requested but none is set.
    #[error("value not found for param '{key}'")]
    ValueNotFound {
        /// The parameter without a value.
        key: String,
    },

    /// A parameter may only be set during initial resource creation.
    #[error("the '{key}' parameter is only supported during rack installation")]
    UnsupportedMutation {
        /// The install-only parameter.
        key: String,
    },

    /// Two parameters must be supplied together or not at all.
    #[error("both '{first}' and '{second}' parameters are required together")]
    IncompletePair {
        /// First member of the pair.
        first: &'static str,
        /// Second member of the pair.
        second: &'static str,
    },
}

/// Result type using the rack-params [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Shorthand for a [`Error::Validation`] with an owned field name.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}
