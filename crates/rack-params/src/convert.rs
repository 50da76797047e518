// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Conversion of heterogeneous cloud-API values into string parameters.
//!
//! Cloud control planes return parameter values as ints, bools, strings,
//! and string lists. [`CloudValue`] enumerates exactly the supported
//! source types; anything else fails to convert at compile time rather
//! than falling through a catch-all stringify. Absent values stay absent:
//! `None` maps to `None`, never to an empty string.

/// A value read back from the cloud provisioning backend.
#[derive(Debug, Clone, PartialEq)]
pub enum CloudValue {
    Int32(i32),
    Int64(i64),
    Bool(bool),
    Str(String),
    /// Joined with `,` in the parameter form, e.g. security group ids.
    StrList(Vec<String>),
}

impl CloudValue {
    /// The canonical string form used for parameter values.
    pub fn into_param_value(self) -> String {
        match self {
            CloudValue::Int32(v) => v.to_string(),
            CloudValue::Int64(v) => v.to_string(),
            CloudValue::Bool(v) => v.to_string(),
            CloudValue::Str(v) => v,
            CloudValue::StrList(v) => v.join(","),
        }
    }
}

impl From<i32> for CloudValue {
    fn from(v: i32) -> Self {
        CloudValue::Int32(v)
    }
}

impl From<i64> for CloudValue {
    fn from(v: i64) -> Self {
        CloudValue::Int64(v)
    }
}

impl From<bool> for CloudValue {
    fn from(v: bool) -> Self {
        CloudValue::Bool(v)
    }
}

impl From<String> for CloudValue {
    fn from(v: String) -> Self {
        CloudValue::Str(v)
    }
}

impl From<&str> for CloudValue {
    fn from(v: &str) -> Self {
        CloudValue::Str(v.to_string())
    }
}

impl From<Vec<String>> for CloudValue {
    fn from(v: Vec<String>) -> Self {
        CloudValue::StrList(v)
    }
}

/// Convert an optional cloud value into an optional parameter value,
/// preserving absence.
pub fn to_param_value<T: Into<CloudValue>>(v: Option<T>) -> Option<String> {
    v.map(|v| v.into().into_param_value())
}

/// Split a CSV parameter value into trimmed elements.
pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',').map(|part| part.trim().to_string()).collect()
}

/// Whether `target` appears in `values`. An empty target against an
/// empty list counts as present, matching how unset list parameters
/// compare against an absent cloud-side value.
pub fn contains_target(values: &[String], target: &str) -> bool {
    if target.is_empty() && values.is_empty() {
        return true;
    }
    values.iter().any(|v| v == target)
}
