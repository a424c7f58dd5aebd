// SPDX-License-Identifier: MIT

//! Resource identity

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Namespace used when a resource is named without one
pub const DEFAULT_NAMESPACE: &str = "default";

/// Identifies a remote resource by namespace and name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceRef {
    pub namespace: String,
    pub name: String,
}

impl ResourceRef {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Parse `ns/name`, or a bare `name` placed in `namespace`.
    pub fn parse_in(namespace: &str, s: &str) -> Result<Self, ParseResourceError> {
        match s.split_once('/') {
            Some((ns, name)) => {
                if ns.is_empty() || name.is_empty() || name.contains('/') {
                    return Err(ParseResourceError(s.to_string()));
                }
                Ok(Self::new(ns, name))
            }
            None if s.is_empty() || namespace.is_empty() => Err(ParseResourceError(s.to_string())),
            None => Ok(Self::new(namespace, s)),
        }
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// Error for a malformed resource reference
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid resource reference '{0}': expected NAME or NAMESPACE/NAME")]
pub struct ParseResourceError(pub String);

impl FromStr for ResourceRef {
    type Err = ParseResourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_in(DEFAULT_NAMESPACE, s)
    }
}

#[cfg(test)]
#[path = "resource_tests.rs"]
mod tests;
