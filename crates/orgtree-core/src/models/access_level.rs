//! Access-level enumeration.
//!
//! An access level is the coarse-grained scope of an authorization grant,
//! already decided by the surrounding authorization layer and handed to
//! this system as an input. Resolution dispatches on the variant, never on
//! a numeric comparison.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::OrgtreeError;

/// Scope of an authorization grant, broadest to narrowest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccessLevel {
    /// System-wide, across all organizations.
    System,
    /// Organization-wide.
    Global,
    /// The user's business units plus all subordinate units.
    Deep,
    /// The user's business units only.
    Local,
    /// The user's own records only.
    Basic,
    /// No access.
    None,
}

impl AccessLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::System => "SYSTEM",
            AccessLevel::Global => "GLOBAL",
            AccessLevel::Deep => "DEEP",
            AccessLevel::Local => "LOCAL",
            AccessLevel::Basic => "BASIC",
            AccessLevel::None => "NONE",
        }
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessLevel {
    type Err = OrgtreeError;

    /// Parses an access-level token. Unrecognized tokens are a caller bug
    /// and fail with [`OrgtreeError::InvalidArgument`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SYSTEM" => Ok(AccessLevel::System),
            "GLOBAL" => Ok(AccessLevel::Global),
            "DEEP" => Ok(AccessLevel::Deep),
            "LOCAL" => Ok(AccessLevel::Local),
            "BASIC" => Ok(AccessLevel::Basic),
            "NONE" => Ok(AccessLevel::None),
            other => Err(OrgtreeError::InvalidArgument {
                message: format!("unknown access level: {other}"),
            }),
        }
    }
}
