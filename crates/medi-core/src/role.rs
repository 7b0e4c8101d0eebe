//! # Roles
//!
//! Caller roles as stored on the user document's `role` field.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Marketplace role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Seller,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Seller => "seller",
            Role::User => "user",
        }
    }

    /// Read the role off a stored user document.
    ///
    /// Unknown or missing values yield `None`; stored roles are free-form
    /// strings, so anything outside the three known roles admits nothing.
    pub fn from_document(doc: &crate::Document) -> Option<Self> {
        doc.get(crate::fields::ROLE)
            .and_then(|v| v.as_str())
            .and_then(|s| s.parse().ok())
    }
}

impl FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "seller" => Ok(Role::Seller),
            "user" => Ok(Role::User),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
