//! Platform roles.
//!
//! | Role       | Description                                               |
//! |------------|-----------------------------------------------------------|
//! | Admin      | Full access, including other people's records and roles    |
//! | Moderator  | Moderates reviews and resolves review reports             |
//! | Member     | Creates content and edits what they authored              |

use async_graphql::Enum;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{ErrorCode, LaunchpadError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Enum)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Moderator,
    Member,
}

impl Role {
    /// Get the role identifier string.
    pub fn id(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Moderator => "moderator",
            Self::Member => "member",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Admin => "Full access, including other people's records and roles",
            Self::Moderator => "Moderates reviews and resolves review reports",
            Self::Member => "Creates content and edits what they authored",
        }
    }

    pub fn all() -> [Role; 3] {
        [Self::Admin, Self::Moderator, Self::Member]
    }

    /// Parse token role names, ignoring names the platform does not know.
    pub fn parse_all<S: AsRef<str>>(names: &[S]) -> Vec<Role> {
        names
            .iter()
            .filter_map(|name| name.as_ref().parse().ok())
            .collect()
    }
}

impl FromStr for Role {
    type Err = LaunchpadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "moderator" => Ok(Self::Moderator),
            "member" => Ok(Self::Member),
            other => Err(LaunchpadError::new(
                ErrorCode::InvalidInput,
                format!("Unknown role: {}", other),
            )),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}
