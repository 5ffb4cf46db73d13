//! User models

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::ParseCodeError;

/// A registered user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub user_type: UserType,
}

impl User {
    /// Name shown next to the activities a user performs
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn is_farmer(&self) -> bool {
        self.user_type == UserType::Farmer
    }
}

/// Role of a user on the platform
///
/// Owners manage lots and projects, farmers carry out activities.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    Owner,
    Farmer,
}

impl UserType {
    pub fn code(&self) -> &'static str {
        match self {
            UserType::Owner => "owner",
            UserType::Farmer => "farmer",
        }
    }
}

impl std::str::FromStr for UserType {
    type Err = ParseCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "owner" => Ok(UserType::Owner),
            "farmer" => Ok(UserType::Farmer),
            _ => Err(ParseCodeError::new("user type", s)),
        }
    }
}

impl std::fmt::Display for UserType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserType::Owner => write!(f, "Owner"),
            UserType::Farmer => write!(f, "Farmer"),
        }
    }
}
