//! Land lot models

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A plot of land owned by a user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Lot {
    pub id: Uuid,
    pub name: String,
    /// Area in square metres
    pub area: i32,
    pub owner_id: Uuid,
}
