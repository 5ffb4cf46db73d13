//! Field activity models
//!
//! An activity is a dated piece of work on a cultivation. The three kinds share
//! a common header and differ only in the figures they record, so the kind is
//! carried by [`ActivityDetails`] rather than by a separate type field.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::ParseCodeError;

/// Kind of work performed
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Seeding,
    Irrigation,
    Harvest,
}

impl ActivityKind {
    /// Code stored in the `activity_type` column
    pub fn code(&self) -> &'static str {
        match self {
            ActivityKind::Seeding => "seeding",
            ActivityKind::Irrigation => "irrigation",
            ActivityKind::Harvest => "harvest",
        }
    }
}

impl std::str::FromStr for ActivityKind {
    type Err = ParseCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "seeding" => Ok(ActivityKind::Seeding),
            "irrigation" => Ok(ActivityKind::Irrigation),
            "harvest" => Ok(ActivityKind::Harvest),
            _ => Err(ParseCodeError::new("activity type", s)),
        }
    }
}

impl std::fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActivityKind::Seeding => write!(f, "Seeding"),
            ActivityKind::Irrigation => write!(f, "Irrigation"),
            ActivityKind::Harvest => write!(f, "Harvest"),
        }
    }
}

/// Progress of an activity
///
/// Any status may be set from any other; callers drive the transitions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActivityStatus {
    #[default]
    Planned,
    InProgress,
    Completed,
}

impl ActivityStatus {
    /// Code stored in the `status` column
    pub fn code(&self) -> &'static str {
        match self {
            ActivityStatus::Planned => "planned",
            ActivityStatus::InProgress => "in_progress",
            ActivityStatus::Completed => "completed",
        }
    }

    pub const ALL: [ActivityStatus; 3] = [
        ActivityStatus::Planned,
        ActivityStatus::InProgress,
        ActivityStatus::Completed,
    ];
}

impl std::str::FromStr for ActivityStatus {
    type Err = ParseCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "planned" => Ok(ActivityStatus::Planned),
            "in_progress" => Ok(ActivityStatus::InProgress),
            "completed" => Ok(ActivityStatus::Completed),
            _ => Err(ParseCodeError::new("activity status", s)),
        }
    }
}

impl std::fmt::Display for ActivityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActivityStatus::Planned => write!(f, "Planned"),
            ActivityStatus::InProgress => write!(f, "In Progress"),
            ActivityStatus::Completed => write!(f, "Completed"),
        }
    }
}

/// Figures specific to each kind of activity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum ActivityDetails {
    Seeding {
        /// Seed units sown
        quantity: i32,
        unit: String,
    },
    Irrigation,
    Harvest {
        planned_quantity: i32,
        actual_quantity: i32,
        unit: String,
    },
}

impl ActivityDetails {
    pub fn kind(&self) -> ActivityKind {
        match self {
            ActivityDetails::Seeding { .. } => ActivityKind::Seeding,
            ActivityDetails::Irrigation => ActivityKind::Irrigation,
            ActivityDetails::Harvest { .. } => ActivityKind::Harvest,
        }
    }

    /// Human-readable summary of the kind-specific figures
    pub fn describe(&self) -> String {
        match self {
            ActivityDetails::Seeding { quantity, unit } => {
                format!("Quantity: {} {}", quantity, unit)
            }
            ActivityDetails::Irrigation => "No additional information".to_string(),
            ActivityDetails::Harvest {
                planned_quantity,
                actual_quantity,
                unit,
            } => format!(
                "Planned: {} {}, Actual: {} {}",
                planned_quantity, unit, actual_quantity, unit
            ),
        }
    }
}

/// A persisted activity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: Uuid,
    pub date: NaiveDate,
    pub status: ActivityStatus,
    pub farmer_id: Uuid,
    /// Display name of the farmer, resolved when the activity is read
    pub farmer_name: String,
    pub cultivation_id: Uuid,
    pub lot_id: Uuid,
    #[serde(flatten)]
    pub details: ActivityDetails,
}

impl Activity {
    pub fn kind(&self) -> ActivityKind {
        self.details.kind()
    }

    pub fn details_text(&self) -> String {
        self.details.describe()
    }

    /// Actual harvested quantity and its unit, for harvest activities only
    pub fn harvested(&self) -> Option<(i32, &str)> {
        match &self.details {
            ActivityDetails::Harvest {
                actual_quantity,
                unit,
                ..
            } => Some((*actual_quantity, unit.as_str())),
            _ => None,
        }
    }
}

/// An activity that has not been stored yet
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewActivity {
    pub date: NaiveDate,
    pub status: ActivityStatus,
    pub farmer_id: Uuid,
    pub cultivation_id: Uuid,
    pub lot_id: Uuid,
    #[serde(flatten)]
    pub details: ActivityDetails,
}

impl NewActivity {
    /// Attach the identifier and farmer name assigned by storage
    pub fn into_activity(self, id: Uuid, farmer_name: String) -> Activity {
        Activity {
            id,
            date: self.date,
            status: self.status,
            farmer_id: self.farmer_id,
            farmer_name,
            cultivation_id: self.cultivation_id,
            lot_id: self.lot_id,
            details: self.details,
        }
    }
}

/// Partial changes to an existing activity
///
/// Kind-specific fields must match the kind of the activity being changed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityPatch {
    pub date: Option<NaiveDate>,
    pub status: Option<ActivityStatus>,
    pub farmer_id: Option<Uuid>,
    pub quantity: Option<i32>,
    pub planned_quantity: Option<i32>,
    pub actual_quantity: Option<i32>,
    pub unit: Option<String>,
}

impl ActivityPatch {
    /// Apply the patch in place
    pub fn apply(self, activity: &mut Activity) -> Result<(), &'static str> {
        match &mut activity.details {
            ActivityDetails::Seeding { quantity, unit } => {
                if self.planned_quantity.is_some() || self.actual_quantity.is_some() {
                    return Err("Harvest quantities do not apply to a seeding activity");
                }
                if let Some(q) = self.quantity {
                    *quantity = q;
                }
                if let Some(u) = self.unit {
                    *unit = u;
                }
            }
            ActivityDetails::Irrigation => {
                if self.quantity.is_some()
                    || self.planned_quantity.is_some()
                    || self.actual_quantity.is_some()
                    || self.unit.is_some()
                {
                    return Err("An irrigation activity has no quantities or unit");
                }
            }
            ActivityDetails::Harvest {
                planned_quantity,
                actual_quantity,
                unit,
            } => {
                if self.quantity.is_some() {
                    return Err("Seed quantity does not apply to a harvest activity");
                }
                if let Some(q) = self.planned_quantity {
                    *planned_quantity = q;
                }
                if let Some(q) = self.actual_quantity {
                    *actual_quantity = q;
                }
                if let Some(u) = self.unit {
                    *unit = u;
                }
            }
        }

        if let Some(date) = self.date {
            activity.date = date;
        }
        if let Some(status) = self.status {
            activity.status = status;
        }
        if let Some(farmer_id) = self.farmer_id {
            activity.farmer_id = farmer_id;
        }
        Ok(())
    }
}
