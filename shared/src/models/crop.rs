//! Crop and cultivation models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::ParseCodeError;

/// A type of plant that can be cultivated
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Crop {
    pub id: Uuid,
    pub name: String,
    /// Nominal days from sowing to maturity
    pub maturation_days: i32,
    /// Number of projects growing this crop
    pub project_count: i64,
}

/// One crop grown within a project
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Cultivation {
    pub id: Uuid,
    pub project_id: Uuid,
    pub crop_id: Uuid,
    pub crop_name: String,
    pub start_date: NaiveDate,
    pub status: CultivationStatus,
}

/// Growth stage of a cultivation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum CultivationStatus {
    #[default]
    Waiting,
    Seeded,
    Grown,
    Harvested,
}

impl CultivationStatus {
    pub fn code(&self) -> &'static str {
        match self {
            CultivationStatus::Waiting => "waiting",
            CultivationStatus::Seeded => "seeded",
            CultivationStatus::Grown => "grown",
            CultivationStatus::Harvested => "harvested",
        }
    }
}

impl std::str::FromStr for CultivationStatus {
    type Err = ParseCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "waiting" => Ok(CultivationStatus::Waiting),
            "seeded" => Ok(CultivationStatus::Seeded),
            "grown" => Ok(CultivationStatus::Grown),
            "harvested" => Ok(CultivationStatus::Harvested),
            _ => Err(ParseCodeError::new("cultivation status", s)),
        }
    }
}

impl std::fmt::Display for CultivationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CultivationStatus::Waiting => write!(f, "Waiting"),
            CultivationStatus::Seeded => write!(f, "Seeded"),
            CultivationStatus::Grown => write!(f, "Grown"),
            CultivationStatus::Harvested => write!(f, "Harvested"),
        }
    }
}
