//! Relational row shapes and their mapping to domain models
//!
//! Activities live in one wide table: the `activity_type` column says which of
//! the kind-specific columns are meaningful, the others are NULL.

use chrono::NaiveDate;
use uuid::Uuid;

use shared::models::{
    Activity, ActivityDetails, ActivityKind, ActivityStatus, Crop, Cultivation, CultivationStatus,
    Lot, Project, User, UserType,
};

use crate::error::{AppError, AppResult};

/// Database row for an activity joined with its farmer's name
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ActivityRow {
    pub id: Uuid,
    pub activity_date: NaiveDate,
    pub status: String,
    pub activity_type: String,
    pub farmer_id: Uuid,
    pub farmer_name: String,
    pub cultivation_id: Uuid,
    pub lot_id: Uuid,
    pub seed_quantity: Option<i32>,
    pub seed_unit: Option<String>,
    pub expected_harvest_quantity: Option<i32>,
    pub actual_harvest_quantity: Option<i32>,
    pub harvest_unit: Option<String>,
}

/// Kind-specific columns written for an activity
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityColumns {
    pub activity_type: &'static str,
    pub seed_quantity: Option<i32>,
    pub seed_unit: Option<String>,
    pub expected_harvest_quantity: Option<i32>,
    pub actual_harvest_quantity: Option<i32>,
    pub harvest_unit: Option<String>,
}

impl From<&ActivityDetails> for ActivityColumns {
    fn from(details: &ActivityDetails) -> Self {
        let activity_type = details.kind().code();
        match details {
            ActivityDetails::Seeding { quantity, unit } => Self {
                activity_type,
                seed_quantity: Some(*quantity),
                seed_unit: Some(unit.clone()),
                ..Default::default()
            },
            ActivityDetails::Irrigation => Self {
                activity_type,
                ..Default::default()
            },
            ActivityDetails::Harvest {
                planned_quantity,
                actual_quantity,
                unit,
            } => Self {
                activity_type,
                expected_harvest_quantity: Some(*planned_quantity),
                actual_harvest_quantity: Some(*actual_quantity),
                harvest_unit: Some(unit.clone()),
                ..Default::default()
            },
        }
    }
}

/// A column the row's activity type requires was NULL
fn required<T>(value: Option<T>, column: &str, id: Uuid) -> AppResult<T> {
    value.ok_or_else(|| {
        tracing::error!(activity_id = %id, column, "activity row is missing a required column");
        AppError::Internal(format!("Activity {} has no value for {}", id, column))
    })
}

impl TryFrom<ActivityRow> for Activity {
    type Error = AppError;

    fn try_from(row: ActivityRow) -> AppResult<Self> {
        let kind: ActivityKind = row.activity_type.parse().map_err(|e| {
            tracing::error!(activity_id = %row.id, "unsupported activity type in storage: {}", e);
            AppError::Internal(format!("Unsupported activity type: {}", row.activity_type))
        })?;
        let status: ActivityStatus = row.status.parse().map_err(|e| {
            tracing::error!(activity_id = %row.id, "unsupported activity status in storage: {}", e);
            AppError::Internal(format!("Unsupported activity status: {}", row.status))
        })?;

        let details = match kind {
            ActivityKind::Seeding => ActivityDetails::Seeding {
                quantity: required(row.seed_quantity, "seed_quantity", row.id)?,
                unit: required(row.seed_unit, "seed_unit", row.id)?,
            },
            ActivityKind::Irrigation => ActivityDetails::Irrigation,
            ActivityKind::Harvest => ActivityDetails::Harvest {
                planned_quantity: required(
                    row.expected_harvest_quantity,
                    "expected_harvest_quantity",
                    row.id,
                )?,
                actual_quantity: required(
                    row.actual_harvest_quantity,
                    "actual_harvest_quantity",
                    row.id,
                )?,
                unit: required(row.harvest_unit, "harvest_unit", row.id)?,
            },
        };

        Ok(Activity {
            id: row.id,
            date: row.activity_date,
            status,
            farmer_id: row.farmer_id,
            farmer_name: row.farmer_name,
            cultivation_id: row.cultivation_id,
            lot_id: row.lot_id,
            details,
        })
    }
}

/// Database row for a user, including the password hash
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub user_type: String,
}

impl UserRow {
    pub fn to_user(&self) -> AppResult<User> {
        let user_type: UserType = self
            .user_type
            .parse()
            .map_err(|e| AppError::Internal(format!("{}", e)))?;
        Ok(User {
            id: self.id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            user_type,
        })
    }
}

/// Database row for a lot
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LotRow {
    pub id: Uuid,
    pub name: String,
    pub area: i32,
    pub owner_id: Uuid,
}

impl From<LotRow> for Lot {
    fn from(row: LotRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            area: row.area,
            owner_id: row.owner_id,
        }
    }
}

/// Database row for a crop with the number of projects growing it
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CropRow {
    pub id: Uuid,
    pub name: String,
    pub maturation_days: i32,
    pub project_count: i64,
}

impl From<CropRow> for Crop {
    fn from(row: CropRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            maturation_days: row.maturation_days,
            project_count: row.project_count,
        }
    }
}

/// Database row for a project with its lot name
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProjectRow {
    pub id: Uuid,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub lot_id: Uuid,
    pub lot_name: String,
}

impl From<ProjectRow> for Project {
    fn from(row: ProjectRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            start_date: row.start_date,
            end_date: row.end_date,
            lot_id: row.lot_id,
            lot_name: row.lot_name,
        }
    }
}

/// Database row for a cultivation with its crop name
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CultivationRow {
    pub id: Uuid,
    pub project_id: Uuid,
    pub crop_id: Uuid,
    pub crop_name: String,
    pub start_date: NaiveDate,
    pub status: String,
}

impl TryFrom<CultivationRow> for Cultivation {
    type Error = AppError;

    fn try_from(row: CultivationRow) -> AppResult<Self> {
        let status: CultivationStatus = row.status.parse().map_err(|e| {
            tracing::error!(cultivation_id = %row.id, "unsupported cultivation status: {}", e);
            AppError::Internal(format!("Unsupported cultivation status: {}", row.status))
        })?;
        Ok(Cultivation {
            id: row.id,
            project_id: row.project_id,
            crop_id: row.crop_id,
            crop_name: row.crop_name,
            start_date: row.start_date,
            status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(activity_type: &str, columns: ActivityColumns) -> ActivityRow {
        ActivityRow {
            id: Uuid::new_v4(),
            activity_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            status: "planned".to_string(),
            activity_type: activity_type.to_string(),
            farmer_id: Uuid::new_v4(),
            farmer_name: "Anna Verdi".to_string(),
            cultivation_id: Uuid::new_v4(),
            lot_id: Uuid::new_v4(),
            seed_quantity: columns.seed_quantity,
            seed_unit: columns.seed_unit,
            expected_harvest_quantity: columns.expected_harvest_quantity,
            actual_harvest_quantity: columns.actual_harvest_quantity,
            harvest_unit: columns.harvest_unit,
        }
    }

    #[test]
    fn test_seeding_nulls_harvest_columns() {
        let columns = ActivityColumns::from(&ActivityDetails::Seeding {
            quantity: 50,
            unit: "grams".to_string(),
        });
        assert_eq!(columns.activity_type, "seeding");
        assert_eq!(columns.seed_quantity, Some(50));
        assert_eq!(columns.seed_unit.as_deref(), Some("grams"));
        assert_eq!(columns.expected_harvest_quantity, None);
        assert_eq!(columns.actual_harvest_quantity, None);
        assert_eq!(columns.harvest_unit, None);
    }

    #[test]
    fn test_irrigation_nulls_everything() {
        let columns = ActivityColumns::from(&ActivityDetails::Irrigation);
        assert_eq!(
            columns,
            ActivityColumns {
                activity_type: "irrigation",
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_harvest_row_reads_only_harvest_columns() {
        let mut columns = ActivityColumns::from(&ActivityDetails::Harvest {
            planned_quantity: 40,
            actual_quantity: 30,
            unit: "kg".to_string(),
        });
        // stray values in foreign columns are ignored on read
        columns.seed_quantity = Some(999);

        let activity = Activity::try_from(row("harvest", columns)).unwrap();
        assert_eq!(
            activity.details,
            ActivityDetails::Harvest {
                planned_quantity: 40,
                actual_quantity: 30,
                unit: "kg".to_string(),
            }
        );
    }

    #[test]
    fn test_unknown_type_is_internal_error() {
        let result = Activity::try_from(row("pruning", ActivityColumns::default()));
        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[test]
    fn test_missing_required_column_is_internal_error() {
        let result = Activity::try_from(row("seeding", ActivityColumns::default()));
        assert!(matches!(result, Err(AppError::Internal(_))));
    }
}
