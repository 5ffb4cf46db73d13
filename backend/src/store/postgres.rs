//! PostgreSQL storage

use std::time::Duration;

use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use shared::models::{Activity, Crop, Cultivation, Lot, NewActivity, Project, User, UserType};

use super::rows::{ActivityColumns, ActivityRow, CropRow, CultivationRow, LotRow, ProjectRow, UserRow};
use super::{FarmStore, NewCultivation, NewProject, NewUser};
use crate::config::DatabaseConfig;
use crate::error::{AppError, AppResult};

const ACTIVITY_SELECT: &str = r#"
    SELECT a.id, a.activity_date, a.status, a.activity_type, a.farmer_id,
           u.first_name || ' ' || u.last_name AS farmer_name,
           a.cultivation_id, a.lot_id, a.seed_quantity, a.seed_unit,
           a.expected_harvest_quantity, a.actual_harvest_quantity, a.harvest_unit
    FROM activities a
    JOIN users u ON u.id = a.farmer_id
"#;

const PROJECT_SELECT: &str = r#"
    SELECT p.id, p.name, p.start_date, p.end_date, p.lot_id, l.name AS lot_name
    FROM projects p
    JOIN lots l ON l.id = p.lot_id
"#;

const CULTIVATION_SELECT: &str = r#"
    SELECT c.id, c.project_id, c.crop_id, cr.name AS crop_name, c.start_date, c.status
    FROM cultivations c
    JOIN crops cr ON cr.id = c.crop_id
"#;

const CROP_SELECT: &str = r#"
    SELECT cr.id, cr.name, cr.maturation_days, COUNT(DISTINCT c.project_id) AS project_count
    FROM crops cr
    LEFT JOIN cultivations c ON c.crop_id = cr.id
"#;

/// Store backed by a PostgreSQL connection pool
///
/// Every call acquires a pooled connection for its duration; the connection
/// goes back to the pool when the query future completes or is dropped.
#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

/// Whether a query failed on a unique constraint
fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false)
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create the connection pool
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        tracing::info!("Connecting to database...");
        let db = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .connect(&config.url)
            .await?;
        tracing::info!("Database connection established");
        Ok(Self::new(db))
    }

    /// Apply pending schema migrations
    pub async fn migrate(&self) -> AppResult<()> {
        sqlx::migrate!("./migrations")
            .run(&self.db)
            .await
            .map_err(|e| AppError::DatabaseError(e.into()))
    }
}

#[async_trait]
impl FarmStore for PgStore {
    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.db).await?;
        Ok(())
    }

    async fn insert_user(&self, user: NewUser) -> AppResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (first_name, last_name, email, password_hash, user_type)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, first_name, last_name, email, password_hash, user_type
            "#,
        )
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.user_type.code())
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::UserAlreadyExists(user.email.clone())
            } else {
                AppError::DatabaseError(e)
            }
        })?;

        row.to_user()
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, first_name, last_name, email, password_hash, user_type
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;

        Ok(row)
    }

    async fn fetch_user_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, first_name, last_name, email, password_hash, user_type
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        row.map(|r| r.to_user()).transpose()
    }

    async fn fetch_users_by_type(&self, user_type: UserType) -> AppResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, first_name, last_name, email, password_hash, user_type
            FROM users
            WHERE user_type = $1
            ORDER BY last_name ASC, first_name ASC
            "#,
        )
        .bind(user_type.code())
        .fetch_all(&self.db)
        .await?;

        rows.iter().map(UserRow::to_user).collect()
    }

    async fn insert_lot(&self, name: &str, area: i32, owner_id: Uuid) -> AppResult<Lot> {
        let row = sqlx::query_as::<_, LotRow>(
            r#"
            INSERT INTO lots (name, area, owner_id)
            VALUES ($1, $2, $3)
            RETURNING id, name, area, owner_id
            "#,
        )
        .bind(name)
        .bind(area)
        .bind(owner_id)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    async fn fetch_lots_by_owner(&self, owner_id: Uuid) -> AppResult<Vec<Lot>> {
        let rows = sqlx::query_as::<_, LotRow>(
            "SELECT id, name, area, owner_id FROM lots WHERE owner_id = $1 ORDER BY name ASC",
        )
        .bind(owner_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Lot::from).collect())
    }

    async fn fetch_lot_by_id(&self, id: Uuid) -> AppResult<Option<Lot>> {
        let row = sqlx::query_as::<_, LotRow>(
            "SELECT id, name, area, owner_id FROM lots WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(Lot::from))
    }

    async fn insert_crop(&self, name: &str, maturation_days: i32) -> AppResult<Crop> {
        let id = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO crops (name, maturation_days) VALUES ($1, $2) RETURNING id",
        )
        .bind(name)
        .bind(maturation_days)
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict {
                    resource: "name".to_string(),
                    message: format!("Crop '{}' already exists", name),
                }
            } else {
                AppError::DatabaseError(e)
            }
        })?;

        Ok(Crop {
            id,
            name: name.to_string(),
            maturation_days,
            project_count: 0,
        })
    }

    async fn fetch_all_crops(&self) -> AppResult<Vec<Crop>> {
        let query = format!(
            "{} GROUP BY cr.id, cr.name, cr.maturation_days ORDER BY cr.name ASC",
            CROP_SELECT
        );
        let rows = sqlx::query_as::<_, CropRow>(&query)
            .fetch_all(&self.db)
            .await?;

        Ok(rows.into_iter().map(Crop::from).collect())
    }

    async fn fetch_crop_by_id(&self, id: Uuid) -> AppResult<Option<Crop>> {
        let query = format!(
            "{} WHERE cr.id = $1 GROUP BY cr.id, cr.name, cr.maturation_days",
            CROP_SELECT
        );
        let row = sqlx::query_as::<_, CropRow>(&query)
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(row.map(Crop::from))
    }

    async fn insert_project(&self, project: NewProject) -> AppResult<Project> {
        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO projects (name, start_date, end_date, lot_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&project.name)
        .bind(project.start_date)
        .bind(project.end_date)
        .bind(project.lot_id)
        .fetch_one(&self.db)
        .await?;

        self.fetch_project_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Project".to_string()))
    }

    async fn fetch_all_projects(&self) -> AppResult<Vec<Project>> {
        let query = format!("{} ORDER BY p.start_date ASC, p.name ASC", PROJECT_SELECT);
        let rows = sqlx::query_as::<_, ProjectRow>(&query)
            .fetch_all(&self.db)
            .await?;

        Ok(rows.into_iter().map(Project::from).collect())
    }

    async fn fetch_projects_by_lot(&self, lot_id: Uuid) -> AppResult<Vec<Project>> {
        let query = format!(
            "{} WHERE p.lot_id = $1 ORDER BY p.start_date ASC, p.name ASC",
            PROJECT_SELECT
        );
        let rows = sqlx::query_as::<_, ProjectRow>(&query)
            .bind(lot_id)
            .fetch_all(&self.db)
            .await?;

        Ok(rows.into_iter().map(Project::from).collect())
    }

    async fn fetch_project_by_id(&self, id: Uuid) -> AppResult<Option<Project>> {
        let query = format!("{} WHERE p.id = $1", PROJECT_SELECT);
        let row = sqlx::query_as::<_, ProjectRow>(&query)
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(row.map(Project::from))
    }

    async fn insert_cultivation(&self, cultivation: NewCultivation) -> AppResult<Cultivation> {
        let inserted = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO cultivations (project_id, crop_id, start_date, status)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(cultivation.project_id)
        .bind(cultivation.crop_id)
        .bind(cultivation.start_date)
        .bind(cultivation.status.code())
        .fetch_one(&self.db)
        .await;

        let id = match inserted {
            Ok(id) => id,
            Err(e) if is_unique_violation(&e) => {
                let crop = sqlx::query_scalar::<_, String>("SELECT name FROM crops WHERE id = $1")
                    .bind(cultivation.crop_id)
                    .fetch_optional(&self.db)
                    .await?
                    .unwrap_or_else(|| cultivation.crop_id.to_string());
                return Err(AppError::CultivationAlreadyExists { crop });
            }
            Err(e) => return Err(e.into()),
        };

        self.fetch_cultivation_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Cultivation".to_string()))
    }

    async fn fetch_cultivations_by_project(&self, project_id: Uuid) -> AppResult<Vec<Cultivation>> {
        let query = format!(
            "{} WHERE c.project_id = $1 ORDER BY c.start_date ASC, cr.name ASC",
            CULTIVATION_SELECT
        );
        let rows = sqlx::query_as::<_, CultivationRow>(&query)
            .bind(project_id)
            .fetch_all(&self.db)
            .await?;

        rows.into_iter().map(Cultivation::try_from).collect()
    }

    async fn fetch_cultivation_by_id(&self, id: Uuid) -> AppResult<Option<Cultivation>> {
        let query = format!("{} WHERE c.id = $1", CULTIVATION_SELECT);
        let row = sqlx::query_as::<_, CultivationRow>(&query)
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        row.map(Cultivation::try_from).transpose()
    }

    async fn insert_activity(&self, activity: NewActivity) -> AppResult<Activity> {
        let columns = ActivityColumns::from(&activity.details);

        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO activities (activity_date, status, activity_type, farmer_id,
                                    cultivation_id, lot_id, seed_quantity, seed_unit,
                                    expected_harvest_quantity, actual_harvest_quantity, harvest_unit)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id
            "#,
        )
        .bind(activity.date)
        .bind(activity.status.code())
        .bind(columns.activity_type)
        .bind(activity.farmer_id)
        .bind(activity.cultivation_id)
        .bind(activity.lot_id)
        .bind(columns.seed_quantity)
        .bind(&columns.seed_unit)
        .bind(columns.expected_harvest_quantity)
        .bind(columns.actual_harvest_quantity)
        .bind(&columns.harvest_unit)
        .fetch_one(&self.db)
        .await?;

        self.fetch_activity_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Activity".to_string()))
    }

    async fn update_activity(&self, activity: &Activity) -> AppResult<()> {
        let columns = ActivityColumns::from(&activity.details);

        let result = sqlx::query(
            r#"
            UPDATE activities
            SET activity_date = $1, status = $2, farmer_id = $3, activity_type = $4,
                seed_quantity = $5, seed_unit = $6, expected_harvest_quantity = $7,
                actual_harvest_quantity = $8, harvest_unit = $9, updated_at = NOW()
            WHERE id = $10
            "#,
        )
        .bind(activity.date)
        .bind(activity.status.code())
        .bind(activity.farmer_id)
        .bind(columns.activity_type)
        .bind(columns.seed_quantity)
        .bind(&columns.seed_unit)
        .bind(columns.expected_harvest_quantity)
        .bind(columns.actual_harvest_quantity)
        .bind(&columns.harvest_unit)
        .bind(activity.id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Activity".to_string()));
        }
        Ok(())
    }

    async fn delete_activity(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM activities WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Activity".to_string()));
        }
        Ok(())
    }

    async fn fetch_activity_by_id(&self, id: Uuid) -> AppResult<Option<Activity>> {
        let query = format!("{} WHERE a.id = $1", ACTIVITY_SELECT);
        let row = sqlx::query_as::<_, ActivityRow>(&query)
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        row.map(Activity::try_from).transpose()
    }

    async fn fetch_activities_by_cultivation(
        &self,
        cultivation_id: Uuid,
    ) -> AppResult<Vec<Activity>> {
        let query = format!(
            "{} WHERE a.cultivation_id = $1 ORDER BY a.activity_date ASC, a.created_at ASC",
            ACTIVITY_SELECT
        );
        let rows = sqlx::query_as::<_, ActivityRow>(&query)
            .bind(cultivation_id)
            .fetch_all(&self.db)
            .await?;

        rows.into_iter().map(Activity::try_from).collect()
    }
}
