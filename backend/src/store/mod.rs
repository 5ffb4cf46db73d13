//! Storage layer
//!
//! Services talk to storage only through [`FarmStore`]. Two implementations
//! exist: PostgreSQL for deployments and an in-process store for tests and
//! demos. Both map activities through the same wide-row representation.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use shared::models::{
    Activity, Crop, Cultivation, CultivationStatus, Lot, NewActivity, Project, User, UserType,
};

use crate::config::{Config, StorageBackend};
use crate::error::AppResult;

mod memory;
mod postgres;
pub mod rows;

pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use rows::UserRow;

/// Shared handle to the configured store
pub type SharedStore = Arc<dyn FarmStore>;

/// A user about to be registered
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub user_type: UserType,
}

/// A project about to be created
#[derive(Debug, Clone)]
pub struct NewProject {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub lot_id: Uuid,
}

/// A cultivation about to be added to a project
#[derive(Debug, Clone)]
pub struct NewCultivation {
    pub project_id: Uuid,
    pub crop_id: Uuid,
    pub start_date: NaiveDate,
    pub status: CultivationStatus,
}

/// CRUD access to farm data
///
/// Lookups by id return `Ok(None)` when nothing matches; updates and deletes
/// of a missing activity fail with `AppError::NotFound`. Uniqueness
/// violations surface as the matching domain error (`UserAlreadyExists`,
/// `CultivationAlreadyExists`, `Conflict` for crop names).
#[async_trait]
pub trait FarmStore: Send + Sync {
    /// Check that storage is reachable
    async fn ping(&self) -> AppResult<()>;

    async fn insert_user(&self, user: NewUser) -> AppResult<User>;
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<UserRow>>;
    async fn fetch_user_by_id(&self, id: Uuid) -> AppResult<Option<User>>;
    async fn fetch_users_by_type(&self, user_type: UserType) -> AppResult<Vec<User>>;

    async fn insert_lot(&self, name: &str, area: i32, owner_id: Uuid) -> AppResult<Lot>;
    async fn fetch_lots_by_owner(&self, owner_id: Uuid) -> AppResult<Vec<Lot>>;
    async fn fetch_lot_by_id(&self, id: Uuid) -> AppResult<Option<Lot>>;

    async fn insert_crop(&self, name: &str, maturation_days: i32) -> AppResult<Crop>;
    async fn fetch_all_crops(&self) -> AppResult<Vec<Crop>>;
    async fn fetch_crop_by_id(&self, id: Uuid) -> AppResult<Option<Crop>>;

    async fn insert_project(&self, project: NewProject) -> AppResult<Project>;
    /// All projects, by start date then name
    async fn fetch_all_projects(&self) -> AppResult<Vec<Project>>;
    async fn fetch_projects_by_lot(&self, lot_id: Uuid) -> AppResult<Vec<Project>>;
    async fn fetch_project_by_id(&self, id: Uuid) -> AppResult<Option<Project>>;

    async fn insert_cultivation(&self, cultivation: NewCultivation) -> AppResult<Cultivation>;
    /// Cultivations of a project, by start date then crop name
    async fn fetch_cultivations_by_project(&self, project_id: Uuid) -> AppResult<Vec<Cultivation>>;
    async fn fetch_cultivation_by_id(&self, id: Uuid) -> AppResult<Option<Cultivation>>;

    async fn insert_activity(&self, activity: NewActivity) -> AppResult<Activity>;
    /// Overwrite date, status, farmer and kind-specific columns
    async fn update_activity(&self, activity: &Activity) -> AppResult<()>;
    async fn delete_activity(&self, id: Uuid) -> AppResult<()>;
    async fn fetch_activity_by_id(&self, id: Uuid) -> AppResult<Option<Activity>>;
    /// Activities of a cultivation, by date then creation order
    async fn fetch_activities_by_cultivation(
        &self,
        cultivation_id: Uuid,
    ) -> AppResult<Vec<Activity>>;
}

/// Open the store selected by configuration
pub async fn connect(config: &Config) -> anyhow::Result<SharedStore> {
    match config.database.backend {
        StorageBackend::Postgres => {
            let store = PgStore::connect(&config.database).await?;
            if config.is_development() {
                tracing::info!("Running database migrations...");
                store.migrate().await?;
                tracing::info!("Migrations completed");
            }
            Ok(Arc::new(store))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on shutdown");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
