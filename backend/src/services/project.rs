//! Project and cultivation service

use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;

use shared::models::{Cultivation, CultivationStatus, Project, ProjectOverview};
use shared::validation::{validate_project_dates, validate_required};

use crate::error::{AppError, AppResult};
use crate::store::{NewCultivation, NewProject, SharedStore};

/// Project service for planning cultivations on lots
#[derive(Clone)]
pub struct ProjectService {
    store: SharedStore,
}

/// Input for creating a project
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectInput {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub lot_id: Uuid,
}

/// Input for adding a cultivation to a project
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCultivationInput {
    pub crop_id: Uuid,
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

impl ProjectService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Create a project on a lot owned by `owner_id`
    pub async fn create_project(
        &self,
        owner_id: Uuid,
        input: CreateProjectInput,
    ) -> AppResult<ProjectOverview> {
        validate_required(&input.name).map_err(|msg| AppError::invalid("name", msg))?;
        validate_project_dates(input.start_date, input.end_date)
            .map_err(|msg| AppError::invalid("endDate", msg))?;

        // Validate lot exists and belongs to the owner
        let lot = self
            .store
            .fetch_lot_by_id(input.lot_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Lot".to_string()))?;
        if lot.owner_id != owner_id {
            return Err(AppError::InsufficientPermissions);
        }

        let project = self
            .store
            .insert_project(NewProject {
                name: input.name.trim().to_string(),
                start_date: input.start_date,
                end_date: input.end_date,
                lot_id: lot.id,
            })
            .await?;

        tracing::info!(project_id = %project.id, lot_id = %lot.id, "Project created");
        Ok(ProjectOverview::new(project, today()))
    }

    /// All projects with their season and status
    pub async fn list_projects(&self) -> AppResult<Vec<ProjectOverview>> {
        let today = today();
        let projects = self.store.fetch_all_projects().await?;
        Ok(projects
            .into_iter()
            .map(|p| ProjectOverview::new(p, today))
            .collect())
    }

    pub async fn get_project(&self, project_id: Uuid) -> AppResult<Project> {
        self.store
            .fetch_project_by_id(project_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Project".to_string()))
    }

    /// Start growing a crop in a project
    ///
    /// The cultivation starts today, waiting to be seeded. A project grows
    /// each crop at most once.
    pub async fn add_cultivation(
        &self,
        project_id: Uuid,
        input: AddCultivationInput,
    ) -> AppResult<Cultivation> {
        self.get_project(project_id).await?;
        let crop = self
            .store
            .fetch_crop_by_id(input.crop_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Crop".to_string()))?;

        let result = self
            .store
            .insert_cultivation(NewCultivation {
                project_id,
                crop_id: crop.id,
                start_date: today(),
                status: CultivationStatus::Waiting,
            })
            .await;

        match result {
            Ok(cultivation) => {
                tracing::info!(
                    cultivation_id = %cultivation.id,
                    project_id = %project_id,
                    crop = %crop.name,
                    "Cultivation added"
                );
                Ok(cultivation)
            }
            Err(e @ AppError::CultivationAlreadyExists { .. }) => {
                tracing::warn!(project_id = %project_id, crop = %crop.name, "crop already cultivated in project");
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    pub async fn list_cultivations(&self, project_id: Uuid) -> AppResult<Vec<Cultivation>> {
        self.get_project(project_id).await?;
        self.store.fetch_cultivations_by_project(project_id).await
    }

    pub async fn get_cultivation(&self, cultivation_id: Uuid) -> AppResult<Cultivation> {
        self.store
            .fetch_cultivation_by_id(cultivation_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Cultivation".to_string()))
    }
}
