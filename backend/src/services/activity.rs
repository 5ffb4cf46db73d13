//! Activity service for recording seeding, irrigation and harvest work

use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use shared::models::{Activity, ActivityDetails, ActivityPatch, ActivityStatus, NewActivity, User};
use shared::validation::validate_activity_details;

use crate::error::{AppError, AppResult};
use crate::store::SharedStore;

/// Activity service for the work carried out on cultivations
#[derive(Clone)]
pub struct ActivityService {
    store: SharedStore,
}

/// Input for recording an activity on a cultivation
///
/// The `type` field selects the kind; kind-specific fields sit alongside the
/// common ones.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordActivityInput {
    pub date: NaiveDate,
    #[serde(default)]
    pub status: ActivityStatus,
    /// Farmer carrying out the work; defaults to the caller when the caller is a farmer
    pub farmer_id: Option<Uuid>,
    #[serde(flatten)]
    pub details: ActivityDetails,
}

fn details_error(msg: &'static str) -> AppError {
    AppError::invalid("details", msg)
}

impl ActivityService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Resolve a user id to a registered farmer
    async fn farmer(&self, farmer_id: Uuid) -> AppResult<User> {
        match self.store.fetch_user_by_id(farmer_id).await? {
            Some(user) if user.is_farmer() => Ok(user),
            Some(_) => Err(AppError::invalid("farmerId", "The selected user is not a farmer")),
            None => Err(AppError::invalid("farmerId", "Unknown farmer")),
        }
    }

    /// Record a new activity on a cultivation
    ///
    /// `caller` is the authenticated user, used as farmer when none is given.
    pub async fn record_activity(
        &self,
        caller: Uuid,
        cultivation_id: Uuid,
        input: RecordActivityInput,
    ) -> AppResult<Activity> {
        validate_activity_details(&input.details).map_err(details_error)?;

        let cultivation = self
            .store
            .fetch_cultivation_by_id(cultivation_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Cultivation".to_string()))?;
        let project = self
            .store
            .fetch_project_by_id(cultivation.project_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Project".to_string()))?;

        let farmer = self.farmer(input.farmer_id.unwrap_or(caller)).await?;

        let activity = self
            .store
            .insert_activity(NewActivity {
                date: input.date,
                status: input.status,
                farmer_id: farmer.id,
                cultivation_id: cultivation.id,
                lot_id: project.lot_id,
                details: input.details,
            })
            .await?;

        tracing::info!(
            activity_id = %activity.id,
            cultivation_id = %cultivation_id,
            kind = %activity.kind(),
            "Activity recorded"
        );
        Ok(activity)
    }

    /// Activities of a cultivation, by date
    pub async fn list_activities(&self, cultivation_id: Uuid) -> AppResult<Vec<Activity>> {
        if self
            .store
            .fetch_cultivation_by_id(cultivation_id)
            .await?
            .is_none()
        {
            return Err(AppError::NotFound("Cultivation".to_string()));
        }
        self.store.fetch_activities_by_cultivation(cultivation_id).await
    }

    pub async fn get_activity(&self, activity_id: Uuid) -> AppResult<Activity> {
        self.store
            .fetch_activity_by_id(activity_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Activity".to_string()))
    }

    /// Update an activity
    ///
    /// Fields left out of the patch keep their stored value. The kind of an
    /// activity never changes.
    pub async fn update_activity(
        &self,
        activity_id: Uuid,
        patch: ActivityPatch,
    ) -> AppResult<Activity> {
        let mut activity = self.get_activity(activity_id).await?;

        if let Some(farmer_id) = patch.farmer_id {
            let farmer = self.farmer(farmer_id).await?;
            activity.farmer_name = farmer.display_name();
        }
        patch.apply(&mut activity).map_err(details_error)?;
        validate_activity_details(&activity.details).map_err(details_error)?;

        self.store.update_activity(&activity).await?;

        tracing::info!(activity_id = %activity_id, status = %activity.status, "Activity updated");
        Ok(activity)
    }

    /// Delete an activity; a missing id is reported as not found
    pub async fn delete_activity(&self, activity_id: Uuid) -> AppResult<()> {
        self.store.delete_activity(activity_id).await?;
        tracing::info!(activity_id = %activity_id, "Activity deleted");
        Ok(())
    }
}
