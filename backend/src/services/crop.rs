//! Crop catalogue service

use serde::Deserialize;

use shared::models::Crop;
use shared::validation::{validate_maturation_days, validate_required};

use crate::error::{AppError, AppResult};
use crate::store::SharedStore;

#[derive(Clone)]
pub struct CropService {
    store: SharedStore,
}

/// Input for adding a crop to the catalogue
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCropInput {
    pub name: String,
    pub maturation_days: i32,
}

impl CropService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Add a crop; names are unique across the catalogue
    pub async fn create_crop(&self, input: CreateCropInput) -> AppResult<Crop> {
        validate_required(&input.name).map_err(|msg| AppError::invalid("name", msg))?;
        validate_maturation_days(input.maturation_days)
            .map_err(|msg| AppError::invalid("maturationDays", msg))?;

        let crop = self
            .store
            .insert_crop(input.name.trim(), input.maturation_days)
            .await
            .map_err(|e| {
                if matches!(e, AppError::Conflict { .. }) {
                    tracing::warn!(name = %input.name, "crop already in catalogue");
                }
                e
            })?;

        tracing::info!(crop_id = %crop.id, name = %crop.name, "Crop created");
        Ok(crop)
    }

    /// Crops by name, each with the number of projects growing it
    pub async fn list_crops(&self) -> AppResult<Vec<Crop>> {
        self.store.fetch_all_crops().await
    }
}
