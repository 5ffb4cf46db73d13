//! Lot management service

use serde::Deserialize;
use uuid::Uuid;

use shared::models::{Lot, Project};
use shared::validation::{validate_lot_area, validate_required};

use crate::error::{AppError, AppResult};
use crate::store::SharedStore;

/// Lot service for managing the plots of land of an owner
#[derive(Clone)]
pub struct LotService {
    store: SharedStore,
}

/// Input for creating a lot
#[derive(Debug, Deserialize)]
pub struct CreateLotInput {
    pub name: String,
    /// Area in square metres
    pub area: i32,
}

impl LotService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Create a lot owned by `owner_id`
    pub async fn create_lot(&self, owner_id: Uuid, input: CreateLotInput) -> AppResult<Lot> {
        validate_required(&input.name).map_err(|msg| AppError::invalid("name", msg))?;
        validate_lot_area(input.area).map_err(|msg| AppError::invalid("area", msg))?;

        let lot = self
            .store
            .insert_lot(input.name.trim(), input.area, owner_id)
            .await?;

        tracing::info!(lot_id = %lot.id, owner_id = %owner_id, "Lot created");
        Ok(lot)
    }

    /// Lots owned by a user, by name
    pub async fn list_lots(&self, owner_id: Uuid) -> AppResult<Vec<Lot>> {
        self.store.fetch_lots_by_owner(owner_id).await
    }

    pub async fn get_lot(&self, lot_id: Uuid) -> AppResult<Lot> {
        self.store
            .fetch_lot_by_id(lot_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Lot".to_string()))
    }

    /// Projects run on a lot
    pub async fn list_projects(&self, lot_id: Uuid) -> AppResult<Vec<Project>> {
        // Unknown lots are reported rather than listed as empty
        self.get_lot(lot_id).await?;
        self.store.fetch_projects_by_lot(lot_id).await
    }
}
