//! Fixtures shared by the integration tests

#![allow(dead_code)]

use std::sync::Arc;

use chrono::NaiveDate;

use biogarden_server::config::Config;
use biogarden_server::services::auth::RegisterInput;
use biogarden_server::services::crop::CreateCropInput;
use biogarden_server::services::lot::CreateLotInput;
use biogarden_server::services::project::{AddCultivationInput, CreateProjectInput};
use biogarden_server::services::{AuthService, CropService, LotService, ProjectService};
use biogarden_server::{MemoryStore, SharedStore};
use shared::models::{Crop, Cultivation, Lot, Project, User, UserType};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn memory_store() -> SharedStore {
    Arc::new(MemoryStore::new())
}

pub async fn register(store: &SharedStore, first: &str, email: &str, user_type: UserType) -> User {
    AuthService::new(store.clone(), &Config::in_memory().auth)
        .register(RegisterInput {
            first_name: first.to_string(),
            last_name: "Bianchi".to_string(),
            email: email.to_string(),
            password: "campo-verde-1".to_string(),
            user_type,
        })
        .await
        .unwrap()
        .user
}

pub async fn lot(store: &SharedStore, owner: &User, name: &str) -> Lot {
    LotService::new(store.clone())
        .create_lot(
            owner.id,
            CreateLotInput {
                name: name.to_string(),
                area: 500,
            },
        )
        .await
        .unwrap()
}

pub async fn crop(store: &SharedStore, name: &str) -> Crop {
    CropService::new(store.clone())
        .create_crop(CreateCropInput {
            name: name.to_string(),
            maturation_days: 90,
        })
        .await
        .unwrap()
}

pub async fn project(store: &SharedStore, owner: &User, lot: &Lot, name: &str) -> Project {
    ProjectService::new(store.clone())
        .create_project(
            owner.id,
            CreateProjectInput {
                name: name.to_string(),
                start_date: date(2024, 3, 1),
                end_date: date(2024, 10, 31),
                lot_id: lot.id,
            },
        )
        .await
        .unwrap()
        .project
}

pub async fn cultivation(store: &SharedStore, project: &Project, crop: &Crop) -> Cultivation {
    ProjectService::new(store.clone())
        .add_cultivation(project.id, AddCultivationInput { crop_id: crop.id })
        .await
        .unwrap()
}

/// An owner, a farmer, and one cultivation of tomatoes on the "North" lot
pub struct Farm {
    pub store: SharedStore,
    pub owner: User,
    pub farmer: User,
    pub lot: Lot,
    pub project: Project,
    pub crop: Crop,
    pub cultivation: Cultivation,
}

pub async fn farm() -> Farm {
    farm_on(memory_store()).await
}

/// The same farm laid out on any store
pub async fn farm_on(store: SharedStore) -> Farm {
    let owner = register(&store, "Giulia", "giulia@biogarden.it", UserType::Owner).await;
    let farmer = register(&store, "Luca", "luca@biogarden.it", UserType::Farmer).await;
    let lot = lot(&store, &owner, "North").await;
    let project = project(&store, &owner, &lot, "Spring vegetables").await;
    let crop = crop(&store, "Tomato").await;
    let cultivation = cultivation(&store, &project, &crop).await;

    Farm {
        store,
        owner,
        farmer,
        lot,
        project,
        crop,
        cultivation,
    }
}
