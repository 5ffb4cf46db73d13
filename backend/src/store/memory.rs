//! In-process storage
//!
//! Keeps the same relational shape as the PostgreSQL schema: activities are
//! stored as wide rows and decoded through the same mapping on every read.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;
use uuid::Uuid;

use shared::models::{Activity, Crop, Cultivation, Lot, NewActivity, Project, User, UserType};

use super::rows::{ActivityColumns, ActivityRow, CultivationRow, UserRow};
use super::{FarmStore, NewCultivation, NewProject, NewUser};
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone)]
struct ActivityRecord {
    id: Uuid,
    /// Insertion sequence, breaks ties between activities on the same date
    seq: u64,
    date: NaiveDate,
    status: String,
    farmer_id: Uuid,
    cultivation_id: Uuid,
    lot_id: Uuid,
    columns: ActivityColumns,
}

#[derive(Debug, Clone)]
struct CropRecord {
    id: Uuid,
    name: String,
    maturation_days: i32,
}

#[derive(Debug, Clone)]
struct ProjectRecord {
    id: Uuid,
    name: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    lot_id: Uuid,
}

#[derive(Debug, Clone)]
struct CultivationRecord {
    id: Uuid,
    project_id: Uuid,
    crop_id: Uuid,
    start_date: NaiveDate,
    status: String,
}

#[derive(Debug, Default)]
struct State {
    users: HashMap<Uuid, UserRow>,
    lots: HashMap<Uuid, Lot>,
    crops: HashMap<Uuid, CropRecord>,
    projects: HashMap<Uuid, ProjectRecord>,
    cultivations: HashMap<Uuid, CultivationRecord>,
    activities: HashMap<Uuid, ActivityRecord>,
    next_seq: u64,
}

impl State {
    fn farmer_name(&self, farmer_id: Uuid) -> AppResult<String> {
        self.users
            .get(&farmer_id)
            .map(|u| format!("{} {}", u.first_name, u.last_name))
            .ok_or_else(|| AppError::NotFound("Farmer".to_string()))
    }

    fn activity(&self, record: &ActivityRecord) -> AppResult<Activity> {
        let columns = record.columns.clone();
        Activity::try_from(ActivityRow {
            id: record.id,
            activity_date: record.date,
            status: record.status.clone(),
            activity_type: columns.activity_type.to_string(),
            farmer_id: record.farmer_id,
            farmer_name: self.farmer_name(record.farmer_id)?,
            cultivation_id: record.cultivation_id,
            lot_id: record.lot_id,
            seed_quantity: columns.seed_quantity,
            seed_unit: columns.seed_unit,
            expected_harvest_quantity: columns.expected_harvest_quantity,
            actual_harvest_quantity: columns.actual_harvest_quantity,
            harvest_unit: columns.harvest_unit,
        })
    }

    fn crop(&self, record: &CropRecord) -> Crop {
        let projects: BTreeSet<Uuid> = self
            .cultivations
            .values()
            .filter(|c| c.crop_id == record.id)
            .map(|c| c.project_id)
            .collect();
        Crop {
            id: record.id,
            name: record.name.clone(),
            maturation_days: record.maturation_days,
            project_count: projects.len() as i64,
        }
    }

    fn project(&self, record: &ProjectRecord) -> AppResult<Project> {
        let lot = self
            .lots
            .get(&record.lot_id)
            .ok_or_else(|| AppError::NotFound("Lot".to_string()))?;
        Ok(Project {
            id: record.id,
            name: record.name.clone(),
            start_date: record.start_date,
            end_date: record.end_date,
            lot_id: record.lot_id,
            lot_name: lot.name.clone(),
        })
    }

    fn cultivation(&self, record: &CultivationRecord) -> AppResult<Cultivation> {
        let crop = self
            .crops
            .get(&record.crop_id)
            .ok_or_else(|| AppError::NotFound("Crop".to_string()))?;
        Cultivation::try_from(CultivationRow {
            id: record.id,
            project_id: record.project_id,
            crop_id: record.crop_id,
            crop_name: crop.name.clone(),
            start_date: record.start_date,
            status: record.status.clone(),
        })
    }

    fn sorted_projects(&self, mut projects: Vec<Project>) -> Vec<Project> {
        projects.sort_by(|a, b| {
            a.start_date
                .cmp(&b.start_date)
                .then_with(|| a.name.cmp(&b.name))
        });
        projects
    }
}

/// Store that keeps everything in process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FarmStore for MemoryStore {
    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }

    async fn insert_user(&self, user: NewUser) -> AppResult<User> {
        let mut state = self.state.write().await;
        if state.users.values().any(|u| u.email == user.email) {
            return Err(AppError::UserAlreadyExists(user.email));
        }

        let row = UserRow {
            id: Uuid::new_v4(),
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            password_hash: user.password_hash,
            user_type: user.user_type.code().to_string(),
        };
        let created = row.to_user()?;
        state.users.insert(row.id, row);
        Ok(created)
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<UserRow>> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|u| u.email == email).cloned())
    }

    async fn fetch_user_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let state = self.state.read().await;
        state.users.get(&id).map(UserRow::to_user).transpose()
    }

    async fn fetch_users_by_type(&self, user_type: UserType) -> AppResult<Vec<User>> {
        let state = self.state.read().await;
        let mut users = state
            .users
            .values()
            .filter(|u| u.user_type == user_type.code())
            .map(UserRow::to_user)
            .collect::<AppResult<Vec<_>>>()?;
        users.sort_by(|a, b| {
            a.last_name
                .cmp(&b.last_name)
                .then_with(|| a.first_name.cmp(&b.first_name))
        });
        Ok(users)
    }

    async fn insert_lot(&self, name: &str, area: i32, owner_id: Uuid) -> AppResult<Lot> {
        let mut state = self.state.write().await;
        if !state.users.contains_key(&owner_id) {
            return Err(AppError::NotFound("Owner".to_string()));
        }

        let lot = Lot {
            id: Uuid::new_v4(),
            name: name.to_string(),
            area,
            owner_id,
        };
        state.lots.insert(lot.id, lot.clone());
        Ok(lot)
    }

    async fn fetch_lots_by_owner(&self, owner_id: Uuid) -> AppResult<Vec<Lot>> {
        let state = self.state.read().await;
        let mut lots: Vec<Lot> = state
            .lots
            .values()
            .filter(|l| l.owner_id == owner_id)
            .cloned()
            .collect();
        lots.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(lots)
    }

    async fn fetch_lot_by_id(&self, id: Uuid) -> AppResult<Option<Lot>> {
        let state = self.state.read().await;
        Ok(state.lots.get(&id).cloned())
    }

    async fn insert_crop(&self, name: &str, maturation_days: i32) -> AppResult<Crop> {
        let mut state = self.state.write().await;
        if state.crops.values().any(|c| c.name == name) {
            return Err(AppError::Conflict {
                resource: "name".to_string(),
                message: format!("Crop '{}' already exists", name),
            });
        }

        let record = CropRecord {
            id: Uuid::new_v4(),
            name: name.to_string(),
            maturation_days,
        };
        let crop = state.crop(&record);
        state.crops.insert(record.id, record);
        Ok(crop)
    }

    async fn fetch_all_crops(&self) -> AppResult<Vec<Crop>> {
        let state = self.state.read().await;
        let mut crops: Vec<Crop> = state.crops.values().map(|c| state.crop(c)).collect();
        crops.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(crops)
    }

    async fn fetch_crop_by_id(&self, id: Uuid) -> AppResult<Option<Crop>> {
        let state = self.state.read().await;
        Ok(state.crops.get(&id).map(|c| state.crop(c)))
    }

    async fn insert_project(&self, project: NewProject) -> AppResult<Project> {
        let mut state = self.state.write().await;
        let record = ProjectRecord {
            id: Uuid::new_v4(),
            name: project.name,
            start_date: project.start_date,
            end_date: project.end_date,
            lot_id: project.lot_id,
        };
        let created = state.project(&record)?;
        state.projects.insert(record.id, record);
        Ok(created)
    }

    async fn fetch_all_projects(&self) -> AppResult<Vec<Project>> {
        let state = self.state.read().await;
        let projects = state
            .projects
            .values()
            .map(|p| state.project(p))
            .collect::<AppResult<Vec<_>>>()?;
        Ok(state.sorted_projects(projects))
    }

    async fn fetch_projects_by_lot(&self, lot_id: Uuid) -> AppResult<Vec<Project>> {
        let state = self.state.read().await;
        let projects = state
            .projects
            .values()
            .filter(|p| p.lot_id == lot_id)
            .map(|p| state.project(p))
            .collect::<AppResult<Vec<_>>>()?;
        Ok(state.sorted_projects(projects))
    }

    async fn fetch_project_by_id(&self, id: Uuid) -> AppResult<Option<Project>> {
        let state = self.state.read().await;
        state.projects.get(&id).map(|p| state.project(p)).transpose()
    }

    async fn insert_cultivation(&self, cultivation: NewCultivation) -> AppResult<Cultivation> {
        let mut state = self.state.write().await;
        if !state.projects.contains_key(&cultivation.project_id) {
            return Err(AppError::NotFound("Project".to_string()));
        }
        let crop_name = state
            .crops
            .get(&cultivation.crop_id)
            .map(|c| c.name.clone())
            .ok_or_else(|| AppError::NotFound("Crop".to_string()))?;

        let duplicate = state.cultivations.values().any(|c| {
            c.project_id == cultivation.project_id && c.crop_id == cultivation.crop_id
        });
        if duplicate {
            return Err(AppError::CultivationAlreadyExists { crop: crop_name });
        }

        let record = CultivationRecord {
            id: Uuid::new_v4(),
            project_id: cultivation.project_id,
            crop_id: cultivation.crop_id,
            start_date: cultivation.start_date,
            status: cultivation.status.code().to_string(),
        };
        let created = state.cultivation(&record)?;
        state.cultivations.insert(record.id, record);
        Ok(created)
    }

    async fn fetch_cultivations_by_project(&self, project_id: Uuid) -> AppResult<Vec<Cultivation>> {
        let state = self.state.read().await;
        let mut cultivations = state
            .cultivations
            .values()
            .filter(|c| c.project_id == project_id)
            .map(|c| state.cultivation(c))
            .collect::<AppResult<Vec<_>>>()?;
        cultivations.sort_by(|a, b| {
            a.start_date
                .cmp(&b.start_date)
                .then_with(|| a.crop_name.cmp(&b.crop_name))
        });
        Ok(cultivations)
    }

    async fn fetch_cultivation_by_id(&self, id: Uuid) -> AppResult<Option<Cultivation>> {
        let state = self.state.read().await;
        state
            .cultivations
            .get(&id)
            .map(|c| state.cultivation(c))
            .transpose()
    }

    async fn insert_activity(&self, activity: NewActivity) -> AppResult<Activity> {
        let mut state = self.state.write().await;
        if !state.cultivations.contains_key(&activity.cultivation_id) {
            return Err(AppError::NotFound("Cultivation".to_string()));
        }
        if !state.lots.contains_key(&activity.lot_id) {
            return Err(AppError::NotFound("Lot".to_string()));
        }

        let seq = state.next_seq;
        state.next_seq += 1;
        let record = ActivityRecord {
            id: Uuid::new_v4(),
            seq,
            date: activity.date,
            status: activity.status.code().to_string(),
            farmer_id: activity.farmer_id,
            cultivation_id: activity.cultivation_id,
            lot_id: activity.lot_id,
            columns: ActivityColumns::from(&activity.details),
        };
        let created = state.activity(&record)?;
        state.activities.insert(record.id, record);
        Ok(created)
    }

    async fn update_activity(&self, activity: &Activity) -> AppResult<()> {
        let mut state = self.state.write().await;
        if !state.users.contains_key(&activity.farmer_id) {
            return Err(AppError::NotFound("Farmer".to_string()));
        }
        let record = state
            .activities
            .get_mut(&activity.id)
            .ok_or_else(|| AppError::NotFound("Activity".to_string()))?;

        record.date = activity.date;
        record.status = activity.status.code().to_string();
        record.farmer_id = activity.farmer_id;
        record.columns = ActivityColumns::from(&activity.details);
        Ok(())
    }

    async fn delete_activity(&self, id: Uuid) -> AppResult<()> {
        let mut state = self.state.write().await;
        state
            .activities
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound("Activity".to_string()))
    }

    async fn fetch_activity_by_id(&self, id: Uuid) -> AppResult<Option<Activity>> {
        let state = self.state.read().await;
        state
            .activities
            .get(&id)
            .map(|a| state.activity(a))
            .transpose()
    }

    async fn fetch_activities_by_cultivation(
        &self,
        cultivation_id: Uuid,
    ) -> AppResult<Vec<Activity>> {
        let state = self.state.read().await;
        let mut records: Vec<&ActivityRecord> = state
            .activities
            .values()
            .filter(|a| a.cultivation_id == cultivation_id)
            .collect();
        records.sort_by_key(|a| (a.date, a.seq));
        records.into_iter().map(|a| state.activity(a)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{ActivityDetails, ActivityStatus, CultivationStatus};

    fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, month, day).unwrap()
    }

    async fn seeded(store: &MemoryStore) -> (User, Lot, Cultivation) {
        let farmer = store
            .insert_user(NewUser {
                first_name: "Anna".to_string(),
                last_name: "Verdi".to_string(),
                email: "anna@biogarden.it".to_string(),
                password_hash: "hash".to_string(),
                user_type: UserType::Farmer,
            })
            .await
            .unwrap();
        let lot = store.insert_lot("North", 120, farmer.id).await.unwrap();
        let crop = store.insert_crop("Tomato", 80).await.unwrap();
        let project = store
            .insert_project(NewProject {
                name: "Spring 2024".to_string(),
                start_date: date(3, 1),
                end_date: date(6, 30),
                lot_id: lot.id,
            })
            .await
            .unwrap();
        let cultivation = store
            .insert_cultivation(NewCultivation {
                project_id: project.id,
                crop_id: crop.id,
                start_date: date(3, 1),
                status: CultivationStatus::Waiting,
            })
            .await
            .unwrap();
        (farmer, lot, cultivation)
    }

    fn irrigation(farmer: &User, lot: &Lot, cultivation: &Cultivation, on: NaiveDate) -> NewActivity {
        NewActivity {
            date: on,
            status: ActivityStatus::Planned,
            farmer_id: farmer.id,
            cultivation_id: cultivation.id,
            lot_id: lot.id,
            details: ActivityDetails::Irrigation,
        }
    }

    #[test]
    fn test_activities_ordered_by_date_then_insertion() {
        tokio_test::block_on(async {
            let store = MemoryStore::new();
            let (farmer, lot, cultivation) = seeded(&store).await;

            let late = store
                .insert_activity(irrigation(&farmer, &lot, &cultivation, date(4, 2)))
                .await
                .unwrap();
            let first = store
                .insert_activity(irrigation(&farmer, &lot, &cultivation, date(4, 1)))
                .await
                .unwrap();
            let second = store
                .insert_activity(irrigation(&farmer, &lot, &cultivation, date(4, 1)))
                .await
                .unwrap();

            let ids: Vec<Uuid> = store
                .fetch_activities_by_cultivation(cultivation.id)
                .await
                .unwrap()
                .into_iter()
                .map(|a| a.id)
                .collect();
            assert_eq!(ids, vec![first.id, second.id, late.id]);
        });
    }

    #[test]
    fn test_crop_project_count_counts_distinct_projects() {
        tokio_test::block_on(async {
            let store = MemoryStore::new();
            let (_, _, cultivation) = seeded(&store).await;

            let crop = store.fetch_crop_by_id(cultivation.crop_id).await.unwrap().unwrap();
            assert_eq!(crop.project_count, 1);

            let unused = store.insert_crop("Basil", 30).await.unwrap();
            assert_eq!(unused.project_count, 0);
        });
    }

    #[test]
    fn test_delete_missing_activity_is_not_found() {
        tokio_test::block_on(async {
            let store = MemoryStore::new();
            let result = store.delete_activity(Uuid::new_v4()).await;
            assert!(matches!(result, Err(AppError::NotFound(_))));
        });
    }
}
