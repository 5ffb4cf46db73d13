//! Reporting service for harvest statistics and dashboard figures

use serde::Serialize;
use uuid::Uuid;

use shared::models::{summarize_harvests, ActivityStatus, HarvestReportEntry, Project, ProjectStatus};

use crate::error::{AppError, AppResult};
use crate::store::SharedStore;

/// Reporting service
#[derive(Clone)]
pub struct ReportingService {
    store: SharedStore,
}

/// Headline figures for the lots of one owner
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub total_lots: usize,
    /// Square metres across all lots
    pub total_area: i64,
    pub total_projects: usize,
    pub active_projects: usize,
    pub total_cultivations: usize,
    pub planned_activities: usize,
    pub in_progress_activities: usize,
    pub completed_activities: usize,
}

impl ReportingService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Harvest statistics per cultivation, optionally limited to one lot
    ///
    /// Entries follow project order, then cultivation order within each
    /// project. Cultivations without any harvest are left out.
    pub async fn generate_harvest_report(
        &self,
        lot_id: Option<Uuid>,
    ) -> AppResult<Vec<HarvestReportEntry>> {
        let projects = match lot_id {
            Some(lot_id) => {
                if self.store.fetch_lot_by_id(lot_id).await?.is_none() {
                    return Err(AppError::NotFound("Lot".to_string()));
                }
                self.store.fetch_projects_by_lot(lot_id).await?
            }
            None => self.store.fetch_all_projects().await?,
        };

        let mut entries = Vec::new();
        for project in &projects {
            entries.extend(self.project_entries(project).await?);
        }

        tracing::debug!(
            lot_id = ?lot_id,
            projects = projects.len(),
            entries = entries.len(),
            "Harvest report generated"
        );
        Ok(entries)
    }

    async fn project_entries(&self, project: &Project) -> AppResult<Vec<HarvestReportEntry>> {
        let mut entries = Vec::new();
        for cultivation in self.store.fetch_cultivations_by_project(project.id).await? {
            let activities = self
                .store
                .fetch_activities_by_cultivation(cultivation.id)
                .await?;
            if let Some(entry) =
                summarize_harvests(&project.lot_name, &cultivation.crop_name, &activities)
            {
                entries.push(entry);
            }
        }
        Ok(entries)
    }

    /// Dashboard figures for the lots owned by `owner_id`
    pub async fn get_dashboard_metrics(&self, owner_id: Uuid) -> AppResult<DashboardMetrics> {
        let today = chrono::Utc::now().date_naive();
        let lots = self.store.fetch_lots_by_owner(owner_id).await?;

        let mut metrics = DashboardMetrics {
            total_lots: lots.len(),
            total_area: lots.iter().map(|l| i64::from(l.area)).sum(),
            ..Default::default()
        };

        for lot in &lots {
            for project in self.store.fetch_projects_by_lot(lot.id).await? {
                metrics.total_projects += 1;
                if project.status_on(today) == ProjectStatus::InProgress {
                    metrics.active_projects += 1;
                }

                for cultivation in self.store.fetch_cultivations_by_project(project.id).await? {
                    metrics.total_cultivations += 1;
                    let activities = self
                        .store
                        .fetch_activities_by_cultivation(cultivation.id)
                        .await?;
                    for activity in activities {
                        match activity.status {
                            ActivityStatus::Planned => metrics.planned_activities += 1,
                            ActivityStatus::InProgress => metrics.in_progress_activities += 1,
                            ActivityStatus::Completed => metrics.completed_activities += 1,
                        }
                    }
                }
            }
        }

        Ok(metrics)
    }

    /// Export data to CSV format
    pub fn export_to_csv<T: Serialize>(data: &[T]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in data {
            wtr.serialize(record)
                .map_err(|e| AppError::Internal(format!("CSV serialization error: {}", e)))?;
        }
        let bytes = wtr
            .into_inner()
            .map_err(|e| AppError::Internal(format!("CSV writer error: {}", e)))?;
        String::from_utf8(bytes)
            .map_err(|e| AppError::Internal(format!("UTF-8 conversion error: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_export_has_header_and_rows() {
        let entries = vec![HarvestReportEntry {
            lot_name: "North".to_string(),
            cultivation_name: "Tomato".to_string(),
            total_harvests: 3,
            avg_quantity: 20.0,
            min_quantity: 10.0,
            max_quantity: 30.0,
            unit: "kg".to_string(),
        }];

        let csv = ReportingService::export_to_csv(&entries).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("lotName,cultivationName,totalHarvests,avgQuantity,minQuantity,maxQuantity,unit")
        );
        assert_eq!(lines.next(), Some("North,Tomato,3,20.0,10.0,30.0,kg"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_csv_export_empty() {
        let entries: Vec<HarvestReportEntry> = Vec::new();
        assert_eq!(ReportingService::export_to_csv(&entries).unwrap(), "");
    }
}
