//! Project models

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{DateRange, Season};

/// A time-boxed cultivation effort on a lot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub lot_id: Uuid,
    pub lot_name: String,
}

impl Project {
    pub fn period(&self) -> DateRange {
        DateRange {
            start: self.start_date,
            end: self.end_date,
        }
    }

    /// Season in which the project starts
    pub fn season(&self) -> Season {
        Season::from_month(self.start_date.month())
    }

    /// Status relative to `today`
    pub fn status_on(&self, today: NaiveDate) -> ProjectStatus {
        if today < self.start_date {
            ProjectStatus::Planned
        } else if self.period().contains(today) {
            ProjectStatus::InProgress
        } else {
            ProjectStatus::Completed
        }
    }
}

/// Progress of a project, derived from its dates
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Planned,
    InProgress,
    Completed,
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectStatus::Planned => write!(f, "Planned"),
            ProjectStatus::InProgress => write!(f, "In Progress"),
            ProjectStatus::Completed => write!(f, "Completed"),
        }
    }
}

/// Project with its derived attributes, as listed to clients
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectOverview {
    #[serde(flatten)]
    pub project: Project,
    pub season: Season,
    pub status: ProjectStatus,
}

impl ProjectOverview {
    pub fn new(project: Project, today: NaiveDate) -> Self {
        let season = project.season();
        let status = project.status_on(today);
        Self {
            project,
            season,
            status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn project(start: NaiveDate, end: NaiveDate) -> Project {
        Project {
            id: Uuid::new_v4(),
            name: "Summer vegetables".to_string(),
            start_date: start,
            end_date: end,
            lot_id: Uuid::new_v4(),
            lot_name: "North field".to_string(),
        }
    }

    #[test]
    fn test_status_follows_dates() {
        let p = project(date(2024, 4, 1), date(2024, 9, 30));
        assert_eq!(p.status_on(date(2024, 3, 31)), ProjectStatus::Planned);
        assert_eq!(p.status_on(date(2024, 4, 1)), ProjectStatus::InProgress);
        assert_eq!(p.status_on(date(2024, 9, 30)), ProjectStatus::InProgress);
        assert_eq!(p.status_on(date(2024, 10, 1)), ProjectStatus::Completed);
    }

    #[test]
    fn test_season_from_start_month() {
        assert_eq!(project(date(2024, 4, 1), date(2024, 9, 30)).season(), Season::Spring);
        assert_eq!(project(date(2024, 12, 1), date(2025, 2, 1)).season(), Season::Winter);
    }

    #[test]
    fn test_overview_serializes_derived_fields() {
        let overview = ProjectOverview::new(
            project(date(2024, 7, 1), date(2024, 8, 31)),
            date(2025, 1, 1),
        );
        let json = serde_json::to_value(&overview).unwrap();
        assert_eq!(json["season"], "summer");
        assert_eq!(json["status"], "completed");
        assert_eq!(json["lotName"], "North field");
    }
}
