//! WebAssembly module for the BioGarden platform
//!
//! Provides client-side computation for:
//! - Project season and status
//! - Activity summaries and validation
//! - Harvest statistics for charts

use chrono::NaiveDate;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::log_1(&"BioGarden WASM module loaded".into());
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|e| format!("Invalid date {}: {}", value, e))
}

fn season_of(start_date: &str) -> Result<Season, String> {
    parse_date(start_date).map(|d| Season::from_month(chrono::Datelike::month(&d)))
}

fn status_of(start_date: &str, end_date: &str, today: &str) -> Result<ProjectStatus, String> {
    let (start, end, today) = (parse_date(start_date)?, parse_date(end_date)?, parse_date(today)?);
    validate_project_dates(start, end)?;
    if today < start {
        Ok(ProjectStatus::Planned)
    } else if (DateRange { start, end }).contains(today) {
        Ok(ProjectStatus::InProgress)
    } else {
        Ok(ProjectStatus::Completed)
    }
}

fn details_from_json(details_json: &str) -> Result<ActivityDetails, String> {
    serde_json::from_str(details_json).map_err(|e| format!("Invalid activity JSON: {}", e))
}

fn harvest_summary(
    lot_name: &str,
    cultivation_name: &str,
    activities_json: &str,
) -> Result<Option<HarvestReportEntry>, String> {
    let activities: Vec<Activity> = serde_json::from_str(activities_json)
        .map_err(|e| format!("Invalid activities JSON: {}", e))?;
    Ok(summarize_harvests(lot_name, cultivation_name, &activities))
}

/// Season in which a project starting on `start_date` (YYYY-MM-DD) runs
#[wasm_bindgen]
pub fn project_season(start_date: &str) -> Result<String, JsValue> {
    season_of(start_date)
        .map(|s| s.to_string())
        .map_err(|e| JsValue::from_str(&e))
}

/// Status of a project on `today`
#[wasm_bindgen]
pub fn project_status(start_date: &str, end_date: &str, today: &str) -> Result<String, JsValue> {
    status_of(start_date, end_date, today)
        .map(|s| s.to_string())
        .map_err(|e| JsValue::from_str(&e))
}

/// Human-readable summary of an activity's kind-specific fields
#[wasm_bindgen]
pub fn describe_activity(details_json: &str) -> Result<String, JsValue> {
    details_from_json(details_json)
        .map(|d| d.describe())
        .map_err(|e| JsValue::from_str(&e))
}

/// Validate activity figures before submitting; returns the error message, if any
#[wasm_bindgen]
pub fn validate_activity(details_json: &str) -> Option<String> {
    match details_from_json(details_json) {
        Ok(details) => validate_activity_details(&details).err().map(str::to_string),
        Err(e) => Some(e),
    }
}

/// Validate a lot area
#[wasm_bindgen]
pub fn is_valid_lot_area(area: i32) -> bool {
    validate_lot_area(area).is_ok()
}

/// Harvest statistics for a list of activities, as JSON (`null` without harvests)
#[wasm_bindgen]
pub fn summarize_activities(
    lot_name: &str,
    cultivation_name: &str,
    activities_json: &str,
) -> Result<String, JsValue> {
    let entry = harvest_summary(lot_name, cultivation_name, activities_json)
        .map_err(|e| JsValue::from_str(&e))?;
    serde_json::to_string(&entry).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Activity status codes, in display order
#[wasm_bindgen]
pub fn activity_statuses() -> js_sys::Array {
    ActivityStatus::ALL
        .iter()
        .map(|s| JsValue::from_str(s.code()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_season_of() {
        assert_eq!(season_of("2024-04-10").unwrap(), Season::Spring);
        assert_eq!(season_of("2024-12-01").unwrap(), Season::Winter);
        assert!(season_of("April").is_err());
    }

    #[test]
    fn test_status_of() {
        assert_eq!(
            status_of("2024-03-01", "2024-06-30", "2024-02-01").unwrap(),
            ProjectStatus::Planned
        );
        assert_eq!(
            status_of("2024-03-01", "2024-06-30", "2024-06-30").unwrap(),
            ProjectStatus::InProgress
        );
        assert_eq!(
            status_of("2024-03-01", "2024-06-30", "2024-07-01").unwrap(),
            ProjectStatus::Completed
        );
        assert!(status_of("2024-06-30", "2024-03-01", "2024-04-01").is_err());
    }

    #[test]
    fn test_details_from_json() {
        let details = details_from_json(r#"{"type":"seeding","quantity":50,"unit":"grams"}"#).unwrap();
        assert_eq!(details.describe(), "Quantity: 50 grams");
        assert!(details_from_json(r#"{"type":"pruning"}"#).is_err());
    }

    #[test]
    fn test_validate_activity() {
        assert_eq!(validate_activity(r#"{"type":"irrigation"}"#), None);
        assert!(validate_activity(r#"{"type":"seeding","quantity":0,"unit":"g"}"#).is_some());
    }

    #[test]
    fn test_lot_area() {
        assert!(is_valid_lot_area(10));
        assert!(!is_valid_lot_area(0));
    }

    #[test]
    fn test_harvest_summary_without_harvests() {
        let summary = harvest_summary("North", "Tomato", "[]").unwrap();
        assert!(summary.is_none());
    }
}
