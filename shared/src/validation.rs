//! Validation utilities for the BioGarden platform
//!
//! Checks run before anything reaches storage; a failed check has no side effect.

use chrono::NaiveDate;

use crate::models::ActivityDetails;

// ============================================================================
// Farm Validations
// ============================================================================

/// Validate a lot area (square metres)
pub fn validate_lot_area(area: i32) -> Result<(), &'static str> {
    if area <= 0 {
        return Err("Area must be a positive number");
    }
    Ok(())
}

/// Validate a crop maturation period
pub fn validate_maturation_days(days: i32) -> Result<(), &'static str> {
    if days <= 0 {
        return Err("Maturation time must be a positive number of days");
    }
    Ok(())
}

/// Validate that a project does not end before it starts
pub fn validate_project_dates(start: NaiveDate, end: NaiveDate) -> Result<(), &'static str> {
    if start > end {
        return Err("Start date is after end date");
    }
    Ok(())
}

/// Validate the kind-specific figures of an activity
pub fn validate_activity_details(details: &ActivityDetails) -> Result<(), &'static str> {
    match details {
        ActivityDetails::Seeding { quantity, unit } => {
            if *quantity <= 0 {
                return Err("Seed quantity must be greater than 0");
            }
            validate_unit(unit)
        }
        ActivityDetails::Irrigation => Ok(()),
        ActivityDetails::Harvest {
            planned_quantity,
            actual_quantity,
            unit,
        } => {
            if *planned_quantity <= 0 {
                return Err("Planned harvest quantity must be greater than 0");
            }
            if *actual_quantity < 0 {
                return Err("Actual harvest quantity cannot be negative");
            }
            validate_unit(unit)
        }
    }
}

/// Validate a unit of measure
pub fn validate_unit(unit: &str) -> Result<(), &'static str> {
    if unit.trim().is_empty() {
        return Err("Unit of measure is required");
    }
    Ok(())
}

// ============================================================================
// General Validations
// ============================================================================

/// Validate that a required text field is not blank
pub fn validate_required(value: &str) -> Result<(), &'static str> {
    if value.trim().is_empty() {
        return Err("This field is required");
    }
    Ok(())
}
