//! Harvest report models and aggregation

use serde::{Deserialize, Serialize};

use super::Activity;

/// Harvest statistics for one cultivation
///
/// Quantities are taken from the actual harvested amount of each harvest
/// activity. The unit is the one of the first harvest; units are not
/// cross-checked between harvests of the same cultivation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HarvestReportEntry {
    pub lot_name: String,
    pub cultivation_name: String,
    pub total_harvests: u32,
    pub avg_quantity: f64,
    pub min_quantity: f64,
    pub max_quantity: f64,
    pub unit: String,
}

/// Summarize the harvest activities among `activities`
///
/// Returns `None` when there is no harvest activity, so cultivations that were
/// never harvested do not show up in a report.
pub fn summarize_harvests(
    lot_name: &str,
    cultivation_name: &str,
    activities: &[Activity],
) -> Option<HarvestReportEntry> {
    let harvests: Vec<(i32, &str)> = activities.iter().filter_map(Activity::harvested).collect();
    let (_, unit) = *harvests.first()?;

    let total = harvests.len();
    let sum: i64 = harvests.iter().map(|(q, _)| i64::from(*q)).sum();
    let min = harvests.iter().map(|(q, _)| *q).min()?;
    let max = harvests.iter().map(|(q, _)| *q).max()?;

    Some(HarvestReportEntry {
        lot_name: lot_name.to_string(),
        cultivation_name: cultivation_name.to_string(),
        total_harvests: total as u32,
        avg_quantity: sum as f64 / total as f64,
        min_quantity: f64::from(min),
        max_quantity: f64::from(max),
        unit: unit.to_string(),
    })
}

/// Order entries alphabetically by cultivation name, as charts list them
pub fn sort_by_cultivation(entries: &mut [HarvestReportEntry]) {
    entries.sort_by(|a, b| {
        a.cultivation_name
            .cmp(&b.cultivation_name)
            .then_with(|| a.lot_name.cmp(&b.lot_name))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActivityDetails, ActivityStatus};
    use chrono::NaiveDate;
    use proptest::prelude::*;
    use uuid::Uuid;

    fn activity(details: ActivityDetails) -> Activity {
        Activity {
            id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2024, 8, 1).unwrap(),
            status: ActivityStatus::Completed,
            farmer_id: Uuid::nil(),
            farmer_name: "Luca Bianchi".to_string(),
            cultivation_id: Uuid::nil(),
            lot_id: Uuid::nil(),
            details,
        }
    }

    fn harvest(actual: i32, unit: &str) -> Activity {
        activity(ActivityDetails::Harvest {
            planned_quantity: 25,
            actual_quantity: actual,
            unit: unit.to_string(),
        })
    }

    #[test]
    fn test_three_harvests() {
        let activities = vec![harvest(10, "kg"), harvest(20, "kg"), harvest(30, "kg")];
        let entry = summarize_harvests("North field", "Tomato", &activities).unwrap();
        assert_eq!(entry.total_harvests, 3);
        assert_eq!(entry.avg_quantity, 20.0);
        assert_eq!(entry.min_quantity, 10.0);
        assert_eq!(entry.max_quantity, 30.0);
        assert_eq!(entry.unit, "kg");
    }

    #[test]
    fn test_other_kinds_ignored() {
        let activities = vec![
            activity(ActivityDetails::Irrigation),
            activity(ActivityDetails::Seeding {
                quantity: 500,
                unit: "seeds".to_string(),
            }),
            harvest(7, "crates"),
        ];
        let entry = summarize_harvests("Lot", "Lettuce", &activities).unwrap();
        assert_eq!(entry.total_harvests, 1);
        assert_eq!(entry.max_quantity, 7.0);
        assert_eq!(entry.unit, "crates");
    }

    #[test]
    fn test_no_harvest_no_entry() {
        let activities = vec![activity(ActivityDetails::Irrigation)];
        assert!(summarize_harvests("Lot", "Basil", &activities).is_none());
        assert!(summarize_harvests("Lot", "Basil", &[]).is_none());
    }

    #[test]
    fn test_first_unit_wins() {
        let activities = vec![harvest(1, "kg"), harvest(2, "lb")];
        let entry = summarize_harvests("Lot", "Potato", &activities).unwrap();
        assert_eq!(entry.unit, "kg");
    }

    #[test]
    fn test_average_is_not_rounded() {
        let activities = vec![harvest(1, "kg"), harvest(2, "kg"), harvest(2, "kg")];
        let entry = summarize_harvests("Lot", "Bean", &activities).unwrap();
        assert!((entry.avg_quantity - 5.0 / 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_sort_by_cultivation() {
        let mut entries: Vec<HarvestReportEntry> = ["Zucchini", "Basil", "Tomato"]
            .iter()
            .filter_map(|name| summarize_harvests("Lot", name, &[harvest(1, "kg")]))
            .collect();
        sort_by_cultivation(&mut entries);
        let names: Vec<&str> = entries.iter().map(|e| e.cultivation_name.as_str()).collect();
        assert_eq!(names, vec!["Basil", "Tomato", "Zucchini"]);
    }

    proptest! {
        #[test]
        fn prop_min_avg_max_ordered(quantities in prop::collection::vec(0..100_000i32, 1..50)) {
            let activities: Vec<Activity> = quantities.iter().map(|q| harvest(*q, "kg")).collect();
            let entry = summarize_harvests("Lot", "Crop", &activities).unwrap();

            prop_assert_eq!(entry.total_harvests as usize, quantities.len());
            prop_assert!(entry.min_quantity <= entry.avg_quantity);
            prop_assert!(entry.avg_quantity <= entry.max_quantity);
        }
    }
}
