//! Activity recording, persistence mapping and lifecycle tests
//!
//! Covers:
//! - Round trip of every activity kind through storage
//! - Update and delete semantics
//! - Farmer resolution and validation before storage

mod common;

use biogarden_server::services::activity::{ActivityService, RecordActivityInput};
use biogarden_server::AppError;
use proptest::prelude::*;
use shared::models::{ActivityDetails, ActivityKind, ActivityPatch, ActivityStatus};

use common::{date, farm};

fn seeding(quantity: i32, unit: &str) -> ActivityDetails {
    ActivityDetails::Seeding {
        quantity,
        unit: unit.to_string(),
    }
}

fn harvest(planned: i32, actual: i32, unit: &str) -> ActivityDetails {
    ActivityDetails::Harvest {
        planned_quantity: planned,
        actual_quantity: actual,
        unit: unit.to_string(),
    }
}

fn input(details: ActivityDetails) -> RecordActivityInput {
    RecordActivityInput {
        date: date(2024, 3, 1),
        status: ActivityStatus::Planned,
        farmer_id: None,
        details,
    }
}

// ============================================================================
// Recording
// ============================================================================

#[tokio::test]
async fn test_seeding_activity_lists_with_details() {
    let farm = farm().await;
    let service = ActivityService::new(farm.store.clone());

    service
        .record_activity(farm.farmer.id, farm.cultivation.id, input(seeding(50, "grams")))
        .await
        .unwrap();

    let activities = service.list_activities(farm.cultivation.id).await.unwrap();
    assert_eq!(activities.len(), 1);
    assert_eq!(activities[0].details_text(), "Quantity: 50 grams");
    assert_eq!(activities[0].status, ActivityStatus::Planned);
    assert_eq!(activities[0].date, date(2024, 3, 1));
}

#[tokio::test]
async fn test_activity_takes_lot_and_farmer_name() {
    let farm = farm().await;
    let service = ActivityService::new(farm.store.clone());

    let activity = service
        .record_activity(farm.farmer.id, farm.cultivation.id, input(ActivityDetails::Irrigation))
        .await
        .unwrap();

    assert_eq!(activity.kind(), ActivityKind::Irrigation);
    assert_eq!(activity.lot_id, farm.lot.id);
    assert_eq!(activity.farmer_id, farm.farmer.id);
    assert_eq!(activity.farmer_name, "Luca Bianchi");
    assert_eq!(activity.details_text(), "No additional information");
}

#[tokio::test]
async fn test_owner_must_name_a_farmer() {
    let farm = farm().await;
    let service = ActivityService::new(farm.store.clone());

    // The owner is not a farmer, so recording on their own behalf fails
    let result = service
        .record_activity(farm.owner.id, farm.cultivation.id, input(ActivityDetails::Irrigation))
        .await;
    assert!(matches!(result, Err(AppError::Validation { ref field, .. }) if field == "farmerId"));

    let mut assigned = input(ActivityDetails::Irrigation);
    assigned.farmer_id = Some(farm.farmer.id);
    let activity = service
        .record_activity(farm.owner.id, farm.cultivation.id, assigned)
        .await
        .unwrap();
    assert_eq!(activity.farmer_id, farm.farmer.id);
}

#[tokio::test]
async fn test_invalid_figures_rejected_without_side_effect() {
    let farm = farm().await;
    let service = ActivityService::new(farm.store.clone());

    for details in [seeding(0, "grams"), seeding(10, "  "), harvest(0, 5, "kg"), harvest(10, -1, "kg")] {
        let result = service
            .record_activity(farm.farmer.id, farm.cultivation.id, input(details))
            .await;
        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    assert!(service.list_activities(farm.cultivation.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_cultivation_is_not_found() {
    let farm = farm().await;
    let service = ActivityService::new(farm.store.clone());

    let result = service
        .record_activity(farm.farmer.id, uuid::Uuid::new_v4(), input(ActivityDetails::Irrigation))
        .await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

// ============================================================================
// Update
// ============================================================================

#[tokio::test]
async fn test_update_actual_quantity_keeps_other_fields() {
    let farm = farm().await;
    let service = ActivityService::new(farm.store.clone());

    let activity = service
        .record_activity(farm.farmer.id, farm.cultivation.id, input(harvest(40, 30, "kg")))
        .await
        .unwrap();

    service
        .update_activity(
            activity.id,
            ActivityPatch {
                actual_quantity: Some(45),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let stored = service.get_activity(activity.id).await.unwrap();
    assert_eq!(stored.details, harvest(40, 45, "kg"));
    assert_eq!(stored.date, activity.date);
    assert_eq!(stored.status, activity.status);
}

#[tokio::test]
async fn test_status_moves_freely() {
    let farm = farm().await;
    let service = ActivityService::new(farm.store.clone());

    let mut activity = service
        .record_activity(farm.farmer.id, farm.cultivation.id, input(ActivityDetails::Irrigation))
        .await
        .unwrap();

    for status in [ActivityStatus::Completed, ActivityStatus::Planned, ActivityStatus::InProgress] {
        activity = service
            .update_activity(
                activity.id,
                ActivityPatch {
                    status: Some(status),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(activity.status, status);
    }
}

#[tokio::test]
async fn test_update_rejects_fields_of_another_kind() {
    let farm = farm().await;
    let service = ActivityService::new(farm.store.clone());

    let activity = service
        .record_activity(farm.farmer.id, farm.cultivation.id, input(seeding(50, "grams")))
        .await
        .unwrap();

    let result = service
        .update_activity(
            activity.id,
            ActivityPatch {
                actual_quantity: Some(10),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::Validation { .. })));

    let stored = service.get_activity(activity.id).await.unwrap();
    assert_eq!(stored.details, seeding(50, "grams"));
}

#[tokio::test]
async fn test_update_missing_activity_is_not_found() {
    let farm = farm().await;
    let service = ActivityService::new(farm.store.clone());

    let result = service
        .update_activity(uuid::Uuid::new_v4(), ActivityPatch::default())
        .await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

// ============================================================================
// Delete
// ============================================================================

#[tokio::test]
async fn test_delete_removes_only_that_activity() {
    let farm = farm().await;
    let service = ActivityService::new(farm.store.clone());

    let kept = service
        .record_activity(farm.farmer.id, farm.cultivation.id, input(ActivityDetails::Irrigation))
        .await
        .unwrap();
    let removed = service
        .record_activity(farm.farmer.id, farm.cultivation.id, input(seeding(5, "kg")))
        .await
        .unwrap();

    service.delete_activity(removed.id).await.unwrap();

    let remaining = service.list_activities(farm.cultivation.id).await.unwrap();
    assert_eq!(remaining, vec![kept.clone()]);

    let again = service.delete_activity(removed.id).await;
    assert!(matches!(again, Err(AppError::NotFound(_))));
    assert_eq!(service.list_activities(farm.cultivation.id).await.unwrap(), vec![kept]);
}

// ============================================================================
// Property Tests
// ============================================================================

fn details_strategy() -> impl Strategy<Value = ActivityDetails> {
    let unit = "[a-z]{1,8}";
    prop_oneof![
        (1..10_000i32, unit).prop_map(|(q, u)| seeding(q, &u)),
        Just(ActivityDetails::Irrigation),
        (1..10_000i32, 0..10_000i32, unit).prop_map(|(p, a, u)| harvest(p, a, &u)),
    ]
}

fn status_strategy() -> impl Strategy<Value = ActivityStatus> {
    prop_oneof![
        Just(ActivityStatus::Planned),
        Just(ActivityStatus::InProgress),
        Just(ActivityStatus::Completed),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Reading back a stored activity yields the same common and kind fields
    #[test]
    fn prop_storage_round_trip(
        details in details_strategy(),
        status in status_strategy(),
        day in 1..=28u32,
    ) {
        let (written, read) = tokio_test::block_on(async {
            let farm = farm().await;
            let service = ActivityService::new(farm.store.clone());
            let written = service
                .record_activity(
                    farm.farmer.id,
                    farm.cultivation.id,
                    RecordActivityInput {
                        date: date(2024, 5, day),
                        status,
                        farmer_id: None,
                        details: details.clone(),
                    },
                )
                .await
                .unwrap();
            let read = service.get_activity(written.id).await.unwrap();
            (written, read)
        });

        prop_assert_eq!(&read, &written);
        prop_assert_eq!(read.details, details);
        prop_assert_eq!(read.status, status);
        prop_assert_eq!(read.date, date(2024, 5, day));
    }

    /// The details text mentions only figures of the activity's own kind
    #[test]
    fn prop_details_text_matches_kind(details in details_strategy()) {
        let text = details.describe();
        match &details {
            ActivityDetails::Seeding { .. } => {
                prop_assert!(text.starts_with("Quantity: "));
                prop_assert!(!text.contains("Planned") && !text.contains("Actual"));
            }
            ActivityDetails::Irrigation => {
                prop_assert_eq!(text, "No additional information");
            }
            ActivityDetails::Harvest { .. } => {
                prop_assert!(text.starts_with("Planned: "));
                prop_assert!(!text.contains("Quantity"));
            }
        }
    }
}
