// ABOUTME: Integration tests for the approval gate on truck and menu mutations
// ABOUTME: Rows are seeded directly; the licensing workflow itself is exercised elsewhere

use chrono::Utc;
use pretty_assertions::assert_eq;
use sqlx::SqlitePool;

use curbside_storage::connect_in_memory;
use curbside_trucks::{
    FoodTruckUpdateInput, MenuItemCreateInput, MenuItemUpdateInput, TruckError, TruckStorage,
};

/// Seed a vendor, brand, and one truck holding the given application status.
async fn seed_truck(pool: &SqlitePool, truck_id: &str, status: &str) {
    let now = Utc::now();
    sqlx::query("INSERT OR IGNORE INTO vendors (id, name, email, created_at, updated_at) VALUES ('vendor-1', 'V', 'v@test', ?, ?)")
        .bind(now)
        .bind(now)
        .execute(pool)
        .await
        .unwrap();
    sqlx::query("INSERT OR IGNORE INTO brands (id, vendor_id, name, created_at, updated_at) VALUES ('brand-1', 'vendor-1', 'B', ?, ?)")
        .bind(now)
        .bind(now)
        .execute(pool)
        .await
        .unwrap();
    sqlx::query(
        "INSERT INTO food_trucks (id, brand_id, operating_region, application_status, created_at, updated_at) \
         VALUES (?, 'brand-1', 'North', ?, ?, ?)",
    )
    .bind(truck_id)
    .bind(status)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .unwrap();
}

#[tokio::test]
async fn test_truck_mutation_blocked_until_approved() {
    let pool = connect_in_memory().await.unwrap();
    let storage = TruckStorage::new(pool.clone());
    seed_truck(&pool, "truck-1", "SUBMITTED").await;

    let input = FoodTruckUpdateInput {
        location: Some("Dock 3".to_string()),
        ..Default::default()
    };
    let err = storage.update_truck("truck-1", input.clone()).await.unwrap_err();
    assert!(matches!(err, TruckError::NotApproved));

    let err = storage.delete_truck("truck-1").await.unwrap_err();
    assert!(matches!(err, TruckError::NotApproved));

    // Approval opens the gate.
    sqlx::query("UPDATE food_trucks SET application_status = 'APPROVED' WHERE id = 'truck-1'")
        .execute(&pool)
        .await
        .unwrap();

    let truck = storage.update_truck("truck-1", input).await.unwrap();
    assert_eq!(truck.location.as_deref(), Some("Dock 3"));

    storage.delete_truck("truck-1").await.unwrap();
    assert!(storage.get_truck("truck-1").await.unwrap().is_none());
}

#[tokio::test]
async fn test_rejected_truck_is_not_mutable() {
    let pool = connect_in_memory().await.unwrap();
    let storage = TruckStorage::new(pool.clone());
    seed_truck(&pool, "truck-1", "REJECTED").await;

    let err = storage
        .update_truck("truck-1", FoodTruckUpdateInput::default())
        .await
        .unwrap_err();
    assert!(matches!(err, TruckError::NotApproved));
}

#[tokio::test]
async fn test_menu_items_share_the_gate() {
    let pool = connect_in_memory().await.unwrap();
    let storage = TruckStorage::new(pool.clone());
    seed_truck(&pool, "truck-1", "IN_REVIEW").await;

    let input = MenuItemCreateInput {
        name: "Al Pastor".to_string(),
        price: 4.5,
        description: None,
        image_url: None,
    };
    let err = storage.create_menu_item("truck-1", input.clone()).await.unwrap_err();
    assert!(matches!(err, TruckError::NotApproved));

    sqlx::query("UPDATE food_trucks SET application_status = 'APPROVED' WHERE id = 'truck-1'")
        .execute(&pool)
        .await
        .unwrap();

    let item = storage.create_menu_item("truck-1", input).await.unwrap();
    assert_eq!(item.price, 4.5);

    let updated = storage
        .update_menu_item(
            &item.id,
            MenuItemUpdateInput {
                price: Some(5.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.price, 5.0);

    // Revocation of approval re-closes the gate for existing items.
    sqlx::query("UPDATE food_trucks SET application_status = 'REJECTED' WHERE id = 'truck-1'")
        .execute(&pool)
        .await
        .unwrap();
    let err = storage.delete_menu_item(&item.id).await.unwrap_err();
    assert!(matches!(err, TruckError::NotApproved));

    let err = storage.get_menu_item("item-missing").await.unwrap();
    assert!(err.is_none());
}
