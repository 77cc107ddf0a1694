// ABOUTME: Food truck and menu item storage layer using SQLite
// ABOUTME: Every mutating operation checks the approval gate before touching rows

use chrono::Utc;
use sqlx::{Row, SqlitePool};
use thiserror::Error;
use tracing::debug;

use curbside_storage::{StorageError, StorageResult};

use crate::types::{
    ApplicationStatus, DocumentRef, FoodTruck, FoodTruckUpdateInput, MenuItem,
    MenuItemCreateInput, MenuItemUpdateInput,
};

#[derive(Error, Debug)]
pub enum TruckError {
    #[error("Food truck is not approved")]
    NotApproved,
    #[error("Record not found")]
    NotFound,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<sqlx::Error> for TruckError {
    fn from(e: sqlx::Error) -> Self {
        TruckError::Storage(StorageError::Sqlx(e))
    }
}

pub struct TruckStorage {
    pool: SqlitePool,
}

impl TruckStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get_truck(&self, id: &str) -> StorageResult<Option<FoodTruck>> {
        let row = sqlx::query("SELECT * FROM food_trucks WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        row.map(|r| row_to_truck(&r)).transpose()
    }

    pub async fn list_trucks(&self) -> StorageResult<Vec<FoodTruck>> {
        let rows = sqlx::query("SELECT * FROM food_trucks ORDER BY created_at")
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        rows.iter().map(row_to_truck).collect()
    }

    pub async fn list_trucks_by_brand(&self, brand_id: &str) -> StorageResult<Vec<FoodTruck>> {
        let rows = sqlx::query("SELECT * FROM food_trucks WHERE brand_id = ? ORDER BY created_at")
            .bind(brand_id)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        rows.iter().map(row_to_truck).collect()
    }

    /// Update a food truck. Gated: only approved trucks are mutable.
    pub async fn update_truck(
        &self,
        id: &str,
        input: FoodTruckUpdateInput,
    ) -> Result<FoodTruck, TruckError> {
        debug!("Updating food truck: {}", id);

        self.require_approved(id).await?;

        let now = Utc::now();
        let mut updates = vec!["updated_at = ?"];

        if input.operating_region.is_some() {
            updates.push("operating_region = ?");
        }
        if input.location.is_some() {
            updates.push("location = ?");
        }
        if input.phone_number.is_some() {
            updates.push("phone_number = ?");
        }
        if input.cuisine_specialties.is_some() {
            updates.push("cuisine_specialties = ?");
        }
        if input.menu_highlights.is_some() {
            updates.push("menu_highlights = ?");
        }
        if input.documents.is_some() {
            updates.push("documents = ?");
        }

        let query_str = format!("UPDATE food_trucks SET {} WHERE id = ?", updates.join(", "));
        let mut query = sqlx::query(&query_str).bind(now);

        if let Some(region) = input.operating_region {
            query = query.bind(region);
        }
        if let Some(location) = input.location {
            query = query.bind(location);
        }
        if let Some(phone) = input.phone_number {
            query = query.bind(phone);
        }
        if let Some(cuisine) = input.cuisine_specialties {
            query = query.bind(cuisine);
        }
        if let Some(highlights) = input.menu_highlights {
            query = query.bind(highlights);
        }
        if let Some(documents) = input.documents {
            let json = serde_json::to_string(&documents).map_err(StorageError::Json)?;
            query = query.bind(json);
        }

        query.bind(id).execute(&self.pool).await?;

        self.get_truck(id).await?.ok_or(TruckError::NotFound)
    }

    /// Delete a food truck. Gated: only approved trucks may be deleted.
    /// The truck's application and menu items go with it.
    pub async fn delete_truck(&self, id: &str) -> Result<(), TruckError> {
        debug!("Deleting food truck: {}", id);

        self.require_approved(id).await?;

        sqlx::query("DELETE FROM food_trucks WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    // ==================== Menu Items ====================

    pub async fn create_menu_item(
        &self,
        food_truck_id: &str,
        input: MenuItemCreateInput,
    ) -> Result<MenuItem, TruckError> {
        self.require_approved(food_truck_id).await?;

        let id = curbside_core::menu_item_id();
        let now = Utc::now();

        debug!("Creating menu item: {} for truck: {}", id, food_truck_id);

        sqlx::query(
            r#"
            INSERT INTO menu_items (id, food_truck_id, name, price, description, image_url, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(food_truck_id)
        .bind(&input.name)
        .bind(input.price)
        .bind(&input.description)
        .bind(&input.image_url)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.get_menu_item(&id).await?.ok_or(TruckError::NotFound)
    }

    pub async fn get_menu_item(&self, id: &str) -> StorageResult<Option<MenuItem>> {
        let row = sqlx::query("SELECT * FROM menu_items WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        row.map(|r| row_to_menu_item(&r)).transpose()
    }

    pub async fn list_menu_items(&self, food_truck_id: &str) -> StorageResult<Vec<MenuItem>> {
        let rows = sqlx::query("SELECT * FROM menu_items WHERE food_truck_id = ? ORDER BY name")
            .bind(food_truck_id)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        rows.iter().map(row_to_menu_item).collect()
    }

    pub async fn update_menu_item(
        &self,
        id: &str,
        input: MenuItemUpdateInput,
    ) -> Result<MenuItem, TruckError> {
        debug!("Updating menu item: {}", id);

        let item = self.get_menu_item(id).await?.ok_or(TruckError::NotFound)?;
        self.require_approved(&item.food_truck_id).await?;

        let now = Utc::now();
        let mut updates = vec!["updated_at = ?"];

        if input.name.is_some() {
            updates.push("name = ?");
        }
        if input.price.is_some() {
            updates.push("price = ?");
        }
        if input.description.is_some() {
            updates.push("description = ?");
        }
        if input.image_url.is_some() {
            updates.push("image_url = ?");
        }

        let query_str = format!("UPDATE menu_items SET {} WHERE id = ?", updates.join(", "));
        let mut query = sqlx::query(&query_str).bind(now);

        if let Some(name) = input.name {
            query = query.bind(name);
        }
        if let Some(price) = input.price {
            query = query.bind(price);
        }
        if let Some(description) = input.description {
            query = query.bind(description);
        }
        if let Some(image_url) = input.image_url {
            query = query.bind(image_url);
        }

        query.bind(id).execute(&self.pool).await?;

        self.get_menu_item(id).await?.ok_or(TruckError::NotFound)
    }

    pub async fn delete_menu_item(&self, id: &str) -> Result<(), TruckError> {
        debug!("Deleting menu item: {}", id);

        let item = self.get_menu_item(id).await?.ok_or(TruckError::NotFound)?;
        self.require_approved(&item.food_truck_id).await?;

        sqlx::query("DELETE FROM menu_items WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// The approval gate: load the truck and reject mutation unless its
    /// application has been approved.
    async fn require_approved(&self, truck_id: &str) -> Result<FoodTruck, TruckError> {
        let truck = self
            .get_truck(truck_id)
            .await?
            .ok_or(TruckError::NotFound)?;

        if truck.application_status != ApplicationStatus::Approved {
            return Err(TruckError::NotApproved);
        }

        Ok(truck)
    }
}

/// Convert a `food_trucks` row. Shared with the workflow engine, which
/// reads truck rows inside its own transactions.
pub fn row_to_truck(row: &sqlx::sqlite::SqliteRow) -> StorageResult<FoodTruck> {
    let documents_json: Option<String> = row.try_get("documents").map_err(StorageError::Sqlx)?;
    let documents: Vec<DocumentRef> = match documents_json {
        Some(json) => serde_json::from_str(&json).map_err(StorageError::Json)?,
        None => Vec::new(),
    };

    Ok(FoodTruck {
        id: row.try_get("id").map_err(StorageError::Sqlx)?,
        brand_id: row.try_get("brand_id").map_err(StorageError::Sqlx)?,
        operating_region: row
            .try_get("operating_region")
            .map_err(StorageError::Sqlx)?,
        location: row.try_get("location").map_err(StorageError::Sqlx)?,
        phone_number: row.try_get("phone_number").map_err(StorageError::Sqlx)?,
        cuisine_specialties: row
            .try_get("cuisine_specialties")
            .map_err(StorageError::Sqlx)?,
        menu_highlights: row
            .try_get("menu_highlights")
            .map_err(StorageError::Sqlx)?,
        application_status: row
            .try_get("application_status")
            .map_err(StorageError::Sqlx)?,
        documents,
        created_at: row.try_get("created_at").map_err(StorageError::Sqlx)?,
        updated_at: row.try_get("updated_at").map_err(StorageError::Sqlx)?,
    })
}

fn row_to_menu_item(row: &sqlx::sqlite::SqliteRow) -> StorageResult<MenuItem> {
    Ok(MenuItem {
        id: row.try_get("id").map_err(StorageError::Sqlx)?,
        food_truck_id: row.try_get("food_truck_id").map_err(StorageError::Sqlx)?,
        name: row.try_get("name").map_err(StorageError::Sqlx)?,
        price: row.try_get("price").map_err(StorageError::Sqlx)?,
        description: row.try_get("description").map_err(StorageError::Sqlx)?,
        image_url: row.try_get("image_url").map_err(StorageError::Sqlx)?,
        created_at: row.try_get("created_at").map_err(StorageError::Sqlx)?,
        updated_at: row.try_get("updated_at").map_err(StorageError::Sqlx)?,
    })
}
