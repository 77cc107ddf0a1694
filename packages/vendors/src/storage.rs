// ABOUTME: Vendor and brand storage layer using SQLite
// ABOUTME: Deletes are restricted while owned records exist, never cascaded

use chrono::Utc;
use sqlx::{Row, SqlitePool};
use thiserror::Error;
use tracing::debug;

use curbside_storage::{StorageError, StorageResult};

use crate::types::{Brand, BrandCreateInput, Vendor, VendorCreateInput, VendorUpdateInput};

#[derive(Error, Debug)]
pub enum VendorError {
    #[error("Vendor still owns brands")]
    VendorHasBrands,
    #[error("Brand still owns food trucks")]
    BrandHasTrucks,
    #[error("Record not found")]
    NotFound,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<sqlx::Error> for VendorError {
    fn from(e: sqlx::Error) -> Self {
        VendorError::Storage(StorageError::Sqlx(e))
    }
}

pub struct VendorStorage {
    pool: SqlitePool,
}

impl VendorStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_vendor(&self, input: VendorCreateInput) -> StorageResult<Vendor> {
        let id = curbside_core::vendor_id();
        let now = Utc::now();

        debug!("Creating vendor: {}", id);

        sqlx::query(
            r#"
            INSERT INTO vendors (id, name, email, phone, address, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.address)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        self.get_vendor(&id).await?.ok_or(StorageError::NotFound)
    }

    pub async fn get_vendor(&self, id: &str) -> StorageResult<Option<Vendor>> {
        let row = sqlx::query("SELECT * FROM vendors WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        row.map(|r| row_to_vendor(&r)).transpose()
    }

    pub async fn list_vendors(&self) -> StorageResult<Vec<Vendor>> {
        let rows = sqlx::query("SELECT * FROM vendors ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        rows.iter().map(row_to_vendor).collect()
    }

    pub async fn update_vendor(
        &self,
        id: &str,
        input: VendorUpdateInput,
    ) -> StorageResult<Vendor> {
        debug!("Updating vendor: {}", id);

        let now = Utc::now();
        let mut updates = vec!["updated_at = ?"];

        if input.name.is_some() {
            updates.push("name = ?");
        }
        if input.email.is_some() {
            updates.push("email = ?");
        }
        if input.phone.is_some() {
            updates.push("phone = ?");
        }
        if input.address.is_some() {
            updates.push("address = ?");
        }

        let query_str = format!("UPDATE vendors SET {} WHERE id = ?", updates.join(", "));
        let mut query = sqlx::query(&query_str).bind(now);

        if let Some(name) = input.name {
            query = query.bind(name);
        }
        if let Some(email) = input.email {
            query = query.bind(email);
        }
        if let Some(phone) = input.phone {
            query = query.bind(phone);
        }
        if let Some(address) = input.address {
            query = query.bind(address);
        }

        let result = query
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        self.get_vendor(id).await?.ok_or(StorageError::NotFound)
    }

    /// Delete a vendor. Fails while the vendor still owns brands.
    pub async fn delete_vendor(&self, id: &str) -> Result<(), VendorError> {
        debug!("Deleting vendor: {}", id);

        let brand_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM brands WHERE vendor_id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        if brand_count > 0 {
            return Err(VendorError::VendorHasBrands);
        }

        let result = sqlx::query("DELETE FROM vendors WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(VendorError::NotFound);
        }

        Ok(())
    }

    // ==================== Brands ====================

    pub async fn create_brand(&self, input: BrandCreateInput) -> StorageResult<Brand> {
        let id = curbside_core::brand_id();
        let now = Utc::now();

        debug!("Creating brand: {} for vendor: {}", id, input.vendor_id);

        sqlx::query(
            r#"
            INSERT INTO brands (id, vendor_id, name, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&input.vendor_id)
        .bind(&input.name)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        self.get_brand(&id).await?.ok_or(StorageError::NotFound)
    }

    pub async fn get_brand(&self, id: &str) -> StorageResult<Option<Brand>> {
        let row = sqlx::query("SELECT * FROM brands WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        row.map(|r| row_to_brand(&r)).transpose()
    }

    pub async fn list_brands_by_vendor(&self, vendor_id: &str) -> StorageResult<Vec<Brand>> {
        let rows = sqlx::query("SELECT * FROM brands WHERE vendor_id = ? ORDER BY name")
            .bind(vendor_id)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        rows.iter().map(row_to_brand).collect()
    }

    /// Delete a brand. Fails while the brand still owns food trucks.
    pub async fn delete_brand(&self, id: &str) -> Result<(), VendorError> {
        debug!("Deleting brand: {}", id);

        let truck_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM food_trucks WHERE brand_id = ?")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        if truck_count > 0 {
            return Err(VendorError::BrandHasTrucks);
        }

        let result = sqlx::query("DELETE FROM brands WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(VendorError::NotFound);
        }

        Ok(())
    }
}

fn row_to_vendor(row: &sqlx::sqlite::SqliteRow) -> StorageResult<Vendor> {
    Ok(Vendor {
        id: row.try_get("id").map_err(StorageError::Sqlx)?,
        name: row.try_get("name").map_err(StorageError::Sqlx)?,
        email: row.try_get("email").map_err(StorageError::Sqlx)?,
        phone: row.try_get("phone").map_err(StorageError::Sqlx)?,
        address: row.try_get("address").map_err(StorageError::Sqlx)?,
        created_at: row.try_get("created_at").map_err(StorageError::Sqlx)?,
        updated_at: row.try_get("updated_at").map_err(StorageError::Sqlx)?,
    })
}

fn row_to_brand(row: &sqlx::sqlite::SqliteRow) -> StorageResult<Brand> {
    Ok(Brand {
        id: row.try_get("id").map_err(StorageError::Sqlx)?,
        vendor_id: row.try_get("vendor_id").map_err(StorageError::Sqlx)?,
        name: row.try_get("name").map_err(StorageError::Sqlx)?,
        created_at: row.try_get("created_at").map_err(StorageError::Sqlx)?,
        updated_at: row.try_get("updated_at").map_err(StorageError::Sqlx)?,
    })
}
