//! Device repository.

use super::{DbError, now, unique_or};
use crate::model::{Device, DeviceFlags};
use sqlx::SqlitePool;

type DeviceRow = (i64, String, String, i64, bool, bool, bool, i64);

const SELECT_DEVICE: &str = "SELECT id, name, api_key, user_id, enabled, is_admin, user_proxy, created_at FROM devices";

fn from_row(
    (id, name, api_key, user_id, enabled, is_admin, user_proxy, created_at): DeviceRow,
) -> Device {
    Device {
        id,
        name,
        api_key,
        user_id,
        enabled,
        is_admin,
        user_proxy,
        created_at,
    }
}

/// Generate a fresh API key.
pub(crate) fn generate_api_key() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Repository for device operations.
pub struct DeviceRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> DeviceRepository<'a> {
    /// Create a new device repository.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create an enabled, unprivileged device for `user_id` with a new API key.
    pub async fn create(&self, name: &str, user_id: i64) -> Result<Device, DbError> {
        let api_key = generate_api_key();
        let created_at = now();

        let result = sqlx::query(
            r#"
            INSERT INTO devices (name, api_key, user_id, enabled, is_admin, user_proxy, created_at)
            VALUES (?, ?, ?, 1, 0, 0, ?)
            "#,
        )
        .bind(name)
        .bind(&api_key)
        .bind(user_id)
        .bind(created_at)
        .execute(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_foreign_key_violation()
            {
                return DbError::UserNotFound(user_id.to_string());
            }
            unique_or(e, || DbError::DeviceExists(name.to_string()))
        })?;

        Ok(Device {
            id: result.last_insert_rowid(),
            name: name.to_string(),
            api_key,
            user_id,
            enabled: true,
            is_admin: false,
            user_proxy: false,
            created_at,
        })
    }

    /// Find device by ID.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Device>, DbError> {
        let row = sqlx::query_as::<_, DeviceRow>(&format!("{SELECT_DEVICE} WHERE id = ?"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(from_row))
    }

    /// Find device by API key.
    pub async fn find_by_api_key(&self, api_key: &str) -> Result<Option<Device>, DbError> {
        let row = sqlx::query_as::<_, DeviceRow>(&format!("{SELECT_DEVICE} WHERE api_key = ?"))
            .bind(api_key)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(from_row))
    }

    /// Find a user's device by name.
    pub async fn find_for_user_by_name(
        &self,
        user_id: i64,
        name: &str,
    ) -> Result<Option<Device>, DbError> {
        let row = sqlx::query_as::<_, DeviceRow>(&format!(
            "{SELECT_DEVICE} WHERE user_id = ? AND name = ?"
        ))
        .bind(user_id)
        .bind(name)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(from_row))
    }

    /// All devices of a user, ordered by id.
    pub async fn load_for_user(&self, user_id: i64) -> Result<Vec<Device>, DbError> {
        let rows = sqlx::query_as::<_, DeviceRow>(&format!(
            "{SELECT_DEVICE} WHERE user_id = ? ORDER BY id"
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(from_row).collect())
    }

    /// Write name and API key back to a device of `user_id`.
    /// Returns `false` when no row matched.
    pub async fn update(&self, user_id: i64, device: &Device) -> Result<bool, DbError> {
        let result =
            sqlx::query("UPDATE devices SET name = ?, api_key = ? WHERE id = ? AND user_id = ?")
                .bind(&device.name)
                .bind(&device.api_key)
                .bind(device.id)
                .bind(user_id)
                .execute(self.pool)
                .await
                .map_err(|e| unique_or(e, || DbError::DeviceExists(device.name.clone())))?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn set_flags(&self, id: i64, flags: DeviceFlags) -> Result<bool, DbError> {
        let result = sqlx::query(
            r#"
            UPDATE devices
            SET enabled = ?, is_admin = ?, user_proxy = ?
            WHERE id = ?
            "#,
        )
        .bind(flags.enabled)
        .bind(flags.is_admin)
        .bind(flags.user_proxy)
        .bind(id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a device of `user_id` and its streams. Returns `false` when no
    /// row matched.
    pub async fn delete(&self, user_id: i64, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM devices WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
