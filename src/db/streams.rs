//! Stream repository.

use super::{DbError, now, unique_or};
use crate::model::Stream;
use sqlx::SqlitePool;

type StreamRow = (i64, String, String, i64, i64);

const SELECT_STREAM: &str = "SELECT id, name, stream_type, device_id, created_at FROM streams";

fn from_row((id, name, stream_type, device_id, created_at): StreamRow) -> Stream {
    Stream {
        id,
        name,
        stream_type,
        device_id,
        created_at,
    }
}

/// Repository for stream operations.
pub struct StreamRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> StreamRepository<'a> {
    /// Create a new stream repository.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        name: &str,
        stream_type: &str,
        device_id: i64,
    ) -> Result<Stream, DbError> {
        let created_at = now();

        let result = sqlx::query(
            r#"
            INSERT INTO streams (name, stream_type, device_id, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(name)
        .bind(stream_type)
        .bind(device_id)
        .bind(created_at)
        .execute(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_foreign_key_violation()
            {
                return DbError::DeviceNotFound(device_id.to_string());
            }
            unique_or(e, || DbError::StreamExists(name.to_string()))
        })?;

        Ok(Stream {
            id: result.last_insert_rowid(),
            name: name.to_string(),
            stream_type: stream_type.to_string(),
            device_id,
            created_at,
        })
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Stream>, DbError> {
        let row = sqlx::query_as::<_, StreamRow>(&format!("{SELECT_STREAM} WHERE id = ?"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(from_row))
    }

    /// Find a device's stream by name.
    pub async fn find_for_device_by_name(
        &self,
        device_id: i64,
        name: &str,
    ) -> Result<Option<Stream>, DbError> {
        let row = sqlx::query_as::<_, StreamRow>(&format!(
            "{SELECT_STREAM} WHERE device_id = ? AND name = ?"
        ))
        .bind(device_id)
        .bind(name)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(from_row))
    }

    /// All streams of a device, ordered by id.
    pub async fn load_for_device(&self, device_id: i64) -> Result<Vec<Stream>, DbError> {
        let rows = sqlx::query_as::<_, StreamRow>(&format!(
            "{SELECT_STREAM} WHERE device_id = ? ORDER BY id"
        ))
        .bind(device_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(from_row).collect())
    }

    /// Write name and type back to a stream of `device_id`.
    /// Returns `false` when no row matched.
    pub async fn update(&self, device_id: i64, stream: &Stream) -> Result<bool, DbError> {
        let result = sqlx::query(
            "UPDATE streams SET name = ?, stream_type = ? WHERE id = ? AND device_id = ?",
        )
        .bind(&stream.name)
        .bind(&stream.stream_type)
        .bind(stream.id)
        .bind(device_id)
        .execute(self.pool)
        .await
        .map_err(|e| unique_or(e, || DbError::StreamExists(stream.name.clone())))?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(&self, device_id: i64, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM streams WHERE id = ? AND device_id = ?")
            .bind(id)
            .bind(device_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
