//! Phone carrier repository.

use super::{DbError, unique_or};
use crate::model::PhoneCarrier;
use sqlx::SqlitePool;

type CarrierRow = (i64, String, String);

fn from_row((id, name, email_domain): CarrierRow) -> PhoneCarrier {
    PhoneCarrier {
        id,
        name,
        email_domain,
    }
}

/// Repository for phone carrier operations.
pub struct CarrierRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CarrierRepository<'a> {
    /// Create a new carrier repository.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, name: &str, email_domain: &str) -> Result<PhoneCarrier, DbError> {
        let result = sqlx::query("INSERT INTO phone_carriers (name, email_domain) VALUES (?, ?)")
            .bind(name)
            .bind(email_domain)
            .execute(self.pool)
            .await
            .map_err(|e| unique_or(e, || DbError::CarrierExists(name.to_string())))?;

        Ok(PhoneCarrier {
            id: result.last_insert_rowid(),
            name: name.to_string(),
            email_domain: email_domain.to_string(),
        })
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<PhoneCarrier>, DbError> {
        let row = sqlx::query_as::<_, CarrierRow>(
            "SELECT id, name, email_domain FROM phone_carriers WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(from_row))
    }

    pub async fn load_all(&self) -> Result<Vec<PhoneCarrier>, DbError> {
        let rows = sqlx::query_as::<_, CarrierRow>(
            "SELECT id, name, email_domain FROM phone_carriers ORDER BY id",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(from_row).collect())
    }

    pub async fn update(&self, carrier: &PhoneCarrier) -> Result<bool, DbError> {
        let result = sqlx::query("UPDATE phone_carriers SET name = ?, email_domain = ? WHERE id = ?")
            .bind(&carrier.name)
            .bind(&carrier.email_domain)
            .bind(carrier.id)
            .execute(self.pool)
            .await
            .map_err(|e| unique_or(e, || DbError::CarrierExists(carrier.name.clone())))?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(&self, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM phone_carriers WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
