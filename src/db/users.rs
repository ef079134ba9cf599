//! User repository.
//!
//! Handles account creation, lookup and updates. Passwords are stored as
//! Argon2 hashes.

use super::{DbError, now, unique_or};
use crate::model::User;
use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use sqlx::SqlitePool;

type UserRow = (i64, String, String, String, i64);

const SELECT_USER: &str = "SELECT id, name, email, password_hash, created_at FROM users";

fn from_row((id, name, email, password_hash, created_at): UserRow) -> User {
    User {
        id,
        name,
        email,
        password_hash,
        created_at,
    }
}

/// Repository for user operations.
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Register a new user. The password is stored as an Argon2 hash.
    pub async fn create(&self, name: &str, email: &str, password: &str) -> Result<User, DbError> {
        let password_hash = hash_password(password)?;
        let created_at = now();

        let result = sqlx::query(
            r#"
            INSERT INTO users (name, email, password_hash, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(&password_hash)
        .bind(created_at)
        .execute(self.pool)
        .await
        .map_err(|e| unique_or(e, || DbError::UserExists(name.to_string())))?;

        Ok(User {
            id: result.last_insert_rowid(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash,
            created_at,
        })
    }

    /// Find user by name (case-insensitive).
    pub async fn find_by_name(&self, name: &str) -> Result<Option<User>, DbError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "{SELECT_USER} WHERE name = ? COLLATE NOCASE"
        ))
        .bind(name)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(from_row))
    }

    /// Find user by ID.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>, DbError> {
        let row = sqlx::query_as::<_, UserRow>(&format!("{SELECT_USER} WHERE id = ?"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(from_row))
    }

    /// Find user by email (case-insensitive).
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "{SELECT_USER} WHERE email = ? COLLATE NOCASE"
        ))
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(from_row))
    }

    /// All users, ordered by id.
    pub async fn load_all(&self) -> Result<Vec<User>, DbError> {
        let rows = sqlx::query_as::<_, UserRow>(&format!("{SELECT_USER} ORDER BY id"))
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(from_row).collect())
    }

    /// Write name, email and password hash back. Returns `false` when no row matched.
    pub async fn update(&self, user: &User) -> Result<bool, DbError> {
        let result = sqlx::query(
            r#"
            UPDATE users SET name = ?, email = ?, password_hash = ?
            WHERE id = ?
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.id)
        .execute(self.pool)
        .await
        .map_err(|e| unique_or(e, || DbError::UserExists(user.name.clone())))?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a user; devices and streams go with it. Returns `false` when no row matched.
    pub async fn delete(&self, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Hash a password using Argon2.
pub(crate) fn hash_password(password: &str) -> Result<String, DbError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| DbError::InvalidPassword)?;
    Ok(hash.to_string())
}
