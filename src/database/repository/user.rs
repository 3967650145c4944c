use std::sync::Arc;

use once_cell::sync::OnceCell;
use sqlx::PgPool;
use tracing::{info, warn};

use crate::auth::password::{hash_password, verify_password};
use crate::database::manager::DatabaseError;
use crate::database::models::user::{USER_COLUMNS, USER_FIELDS};
use crate::database::models::{User, UserCredentials, UserDetail, UserNew};
use crate::database::query_builder::query_as_with;
use crate::sql::{build_update, SparseFields, SqlFragment, SqlValue};

#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
    bcrypt_cost: u32,
    // Stand-in hash verified when the username does not exist
    dummy_hash: Arc<OnceCell<String>>,
}

impl UserRepository {
    pub fn new(pool: PgPool, bcrypt_cost: u32) -> Self {
        Self {
            pool,
            bcrypt_cost,
            dummy_hash: Arc::new(OnceCell::new()),
        }
    }

    /// Check a username/password pair
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<User, DatabaseError> {
        let sql = format!("SELECT {}, password FROM users WHERE username = $1", USER_COLUMNS);
        let row = sqlx::query_as::<_, UserCredentials>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        let dummy_hash = self
            .dummy_hash
            .get_or_try_init(|| hash_password("unknown-user", self.bcrypt_cost))?;

        check_credentials(row, password, dummy_hash).map_err(|e| {
            if matches!(e, DatabaseError::InvalidCredentials) {
                warn!("Failed login for: {}", username);
            }
            e
        })
    }

    /// Insert a user with a hashed password; an existing username is a conflict
    pub async fn register(&self, data: UserNew) -> Result<User, DatabaseError> {
        let existing = sqlx::query_scalar::<_, String>("SELECT username FROM users WHERE username = $1")
            .bind(&data.username)
            .fetch_optional(&self.pool)
            .await?;
        if existing.is_some() {
            return Err(DatabaseError::Conflict(format!("Duplicate username: {}", data.username)));
        }

        let hashed = hash_password(&data.password, self.bcrypt_cost)?;
        let sql = format!(
            "INSERT INTO users (username, password, first_name, last_name, email, is_admin) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(&data.username)
            .bind(hashed)
            .bind(&data.first_name)
            .bind(&data.last_name)
            .bind(&data.email)
            .bind(data.is_admin)
            .fetch_one(&self.pool)
            .await
            .map_err(DatabaseError::from)
            .map_err(|e| {
                if e.is_unique_violation() {
                    DatabaseError::Conflict(format!("Duplicate username: {}", data.username))
                } else {
                    e
                }
            })?;

        info!("Registered user: {}", user.username);
        Ok(user)
    }

    pub async fn find_all(&self) -> Result<Vec<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users ORDER BY username", USER_COLUMNS);
        let users = sqlx::query_as::<_, User>(&sql).fetch_all(&self.pool).await?;
        Ok(users)
    }

    /// One user with the ids of jobs they applied to
    pub async fn get(&self, username: &str) -> Result<UserDetail, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE username = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("No user: {}", username)))?;

        let jobs = sqlx::query_scalar::<_, i32>(
            "SELECT job_id FROM applications WHERE username = $1 ORDER BY job_id",
        )
        .bind(username)
        .fetch_all(&self.pool)
        .await?;

        Ok(UserDetail { user, jobs })
    }

    /// Apply a partial update; a new password is hashed before it is stored
    pub async fn update(&self, username: &str, mut fields: SparseFields) -> Result<User, DatabaseError> {
        if let Some(SqlValue::Text(Some(plain))) = fields.get("password").cloned() {
            fields.set("password", hash_password(&plain, self.bcrypt_cost)?);
        }

        let SqlFragment { query: set_cols, params } = build_update(fields, &USER_FIELDS)?;
        let username_idx = params.len() + 1;

        let sql = format!(
            "UPDATE users SET {} WHERE username = ${} RETURNING {}",
            set_cols, username_idx, USER_COLUMNS
        );
        query_as_with::<User>(&sql, params)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("No user: {}", username)))
    }

    pub async fn remove(&self, username: &str) -> Result<(), DatabaseError> {
        let deleted = sqlx::query_scalar::<_, String>("DELETE FROM users WHERE username = $1 RETURNING username")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        match deleted {
            Some(_) => {
                info!("Removed user: {}", username);
                Ok(())
            }
            None => Err(DatabaseError::NotFound(format!("No user: {}", username))),
        }
    }

    /// Record that `username` applied to job `job_id`
    pub async fn apply_to_job(&self, username: &str, job_id: i32) -> Result<(), DatabaseError> {
        sqlx::query_scalar::<_, i32>("SELECT id FROM jobs WHERE id = $1")
            .bind(job_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("No job: {}", job_id)))?;

        sqlx::query_scalar::<_, String>("SELECT username FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("No user: {}", username)))?;

        sqlx::query("INSERT INTO applications (job_id, username) VALUES ($1, $2) ON CONFLICT DO NOTHING")
            .bind(job_id)
            .bind(username)
            .execute(&self.pool)
            .await?;

        info!("User {} applied to job {}", username, job_id);
        Ok(())
    }
}

/// Verify `password` against the stored hash, or against `dummy_hash` when
/// there is no such user, so both failures cost one bcrypt verify.
fn check_credentials(
    row: Option<UserCredentials>,
    password: &str,
    dummy_hash: &str,
) -> Result<User, DatabaseError> {
    let hashed = row.as_ref().map_or(dummy_hash, |r| r.password.as_str());
    let valid = verify_password(password, hashed)?;

    match row {
        Some(row) if valid => Ok(row.into()),
        _ => Err(DatabaseError::InvalidCredentials),
    }
}
