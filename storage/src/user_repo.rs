//! User repository: profile upserts and reminder opt-in flags.

use chrono::{DateTime, Utc};
use tracing::{info, instrument};

use crate::error::StorageError;
use crate::models::{encode_timestamp, UserProfile, UserRecord, UserRow};
use crate::sqlite_pool::SqlitePoolManager;

const SELECT_USER: &str = "SELECT id, username, first_name, last_name, language_code, is_bot, notifications_enabled, created_at, updated_at FROM users";

#[derive(Clone)]
pub struct UserRepository {
    pool_manager: SqlitePoolManager,
}

impl UserRepository {
    /// Creates a repository on an already bootstrapped pool.
    pub fn new(pool_manager: SqlitePoolManager) -> Self {
        Self { pool_manager }
    }

    /// Inserts the user or refreshes the profile fields of an existing one.
    /// `notifications_enabled` and `created_at` of existing users are preserved.
    #[instrument(skip(self, profile), fields(user_id = profile.id))]
    pub async fn upsert(
        &self,
        profile: &UserProfile,
        now: DateTime<Utc>,
    ) -> Result<UserRecord, StorageError> {
        let now = encode_timestamp(now);
        sqlx::query(
            r#"
            INSERT INTO users (id, username, first_name, last_name, language_code, is_bot, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                username = excluded.username,
                first_name = excluded.first_name,
                last_name = excluded.last_name,
                language_code = excluded.language_code,
                is_bot = excluded.is_bot,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(profile.id)
        .bind(&profile.username)
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(&profile.language_code)
        .bind(profile.is_bot)
        .bind(&now)
        .bind(&now)
        .execute(self.pool_manager.pool())
        .await?;

        self.get(profile.id)
            .await?
            .ok_or_else(|| StorageError::NotFound(format!("user {}", profile.id)))
    }

    /// Returns the user with the given id, or None.
    pub async fn get(&self, user_id: i64) -> Result<Option<UserRecord>, StorageError> {
        let sql = format!("{} WHERE id = ?", SELECT_USER);
        let row: Option<UserRow> = sqlx::query_as(&sql)
            .bind(user_id)
            .fetch_optional(self.pool_manager.pool())
            .await?;
        row.map(UserRecord::try_from).transpose()
    }

    /// Sets the reminder flag; returns false when the user does not exist.
    pub async fn set_notifications(&self, user_id: i64, enabled: bool) -> Result<bool, StorageError> {
        let result = sqlx::query("UPDATE users SET notifications_enabled = ? WHERE id = ?")
            .bind(enabled)
            .bind(user_id)
            .execute(self.pool_manager.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Flips the reminder flag and returns the new value.
    #[instrument(skip(self))]
    pub async fn toggle_notifications(&self, user_id: i64) -> Result<bool, StorageError> {
        let updated: Option<(bool,)> = sqlx::query_as(
            "UPDATE users SET notifications_enabled = NOT notifications_enabled WHERE id = ? RETURNING notifications_enabled",
        )
        .bind(user_id)
        .fetch_optional(self.pool_manager.pool())
        .await?;

        match updated {
            Some((enabled,)) => {
                info!(user_id, enabled, "Toggled reminders");
                Ok(enabled)
            }
            None => Err(StorageError::NotFound(format!("user {}", user_id))),
        }
    }

    /// All users who opted in to daily reminders, by id.
    pub async fn list_with_notifications_enabled(&self) -> Result<Vec<UserRecord>, StorageError> {
        let sql = format!("{} WHERE notifications_enabled = 1 ORDER BY id ASC", SELECT_USER);
        let rows: Vec<UserRow> = sqlx::query_as(&sql)
            .fetch_all(self.pool_manager.pool())
            .await?;
        rows.into_iter().map(UserRecord::try_from).collect()
    }
}
