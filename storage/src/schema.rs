//! Schema bootstrap. Tables are created at startup if absent; columns added after the first
//! release are patched in by small idempotent migrations.

use sqlx::SqlitePool;
use tracing::info;

pub(crate) async fn bootstrap(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    info!("Creating database tables if not exist");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY,
            username TEXT,
            first_name TEXT,
            last_name TEXT,
            language_code TEXT,
            is_bot INTEGER NOT NULL DEFAULT 0,
            notifications_enabled INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS expenses (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            amount_minor INTEGER NOT NULL CHECK (amount_minor > 0),
            category TEXT NOT NULL CHECK (length(category) > 0),
            description TEXT,
            spent_at TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_expenses_user_spent ON expenses(user_id, spent_at)")
        .execute(pool)
        .await?;

    ensure_notifications_flag(pool).await?;

    info!("Database tables ready");
    Ok(())
}

/// Adds `users.notifications_enabled` to databases created before reminders existed.
async fn ensure_notifications_flag(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let (present,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM pragma_table_info('users') WHERE name = 'notifications_enabled'",
    )
    .fetch_one(pool)
    .await?;

    if present == 0 {
        info!("Migrating users table: adding notifications_enabled");
        sqlx::query(
            "ALTER TABLE users ADD COLUMN notifications_enabled INTEGER NOT NULL DEFAULT 1",
        )
        .execute(pool)
        .await?;
    }
    Ok(())
}
