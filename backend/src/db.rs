use anyhow::Result;
use sqlx::sqlite::SqliteRow;
use sqlx::{migrate::MigrateDatabase, Row, Sqlite, SqlitePool};
use std::sync::Arc;

use shared::{NormalizedInterval, User};

// The database URL for the production database
const DATABASE_URL: &str = "sqlite:slotcal.db";

/// DbConnection manages database operations
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Create a new database connection
    pub async fn new(url: &str) -> Result<Self> {
        // Create database if it doesn't exist
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            Sqlite::create_database(url).await?
        }

        // Connect to the database
        let pool = SqlitePool::connect(url).await?;

        // Setup database schema
        Self::setup_schema(&pool).await?;

        Ok(Self { pool: Arc::new(pool) })
    }

    /// Initialize the standard database
    pub async fn init() -> Result<Self> {
        Self::new(DATABASE_URL).await
    }

    /// Initialize a test database with a unique name
    #[cfg(test)]
    pub async fn init_test() -> Result<Self> {
        // Generate a unique database name for tests
        let test_id = uuid::Uuid::new_v4().to_string();
        let db_url = format!("file:memdb_{}?mode=memory&cache=shared", test_id);

        Self::new(&db_url).await
    }

    /// Set up the required database schema
    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                username TEXT NOT NULL UNIQUE,
                name TEXT NOT NULL,
                bio TEXT,
                avatar_url TEXT,
                calendar_connected INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS time_intervals (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL REFERENCES users(id),
                weekday INTEGER NOT NULL,
                start_time_in_minutes INTEGER NOT NULL,
                end_time_in_minutes INTEGER NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        // Single-row table holding the signed-in user for this instance
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS active_session (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                user_id TEXT REFERENCES users(id)
            );
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Get the underlying SQLite pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Store a new user
    pub async fn insert_user(&self, user: &User) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, name, bio, avatar_url, calendar_connected, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.id)
        .bind(&user.username)
        .bind(&user.name)
        .bind(&user.bio)
        .bind(&user.avatar_url)
        .bind(user.calendar_connected)
        .bind(&user.created_at)
        .execute(&*self.pool)
        .await?;
        Ok(())
    }

    /// Get a user by ID
    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, username, name, bio, avatar_url, calendar_connected, created_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(user_id)
        .fetch_optional(&*self.pool)
        .await?;

        Ok(row.map(user_from_row))
    }

    /// Get a user by their unique username
    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, username, name, bio, avatar_url, calendar_connected, created_at
            FROM users
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(&*self.pool)
        .await?;

        Ok(row.map(user_from_row))
    }

    /// Update a user's bio
    pub async fn update_user_bio(&self, user_id: &str, bio: &str) -> Result<()> {
        sqlx::query("UPDATE users SET bio = ? WHERE id = ?")
            .bind(bio)
            .bind(user_id)
            .execute(&*self.pool)
            .await?;
        Ok(())
    }

    /// Record that the user's calendar provider connection succeeded
    pub async fn mark_calendar_connected(&self, user_id: &str) -> Result<()> {
        sqlx::query("UPDATE users SET calendar_connected = 1 WHERE id = ?")
            .bind(user_id)
            .execute(&*self.pool)
            .await?;
        Ok(())
    }

    /// Get the signed-in user's ID, if any
    pub async fn active_user_id(&self) -> Result<Option<String>> {
        let row = sqlx::query("SELECT user_id FROM active_session WHERE id = 1")
            .fetch_optional(&*self.pool)
            .await?;

        Ok(row.and_then(|r| r.get("user_id")))
    }

    /// Make the given user the signed-in user
    pub async fn set_active_user(&self, user_id: &str) -> Result<()> {
        sqlx::query("INSERT OR REPLACE INTO active_session (id, user_id) VALUES (1, ?)")
            .bind(user_id)
            .execute(&*self.pool)
            .await?;
        Ok(())
    }

    /// Replace the user's stored availability with a new set of intervals.
    /// Resubmitting the form overwrites the previous week wholesale.
    pub async fn replace_time_intervals(
        &self,
        user_id: &str,
        intervals: &[NormalizedInterval],
    ) -> Result<usize> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM time_intervals WHERE user_id = ?")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        for interval in intervals {
            sqlx::query(
                r#"
                INSERT INTO time_intervals (id, user_id, weekday, start_time_in_minutes, end_time_in_minutes)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(uuid::Uuid::new_v4().to_string())
            .bind(user_id)
            .bind(interval.weekday)
            .bind(interval.start_time_in_minutes)
            .bind(interval.end_time_in_minutes)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(intervals.len())
    }

    /// List the user's stored intervals, weekday ascending
    pub async fn time_intervals_for_user(&self, user_id: &str) -> Result<Vec<NormalizedInterval>> {
        let rows = sqlx::query(
            r#"
            SELECT weekday, start_time_in_minutes, end_time_in_minutes
            FROM time_intervals
            WHERE user_id = ?
            ORDER BY weekday ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&*self.pool)
        .await?;

        let intervals = rows
            .iter()
            .map(|row| NormalizedInterval {
                weekday: row.get::<i64, _>("weekday") as u8,
                start_time_in_minutes: row.get::<i64, _>("start_time_in_minutes") as u16,
                end_time_in_minutes: row.get::<i64, _>("end_time_in_minutes") as u16,
            })
            .collect();

        Ok(intervals)
    }
}

fn user_from_row(row: SqliteRow) -> User {
    User {
        id: row.get("id"),
        username: row.get("username"),
        name: row.get("name"),
        bio: row.get("bio"),
        avatar_url: row.get("avatar_url"),
        calendar_connected: row.get("calendar_connected"),
        created_at: row.get("created_at"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Setup a new test database for each test
    async fn setup_test() -> DbConnection {
        DbConnection::init_test().await.expect("Failed to create test database")
    }

    fn test_user(username: &str) -> User {
        User {
            id: uuid::Uuid::new_v4().to_string(),
            username: username.to_string(),
            name: "Test User".to_string(),
            bio: None,
            avatar_url: None,
            calendar_connected: false,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_get_user() {
        let db = setup_test().await;
        let user = test_user("janedoe");

        db.insert_user(&user).await.expect("Failed to insert user");

        let by_id = db.get_user(&user.id).await.expect("Failed to get user");
        assert_eq!(by_id, Some(user.clone()));

        let by_username = db
            .get_user_by_username("janedoe")
            .await
            .expect("Failed to get user by username");
        assert_eq!(by_username, Some(user));
    }

    #[tokio::test]
    async fn test_duplicate_username_is_rejected() {
        let db = setup_test().await;

        db.insert_user(&test_user("janedoe")).await.expect("Failed to insert user");

        let result = db.insert_user(&test_user("janedoe")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_active_session_round_trip() {
        let db = setup_test().await;
        let user = test_user("janedoe");
        db.insert_user(&user).await.expect("Failed to insert user");

        assert_eq!(db.active_user_id().await.unwrap(), None);

        db.set_active_user(&user.id).await.expect("Failed to set active user");
        assert_eq!(db.active_user_id().await.unwrap(), Some(user.id));
    }

    #[tokio::test]
    async fn test_replace_time_intervals_overwrites() {
        let db = setup_test().await;
        let user = test_user("janedoe");
        db.insert_user(&user).await.expect("Failed to insert user");

        let first = vec![NormalizedInterval {
            weekday: 1,
            start_time_in_minutes: 480,
            end_time_in_minutes: 1080,
        }];
        db.replace_time_intervals(&user.id, &first)
            .await
            .expect("Failed to store intervals");

        let second = vec![
            NormalizedInterval {
                weekday: 5,
                start_time_in_minutes: 540,
                end_time_in_minutes: 720,
            },
            NormalizedInterval {
                weekday: 2,
                start_time_in_minutes: 600,
                end_time_in_minutes: 700,
            },
        ];
        let count = db
            .replace_time_intervals(&user.id, &second)
            .await
            .expect("Failed to replace intervals");
        assert_eq!(count, 2);

        // The first submission is gone and rows come back weekday ascending
        let stored = db
            .time_intervals_for_user(&user.id)
            .await
            .expect("Failed to list intervals");
        let weekdays: Vec<u8> = stored.iter().map(|i| i.weekday).collect();
        assert_eq!(weekdays, vec![2, 5]);
    }
}
