use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::error::StartupError;
use crate::models::UserProfile;

/// Columns added to `users` over time. Each is applied with
/// `ALTER TABLE ... ADD COLUMN`; already-present columns are skipped.
const USER_COLUMNS: &[(&str, &str)] = &[
    ("username", "TEXT"),
    ("first_name", "TEXT"),
    ("last_name", "TEXT"),
    ("weekly_km", "TEXT"),
    ("trainings_per_week", "INTEGER"),
    ("age_group", "TEXT"),
    ("best_time_5k", "TEXT"),
    ("best_time_10k", "TEXT"),
    ("best_time_21k", "TEXT"),
    ("best_time_42k", "TEXT"),
    ("plan_duration", "INTEGER"),
    ("delivery_option", "TEXT"),
    ("vdot", "REAL"),
    ("vdot_adjustment", "REAL"),
    ("subscribed_at", "TIMESTAMP"),
    ("birthdate", "DATE"),
    ("created_at", "TIMESTAMP"),
];

#[derive(Clone, Debug)]
pub struct Database {
    pub pool: SqlitePool,
}

impl Database {
    pub async fn new(database_url: &str) -> Result<Self, StartupError> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(300))
            .test_before_acquire(true)
            .connect_with(options)
            .await?;

        Ok(Database { pool })
    }

    /// Single-connection in-memory database. Every connection to
    /// `sqlite::memory:` is its own database, so the pool must never open a
    /// second one.
    #[cfg(test)]
    pub async fn in_memory() -> Self {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory sqlite");
        let db = Database { pool };
        db.init().await.expect("schema");
        db
    }

    pub async fn init(&self) -> Result<(), StartupError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                chat_id INTEGER NOT NULL UNIQUE
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        for &(column, definition) in USER_COLUMNS {
            let result = sqlx::query(&format!("ALTER TABLE users ADD COLUMN {column} {definition}"))
                .execute(&self.pool)
                .await;

            match result {
                Ok(_) => log::debug!("Added column users.{}", column),
                Err(e) if is_duplicate_column(&e) => {}
                Err(source) => return Err(StartupError::Migration { column, source }),
            }
        }

        Ok(())
    }

    pub async fn upsert_profile(&self, profile: &UserProfile) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO users (
                chat_id, username, first_name, last_name,
                weekly_km, trainings_per_week, age_group,
                best_time_5k, best_time_10k, best_time_21k, best_time_42k,
                plan_duration, delivery_option,
                vdot, vdot_adjustment, subscribed_at, birthdate, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (chat_id)
            DO UPDATE SET
                username = excluded.username,
                first_name = excluded.first_name,
                last_name = excluded.last_name,
                weekly_km = excluded.weekly_km,
                trainings_per_week = excluded.trainings_per_week,
                age_group = excluded.age_group,
                best_time_5k = excluded.best_time_5k,
                best_time_10k = excluded.best_time_10k,
                best_time_21k = excluded.best_time_21k,
                best_time_42k = excluded.best_time_42k,
                plan_duration = excluded.plan_duration,
                delivery_option = excluded.delivery_option,
                vdot = excluded.vdot,
                vdot_adjustment = excluded.vdot_adjustment,
                subscribed_at = excluded.subscribed_at,
                birthdate = excluded.birthdate,
                created_at = excluded.created_at
            "#,
        )
        .bind(profile.chat_id)
        .bind(&profile.username)
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(&profile.weekly_km)
        .bind(profile.trainings_per_week)
        .bind(&profile.age_group)
        .bind(&profile.best_time_5k)
        .bind(&profile.best_time_10k)
        .bind(&profile.best_time_21k)
        .bind(&profile.best_time_42k)
        .bind(profile.plan_duration)
        .bind(&profile.delivery_option)
        .bind(profile.vdot)
        .bind(profile.vdot_adjustment)
        .bind(profile.subscribed_at)
        .bind(profile.birthdate)
        .bind(profile.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn fetch_profile(&self, chat_id: i64) -> Result<Option<UserProfile>, sqlx::Error> {
        sqlx::query_as::<_, UserProfile>(
            r#"
            SELECT chat_id, username, first_name, last_name,
                   weekly_km, trainings_per_week, age_group,
                   best_time_5k, best_time_10k, best_time_21k, best_time_42k,
                   plan_duration, delivery_option,
                   COALESCE(vdot, 40.0) AS vdot,
                   COALESCE(vdot_adjustment, 0.0) AS vdot_adjustment,
                   subscribed_at, birthdate,
                   COALESCE(created_at, CURRENT_TIMESTAMP) AS created_at
            FROM users WHERE chat_id = ?
            "#,
        )
        .bind(chat_id)
        .fetch_optional(&self.pool)
        .await
    }
}

fn is_duplicate_column(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.message().contains("duplicate column name"),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn profile(chat_id: i64) -> UserProfile {
        UserProfile {
            chat_id,
            username: Some("fastfeet".to_string()),
            first_name: Some("Ann".to_string()),
            last_name: None,
            weekly_km: Some("30-70 km".to_string()),
            trainings_per_week: Some(4),
            age_group: Some("18-40".to_string()),
            best_time_5k: Some("25:30".to_string()),
            best_time_10k: Some("52:15".to_string()),
            best_time_21k: Some("I don't know".to_string()),
            best_time_42k: Some("3:45:30".to_string()),
            plan_duration: Some(3),
            delivery_option: Some("Download plan".to_string()),
            vdot: 40.0,
            vdot_adjustment: 0.0,
            subscribed_at: None,
            birthdate: None,
            created_at: Utc::now(),
        }
    }

    async fn row_count(db: &Database) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&db.pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn init_is_repeatable() {
        let db = Database::in_memory().await;
        db.init().await.unwrap();
        db.init().await.unwrap();
    }

    #[tokio::test]
    async fn init_upgrades_an_older_table() {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::query(
            "CREATE TABLE users (id INTEGER PRIMARY KEY AUTOINCREMENT, chat_id INTEGER UNIQUE, \
             username TEXT, weekly_km TEXT, created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP)",
        )
        .execute(&pool)
        .await
        .unwrap();
        sqlx::query("INSERT INTO users (chat_id, username, weekly_km) VALUES (3, 'old', 'up to 30 km')")
            .execute(&pool)
            .await
            .unwrap();

        let db = Database { pool };
        db.init().await.unwrap();

        let stored = db.fetch_profile(3).await.unwrap().unwrap();
        assert_eq!(stored.username.as_deref(), Some("old"));
        assert_eq!(stored.vdot, 40.0);
        assert_eq!(stored.vdot_adjustment, 0.0);
        assert!(stored.best_time_5k.is_none());
        assert!(stored.birthdate.is_none());
    }

    #[tokio::test]
    async fn upsert_replaces_instead_of_appending() {
        let db = Database::in_memory().await;
        let original = profile(11);

        db.upsert_profile(&original).await.unwrap();
        db.upsert_profile(&original).await.unwrap();
        assert_eq!(row_count(&db).await, 1);
        assert_eq!(db.fetch_profile(11).await.unwrap(), Some(original.clone()));

        let changed = UserProfile {
            weekly_km: Some("more than 70 km".to_string()),
            ..original
        };
        db.upsert_profile(&changed).await.unwrap();
        assert_eq!(row_count(&db).await, 1);
        assert_eq!(db.fetch_profile(11).await.unwrap(), Some(changed));
    }

    #[tokio::test]
    async fn birthdate_is_stored_when_set() {
        let db = Database::in_memory().await;
        let with_birthdate = UserProfile {
            birthdate: NaiveDate::from_ymd_opt(1988, 11, 3),
            ..profile(12)
        };
        db.upsert_profile(&with_birthdate).await.unwrap();

        let stored = db.fetch_profile(12).await.unwrap().unwrap();
        assert_eq!(stored.birthdate, NaiveDate::from_ymd_opt(1988, 11, 3));
    }

    #[tokio::test]
    async fn missing_profile_is_none() {
        let db = Database::in_memory().await;
        assert_eq!(db.fetch_profile(404).await.unwrap(), None);
    }
}
