use async_trait::async_trait;
use log::debug;
use sqlx::{sqlite::SqliteRow, Row};

use mealmetrics_model::user::{ActivityLevel, Sex, User};

use super::connection::{Connection, StoreError};

#[mockall::automock]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(&self, user: &User) -> Result<(), StoreError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, StoreError>;
    async fn update(&self, user: &User) -> Result<(), StoreError>;
}

pub struct UserRepositoryImpl {
    connection: Connection,
}

impl UserRepositoryImpl {
    pub fn new(connection: Connection) -> Self {
        Self { connection }
    }
}

/// Stored enum values outside the known set are read leniently, the same
/// way the API parses them.
fn user_from_row(row: &SqliteRow) -> User {
    User {
        id: row.get("id"),
        username: row.get("username"),
        password_hash: row.get("password_hash"),
        budget_limit: row.get("budget_limit"),
        age: row.get("age"),
        height: row.get("height"),
        weight: row.get("weight"),
        gender: row.get::<String, _>("gender").parse().unwrap_or(Sex::Male),
        activity_level: ActivityLevel::from(row.get::<String, _>("activity_level")),
    }
}

#[async_trait]
impl UserRepository for UserRepositoryImpl {
    async fn insert(&self, user: &User) -> Result<(), StoreError> {
        debug!("Inserting user {}", user.username);
        let mut conn = self.connection.lock().await;
        sqlx::query(
            "INSERT INTO users (id, username, password_hash, budget_limit, age, height, weight, gender, activity_level)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&user.id)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.budget_limit)
        .bind(user.age)
        .bind(user.height)
        .bind(user.weight)
        .bind(user.gender.to_string())
        .bind(user.activity_level.to_string())
        .execute(&mut *conn)
        .await?;
        Ok(())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let mut conn = self.connection.lock().await;
        let user = sqlx::query("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .map(|row: SqliteRow| user_from_row(&row))
            .fetch_optional(&mut *conn)
            .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, StoreError> {
        let mut conn = self.connection.lock().await;
        let user = sqlx::query("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .map(|row: SqliteRow| user_from_row(&row))
            .fetch_optional(&mut *conn)
            .await?;
        Ok(user)
    }

    async fn update(&self, user: &User) -> Result<(), StoreError> {
        debug!("Updating user {}", user.username);
        let mut conn = self.connection.lock().await;
        sqlx::query(
            "UPDATE users
             SET username = ?, password_hash = ?, budget_limit = ?, age = ?, height = ?, weight = ?, gender = ?, activity_level = ?
             WHERE id = ?",
        )
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.budget_limit)
        .bind(user.age)
        .bind(user.height)
        .bind(user.weight)
        .bind(user.gender.to_string())
        .bind(user.activity_level.to_string())
        .bind(&user.id)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }
}
