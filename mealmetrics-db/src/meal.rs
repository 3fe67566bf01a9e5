use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use log::debug;
use sqlx::{sqlite::SqliteRow, Row};

use mealmetrics_model::meal::Meal;

use super::connection::{Connection, StoreError};

#[mockall::automock]
#[async_trait]
pub trait MealRepository: Send + Sync {
    async fn insert(&self, meal: &Meal) -> Result<(), StoreError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Meal>, StoreError>;
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Meal>, StoreError>;
    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}

pub struct MealRepositoryImpl {
    connection: Connection,
}

impl MealRepositoryImpl {
    pub fn new(connection: Connection) -> Self {
        Self { connection }
    }
}

/// Dates are stored as unix seconds, so anything below one second is
/// dropped on insert.
fn meal_from_row(row: &SqliteRow) -> Meal {
    Meal {
        id: row.get("id"),
        user_id: row.get("user_id"),
        name: row.get("name"),
        calories: row.get("calories"),
        protein: row.get("protein"),
        carbs: row.get("carbs"),
        fat: row.get("fat"),
        price: row.get("price"),
        date: Utc
            .timestamp_opt(row.get("date"), 0)
            .single()
            .unwrap_or_default(),
    }
}

#[async_trait]
impl MealRepository for MealRepositoryImpl {
    async fn insert(&self, meal: &Meal) -> Result<(), StoreError> {
        debug!("Inserting meal {} for user {}", meal.name, meal.user_id);
        let mut conn = self.connection.lock().await;
        sqlx::query(
            "INSERT INTO meals (id, user_id, name, calories, protein, carbs, fat, price, date)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&meal.id)
        .bind(&meal.user_id)
        .bind(&meal.name)
        .bind(meal.calories)
        .bind(meal.protein)
        .bind(meal.carbs)
        .bind(meal.fat)
        .bind(meal.price)
        .bind(meal.date.timestamp())
        .execute(&mut *conn)
        .await?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Meal>, StoreError> {
        let mut conn = self.connection.lock().await;
        let meal = sqlx::query("SELECT * FROM meals WHERE id = ?")
            .bind(id)
            .map(|row: SqliteRow| meal_from_row(&row))
            .fetch_optional(&mut *conn)
            .await?;
        Ok(meal)
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Meal>, StoreError> {
        let mut conn = self.connection.lock().await;
        let meals = sqlx::query("SELECT * FROM meals WHERE user_id = ? ORDER BY date DESC")
            .bind(user_id)
            .map(|row: SqliteRow| meal_from_row(&row))
            .fetch_all(&mut *conn)
            .await?;
        Ok(meals)
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        debug!("Deleting meal {}", id);
        let mut conn = self.connection.lock().await;
        sqlx::query("DELETE FROM meals WHERE id = ?")
            .bind(id)
            .execute(&mut *conn)
            .await?;
        Ok(())
    }
}
