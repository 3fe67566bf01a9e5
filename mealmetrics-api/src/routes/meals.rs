use actix_web::{delete, get, post, web, HttpResponse};
use chrono::Utc;
use uuid::Uuid;

use mealmetrics_db::{meal::MealRepository, user::UserRepository};
use mealmetrics_model::api::{MessageResponse, NewMeal};

use crate::{error::ApiError, token::AuthUser};

#[get("")]
pub async fn list(
    caller: AuthUser,
    meals: web::Data<dyn MealRepository>,
) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(meals.list_by_user(&caller.id).await?))
}

#[post("")]
pub async fn create(
    caller: AuthUser,
    meals: web::Data<dyn MealRepository>,
    body: web::Json<NewMeal>,
) -> Result<HttpResponse, ApiError> {
    let meal = body
        .into_inner()
        .into_meal(Uuid::new_v4().to_string(), caller.id);
    meals.insert(&meal).await?;
    Ok(HttpResponse::Ok().json(meal))
}

#[delete("/{id}")]
pub async fn remove(
    caller: AuthUser,
    meals: web::Data<dyn MealRepository>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let meal = meals
        .find_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Meal not found".to_owned()))?;
    if meal.user_id != caller.id {
        return Err(ApiError::Unauthorized("Not authorized".to_owned()));
    }

    meals.delete(&id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse {
        msg: "Meal removed".to_owned(),
    }))
}

#[get("/summary")]
pub async fn summary(
    caller: AuthUser,
    users: web::Data<dyn UserRepository>,
    meals: web::Data<dyn MealRepository>,
) -> Result<HttpResponse, ApiError> {
    let user = users
        .find_by_id(&caller.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_owned()))?;
    let meals = meals.list_by_user(&caller.id).await?;

    Ok(HttpResponse::Ok().json(crate::summary::build(&user, &meals, Utc::now())))
}
