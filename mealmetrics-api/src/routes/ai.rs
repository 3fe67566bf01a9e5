use actix_web::{post, web, HttpResponse};
use log::error;

use mealmetrics_ai::Assistant;
use mealmetrics_model::api::{AnalyzeRequest, ChatReply, ChatRequest, IngredientsRequest};

use crate::error::ApiError;

#[post("/analyze")]
pub async fn analyze(
    assistant: web::Data<dyn Assistant>,
    body: web::Json<AnalyzeRequest>,
) -> Result<HttpResponse, ApiError> {
    let estimate = assistant
        .estimate_meal(&body.meal_name)
        .await
        .map_err(|e| {
            error!("AI analyze error: {}", e);
            ApiError::Assistant("Failed to analyze meal")
        })?;
    Ok(HttpResponse::Ok().json(estimate))
}

#[post("/chat")]
pub async fn chat(
    assistant: web::Data<dyn Assistant>,
    body: web::Json<ChatRequest>,
) -> Result<HttpResponse, ApiError> {
    let reply = assistant
        .chat(&body.message, &body.context)
        .await
        .map_err(|e| {
            error!("AI chat error: {}", e);
            ApiError::Assistant("Failed to chat")
        })?;
    Ok(HttpResponse::Ok().json(ChatReply { reply }))
}

#[post("/ingredients")]
pub async fn ingredients(
    assistant: web::Data<dyn Assistant>,
    body: web::Json<IngredientsRequest>,
) -> Result<HttpResponse, ApiError> {
    let lists = assistant.ingredient_lists(&body.meals).await.map_err(|e| {
        error!("AI ingredients error: {}", e);
        ApiError::Assistant("Failed to get ingredients")
    })?;
    Ok(HttpResponse::Ok().json(lists))
}
