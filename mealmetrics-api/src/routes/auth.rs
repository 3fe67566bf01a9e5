use actix_web::{post, put, web, HttpResponse};
use log::{debug, info};
use uuid::Uuid;

use mealmetrics_db::user::UserRepository;
use mealmetrics_model::{
    api::{
        LoginRequest, LoginResponse, ProfileResponse, ProfileUpdate, RegisterRequest,
        TokenResponse, UserView,
    },
    nutrition::calculate_goals,
};

use crate::{error::ApiError, token::TokenService};

const BCRYPT_COST: u32 = 10;

#[post("/register")]
pub async fn register(
    users: web::Data<dyn UserRepository>,
    tokens: web::Data<TokenService>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError> {
    let body = body.into_inner();
    info!("Registering user {}", body.username);

    if users.find_by_username(&body.username).await?.is_some() {
        return Err(ApiError::BadRequest("User already exists".to_owned()));
    }

    let password = body.password.clone();
    let password_hash = web::block(move || bcrypt::hash(password, BCRYPT_COST)).await??;

    // Stored profiles always satisfy the goal calculator.
    let user = body.into_user(Uuid::new_v4().to_string(), password_hash);
    calculate_goals(&user.body_profile()).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    users.insert(&user).await?;

    let token = tokens.issue(&user.id)?;
    Ok(HttpResponse::Ok().json(TokenResponse { token }))
}

#[post("/login")]
pub async fn login(
    users: web::Data<dyn UserRepository>,
    tokens: web::Data<TokenService>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let body = body.into_inner();
    info!("Login attempt: {}", body.username);

    let user = users.find_by_username(&body.username).await?;
    debug!("User found: {}", user.is_some());
    let user = user.ok_or_else(invalid_credentials)?;

    let password_hash = user.password_hash.clone();
    let valid = web::block(move || bcrypt::verify(body.password, &password_hash)).await??;
    debug!("Password valid: {}", valid);
    if !valid {
        return Err(invalid_credentials());
    }

    let goals =
        calculate_goals(&user.body_profile()).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let token = tokens.issue(&user.id)?;

    Ok(HttpResponse::Ok().json(LoginResponse {
        token,
        user: UserView::new(user, goals),
    }))
}

fn invalid_credentials() -> ApiError {
    ApiError::BadRequest("Invalid Credentials".to_owned())
}

#[put("/profile")]
pub async fn update_profile(
    users: web::Data<dyn UserRepository>,
    body: web::Json<ProfileUpdate>,
) -> Result<HttpResponse, ApiError> {
    let body = body.into_inner();

    let mut user = users
        .find_by_id(&body.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_owned()))?;

    // Zero means the field was left empty in the profile form.
    if let Some(age) = body.age.filter(|age| *age != 0) {
        user.age = age;
    }
    if let Some(height) = body.height.filter(|height| *height != 0.0) {
        user.height = height;
    }
    if let Some(weight) = body.weight.filter(|weight| *weight != 0.0) {
        user.weight = weight;
    }
    if let Some(gender) = body.gender {
        user.gender = gender;
    }
    if let Some(activity_level) = body.activity_level {
        user.activity_level = activity_level;
    }

    let goals =
        calculate_goals(&user.body_profile()).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    users.update(&user).await?;

    Ok(HttpResponse::Ok().json(ProfileResponse {
        user: UserView::new(user, goals),
    }))
}
