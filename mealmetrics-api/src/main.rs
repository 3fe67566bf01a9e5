use std::{env, sync::Arc};

use actix_cors::Cors;
use actix_web::{http::header, web, App, HttpServer};
use log::info;

use mealmetrics_ai::Assistant;
use mealmetrics_api::{routes, token::TokenService};
use mealmetrics_db::{
    connection::Connection,
    meal::{MealRepository, MealRepositoryImpl},
    user::{UserRepository, UserRepositoryImpl},
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    log4rs::init_file("log4rs.yml", Default::default()).unwrap();
    dotenv::dotenv().ok();

    info!("Connecting to database");
    let conn = Connection::establish().await.unwrap();
    let users: web::Data<dyn UserRepository> =
        web::Data::from(Arc::new(UserRepositoryImpl::new(conn.clone())) as Arc<dyn UserRepository>);
    let meals: web::Data<dyn MealRepository> =
        web::Data::from(Arc::new(MealRepositoryImpl::new(conn)) as Arc<dyn MealRepository>);

    info!("Setting up meal assistant");
    let api_key = env::var("GEMINI_API_KEY").unwrap_or_default();
    let assistant: web::Data<dyn Assistant> =
        web::Data::from(Arc::new(mealmetrics_ai::create(api_key)) as Arc<dyn Assistant>);

    let tokens = web::Data::new(TokenService::from_env());

    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(5000);
    let cors_origin =
        env::var("CORS_ORIGIN").unwrap_or_else(|_| "http://localhost:5173".to_owned());

    info!("Starting server on port {}", port);
    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&cors_origin)
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
            .allowed_headers(vec![
                header::CONTENT_TYPE,
                header::HeaderName::from_static("x-auth-token"),
            ])
            .supports_credentials();

        App::new()
            .wrap(cors)
            .app_data(users.clone())
            .app_data(meals.clone())
            .app_data(assistant.clone())
            .app_data(tokens.clone())
            .configure(routes::configure)
    })
    .bind(("127.0.0.1", port))?
    .run()
    .await
}
