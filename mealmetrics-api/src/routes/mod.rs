use actix_web::web;

pub mod ai;
pub mod auth;
pub mod meals;

/// Mount every route under its scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/auth")
            .service(auth::register)
            .service(auth::login)
            .service(auth::update_profile),
    )
    .service(
        web::scope("/api/meals")
            .service(meals::summary)
            .service(meals::list)
            .service(meals::create)
            .service(meals::remove),
    )
    .service(
        web::scope("/api/ai")
            .service(ai::analyze)
            .service(ai::chat)
            .service(ai::ingredients),
    );
}
