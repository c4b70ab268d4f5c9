pub mod auth;
pub mod health;
pub mod movies;
pub mod swagger;
pub mod users;

use actix_web::web;

use crate::middleware::AuthMiddleware;
use crate::utils::AppError;

/// Turns extractor failures (bad JSON, missing query or path values) into
/// the usual `{message}` body.
fn rejected(err: impl std::fmt::Display) -> actix_web::Error {
    log::warn!("❌ Rejected request: {}", err);
    AppError::Validation(err.to_string()).into()
}

/// All routes. Only user creation, token generation, password recovery and
/// the health check are reachable without a bearer token.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| rejected(err)))
        .app_data(web::QueryConfig::default().error_handler(|err, _req| rejected(err)))
        .app_data(web::PathConfig::default().error_handler(|err, _req| rejected(err)))
        .route("/health", web::get().to(health::health_check))
        // Auth endpoints
        .service(
            web::scope("/auth")
                .route("/generate-token", web::post().to(auth::generate_token))
                .route("/recovery-password", web::post().to(auth::recovery_password))
                .route("/get-recovery-question", web::get().to(auth::get_recovery_question)),
        )
        // Users: public registration, protected profile
        .service(
            web::scope("/users")
                .route("", web::post().to(users::create_user))
                .service(
                    web::resource("/me")
                        .wrap(AuthMiddleware)
                        .route(web::get().to(users::get_me))
                        .route(web::patch().to(users::update_me))
                        .route(web::delete().to(users::delete_me)),
                ),
        )
        // Movies: all endpoints require JWT
        .service(
            web::scope("/movies")
                .wrap(AuthMiddleware)
                .route("", web::get().to(movies::list_movies))
                .route("/{external_id}", web::get().to(movies::get_movie))
                .service(
                    web::resource("/{external_id}/save")
                        .route(web::post().to(movies::save_movie))
                        .route(web::delete().to(movies::unsave_movie)),
                ),
        );
}
