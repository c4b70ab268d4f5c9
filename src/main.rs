mod api;
mod config;
mod database;
mod middleware;
mod models;
mod provider;
mod services;
mod state;
mod utils;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Settings;
use crate::provider::OmdbProvider;
use crate::services::auth_service::PasswordHasher;
use crate::services::token_service::TokenIssuer;
use crate::state::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let settings = Settings::from_env().expect("Invalid configuration");

    log::info!("🚀 Starting Favorite Movies API...");

    let db = database::MongoDB::new(&settings.database_url)
        .await
        .expect("Failed to connect to MongoDB");
    log::info!("✅ MongoDB connected successfully");

    let provider = OmdbProvider::new(
        &settings.omdb_base_url,
        &settings.omdb_api_key,
        settings.provider_timeout,
    )
    .expect("Failed to build movie provider client");
    log::info!("🎬 Movie provider: {}", settings.omdb_base_url);

    let state = web::Data::new(AppState {
        store: Arc::new(db),
        provider: Arc::new(provider),
        tokens: TokenIssuer::new(&settings.jwt_secret),
        hasher: PasswordHasher::new(settings.bcrypt_cost),
    });

    let host = settings.host.clone();
    let port = settings.port;
    log::info!("🌐 Server starting on {}:{}", host, port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", host, port);

    let allowed_origins = settings.allowed_origins.clone();

    HttpServer::new(move || {
        let cors = allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "POST", "PATCH", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .max_age(3600);

        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(state.clone())
            .wrap(cors)
            .wrap(middleware::SecurityHeaders)
            .wrap(Logger::default())
            .service(SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi))
            .configure(api::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
