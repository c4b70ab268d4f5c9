use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Favorite Movies API",
        version = "1.0.0",
        description = "Track your favorite movies.\n\n**Authentication:** every endpoint except user creation, token generation, password recovery and health requires a Bearer token from `/auth/generate-token`."
    ),
    paths(
        // Users
        crate::api::users::create_user,
        crate::api::users::get_me,
        crate::api::users::update_me,
        crate::api::users::delete_me,

        // Auth
        crate::api::auth::generate_token,
        crate::api::auth::recovery_password,
        crate::api::auth::get_recovery_question,

        // Movies
        crate::api::movies::list_movies,
        crate::api::movies::get_movie,
        crate::api::movies::save_movie,
        crate::api::movies::unsave_movie,

        // Health
        crate::api::health::health_check,
    ),
    components(
        schemas(
            crate::services::auth_service::CreateUserRequest,
            crate::services::auth_service::PublicUser,
            crate::services::auth_service::UpdateProfileRequest,
            crate::services::auth_service::CredentialsRequest,
            crate::services::auth_service::TokenResponse,
            crate::services::auth_service::RecoveryPasswordRequest,
            crate::services::auth_service::RecoveryQuestionResponse,
            crate::models::Movie,
            crate::utils::MessageResponse,
            crate::api::health::HealthResponse,
        )
    ),
    tags(
        (name = "Users", description = "Registration and profile management."),
        (name = "Auth", description = "Token generation and password recovery."),
        (name = "Movies", description = "Movie search, details and the saved-movies list."),
        (name = "Health", description = "Service health."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token from /auth/generate-token"))
                        .build(),
                ),
            );
        }
    }
}
