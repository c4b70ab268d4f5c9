use actix_web::{web, HttpResponse, ResponseError};

use crate::services::auth_service::{self, CreateUserRequest, PublicUser, UpdateProfileRequest};
use crate::services::token_service::Claims;
use crate::state::AppState;
use crate::utils::MessageResponse;

#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = PublicUser),
        (status = 409, description = "Email already registered", body = MessageResponse),
        (status = 422, description = "Invalid input", body = MessageResponse)
    )
)]
pub async fn create_user(
    state: web::Data<AppState>,
    request: web::Json<CreateUserRequest>,
) -> HttpResponse {
    log::info!("📝 POST /users - email: {}", request.email);

    match auth_service::register(&state, &request).await {
        Ok(user) => HttpResponse::Created().json(user),
        Err(e) => {
            log::warn!("❌ Registration failed: {} - {}", request.email, e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/users/me",
    tag = "Users",
    responses(
        (status = 200, description = "Current user", body = PublicUser),
        (status = 401, description = "Unauthenticated", body = MessageResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_me(state: web::Data<AppState>, user: web::ReqData<Claims>) -> HttpResponse {
    log::info!("👤 GET /users/me");

    match auth_service::current_user(&state, &user.user_id).await {
        Ok(public) => HttpResponse::Ok().json(public),
        Err(e) => e.error_response(),
    }
}

#[utoipa::path(
    patch,
    path = "/users/me",
    tag = "Users",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = PublicUser),
        (status = 401, description = "Unauthenticated", body = MessageResponse),
        (status = 422, description = "Invalid input", body = MessageResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_me(
    state: web::Data<AppState>,
    user: web::ReqData<Claims>,
    request: web::Json<UpdateProfileRequest>,
) -> HttpResponse {
    log::info!("✏️ PATCH /users/me - user: {}", user.user_id);

    match auth_service::update_profile(&state, &user.user_id, &request).await {
        Ok(public) => HttpResponse::Ok().json(public),
        Err(e) => {
            log::warn!("❌ Profile update failed: {} - {}", user.user_id, e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    delete,
    path = "/users/me",
    tag = "Users",
    responses(
        (status = 200, description = "Account deleted", body = MessageResponse),
        (status = 401, description = "Unauthenticated", body = MessageResponse),
        (status = 404, description = "User not found", body = MessageResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_me(state: web::Data<AppState>, user: web::ReqData<Claims>) -> HttpResponse {
    log::info!("🗑️ DELETE /users/me - user: {}", user.user_id);

    match auth_service::delete_account(&state, &user.user_id).await {
        Ok(()) => {
            log::info!("✅ Account deleted successfully: {}", user.user_id);
            HttpResponse::Ok().json(MessageResponse::new("Account deleted"))
        }
        Err(e) => {
            log::error!("❌ Failed to delete account {}: {}", user.user_id, e);
            e.error_response()
        }
    }
}
