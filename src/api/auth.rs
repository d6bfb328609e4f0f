//! Authentication endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::user::{LoginRequest, RegisterUser, User},
};

use super::AuthenticatedUser;

/// Token response envelope
#[derive(Serialize, ToSchema)]
pub struct TokenEnvelope {
    pub success: bool,
    pub token: String,
}

/// Current-user response envelope
#[derive(Serialize, ToSchema)]
pub struct UserEnvelope {
    pub success: bool,
    pub data: User,
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = RegisterUser,
    responses(
        (status = 201, description = "User registered, token issued", body = TokenEnvelope),
        (status = 400, description = "Validation failure or email already taken")
    )
)]
pub async fn register(
    State(state): State<crate::AppState>,
    Json(payload): Json<RegisterUser>,
) -> AppResult<(StatusCode, Json<TokenEnvelope>)> {
    let token = state.services.auth.register(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(TokenEnvelope {
            success: true,
            token,
        }),
    ))
}

/// Login with email and password
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated, token issued", body = TokenEnvelope),
        (status = 400, description = "Missing email or password"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<crate::AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<TokenEnvelope>> {
    let token = state.services.auth.login(payload).await?;
    Ok(Json(TokenEnvelope {
        success: true,
        token,
    }))
}

/// Get the currently authenticated user
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = UserEnvelope),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn me(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<UserEnvelope>> {
    let user = state.services.auth.me(claims.user_id()?).await?;
    Ok(Json(UserEnvelope {
        success: true,
        data: user,
    }))
}
