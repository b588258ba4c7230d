// src/handlers/users.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::{AuthenticatedUser, RequireAdmin},
    models::auth::{User, UserRole},
};

// Handler da rota protegida /me
#[utoipa::path(
    get,
    path = "/api/users/me",
    responses((status = 200, description = "Usuário autenticado", body = User)),
    tag = "Users",
    security(("api_jwt" = []))
)]
pub async fn get_me(AuthenticatedUser(user): AuthenticatedUser) -> Json<User> {
    Json(user)
}

#[utoipa::path(
    get,
    path = "/api/users",
    responses((status = 200, description = "Usuários do escopo do admin", body = [User])),
    tag = "Users",
    security(("api_jwt" = []))
)]
pub async fn list_users(
    State(app_state): State<AppState>,
    RequireAdmin(requester): RequireAdmin,
) -> Result<impl IntoResponse, AppError> {
    let users = app_state.auth_service.list_users(&requester).await?;
    Ok((StatusCode::OK, Json(users)))
}

// ---
// Payload: CreateUser
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserPayload {
    #[validate(length(min = 1, message = "O nome de usuário é obrigatório."))]
    pub username: String,

    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,

    pub full_name: Option<String>,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,

    // Se o JSON não mandar, assume 'user'
    #[serde(default = "default_role")]
    pub role: UserRole,
}

fn default_role() -> UserRole {
    UserRole::User
}

#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserPayload,
    responses(
        (status = 201, description = "Usuário criado", body = User),
        (status = 409, description = "Nome de usuário já em uso"),
    ),
    tag = "Users",
    security(("api_jwt" = []))
)]
pub async fn create_user(
    State(app_state): State<AppState>,
    RequireAdmin(requester): RequireAdmin,
    Json(payload): Json<CreateUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let user = app_state
        .auth_service
        .create_user(
            &requester,
            &payload.username,
            &payload.password,
            payload.full_name.as_deref(),
            &payload.email,
            payload.role,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    responses(
        (status = 200, description = "Usuário removido"),
        (status = 403, description = "Fora do escopo do admin"),
    ),
    tag = "Users",
    security(("api_jwt" = []))
)]
pub async fn delete_user(
    State(app_state): State<AppState>,
    RequireAdmin(requester): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.auth_service.delete_user(&requester, id).await?;
    Ok(StatusCode::OK)
}
