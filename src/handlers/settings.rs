// src/handlers/settings.rs

use std::collections::BTreeMap;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::{AuthenticatedUser, RequireAdmin},
    models::settings::Setting,
};

#[derive(Debug, Deserialize)]
pub struct SettingsParams {
    pub section: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/settings",
    params(("section" = Option<String>, Query, description = "Filtra por seção")),
    responses((status = 200, description = "Configurações da empresa", body = [Setting])),
    tag = "Settings",
    security(("api_jwt" = []))
)]
pub async fn get_settings(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(params): Query<SettingsParams>,
) -> Result<impl IntoResponse, AppError> {
    let settings = app_state
        .settings_service
        .get_settings(user.company_id, params.section.as_deref())
        .await?;
    Ok((StatusCode::OK, Json(settings)))
}

// ---
// Payload: bloco de chaves de uma seção
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateSettingsPayload {
    #[validate(length(min = 1, message = "A seção é obrigatória."))]
    pub section: String,

    // { chave: valor } (valor null limpa a chave)
    #[serde(default)]
    pub settings: BTreeMap<String, Option<String>>,
}

#[utoipa::path(
    post,
    path = "/api/settings",
    request_body = UpdateSettingsPayload,
    responses((status = 200, description = "Configurações gravadas")),
    tag = "Settings",
    security(("api_jwt" = []))
)]
pub async fn update_settings(
    State(app_state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(payload): Json<UpdateSettingsPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    app_state
        .settings_service
        .update_settings(admin.company_id, &payload.section, &payload.settings)
        .await?;

    Ok(StatusCode::OK)
}
