// src/handlers/catalog.rs
//
// CRUD do catálogo da empresa. As leituras valem para qualquer usuário
// autenticado; as escritas exigem admin. O escopo é sempre a empresa de
// quem chama: um super_admin (sem empresa) edita as linhas-modelo globais.

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
    models::catalog::{Accessory, ChassisType, Finish, GlazingType, ProfileSeries},
};

// ---
// Tipos de châssis
// ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChassisTypePayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    pub description: Option<String>,
    #[validate(range(min = 1, message = "Limite mínimo de largura inválido."))]
    pub min_width: i32,
    #[validate(range(min = 1, message = "Limite máximo de largura inválido."))]
    pub max_width: i32,
    #[validate(range(min = 1, message = "Limite mínimo de altura inválido."))]
    pub min_height: i32,
    #[validate(range(min = 1, message = "Limite máximo de altura inválido."))]
    pub max_height: i32,
}

#[utoipa::path(
    get,
    path = "/api/catalog/chassis-types",
    responses((status = 200, body = [ChassisType])),
    tag = "Catalog",
    security(("api_jwt" = []))
)]
pub async fn list_chassis_types(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let rows = app_state
        .catalog_service
        .list_chassis_types(user.company_id)
        .await?;
    Ok((StatusCode::OK, Json(rows)))
}

#[utoipa::path(
    post,
    path = "/api/catalog/chassis-types",
    request_body = ChassisTypePayload,
    responses((status = 201, body = ChassisType), (status = 409, description = "Nome duplicado")),
    tag = "Catalog",
    security(("api_jwt" = []))
)]
pub async fn create_chassis_type(
    State(app_state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(payload): Json<ChassisTypePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let row = app_state
        .catalog_service
        .create_chassis_type(
            admin.company_id,
            &payload.name,
            payload.description.as_deref(),
            payload.min_width,
            payload.max_width,
            payload.min_height,
            payload.max_height,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(row)))
}

#[utoipa::path(
    put,
    path = "/api/catalog/chassis-types/{id}",
    params(("id" = Uuid, Path, description = "ID do tipo de châssis")),
    request_body = ChassisTypePayload,
    responses((status = 200, body = ChassisType), (status = 404, description = "Não existe")),
    tag = "Catalog",
    security(("api_jwt" = []))
)]
pub async fn update_chassis_type(
    State(app_state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<Uuid>,
    Json(payload): Json<ChassisTypePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let row = app_state
        .catalog_service
        .update_chassis_type(
            admin.company_id,
            id,
            &payload.name,
            payload.description.as_deref(),
            payload.min_width,
            payload.max_width,
            payload.min_height,
            payload.max_height,
        )
        .await?;
    Ok((StatusCode::OK, Json(row)))
}

#[utoipa::path(
    delete,
    path = "/api/catalog/chassis-types/{id}",
    params(("id" = Uuid, Path, description = "ID do tipo de châssis")),
    responses((status = 200, description = "Removido"), (status = 404, description = "Não existe")),
    tag = "Catalog",
    security(("api_jwt" = []))
)]
pub async fn delete_chassis_type(
    State(app_state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .catalog_service
        .delete_chassis_type(admin.company_id, id)
        .await?;
    Ok(StatusCode::OK)
}

// ---
// Séries de perfis
// ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSeriesPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    pub description: Option<String>,
    #[validate(range(min = 0.0, message = "O preço não pode ser negativo."))]
    pub price_per_meter: f64,
}

#[utoipa::path(
    get,
    path = "/api/catalog/profile-series",
    responses((status = 200, body = [ProfileSeries])),
    tag = "Catalog",
    security(("api_jwt" = []))
)]
pub async fn list_profile_series(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let rows = app_state
        .catalog_service
        .list_profile_series(user.company_id)
        .await?;
    Ok((StatusCode::OK, Json(rows)))
}

#[utoipa::path(
    post,
    path = "/api/catalog/profile-series",
    request_body = ProfileSeriesPayload,
    responses((status = 201, body = ProfileSeries), (status = 409, description = "Nome duplicado")),
    tag = "Catalog",
    security(("api_jwt" = []))
)]
pub async fn create_profile_series(
    State(app_state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(payload): Json<ProfileSeriesPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let row = app_state
        .catalog_service
        .create_profile_series(
            admin.company_id,
            &payload.name,
            payload.description.as_deref(),
            payload.price_per_meter,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(row)))
}

#[utoipa::path(
    put,
    path = "/api/catalog/profile-series/{id}",
    params(("id" = Uuid, Path, description = "ID da série")),
    request_body = ProfileSeriesPayload,
    responses((status = 200, body = ProfileSeries), (status = 404, description = "Não existe")),
    tag = "Catalog",
    security(("api_jwt" = []))
)]
pub async fn update_profile_series(
    State(app_state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<Uuid>,
    Json(payload): Json<ProfileSeriesPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let row = app_state
        .catalog_service
        .update_profile_series(
            admin.company_id,
            id,
            &payload.name,
            payload.description.as_deref(),
            payload.price_per_meter,
        )
        .await?;
    Ok((StatusCode::OK, Json(row)))
}

#[utoipa::path(
    delete,
    path = "/api/catalog/profile-series/{id}",
    params(("id" = Uuid, Path, description = "ID da série")),
    responses((status = 200, description = "Removida"), (status = 404, description = "Não existe")),
    tag = "Catalog",
    security(("api_jwt" = []))
)]
pub async fn delete_profile_series(
    State(app_state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .catalog_service
        .delete_profile_series(admin.company_id, id)
        .await?;
    Ok(StatusCode::OK)
}

// ---
// Tipos de vidro
// ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GlazingTypePayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    pub description: Option<String>,
    pub thickness_mm: Option<i32>,
    #[validate(range(min = 0.0, message = "O preço não pode ser negativo."))]
    pub price_per_m2: f64,
}

#[utoipa::path(
    get,
    path = "/api/catalog/glazing-types",
    responses((status = 200, body = [GlazingType])),
    tag = "Catalog",
    security(("api_jwt" = []))
)]
pub async fn list_glazing_types(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let rows = app_state
        .catalog_service
        .list_glazing_types(user.company_id)
        .await?;
    Ok((StatusCode::OK, Json(rows)))
}

#[utoipa::path(
    post,
    path = "/api/catalog/glazing-types",
    request_body = GlazingTypePayload,
    responses((status = 201, body = GlazingType), (status = 409, description = "Nome duplicado")),
    tag = "Catalog",
    security(("api_jwt" = []))
)]
pub async fn create_glazing_type(
    State(app_state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(payload): Json<GlazingTypePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let row = app_state
        .catalog_service
        .create_glazing_type(
            admin.company_id,
            &payload.name,
            payload.description.as_deref(),
            payload.thickness_mm,
            payload.price_per_m2,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(row)))
}

#[utoipa::path(
    put,
    path = "/api/catalog/glazing-types/{id}",
    params(("id" = Uuid, Path, description = "ID do tipo de vidro")),
    request_body = GlazingTypePayload,
    responses((status = 200, body = GlazingType), (status = 404, description = "Não existe")),
    tag = "Catalog",
    security(("api_jwt" = []))
)]
pub async fn update_glazing_type(
    State(app_state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<Uuid>,
    Json(payload): Json<GlazingTypePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let row = app_state
        .catalog_service
        .update_glazing_type(
            admin.company_id,
            id,
            &payload.name,
            payload.description.as_deref(),
            payload.thickness_mm,
            payload.price_per_m2,
        )
        .await?;
    Ok((StatusCode::OK, Json(row)))
}

#[utoipa::path(
    delete,
    path = "/api/catalog/glazing-types/{id}",
    params(("id" = Uuid, Path, description = "ID do tipo de vidro")),
    responses((status = 200, description = "Removido"), (status = 404, description = "Não existe")),
    tag = "Catalog",
    security(("api_jwt" = []))
)]
pub async fn delete_glazing_type(
    State(app_state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .catalog_service
        .delete_glazing_type(admin.company_id, id)
        .await?;
    Ok(StatusCode::OK)
}

// ---
// Acabamentos
// ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinishPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    pub description: Option<String>,
    #[validate(range(min = 0.0, message = "O coeficiente não pode ser negativo."))]
    pub price_coefficient: f64,
}

#[utoipa::path(
    get,
    path = "/api/catalog/finishes",
    responses((status = 200, body = [Finish])),
    tag = "Catalog",
    security(("api_jwt" = []))
)]
pub async fn list_finishes(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let rows = app_state.catalog_service.list_finishes(user.company_id).await?;
    Ok((StatusCode::OK, Json(rows)))
}

#[utoipa::path(
    post,
    path = "/api/catalog/finishes",
    request_body = FinishPayload,
    responses((status = 201, body = Finish), (status = 409, description = "Nome duplicado")),
    tag = "Catalog",
    security(("api_jwt" = []))
)]
pub async fn create_finish(
    State(app_state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(payload): Json<FinishPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let row = app_state
        .catalog_service
        .create_finish(
            admin.company_id,
            &payload.name,
            payload.description.as_deref(),
            payload.price_coefficient,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(row)))
}

#[utoipa::path(
    put,
    path = "/api/catalog/finishes/{id}",
    params(("id" = Uuid, Path, description = "ID do acabamento")),
    request_body = FinishPayload,
    responses((status = 200, body = Finish), (status = 404, description = "Não existe")),
    tag = "Catalog",
    security(("api_jwt" = []))
)]
pub async fn update_finish(
    State(app_state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<Uuid>,
    Json(payload): Json<FinishPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let row = app_state
        .catalog_service
        .update_finish(
            admin.company_id,
            id,
            &payload.name,
            payload.description.as_deref(),
            payload.price_coefficient,
        )
        .await?;
    Ok((StatusCode::OK, Json(row)))
}

#[utoipa::path(
    delete,
    path = "/api/catalog/finishes/{id}",
    params(("id" = Uuid, Path, description = "ID do acabamento")),
    responses((status = 200, description = "Removido"), (status = 404, description = "Não existe")),
    tag = "Catalog",
    security(("api_jwt" = []))
)]
pub async fn delete_finish(
    State(app_state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .catalog_service
        .delete_finish(admin.company_id, id)
        .await?;
    Ok(StatusCode::OK)
}

// ---
// Acessórios
// ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccessoryPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    #[validate(range(min = 0.0, message = "O preço não pode ser negativo."))]
    pub unit_price: f64,
    pub incompatible_series: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/catalog/accessories",
    responses((status = 200, body = [Accessory])),
    tag = "Catalog",
    security(("api_jwt" = []))
)]
pub async fn list_accessories(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let rows = app_state
        .catalog_service
        .list_accessories(user.company_id)
        .await?;
    Ok((StatusCode::OK, Json(rows)))
}

#[utoipa::path(
    post,
    path = "/api/catalog/accessories",
    request_body = AccessoryPayload,
    responses((status = 201, body = Accessory), (status = 409, description = "Nome duplicado")),
    tag = "Catalog",
    security(("api_jwt" = []))
)]
pub async fn create_accessory(
    State(app_state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(payload): Json<AccessoryPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let row = app_state
        .catalog_service
        .create_accessory(
            admin.company_id,
            &payload.name,
            payload.unit_price,
            payload.incompatible_series.as_deref(),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(row)))
}

#[utoipa::path(
    put,
    path = "/api/catalog/accessories/{id}",
    params(("id" = Uuid, Path, description = "ID do acessório")),
    request_body = AccessoryPayload,
    responses((status = 200, body = Accessory), (status = 404, description = "Não existe")),
    tag = "Catalog",
    security(("api_jwt" = []))
)]
pub async fn update_accessory(
    State(app_state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<Uuid>,
    Json(payload): Json<AccessoryPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let row = app_state
        .catalog_service
        .update_accessory(
            admin.company_id,
            id,
            &payload.name,
            payload.unit_price,
            payload.incompatible_series.as_deref(),
        )
        .await?;
    Ok((StatusCode::OK, Json(row)))
}

#[utoipa::path(
    delete,
    path = "/api/catalog/accessories/{id}",
    params(("id" = Uuid, Path, description = "ID do acessório")),
    responses((status = 200, description = "Removido"), (status = 404, description = "Não existe")),
    tag = "Catalog",
    security(("api_jwt" = []))
)]
pub async fn delete_accessory(
    State(app_state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .catalog_service
        .delete_accessory(admin.company_id, id)
        .await?;
    Ok(StatusCode::OK)
}

// ---
// Constantes globais do cálculo
// ---
#[utoipa::path(
    get,
    path = "/api/catalog/config",
    responses((status = 200, description = "Mapa chave -> valor numérico")),
    tag = "Catalog",
    security(("api_jwt" = []))
)]
pub async fn get_config(
    State(app_state): State<AppState>,
    AuthenticatedUser(_user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let config = app_state.catalog_service.global_config().await?;
    Ok((StatusCode::OK, Json(config)))
}
