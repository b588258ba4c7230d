// src/handlers/companies.rs
//
// Superfície do super-admin: provisionamento e aprovação de empresas.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::RequireSuperAdmin,
    models::{auth::User, company::{Company, CompanyOverview}},
};

#[utoipa::path(
    get,
    path = "/api/super-admin/companies",
    responses((status = 200, description = "Empresas com contagens", body = [CompanyOverview])),
    tag = "Companies",
    security(("api_jwt" = []))
)]
pub async fn list_companies(
    State(app_state): State<AppState>,
    RequireSuperAdmin(_admin): RequireSuperAdmin,
) -> Result<impl IntoResponse, AppError> {
    let companies = app_state.company_service.list_companies().await?;
    Ok((StatusCode::OK, Json(companies)))
}

// ---
// Payload: criação de empresa com o seu admin
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCompanyPayload {
    #[validate(length(min = 1, message = "O nome da empresa é obrigatório."))]
    pub company_name: String,

    #[validate(length(min = 1, message = "O nome de usuário do admin é obrigatório."))]
    pub admin_username: String,

    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub admin_password: String,

    pub admin_full_name: Option<String>,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub admin_email: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCompanyResponse {
    pub company: Company,
    pub admin: User,
}

#[utoipa::path(
    post,
    path = "/api/super-admin/companies",
    request_body = CreateCompanyPayload,
    responses(
        (status = 201, description = "Empresa criada com catálogo copiado", body = CreateCompanyResponse),
        (status = 409, description = "Nome de empresa ou de usuário já em uso"),
    ),
    tag = "Companies",
    security(("api_jwt" = []))
)]
pub async fn create_company(
    State(app_state): State<AppState>,
    RequireSuperAdmin(admin): RequireSuperAdmin,
    Json(payload): Json<CreateCompanyPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let (company, company_admin) = app_state
        .company_service
        .create_company_with_admin(
            admin.id,
            &payload.company_name,
            &payload.admin_username,
            &payload.admin_password,
            payload.admin_full_name.as_deref(),
            &payload.admin_email,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateCompanyResponse {
            company,
            admin: company_admin,
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/api/super-admin/companies/{id}/approve",
    params(("id" = Uuid, Path, description = "ID da empresa")),
    responses(
        (status = 200, description = "Empresa aprovada", body = Company),
        (status = 404, description = "Não existe"),
    ),
    tag = "Companies",
    security(("api_jwt" = []))
)]
pub async fn approve_company(
    State(app_state): State<AppState>,
    RequireSuperAdmin(admin): RequireSuperAdmin,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let company = app_state.company_service.approve_company(id, admin.id).await?;
    Ok((StatusCode::OK, Json(company)))
}
