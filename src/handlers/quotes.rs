// src/handlers/quotes.rs

use axum::{
    extract::{Path, Query, State},
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
    middleware::auth::AuthenticatedUser,
    models::quote::{PriceBreakdown, Quote, QuoteConfiguration, QuoteStats, QuoteSummary},
    services::quote_service::ClientInfo,
};

// ---
// Handler: calculate (só calcula, não grava nada)
// ---
#[utoipa::path(
    post,
    path = "/api/quotes/calculate",
    request_body = QuoteConfiguration,
    responses(
        (status = 200, description = "Detalhamento de preço", body = PriceBreakdown),
        (status = 400, description = "Configuração inválida (dimensões, châssis)"),
    ),
    tag = "Quotes",
    security(("api_jwt" = []))
)]
pub async fn calculate(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<QuoteConfiguration>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    // O tenant vem SEMPRE do usuário autenticado, nunca do payload.
    let breakdown = app_state
        .quote_service
        .calculate(user.company_id, &payload)
        .await?;

    Ok((StatusCode::OK, Json(breakdown)))
}

// ---
// Payload: fechamento do orçamento
// ---
// A configuração vem achatada no nível do JSON (chassisType, width, ...)
// junto com o detalhamento calculado e os dados do cliente.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinalizeQuotePayload {
    #[serde(flatten)]
    #[validate(nested)]
    pub config: QuoteConfiguration,

    pub breakdown: PriceBreakdown,

    pub client_name: Option<String>,
    pub client_email: Option<String>,
    pub client_phone: Option<String>,
    pub client_notes: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinalizeQuoteResponse {
    pub quote_number: String,
    pub quote_id: Uuid,
}

// ---
// Handler: fechamento (aloca número + grava, atômico)
// ---
#[utoipa::path(
    post,
    path = "/api/quotes",
    request_body = FinalizeQuotePayload,
    responses(
        (status = 201, description = "Orçamento numerado e gravado", body = FinalizeQuoteResponse),
        (status = 503, description = "Disputa de numeração esgotou as tentativas; reenviar"),
    ),
    tag = "Quotes",
    security(("api_jwt" = []))
)]
pub async fn create_quote(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<FinalizeQuotePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let client = ClientInfo {
        name: payload.client_name,
        email: payload.client_email,
        phone: payload.client_phone,
        notes: payload.client_notes,
    };

    let quote = app_state
        .quote_service
        .finalize(user.company_id, &payload.config, &payload.breakdown, &client)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(FinalizeQuoteResponse {
            quote_number: quote.quote_number,
            quote_id: quote.id,
        }),
    ))
}

// ---
// Handler: listagem recente
// ---
#[derive(Debug, Deserialize)]
pub struct RecentParams {
    pub limit: Option<i64>,
}

#[utoipa::path(
    get,
    path = "/api/quotes/recent",
    params(("limit" = Option<i64>, Query, description = "Máximo de linhas (padrão 10)")),
    responses((status = 200, description = "Orçamentos mais recentes", body = [QuoteSummary])),
    tag = "Quotes",
    security(("api_jwt" = []))
)]
pub async fn recent_quotes(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(params): Query<RecentParams>,
) -> Result<impl IntoResponse, AppError> {
    let limit = params.limit.unwrap_or(10).clamp(1, 100);
    let quotes = app_state.quote_service.recent(&user, limit).await?;
    Ok((StatusCode::OK, Json(quotes)))
}

// ---
// Handler: indicadores
// ---
#[utoipa::path(
    get,
    path = "/api/quotes/stats",
    responses((status = 200, description = "Indicadores agregados", body = QuoteStats)),
    tag = "Quotes",
    security(("api_jwt" = []))
)]
pub async fn quote_stats(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let stats = app_state.quote_service.stats(&user).await?;
    Ok((StatusCode::OK, Json(stats)))
}

// ---
// Handler: busca por id (com regra de acesso por empresa)
// ---
#[utoipa::path(
    get,
    path = "/api/quotes/{id}",
    params(("id" = Uuid, Path, description = "ID do orçamento")),
    responses(
        (status = 200, description = "Orçamento completo", body = Quote),
        (status = 403, description = "Orçamento de outra empresa"),
        (status = 404, description = "Não existe"),
    ),
    tag = "Quotes",
    security(("api_jwt" = []))
)]
pub async fn get_quote(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let quote = app_state.quote_service.get_quote(id, &user).await?;
    Ok((StatusCode::OK, Json(quote)))
}

// ---
// Handler: exclusão definitiva
// ---
#[utoipa::path(
    delete,
    path = "/api/quotes/{id}",
    params(("id" = Uuid, Path, description = "ID do orçamento")),
    responses(
        (status = 200, description = "Orçamento removido"),
        (status = 403, description = "Orçamento de outra empresa"),
        (status = 404, description = "Não existe"),
    ),
    tag = "Quotes",
    security(("api_jwt" = []))
)]
pub async fn delete_quote(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.quote_service.delete_quote(id, &user).await?;
    Ok(StatusCode::OK)
}
