// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::services::pricing::PricingError;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Erros do motor de preço (dimensões, châssis). São sempre 400:
    // entrada ruim, nenhum estado parcial criado.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Conta desativada")]
    AccountInactive,

    #[error("Empresa ainda não aprovada")]
    CompanyNotApproved,

    // Tentativa de acesso a um recurso de outra empresa.
    // Nega sem devolver o recurso.
    #[error("Acesso negado")]
    AccessDenied,

    #[error("{0}")]
    NotFound(String),

    // Violação de unicidade (company_id, name) no catálogo
    #[error("Já existe um registro com o nome '{0}'.")]
    NameAlreadyExists(String),

    #[error("Este nome de usuário já está em uso.")]
    UsernameAlreadyExists,

    #[error("Já existe uma empresa com este nome.")]
    CompanyNameAlreadyExists,

    // A disputa pelo número de orçamento esgotou as tentativas.
    // Transiente: o cliente pode simplesmente reenviar.
    #[error("Não foi possível alocar um número de orçamento. Tente novamente.")]
    AllocationConflict,

    // Variante para erros de banco de dados (sqlx)
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }

            AppError::Pricing(ref e) => (StatusCode::BAD_REQUEST, e.to_string()),

            AppError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, self.to_string())
            }
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, self.to_string()),
            AppError::AccountInactive | AppError::CompanyNotApproved | AppError::AccessDenied => {
                (StatusCode::FORBIDDEN, self.to_string())
            }
            AppError::UserNotFound | AppError::NotFound(_) => {
                (StatusCode::NOT_FOUND, self.to_string())
            }
            AppError::NameAlreadyExists(_)
            | AppError::UsernameAlreadyExists
            | AppError::CompanyNameAlreadyExists => (StatusCode::CONFLICT, self.to_string()),

            // 503: o cliente deve tentar de novo; nenhum orçamento foi gravado.
            AppError::AllocationConflict => {
                (StatusCode::SERVICE_UNAVAILABLE, self.to_string())
            }

            // Todos os outros erros (DatabaseError, InternalServerError) viram 500.
            // O `tracing` loga a mensagem detalhada que `thiserror` nos deu.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Ocorreu um erro inesperado.".to_string(),
                )
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
