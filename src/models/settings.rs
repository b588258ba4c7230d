// src/models/settings.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// Uma configuração (seção, chave, valor) da empresa.
// company_id NULL = configurações do espaço sem empresa.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Setting {
    pub id: Uuid,
    pub section: String,
    pub key: String,
    pub value: Option<String>,
    pub company_id: Option<Uuid>,
}
