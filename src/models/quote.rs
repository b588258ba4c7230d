// src/models/quote.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::BTreeMap;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// ---
// Configuração de um orçamento (entrada, efêmera)
// ---
// Os nomes de catálogo são strings soltas de propósito: o motor de preço
// tolera nomes não cadastrados degradando para os preços-padrão (exceto o
// tipo de châssis, que é obrigatório).
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuoteConfiguration {
    #[validate(length(min = 1, message = "O tipo de châssis é obrigatório."))]
    pub chassis_type: String,

    // Dimensões em milímetros; o motor rejeita valores <= 0
    pub width: f64,
    pub height: f64,

    pub profile_series: String,
    pub glazing_type: String,
    pub finish: String,

    // { nome do acessório: quantidade }
    #[serde(default)]
    pub accessories: BTreeMap<String, i32>,

    #[validate(range(min = 0.0, max = 100.0, message = "O desconto deve estar entre 0 e 100%."))]
    #[serde(default)]
    pub discount: f64,
}

// Linha de acessório dentro do detalhamento
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AccessoryLine {
    pub name: String,
    pub quantity: i32,
    pub unit_price: f64,
    pub total_price: f64,
}

// ---
// Detalhamento de preço (imutável depois de produzido)
// ---
// ATENÇÃO: as chaves ficam em snake_case no JSON (sem rename_all) porque
// os snapshots históricos gravados em quotes.details usam exatamente
// estas chaves. Todos os campos monetários já chegam arredondados a 2
// casas; só surface_m2 usa 3 casas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PriceBreakdown {
    pub surface_m2: f64,
    pub perimeter_m: f64,
    pub base_price: f64,
    pub glazing_cost: f64,
    pub profile_cost: f64,
    pub accessories: Vec<AccessoryLine>,
    pub accessories_cost: f64,
    pub finish_coefficient: f64,
    // Valor exibido: (vidro + perfil) * (coef - 1). É uma linha derivada
    // de relatório, não participa do cálculo do total.
    pub finish_supplement: f64,
    pub subtotal: f64,
    pub labor: f64,
    pub total_before_discount: f64,
    pub discount_percent: f64,
    pub discount_amount: f64,
    pub total_ht: f64,
    // Taxa de IVA em percentual (ex.: 20.0), como no snapshot original
    pub vat_rate: f64,
    pub vat_amount: f64,
    pub total_price: f64,
}

// ---
// Orçamento persistido
// ---
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub id: Uuid,
    pub quote_number: String,
    pub quote_date: NaiveDate,
    pub chassis_type: String,
    pub width: f64,
    pub height: f64,
    pub profile_series: String,
    pub glazing_type: String,
    pub finish: String,

    // Snapshot { nome: quantidade } tal como enviado no fechamento
    #[schema(value_type = Object)]
    pub accessories: serde_json::Value,

    pub discount_percent: f64,
    pub price_ht: f64,
    pub price_ttc: f64,

    // Snapshot completo do detalhamento + dados do cliente
    #[schema(value_type = Object)]
    pub details: serde_json::Value,

    pub company_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

// Linha da listagem de orçamentos recentes
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSummary {
    pub id: Uuid,
    pub quote_number: String,
    pub quote_date: NaiveDate,
    pub total_price: f64,
    pub chassis_type: String,
    pub client_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

// Indicadores agregados dos orçamentos do escopo do usuário
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuoteStats {
    pub total: i64,
    pub total_amount: f64,
    pub this_month: i64,
    pub this_month_amount: f64,
    pub this_week: i64,
    pub this_week_amount: f64,
    pub top_client: Option<String>,
}
