// src/models/catalog.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// As cinco famílias de catálogo. Todas escopadas por empresa:
// company_id NULL marca a linha-modelo global, usada apenas como fonte
// da cópia na criação de uma nova empresa (nunca no cálculo).

// ---
// 1. Tipos de châssis (limites dimensionais)
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChassisType {
    pub id: Uuid,
    pub company_id: Option<Uuid>,
    pub name: String,
    pub description: Option<String>,

    // Limites em milímetros, inclusivos dos dois lados
    pub min_width: i32,
    pub max_width: i32,
    pub min_height: i32,
    pub max_height: i32,
}

// ---
// 2. Séries de perfis (preço linear)
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSeries {
    pub id: Uuid,
    pub company_id: Option<Uuid>,
    pub name: String,
    pub description: Option<String>,
    pub price_per_meter: f64,
}

// ---
// 3. Tipos de vidro (preço por m²)
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GlazingType {
    pub id: Uuid,
    pub company_id: Option<Uuid>,
    pub name: String,
    pub description: Option<String>,
    pub thickness_mm: Option<i32>,
    pub price_per_m2: f64,
}

// ---
// 4. Acabamentos (coeficiente multiplicativo)
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Finish {
    pub id: Uuid,
    pub company_id: Option<Uuid>,
    pub name: String,
    pub description: Option<String>,
    pub price_coefficient: f64,
}

// ---
// 5. Acessórios (preço unitário)
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Accessory {
    pub id: Uuid,
    pub company_id: Option<Uuid>,
    pub name: String,
    pub unit_price: f64,
    pub incompatible_series: Option<String>,
}
