// src/db/config_repo.rs

use std::collections::HashMap;

use sqlx::PgPool;

use crate::common::error::AppError;

// A tabela 'config' guarda as constantes globais do cálculo
// (vat_rate, loss_coefficient, labor_cost) como texto.
#[derive(Clone)]
pub struct ConfigRepository {
    pool: PgPool,
}

impl ConfigRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Lê uma chave e a interpreta como número.
    /// Chave ausente OU valor não numérico viram None: o motor de preço
    /// aplica o padrão documentado em vez de derrubar a requisição.
    pub async fn get_f64(&self, key: &str) -> Result<Option<f64>, AppError> {
        let value = sqlx::query_scalar::<_, String>("SELECT value FROM config WHERE key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(value.and_then(|raw| match raw.parse::<f64>() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!("Valor de config não numérico para '{key}': '{raw}'");
                None
            }
        }))
    }

    /// Mapa completo (chave -> valor numérico) para o endpoint de catálogo.
    pub async fn get_all_numeric(&self) -> Result<HashMap<String, f64>, AppError> {
        let rows = sqlx::query_as::<_, (String, String)>("SELECT key, value FROM config")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(key, value)| value.parse::<f64>().ok().map(|v| (key, v)))
            .collect())
    }
}
