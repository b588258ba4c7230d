// src/db/settings_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{common::error::AppError, models::settings::Setting};

#[derive(Clone)]
pub struct SettingsRepository {
    pool: PgPool,
}

impl SettingsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Lista as configurações da empresa, opcionalmente filtradas por seção.
    pub async fn list(
        &self,
        company_id: Option<Uuid>,
        section: Option<&str>,
    ) -> Result<Vec<Setting>, AppError> {
        let settings = sqlx::query_as::<_, Setting>(
            r#"
            SELECT * FROM settings
            WHERE company_id IS NOT DISTINCT FROM $1
              AND ($2::text IS NULL OR section = $2)
            ORDER BY section, key
            "#,
        )
        .bind(company_id)
        .bind(section)
        .fetch_all(&self.pool)
        .await?;
        Ok(settings)
    }

    /// UPSERT de uma chave: cria ou atualiza o valor.
    pub async fn upsert(
        &self,
        company_id: Option<Uuid>,
        section: &str,
        key: &str,
        value: Option<&str>,
    ) -> Result<Setting, AppError> {
        let setting = sqlx::query_as::<_, Setting>(
            r#"
            INSERT INTO settings (section, key, value, company_id)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (section, key, company_id)
            DO UPDATE SET value = EXCLUDED.value
            RETURNING *
            "#,
        )
        .bind(section)
        .bind(key)
        .bind(value)
        .bind(company_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(setting)
    }
}
