// src/services/settings_service.rs

use std::collections::BTreeMap;

use uuid::Uuid;

use crate::{common::error::AppError, db::SettingsRepository, models::settings::Setting};

#[derive(Clone)]
pub struct SettingsService {
    settings_repo: SettingsRepository,
}

impl SettingsService {
    pub fn new(settings_repo: SettingsRepository) -> Self {
        Self { settings_repo }
    }

    pub async fn get_settings(
        &self,
        company_id: Option<Uuid>,
        section: Option<&str>,
    ) -> Result<Vec<Setting>, AppError> {
        self.settings_repo.list(company_id, section).await
    }

    /// Grava o bloco de chaves de uma seção (cria ou atualiza cada uma).
    pub async fn update_settings(
        &self,
        company_id: Option<Uuid>,
        section: &str,
        entries: &BTreeMap<String, Option<String>>,
    ) -> Result<(), AppError> {
        for (key, value) in entries {
            self.settings_repo
                .upsert(company_id, section, key, value.as_deref())
                .await?;
        }
        Ok(())
    }
}
