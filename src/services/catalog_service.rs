// src/services/catalog_service.rs
//
// CRUD administrativo do catálogo. As regras são simples (o repositório
// já aplica o escopo por empresa), então o serviço é fino; ele existe
// para os handlers não falarem com o banco diretamente.

use std::collections::HashMap;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CatalogRepository, ConfigRepository},
    models::catalog::{Accessory, ChassisType, Finish, GlazingType, ProfileSeries},
};

#[derive(Clone)]
pub struct CatalogService {
    catalog_repo: CatalogRepository,
    config_repo: ConfigRepository,
}

impl CatalogService {
    pub fn new(catalog_repo: CatalogRepository, config_repo: ConfigRepository) -> Self {
        Self {
            catalog_repo,
            config_repo,
        }
    }

    // ---
    // Listagens (qualquer usuário autenticado)
    // ---

    pub async fn list_chassis_types(
        &self,
        company_id: Option<Uuid>,
    ) -> Result<Vec<ChassisType>, AppError> {
        self.catalog_repo.list_chassis_types(company_id).await
    }

    pub async fn list_profile_series(
        &self,
        company_id: Option<Uuid>,
    ) -> Result<Vec<ProfileSeries>, AppError> {
        self.catalog_repo.list_profile_series(company_id).await
    }

    pub async fn list_glazing_types(
        &self,
        company_id: Option<Uuid>,
    ) -> Result<Vec<GlazingType>, AppError> {
        self.catalog_repo.list_glazing_types(company_id).await
    }

    pub async fn list_finishes(&self, company_id: Option<Uuid>) -> Result<Vec<Finish>, AppError> {
        self.catalog_repo.list_finishes(company_id).await
    }

    pub async fn list_accessories(
        &self,
        company_id: Option<Uuid>,
    ) -> Result<Vec<Accessory>, AppError> {
        self.catalog_repo.list_accessories(company_id).await
    }

    /// Constantes globais numéricas (vat_rate, loss_coefficient, ...).
    pub async fn global_config(&self) -> Result<HashMap<String, f64>, AppError> {
        self.config_repo.get_all_numeric().await
    }

    // ---
    // Escritas (admin da empresa)
    // ---

    #[allow(clippy::too_many_arguments)]
    pub async fn create_chassis_type(
        &self,
        company_id: Option<Uuid>,
        name: &str,
        description: Option<&str>,
        min_width: i32,
        max_width: i32,
        min_height: i32,
        max_height: i32,
    ) -> Result<ChassisType, AppError> {
        self.catalog_repo
            .create_chassis_type(company_id, name, description, min_width, max_width, min_height, max_height)
            .await
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn update_chassis_type(
        &self,
        company_id: Option<Uuid>,
        id: Uuid,
        name: &str,
        description: Option<&str>,
        min_width: i32,
        max_width: i32,
        min_height: i32,
        max_height: i32,
    ) -> Result<ChassisType, AppError> {
        self.catalog_repo
            .update_chassis_type(company_id, id, name, description, min_width, max_width, min_height, max_height)
            .await
    }

    pub async fn delete_chassis_type(
        &self,
        company_id: Option<Uuid>,
        id: Uuid,
    ) -> Result<(), AppError> {
        self.catalog_repo.delete_chassis_type(company_id, id).await
    }

    pub async fn create_profile_series(
        &self,
        company_id: Option<Uuid>,
        name: &str,
        description: Option<&str>,
        price_per_meter: f64,
    ) -> Result<ProfileSeries, AppError> {
        self.catalog_repo
            .create_profile_series(company_id, name, description, price_per_meter)
            .await
    }

    pub async fn update_profile_series(
        &self,
        company_id: Option<Uuid>,
        id: Uuid,
        name: &str,
        description: Option<&str>,
        price_per_meter: f64,
    ) -> Result<ProfileSeries, AppError> {
        self.catalog_repo
            .update_profile_series(company_id, id, name, description, price_per_meter)
            .await
    }

    pub async fn delete_profile_series(
        &self,
        company_id: Option<Uuid>,
        id: Uuid,
    ) -> Result<(), AppError> {
        self.catalog_repo.delete_profile_series(company_id, id).await
    }

    pub async fn create_glazing_type(
        &self,
        company_id: Option<Uuid>,
        name: &str,
        description: Option<&str>,
        thickness_mm: Option<i32>,
        price_per_m2: f64,
    ) -> Result<GlazingType, AppError> {
        self.catalog_repo
            .create_glazing_type(company_id, name, description, thickness_mm, price_per_m2)
            .await
    }

    pub async fn update_glazing_type(
        &self,
        company_id: Option<Uuid>,
        id: Uuid,
        name: &str,
        description: Option<&str>,
        thickness_mm: Option<i32>,
        price_per_m2: f64,
    ) -> Result<GlazingType, AppError> {
        self.catalog_repo
            .update_glazing_type(company_id, id, name, description, thickness_mm, price_per_m2)
            .await
    }

    pub async fn delete_glazing_type(
        &self,
        company_id: Option<Uuid>,
        id: Uuid,
    ) -> Result<(), AppError> {
        self.catalog_repo.delete_glazing_type(company_id, id).await
    }

    pub async fn create_finish(
        &self,
        company_id: Option<Uuid>,
        name: &str,
        description: Option<&str>,
        price_coefficient: f64,
    ) -> Result<Finish, AppError> {
        self.catalog_repo
            .create_finish(company_id, name, description, price_coefficient)
            .await
    }

    pub async fn update_finish(
        &self,
        company_id: Option<Uuid>,
        id: Uuid,
        name: &str,
        description: Option<&str>,
        price_coefficient: f64,
    ) -> Result<Finish, AppError> {
        self.catalog_repo
            .update_finish(company_id, id, name, description, price_coefficient)
            .await
    }

    pub async fn delete_finish(&self, company_id: Option<Uuid>, id: Uuid) -> Result<(), AppError> {
        self.catalog_repo.delete_finish(company_id, id).await
    }

    pub async fn create_accessory(
        &self,
        company_id: Option<Uuid>,
        name: &str,
        unit_price: f64,
        incompatible_series: Option<&str>,
    ) -> Result<Accessory, AppError> {
        self.catalog_repo
            .create_accessory(company_id, name, unit_price, incompatible_series)
            .await
    }

    pub async fn update_accessory(
        &self,
        company_id: Option<Uuid>,
        id: Uuid,
        name: &str,
        unit_price: f64,
        incompatible_series: Option<&str>,
    ) -> Result<Accessory, AppError> {
        self.catalog_repo
            .update_accessory(company_id, id, name, unit_price, incompatible_series)
            .await
    }

    pub async fn delete_accessory(
        &self,
        company_id: Option<Uuid>,
        id: Uuid,
    ) -> Result<(), AppError> {
        self.catalog_repo.delete_accessory(company_id, id).await
    }
}
