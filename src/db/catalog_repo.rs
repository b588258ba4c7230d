// src/db/catalog_repo.rs
//
// As cinco tabelas de catálogo, sempre escopadas por empresa.
// A regra de escopo é exata: company_id IS NOT DISTINCT FROM $empresa.
// Uma linha-modelo global (NULL) NUNCA é enxergada por uma empresa em
// tempo de cálculo; ela só serve de fonte na cópia de provisionamento.

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::catalog::{Accessory, ChassisType, Finish, GlazingType, ProfileSeries},
};

#[derive(Clone)]
pub struct CatalogRepository {
    pool: PgPool,
}

fn map_unique_violation(e: sqlx::Error, name: &str) -> AppError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return AppError::NameAlreadyExists(name.to_string());
        }
    }
    e.into()
}

impl CatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Buscas pontuais usadas pelo cálculo de preço
    // ---

    pub async fn find_chassis_type(
        &self,
        company_id: Option<Uuid>,
        name: &str,
    ) -> Result<Option<ChassisType>, AppError> {
        let row = sqlx::query_as::<_, ChassisType>(
            "SELECT * FROM chassis_types WHERE company_id IS NOT DISTINCT FROM $1 AND name = $2",
        )
        .bind(company_id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn find_profile_series(
        &self,
        company_id: Option<Uuid>,
        name: &str,
    ) -> Result<Option<ProfileSeries>, AppError> {
        let row = sqlx::query_as::<_, ProfileSeries>(
            "SELECT * FROM profile_series WHERE company_id IS NOT DISTINCT FROM $1 AND name = $2",
        )
        .bind(company_id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn find_glazing_type(
        &self,
        company_id: Option<Uuid>,
        name: &str,
    ) -> Result<Option<GlazingType>, AppError> {
        let row = sqlx::query_as::<_, GlazingType>(
            "SELECT * FROM glazing_types WHERE company_id IS NOT DISTINCT FROM $1 AND name = $2",
        )
        .bind(company_id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn find_finish(
        &self,
        company_id: Option<Uuid>,
        name: &str,
    ) -> Result<Option<Finish>, AppError> {
        let row = sqlx::query_as::<_, Finish>(
            "SELECT * FROM finishes WHERE company_id IS NOT DISTINCT FROM $1 AND name = $2",
        )
        .bind(company_id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn find_accessory(
        &self,
        company_id: Option<Uuid>,
        name: &str,
    ) -> Result<Option<Accessory>, AppError> {
        let row = sqlx::query_as::<_, Accessory>(
            "SELECT * FROM accessories WHERE company_id IS NOT DISTINCT FROM $1 AND name = $2",
        )
        .bind(company_id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    // ---
    // Listagens
    // ---

    pub async fn list_chassis_types(
        &self,
        company_id: Option<Uuid>,
    ) -> Result<Vec<ChassisType>, AppError> {
        let rows = sqlx::query_as::<_, ChassisType>(
            "SELECT * FROM chassis_types WHERE company_id IS NOT DISTINCT FROM $1 ORDER BY name ASC",
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn list_profile_series(
        &self,
        company_id: Option<Uuid>,
    ) -> Result<Vec<ProfileSeries>, AppError> {
        let rows = sqlx::query_as::<_, ProfileSeries>(
            "SELECT * FROM profile_series WHERE company_id IS NOT DISTINCT FROM $1 ORDER BY name ASC",
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn list_glazing_types(
        &self,
        company_id: Option<Uuid>,
    ) -> Result<Vec<GlazingType>, AppError> {
        let rows = sqlx::query_as::<_, GlazingType>(
            "SELECT * FROM glazing_types WHERE company_id IS NOT DISTINCT FROM $1 ORDER BY name ASC",
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn list_finishes(&self, company_id: Option<Uuid>) -> Result<Vec<Finish>, AppError> {
        let rows = sqlx::query_as::<_, Finish>(
            "SELECT * FROM finishes WHERE company_id IS NOT DISTINCT FROM $1 ORDER BY name ASC",
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn list_accessories(
        &self,
        company_id: Option<Uuid>,
    ) -> Result<Vec<Accessory>, AppError> {
        let rows = sqlx::query_as::<_, Accessory>(
            "SELECT * FROM accessories WHERE company_id IS NOT DISTINCT FROM $1 ORDER BY name ASC",
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    // ---
    // Escritas (CRUD administrativo)
    // ---

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
        sqlx::query_as::<_, ChassisType>(
            r#"
            INSERT INTO chassis_types
                (company_id, name, description, min_width, max_width, min_height, max_height)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(name)
        .bind(description)
        .bind(min_width)
        .bind(max_width)
        .bind(min_height)
        .bind(max_height)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, name))
    }

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
        sqlx::query_as::<_, ChassisType>(
            r#"
            UPDATE chassis_types
            SET name = $3, description = $4,
                min_width = $5, max_width = $6, min_height = $7, max_height = $8
            WHERE id = $2 AND company_id IS NOT DISTINCT FROM $1
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(id)
        .bind(name)
        .bind(description)
        .bind(min_width)
        .bind(max_width)
        .bind(min_height)
        .bind(max_height)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, name))?
        .ok_or_else(|| AppError::NotFound("Tipo de châssis não encontrado.".to_string()))
    }

    pub async fn delete_chassis_type(
        &self,
        company_id: Option<Uuid>,
        id: Uuid,
    ) -> Result<(), AppError> {
        let result =
            sqlx::query("DELETE FROM chassis_types WHERE id = $2 AND company_id IS NOT DISTINCT FROM $1")
                .bind(company_id)
                .bind(id)
                .execute(&self.pool)
                .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Tipo de châssis não encontrado.".to_string()));
        }
        Ok(())
    }

    pub async fn create_profile_series(
        &self,
        company_id: Option<Uuid>,
        name: &str,
        description: Option<&str>,
        price_per_meter: f64,
    ) -> Result<ProfileSeries, AppError> {
        sqlx::query_as::<_, ProfileSeries>(
            r#"
            INSERT INTO profile_series (company_id, name, description, price_per_meter)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(name)
        .bind(description)
        .bind(price_per_meter)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, name))
    }

    pub async fn update_profile_series(
        &self,
        company_id: Option<Uuid>,
        id: Uuid,
        name: &str,
        description: Option<&str>,
        price_per_meter: f64,
    ) -> Result<ProfileSeries, AppError> {
        sqlx::query_as::<_, ProfileSeries>(
            r#"
            UPDATE profile_series
            SET name = $3, description = $4, price_per_meter = $5
            WHERE id = $2 AND company_id IS NOT DISTINCT FROM $1
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(id)
        .bind(name)
        .bind(description)
        .bind(price_per_meter)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, name))?
        .ok_or_else(|| AppError::NotFound("Série de perfil não encontrada.".to_string()))
    }

    pub async fn delete_profile_series(
        &self,
        company_id: Option<Uuid>,
        id: Uuid,
    ) -> Result<(), AppError> {
        let result =
            sqlx::query("DELETE FROM profile_series WHERE id = $2 AND company_id IS NOT DISTINCT FROM $1")
                .bind(company_id)
                .bind(id)
                .execute(&self.pool)
                .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Série de perfil não encontrada.".to_string()));
        }
        Ok(())
    }

    pub async fn create_glazing_type(
        &self,
        company_id: Option<Uuid>,
        name: &str,
        description: Option<&str>,
        thickness_mm: Option<i32>,
        price_per_m2: f64,
    ) -> Result<GlazingType, AppError> {
        sqlx::query_as::<_, GlazingType>(
            r#"
            INSERT INTO glazing_types (company_id, name, description, thickness_mm, price_per_m2)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(name)
        .bind(description)
        .bind(thickness_mm)
        .bind(price_per_m2)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, name))
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
        sqlx::query_as::<_, GlazingType>(
            r#"
            UPDATE glazing_types
            SET name = $3, description = $4, thickness_mm = $5, price_per_m2 = $6
            WHERE id = $2 AND company_id IS NOT DISTINCT FROM $1
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(id)
        .bind(name)
        .bind(description)
        .bind(thickness_mm)
        .bind(price_per_m2)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, name))?
        .ok_or_else(|| AppError::NotFound("Tipo de vidro não encontrado.".to_string()))
    }

    pub async fn delete_glazing_type(
        &self,
        company_id: Option<Uuid>,
        id: Uuid,
    ) -> Result<(), AppError> {
        let result =
            sqlx::query("DELETE FROM glazing_types WHERE id = $2 AND company_id IS NOT DISTINCT FROM $1")
                .bind(company_id)
                .bind(id)
                .execute(&self.pool)
                .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Tipo de vidro não encontrado.".to_string()));
        }
        Ok(())
    }

    pub async fn create_finish(
        &self,
        company_id: Option<Uuid>,
        name: &str,
        description: Option<&str>,
        price_coefficient: f64,
    ) -> Result<Finish, AppError> {
        sqlx::query_as::<_, Finish>(
            r#"
            INSERT INTO finishes (company_id, name, description, price_coefficient)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(name)
        .bind(description)
        .bind(price_coefficient)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, name))
    }

    pub async fn update_finish(
        &self,
        company_id: Option<Uuid>,
        id: Uuid,
        name: &str,
        description: Option<&str>,
        price_coefficient: f64,
    ) -> Result<Finish, AppError> {
        sqlx::query_as::<_, Finish>(
            r#"
            UPDATE finishes
            SET name = $3, description = $4, price_coefficient = $5
            WHERE id = $2 AND company_id IS NOT DISTINCT FROM $1
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(id)
        .bind(name)
        .bind(description)
        .bind(price_coefficient)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, name))?
        .ok_or_else(|| AppError::NotFound("Acabamento não encontrado.".to_string()))
    }

    pub async fn delete_finish(&self, company_id: Option<Uuid>, id: Uuid) -> Result<(), AppError> {
        let result =
            sqlx::query("DELETE FROM finishes WHERE id = $2 AND company_id IS NOT DISTINCT FROM $1")
                .bind(company_id)
                .bind(id)
                .execute(&self.pool)
                .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Acabamento não encontrado.".to_string()));
        }
        Ok(())
    }

    pub async fn create_accessory(
        &self,
        company_id: Option<Uuid>,
        name: &str,
        unit_price: f64,
        incompatible_series: Option<&str>,
    ) -> Result<Accessory, AppError> {
        sqlx::query_as::<_, Accessory>(
            r#"
            INSERT INTO accessories (company_id, name, unit_price, incompatible_series)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(name)
        .bind(unit_price)
        .bind(incompatible_series)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, name))
    }

    pub async fn update_accessory(
        &self,
        company_id: Option<Uuid>,
        id: Uuid,
        name: &str,
        unit_price: f64,
        incompatible_series: Option<&str>,
    ) -> Result<Accessory, AppError> {
        sqlx::query_as::<_, Accessory>(
            r#"
            UPDATE accessories
            SET name = $3, unit_price = $4, incompatible_series = $5
            WHERE id = $2 AND company_id IS NOT DISTINCT FROM $1
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(id)
        .bind(name)
        .bind(unit_price)
        .bind(incompatible_series)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, name))?
        .ok_or_else(|| AppError::NotFound("Acessório não encontrado.".to_string()))
    }

    pub async fn delete_accessory(
        &self,
        company_id: Option<Uuid>,
        id: Uuid,
    ) -> Result<(), AppError> {
        let result =
            sqlx::query("DELETE FROM accessories WHERE id = $2 AND company_id IS NOT DISTINCT FROM $1")
                .bind(company_id)
                .bind(id)
                .execute(&self.pool)
                .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Acessório não encontrado.".to_string()));
        }
        Ok(())
    }
}
