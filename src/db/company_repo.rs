// src/db/company_repo.rs

use chrono::Utc;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::company::{Company, CompanyOverview},
};

#[derive(Clone)]
pub struct CompanyRepository {
    pool: PgPool,
}

impl CompanyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Company>, AppError> {
        let company = sqlx::query_as::<_, Company>("SELECT * FROM companies WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(company)
    }

    /// Cria uma nova empresa já aprovada. Roda dentro da transação de
    /// provisionamento (a cópia do catálogo-modelo vem logo em seguida).
    pub async fn create_company<'e, E>(
        &self,
        executor: E,
        name: &str,
        approved_by: Uuid,
    ) -> Result<Company, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Company>(
            r#"
            INSERT INTO companies (name, status, approved_at, approved_by)
            VALUES ($1, 'approved', NOW(), $2)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(approved_by)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::CompanyNameAlreadyExists;
                }
            }
            e.into()
        })
    }

    /// Aprova uma empresa pendente.
    pub async fn approve_company(
        &self,
        id: Uuid,
        approved_by: Uuid,
    ) -> Result<Company, AppError> {
        sqlx::query_as::<_, Company>(
            r#"
            UPDATE companies
            SET status = 'approved', approved_at = $2, approved_by = $3
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(Utc::now())
        .bind(approved_by)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Empresa não encontrada.".to_string()))
    }

    /// Listagem do super-admin: cada empresa com as suas contagens.
    pub async fn list_overviews(&self) -> Result<Vec<CompanyOverview>, AppError> {
        let overviews = sqlx::query_as::<_, CompanyOverview>(
            r#"
            SELECT
                c.id,
                c.name,
                c.status,
                c.created_at,
                c.approved_at,
                (SELECT COUNT(*) FROM users u
                    WHERE u.company_id = c.id AND u.role = 'admin') AS admin_count,
                (SELECT COUNT(*) FROM users u
                    WHERE u.company_id = c.id AND u.role = 'user') AS user_count,
                (SELECT COUNT(*) FROM quotes q
                    WHERE q.company_id = c.id) AS quote_count
            FROM companies c
            ORDER BY c.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(overviews)
    }

    /// Copia o catálogo-modelo (company_id NULL) para a empresa recém-criada.
    ///
    /// Cópia, não referência: mudanças posteriores nos modelos globais não
    /// tocam o catálogo das empresas já provisionadas. Precisa rodar na
    /// mesma transação do INSERT da empresa.
    pub async fn copy_template_catalog(
        &self,
        conn: &mut sqlx::PgConnection,
        company_id: Uuid,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO chassis_types
                (company_id, name, description, min_width, max_width, min_height, max_height)
            SELECT $1, name, description, min_width, max_width, min_height, max_height
            FROM chassis_types WHERE company_id IS NULL
            "#,
        )
        .bind(company_id)
        .execute(&mut *conn)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO profile_series (company_id, name, description, price_per_meter)
            SELECT $1, name, description, price_per_meter
            FROM profile_series WHERE company_id IS NULL
            "#,
        )
        .bind(company_id)
        .execute(&mut *conn)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO glazing_types (company_id, name, description, thickness_mm, price_per_m2)
            SELECT $1, name, description, thickness_mm, price_per_m2
            FROM glazing_types WHERE company_id IS NULL
            "#,
        )
        .bind(company_id)
        .execute(&mut *conn)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO finishes (company_id, name, description, price_coefficient)
            SELECT $1, name, description, price_coefficient
            FROM finishes WHERE company_id IS NULL
            "#,
        )
        .bind(company_id)
        .execute(&mut *conn)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO accessories (company_id, name, unit_price, incompatible_series)
            SELECT $1, name, unit_price, incompatible_series
            FROM accessories WHERE company_id IS NULL
            "#,
        )
        .bind(company_id)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }
}
