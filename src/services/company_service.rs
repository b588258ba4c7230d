// src/services/company_service.rs
//
// Provisionamento de empresas (superfície do super-admin).
// O ponto delicado é a criação: empresa + admin + cópia do
// catálogo-modelo precisam ser atômicos. Uma empresa sem catálogo
// copiado calcularia tudo com os preços-padrão do motor.

use bcrypt::hash;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CompanyRepository, UserRepository},
    models::{
        auth::{User, UserRole},
        company::{Company, CompanyOverview},
    },
};

#[derive(Clone)]
pub struct CompanyService {
    company_repo: CompanyRepository,
    user_repo: UserRepository,
    pool: PgPool,
}

impl CompanyService {
    pub fn new(company_repo: CompanyRepository, user_repo: UserRepository, pool: PgPool) -> Self {
        Self {
            company_repo,
            user_repo,
            pool,
        }
    }

    /// Cria a empresa com o seu usuário admin e copia o catálogo-modelo,
    /// tudo numa única transação.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_company_with_admin(
        &self,
        created_by: Uuid,
        company_name: &str,
        admin_username: &str,
        admin_password: &str,
        admin_full_name: Option<&str>,
        admin_email: &str,
    ) -> Result<(Company, User), AppError> {
        // Hashing fora da transação (não toca no banco)
        let password_clone = admin_password.to_owned();
        let hashed_password =
            tokio::task::spawn_blocking(move || hash(&password_clone, bcrypt::DEFAULT_COST))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {e}"))??;

        let mut tx = self.pool.begin().await?;

        // 1. Empresa (já aprovada, criação direta pelo super-admin)
        let company = self
            .company_repo
            .create_company(&mut *tx, company_name, created_by)
            .await?;

        // 2. Usuário admin da empresa
        let admin = self
            .user_repo
            .create_user(
                &mut *tx,
                admin_username,
                &hashed_password,
                admin_full_name,
                admin_email,
                UserRole::Admin,
                Some(company.id),
            )
            .await?;

        // 3. Catálogo: cópia das linhas-modelo (company_id NULL).
        // Se falhar, a empresa e o admin somem junto no rollback.
        self.company_repo
            .copy_template_catalog(&mut tx, company.id)
            .await?;

        tx.commit().await?;

        tracing::info!("🏢 Empresa '{}' criada com admin '{}'.", company.name, admin.username);
        Ok((company, admin))
    }

    pub async fn approve_company(
        &self,
        company_id: Uuid,
        approved_by: Uuid,
    ) -> Result<Company, AppError> {
        let company = self.company_repo.approve_company(company_id, approved_by).await?;
        tracing::info!("✅ Empresa '{}' aprovada.", company.name);
        Ok(company)
    }

    pub async fn list_companies(&self) -> Result<Vec<CompanyOverview>, AppError> {
        self.company_repo.list_overviews().await
    }
}
