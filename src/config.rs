// src/config.rs

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

use crate::{
    db::{
        CatalogRepository, CompanyRepository, ConfigRepository, QuoteRepository,
        SettingsRepository, UserRepository,
    },
    services::{
        AuthService, CatalogService, CompanyService, QuoteService, SettingsService,
    },
};

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_secret: String,
    pub auth_service: AuthService,
    pub quote_service: QuoteService,
    pub catalog_service: CatalogService,
    pub company_service: CompanyService,
    pub settings_service: SettingsService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let company_repo = CompanyRepository::new(db_pool.clone());
        let catalog_repo = CatalogRepository::new(db_pool.clone());
        let config_repo = ConfigRepository::new(db_pool.clone());
        let quote_repo = QuoteRepository::new(db_pool.clone());
        let settings_repo = SettingsRepository::new(db_pool.clone());

        let auth_service = AuthService::new(
            user_repo.clone(),
            company_repo.clone(),
            jwt_secret.clone(),
            db_pool.clone(),
        );
        let quote_service = QuoteService::new(
            quote_repo,
            catalog_repo.clone(),
            config_repo.clone(),
            db_pool.clone(),
        );
        let catalog_service = CatalogService::new(catalog_repo, config_repo);
        let company_service = CompanyService::new(company_repo, user_repo, db_pool.clone());
        let settings_service = SettingsService::new(settings_repo);

        Ok(Self {
            db_pool,
            jwt_secret,
            auth_service,
            quote_service,
            catalog_service,
            company_service,
            settings_service,
        })
    }
}
