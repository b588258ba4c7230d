// src/services/quote_service.rs
//
// Orquestra o ciclo de vida do orçamento: resolve o catálogo, chama o
// motor de preço (puro) e, no fechamento, aloca o número e grava tudo
// numa única transação.

use chrono::Local;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{
        quote_repo::QuoteScope, CatalogRepository, ConfigRepository, QuoteRepository,
    },
    models::{
        auth::User,
        quote::{PriceBreakdown, Quote, QuoteConfiguration, QuoteStats, QuoteSummary},
    },
    services::{
        numbering,
        pricing::{
            self, CatalogLookup, PricingGlobals, ResolvedAccessory, ResolvedCatalog,
        },
    },
};

// Tentativas de alocar+gravar antes de desistir com AllocationConflict.
// O contador serializa a alocação, então uma colisão real só acontece em
// cenários degenerados (dados legados acima do contador).
const MAX_NUMBER_ATTEMPTS: u32 = 3;

// Dados do cliente anexados ao snapshot no fechamento
#[derive(Debug, Clone, Default)]
pub struct ClientInfo {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

#[derive(Clone)]
pub struct QuoteService {
    quote_repo: QuoteRepository,
    catalog_repo: CatalogRepository,
    config_repo: ConfigRepository,
    pool: PgPool,
}

impl QuoteService {
    pub fn new(
        quote_repo: QuoteRepository,
        catalog_repo: CatalogRepository,
        config_repo: ConfigRepository,
        pool: PgPool,
    ) -> Self {
        Self {
            quote_repo,
            catalog_repo,
            config_repo,
            pool,
        }
    }

    // Escopo de listagem do usuário: super_admin vê tudo, os demais só a
    // própria empresa (ou o espaço sem empresa).
    fn scope_for(user: &User) -> QuoteScope {
        if user.role.is_super_admin() {
            QuoteScope::All
        } else {
            QuoteScope::Tenant(user.company_id)
        }
    }

    // Dono ou super_admin; qualquer outro pedido é negado sem devolver
    // o registro.
    fn ensure_access(quote: &Quote, user: &User) -> Result<(), AppError> {
        if user.role.is_super_admin() || quote.company_id == user.company_id {
            Ok(())
        } else {
            Err(AppError::AccessDenied)
        }
    }

    /// Busca cada nome da configuração no catálogo da empresa.
    /// O resultado carrega explicitamente o que foi encontrado e o que
    /// vai degradar para os padrões do motor.
    async fn resolve_catalog(
        &self,
        company_id: Option<Uuid>,
        config: &QuoteConfiguration,
    ) -> Result<ResolvedCatalog, AppError> {
        let chassis = self
            .catalog_repo
            .find_chassis_type(company_id, &config.chassis_type)
            .await?;

        let glazing = self
            .catalog_repo
            .find_glazing_type(company_id, &config.glazing_type)
            .await?;

        let profile = self
            .catalog_repo
            .find_profile_series(company_id, &config.profile_series)
            .await?;

        let finish = self
            .catalog_repo
            .find_finish(company_id, &config.finish)
            .await?;

        let mut accessories = Vec::with_capacity(config.accessories.len());
        for (name, quantity) in &config.accessories {
            let row = self.catalog_repo.find_accessory(company_id, name).await?;
            accessories.push(ResolvedAccessory {
                name: name.clone(),
                quantity: *quantity,
                unit_price: row.map(|a| a.unit_price),
            });
        }

        Ok(ResolvedCatalog {
            chassis,
            glazing_price_per_m2: CatalogLookup::from_option(glazing.map(|g| g.price_per_m2)),
            profile_price_per_meter: CatalogLookup::from_option(profile.map(|p| p.price_per_meter)),
            finish_coefficient: CatalogLookup::from_option(finish.map(|f| f.price_coefficient)),
            accessories,
        })
    }

    async fn load_globals(&self) -> Result<PricingGlobals, AppError> {
        Ok(PricingGlobals {
            vat_rate_percent: self.config_repo.get_f64("vat_rate").await?,
            loss_coefficient: self.config_repo.get_f64("loss_coefficient").await?,
            labor_cost: self.config_repo.get_f64("labor_cost").await?,
        })
    }

    /// Calcula o detalhamento sem persistir nada.
    pub async fn calculate(
        &self,
        company_id: Option<Uuid>,
        config: &QuoteConfiguration,
    ) -> Result<PriceBreakdown, AppError> {
        let catalog = self.resolve_catalog(company_id, config).await?;
        let globals = self.load_globals().await?;
        let breakdown = pricing::compute_breakdown(config, &catalog, &globals)?;
        Ok(breakdown)
    }

    /// Fecha o orçamento: aloca o número e grava o snapshot, tudo numa
    /// única transação. Em caso de colisão de número (violação de
    /// unicidade), refaz a alocação inteira até o limite de tentativas.
    pub async fn finalize(
        &self,
        company_id: Option<Uuid>,
        config: &QuoteConfiguration,
        breakdown: &PriceBreakdown,
        client: &ClientInfo,
    ) -> Result<Quote, AppError> {
        let today = Local::now().date_naive();

        // Snapshot completo: detalhamento + dados do cliente
        let mut details = serde_json::to_value(breakdown)
            .map_err(|e| anyhow::anyhow!("Falha ao serializar o detalhamento: {e}"))?;
        if let Some(obj) = details.as_object_mut() {
            obj.insert("client_name".into(), json!(client.name.clone().unwrap_or_default()));
            obj.insert("client_email".into(), json!(client.email.clone().unwrap_or_default()));
            obj.insert("client_phone".into(), json!(client.phone.clone().unwrap_or_default()));
            obj.insert("client_notes".into(), json!(client.notes.clone().unwrap_or_default()));
        }

        for attempt in 1..=MAX_NUMBER_ATTEMPTS {
            let mut tx = self.pool.begin().await?;

            let seq = self
                .quote_repo
                .allocate_sequence(&mut tx, company_id, today)
                .await?;
            let quote_number = numbering::format_quote_number(today, seq);

            match self
                .quote_repo
                .insert_quote(
                    &mut tx,
                    company_id,
                    &quote_number,
                    today,
                    config,
                    breakdown,
                    &details,
                )
                .await
            {
                Ok(quote) => {
                    tx.commit().await?;
                    tracing::info!("📄 Orçamento {} criado.", quote.quote_number);
                    return Ok(quote);
                }
                Err(e) if QuoteRepository::is_number_conflict(&e) => {
                    // Outro fechamento levou este número; a transação
                    // sofre rollback no drop e tentamos de novo.
                    tracing::warn!(
                        "Colisão no número {} (tentativa {}/{}).",
                        quote_number,
                        attempt,
                        MAX_NUMBER_ATTEMPTS
                    );
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::AllocationConflict)
    }

    pub async fn get_quote(&self, id: Uuid, requester: &User) -> Result<Quote, AppError> {
        let quote = self
            .quote_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Orçamento não encontrado.".to_string()))?;
        Self::ensure_access(&quote, requester)?;
        Ok(quote)
    }

    pub async fn delete_quote(&self, id: Uuid, requester: &User) -> Result<(), AppError> {
        let quote = self
            .quote_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Orçamento não encontrado.".to_string()))?;
        Self::ensure_access(&quote, requester)?;
        self.quote_repo.delete_by_id(quote.id).await
    }

    pub async fn recent(&self, requester: &User, limit: i64) -> Result<Vec<QuoteSummary>, AppError> {
        self.quote_repo
            .list_recent(Self::scope_for(requester), limit)
            .await
    }

    pub async fn stats(&self, requester: &User) -> Result<QuoteStats, AppError> {
        self.quote_repo.stats(Self::scope_for(requester)).await
    }
}

// ---
// Testes de integração (precisam de um Postgres real)
// ---
// Rode com: DATABASE_URL=postgres://... cargo test -- --ignored
#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::{CompanyRepository, UserRepository},
        models::auth::UserRole,
        services::pricing::{self, CatalogLookup, PricingGlobals, ResolvedCatalog},
    };
    use chrono::Utc;
    use std::collections::BTreeMap;

    async fn test_pool() -> PgPool {
        dotenvy::dotenv().ok();
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let pool = PgPool::connect(&url).await.expect("Falha ao conectar");
        sqlx::migrate!().run(&pool).await.expect("Falha nas migrações");
        pool
    }

    fn service(pool: &PgPool) -> QuoteService {
        QuoteService::new(
            QuoteRepository::new(pool.clone()),
            CatalogRepository::new(pool.clone()),
            ConfigRepository::new(pool.clone()),
            pool.clone(),
        )
    }

    // Usuário só para as regras de acesso; não precisa existir no banco.
    fn fake_user(company_id: Option<Uuid>, role: UserRole) -> User {
        User {
            id: Uuid::new_v4(),
            username: format!("teste-{}", Uuid::new_v4()),
            password_hash: String::new(),
            full_name: None,
            email: "teste@example.com".to_string(),
            role,
            company_id,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    async fn create_company(pool: &PgPool, name_prefix: &str) -> Uuid {
        let user_repo = UserRepository::new(pool.clone());
        let company_repo = CompanyRepository::new(pool.clone());

        let creator = user_repo
            .create_user(
                pool,
                &format!("{name_prefix}-sa-{}", Uuid::new_v4()),
                "hash",
                None,
                "sa@example.com",
                UserRole::SuperAdmin,
                None,
            )
            .await
            .expect("Falha ao criar super-admin de teste");

        let company = company_repo
            .create_company(pool, &format!("{name_prefix}-{}", Uuid::new_v4()), creator.id)
            .await
            .expect("Falha ao criar empresa de teste");
        company.id
    }

    fn sample_config() -> QuoteConfiguration {
        QuoteConfiguration {
            chassis_type: "Châssis fixe".to_string(),
            width: 1000.0,
            height: 1200.0,
            profile_series: "Série Fine".to_string(),
            glazing_type: "4mm - Simple".to_string(),
            finish: "Aluminium brut".to_string(),
            accessories: BTreeMap::new(),
            discount: 0.0,
        }
    }

    // Detalhamento coerente, calculado pelo próprio motor (sem banco)
    fn sample_breakdown(config: &QuoteConfiguration) -> PriceBreakdown {
        let catalog = ResolvedCatalog {
            chassis: Some(crate::models::catalog::ChassisType {
                id: Uuid::new_v4(),
                company_id: None,
                name: config.chassis_type.clone(),
                description: None,
                min_width: 300,
                max_width: 3000,
                min_height: 300,
                max_height: 3000,
            }),
            glazing_price_per_m2: CatalogLookup::Found(85.0),
            profile_price_per_meter: CatalogLookup::Found(35.0),
            finish_coefficient: CatalogLookup::Found(1.0),
            accessories: Vec::new(),
        };
        pricing::compute_breakdown(config, &catalog, &PricingGlobals::default()).unwrap()
    }

    #[tokio::test]
    #[ignore = "precisa de um Postgres acessível via DATABASE_URL"]
    async fn numeracao_sob_concorrencia_sem_furos_nem_duplicatas() {
        let pool = test_pool().await;
        let company_id = create_company(&pool, "conc").await;
        let svc = service(&pool);

        let config = sample_config();
        let breakdown = sample_breakdown(&config);

        const N: usize = 8;
        let mut handles = Vec::with_capacity(N);
        for _ in 0..N {
            let svc = svc.clone();
            let config = config.clone();
            let breakdown = breakdown.clone();
            handles.push(tokio::spawn(async move {
                svc.finalize(Some(company_id), &config, &breakdown, &ClientInfo::default())
                    .await
            }));
        }

        let mut seqs = Vec::new();
        for handle in handles {
            let quote = handle.await.unwrap().expect("Fechamento falhou");
            seqs.push(numbering::parse_sequence(&quote.quote_number).unwrap());
        }

        // Conjunto contíguo {1..N}: nenhum duplicado, nenhum furo
        seqs.sort_unstable();
        let expected: Vec<i32> = (1..=N as i32).collect();
        assert_eq!(seqs, expected);
    }

    #[tokio::test]
    #[ignore = "precisa de um Postgres acessível via DATABASE_URL"]
    async fn numeracao_continua_do_maior_numero_existente() {
        let pool = test_pool().await;
        let company_id = create_company(&pool, "seed").await;
        let svc = service(&pool);

        let config = sample_config();
        let breakdown = sample_breakdown(&config);
        let today = Local::now().date_naive();

        // Orçamento legado gravado por fora do contador
        let mut conn = pool.acquire().await.unwrap();
        svc.quote_repo
            .insert_quote(
                &mut conn,
                Some(company_id),
                &numbering::format_quote_number(today, 5),
                today,
                &config,
                &breakdown,
                &serde_json::json!({}),
            )
            .await
            .unwrap();
        drop(conn);

        let quote = svc
            .finalize(Some(company_id), &config, &breakdown, &ClientInfo::default())
            .await
            .unwrap();

        assert_eq!(numbering::parse_sequence(&quote.quote_number), Some(6));
    }

    #[tokio::test]
    #[ignore = "precisa de um Postgres acessível via DATABASE_URL"]
    async fn espacos_de_sequencia_por_empresa_sao_independentes() {
        let pool = test_pool().await;
        let company_a = create_company(&pool, "seq-a").await;
        let company_b = create_company(&pool, "seq-b").await;
        let svc = service(&pool);

        let config = sample_config();
        let breakdown = sample_breakdown(&config);

        let qa = svc
            .finalize(Some(company_a), &config, &breakdown, &ClientInfo::default())
            .await
            .unwrap();
        let qb = svc
            .finalize(Some(company_b), &config, &breakdown, &ClientInfo::default())
            .await
            .unwrap();

        // Cada empresa começa o dia em 0001, mesmo com o mesmo prefixo
        assert_eq!(numbering::parse_sequence(&qa.quote_number), Some(1));
        assert_eq!(numbering::parse_sequence(&qb.quote_number), Some(1));
    }

    #[tokio::test]
    #[ignore = "precisa de um Postgres acessível via DATABASE_URL"]
    async fn snapshot_persiste_identico_e_acesso_cruzado_e_negado() {
        let pool = test_pool().await;
        let company_a = create_company(&pool, "rt-a").await;
        let company_b = create_company(&pool, "rt-b").await;
        let svc = service(&pool);

        let config = sample_config();
        let breakdown = sample_breakdown(&config);
        let client = ClientInfo {
            name: Some("Cliente Teste".to_string()),
            ..ClientInfo::default()
        };

        let created = svc
            .finalize(Some(company_a), &config, &breakdown, &client)
            .await
            .unwrap();

        // Dono lê de volta o snapshot bit a bit (pós-arredondamento)
        let owner = fake_user(Some(company_a), UserRole::User);
        let fetched = svc.get_quote(created.id, &owner).await.unwrap();
        assert_eq!(fetched.quote_number, created.quote_number);
        assert_eq!(fetched.price_ht, breakdown.total_ht);
        assert_eq!(fetched.price_ttc, breakdown.total_price);
        let stored: PriceBreakdown =
            serde_json::from_value(fetched.details.clone()).expect("Snapshot inválido");
        assert_eq!(stored, breakdown);
        assert_eq!(fetched.details["client_name"], "Cliente Teste");

        // Outra empresa é negada sem receber o registro
        let outsider = fake_user(Some(company_b), UserRole::Admin);
        let err = svc.get_quote(created.id, &outsider).await.unwrap_err();
        assert!(matches!(err, AppError::AccessDenied));

        // Super-admin enxerga qualquer empresa
        let root = fake_user(None, UserRole::SuperAdmin);
        assert!(svc.get_quote(created.id, &root).await.is_ok());
    }
}
