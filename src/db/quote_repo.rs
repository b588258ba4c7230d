// src/db/quote_repo.rs
//
// Persistência dos orçamentos e a alocação atômica do número sequencial.
// A alocação é o ÚNICO ponto do sistema que exige controle explícito de
// concorrência: dois fechamentos simultâneos da mesma empresa no mesmo
// dia não podem receber o mesmo número.

use chrono::NaiveDate;
use sqlx::{PgPool, PgConnection};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::quote::{PriceBreakdown, Quote, QuoteConfiguration, QuoteStats, QuoteSummary},
    services::numbering,
};

// Escopo de visibilidade das listagens:
// super_admin enxerga tudo; os demais, só a própria empresa
// (ou o espaço sem empresa, para usuários com company_id NULL).
#[derive(Debug, Clone, Copy)]
pub enum QuoteScope {
    All,
    Tenant(Option<Uuid>),
}

impl QuoteScope {
    // Binds para o predicado "($1 OR company_id IS NOT DISTINCT FROM $2)"
    fn binds(self) -> (bool, Option<Uuid>) {
        match self {
            QuoteScope::All => (true, None),
            QuoteScope::Tenant(company_id) => (false, company_id),
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CountAmount {
    count: i64,
    amount: f64,
}

#[derive(Clone)]
pub struct QuoteRepository {
    pool: PgPool,
}

impl QuoteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Alocação do número (dentro da transação de fechamento)
    // ---

    /// Maior sequência já usada no dia, para o par (empresa, prefixo).
    /// O parse fica no Rust: linhas legadas fora do formato são ignoradas.
    pub async fn find_max_sequence(
        &self,
        conn: &mut PgConnection,
        company_id: Option<Uuid>,
        date: NaiveDate,
    ) -> Result<Option<i32>, AppError> {
        let prefix = numbering::day_prefix(date);
        let numbers = sqlx::query_scalar::<_, String>(
            r#"
            SELECT quote_number FROM quotes
            WHERE company_id IS NOT DISTINCT FROM $1
              AND quote_number LIKE $2 || '%'
            "#,
        )
        .bind(company_id)
        .bind(&prefix)
        .fetch_all(&mut *conn)
        .await?;

        Ok(numbers
            .iter()
            .filter_map(|n| numbering::parse_sequence(n))
            .max())
    }

    /// Aloca a próxima sequência do par (empresa, dia).
    ///
    /// O UPSERT na linha de contador é o ponto de serialização: o lock de
    /// linha do Postgres garante no máximo um vencedor por valor, mesmo
    /// com N fechamentos disputando. O GREATEST faz a primeira alocação
    /// do dia continuar de max+1 quando já existem orçamentos gravados
    /// antes do contador existir.
    ///
    /// Precisa rodar na MESMA transação do INSERT do orçamento; um
    /// rollback devolve o número alocado junto.
    pub async fn allocate_sequence(
        &self,
        conn: &mut PgConnection,
        company_id: Option<Uuid>,
        date: NaiveDate,
    ) -> Result<i32, AppError> {
        let seed = self
            .find_max_sequence(&mut *conn, company_id, date)
            .await?
            .map(|max| max + 1)
            .unwrap_or(1);

        let seq = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO quote_counters (company_id, quote_date, last_seq)
            VALUES ($1, $2, $3)
            ON CONFLICT (company_id, quote_date)
            DO UPDATE SET last_seq = GREATEST(quote_counters.last_seq + 1, EXCLUDED.last_seq)
            RETURNING last_seq
            "#,
        )
        .bind(company_id)
        .bind(date)
        .bind(seed)
        .fetch_one(&mut *conn)
        .await?;

        Ok(seq)
    }

    /// Grava o orçamento com o número recém-alocado.
    pub async fn insert_quote(
        &self,
        conn: &mut PgConnection,
        company_id: Option<Uuid>,
        quote_number: &str,
        quote_date: NaiveDate,
        config: &QuoteConfiguration,
        breakdown: &PriceBreakdown,
        details: &serde_json::Value,
    ) -> Result<Quote, AppError> {
        let accessories = serde_json::to_value(&config.accessories)
            .map_err(|e| anyhow::anyhow!("Falha ao serializar acessórios: {e}"))?;

        let quote = sqlx::query_as::<_, Quote>(
            r#"
            INSERT INTO quotes
                (quote_number, quote_date, chassis_type, width, height,
                 profile_series, glazing_type, finish, accessories,
                 discount_percent, price_ht, price_ttc, details, company_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING *
            "#,
        )
        .bind(quote_number)
        .bind(quote_date)
        .bind(&config.chassis_type)
        .bind(config.width)
        .bind(config.height)
        .bind(&config.profile_series)
        .bind(&config.glazing_type)
        .bind(&config.finish)
        .bind(accessories)
        .bind(config.discount)
        .bind(breakdown.total_ht)
        .bind(breakdown.total_price)
        .bind(details)
        .bind(company_id)
        .fetch_one(&mut *conn)
        .await?;

        Ok(quote)
    }

    /// O INSERT acima colidiu com um número já existente?
    /// (Usado pelo laço de retentativa do fechamento.)
    pub fn is_number_conflict(err: &AppError) -> bool {
        if let AppError::DatabaseError(sqlx_err) = err {
            if let Some(db_err) = sqlx_err.as_database_error() {
                return db_err.is_unique_violation()
                    && db_err
                        .constraint()
                        .is_some_and(|c| c == "uq_quotes_company_number");
            }
        }
        false
    }

    // ---
    // Leituras
    // ---

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Quote>, AppError> {
        let quote = sqlx::query_as::<_, Quote>("SELECT * FROM quotes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(quote)
    }

    pub async fn delete_by_id(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM quotes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn list_recent(
        &self,
        scope: QuoteScope,
        limit: i64,
    ) -> Result<Vec<QuoteSummary>, AppError> {
        let (is_all, company_id) = scope.binds();
        let rows = sqlx::query_as::<_, QuoteSummary>(
            r#"
            SELECT id, quote_number, quote_date, price_ttc AS total_price,
                   chassis_type, details->>'client_name' AS client_name, created_at
            FROM quotes
            WHERE ($1 OR company_id IS NOT DISTINCT FROM $2)
            ORDER BY created_at DESC
            LIMIT $3
            "#,
        )
        .bind(is_all)
        .bind(company_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn stats(&self, scope: QuoteScope) -> Result<QuoteStats, AppError> {
        let (is_all, company_id) = scope.binds();

        let total = sqlx::query_as::<_, CountAmount>(
            r#"
            SELECT COUNT(*) AS count, COALESCE(SUM(price_ttc), 0) AS amount
            FROM quotes
            WHERE ($1 OR company_id IS NOT DISTINCT FROM $2)
            "#,
        )
        .bind(is_all)
        .bind(company_id)
        .fetch_one(&self.pool)
        .await?;

        let month = sqlx::query_as::<_, CountAmount>(
            r#"
            SELECT COUNT(*) AS count, COALESCE(SUM(price_ttc), 0) AS amount
            FROM quotes
            WHERE ($1 OR company_id IS NOT DISTINCT FROM $2)
              AND quote_date >= date_trunc('month', CURRENT_DATE)::date
            "#,
        )
        .bind(is_all)
        .bind(company_id)
        .fetch_one(&self.pool)
        .await?;

        // Semana começando na segunda, como no recorte original
        let week = sqlx::query_as::<_, CountAmount>(
            r#"
            SELECT COUNT(*) AS count, COALESCE(SUM(price_ttc), 0) AS amount
            FROM quotes
            WHERE ($1 OR company_id IS NOT DISTINCT FROM $2)
              AND quote_date >= date_trunc('week', CURRENT_DATE)::date
            "#,
        )
        .bind(is_all)
        .bind(company_id)
        .fetch_one(&self.pool)
        .await?;

        let top_client = sqlx::query_scalar::<_, String>(
            r#"
            SELECT details->>'client_name' AS client
            FROM quotes
            WHERE ($1 OR company_id IS NOT DISTINCT FROM $2)
              AND COALESCE(details->>'client_name', '') NOT IN ('', '-')
            GROUP BY 1
            ORDER BY COUNT(*) DESC
            LIMIT 1
            "#,
        )
        .bind(is_all)
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(QuoteStats {
            total: total.count,
            total_amount: (total.amount * 100.0).round() / 100.0,
            this_month: month.count,
            this_month_amount: (month.amount * 100.0).round() / 100.0,
            this_week: week.count,
            this_week_amount: (week.amount * 100.0).round() / 100.0,
            top_client,
        })
    }
}
