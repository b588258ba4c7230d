// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,

        // --- Users ---
        handlers::users::get_me,
        handlers::users::list_users,
        handlers::users::create_user,
        handlers::users::delete_user,

        // --- Quotes ---
        handlers::quotes::calculate,
        handlers::quotes::create_quote,
        handlers::quotes::recent_quotes,
        handlers::quotes::quote_stats,
        handlers::quotes::get_quote,
        handlers::quotes::delete_quote,

        // --- Catalog ---
        handlers::catalog::list_chassis_types,
        handlers::catalog::create_chassis_type,
        handlers::catalog::update_chassis_type,
        handlers::catalog::delete_chassis_type,
        handlers::catalog::list_profile_series,
        handlers::catalog::create_profile_series,
        handlers::catalog::update_profile_series,
        handlers::catalog::delete_profile_series,
        handlers::catalog::list_glazing_types,
        handlers::catalog::create_glazing_type,
        handlers::catalog::update_glazing_type,
        handlers::catalog::delete_glazing_type,
        handlers::catalog::list_finishes,
        handlers::catalog::create_finish,
        handlers::catalog::update_finish,
        handlers::catalog::delete_finish,
        handlers::catalog::list_accessories,
        handlers::catalog::create_accessory,
        handlers::catalog::update_accessory,
        handlers::catalog::delete_accessory,
        handlers::catalog::get_config,

        // --- Settings ---
        handlers::settings::get_settings,
        handlers::settings::update_settings,

        // --- Companies (super-admin) ---
        handlers::companies::list_companies,
        handlers::companies::create_company,
        handlers::companies::approve_company,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::UserRole,
            models::auth::User,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,
            handlers::users::CreateUserPayload,

            // --- Quotes ---
            models::quote::QuoteConfiguration,
            models::quote::AccessoryLine,
            models::quote::PriceBreakdown,
            models::quote::Quote,
            models::quote::QuoteSummary,
            models::quote::QuoteStats,
            handlers::quotes::FinalizeQuotePayload,
            handlers::quotes::FinalizeQuoteResponse,

            // --- Catalog ---
            models::catalog::ChassisType,
            models::catalog::ProfileSeries,
            models::catalog::GlazingType,
            models::catalog::Finish,
            models::catalog::Accessory,
            handlers::catalog::ChassisTypePayload,
            handlers::catalog::ProfileSeriesPayload,
            handlers::catalog::GlazingTypePayload,
            handlers::catalog::FinishPayload,
            handlers::catalog::AccessoryPayload,

            // --- Settings ---
            models::settings::Setting,
            handlers::settings::UpdateSettingsPayload,

            // --- Companies ---
            models::company::CompanyStatus,
            models::company::Company,
            models::company::CompanyOverview,
            handlers::companies::CreateCompanyPayload,
            handlers::companies::CreateCompanyResponse,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação"),
        (name = "Users", description = "Dados do Usuário e Perfil"),
        (name = "Quotes", description = "Cálculo e Fechamento de Orçamentos"),
        (name = "Catalog", description = "Catálogo de Châssis, Perfis, Vidros, Acabamentos e Acessórios"),
        (name = "Settings", description = "Configurações da Empresa"),
        (name = "Companies", description = "Administração de Empresas (super-admin)")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
