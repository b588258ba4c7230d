//src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// Declaração dos nossos módulos
mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

// Importações principais
use crate::config::AppState;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() {
    // Inicializa o logger
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Rotas de autenticação (públicas)
    let auth_routes = Router::new().route("/login", post(handlers::auth::login));

    // Rotas de usuário (protegidas)
    let user_routes = Router::new()
        .route(
            "/",
            get(handlers::users::list_users).post(handlers::users::create_user),
        )
        .route("/me", get(handlers::users::get_me))
        .route("/{id}", axum::routing::delete(handlers::users::delete_user))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Rotas de orçamento: cálculo, fechamento, listagens e acesso por id
    let quote_routes = Router::new()
        .route("/", post(handlers::quotes::create_quote))
        .route("/calculate", post(handlers::quotes::calculate))
        .route("/recent", get(handlers::quotes::recent_quotes))
        .route("/stats", get(handlers::quotes::quote_stats))
        .route(
            "/{id}",
            get(handlers::quotes::get_quote).delete(handlers::quotes::delete_quote),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Rotas de catálogo (leitura para todos, escrita para admins)
    let catalog_routes = Router::new()
        .route(
            "/chassis-types",
            get(handlers::catalog::list_chassis_types).post(handlers::catalog::create_chassis_type),
        )
        .route(
            "/chassis-types/{id}",
            axum::routing::put(handlers::catalog::update_chassis_type)
                .delete(handlers::catalog::delete_chassis_type),
        )
        .route(
            "/profile-series",
            get(handlers::catalog::list_profile_series)
                .post(handlers::catalog::create_profile_series),
        )
        .route(
            "/profile-series/{id}",
            axum::routing::put(handlers::catalog::update_profile_series)
                .delete(handlers::catalog::delete_profile_series),
        )
        .route(
            "/glazing-types",
            get(handlers::catalog::list_glazing_types).post(handlers::catalog::create_glazing_type),
        )
        .route(
            "/glazing-types/{id}",
            axum::routing::put(handlers::catalog::update_glazing_type)
                .delete(handlers::catalog::delete_glazing_type),
        )
        .route(
            "/finishes",
            get(handlers::catalog::list_finishes).post(handlers::catalog::create_finish),
        )
        .route(
            "/finishes/{id}",
            axum::routing::put(handlers::catalog::update_finish)
                .delete(handlers::catalog::delete_finish),
        )
        .route(
            "/accessories",
            get(handlers::catalog::list_accessories).post(handlers::catalog::create_accessory),
        )
        .route(
            "/accessories/{id}",
            axum::routing::put(handlers::catalog::update_accessory)
                .delete(handlers::catalog::delete_accessory),
        )
        .route("/config", get(handlers::catalog::get_config))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Rotas de configurações da empresa
    let settings_routes = Router::new()
        .route(
            "/",
            get(handlers::settings::get_settings).post(handlers::settings::update_settings),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Rotas do super-admin
    let super_admin_routes = Router::new()
        .route(
            "/companies",
            get(handlers::companies::list_companies).post(handlers::companies::create_company),
        )
        .route(
            "/companies/{id}/approve",
            post(handlers::companies::approve_company),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api/quotes", quote_routes)
        .nest("/api/catalog", catalog_routes)
        .nest("/api/settings", settings_routes)
        .nest("/api/super-admin", super_admin_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .with_state(app_state);

    // Inicia o servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app).await.expect("Erro no servidor Axum");
}
