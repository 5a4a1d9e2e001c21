use axum::{
    routing::{get, post},
    Router,
    middleware::from_fn,
};
use tower_http::{
    services::ServeDir,
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use tower_sessions::{MemoryStore, SessionManagerLayer};
use tower_sessions::cookie::SameSite;
use std::path::PathBuf;
use std::sync::Arc;
use crate::{
    chart::ChartRenderer,
    config::Config,
    handlers,
    middleware,
    services::{CookieLedger, CredentialStore, JsonFileLedgerStore, LedgerService, LedgerStore},
};

// Application state shared between handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub credentials: CredentialStore,
    pub ledgers: LedgerService,
    pub cookie_ledger: CookieLedger,
    pub charts: ChartRenderer,
}

impl AppState {
    pub fn new(config: Config, ledger_store: Arc<dyn LedgerStore>) -> Self {
        Self {
            credentials: CredentialStore::new(config.users_path(), config.auth.bcrypt_cost),
            ledgers: LedgerService::new(ledger_store),
            cookie_ledger: CookieLedger::new(&config.ledger),
            charts: ChartRenderer::new(&config.chart),
            config: Arc::new(config),
        }
    }

    /// State backed by per-user JSON files under `storage.data_dir`.
    pub fn from_config(config: Config) -> Self {
        let store = JsonFileLedgerStore::new(PathBuf::from(&config.storage.data_dir));
        Self::new(config, Arc::new(store))
    }
}

pub fn build_router(state: AppState) -> Router {
    // Session store setup
    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false)
        .with_same_site(SameSite::Lax)
        .with_name("session");

    let max_body_bytes = state.config.server.max_body_bytes;

    Router::new()
        // Main page
        .route("/", get(handlers::serve_index))

        // Auth routes
        .route("/login", get(handlers::serve_login_page).post(handlers::handle_login))
        .route("/register", get(handlers::serve_register_page).post(handlers::handle_register))
        .route("/logout", get(handlers::handle_logout))

        // Activity API
        .route("/api/atividades", get(handlers::list_activities))
        .route("/api/adicionar_tempo", post(handlers::add_time))
        .route("/api/nova_atividade", post(handlers::create_activity))
        .route("/api/remover_atividade", post(handlers::remove_activity))
        .route("/api/zerar-atividades", post(handlers::zero_all_activities))
        .route("/api/zerar-tempo-atividade", post(handlers::zero_activity))
        .route("/api/grafico", get(handlers::get_chart))

        // Static files
        .nest_service("/static", ServeDir::new("static"))

        // Add middleware
        .layer(from_fn(middleware::require_auth))
        .layer(session_layer)
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TraceLayer::new_for_http())

        .with_state(state)
}
