//! 应用层：路由、共享状态与各业务模块

pub mod account;
pub mod catalog;

use axum::{
    extract::{DefaultBodyLimit, State},
    http::{header, Method},
    middleware,
    response::Json,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use self::{account::service::AccountStore, catalog::service::CatalogStore};
use crate::core::{error::CoreError, middleware::request_logging_middleware, upload::UploadStore};
use crate::infrastructure::config::{AppConfig, ConfigError};

/// 进程级共享状态，随请求克隆
#[derive(Clone)]
pub struct AppState {
    pub catalog: CatalogStore,
    pub accounts: AccountStore,
    pub uploads: UploadStore,
}

impl AppState {
    pub fn new(uploads: UploadStore) -> Self {
        Self {
            catalog: CatalogStore::new(),
            accounts: AccountStore::new(),
            uploads,
        }
    }
}

/// 组装 `/api` 路由、静态资源回退和全局中间件
pub fn build_router(config: &AppConfig, state: AppState) -> Result<Router, ConfigError> {
    let cors = CorsLayer::new()
        .allow_origin(config.http.origin_header()?)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    let api = Router::new()
        .route(
            "/products",
            get(catalog::handler::list_products).post(catalog::handler::create_product),
        )
        .route("/register", post(account::handler::register))
        .route("/login", post(account::handler::login))
        .route("/health", get(health_check))
        .layer(DefaultBodyLimit::max(config.storage.max_upload_bytes));

    let router = Router::new()
        .nest("/api", api)
        .fallback_service(ServeDir::new(&config.storage.public_dir))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(request_logging_middleware))
                .layer(cors),
        )
        .with_state(state);

    Ok(router)
}

/// 健康检查
async fn health_check(State(state): State<AppState>) -> Result<Json<serde_json::Value>, CoreError> {
    Ok(Json(serde_json::json!({
        "status": "healthy",
        "products": state.catalog.len()?,
        "accounts": state.accounts.len()?,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    })))
}
