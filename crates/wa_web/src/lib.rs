use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub mod error;
pub mod handlers;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/api/articles/collect", post(handlers::collect_articles))
        .route("/api/jobs/:id", get(handlers::get_job))
        .route("/api/articles", get(handlers::list_articles))
        .route("/api/articles/:id/analyze", post(handlers::analyze_article))
        .route("/api/articles/:id/analysis", get(handlers::get_analysis))
        .route("/api/analyze/text", post(handlers::analyze_text))
        .route("/api/templates/generate", post(handlers::generate_template))
        .route("/api/templates", get(handlers::list_templates))
        .route("/api/stats/dashboard", get(handlers::dashboard_stats))
        .route("/api/health", get(handlers::health))
        .layer(cors)
        .with_state(Arc::new(state))
}

pub mod prelude {
    pub use crate::{create_app, AppState};
    pub use wa_core::{Article, Error, Result};
}
