use axum::{Json, Router, routing::get};
use serde::{Serialize, Deserialize};
use state::AppState;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod battles;
pub mod commands;
pub mod competitions;
pub mod competitors;
pub mod config;
pub mod db;
pub mod judges;
pub mod response;
pub mod scores;
pub mod state;


#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok".into() })
}

fn api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .merge(competitions::router())
        .merge(competitors::router())
        .merge(judges::router())
        .merge(battles::router())
        .merge(scores::router())
}

pub async fn app_with_state(state: AppState) -> Router {
    Router::new()
        .nest("/api", api_router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
