pub mod error;
pub mod routes;
pub mod state;

use axum::{
    Json, Router,
    http::StatusCode,
    routing::{delete, get, post},
};
use state::AppState;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/user", get(routes::auth::current_user));

    let diary_routes = Router::new()
        .route("/", get(routes::diary::list))
        .route("/", post(routes::diary::create))
        .route("/{entry_id}", get(routes::diary::get))
        .route("/{entry_id}", delete(routes::diary::delete));

    let api = Router::new()
        .nest("/auth", auth_routes)
        .nest("/diary", diary_routes)
        .route("/health", get(health_check));

    Router::new()
        .nest("/api", api)
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "success": true,
        "message": "RegistroVivo API is running",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn not_found() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({
            "success": false,
            "message": "Endpoint not found",
        })),
    )
}
