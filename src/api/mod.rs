mod handlers;

use axum::{
    http::HeaderValue,
    routing::{delete, get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::store::PlanStore;

/// Build the API router with permissive CORS (for local development/testing).
pub fn create_router(store: PlanStore) -> Router {
    create_router_with_cors(store, None)
}

/// Build the API router, restricting CORS to `origins` when given.
pub fn create_router_with_cors(store: PlanStore, origins: Option<&[String]>) -> Router {
    let api = Router::new()
        // Plans
        .route("/plans", get(handlers::list_plans))
        .route("/plans", post(handlers::create_plan))
        .route("/plans/{id}", get(handlers::get_plan))
        .route("/plans/{id}", put(handlers::update_plan))
        .route("/plans/{id}", delete(handlers::delete_plan))
        .route("/plans/{id}/reset", post(handlers::reset_plan))
        .route("/plans/{id}/calendar", get(handlers::get_calendar))
        .route("/plans/{id}/export", post(handlers::export_plan))
        // Nodes
        .route("/plans/{id}/nodes", get(handlers::list_nodes))
        .route("/plans/{id}/nodes", post(handlers::add_node))
        .route("/plans/{id}/nodes/{node_id}", put(handlers::update_node))
        .route("/plans/{id}/nodes/{node_id}", delete(handlers::remove_node))
        .route("/plans/{id}/nodes/{node_id}/level", post(handlers::change_level))
        .route("/plans/{id}/nodes/{node_id}/export-flag", post(handlers::set_export_flag))
        .route("/plans/{id}/nodes/{node_id}/click", post(handlers::click_cell))
        // Board
        .route("/tasks", get(handlers::list_tasks))
        // Health
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api/v1", api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(origins)),
        )
        .with_state(store)
}

fn cors_layer(origins: Option<&[String]>) -> CorsLayer {
    match origins {
        Some(origins) => {
            let allowed: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|origin| match origin.parse() {
                    Ok(value) => Some(value),
                    Err(_) => {
                        tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                        None
                    }
                })
                .collect();
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(allowed))
                .allow_methods(Any)
                .allow_headers(Any)
        }
        None => CorsLayer::permissive(),
    }
}
