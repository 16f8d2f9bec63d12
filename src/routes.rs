use std::sync::Arc;

use axum::{middleware, routing::get, Extension, Json, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::{
    handler::{
        applications::{applications_handler, submission_handler},
        auth::auth_handler,
        codes::{codes_handler, usage_handler},
        dashboard::{ambassador_handler, stats_handler},
        influencers::influencers_handler,
        invoices::invoices_handler,
        tools::{tiers_handler, tools_handler},
    },
    middleware::{auth, role_check},
    models::usermodel::UserRole,
    AppState,
};

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "message": "Server is running"
    }))
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    let admin_routes = Router::new()
        .nest("/influencers", influencers_handler())
        .nest("/codes", codes_handler())
        .nest("/applications", applications_handler())
        .nest("/invoices", invoices_handler())
        .nest("/stats", stats_handler())
        .layer(middleware::from_fn(|state, req, next| {
            role_check(state, req, next, vec![UserRole::Admin])
        }))
        .layer(middleware::from_fn(auth));

    let ambassador_routes = ambassador_handler()
        .layer(middleware::from_fn(|state, req, next| {
            role_check(state, req, next, vec![UserRole::Ambassador])
        }))
        .layer(middleware::from_fn(auth));

    let api_route = Router::new()
        .nest("/auth", auth_handler())
        .nest("/tiers", tiers_handler())
        .nest("/tools", tools_handler())
        .nest("/applications", submission_handler())
        .nest("/codes", usage_handler().layer(middleware::from_fn(auth)))
        .nest("/admin", admin_routes)
        .nest("/ambassador", ambassador_routes)
        .layer(TraceLayer::new_for_http())
        .layer(Extension(app_state));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_route)
}
