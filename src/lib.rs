//! Gruntex Catalog API Library
//!
//! Catalog and admin backend for a construction-equipment reseller.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod migrator;
pub mod notifications;
pub mod openapi;
pub mod services;

use axum::{extract::State, response::Json, routing::get, Router};
use sea_orm::DatabaseConnection;
use serde_json::{json, Value};
use std::sync::Arc;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub auth: Arc<auth::AuthService>,
    pub event_sender: events::EventSender,
    pub services: handlers::AppServices,
}

/// Versioned API surface. Public catalog reads, the quote form and login
/// are open; everything mutating sits behind the session middleware
/// applied inside each route module.
pub fn api_v1_routes(cfg: &config::AppConfig) -> Router<AppState> {
    Router::new()
        .route("/status", get(api_status))
        .nest("/machines", handlers::machines::machines_routes())
        .nest("/categories", handlers::categories::categories_routes())
        .nest("/features", handlers::features::features_routes())
        .nest("/parameters", handlers::parameters::parameters_routes())
        .nest("/accessories", handlers::accessories::accessories_routes())
        .nest("/quote", handlers::contacts::quote_routes())
        .nest("/auth", handlers::auth::auth_routes())
        .nest(
            "/admin/accessories",
            handlers::accessories::admin_accessories_routes(),
        )
        .nest(
            "/admin/features",
            handlers::features::admin_features_routes(),
        )
        .nest(
            "/admin/parameters",
            handlers::parameters::admin_parameters_routes(),
        )
        .nest(
            "/admin/contacts",
            handlers::contacts::admin_contacts_routes(),
        )
        .nest(
            "/admin/settings",
            handlers::settings::admin_settings_routes(),
        )
        .nest(
            "/admin/uploads",
            handlers::uploads::admin_uploads_routes(cfg.upload_max_bytes),
        )
        .nest("/admin/users", handlers::users::admin_users_routes())
}

async fn api_status() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "gruntex-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Liveness endpoint: reports database connectivity.
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let db_status = match state.db.ping().await {
        Ok(_) => "healthy",
        Err(_) => "unhealthy",
    };

    Json(json!({
        "status": db_status,
        "checks": { "database": db_status },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
