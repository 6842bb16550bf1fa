// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! TwinBIM Server - element store for the digital-twin BIM editor.
//!
//! Keeps projects and their structural elements. Creating a project stores
//! the parametric scaffold for its structure type; element geometry is
//! returned in both the discrete and the legacy string representation.
//!
//! # Endpoints
//!
//! - `GET /api/v1/health` - Health check
//! - `GET /api/bim/projects` - List projects
//! - `POST /api/bim/project` - Create a project with its scaffold
//! - `DELETE /api/bim/project/:projectId` - Delete a project and its elements
//! - `GET /api/bim/elements?projectId=` - List elements
//! - `PUT /api/bim/element` - Merge an element update
//! - `POST /api/bim/model` - Replace a project's elements
//! - `GET /api/bim/model/:projectId` - Render-ready model

use axum::{
    http::HeaderValue,
    routing::{delete, get, post, put},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod routes;
mod services;
mod types;

use config::Config;
use services::BimStore;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: BimStore,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug,twinbim_server=debug")),
        )
        .pretty()
        .init();

    let config = Config::from_env();

    tracing::info!(
        port = config.port,
        database = config.database_url.is_some(),
        request_timeout_secs = config.request_timeout_secs,
        base_anchored = ?config.anchors.base_anchored_types(),
        "Starting TwinBIM Server"
    );

    let store = BimStore::from_config(&config).await?;
    let port = config.port;

    let app = build_router(AppState {
        store,
        config: Arc::new(config),
    });

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Build the application router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state.config))
        .layer(TimeoutLayer::new(Duration::from_secs(
            state.config.request_timeout_secs,
        )))
        .layer(CompressionLayer::new());

    Router::new()
        // Root endpoint - API information
        .route("/", get(routes::health::info))
        // Health check
        .route("/api/v1/health", get(routes::health::check))
        // Projects
        .route("/api/bim/projects", get(routes::bim::list_projects))
        .route("/api/bim/project", post(routes::bim::create_project))
        .route("/api/bim/project/:projectId", delete(routes::bim::delete_project))
        // Elements
        .route("/api/bim/elements", get(routes::bim::list_elements))
        .route("/api/bim/element", put(routes::bim::update_element))
        // Legacy client paths
        .route("/api/bim/model/elements", get(routes::bim::list_elements))
        .route("/api/bim/model/element", put(routes::bim::update_element))
        // Models
        .route("/api/bim/model", post(routes::bim::save_model))
        .route("/api/bim/model/:projectId", get(routes::bim::get_model))
        .layer(middleware)
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.allows_any_origin() {
        return CorsLayer::permissive();
    }
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}
