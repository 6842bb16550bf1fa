// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Health check endpoint.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub service: &'static str,
    pub store: &'static str,
}

/// API information response.
#[derive(Debug, Serialize)]
pub struct ApiInfoResponse {
    pub service: &'static str,
    pub version: &'static str,
    pub description: &'static str,
    pub endpoints: Vec<EndpointInfo>,
}

/// Endpoint information.
#[derive(Debug, Serialize)]
pub struct EndpointInfo {
    pub method: &'static str,
    pub path: &'static str,
    pub description: &'static str,
}

/// GET /api/v1/health - Health check endpoint.
pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        service: "twinbim-server",
        store: state.store.backend(),
    })
}

/// GET / - API information endpoint.
pub async fn info() -> Json<ApiInfoResponse> {
    Json(ApiInfoResponse {
        service: "twinbim-server",
        version: env!("CARGO_PKG_VERSION"),
        description: "Digital-twin BIM element store",
        endpoints: vec![
            EndpointInfo {
                method: "GET",
                path: "/api/v1/health",
                description: "Health check endpoint",
            },
            EndpointInfo {
                method: "GET",
                path: "/api/bim/projects",
                description: "List projects",
            },
            EndpointInfo {
                method: "POST",
                path: "/api/bim/project",
                description: "Create a project with its default scaffold",
            },
            EndpointInfo {
                method: "DELETE",
                path: "/api/bim/project/:projectId",
                description: "Delete a project and its elements",
            },
            EndpointInfo {
                method: "GET",
                path: "/api/bim/elements?projectId=",
                description: "List elements with both vector representations",
            },
            EndpointInfo {
                method: "PUT",
                path: "/api/bim/element",
                description: "Merge an element update",
            },
            EndpointInfo {
                method: "POST",
                path: "/api/bim/model",
                description: "Replace a project's elements",
            },
            EndpointInfo {
                method: "GET",
                path: "/api/bim/model/:projectId",
                description: "Render-ready model with element centers",
            },
        ],
    })
}
