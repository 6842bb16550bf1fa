// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Project and element routes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use rustc_hash::FxHashSet;
use twinbim_core::{scaffold, Element, ElementRecord, Project};
use uuid::Uuid;

use crate::error::ApiError;
use crate::types::{ElementsQuery, ModelResponse, SaveModelRequest};
use crate::AppState;

/// Server-assigned project id: `P-` and five hex digits.
fn new_project_id() -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("P-{}", &id[..5])
}

/// GET /api/bim/projects
pub async fn list_projects(State(state): State<AppState>) -> Result<Json<Vec<Project>>, ApiError> {
    Ok(Json(state.store.list_projects().await?))
}

/// POST /api/bim/project
///
/// Stores the project together with the scaffold for its structure type.
pub async fn create_project(
    State(state): State<AppState>,
    Json(mut project): Json<Project>,
) -> Result<(StatusCode, Json<Project>), ApiError> {
    if project.project_id.trim().is_empty() {
        project.project_id = new_project_id();
    }
    project.validate()?;

    let elements = scaffold::generate(&project);
    state.store.create_project(&project, &elements).await?;

    tracing::info!(
        project_id = %project.project_id,
        structure_type = %project.structure_type,
        elements = elements.len(),
        "Project created"
    );

    Ok((StatusCode::CREATED, Json(project)))
}

/// DELETE /api/bim/project/:projectId
pub async fn delete_project(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.store.delete_project(&project_id).await?;
    tracing::info!(project_id = %project_id, "Project deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/bim/elements?projectId=
///
/// Each element carries both the discrete fields and the legacy strings.
pub async fn list_elements(
    State(state): State<AppState>,
    Query(query): Query<ElementsQuery>,
) -> Result<Json<Vec<ElementRecord>>, ApiError> {
    let elements = state
        .store
        .list_elements(query.project_id.as_deref())
        .await?;
    Ok(Json(elements.iter().map(Element::to_record).collect()))
}

/// PUT /api/bim/element
pub async fn update_element(
    State(state): State<AppState>,
    Json(record): Json<ElementRecord>,
) -> Result<StatusCode, ApiError> {
    if record.element_id.trim().is_empty() {
        return Err(ApiError::BadRequest("elementId is required".into()));
    }
    state.store.update_element(&record).await?;
    tracing::debug!(element_id = %record.element_id, "Element updated");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/bim/model
///
/// Replaces every stored element of the project with the request's.
pub async fn save_model(
    State(state): State<AppState>,
    Json(request): Json<SaveModelRequest>,
) -> Result<StatusCode, ApiError> {
    let project = request.project;
    project.validate()?;
    let elements = decode_model(&project, &request.elements)?;

    state.store.save_model(&project, &elements).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/bim/model/:projectId
pub async fn get_model(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> Result<Json<ModelResponse>, ApiError> {
    let project = state
        .store
        .project(&project_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("project {}", project_id)))?;
    let elements = state.store.list_elements(Some(&project_id)).await?;

    Ok(Json(ModelResponse::new(
        &project,
        &elements,
        &state.config.anchors,
    )))
}

/// Decode the records of a model save. Records without a project id are
/// assigned to `project`; records of another project are rejected.
fn decode_model(project: &Project, records: &[ElementRecord]) -> Result<Vec<Element>, ApiError> {
    let mut seen = FxHashSet::default();
    let mut elements = Vec::with_capacity(records.len());

    for record in records {
        let mut element = Element::from_record(record);
        element.validate()?;
        if element.project_id.is_empty() {
            element.project_id = project.project_id.clone();
        } else if element.project_id != project.project_id {
            return Err(twinbim_core::Error::ProjectMismatch {
                element_id: element.element_id,
                expected: project.project_id.clone(),
                found: element.project_id,
            }
            .into());
        }
        if !seen.insert(element.element_id.clone()) {
            return Err(twinbim_core::Error::DuplicateElement(element.element_id).into());
        }
        elements.push(element);
    }

    Ok(elements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::services::BimStore;
    use axum::{
        body::Body,
        http::{header::CONTENT_TYPE, Method, Request},
        Router,
    };
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> Router {
        crate::build_router(AppState {
            store: BimStore::memory(),
            config: Arc::new(Config::default()),
        })
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let body = match body {
            Some(value) => Body::from(value.to_string()),
            None => Body::empty(),
        };
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    async fn create(app: &Router, body: Value) -> String {
        let (status, project) = send(app, Method::POST, "/api/bim/project", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
        project["projectId"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_create_bridge_scaffolds_piers_and_deck() {
        let app = app();
        let id = create(
            &app,
            json!({ "projectName": "River Crossing", "structureType": "Bridge", "spanCount": "2" }),
        )
        .await;
        assert!(id.starts_with("P-"));
        assert_eq!(id.len(), 7);

        let uri = format!("/api/bim/elements?projectId={}", id);
        let (status, elements) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        let elements = elements.as_array().unwrap();
        assert_eq!(elements.len(), 4);

        let deck = elements
            .iter()
            .find(|e| e["elementId"] == format!("DECK-{}", id))
            .unwrap();
        assert_eq!(deck["elementType"], "IfcSlab");
        assert_eq!(deck["sizeX"], 40.0);
        assert_eq!(deck["positionData"], "[0, 10, 0]");
        assert_eq!(deck["sizeData"], "[40, 1, 10]");
    }

    #[tokio::test]
    async fn test_numeric_span_count_accepted() {
        let app = app();
        let id = create(
            &app,
            json!({ "projectId": "P-num01", "projectName": "Viaduct", "structureType": "bridge", "spanCount": 3 }),
        )
        .await;
        assert_eq!(id, "P-num01");

        let (_, elements) = send(&app, Method::GET, "/api/bim/elements?projectId=P-num01", None).await;
        assert_eq!(elements.as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_span_count_over_limit_rejected() {
        let app = app();
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/bim/project",
            Some(json!({ "projectName": "Too Long", "structureType": "Bridge", "spanCount": "500" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");

        let (_, projects) = send(&app, Method::GET, "/api/bim/projects", None).await;
        assert!(projects.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_project_id_conflicts() {
        let app = app();
        let body = json!({ "projectId": "P-dup00", "projectName": "Hall", "structureType": "Building" });
        create(&app, body.clone()).await;

        let (status, _) = send(&app, Method::POST, "/api/bim/project", Some(body)).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_update_element_merges_and_isolates() {
        let app = app();
        let id = create(
            &app,
            json!({ "projectId": "P-bld01", "projectName": "Hall", "structureType": "Building" }),
        )
        .await;

        let (status, _) = send(
            &app,
            Method::PUT,
            "/api/bim/element",
            Some(json!({ "elementId": "COL-P-bld01-1", "positionData": "[1.5, 0, -4]", "material": "Steel Grade B" })),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let uri = format!("/api/bim/elements?projectId={}", id);
        let (_, elements) = send(&app, Method::GET, &uri, None).await;
        let elements = elements.as_array().unwrap();
        let moved = &elements[0];
        assert_eq!(moved["elementId"], "COL-P-bld01-1");
        assert_eq!(moved["positionX"], 1.5);
        assert_eq!(moved["positionData"], "[1.5, 0, -4]");
        assert_eq!(moved["material"], "Steel Grade B");
        assert_eq!(moved["sizeData"], "[0.5, 6, 0.5]");

        let other = &elements[1];
        assert_eq!(other["elementId"], "COL-P-bld01-2");
        assert_eq!(other["positionX"], 4.0);
        assert_eq!(other["material"], "Steel Grade A");
    }

    #[tokio::test]
    async fn test_update_unknown_element_is_not_found() {
        let app = app();
        let (status, body) = send(
            &app,
            Method::PUT,
            "/api/bim/element",
            Some(json!({ "elementId": "GHOST", "positionX": 1.0 })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");

        let (status, _) = send(
            &app,
            Method::PUT,
            "/api/bim/element",
            Some(json!({ "elementId": "  " })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_project_cascades() {
        let app = app();
        create(
            &app,
            json!({ "projectId": "P-del01", "projectName": "Shed", "structureType": "Building" }),
        )
        .await;

        let (status, _) = send(&app, Method::DELETE, "/api/bim/project/P-del01", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (_, elements) = send(&app, Method::GET, "/api/bim/elements?projectId=P-del01", None).await;
        assert!(elements.as_array().unwrap().is_empty());

        let (status, _) = send(&app, Method::DELETE, "/api/bim/project/P-del01", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_save_model_replaces_and_model_reports_centers() {
        let app = app();
        create(
            &app,
            json!({ "projectId": "P-mdl01", "projectName": "Depot", "structureType": "Building" }),
        )
        .await;

        let body = json!({
            "project": { "projectId": "P-mdl01", "projectName": "Depot", "structureType": "Building" },
            "elements": [
                { "elementId": "W-1", "elementType": "IfcWall", "material": "Brick",
                  "positionData": "[0, 0, 5]", "sizeData": "[10, 3, 0.3]" },
                { "elementId": "B-1", "elementType": "IfcBeam", "material": "Steel",
                  "positionX": 0, "positionY": 3, "positionZ": 0, "sizeX": 10, "sizeY": 0.4, "sizeZ": 0.4 }
            ]
        });
        let (status, _) = send(&app, Method::POST, "/api/bim/model", Some(body)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, model) = send(&app, Method::GET, "/api/bim/model/P-mdl01", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(model["modelName"], "Depot");
        let elements = model["elements"].as_array().unwrap();
        assert_eq!(elements.len(), 2);

        let wall = elements.iter().find(|e| e["id"] == "W-1").unwrap();
        assert_eq!(wall["type"], "IfcWall");
        assert_eq!(wall["position"], json!([0.0, 1.5, 5.0]));
        assert_eq!(wall["projectId"], "P-mdl01");

        let beam = elements.iter().find(|e| e["id"] == "B-1").unwrap();
        assert_eq!(beam["position"], json!([0.0, 3.0, 0.0]));
    }

    #[tokio::test]
    async fn test_save_model_rejects_foreign_and_duplicate_elements() {
        let app = app();
        let project = json!({ "projectId": "P-x", "projectName": "X", "structureType": "Building" });

        let foreign = json!({ "project": project.clone(), "elements": [{ "elementId": "E", "projectId": "P-y" }] });
        let (status, _) = send(&app, Method::POST, "/api/bim/model", Some(foreign)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let duplicate = json!({ "project": project, "elements": [{ "elementId": "E" }, { "elementId": "E" }] });
        let (status, _) = send(&app, Method::POST, "/api/bim/model", Some(duplicate)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_save_model_cannot_take_elements_of_another_project() {
        let app = app();
        for id in ["P-aaaaa", "P-bbbbb"] {
            create(
                &app,
                json!({ "projectId": id, "projectName": id, "structureType": "Building" }),
            )
            .await;
        }

        let body = json!({
            "project": { "projectId": "P-aaaaa", "projectName": "P-aaaaa", "structureType": "Building" },
            "elements": [{ "elementId": "COL-P-bbbbb-1", "elementType": "IfcColumn", "positionData": "[0, 0, 0]" }]
        });
        let (status, error) = send(&app, Method::POST, "/api/bim/model", Some(body)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(error["code"], "CONFLICT");

        let (_, owner) = send(&app, Method::GET, "/api/bim/elements?projectId=P-bbbbb", None).await;
        assert_eq!(owner.as_array().unwrap().len(), 4);
        let (_, saver) = send(&app, Method::GET, "/api/bim/elements?projectId=P-aaaaa", None).await;
        assert_eq!(saver.as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_unknown_model_is_not_found() {
        let app = app();
        let (status, _) = send(&app, Method::GET, "/api/bim/model/P-none", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_health_reports_store_backend() {
        let app = app();
        let (status, body) = send(&app, Method::GET, "/api/v1/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["store"], "memory");
    }
}
