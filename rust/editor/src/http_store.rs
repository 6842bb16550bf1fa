// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! REST client for the TwinBIM element store.

use reqwest::{Response, StatusCode};
use serde::Serialize;

use crate::error::{Result, StoreError};
use crate::gateway::ElementStore;
use twinbim_core::{ElementRecord, Project};

/// [`ElementStore`] backed by the `/api/bim` HTTP API.
#[derive(Debug, Clone)]
pub struct HttpElementStore {
    base_url: String,
    http: reqwest::Client,
}

#[derive(Serialize)]
struct SaveModelRequest<'a> {
    project: &'a Project,
    elements: &'a [ElementRecord],
}

impl HttpElementStore {
    /// Create a client for the API rooted at `base_url`.
    pub fn new(base_url: &str) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client(base_url: &str, http: reqwest::Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/bim/{}", self.base_url, path)
    }
}

/// Turn non-success responses into errors; 404 becomes `NotFound(subject)`.
async fn check(resp: Response, subject: &str) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(StoreError::NotFound(subject.to_string()));
    }
    let body = resp.text().await.unwrap_or_default();
    Err(StoreError::Status {
        status: status.as_u16(),
        body,
    })
}

impl ElementStore for HttpElementStore {
    async fn list_projects(&self) -> Result<Vec<Project>> {
        let resp = self.http.get(self.url("projects")).send().await?;
        Ok(check(resp, "projects").await?.json().await?)
    }

    async fn list_elements(&self, project_id: &str) -> Result<Vec<ElementRecord>> {
        let resp = self
            .http
            .get(self.url("elements"))
            .query(&[("projectId", project_id)])
            .send()
            .await?;
        Ok(check(resp, project_id).await?.json().await?)
    }

    async fn create_project(&self, project: &Project) -> Result<Project> {
        let resp = self.http.post(self.url("project")).json(project).send().await?;
        let created: Project = check(resp, &project.project_name).await?.json().await?;
        tracing::info!(
            project_id = %created.project_id,
            project_name = %created.project_name,
            "Project created"
        );
        Ok(created)
    }

    async fn save_model(&self, project: &Project, elements: &[ElementRecord]) -> Result<()> {
        let resp = self
            .http
            .post(self.url("model"))
            .json(&SaveModelRequest { project, elements })
            .send()
            .await?;
        check(resp, &project.project_id).await?;
        Ok(())
    }

    async fn update_element(&self, record: &ElementRecord) -> Result<()> {
        let resp = self.http.put(self.url("element")).json(record).send().await?;
        check(resp, &record.element_id).await?;
        Ok(())
    }

    async fn delete_project(&self, project_id: &str) -> Result<()> {
        let resp = self
            .http
            .delete(self.url(&format!("project/{}", project_id)))
            .send()
            .await?;
        check(resp, project_id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalized() {
        let store = HttpElementStore::new("http://localhost:8080/");
        assert_eq!(store.base_url(), "http://localhost:8080");
        assert_eq!(store.url("element"), "http://localhost:8080/api/bim/element");
    }

    #[test]
    fn test_save_model_body_shape() {
        let project = Project::new("P-1", "Hall", twinbim_core::StructureType::Building, None);
        let records = vec![ElementRecord {
            element_id: "COL-P-1-1".into(),
            size_y: Some(6.0),
            ..Default::default()
        }];
        let body = serde_json::to_value(SaveModelRequest {
            project: &project,
            elements: &records,
        })
        .unwrap();

        assert_eq!(body["project"]["projectId"], "P-1");
        assert_eq!(body["project"]["structureType"], "Building");
        assert_eq!(body["elements"][0]["elementId"], "COL-P-1-1");
        assert_eq!(body["elements"][0]["sizeY"], 6.0);
    }
}
