// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Storage backend selection.

use std::sync::Arc;

use twinbim_core::{Element, ElementRecord, Project};

use super::memory::MemoryStore;
use super::postgres::PgStore;
use crate::config::Config;
use crate::error::ApiError;

/// Element store behind the REST API.
#[derive(Debug, Clone)]
pub enum BimStore {
    Postgres(PgStore),
    Memory(Arc<MemoryStore>),
}

impl BimStore {
    /// PostgreSQL when `DATABASE_URL` is set, memory otherwise.
    pub async fn from_config(config: &Config) -> Result<Self, ApiError> {
        match &config.database_url {
            Some(url) => Ok(BimStore::Postgres(
                PgStore::connect(url, config.database_max_connections).await?,
            )),
            None => {
                tracing::warn!("DATABASE_URL not set, using in-memory element store");
                Ok(Self::memory())
            }
        }
    }

    pub fn memory() -> Self {
        BimStore::Memory(Arc::new(MemoryStore::new()))
    }

    pub fn backend(&self) -> &'static str {
        match self {
            BimStore::Postgres(_) => "postgres",
            BimStore::Memory(_) => "memory",
        }
    }

    pub async fn list_projects(&self) -> Result<Vec<Project>, ApiError> {
        match self {
            BimStore::Postgres(db) => Ok(db.list_projects().await?),
            BimStore::Memory(mem) => Ok(mem.list_projects().await),
        }
    }

    pub async fn project(&self, project_id: &str) -> Result<Option<Project>, ApiError> {
        match self {
            BimStore::Postgres(db) => Ok(db.project(project_id).await?),
            BimStore::Memory(mem) => Ok(mem.project(project_id).await),
        }
    }

    /// Insert a new project and its scaffold; `Conflict` if the id is taken.
    pub async fn create_project(
        &self,
        project: &Project,
        elements: &[Element],
    ) -> Result<(), ApiError> {
        let created = match self {
            BimStore::Postgres(db) => db.create_project(project, elements).await?,
            BimStore::Memory(mem) => mem.create_project(project, elements).await,
        };
        if created {
            Ok(())
        } else {
            Err(ApiError::Conflict(format!(
                "project {} already exists",
                project.project_id
            )))
        }
    }

    pub async fn delete_project(&self, project_id: &str) -> Result<(), ApiError> {
        let deleted = match self {
            BimStore::Postgres(db) => db.delete_project(project_id).await?,
            BimStore::Memory(mem) => mem.delete_project(project_id).await,
        };
        if deleted {
            Ok(())
        } else {
            Err(ApiError::NotFound(format!("project {}", project_id)))
        }
    }

    pub async fn list_elements(&self, project_id: Option<&str>) -> Result<Vec<Element>, ApiError> {
        match self {
            BimStore::Postgres(db) => Ok(db.list_elements(project_id).await?),
            BimStore::Memory(mem) => Ok(mem.list_elements(project_id).await),
        }
    }

    pub async fn update_element(&self, record: &ElementRecord) -> Result<(), ApiError> {
        let updated = match self {
            BimStore::Postgres(db) => db.update_element(record).await?,
            BimStore::Memory(mem) => mem.update_element(record).await,
        };
        if updated {
            Ok(())
        } else {
            Err(ApiError::NotFound(format!("element {}", record.element_id)))
        }
    }

    /// Replace a project's elements; `Conflict` if an element id is owned by
    /// another project.
    pub async fn save_model(
        &self,
        project: &Project,
        elements: &[Element],
    ) -> Result<(), ApiError> {
        let taken = match self {
            BimStore::Postgres(db) => db.save_model(project, elements).await?,
            BimStore::Memory(mem) => mem.save_model(project, elements).await,
        };
        match taken {
            None => Ok(()),
            Some(element_id) => Err(ApiError::Conflict(format!(
                "element {} belongs to another project",
                element_id
            ))),
        }
    }
}
