// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Persistence gateway
//!
//! Pushes local element state to the remote store. Local state is
//! authoritative: a failed save is logged and reported, never rolled back.
//! Every outgoing request carries an owned snapshot taken when the save was
//! issued, so edits made while a request is in flight cannot leak into it.

use std::future::Future;
use std::sync::Arc;

use crate::error::Result;
use twinbim_core::{Element, ElementRecord, Project};

/// Remote element store operations.
pub trait ElementStore: Send + Sync + 'static {
    fn list_projects(&self) -> impl Future<Output = Result<Vec<Project>>> + Send;

    fn list_elements(
        &self,
        project_id: &str,
    ) -> impl Future<Output = Result<Vec<ElementRecord>>> + Send;

    /// Create a project; the store scaffolds its default elements and
    /// returns the project with its assigned id.
    fn create_project(&self, project: &Project) -> impl Future<Output = Result<Project>> + Send;

    /// Replace every element of `project` with `elements`.
    fn save_model(
        &self,
        project: &Project,
        elements: &[ElementRecord],
    ) -> impl Future<Output = Result<()>> + Send;

    /// Merge one element update. Unknown ids fail with
    /// [`StoreError::NotFound`](crate::StoreError::NotFound).
    fn update_element(&self, record: &ElementRecord) -> impl Future<Output = Result<()>> + Send;

    fn delete_project(&self, project_id: &str) -> impl Future<Output = Result<()>> + Send;
}

/// Snapshot-and-send front of an [`ElementStore`].
#[derive(Debug)]
pub struct PersistenceGateway<S> {
    store: Arc<S>,
}

impl<S> Clone for PersistenceGateway<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: ElementStore> PersistenceGateway<S> {
    pub fn new(store: S) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    pub fn from_arc(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Save one element.
    ///
    /// The element is encoded before this returns; the future owns that
    /// record and a handle to the store, nothing else.
    pub fn save(&self, element: &Element) -> impl Future<Output = Result<()>> + Send + 'static {
        let store = Arc::clone(&self.store);
        let record = element.to_record();
        async move {
            let result = store.update_element(&record).await;
            match &result {
                Ok(()) => tracing::debug!(element_id = %record.element_id, "Element saved"),
                Err(err) => tracing::warn!(
                    element_id = %record.element_id,
                    error = %err,
                    "Element save failed, keeping local state"
                ),
            }
            result
        }
    }

    /// Replace a project's stored model with the given elements.
    pub fn save_model(
        &self,
        project: &Project,
        elements: &[Element],
    ) -> impl Future<Output = Result<()>> + Send + 'static {
        let store = Arc::clone(&self.store);
        let project = project.clone();
        let validated = snapshot_model(&project, elements);

        async move {
            let records = validated?;
            let count = records.len();
            let result = store.save_model(&project, &records).await;
            match &result {
                Ok(()) => tracing::info!(project_id = %project.project_id, count, "Model saved"),
                Err(err) => tracing::warn!(
                    project_id = %project.project_id,
                    error = %err,
                    "Model save failed"
                ),
            }
            result
        }
    }

    /// Fetch and decode a project's elements.
    pub async fn load(&self, project_id: &str) -> Result<Vec<Element>> {
        let records = self.store.list_elements(project_id).await?;
        tracing::debug!(project_id, count = records.len(), "Elements loaded");
        Ok(records.iter().map(Element::from_record).collect())
    }

    pub async fn projects(&self) -> Result<Vec<Project>> {
        self.store.list_projects().await
    }

    /// Create a project. The store assigns an id when `project_id` is empty.
    pub async fn create_project(&self, project: &Project) -> Result<Project> {
        self.store.create_project(project).await
    }

    pub async fn delete_project(&self, project_id: &str) -> Result<()> {
        self.store.delete_project(project_id).await
    }
}

/// Validate a model and encode it for a bulk save.
fn snapshot_model(project: &Project, elements: &[Element]) -> Result<Vec<ElementRecord>> {
    project.validate()?;
    let mut records = Vec::with_capacity(elements.len());
    for element in elements {
        element.validate()?;
        if element.project_id != project.project_id {
            return Err(twinbim_core::Error::ProjectMismatch {
                element_id: element.element_id.clone(),
                expected: project.project_id.clone(),
                found: element.project_id.clone(),
            }
            .into());
        }
        records.push(element.to_record());
    }
    Ok(records)
}
