// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-process element store, used when no database is configured.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use tokio::sync::RwLock;
use twinbim_core::{Element, ElementRecord, Project};

#[derive(Debug, Default)]
struct MemoryState {
    projects: BTreeMap<String, Project>,
    elements: FxHashMap<String, Element>,
}

impl MemoryState {
    fn put_elements(&mut self, elements: &[Element]) {
        for element in elements {
            self.elements
                .insert(element.element_id.clone(), element.clone());
        }
    }
}

/// Projects and elements held in memory behind one lock.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn list_projects(&self) -> Vec<Project> {
        self.state.read().await.projects.values().cloned().collect()
    }

    pub async fn project(&self, project_id: &str) -> Option<Project> {
        self.state.read().await.projects.get(project_id).cloned()
    }

    /// Insert a new project with its initial elements; `false` if the id is taken.
    pub async fn create_project(&self, project: &Project, elements: &[Element]) -> bool {
        let mut state = self.state.write().await;
        if state.projects.contains_key(&project.project_id) {
            return false;
        }
        state
            .projects
            .insert(project.project_id.clone(), project.clone());
        state.put_elements(elements);
        true
    }

    /// Remove a project and all of its elements; `false` if unknown.
    pub async fn delete_project(&self, project_id: &str) -> bool {
        let mut state = self.state.write().await;
        if state.projects.remove(project_id).is_none() {
            return false;
        }
        state.elements.retain(|_, e| e.project_id != project_id);
        true
    }

    /// Elements sorted by id, optionally limited to one project.
    pub async fn list_elements(&self, project_id: Option<&str>) -> Vec<Element> {
        let state = self.state.read().await;
        let mut elements: Vec<Element> = state
            .elements
            .values()
            .filter(|e| project_id.map_or(true, |id| e.project_id == id))
            .cloned()
            .collect();
        elements.sort_by(|a, b| a.element_id.cmp(&b.element_id));
        elements
    }

    /// Merge an update onto the stored element; `false` if unknown.
    pub async fn update_element(&self, record: &ElementRecord) -> bool {
        let mut state = self.state.write().await;
        match state.elements.get_mut(&record.element_id) {
            Some(element) => {
                element.apply_record(record);
                true
            }
            None => false,
        }
    }

    /// Upsert the project and replace all of its elements.
    ///
    /// Returns the id of the first element already owned by another project;
    /// nothing is written in that case.
    pub async fn save_model(&self, project: &Project, elements: &[Element]) -> Option<String> {
        let mut state = self.state.write().await;
        let taken = elements.iter().find(|element| {
            state
                .elements
                .get(&element.element_id)
                .is_some_and(|stored| stored.project_id != project.project_id)
        });
        if let Some(element) = taken {
            return Some(element.element_id.clone());
        }

        state
            .projects
            .insert(project.project_id.clone(), project.clone());
        state
            .elements
            .retain(|_, e| e.project_id != project.project_id);
        state.put_elements(elements);
        None
    }
}
