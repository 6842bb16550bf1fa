// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Response types for the API.

use serde::{Deserialize, Serialize};
use twinbim_core::{AnchorConvention, Element, Project};

/// Render-ready model of one project.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelResponse {
    pub model_name: String,
    pub elements: Vec<ModelElement>,
}

/// Element with its render-space center.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelElement {
    pub id: String,
    #[serde(rename = "type")]
    pub element_type: String,
    /// Render center, not the persisted anchor.
    pub position: [f64; 3],
    pub size: [f64; 3],
    pub material: String,
    pub project_id: String,
}

impl ModelResponse {
    pub fn new(project: &Project, elements: &[Element], anchors: &AnchorConvention) -> Self {
        Self {
            model_name: project.project_name.clone(),
            elements: elements
                .iter()
                .map(|element| {
                    let center = anchors.to_render_position(element);
                    ModelElement {
                        id: element.element_id.clone(),
                        element_type: element.element_type.clone(),
                        position: [center.x, center.y, center.z],
                        size: [element.size.x, element.size.y, element.size.z],
                        material: element.material.clone(),
                        project_id: element.project_id.clone(),
                    }
                })
                .collect(),
        }
    }
}
