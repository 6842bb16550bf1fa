// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Request types for the API.

use serde::Deserialize;
use twinbim_core::{ElementRecord, Project};

/// Query string of the element listing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementsQuery {
    /// Restrict the listing to one project.
    pub project_id: Option<String>,
}

/// Body of a full model save.
#[derive(Debug, Clone, Deserialize)]
pub struct SaveModelRequest {
    pub project: Project,
    #[serde(default)]
    pub elements: Vec<ElementRecord>,
}
