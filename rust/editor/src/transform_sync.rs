// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Optimistic local updates driven by the transform gizmo and the property form
//!
//! Runs inside the interaction callback on every manipulation event, so it
//! only ever touches the one element it resolves by id. Nothing here talks to
//! the remote store.

use crate::collection::ElementCollection;
use crate::render::RenderLayer;
use twinbim_core::vector::round_to;
use twinbim_core::{AnchorConvention, ElementRecord, Vec3, EDIT_PRECISION, MAX_PRECISION};

/// Writes render-space edits back into the collection as persisted values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformSync {
    precision: usize,
}

impl Default for TransformSync {
    fn default() -> Self {
        Self {
            precision: EDIT_PRECISION,
        }
    }
}

impl TransformSync {
    /// `precision` is the number of decimals kept for dragged positions,
    /// capped at [`MAX_PRECISION`].
    pub fn new(precision: usize) -> Self {
        Self {
            precision: precision.min(MAX_PRECISION),
        }
    }

    pub fn precision(&self) -> usize {
        self.precision
    }

    /// Handle one manipulation event of the gizmo attached to `handle`.
    ///
    /// Reads the object's center and cached size, converts to the persisted
    /// anchor and stores it on the matching element. Returns the written
    /// position, or `None` when the object carries no usable metadata (normal
    /// while the gizmo is being attached or detached).
    pub fn on_object_change<R: RenderLayer>(
        &self,
        handle: R::Handle,
        render: &R,
        elements: &mut ElementCollection,
        anchors: &AnchorConvention,
    ) -> Option<Vec3> {
        let Some(metadata) = render.metadata(handle) else {
            tracing::trace!(?handle, "Transform event without element metadata, skipped");
            return None;
        };
        let center = render.position(handle)?;
        let element_type = &elements.get(&metadata.element_id)?.element_type;

        let persisted = round_to(
            &anchors.to_persisted_position(&center, &metadata.size, element_type),
            self.precision,
        );

        elements
            .update(&metadata.element_id, |e| e.position = persisted)
            .then_some(persisted)
    }

    /// Apply a property-form edit (real-time preview) to one element.
    ///
    /// Only fields present in `edit` change; vector fields accept discrete
    /// components or the legacy string form.
    pub fn apply_edit(
        &self,
        elements: &mut ElementCollection,
        element_id: &str,
        edit: &ElementRecord,
    ) -> bool {
        elements.update(element_id, |e| e.apply_record(edit))
    }
}
