// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Edit session
//!
//! Owns everything one open project needs: the element collection, the
//! selection, the anchor convention, the render layer, the persistence
//! gateway and the minimap. Hosts drive it from their input and frame loops.

use std::future::Future;

use crate::collection::ElementCollection;
use crate::config::EditorConfig;
use crate::error::{Result, StoreError};
use crate::gateway::{ElementStore, PersistenceGateway};
use crate::minimap::{MiniMapFrame, MiniMapProjector};
use crate::render::{HandleMetadata, RenderLayer};
use crate::selection::SelectionController;
use crate::transform_sync::TransformSync;
use twinbim_core::{AnchorConvention, Element, ElementRecord, Project, Vec3};

/// One mounted editing session over a single project.
pub struct EditSession<R: RenderLayer, S: ElementStore> {
    render: R,
    gateway: PersistenceGateway<S>,
    anchors: AnchorConvention,
    sync: TransformSync,
    elements: ElementCollection,
    selection: SelectionController<R::Handle>,
    minimap: MiniMapProjector,
    project_id: Option<String>,
    mounted: bool,
}

impl<R: RenderLayer, S: ElementStore> EditSession<R, S> {
    /// Mount a session on a render layer with an empty collection.
    pub fn mount(render: R, gateway: PersistenceGateway<S>, config: &EditorConfig) -> Self {
        tracing::debug!(
            base_anchored = ?config.anchors.base_anchored_types(),
            precision = config.edit_precision,
            "Edit session mounted"
        );
        Self {
            render,
            gateway,
            anchors: config.anchors.clone(),
            sync: TransformSync::new(config.edit_precision),
            elements: ElementCollection::new(),
            selection: SelectionController::new(),
            minimap: MiniMapProjector::new(config.minimap, config.anchors.clone()),
            project_id: None,
            mounted: true,
        }
    }

    /// Replace the collection with already-decoded elements.
    pub fn load(&mut self, project_id: &str, elements: Vec<Element>) {
        self.selection.clear(&mut self.render);
        self.elements = ElementCollection::from_elements(elements);
        self.project_id = Some(project_id.to_string());
        self.minimap.invalidate();
        tracing::info!(project_id, count = self.elements.len(), "Project loaded");
    }

    /// Replace the collection with wire records.
    pub fn load_records(&mut self, project_id: &str, records: &[ElementRecord]) {
        self.load(project_id, records.iter().map(Element::from_record).collect());
    }

    /// Fetch a project's elements from the store and load them.
    pub async fn fetch(&mut self, project_id: &str) -> Result<usize> {
        let elements = self.gateway.load(project_id).await?;
        self.load(project_id, elements);
        Ok(self.elements.len())
    }

    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn elements(&self) -> &ElementCollection {
        &self.elements
    }

    pub fn anchors(&self) -> &AnchorConvention {
        &self.anchors
    }

    pub fn gateway(&self) -> &PersistenceGateway<S> {
        &self.gateway
    }

    pub fn render(&self) -> &R {
        &self.render
    }

    pub fn render_mut(&mut self) -> &mut R {
        &mut self.render
    }

    pub fn selection(&self) -> &SelectionController<R::Handle> {
        &self.selection
    }

    /// Render-space center of an element.
    pub fn render_position(&self, element_id: &str) -> Option<Vec3> {
        self.elements
            .get(element_id)
            .map(|e| self.anchors.to_render_position(e))
    }

    /// Render centers of every element, in collection order.
    pub fn render_positions(&self) -> impl Iterator<Item = (&Element, Vec3)> + '_ {
        self.elements
            .iter()
            .map(|e| (e, self.anchors.to_render_position(e)))
    }

    /// Select the element rendered by `handle`.
    pub fn pick(&mut self, element_id: &str, handle: R::Handle) -> Result<()> {
        let element = self
            .elements
            .get(element_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(element_id.to_string()))?;
        self.selection.select(element, handle, &mut self.render);
        Ok(())
    }

    pub fn deselect(&mut self) {
        self.selection.clear(&mut self.render);
    }

    /// Feed one gizmo manipulation event for `handle`.
    ///
    /// Events for anything but the selected handle are ignored; deselected
    /// objects keep their metadata but no longer drive the collection.
    pub fn on_transform(&mut self, handle: R::Handle) -> Option<Vec3> {
        if self.selection.handle() != Some(handle) {
            tracing::trace!(?handle, "Transform event for unselected handle, skipped");
            return None;
        }
        let written = self
            .sync
            .on_object_change(handle, &self.render, &mut self.elements, &self.anchors)?;
        self.selection.refresh(&self.elements);
        Some(written)
    }

    /// Preview a property-form edit on the selected element.
    ///
    /// Updates the collection and moves/resizes the selected render object;
    /// nothing is sent to the store until [`save_selected`](Self::save_selected).
    pub fn apply_form_edit(&mut self, edit: &ElementRecord) -> Result<()> {
        let (element_id, handle) = match self.selection.current() {
            Some(current) => (current.element.element_id.clone(), current.handle),
            None => return Err(StoreError::NoSelection),
        };
        if !self.sync.apply_edit(&mut self.elements, &element_id, edit) {
            return Err(StoreError::NotFound(element_id));
        }
        self.selection.refresh(&self.elements);

        if let Some(element) = self.elements.get(&element_id) {
            let center = self.anchors.to_render_position(element);
            self.render.set_metadata(
                handle,
                HandleMetadata {
                    element_id: element_id.clone(),
                    size: element.size,
                },
            );
            self.render.place(handle, center, element.size);
        }
        Ok(())
    }

    /// Save the selected element as it is right now.
    ///
    /// The returned future owns its snapshot; later drags or form edits do
    /// not change what it sends.
    pub fn save_selected(&self) -> Result<impl Future<Output = Result<()>> + Send + 'static> {
        let element_id = self.selection.selected_id().ok_or(StoreError::NoSelection)?;
        let element = self
            .elements
            .get(element_id)
            .ok_or_else(|| StoreError::NotFound(element_id.to_string()))?;
        Ok(self.gateway.save(element))
    }

    /// Replace the stored model of `project` with the local collection.
    pub fn save_model(
        &self,
        project: &Project,
    ) -> impl Future<Output = Result<()>> + Send + 'static {
        self.gateway.save_model(project, self.elements.as_slice())
    }

    /// Per-frame minimap update from the primary camera.
    pub fn on_frame(&mut self) -> &MiniMapFrame {
        let camera = self.render.camera_position();
        self.minimap
            .update(&camera, &self.elements, self.selection.selected_id())
    }

    /// Release the gizmo. Also runs on drop.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.selection.clear(&mut self.render);
        self.mounted = false;
        tracing::debug!(project_id = ?self.project_id, "Edit session unmounted");
    }
}

impl<R: RenderLayer, S: ElementStore> Drop for EditSession<R, S> {
    fn drop(&mut self) {
        self.unmount();
    }
}
