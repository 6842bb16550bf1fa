// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Single-element selection and transform-gizmo attachment.

use crate::collection::ElementCollection;
use crate::render::{HandleMetadata, RenderLayer};
use twinbim_core::Element;

/// The selected element together with its live render handle.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection<H> {
    pub element: Element,
    pub handle: H,
}

/// Holds zero or one selection.
///
/// Selecting attaches the transform gizmo to the picked object and caches
/// the element id and size on it; replacing or clearing the selection
/// detaches the gizmo from the previous object.
#[derive(Debug, Clone)]
pub struct SelectionController<H> {
    current: Option<Selection<H>>,
}

impl<H> Default for SelectionController<H> {
    fn default() -> Self {
        Self { current: None }
    }
}

impl<H: Copy + Eq + std::fmt::Debug> SelectionController<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current selection unconditionally.
    pub fn select<R>(&mut self, element: Element, handle: H, render: &mut R)
    where
        R: RenderLayer<Handle = H>,
    {
        if let Some(previous) = self.current.take() {
            if previous.handle != handle {
                render.detach_transform(previous.handle);
            }
        }

        render.set_metadata(
            handle,
            HandleMetadata {
                element_id: element.element_id.clone(),
                size: element.size,
            },
        );
        render.attach_transform(handle);

        tracing::debug!(element_id = %element.element_id, ?handle, "Element selected");
        self.current = Some(Selection { element, handle });
    }

    /// Drop the selection and detach the gizmo.
    pub fn clear<R>(&mut self, render: &mut R)
    where
        R: RenderLayer<Handle = H>,
    {
        if let Some(previous) = self.current.take() {
            render.detach_transform(previous.handle);
            tracing::debug!(element_id = %previous.element.element_id, "Selection cleared");
        }
    }

    pub fn current(&self) -> Option<&Selection<H>> {
        self.current.as_ref()
    }

    pub fn selected(&self) -> Option<&Element> {
        self.current.as_ref().map(|s| &s.element)
    }

    pub fn handle(&self) -> Option<H> {
        self.current.as_ref().map(|s| s.handle)
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected().map(|e| e.element_id.as_str())
    }

    pub fn is_selected(&self, element_id: &str) -> bool {
        self.selected_id() == Some(element_id)
    }

    /// Re-read the selected element from the collection after a mutation.
    ///
    /// Returns `false` when the element is gone; the selection is kept as-is
    /// in that case and the caller decides whether to clear it.
    pub fn refresh(&mut self, elements: &ElementCollection) -> bool {
        let Some(selection) = self.current.as_mut() else {
            return false;
        };
        match elements.get(&selection.element.element_id) {
            Some(latest) => {
                if *latest != selection.element {
                    selection.element = latest.clone();
                }
                true
            }
            None => false,
        }
    }
}
