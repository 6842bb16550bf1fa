// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Render layer contract
//!
//! The editor never draws. It talks to whatever scene graph hosts the
//! element boxes through [`RenderLayer`], addressing objects by an opaque
//! copyable handle (an entity id, a slot index, ...).

use std::fmt::Debug;
use twinbim_core::Vec3;

/// Identifying data cached on a render object when it is selected.
///
/// The size is cached so per-frame transform updates do not re-decode the
/// element.
#[derive(Debug, Clone, PartialEq)]
pub struct HandleMetadata {
    pub element_id: String,
    pub size: Vec3,
}

/// Scene-graph operations the edit session depends on.
pub trait RenderLayer {
    /// Opaque reference to a live render object
    type Handle: Copy + Eq + Debug;

    /// Current center position of the object, if it still exists.
    fn position(&self, handle: Self::Handle) -> Option<Vec3>;

    /// Metadata cached on the object, if any.
    fn metadata(&self, handle: Self::Handle) -> Option<&HandleMetadata>;

    fn set_metadata(&mut self, handle: Self::Handle, metadata: HandleMetadata);

    /// Move/resize the object (center position, full extents).
    fn place(&mut self, handle: Self::Handle, center: Vec3, size: Vec3);

    /// Attach the interactive transform gizmo to the object.
    fn attach_transform(&mut self, handle: Self::Handle);

    fn detach_transform(&mut self, handle: Self::Handle);

    /// Primary camera position, polled once per frame.
    fn camera_position(&self) -> Vec3;
}
