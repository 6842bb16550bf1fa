// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # TwinBIM Core
//!
//! Data model and pure geometry rules shared by the TwinBIM editor and the
//! element store.
//!
//! ## Overview
//!
//! - **Vector codec**: reads element vectors from either discrete numeric
//!   fields or the legacy bracketed string form, and writes both
//! - **Anchoring**: maps persisted base positions of base-anchored
//!   categories (columns, walls, slabs by default) to render centers and back
//! - **Scaffolds**: parametric initial element sets for bridge and building
//!   templates
//!
//! ## Quick Start
//!
//! ```rust
//! use twinbim_core::{scaffold, AnchorConvention, Project, StructureType};
//!
//! let project = Project::new("P-1", "Tower", StructureType::Building, None);
//! let anchors = AnchorConvention::default();
//!
//! for element in scaffold::generate(&project) {
//!     let center = anchors.to_render_position(&element);
//!     assert_eq!(center.y, element.position.y + element.size.y / 2.0);
//! }
//! ```

pub mod anchor;
pub mod bounds;
pub mod element;
pub mod error;
pub mod project;
pub mod scaffold;
pub mod vector;

/// Three-component spatial vector used for positions and sizes
pub type Vec3 = nalgebra::Vector3<f64>;

pub use anchor::{canonical_type, AnchorConvention, DEFAULT_BASE_ANCHORED};
pub use bounds::FootprintBounds;
pub use element::{Element, ElementRecord};
pub use error::{Error, Result};
pub use project::{Project, StructureType, MAX_SPAN_COUNT};
pub use vector::{EDIT_PRECISION, MAX_PRECISION};
