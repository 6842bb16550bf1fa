// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # TwinBIM Editor
//!
//! Interactive edit session for TwinBIM element geometry.
//!
//! ## Overview
//!
//! - **Selection**: one picked element at a time, with the transform gizmo
//!   attached to its render object
//! - **Transform sync**: converts dragged render centers back to persisted
//!   positions and updates the local collection immediately
//! - **Persistence**: snapshot-and-send saves to a remote [`ElementStore`],
//!   never rolled back on failure
//! - **Minimap**: top-down projection of all footprints plus the camera
//!
//! The editor does not draw. Hosts implement [`RenderLayer`] over their
//! scene graph and drive an [`EditSession`] from input and frame callbacks.
//!
//! ```rust,no_run
//! use twinbim_editor::{EditorConfig, HttpElementStore, PersistenceGateway};
//!
//! # async fn run() -> twinbim_editor::Result<()> {
//! let config = EditorConfig::from_env();
//! let gateway = PersistenceGateway::new(HttpElementStore::new(&config.api_url));
//! let elements = gateway.load("P-1a2b3").await?;
//! println!("{} elements", elements.len());
//! # Ok(())
//! # }
//! ```

pub mod collection;
pub mod config;
pub mod error;
pub mod gateway;
pub mod http_store;
pub mod minimap;
pub mod render;
pub mod selection;
pub mod session;
pub mod transform_sync;

pub use collection::ElementCollection;
pub use config::EditorConfig;
pub use error::{Result, StoreError};
pub use gateway::{ElementStore, PersistenceGateway};
pub use http_store::HttpElementStore;
pub use minimap::{Footprint, MiniMapConfig, MiniMapFrame, MiniMapProjector, Rgb};
pub use render::{HandleMetadata, RenderLayer};
pub use selection::{Selection, SelectionController};
pub use session::EditSession;
pub use transform_sync::TransformSync;
