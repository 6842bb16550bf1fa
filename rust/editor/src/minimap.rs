// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Top-down minimap projection
//!
//! Projects element footprints (X/Z plane, render centers) and the primary
//! camera into a square pixel space. Map X follows world X, map Y follows
//! world Z. The projector only reads the collection; drawing the frame is the
//! host's job.

use nalgebra::Point2;

use crate::collection::ElementCollection;
use twinbim_core::{canonical_type, AnchorConvention, FootprintBounds, Vec3};

// =============================================================================
// Constants
// =============================================================================

/// Default minimap size in pixels.
pub const DEFAULT_SIZE: f64 = 200.0;

/// Inset between the map border and the mapped area, in pixels.
pub const DEFAULT_MARGIN: f64 = 4.0;

/// World-space padding around the model footprint.
pub const DEFAULT_PADDING: f64 = 10.0;

// =============================================================================
// Colors
// =============================================================================

/// 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const LIGHT_GRAY: Rgb = Rgb(211, 211, 211);
    pub const BROWN: Rgb = Rgb(165, 42, 42);
    pub const HOT_PINK: Rgb = Rgb(255, 105, 180);
}

/// Footprint color by element category.
pub fn footprint_color(element_type: &str, selected: bool) -> Rgb {
    if selected {
        return Rgb::HOT_PINK;
    }
    match canonical_type(element_type).as_str() {
        "wall" => Rgb::LIGHT_GRAY,
        _ => Rgb::BROWN,
    }
}

// =============================================================================
// Frame
// =============================================================================

/// Minimap layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MiniMapConfig {
    /// Side length of the square map, in pixels
    pub size: f64,
    pub margin: f64,
    /// World units added around the model bounds
    pub padding: f64,
}

impl Default for MiniMapConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            margin: DEFAULT_MARGIN,
            padding: DEFAULT_PADDING,
        }
    }
}

/// Axis-aligned rectangle in map pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapRect {
    pub min: Point2<f64>,
    pub max: Point2<f64>,
}

impl MapRect {
    pub fn center(&self) -> Point2<f64> {
        nalgebra::center(&self.min, &self.max)
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }
}

/// One projected element.
#[derive(Debug, Clone, PartialEq)]
pub struct Footprint {
    pub element_id: String,
    pub rect: MapRect,
    pub color: Rgb,
    pub selected: bool,
}

/// Everything the host needs to draw one minimap frame.
#[derive(Debug, Clone, PartialEq)]
pub struct MiniMapFrame {
    pub footprints: Vec<Footprint>,
    /// Camera position in map pixels, clamped to the mapped area
    pub camera_marker: Point2<f64>,
    /// `false` when the camera is outside the mapped area
    pub camera_visible: bool,
    /// World bounds mapped onto the square
    pub world: FootprintBounds,
    /// Number of updates so far
    pub frame: u64,
}

impl Default for MiniMapFrame {
    fn default() -> Self {
        Self {
            footprints: Vec::new(),
            camera_marker: Point2::origin(),
            camera_visible: false,
            world: FootprintBounds::new(),
            frame: 0,
        }
    }
}

// =============================================================================
// Projector
// =============================================================================

/// Per-frame minimap projector.
///
/// Footprints are rebuilt only when the collection revision or the selected
/// id changed since the previous update; the camera marker is recomputed on
/// every call.
#[derive(Debug, Clone)]
pub struct MiniMapProjector {
    config: MiniMapConfig,
    anchors: AnchorConvention,
    current: MiniMapFrame,
    cached_revision: Option<u64>,
    cached_selection: Option<String>,
}

impl MiniMapProjector {
    pub fn new(config: MiniMapConfig, anchors: AnchorConvention) -> Self {
        Self {
            config,
            anchors,
            current: MiniMapFrame::default(),
            cached_revision: None,
            cached_selection: None,
        }
    }

    pub fn config(&self) -> &MiniMapConfig {
        &self.config
    }

    /// Last computed frame.
    pub fn frame(&self) -> &MiniMapFrame {
        &self.current
    }

    /// Force footprints to be rebuilt on the next update.
    pub fn invalidate(&mut self) {
        self.cached_revision = None;
    }

    /// Compute the frame for the current camera position.
    pub fn update(
        &mut self,
        camera: &Vec3,
        elements: &ElementCollection,
        selected_id: Option<&str>,
    ) -> &MiniMapFrame {
        let stale = self.cached_revision != Some(elements.revision())
            || self.cached_selection.as_deref() != selected_id;
        if stale {
            self.rebuild(elements, selected_id);
        }

        let (marker, visible) = self.clamp_to_map(self.world_to_map(camera.x, camera.z));
        self.current.camera_marker = marker;
        self.current.camera_visible = visible;
        self.current.frame += 1;
        &self.current
    }

    fn rebuild(&mut self, elements: &ElementCollection, selected_id: Option<&str>) {
        self.current.world = FootprintBounds::from_elements(elements, &self.anchors)
            .padded_square(self.config.padding);

        let footprints = elements
            .iter()
            .map(|element| {
                let center = self.anchors.to_render_position(element);
                let hw = element.size.x / 2.0;
                let hd = element.size.z / 2.0;
                let selected = selected_id == Some(element.element_id.as_str());
                Footprint {
                    element_id: element.element_id.clone(),
                    rect: MapRect {
                        min: self.world_to_map(center.x - hw, center.z - hd),
                        max: self.world_to_map(center.x + hw, center.z + hd),
                    },
                    color: footprint_color(&element.element_type, selected),
                    selected,
                }
            })
            .collect();

        self.current.footprints = footprints;
        self.cached_revision = Some(elements.revision());
        self.cached_selection = selected_id.map(str::to_string);
    }

    /// Pixels per world unit.
    fn scale(&self) -> f64 {
        let world = &self.current.world;
        let span = (world.max_x - world.min_x).max(world.max_z - world.min_z);
        let inner = (self.config.size - 2.0 * self.config.margin).max(1.0);
        if span.is_finite() && span > 0.0 {
            inner / span
        } else {
            1.0
        }
    }

    /// Convert a ground-plane world point to map pixels (unclamped).
    pub fn world_to_map(&self, x: f64, z: f64) -> Point2<f64> {
        let world = &self.current.world;
        if !world.is_valid() {
            return Point2::new(self.config.size / 2.0, self.config.size / 2.0);
        }
        let scale = self.scale();
        Point2::new(
            self.config.margin + (x - world.min_x) * scale,
            self.config.margin + (z - world.min_z) * scale,
        )
    }

    /// Convert map pixels back to a ground-plane world point (click-to-world).
    pub fn map_to_world(&self, point: &Point2<f64>) -> Vec3 {
        let world = &self.current.world;
        if !world.is_valid() {
            return Vec3::zeros();
        }
        let scale = self.scale();
        Vec3::new(
            world.min_x + (point.x - self.config.margin) / scale,
            0.0,
            world.min_z + (point.y - self.config.margin) / scale,
        )
    }

    fn clamp_to_map(&self, point: Point2<f64>) -> (Point2<f64>, bool) {
        let lo = self.config.margin;
        let hi = (self.config.size - self.config.margin).max(lo);
        if !(point.x.is_finite() && point.y.is_finite()) {
            return (Point2::new(lo, lo), false);
        }
        let clamped = Point2::new(point.x.clamp(lo, hi), point.y.clamp(lo, hi));
        (clamped, clamped == point)
    }
}

impl Default for MiniMapProjector {
    fn default() -> Self {
        Self::new(MiniMapConfig::default(), AnchorConvention::default())
    }
}
