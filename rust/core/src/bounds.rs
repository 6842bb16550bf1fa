// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Ground-plane bounds of a model
//!
//! Accumulates element footprints on the X/Z plane. Used to fit the
//! top-down minimap around whatever the project currently contains.

use crate::anchor::AnchorConvention;
use crate::element::Element;

/// Axis-aligned footprint bounds on the ground (X/Z) plane
#[derive(Debug, Clone, PartialEq)]
pub struct FootprintBounds {
    /// Minimum X coordinate found
    pub min_x: f64,
    /// Minimum Z coordinate found
    pub min_z: f64,
    /// Maximum X coordinate found
    pub max_x: f64,
    /// Maximum Z coordinate found
    pub max_z: f64,
    /// Number of footprints added
    pub sample_count: usize,
}

impl FootprintBounds {
    /// Create new bounds initialized to invalid state
    pub fn new() -> Self {
        Self {
            min_x: f64::MAX,
            min_z: f64::MAX,
            max_x: f64::MIN,
            max_z: f64::MIN,
            sample_count: 0,
        }
    }

    /// Bounds of every element footprint, centered on render positions.
    pub fn from_elements<'a, I>(elements: I, anchors: &AnchorConvention) -> Self
    where
        I: IntoIterator<Item = &'a Element>,
    {
        let mut bounds = Self::new();
        for element in elements {
            let center = anchors.to_render_position(element);
            bounds.expand_rect(center.x, center.z, element.size.x, element.size.z);
        }
        bounds
    }

    /// Check if bounds are valid (at least one footprint added)
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.sample_count > 0
    }

    /// Expand bounds to include a rectangle centered at (x, z)
    #[inline]
    pub fn expand_rect(&mut self, x: f64, z: f64, width: f64, depth: f64) {
        if !(x.is_finite() && z.is_finite()) {
            return;
        }
        let hw = if width.is_finite() { width.abs() / 2.0 } else { 0.0 };
        let hd = if depth.is_finite() { depth.abs() / 2.0 } else { 0.0 };
        self.min_x = self.min_x.min(x - hw);
        self.min_z = self.min_z.min(z - hd);
        self.max_x = self.max_x.max(x + hw);
        self.max_z = self.max_z.max(z + hd);
        self.sample_count += 1;
    }

    /// Get centroid (center of the bounding rectangle)
    #[inline]
    pub fn centroid(&self) -> (f64, f64) {
        if !self.is_valid() {
            return (0.0, 0.0);
        }
        ((self.min_x + self.max_x) / 2.0, (self.min_z + self.max_z) / 2.0)
    }

    /// Length of the longer side; zero for invalid bounds
    #[inline]
    pub fn extent(&self) -> f64 {
        if !self.is_valid() {
            return 0.0;
        }
        (self.max_x - self.min_x).max(self.max_z - self.min_z)
    }

    /// Square bounds around the centroid, grown by `padding` on every side.
    ///
    /// Invalid bounds become a square of side `2 * padding` at the origin.
    pub fn padded_square(&self, padding: f64) -> Self {
        let (cx, cz) = self.centroid();
        let half = self.extent() / 2.0 + padding.max(0.0);
        Self {
            min_x: cx - half,
            min_z: cz - half,
            max_x: cx + half,
            max_z: cz + half,
            sample_count: self.sample_count.max(1),
        }
    }
}

impl Default for FootprintBounds {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Vec3;

    #[test]
    fn test_bounds_creation() {
        let bounds = FootprintBounds::new();
        assert!(!bounds.is_valid());
        assert_eq!(bounds.centroid(), (0.0, 0.0));
        assert_eq!(bounds.extent(), 0.0);
    }

    #[test]
    fn test_bounds_expand() {
        let mut bounds = FootprintBounds::new();
        bounds.expand_rect(0.0, 0.0, 2.0, 4.0);
        bounds.expand_rect(10.0, 1.0, 2.0, 2.0);

        assert!(bounds.is_valid());
        assert_eq!(bounds.min_x, -1.0);
        assert_eq!(bounds.max_x, 11.0);
        assert_eq!(bounds.min_z, -2.0);
        assert_eq!(bounds.max_z, 2.0);
        assert_eq!(bounds.centroid(), (5.0, 0.0));
        assert_eq!(bounds.extent(), 12.0);
    }

    #[test]
    fn test_non_finite_centers_are_ignored() {
        let mut bounds = FootprintBounds::new();
        bounds.expand_rect(f64::NAN, 0.0, 1.0, 1.0);
        assert!(!bounds.is_valid());
    }

    #[test]
    fn test_padded_square() {
        let mut bounds = FootprintBounds::new();
        bounds.expand_rect(0.0, 0.0, 10.0, 2.0);
        let square = bounds.padded_square(1.0);
        assert_eq!(square.min_x, -6.0);
        assert_eq!(square.max_x, 6.0);
        assert_eq!(square.min_z, -6.0);
        assert_eq!(square.max_z, 6.0);

        let empty = FootprintBounds::new().padded_square(5.0);
        assert_eq!((empty.min_x, empty.max_x), (-5.0, 5.0));
    }

    #[test]
    fn test_from_elements_uses_footprints() {
        let anchors = AnchorConvention::default();
        let elements = vec![
            Element::new(
                "A",
                "P",
                "Column",
                "",
                Vec3::new(-4.0, 0.0, -4.0),
                Vec3::new(0.5, 6.0, 0.5),
            ),
            Element::new(
                "B",
                "P",
                "Column",
                "",
                Vec3::new(4.0, 0.0, 4.0),
                Vec3::new(0.5, 6.0, 0.5),
            ),
        ];
        let bounds = FootprintBounds::from_elements(&elements, &anchors);
        assert_eq!(bounds.sample_count, 2);
        assert_eq!(bounds.min_x, -4.25);
        assert_eq!(bounds.max_z, 4.25);
    }
}
