// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Anchoring convention between persisted and render positions
//!
//! Persisted positions of base-anchored categories denote the element's
//! minimum-Y point, while the scene graph places boxes by their volumetric
//! center. Which categories are base-anchored is configuration: recorded
//! data has been written under more than one convention.

use crate::element::Element;
use crate::vector::sanitize;
use crate::Vec3;
use rustc_hash::FxHashSet;

/// Categories treated as base-anchored when nothing else is configured
pub const DEFAULT_BASE_ANCHORED: [&str; 3] = ["Column", "Wall", "Slab"];

/// Normalize an element type tag for comparison.
///
/// Case-insensitive, with an optional `Ifc` prefix removed, so `IfcColumn`,
/// `COLUMN` and `Column` compare equal.
pub fn canonical_type(tag: &str) -> String {
    let trimmed = tag.trim();
    let stripped = match trimmed.get(..3) {
        Some(prefix) if prefix.eq_ignore_ascii_case("ifc") && trimmed.len() > 3 => &trimmed[3..],
        _ => trimmed,
    };
    stripped.to_ascii_lowercase()
}

/// Set of base-anchored element categories plus the position mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorConvention {
    base_anchored: FxHashSet<String>,
}

impl AnchorConvention {
    /// Build a convention from category tags (any casing, `Ifc` prefix optional).
    pub fn new<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let base_anchored = types
            .into_iter()
            .map(|t| canonical_type(t.as_ref()))
            .filter(|t| !t.is_empty())
            .collect();
        Self { base_anchored }
    }

    /// Parse a comma-separated list such as `"Column, Wall, Slab"`.
    pub fn parse_list(list: &str) -> Self {
        Self::new(list.split(','))
    }

    /// Convention where every category is center-anchored.
    pub fn center_only() -> Self {
        Self {
            base_anchored: FxHashSet::default(),
        }
    }

    #[inline]
    pub fn is_base_anchored(&self, element_type: &str) -> bool {
        self.base_anchored.contains(&canonical_type(element_type))
    }

    /// Configured categories in canonical (lowercase) form, sorted.
    pub fn base_anchored_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.base_anchored.iter().map(String::as_str).collect();
        types.sort_unstable();
        types
    }

    /// Render (center) position of a stored element.
    pub fn to_render_position(&self, element: &Element) -> Vec3 {
        self.render_position(&element.position, &element.size, &element.element_type)
    }

    /// `renderY = baseY + sizeY / 2` for base-anchored categories, identity otherwise.
    pub fn render_position(&self, position: &Vec3, size: &Vec3, element_type: &str) -> Vec3 {
        let mut out = sanitize(position);
        if self.is_base_anchored(element_type) {
            out.y += half_height(size);
        }
        out
    }

    /// Inverse of [`Self::render_position`]: `baseY = centerY - sizeY / 2`.
    pub fn to_persisted_position(&self, render: &Vec3, size: &Vec3, element_type: &str) -> Vec3 {
        let mut out = sanitize(render);
        if self.is_base_anchored(element_type) {
            out.y -= half_height(size);
        }
        out
    }
}

impl Default for AnchorConvention {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_ANCHORED)
    }
}

#[inline]
fn half_height(size: &Vec3) -> f64 {
    let h = size.y;
    if h.is_finite() {
        h.max(0.0) / 2.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn element(element_type: &str, position: Vec3, size: Vec3) -> Element {
        Element::new("E-1", "P-1", element_type, "Concrete", position, size)
    }

    #[test]
    fn test_canonical_type() {
        assert_eq!(canonical_type("IfcColumn"), "column");
        assert_eq!(canonical_type("  COLUMN "), "column");
        assert_eq!(canonical_type("column"), "column");
        assert_eq!(canonical_type("Ifc"), "ifc");
        assert_eq!(canonical_type("Beam"), "beam");
    }

    #[test]
    fn test_default_membership() {
        let anchors = AnchorConvention::default();
        assert!(anchors.is_base_anchored("IfcColumn"));
        assert!(anchors.is_base_anchored("Wall"));
        assert!(anchors.is_base_anchored("IFCSLAB"));
        assert!(!anchors.is_base_anchored("Beam"));
        assert!(!anchors.is_base_anchored("IfcPier"));
        assert_eq!(anchors.base_anchored_types(), vec!["column", "slab", "wall"]);
    }

    #[test]
    fn test_parse_list_ignores_blanks() {
        let anchors = AnchorConvention::parse_list("Column, ,IfcPier,");
        assert!(anchors.is_base_anchored("Pier"));
        assert!(!anchors.is_base_anchored("Wall"));
        assert_eq!(anchors.base_anchored_types().len(), 2);
    }

    #[test]
    fn test_column_render_position_is_centered() {
        let anchors = AnchorConvention::default();
        let col = element("IfcColumn", Vec3::new(-4.0, 0.0, 4.0), Vec3::new(0.5, 6.0, 0.5));
        assert_eq!(anchors.to_render_position(&col), Vec3::new(-4.0, 3.0, 4.0));
    }

    #[test]
    fn test_inverse_law_for_base_anchored_types() {
        let anchors = AnchorConvention::default();
        let size = Vec3::new(2.0, 3.7, 1.0);
        for ty in ["Column", "Wall", "Slab"] {
            let base = Vec3::new(1.1, -2.3, 4.4);
            let render = anchors.render_position(&base, &size, ty);
            assert_relative_eq!(render.y, base.y + 1.85, epsilon = 1e-12);
            let back = anchors.to_persisted_position(&render, &size, ty);
            assert_relative_eq!(back, base, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_identity_for_center_anchored_types() {
        let anchors = AnchorConvention::default();
        let size = Vec3::new(2.0, 10.0, 1.0);
        let p = Vec3::new(1.0, 2.0, 3.0);
        for ty in ["Beam", "IfcPier", "Unknown"] {
            assert_eq!(anchors.render_position(&p, &size, ty), p);
            assert_eq!(anchors.to_persisted_position(&p, &size, ty), p);
        }
    }

    #[test]
    fn test_center_only_convention() {
        let anchors = AnchorConvention::center_only();
        let p = Vec3::new(0.0, 1.0, 0.0);
        assert_eq!(anchors.render_position(&p, &Vec3::new(1.0, 4.0, 1.0), "Column"), p);
    }

    #[test]
    fn test_bad_input_is_total() {
        let anchors = AnchorConvention::default();
        let render = Vec3::new(f64::NAN, 5.0, 1.0);
        let size = Vec3::new(1.0, f64::INFINITY, 1.0);
        assert_eq!(
            anchors.to_persisted_position(&render, &size, "Column"),
            Vec3::new(0.0, 5.0, 1.0)
        );
    }
}
