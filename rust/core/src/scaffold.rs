// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parametric scaffolds for new projects
//!
//! A scaffold is the initial element set generated from a project's
//! structure template. Generation is pure; the caller persists the result.

use crate::element::Element;
use crate::project::{Project, StructureType, MAX_SPAN_COUNT};
use crate::Vec3;

/// Distance between neighbouring piers along X
pub const PIER_SPACING: f64 = 20.0;
/// X position of the first pier
pub const PIER_OFFSET: f64 = -30.0;
/// Pier extents (width, height, depth)
pub const PIER_SIZE: [f64; 3] = [3.0, 10.0, 3.0];
/// Deck Y position above the piers
pub const DECK_HEIGHT: f64 = 10.0;
/// Deck thickness and width (Y, Z); X spans the bridge
pub const DECK_SECTION: [f64; 2] = [1.0, 10.0];

/// Column grid half-pitch: columns sit at (±4, 0, ±4)
pub const COLUMN_GRID: f64 = 4.0;
/// Column extents (width, height, depth)
pub const COLUMN_SIZE: [f64; 3] = [0.5, 6.0, 0.5];

pub const PIER_TYPE: &str = "IfcPier";
pub const DECK_TYPE: &str = "IfcSlab";
pub const COLUMN_TYPE: &str = "IfcColumn";

const PIER_MATERIAL: &str = "Concrete C50";
const DECK_MATERIAL: &str = "Prestressed Concrete";
const COLUMN_MATERIAL: &str = "Steel Grade A";

/// Generate the scaffold for a project.
///
/// Unknown structure types produce an empty list.
pub fn generate(project: &Project) -> Vec<Element> {
    match project.structure_type {
        StructureType::Bridge => bridge(project),
        StructureType::Building => building(project),
        StructureType::Other(_) => Vec::new(),
    }
}

fn bridge(project: &Project) -> Vec<Element> {
    let spans = project.span_count().min(MAX_SPAN_COUNT);
    let pid = &project.project_id;
    let mut elements = Vec::with_capacity(spans as usize + 2);

    for i in 0..=spans {
        elements.push(Element::new(
            format!("P-{}-{}", pid, i + 1),
            pid.clone(),
            PIER_TYPE,
            PIER_MATERIAL,
            Vec3::new(f64::from(i) * PIER_SPACING + PIER_OFFSET, 0.0, 0.0),
            Vec3::from(PIER_SIZE),
        ));
    }

    elements.push(Element::new(
        format!("DECK-{}", pid),
        pid.clone(),
        DECK_TYPE,
        DECK_MATERIAL,
        Vec3::new(0.0, DECK_HEIGHT, 0.0),
        Vec3::new(f64::from(spans) * PIER_SPACING, DECK_SECTION[0], DECK_SECTION[1]),
    ));

    elements
}

fn building(project: &Project) -> Vec<Element> {
    let pid = &project.project_id;
    (0..4u32)
        .map(|i| {
            let x = f64::from(i % 2) * 2.0 * COLUMN_GRID - COLUMN_GRID;
            let z = f64::from(i / 2) * 2.0 * COLUMN_GRID - COLUMN_GRID;
            Element::new(
                format!("COL-{}-{}", pid, i + 1),
                pid.clone(),
                COLUMN_TYPE,
                COLUMN_MATERIAL,
                Vec3::new(x, 0.0, z),
                Vec3::from(COLUMN_SIZE),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashSet;

    fn project(structure_type: StructureType, span_count: Option<&str>) -> Project {
        Project {
            project_id: "P-ab12c".into(),
            project_name: "Test".into(),
            structure_type,
            span_count: span_count.map(String::from),
        }
    }

    #[test]
    fn test_bridge_two_spans() {
        let elements = generate(&project(StructureType::Bridge, Some("2")));
        let piers: Vec<_> = elements.iter().filter(|e| e.element_type == PIER_TYPE).collect();
        let decks: Vec<_> = elements.iter().filter(|e| e.element_type == DECK_TYPE).collect();

        assert_eq!(piers.len(), 3);
        assert_eq!(decks.len(), 1);
        let xs: Vec<f64> = piers.iter().map(|p| p.position.x).collect();
        assert_eq!(xs, vec![-30.0, -10.0, 10.0]);
        assert!(piers.iter().all(|p| p.size == Vec3::new(3.0, 10.0, 3.0)));
        assert_eq!(decks[0].size.x, 40.0);
        assert_eq!(decks[0].position, Vec3::new(0.0, 10.0, 0.0));
    }

    #[test]
    fn test_bridge_invalid_span_count_defaults_to_one() {
        for span in [None, Some(""), Some("abc")] {
            let elements = generate(&project(StructureType::Bridge, span));
            assert_eq!(elements.len(), 3, "span: {span:?}");
            assert_eq!(elements.last().unwrap().size.x, 20.0);
        }
    }

    #[test]
    fn test_bridge_span_count_is_capped() {
        let elements = generate(&project(StructureType::Bridge, Some("100000")));
        assert_eq!(elements.len(), MAX_SPAN_COUNT as usize + 2);
    }

    #[test]
    fn test_building_columns() {
        let elements = generate(&project(StructureType::Building, None));
        assert_eq!(elements.len(), 4);
        let positions: Vec<Vec3> = elements.iter().map(|e| e.position).collect();
        assert_eq!(
            positions,
            vec![
                Vec3::new(-4.0, 0.0, -4.0),
                Vec3::new(4.0, 0.0, -4.0),
                Vec3::new(-4.0, 0.0, 4.0),
                Vec3::new(4.0, 0.0, 4.0),
            ]
        );
        assert!(elements
            .iter()
            .all(|e| e.element_type == COLUMN_TYPE && e.size == Vec3::new(0.5, 6.0, 0.5)));
    }

    #[test]
    fn test_unknown_structure_is_empty() {
        let elements = generate(&project(StructureType::Other("Tunnel".into()), Some("3")));
        assert!(elements.is_empty());
    }

    #[test]
    fn test_ids_are_unique_and_scoped() {
        let elements = generate(&project(StructureType::Bridge, Some("5")));
        let ids: FxHashSet<&str> = elements.iter().map(|e| e.element_id.as_str()).collect();
        assert_eq!(ids.len(), elements.len());
        assert!(elements.iter().all(|e| e.element_id.contains("P-ab12c")));
        assert!(elements.iter().all(|e| e.project_id == "P-ab12c"));
        assert_eq!(elements[0].element_id, "P-P-ab12c-1");
        assert_eq!(elements.last().unwrap().element_id, "DECK-P-ab12c");
    }
}
