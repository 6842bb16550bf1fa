// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Local, authoritative element collection with an id index.

use rustc_hash::FxHashMap;
use twinbim_core::{Element, ElementRecord};

/// In-memory elements of the open project.
///
/// Lookups and single-element replacements are O(1). `revision` increases on
/// every mutation so frame-driven readers can skip unchanged state.
#[derive(Debug, Clone, Default)]
pub struct ElementCollection {
    elements: Vec<Element>,
    index: FxHashMap<String, usize>,
    revision: u64,
}

impl ElementCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from decoded elements; a repeated id replaces the earlier entry.
    pub fn from_elements(elements: impl IntoIterator<Item = Element>) -> Self {
        let mut collection = Self::new();
        for element in elements {
            match collection.index.get(&element.element_id) {
                Some(&slot) => collection.elements[slot] = element,
                None => {
                    collection
                        .index
                        .insert(element.element_id.clone(), collection.elements.len());
                    collection.elements.push(element);
                }
            }
        }
        collection
    }

    /// Build from wire records, decoding each with the usual fallbacks.
    pub fn from_records(records: &[ElementRecord]) -> Self {
        Self::from_elements(records.iter().map(Element::from_record))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn get(&self, element_id: &str) -> Option<&Element> {
        self.index.get(element_id).map(|&slot| &self.elements[slot])
    }

    pub fn contains(&self, element_id: &str) -> bool {
        self.index.contains_key(element_id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Element> {
        self.elements.iter()
    }

    pub fn as_slice(&self) -> &[Element] {
        &self.elements
    }

    /// Mutate one element in place. Returns `false` for unknown ids.
    ///
    /// The element id itself is restored if the closure changes it, so the
    /// index cannot go stale.
    pub fn update<F>(&mut self, element_id: &str, f: F) -> bool
    where
        F: FnOnce(&mut Element),
    {
        let Some(&slot) = self.index.get(element_id) else {
            return false;
        };
        let element = &mut self.elements[slot];
        f(element);
        if element.element_id != element_id {
            element.element_id = element_id.to_string();
        }
        self.revision += 1;
        true
    }

    /// Replace the element with the same id, returning the previous value.
    pub fn replace(&mut self, element: Element) -> Option<Element> {
        let slot = *self.index.get(&element.element_id)?;
        self.revision += 1;
        Some(std::mem::replace(&mut self.elements[slot], element))
    }
}

impl<'a> IntoIterator for &'a ElementCollection {
    type Item = &'a Element;
    type IntoIter = std::slice::Iter<'a, Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use twinbim_core::Vec3;

    fn element(id: &str, x: f64) -> Element {
        Element::new(id, "P", "Beam", "Steel", Vec3::new(x, 0.0, 0.0), Vec3::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn test_lookup_by_id() {
        let collection =
            ElementCollection::from_elements(vec![element("A", 1.0), element("B", 2.0)]);
        assert_eq!(collection.len(), 2);
        assert_eq!(collection.get("B").unwrap().position.x, 2.0);
        assert!(collection.get("C").is_none());
    }

    #[test]
    fn test_duplicate_ids_keep_last() {
        let collection =
            ElementCollection::from_elements(vec![element("A", 1.0), element("A", 5.0)]);
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.get("A").unwrap().position.x, 5.0);
    }

    #[test]
    fn test_update_touches_only_target() {
        let mut collection =
            ElementCollection::from_elements(vec![element("A", 1.0), element("B", 2.0)]);
        let before_b = collection.get("B").cloned();
        let revision = collection.revision();

        assert!(collection.update("A", |e| e.position.x = 9.0));
        assert_eq!(collection.get("A").unwrap().position.x, 9.0);
        assert_eq!(collection.get("B").cloned(), before_b);
        assert_eq!(collection.revision(), revision + 1);

        assert!(!collection.update("missing", |e| e.position.x = 0.0));
        assert_eq!(collection.revision(), revision + 1);
    }

    #[test]
    fn test_update_cannot_rename() {
        let mut collection = ElementCollection::from_elements(vec![element("A", 1.0)]);
        collection.update("A", |e| e.element_id = "Z".into());
        assert!(collection.contains("A"));
        assert_eq!(collection.get("A").unwrap().element_id, "A");
    }

    #[test]
    fn test_replace() {
        let mut collection = ElementCollection::from_elements(vec![element("A", 1.0)]);
        let old = collection.replace(element("A", 3.0)).unwrap();
        assert_eq!(old.position.x, 1.0);
        assert!(collection.replace(element("B", 0.0)).is_none());
        assert_eq!(collection.len(), 1);
    }
}
