// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Structural elements and their dual wire representation
//!
//! [`Element`] is the decoded, always-valid form used by the editor and the
//! store. [`ElementRecord`] is what travels over the wire and into older
//! rows: discrete `positionX/Y/Z` fields, a legacy `positionData` string (or
//! array), or both.

use crate::error::{Error, Result};
use crate::vector::{self, encode, encode_fixed};
use crate::Vec3;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single structural unit of a project model.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub element_id: String,
    pub project_id: String,
    pub element_type: String,
    pub material: String,
    /// Persisted position (base point for base-anchored categories)
    pub position: Vec3,
    /// Extents along X/Y/Z, never negative
    pub size: Vec3,
}

impl Element {
    pub fn new(
        element_id: impl Into<String>,
        project_id: impl Into<String>,
        element_type: impl Into<String>,
        material: impl Into<String>,
        position: Vec3,
        size: Vec3,
    ) -> Self {
        Self {
            element_id: element_id.into(),
            project_id: project_id.into(),
            element_type: element_type.into(),
            material: material.into(),
            position: vector::sanitize(&position),
            size: clamp_size(&size),
        }
    }

    /// Resolve a wire record into an element; vector fields that are missing
    /// or unparseable become zero.
    pub fn from_record(record: &ElementRecord) -> Self {
        Self {
            element_id: record.element_id.clone(),
            project_id: record.project_id.clone().unwrap_or_default(),
            element_type: record.element_type.clone().unwrap_or_default(),
            material: record.material.clone().unwrap_or_default(),
            position: record.resolve_position(&Vec3::zeros()),
            size: record.resolve_size(&Vec3::zeros()),
        }
    }

    /// Wire record carrying both representations, mirror in shortest form.
    pub fn to_record(&self) -> ElementRecord {
        self.record_with(encode(&self.position), encode(&self.size))
    }

    /// Wire record with the legacy mirror written at fixed precision.
    pub fn to_record_fixed(&self, decimals: usize) -> ElementRecord {
        self.record_with(
            encode_fixed(&self.position, decimals),
            encode_fixed(&self.size, decimals),
        )
    }

    fn record_with(&self, position_data: String, size_data: String) -> ElementRecord {
        ElementRecord {
            element_id: self.element_id.clone(),
            project_id: Some(self.project_id.clone()),
            element_type: Some(self.element_type.clone()),
            material: Some(self.material.clone()),
            position_x: Some(self.position.x),
            position_y: Some(self.position.y),
            position_z: Some(self.position.z),
            size_x: Some(self.size.x),
            size_y: Some(self.size.y),
            size_z: Some(self.size.z),
            position_data: Some(Value::String(position_data)),
            size_data: Some(Value::String(size_data)),
        }
    }

    /// Legacy string mirror of the position.
    pub fn position_data(&self) -> String {
        encode(&self.position)
    }

    /// Legacy string mirror of the size.
    pub fn size_data(&self) -> String {
        encode(&self.size)
    }

    /// Merge an update record onto this element.
    ///
    /// Only fields the record carries are changed; vector components follow
    /// the same legacy-then-discrete overlay as a fresh decode, starting from
    /// the current values.
    pub fn apply_record(&mut self, record: &ElementRecord) {
        if let Some(material) = &record.material {
            self.material = material.clone();
        }
        if record.has_position() {
            self.position = record.resolve_position(&self.position);
        }
        if record.has_size() {
            self.size = record.resolve_size(&self.size);
        }
    }

    /// Reject elements that cannot be stored.
    pub fn validate(&self) -> Result<()> {
        if self.element_id.trim().is_empty() {
            return Err(Error::MissingField("elementId"));
        }
        Ok(())
    }
}

/// Wire form of an element, accepting either vector representation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementRecord {
    #[serde(default)]
    pub element_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_z: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_z: Option<f64>,

    /// Legacy bracketed string (or array) form of the position
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_data: Option<Value>,
    /// Legacy bracketed string (or array) form of the size
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_data: Option<Value>,
}

impl ElementRecord {
    /// Position resolved over `base`: legacy vector first, discrete fields win.
    pub fn resolve_position(&self, base: &Vec3) -> Vec3 {
        let legacy = vector::decode(self.position_data.as_ref(), *base);
        overlay(legacy, [self.position_x, self.position_y, self.position_z])
    }

    /// Size resolved like [`Self::resolve_position`], clamped non-negative.
    pub fn resolve_size(&self, base: &Vec3) -> Vec3 {
        let legacy = vector::decode(self.size_data.as_ref(), *base);
        clamp_size(&overlay(legacy, [self.size_x, self.size_y, self.size_z]))
    }

    pub fn has_position(&self) -> bool {
        has_vector(&self.position_data, [self.position_x, self.position_y, self.position_z])
    }

    pub fn has_size(&self) -> bool {
        has_vector(&self.size_data, [self.size_x, self.size_y, self.size_z])
    }
}

fn overlay(mut v: Vec3, discrete: [Option<f64>; 3]) -> Vec3 {
    for (i, component) in discrete.into_iter().enumerate() {
        if let Some(c) = component.filter(|c| c.is_finite()) {
            v[i] = c;
        }
    }
    v
}

fn has_vector(data: &Option<Value>, discrete: [Option<f64>; 3]) -> bool {
    let has_data = matches!(data, Some(v) if !v.is_null());
    has_data || discrete.iter().any(Option::is_some)
}

fn clamp_size(size: &Vec3) -> Vec3 {
    vector::sanitize(size).map(|c| c.max(0.0))
}
