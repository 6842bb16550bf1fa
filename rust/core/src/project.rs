// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Projects: named element collections generated from a structure template.

use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Largest span count a scaffold will be generated for
pub const MAX_SPAN_COUNT: u32 = 200;

/// Span count used when the stored value is missing or unparseable
pub const DEFAULT_SPAN_COUNT: u32 = 1;

/// Structure template a project was created from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StructureType {
    Bridge,
    Building,
    /// Any other tag; kept verbatim so it round-trips.
    Other(String),
}

impl StructureType {
    pub fn as_str(&self) -> &str {
        match self {
            StructureType::Bridge => "Bridge",
            StructureType::Building => "Building",
            StructureType::Other(tag) => tag,
        }
    }
}

impl Default for StructureType {
    fn default() -> Self {
        StructureType::Other(String::new())
    }
}

impl From<String> for StructureType {
    fn from(tag: String) -> Self {
        let trimmed = tag.trim();
        if trimmed.eq_ignore_ascii_case("bridge") {
            StructureType::Bridge
        } else if trimmed.eq_ignore_ascii_case("building") {
            StructureType::Building
        } else {
            StructureType::Other(tag)
        }
    }
}

impl From<&str> for StructureType {
    fn from(tag: &str) -> Self {
        StructureType::from(tag.to_string())
    }
}

impl From<StructureType> for String {
    fn from(ty: StructureType) -> Self {
        match ty {
            StructureType::Other(tag) => tag,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for StructureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Project metadata.
///
/// `spanCount` is kept as the raw text it was stored with; older clients send
/// it as a string, newer ones as a number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default)]
    pub project_id: String,
    #[serde(default)]
    pub project_name: String,
    #[serde(default)]
    pub structure_type: StructureType,
    #[serde(
        default,
        deserialize_with = "span_count_from_wire",
        skip_serializing_if = "Option::is_none"
    )]
    pub span_count: Option<String>,
}

impl Project {
    pub fn new(
        project_id: impl Into<String>,
        project_name: impl Into<String>,
        structure_type: StructureType,
        span_count: Option<u32>,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            project_name: project_name.into(),
            structure_type,
            span_count: span_count.map(|n| n.to_string()),
        }
    }

    /// Parsed span count; missing, empty or invalid text means 1.
    pub fn span_count(&self) -> u32 {
        self.span_count
            .as_deref()
            .map(str::trim)
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(DEFAULT_SPAN_COUNT)
    }

    /// Check a project before it is created.
    pub fn validate(&self) -> Result<()> {
        if self.project_id.trim().is_empty() {
            return Err(Error::MissingField("projectId"));
        }
        if self.project_name.trim().is_empty() {
            return Err(Error::MissingField("projectName"));
        }
        let count = self.span_count();
        if count > MAX_SPAN_COUNT {
            return Err(Error::SpanCountTooLarge {
                count,
                max: MAX_SPAN_COUNT,
            });
        }
        Ok(())
    }
}

fn span_count_from_wire<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Wire {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(Option::<Wire>::deserialize(deserializer)?.map(|wire| match wire {
        Wire::Text(text) => text,
        Wire::Number(n) => n.to_string(),
    }))
}
