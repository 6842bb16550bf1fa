// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for model validation
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised when validating projects and elements
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Span count {count} exceeds the maximum of {max}")]
    SpanCountTooLarge { count: u32, max: u32 },

    #[error("Element {element_id} belongs to project {found}, expected {expected}")]
    ProjectMismatch {
        element_id: String,
        expected: String,
        found: String,
    },

    #[error("Duplicate element id: {0}")]
    DuplicateElement(String),
}
