// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for edit session operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors surfaced by the edit session and the remote element store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Element not found: {0}")]
    NotFound(String),

    #[error("No element is selected")]
    NoSelection,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Store returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid data: {0}")]
    Invalid(String),
}

impl From<twinbim_core::Error> for StoreError {
    fn from(err: twinbim_core::Error) -> Self {
        StoreError::Invalid(err.to_string())
    }
}

impl StoreError {
    /// Whether retrying the same request could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            StoreError::Http(err) => err.is_timeout() || err.is_connect(),
            StoreError::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
