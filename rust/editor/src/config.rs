// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Edit session configuration loaded from environment variables.

use crate::minimap::MiniMapConfig;
use twinbim_core::{AnchorConvention, EDIT_PRECISION, MAX_PRECISION};

/// Edit session configuration.
#[derive(Debug, Clone)]
pub struct EditorConfig {
    /// Element types persisted at their base point.
    pub anchors: AnchorConvention,
    /// Decimals kept for dragged positions, at most `MAX_PRECISION`.
    pub edit_precision: usize,
    /// Minimap layout.
    pub minimap: MiniMapConfig,
    /// Base URL of the element store API.
    pub api_url: String,
}

impl EditorConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = MiniMapConfig::default();
        Self {
            anchors: std::env::var("BASE_ANCHORED_TYPES")
                .map(|list| AnchorConvention::parse_list(&list))
                .unwrap_or_default(),
            edit_precision: std::env::var("EDIT_PRECISION")
                .map(|raw| parse_precision(&raw))
                .unwrap_or(EDIT_PRECISION),
            minimap: MiniMapConfig {
                size: std::env::var("MINIMAP_SIZE")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .filter(|size: &f64| size.is_finite() && *size > 0.0)
                    .unwrap_or(defaults.size),
                ..defaults
            },
            api_url: std::env::var("TWINBIM_API_URL")
                .unwrap_or_else(|_| "http://localhost:8080".into()),
        }
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            anchors: AnchorConvention::default(),
            edit_precision: EDIT_PRECISION,
            minimap: MiniMapConfig::default(),
            api_url: "http://localhost:8080".into(),
        }
    }
}

/// Decimal count from text; falls back to `EDIT_PRECISION`, caps at `MAX_PRECISION`.
fn parse_precision(raw: &str) -> usize {
    raw.trim()
        .parse()
        .map_or(EDIT_PRECISION, |decimals: usize| decimals.min(MAX_PRECISION))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_precision() {
        assert_eq!(parse_precision("3"), 3);
        assert_eq!(parse_precision(" 0 "), 0);
        assert_eq!(parse_precision("400"), MAX_PRECISION);
        assert_eq!(parse_precision("-1"), EDIT_PRECISION);
        assert_eq!(parse_precision("two"), EDIT_PRECISION);
    }
}
