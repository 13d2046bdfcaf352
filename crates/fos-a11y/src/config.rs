//! Configuration
//!
//! Plain structs with defaults; hosts may load overrides from JSON.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::Result;

/// ARIA relationship sync options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AriaSyncConfig {
    /// Selector for the container holding mirrored (re-rendered) content
    pub mirror_container_selector: String,

    /// Always write id lists, even where element reflection is available
    pub force_polyfill: bool,
}

impl Default for AriaSyncConfig {
    fn default() -> Self {
        Self {
            mirror_container_selector: "[data-aria-mirror]".to_string(),
            force_polyfill: false,
        }
    }
}

impl AriaSyncConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// F6 region navigation options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionFocusConfig {
    /// Boolean attribute marking a navigable region
    pub region_attribute: String,

    /// Class applied to the region focus moved into
    pub highlight_class: String,

    /// Key that, with Ctrl or Cmd, moves between regions
    pub navigation_key: String,

    /// Trailing-edge debounce for keydown handling
    pub debounce_ms: u64,

    /// CSS injected into `<head>` for highlighted regions
    pub highlight_style: String,
}

impl Default for RegionFocusConfig {
    fn default() -> Self {
        let region_attribute = "data-f6-region".to_string();
        let highlight_class = "f6-highlight".to_string();
        let highlight_style = format!(
            "[{region_attribute}].{highlight_class} {{ outline: 2px solid #0066ff; outline-offset: -2px; }}"
        );
        Self {
            region_attribute,
            highlight_class,
            navigation_key: "F6".to_string(),
            debounce_ms: 100,
            highlight_style,
        }
    }
}

impl RegionFocusConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}
