//! Engine configuration, loaded from JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::RigforgeError;
use crate::power::PowerProfile;

pub const DEFAULT_CART_KEY: &str = "rigforge.build";
pub const DEFAULT_TEMPLATE_KEY: &str = "rigforge.templates";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    pub power: PowerProfile,
    pub cart_storage_key: String,
    pub template_storage_key: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            power: PowerProfile::default(),
            cart_storage_key: DEFAULT_CART_KEY.to_string(),
            template_storage_key: DEFAULT_TEMPLATE_KEY.to_string(),
        }
    }
}

impl EngineConfig {
    pub fn from_file(path: &Path) -> Result<Self, RigforgeError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Like [`EngineConfig::from_file`], but falls back to defaults on any error.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::from_file(path) {
            Ok(config) => {
                tracing::info!("Loaded engine config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::warn!("Using default engine config ({:?}: {})", path, e);
                Self::default()
            }
        }
    }
}
