//! BVH build parameters.

use serde::{Deserialize, Serialize};

use crate::error::{BvhError, Result};

/// Parameters controlling how the builder splits nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSettings {
    /// Nodes holding this many triangles or fewer are never split.
    pub max_leaf_triangles: usize,
    /// Evenly spaced split planes tried per axis, excluding the box faces.
    pub split_candidates_per_axis: usize,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            max_leaf_triangles: 3,
            split_candidates_per_axis: 5,
        }
    }
}

impl BuildSettings {
    /// Validate settings.
    pub fn validate(&self) -> Result<()> {
        if self.max_leaf_triangles == 0 {
            return Err(BvhError::InvalidSettings(
                "max_leaf_triangles must be at least 1".into(),
            ));
        }
        if self.split_candidates_per_axis == 0 {
            return Err(BvhError::InvalidSettings(
                "split_candidates_per_axis must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Parse settings from a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let settings: Self = toml::from_str(source)?;
        settings.validate()?;
        Ok(settings)
    }
}
