use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::geom::PrecisionModel;
use crate::snapround::hot_pixel_index::DEFAULT_SHUFFLE_SEED;

/// Settings for a snap-rounding run.
///
/// ```json
/// { "scale": 1000.0, "shuffle_seed": 13, "validate": true }
/// ```
///
/// Missing fields take their defaults; unknown fields are rejected.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SnapRoundingConfig {
    /// Grid lines per unit; the grid cell width is `1 / scale`.
    pub scale:        f64,
    /// Seed for the vertex insertion shuffle.
    pub shuffle_seed: u64,
    /// Check the output for non-noded intersections.
    pub validate:     bool,
}

impl Default for SnapRoundingConfig {
    fn default() -> Self {
        Self { scale: 1.0, shuffle_seed: DEFAULT_SHUFFLE_SEED, validate: false }
    }
}

impl SnapRoundingConfig {
    /// Parse a configuration from JSON, rejecting an invalid scale.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.precision_model()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> { Ok(serde_json::to_string_pretty(self)?) }

    pub fn precision_model(&self) -> Result<PrecisionModel> { PrecisionModel::new(self.scale) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NodingError;

    #[test]
    fn defaults_fill_missing_fields() {
        let config = SnapRoundingConfig::from_json(r#"{ "scale": 100.0 }"#).unwrap();
        assert_eq!(config.scale, 100.0);
        assert_eq!(config.shuffle_seed, 13);
        assert!(!config.validate);
    }

    #[test]
    fn rejects_unknown_fields() {
        let err = SnapRoundingConfig::from_json(r#"{ "scale": 1.0, "tolerance": 0.5 }"#).unwrap_err();
        assert!(matches!(err, NodingError::Config(_)));
    }

    #[test]
    fn rejects_non_positive_scale() {
        let err = SnapRoundingConfig::from_json(r#"{ "scale": 0.0 }"#).unwrap_err();
        assert!(matches!(err, NodingError::InvalidScale(s) if s == 0.0));
    }

    #[test]
    fn json_round_trip() {
        let config = SnapRoundingConfig { scale: 8.0, shuffle_seed: 7, validate: true };
        assert_eq!(SnapRoundingConfig::from_json(&config.to_json().unwrap()).unwrap(), config);
    }
}
