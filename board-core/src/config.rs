//! Editor configuration.

use serde::{Deserialize, Serialize};

use crate::element::{DEFAULT_COLOR, MIN_SIZE};

/// Storage key the snapshot is written under.
pub const DEFAULT_STORAGE_KEY: &str = "canvasDesign";

/// File name offered for exported designs.
pub const DEFAULT_EXPORT_FILENAME: &str = "design.json";

/// Distance in pixels an arrow key moves the selected element.
pub const DEFAULT_NUDGE_STEP: f64 = 5.0;

/// Configuration for the editor.
///
/// Every field has a default, so a partial JSON object is enough to
/// override a single setting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Board width in pixels, until the host reports the real size.
    pub board_width: f64,
    /// Board height in pixels, until the host reports the real size.
    pub board_height: f64,
    /// Arrow key step in pixels.
    pub nudge_step: f64,
    /// Minimum element width and height.
    pub min_size: f64,
    /// Key the snapshot is stored under.
    pub storage_key: String,
    /// File name for exported designs.
    pub export_filename: String,
    /// Fill colour for new elements.
    pub default_color: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            board_width: 800.0,
            board_height: 600.0,
            nudge_step: DEFAULT_NUDGE_STEP,
            min_size: MIN_SIZE,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            export_filename: DEFAULT_EXPORT_FILENAME.to_string(),
            default_color: DEFAULT_COLOR.to_string(),
        }
    }
}

impl EditorConfig {
    /// Parse a configuration from JSON, filling missing fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed.
    pub fn from_json(json: &str) -> crate::BoardResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    /// Clamp nonsensical values back into range.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        if !self.min_size.is_finite() || self.min_size < 1.0 {
            self.min_size = MIN_SIZE;
        }
        if !self.nudge_step.is_finite() || self.nudge_step <= 0.0 {
            self.nudge_step = DEFAULT_NUDGE_STEP;
        }
        self.board_width = self.board_width.max(0.0);
        self.board_height = self.board_height.max(0.0);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = EditorConfig::from_json(r#"{"nudge_step": 1.0}"#).expect("parse");
        assert!((config.nudge_step - 1.0).abs() < f64::EPSILON);
        assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
        assert_eq!(config.export_filename, DEFAULT_EXPORT_FILENAME);
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = EditorConfig::from_json(r#"{"nudge_step": -3.0, "min_size": 0}"#)
            .expect("parse");
        assert!((config.nudge_step - DEFAULT_NUDGE_STEP).abs() < f64::EPSILON);
        assert!((config.min_size - MIN_SIZE).abs() < f64::EPSILON);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(EditorConfig::from_json("{nope").is_err());
    }
}
