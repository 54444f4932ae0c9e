//! Add-on configuration
//!
//! The host application owns the configuration store; the core receives a
//! snapshot at construction and after profile changes. Missing configuration
//! at construction is the one fatal error in the pipeline.

use serde::{Deserialize, Serialize};

/// User settings consumed by the input pipeline.
///
/// Speed and deadzone values are stored the way the host's settings dialog
/// exposes them (deadzone as a percentage); the consumers rescale.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AddonConfig {
    #[serde(rename = "Cursor Speed", default = "default_cursor_speed")]
    pub cursor_speed: f32,
    #[serde(rename = "Cursor Acceleration", default = "default_cursor_accel")]
    pub cursor_accel: f32,
    #[serde(rename = "Scroll Speed", default = "default_scroll_speed")]
    pub scroll_speed: f32,
    #[serde(rename = "Stick Deadzone", default = "default_deadzone")]
    pub stick_deadzone: f32,
    #[serde(rename = "Enable Control Overlays", default = "default_true")]
    pub enable_overlays: bool,
    #[serde(rename = "Large Overlays", default)]
    pub large_overlays: bool,
}

impl Default for AddonConfig {
    fn default() -> Self {
        Self {
            cursor_speed: default_cursor_speed(),
            cursor_accel: default_cursor_accel(),
            scroll_speed: default_scroll_speed(),
            stick_deadzone: default_deadzone(),
            enable_overlays: true,
            large_overlays: false,
        }
    }
}

// Default value functions
fn default_cursor_speed() -> f32 {
    10.0
}
fn default_cursor_accel() -> f32 {
    5.0
}
fn default_scroll_speed() -> f32 {
    10.0
}
fn default_deadzone() -> f32 {
    5.0
}
fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: AddonConfig = serde_json::from_str(r#"{"Cursor Speed": 4.0}"#).unwrap();
        assert_eq!(config.cursor_speed, 4.0);
        assert_eq!(config.stick_deadzone, 5.0);
        assert!(config.enable_overlays);
        assert!(!config.large_overlays);
    }

    #[test]
    fn test_round_trip() {
        let config = AddonConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("Stick Deadzone"));
        let back: AddonConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.scroll_speed, config.scroll_speed);
    }
}
