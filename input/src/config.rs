//! Intake configuration.
//!
//! Both configs deserialize from JSON with every field optional, so a page
//! only has to spell out what it changes:
//!
//! ```rust
//! use imgdrop_input::IntakeConfig;
//!
//! let config = IntakeConfig::from_json(r#"{ "max_file_size": 1024 }"#).expect("valid json");
//! assert_eq!(config.max_file_size, 1024);
//! assert_eq!(config.hover_class, "border-purple-400");
//! ```

use serde::Deserialize;

use crate::error::ConfigError;

/// Default upload limit: 10 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Settings for [`DropIntake`](crate::DropIntake).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct IntakeConfig {
    /// Largest accepted file, in bytes. Files strictly larger are refused.
    pub max_file_size: u64,
    /// Media type prefix a file must declare to count as an image.
    pub accepted_type_prefix: String,
    pub drop_zone_selector: String,
    pub file_input_selector: String,
    /// Class present on the drop zone while a drag hovers over it.
    pub hover_class: String,
    /// Optional preview image inside the host. Skipped when not found.
    pub preview_selector: String,
    pub hidden_class: String,
    /// Remote event carrying a decoded image.
    pub process_event: String,
    /// Remote event carrying a user-visible error message.
    pub error_event: String,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            accepted_type_prefix: "image/".to_owned(),
            drop_zone_selector: ".drop-zone".to_owned(),
            file_input_selector: r#"input[type="file"]"#.to_owned(),
            hover_class: "border-purple-400".to_owned(),
            preview_selector: "img.preview-image".to_owned(),
            hidden_class: "hidden".to_owned(),
            process_event: "process-image".to_owned(),
            error_event: "show-error".to_owned(),
        }
    }
}

impl IntakeConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Settings for [`SelectorBridge`](crate::SelectorBridge).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Registry key of the observer that receives `imageSelected`.
    pub observer_id: String,
    pub preview_image_id: String,
    pub preview_container_id: String,
    pub hidden_class: String,
    /// Name of the local notification dispatched on the observer element.
    pub selected_event: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            observer_id: "ImageHook".to_owned(),
            preview_image_id: "preview-image".to_owned(),
            preview_container_id: "preview-container".to_owned(),
            hidden_class: "hidden".to_owned(),
            selected_event: "imageSelected".to_owned(),
        }
    }
}

impl SelectorConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}
