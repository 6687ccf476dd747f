use serde::{Deserialize, Serialize};

use super::enums::ImageCategory;

/// Reference to an image hosted by the owning party.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    pub category: ImageCategory,
    /// File extension, e.g. `jpeg`.
    #[serde(rename = "type")]
    pub image_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl Image {
    pub fn new(url: impl Into<String>, category: ImageCategory, image_type: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            thumbnail: None,
            category,
            image_type: image_type.into(),
            width: None,
            height: None,
        }
    }
}
