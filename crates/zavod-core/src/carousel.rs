use serde::{Deserialize, Serialize};

use crate::analysis::ContentType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlideType {
    Hook,
    Content,
    Cta,
}

impl SlideType {
    /// Total mapping from a model-provided label; unknown labels become
    /// [`SlideType::Content`].
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "hook" => SlideType::Hook,
            "cta" => SlideType::Cta,
            _ => SlideType::Content,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SlideType::Hook => "hook",
            SlideType::Content => "content",
            SlideType::Cta => "cta",
        }
    }
}

impl std::fmt::Display for SlideType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    /// 1-based position in the carousel.
    pub index: u32,
    pub slide_type: SlideType,
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub visual_hint: Option<String>,
    #[serde(default)]
    pub show_expert_photo: bool,
}

/// Ordered slide deck derived from one analyzed reference.
///
/// By convention the first slide is a hook and the last a call to action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarouselSpec {
    pub reference_url: String,
    pub main_angle: String,
    pub content_type: ContentType,
    pub slides: Vec<Slide>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub hashtags: Option<Vec<String>>,
    #[serde(default)]
    pub brand_profile_id: Option<String>,
}

impl CarouselSpec {
    /// True when slide indices run `1..=n` in order.
    #[must_use]
    pub fn has_contiguous_indices(&self) -> bool {
        self.slides
            .iter()
            .zip(1u32..)
            .all(|(slide, expected)| slide.index == expected)
    }
}
