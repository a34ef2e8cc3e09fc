use zavod_core::{AnalyzedContent, BrandProfile, CarouselSpec, DEFAULT_TEMPLATE_ID};

use crate::payload::{CreateVideoPayload, SceneInput};

/// Build a template render request for one carousel in a brand's style.
#[must_use]
pub fn to_blotato_payload(
    carousel: &CarouselSpec,
    analyzed: &AnalyzedContent,
    brand: &BrandProfile,
) -> CreateVideoPayload {
    let scenes = carousel
        .slides
        .iter()
        .map(|slide| SceneInput {
            title: slide.title.clone(),
            body: slide.body.clone(),
            visual_hint: slide.visual_hint.clone(),
            use_expert_photo: slide.show_expert_photo,
        })
        .collect();

    let script = if carousel.main_angle.trim().is_empty() {
        analyzed.title.clone()
    } else {
        carousel.main_angle.clone()
    };

    CreateVideoPayload {
        template_id: brand
            .blotato_template_id
            .clone()
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TEMPLATE_ID.to_string()),
        script,
        caption: carousel.caption.clone(),
        scenes,
        style: brand.style_hint.clone(),
    }
}
