use zavod_core::{PersistedRun, SlideType};

const NO_TITLE: &str = "Без названия";
const NO_SUMMARY: &str = "Нет резюме";
const NO_VISUAL_HINT: &str = "Нет подсказки";

/// Render a run as a Markdown brief for manual review.
#[must_use]
pub fn run_to_markdown(run: &PersistedRun) -> String {
    let reference = &run.reference;
    let carousel = &run.carousel;

    let title = [carousel.main_angle.as_str(), reference.title.as_str()]
        .into_iter()
        .find(|s| !s.trim().is_empty())
        .unwrap_or(NO_TITLE);
    let summary = if run.analyzed.summary.trim().is_empty() {
        NO_SUMMARY
    } else {
        run.analyzed.summary.as_str()
    };

    let mut lines = vec![
        format!("# {title}"),
        String::new(),
        format!("**Источник:** [{}]({})", reference.title, reference.url),
        String::new(),
        "## Резюме анализа".to_string(),
        summary.to_string(),
        String::new(),
        "## Слайды карусели".to_string(),
        String::new(),
    ];

    for slide in &carousel.slides {
        let expert = if slide.show_expert_photo { "Да" } else { "Нет" };
        lines.push(format!(
            "### Слайд {} — {}: {}",
            slide.index,
            type_label(slide.slide_type),
            slide.title
        ));
        lines.push(slide.body.clone());
        lines.push(String::new());
        lines.push(format!(
            "**Визуал:** {}",
            slide.visual_hint.as_deref().unwrap_or(NO_VISUAL_HINT)
        ));
        lines.push(format!("**Фото эксперта:** {expert}"));
        lines.push(String::new());
        lines.push("---".to_string());
        lines.push(String::new());
    }

    if let Some(caption) = carousel.caption.as_deref() {
        lines.push("## Текст поста (Caption)".to_string());
        lines.push(caption.to_string());
        lines.push(String::new());
        if let Some(hashtags) = carousel.hashtags.as_ref().filter(|h| !h.is_empty()) {
            lines.push(hashtags.join(" "));
        }
    }

    lines.join("\n")
}

fn type_label(slide_type: SlideType) -> &'static str {
    match slide_type {
        SlideType::Hook => "HOOK",
        SlideType::Content => "CONTENT",
        SlideType::Cta => "CTA",
    }
}

#[cfg(test)]
#[path = "markdown_test.rs"]
mod tests;
