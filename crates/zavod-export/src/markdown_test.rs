use chrono::{TimeZone, Utc};
use serde_json::Value;
use zavod_core::{
    AnalyzedContent, CarouselSpec, ContentType, EngagementMetrics, Platform, Reference, Slide,
};

use super::*;

fn run(main_angle: &str, caption: Option<&str>, hashtags: Option<Vec<&str>>) -> PersistedRun {
    let url = "https://www.youtube.com/watch?v=abc";
    let reference = Reference {
        platform: Platform::Youtube,
        url: url.to_string(),
        title: "Видео про WB".to_string(),
        author: None,
        published_at: Utc.with_ymd_and_hms(2025, 5, 1, 0, 0, 0).unwrap(),
        metrics: EngagementMetrics::default(),
        duration_secs: None,
        description: None,
        tags: vec![],
        raw: Value::Null,
    };
    let analyzed = AnalyzedContent {
        reference_url: url.to_string(),
        title: reference.title.clone(),
        summary: "Краткое резюме".to_string(),
        key_points: vec![],
        content_type: ContentType::Guide,
        target_audience_score: 0.5,
        usefulness_score: 0.5,
        suggested_angle: String::new(),
        raw_llm_output: None,
    };
    let carousel = CarouselSpec {
        reference_url: url.to_string(),
        main_angle: main_angle.to_string(),
        content_type: ContentType::Guide,
        slides: vec![
            Slide {
                index: 1,
                slide_type: SlideType::Hook,
                title: "Старт".to_string(),
                body: "Первый шаг".to_string(),
                visual_hint: Some("крупный текст".to_string()),
                show_expert_photo: true,
            },
            Slide {
                index: 2,
                slide_type: SlideType::Content,
                title: "Шаг".to_string(),
                body: "Второй шаг".to_string(),
                visual_hint: None,
                show_expert_photo: false,
            },
        ],
        caption: caption.map(ToString::to_string),
        hashtags: hashtags.map(|h| h.into_iter().map(ToString::to_string).collect()),
        brand_profile_id: None,
    };
    PersistedRun::new(reference, analyzed, carousel)
}

#[test]
fn renders_header_source_and_summary() {
    let md = run_to_markdown(&run("Главный угол", None, None));
    assert!(md.starts_with("# Главный угол\n\n"));
    assert!(md.contains("**Источник:** [Видео про WB](https://www.youtube.com/watch?v=abc)"));
    assert!(md.contains("## Резюме анализа\nКраткое резюме\n"));
}

#[test]
fn renders_each_slide_section() {
    let md = run_to_markdown(&run("Угол", None, None));
    assert!(md.contains("### Слайд 1 — HOOK: Старт\nПервый шаг\n\n**Визуал:** крупный текст\n**Фото эксперта:** Да"));
    assert!(md.contains("### Слайд 2 — CONTENT: Шаг"));
    assert!(md.contains("**Визуал:** Нет подсказки\n**Фото эксперта:** Нет"));
    assert_eq!(md.matches("---").count(), 2);
}

#[test]
fn title_falls_back_to_reference_title() {
    let md = run_to_markdown(&run("", None, None));
    assert!(md.starts_with("# Видео про WB\n"));
}

#[test]
fn caption_section_only_when_present() {
    let md = run_to_markdown(&run("Угол", None, Some(vec!["#wb"])));
    assert!(!md.contains("Caption"));
    assert!(!md.contains("#wb"));

    let md = run_to_markdown(&run("Угол", Some("Текст поста"), Some(vec!["#wb", "#старт"])));
    assert!(md.contains("## Текст поста (Caption)\nТекст поста\n"));
    assert!(md.ends_with("#wb #старт"));
}
