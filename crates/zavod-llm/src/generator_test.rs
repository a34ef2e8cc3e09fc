use async_trait::async_trait;
use serde_json::json;
use zavod_core::ContentType;

use super::*;

fn analyzed() -> AnalyzedContent {
    AnalyzedContent {
        reference_url: "https://www.youtube.com/watch?v=abc".to_string(),
        title: "Как выбрать нишу".to_string(),
        summary: "Разбор выбора ниши".to_string(),
        key_points: vec!["Спрос".to_string(), "Конкуренция".to_string()],
        content_type: ContentType::Guide,
        target_audience_score: 0.8,
        usefulness_score: 0.7,
        suggested_angle: "Ниша за 5 шагов".to_string(),
        raw_llm_output: None,
    }
}

struct CannedClient(Value);

#[async_trait]
impl CompletionClient for CannedClient {
    async fn complete_json(&self, system: &str, _user: &str) -> Result<Value, LlmError> {
        assert_eq!(system, CAROUSEL_SYSTEM_PROMPT);
        Ok(self.0.clone())
    }
}

#[test]
fn prompt_embeds_analysis_fields() {
    let prompt = build_carousel_prompt(&analyzed());
    assert!(prompt.contains("Разбор выбора ниши"));
    assert!(prompt.contains("- Спрос\n- Конкуренция"));
    assert!(prompt.contains("Тип контента: guide"));
    assert!(prompt.contains("Рекомендуемый угол карусели: Ниша за 5 шагов"));
}

#[test]
fn prompt_keeps_json_template_and_closing_rules() {
    let prompt = build_carousel_prompt(&analyzed());
    assert!(prompt.contains(r##""hashtags": ["#wildberries", "#бизнеснанолях", "..."]"##));
    assert!(prompt.contains("\"show_expert_photo\": true | false"));
    assert!(prompt.ends_with("- Все тексты — на русском."));
}

#[test]
fn empty_slides_are_dropped_and_indices_stay_contiguous() {
    let data = json!({
        "slides": [
            {"title": "", "body": ""},
            {"title": "X", "body": "Y"}
        ]
    });
    let carousel = parse_carousel(&analyzed(), &data);
    assert_eq!(carousel.slides.len(), 1);
    assert_eq!(carousel.slides[0].index, 1);
    assert_eq!(carousel.slides[0].title, "X");
    assert!(carousel.has_contiguous_indices());
}

#[test]
fn model_numbering_is_ignored() {
    let data = json!({
        "slides": [
            {"index": 4, "type": "hook", "title": "A", "body": ""},
            {"index": 9, "type": "content", "title": "", "body": "B"},
            {"index": 2, "type": "CTA", "title": "C", "body": "C"}
        ]
    });
    let carousel = parse_carousel(&analyzed(), &data);
    let indices: Vec<u32> = carousel.slides.iter().map(|s| s.index).collect();
    assert_eq!(indices, vec![1, 2, 3]);
    assert_eq!(carousel.slides[2].slide_type, SlideType::Cta);
}

#[test]
fn unknown_slide_type_falls_back_to_content() {
    let data = json!({"slides": [{"type": "outro", "title": "T", "body": "B"}, {"title": "T2"}]});
    let carousel = parse_carousel(&analyzed(), &data);
    assert!(carousel
        .slides
        .iter()
        .all(|s| s.slide_type == SlideType::Content));
}

#[test]
fn slide_optional_fields() {
    let data = json!({
        "slides": [
            {"title": "T", "body": "B", "visual_hint": "  ", "show_expert_photo": true},
            {"title": "T", "body": "B", "visual_hint": "иконки", "show_expert_photo": "false"}
        ]
    });
    let carousel = parse_carousel(&analyzed(), &data);
    assert!(carousel.slides[0].visual_hint.is_none());
    assert!(carousel.slides[0].show_expert_photo);
    assert_eq!(carousel.slides[1].visual_hint.as_deref(), Some("иконки"));
    assert!(!carousel.slides[1].show_expert_photo);
}

#[test]
fn caption_and_hashtags_default_to_none() {
    let data = json!({"caption": "   ", "hashtags": ["", "  "]});
    let carousel = parse_carousel(&analyzed(), &data);
    assert!(carousel.caption.is_none());
    assert!(carousel.hashtags.is_none());

    let carousel = parse_carousel(&analyzed(), &json!({}));
    assert!(carousel.caption.is_none());
    assert!(carousel.hashtags.is_none());
    assert!(carousel.slides.is_empty());
}

#[test]
fn caption_and_hashtags_are_trimmed() {
    let data = json!({"caption": " Сохрани ", "hashtags": [" #wb ", 5, "#ниша"]});
    let carousel = parse_carousel(&analyzed(), &data);
    assert_eq!(carousel.caption.as_deref(), Some("Сохрани"));
    assert_eq!(
        carousel.hashtags,
        Some(vec!["#wb".to_string(), "#ниша".to_string()])
    );
}

#[test]
fn main_angle_falls_back_to_suggested_angle_then_title() {
    let carousel = parse_carousel(&analyzed(), &json!({"main_angle": ""}));
    assert_eq!(carousel.main_angle, "Ниша за 5 шагов");

    let mut without_angle = analyzed();
    without_angle.suggested_angle = String::new();
    let carousel = parse_carousel(&without_angle, &json!({}));
    assert_eq!(carousel.main_angle, "Как выбрать нишу");

    let carousel = parse_carousel(&analyzed(), &json!({"main_angle": "Свой угол"}));
    assert_eq!(carousel.main_angle, "Свой угол");
}

#[test]
fn content_type_is_copied_from_analysis() {
    let carousel = parse_carousel(&analyzed(), &json!({}));
    assert_eq!(carousel.content_type, ContentType::Guide);
    assert_eq!(carousel.reference_url, "https://www.youtube.com/watch?v=abc");
}

#[test]
fn dummy_carousel_has_hook_points_and_cta() {
    let carousel = dummy_carousel(&analyzed());
    assert_eq!(carousel.slides.len(), 4);
    assert_eq!(carousel.slides[0].slide_type, SlideType::Hook);
    assert_eq!(carousel.slides[0].title, "Ниша за 5 шагов");
    assert_eq!(carousel.slides[1].title, "Тезис 1");
    assert_eq!(carousel.slides[2].body, "Конкуренция");
    assert_eq!(carousel.slides[3].slide_type, SlideType::Cta);
    assert!(carousel.has_contiguous_indices());
    assert_eq!(carousel, dummy_carousel(&analyzed()));
}

#[test]
fn dummy_carousel_caps_content_slides() {
    let mut many = analyzed();
    many.key_points = (1..=12).map(|i| format!("point {i}")).collect();
    let carousel = dummy_carousel(&many);
    assert_eq!(carousel.slides.len(), 10);
    assert!(carousel.has_contiguous_indices());
}

#[test]
fn dummy_carousel_uses_summary_then_fixed_tip() {
    let mut no_points = analyzed();
    no_points.key_points.clear();
    let carousel = dummy_carousel(&no_points);
    assert_eq!(carousel.slides.len(), 3);
    assert_eq!(carousel.slides[1].body, "Разбор выбора ниши");

    no_points.summary = String::new();
    let carousel = dummy_carousel(&no_points);
    assert_eq!(carousel.slides[1].body, FALLBACK_TIP);
}

#[tokio::test]
async fn generate_parses_client_output() {
    let client = CannedClient(json!({
        "main_angle": "Ниша",
        "slides": [
            {"type": "hook", "title": "Хук", "body": "Тело", "show_expert_photo": true},
            {"type": "cta", "title": "Подпишись", "body": ""}
        ],
        "caption": "Пост",
        "hashtags": ["#wb"]
    }));
    let carousel = generate(&analyzed(), &client).await.unwrap();
    assert_eq!(carousel.main_angle, "Ниша");
    assert_eq!(carousel.slides.len(), 2);
    assert_eq!(carousel.caption.as_deref(), Some("Пост"));
}
