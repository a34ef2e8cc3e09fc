use chrono::TimeZone;
use serde_json::json;

use super::*;
use crate::analysis::ContentType;
use crate::carousel::{Slide, SlideType};
use crate::reference::{EngagementMetrics, Platform};

fn sample_run() -> PersistedRun {
    let reference = Reference {
        platform: Platform::Youtube,
        url: "https://www.youtube.com/watch?v=abc123".to_string(),
        title: "Как выйти на WB".to_string(),
        author: Some("Seller School".to_string()),
        published_at: Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap(),
        metrics: EngagementMetrics {
            views: 1000,
            likes: 80,
            comments: 15,
            shares: 5,
        },
        duration_secs: Some(642),
        description: Some("Пошаговый разбор".to_string()),
        tags: vec!["wildberries".to_string()],
        raw: json!({"id": "abc123"}),
    };
    let analyzed = AnalyzedContent {
        reference_url: reference.url.clone(),
        title: reference.title.clone(),
        summary: "Разбор первых шагов".to_string(),
        key_points: vec!["Выбор ниши".to_string(), "Поставка".to_string()],
        content_type: ContentType::Mistakes,
        target_audience_score: 0.8,
        usefulness_score: 0.6,
        suggested_angle: "5 ошибок новичка".to_string(),
        raw_llm_output: None,
    };
    let carousel = CarouselSpec {
        reference_url: reference.url.clone(),
        main_angle: "5 ошибок новичка".to_string(),
        content_type: ContentType::Mistakes,
        slides: vec![
            Slide {
                index: 1,
                slide_type: SlideType::Hook,
                title: "Хук".to_string(),
                body: "Не начинай так".to_string(),
                visual_hint: Some("крупный текст".to_string()),
                show_expert_photo: true,
            },
            Slide {
                index: 2,
                slide_type: SlideType::Cta,
                title: "Подпишись".to_string(),
                body: "Больше разборов в профиле".to_string(),
                visual_hint: None,
                show_expert_photo: false,
            },
        ],
        caption: Some("Сохрани".to_string()),
        hashtags: Some(vec!["#wb".to_string()]),
        brand_profile_id: None,
    };
    PersistedRun::new(reference, analyzed, carousel)
}

#[test]
fn reconstruct_run_restores_typed_enums() {
    let run = sample_run();
    let record = serde_json::to_value(&run).unwrap();

    let restored = reconstruct_run(&record).unwrap();

    assert_eq!(restored, run);
    assert_eq!(restored.analyzed.content_type, ContentType::Mistakes);
    assert_eq!(restored.carousel.slides[0].slide_type, SlideType::Hook);
    assert_eq!(restored.reference.platform, Platform::Youtube);
}

#[test]
fn reconstruct_run_rejects_missing_section() {
    let mut record = serde_json::to_value(sample_run()).unwrap();
    record.as_object_mut().unwrap().remove("carousel");

    let err = reconstruct_run(&record).unwrap_err();
    assert!(matches!(err, CoreError::MissingField("carousel")));
}

#[test]
fn reconstruct_run_rejects_null_id() {
    let mut record = serde_json::to_value(sample_run()).unwrap();
    record["id"] = Value::Null;

    let err = reconstruct_run(&record).unwrap_err();
    assert!(matches!(err, CoreError::MissingField("id")));
}

#[test]
fn reconstruct_run_rejects_unknown_content_type_tag() {
    let mut record = serde_json::to_value(sample_run()).unwrap();
    record["analyzed"]["content_type"] = json!("listicle");

    let err = reconstruct_run(&record).unwrap_err();
    assert!(matches!(err, CoreError::InvalidRecord { context: "run", .. }));
}

#[test]
fn reconstruct_pair_returns_analysis_and_carousel() {
    let run = sample_run();
    let record = serde_json::to_value(&run).unwrap();

    let (analyzed, carousel) = reconstruct_analyzed_and_carousel(&record).unwrap();

    assert_eq!(analyzed, run.analyzed);
    assert_eq!(carousel, run.carousel);
    assert!(carousel.has_contiguous_indices());
}

#[test]
fn reconstruct_pair_reports_which_section_is_invalid() {
    let mut record = serde_json::to_value(sample_run()).unwrap();
    record["carousel"]["slides"][0]["slide_type"] = json!("outro");

    let err = reconstruct_analyzed_and_carousel(&record).unwrap_err();
    assert!(matches!(
        err,
        CoreError::InvalidRecord {
            context: "carousel",
            ..
        }
    ));
}
