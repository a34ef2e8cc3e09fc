//! Reference → [`AnalyzedContent`] via one JSON completion.

use serde_json::Value;
use zavod_core::{AnalyzedContent, ContentType, Reference};

use crate::client::CompletionClient;
use crate::error::LlmError;
use crate::{score, trimmed_str};

pub const ANALYSIS_SYSTEM_PROMPT: &str = "Ты — эксперт по маркетингу и запуску бизнеса на маркетплейсе Wildberries.
Твоя задача — анализировать русскоязычные видео и превращать их содержание
в основу для обучающих каруселей в соцсетях для НОВИЧКОВ на WB.

Отвечай строго в формате JSON, без пояснений, без дополнительного текста.";

/// Raw payload keys that may carry a transcript, in priority order.
pub const TRANSCRIPT_KEYS: [&str; 3] = ["transcript", "subtitle", "captions"];

const DUMMY_SUMMARY: &str = "LLM disabled (dry-run).";
const DUMMY_ANGLE: &str = "Dry-run angle";

/// First non-empty transcript string found in the reference's raw payload.
#[must_use]
pub fn find_transcript(raw: &Value) -> Option<&str> {
    TRANSCRIPT_KEYS
        .iter()
        .filter_map(|key| raw.get(*key))
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|s| !s.is_empty())
}

#[must_use]
pub fn build_analysis_prompt(reference: &Reference) -> String {
    let mut parts = vec![format!("Заголовок: {}", reference.title)];
    if let Some(description) = reference.description.as_deref().filter(|d| !d.trim().is_empty()) {
        parts.push(format!("Описание: {description}"));
    }
    if let Some(transcript) = find_transcript(&reference.raw) {
        parts.push(format!("Транскрипт: {transcript}"));
    }
    let text_block = parts.join("\n\n");

    format!(
        r#"Проанализируй следующий контент (видео с YouTube про Wildberries):

{text_block}

Нужен результат в следующем JSON-формате:

{{
  "summary": "краткое резюме видео (2-3 предложения, на русском)",
  "key_points": [
    "тезис 1 (для отдельного слайда карусели, кратко и понятно)",
    "тезис 2",
    "тезис 3"
  ],
  "content_type": "guide | mistakes | case | strategy | other",
  "target_audience_score": 0.0,
  "usefulness_score": 0.0,
  "suggested_carousel_angle": "формулировка для карусели, например: '7 ошибок новичка на Wildberries'"
}}

Требования:
- Думай о ЦА: человек, который хочет запустить бизнес на Wildberries с нуля.
- target_audience_score — от 0 до 1, где 1 — максимально полезно для такого новичка.
- usefulness_score — общая полезность контента, от 0 до 1.
- key_points должны быть 6–12 штук, каждый — отдельная мысль для слайда.
- content_type выбери один из перечисленных вариантов.
- Ответ верни ТОЛЬКО как валидный JSON."#
    )
}

/// Build an [`AnalyzedContent`] from model output without failing on odd values.
#[must_use]
pub fn parse_analysis(reference: &Reference, data: &Value) -> AnalyzedContent {
    let key_points = data
        .get("key_points")
        .and_then(Value::as_array)
        .map(|points| {
            points
                .iter()
                .filter_map(trimmed_str)
                .map(ToString::to_string)
                .collect()
        })
        .unwrap_or_default();

    let suggested_angle = ["suggested_carousel_angle", "suggested_angle"]
        .iter()
        .find_map(|key| data.get(*key).and_then(trimmed_str))
        .unwrap_or_default()
        .to_string();

    AnalyzedContent {
        reference_url: reference.url.clone(),
        title: reference.title.clone(),
        summary: data
            .get("summary")
            .and_then(trimmed_str)
            .unwrap_or_default()
            .to_string(),
        key_points,
        content_type: data
            .get("content_type")
            .and_then(Value::as_str)
            .map_or(ContentType::Other, ContentType::from_label),
        target_audience_score: score(data.get("target_audience_score")),
        usefulness_score: score(data.get("usefulness_score")),
        suggested_angle,
        raw_llm_output: Some(data.clone()),
    }
}

/// Analyze one reference with the given backend.
///
/// # Errors
///
/// Returns [`LlmError`] when the backend call fails or its reply is not a
/// JSON object.
pub async fn analyze<C>(reference: &Reference, client: &C) -> Result<AnalyzedContent, LlmError>
where
    C: CompletionClient + ?Sized,
{
    let prompt = build_analysis_prompt(reference);
    let data = client.complete_json(ANALYSIS_SYSTEM_PROMPT, &prompt).await?;
    let analyzed = parse_analysis(reference, &data);
    tracing::info!(
        url = %reference.url,
        content_type = %analyzed.content_type,
        key_points = analyzed.key_points.len(),
        "reference analyzed"
    );
    Ok(analyzed)
}

/// Deterministic placeholder used when the LLM is disabled.
#[must_use]
pub fn dummy_analysis(reference: &Reference) -> AnalyzedContent {
    AnalyzedContent {
        reference_url: reference.url.clone(),
        title: reference.title.clone(),
        summary: DUMMY_SUMMARY.to_string(),
        key_points: Vec::new(),
        content_type: ContentType::Other,
        target_audience_score: 0.0,
        usefulness_score: 0.0,
        suggested_angle: DUMMY_ANGLE.to_string(),
        raw_llm_output: None,
    }
}

#[cfg(test)]
#[path = "analyzer_test.rs"]
mod tests;
