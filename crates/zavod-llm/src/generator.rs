//! [`AnalyzedContent`] → [`CarouselSpec`] via a second JSON completion.

use serde_json::Value;
use zavod_core::{AnalyzedContent, CarouselSpec, Slide, SlideType};

use crate::client::CompletionClient;
use crate::error::LlmError;
use crate::trimmed_str;

pub const CAROUSEL_SYSTEM_PROMPT: &str = "Ты — эксперт по созданию Instagram-каруселей для предпринимателей.
Твоя задача — по уже разобранному контенту (summary + key_points + angle)
создавать структуру карусели: слайды, заголовки, тексты и финальный CTA.

Фокус: новичок, который хочет запустить бизнес на Wildberries с нуля.
Все тексты пиши по-русски, просто и конкретно.

Важно:
- У нас есть эксперт (лицо бренда) с фото.
- Отмечай, на каких слайдах нужно показывать фото эксперта (обычно HOOK и CTA, иногда 1-2 ключевых контент-слайда).
Отвечай строго в формате JSON.";

const MAX_DUMMY_CONTENT_SLIDES: usize = 8;
const FALLBACK_ANGLE: &str = "Полезные советы по Wildberries";
const FALLBACK_TIP: &str = "Соберите ключевые шаги запуска и избегайте типичных ошибок.";

#[must_use]
pub fn build_carousel_prompt(analyzed: &AnalyzedContent) -> String {
    let key_points_block = analyzed
        .key_points
        .iter()
        .map(|kp| format!("- {kp}"))
        .collect::<Vec<_>>()
        .join("\n");
    let summary = &analyzed.summary;
    let content_type = analyzed.content_type;
    let angle = &analyzed.suggested_angle;

    format!(
        r##"У тебя есть проанализированный контент видео про Wildberries.

Краткое резюме:
{summary}

Ключевые тезисы:
{key_points_block}

Тип контента: {content_type}
Рекомендуемый угол карусели: {angle}

Нужно создать структуру Instagram-карусели (до 10 слайдов) для новичка на WB.

Требования к структуре:
- Слайд 1: сильный HOOK (зацепка). Короткий заголовок + подзаголовок, который обещает пользу.
- Слайды 2–N-1: CONTENT — раскрывают ключевые тезисы, один слайд = одна мысль.
- Последний слайд: CTA — чёткий призыв к действию (подписаться, сохранить, написать, перейти и т.п.).
- Всего 6–10 слайдов.
- Текст на слайдах — максимально конкретный, без воды, 1–3 короткие строки.
- Пиши понятным языком для новичка, который боится «сложного бизнеса».

Верни JSON строго в формате:

{{
  "main_angle": "общий заголовок/угол карусели",
  "slides": [
    {{
      "type": "hook" | "content" | "cta",
      "title": "краткий заголовок слайда",
      "body": "2-3 строки текста, раскрывающие идею слайда",
      "visual_hint": "краткая подсказка по визуалу (иконки, иллюстрации, композиция)",
      "show_expert_photo": true | false
    }}
  ],
  "caption": "предложенный текст для описания поста",
  "hashtags": ["#wildberries", "#бизнеснанолях", "..."]
}}

Требования:
- Слайд 1 (HOOK) почти всегда show_expert_photo = true.
- Последний слайд (CTA) часто show_expert_photo = true.
- Для остальных слайдов решай по здравому смыслу.

Очень важно:
- Соблюдай структуру JSON.
- Не используй Markdown, не оборачивай JSON в ```.
- Все тексты — на русском."##
    )
}

/// Build a [`CarouselSpec`] from model output.
///
/// Slides whose title and body are both blank are dropped; the rest are
/// numbered `1..=n` in the order received, ignoring any model numbering.
#[must_use]
pub fn parse_carousel(analyzed: &AnalyzedContent, data: &Value) -> CarouselSpec {
    let main_angle = data
        .get("main_angle")
        .and_then(trimmed_str)
        .or_else(|| non_blank(&analyzed.suggested_angle))
        .unwrap_or(&analyzed.title)
        .to_string();

    let slides = data
        .get("slides")
        .and_then(Value::as_array)
        .map(|raw| parse_slides(raw))
        .unwrap_or_default();

    let caption = data
        .get("caption")
        .and_then(trimmed_str)
        .map(ToString::to_string);

    let hashtags = data
        .get("hashtags")
        .and_then(Value::as_array)
        .map(|tags| {
            tags.iter()
                .filter_map(trimmed_str)
                .map(ToString::to_string)
                .collect::<Vec<_>>()
        })
        .filter(|tags| !tags.is_empty());

    CarouselSpec {
        reference_url: analyzed.reference_url.clone(),
        main_angle,
        content_type: analyzed.content_type,
        slides,
        caption,
        hashtags,
        brand_profile_id: None,
    }
}

fn parse_slides(raw: &[Value]) -> Vec<Slide> {
    let mut slides = Vec::with_capacity(raw.len());
    for entry in raw {
        let text = |key: &str| {
            entry
                .get(key)
                .and_then(trimmed_str)
                .unwrap_or_default()
                .to_string()
        };
        let title = text("title");
        let body = text("body");
        if title.is_empty() && body.is_empty() {
            continue;
        }

        let slide_type = ["type", "slide_type"]
            .iter()
            .find_map(|key| entry.get(*key).and_then(Value::as_str))
            .map_or(SlideType::Content, SlideType::from_label);

        let index = u32::try_from(slides.len() + 1).unwrap_or(u32::MAX);
        slides.push(Slide {
            index,
            slide_type,
            title,
            body,
            visual_hint: entry
                .get("visual_hint")
                .and_then(trimmed_str)
                .map(ToString::to_string),
            show_expert_photo: entry.get("show_expert_photo").is_some_and(truthy),
        });
    }
    slides
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f.abs() > f64::EPSILON),
        Value::String(s) => matches!(s.trim().to_lowercase().as_str(), "true" | "yes" | "1"),
        _ => false,
    }
}

fn non_blank(s: &str) -> Option<&str> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Generate a carousel for one analysis with the given backend.
///
/// # Errors
///
/// Returns [`LlmError`] when the backend call fails or its reply is not a
/// JSON object.
pub async fn generate<C>(analyzed: &AnalyzedContent, client: &C) -> Result<CarouselSpec, LlmError>
where
    C: CompletionClient + ?Sized,
{
    let prompt = build_carousel_prompt(analyzed);
    let data = client.complete_json(CAROUSEL_SYSTEM_PROMPT, &prompt).await?;
    let carousel = parse_carousel(analyzed, &data);
    tracing::info!(
        url = %analyzed.reference_url,
        slides = carousel.slides.len(),
        "carousel generated"
    );
    Ok(carousel)
}

/// Deterministic hook / content / CTA carousel built without the LLM.
#[must_use]
pub fn dummy_carousel(analyzed: &AnalyzedContent) -> CarouselSpec {
    let main_angle = non_blank(&analyzed.suggested_angle)
        .or_else(|| non_blank(&analyzed.title))
        .unwrap_or(FALLBACK_ANGLE)
        .to_string();

    let mut points: Vec<&str> = analyzed
        .key_points
        .iter()
        .map(String::as_str)
        .filter(|p| !p.trim().is_empty())
        .collect();
    if points.is_empty() {
        points.extend(non_blank(&analyzed.summary));
    }
    if points.is_empty() {
        points.push(FALLBACK_TIP);
    }

    let mut slides = vec![Slide {
        index: 1,
        slide_type: SlideType::Hook,
        title: main_angle.clone(),
        body: "Коротко и понятно для новичка на WB.".to_string(),
        visual_hint: Some("Крупный заголовок, акцентный цвет".to_string()),
        show_expert_photo: true,
    }];

    for (n, point) in (1u32..).zip(points.iter().take(MAX_DUMMY_CONTENT_SLIDES)) {
        slides.push(Slide {
            index: n + 1,
            slide_type: SlideType::Content,
            title: format!("Тезис {n}"),
            body: (*point).to_string(),
            visual_hint: Some("Иконки + короткие строки текста".to_string()),
            show_expert_photo: false,
        });
    }

    let cta_index = u32::try_from(slides.len() + 1).unwrap_or(u32::MAX);
    slides.push(Slide {
        index: cta_index,
        slide_type: SlideType::Cta,
        title: "Сохрани и подпишись".to_string(),
        body: "Чтобы не потерять и быстрее запустить продажи.".to_string(),
        visual_hint: Some("Фото эксперта + CTA кнопка".to_string()),
        show_expert_photo: true,
    });

    CarouselSpec {
        reference_url: analyzed.reference_url.clone(),
        main_angle,
        content_type: analyzed.content_type,
        slides,
        caption: None,
        hashtags: None,
        brand_profile_id: None,
    }
}

#[cfg(test)]
#[path = "generator_test.rs"]
mod tests;
