use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::analysis::AnalyzedContent;
use crate::carousel::CarouselSpec;
use crate::reference::Reference;
use crate::CoreError;

/// One completed pipeline execution. Never mutated once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedRun {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub reference: Reference,
    pub analyzed: AnalyzedContent,
    pub carousel: CarouselSpec,
}

impl PersistedRun {
    #[must_use]
    pub fn new(reference: Reference, analyzed: AnalyzedContent, carousel: CarouselSpec) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            reference,
            analyzed,
            carousel,
        }
    }
}

const REQUIRED_RUN_FIELDS: [&str; 5] = ["id", "created_at", "reference", "analyzed", "carousel"];

/// Rebuild a typed run from a stored JSON record.
///
/// Enum fields must carry one of their known tags; an unrecognized value is
/// an error here rather than a silent fallback.
///
/// # Errors
///
/// Returns [`CoreError::MissingField`] when a top-level field is absent and
/// [`CoreError::InvalidRecord`] when a field has the wrong shape.
pub fn reconstruct_run(record: &Value) -> Result<PersistedRun, CoreError> {
    for field in REQUIRED_RUN_FIELDS {
        if record.get(field).is_none_or(Value::is_null) {
            return Err(CoreError::MissingField(field));
        }
    }

    serde_json::from_value(record.clone()).map_err(|source| CoreError::InvalidRecord {
        context: "run",
        source,
    })
}

/// Rebuild only the analysis and carousel halves of a stored run.
///
/// # Errors
///
/// Same conditions as [`reconstruct_run`], restricted to the two sections.
pub fn reconstruct_analyzed_and_carousel(
    record: &Value,
) -> Result<(AnalyzedContent, CarouselSpec), CoreError> {
    let analyzed = record
        .get("analyzed")
        .filter(|v| !v.is_null())
        .ok_or(CoreError::MissingField("analyzed"))?;
    let carousel = record
        .get("carousel")
        .filter(|v| !v.is_null())
        .ok_or(CoreError::MissingField("carousel"))?;

    let analyzed: AnalyzedContent =
        serde_json::from_value(analyzed.clone()).map_err(|source| CoreError::InvalidRecord {
            context: "analyzed",
            source,
        })?;
    let carousel: CarouselSpec =
        serde_json::from_value(carousel.clone()).map_err(|source| CoreError::InvalidRecord {
            context: "carousel",
            source,
        })?;

    Ok((analyzed, carousel))
}

#[cfg(test)]
#[path = "run_test.rs"]
mod tests;
