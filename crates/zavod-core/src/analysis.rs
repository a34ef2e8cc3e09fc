use serde::{Deserialize, Serialize};

/// Closed set of content categories the analyzer assigns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Guide,
    Mistakes,
    Case,
    Strategy,
    Other,
}

impl ContentType {
    /// Total mapping from a model-provided label. Anything unrecognized is
    /// [`ContentType::Other`].
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "guide" => ContentType::Guide,
            "mistakes" => ContentType::Mistakes,
            "case" => ContentType::Case,
            "strategy" => ContentType::Strategy,
            _ => ContentType::Other,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::Guide => "guide",
            ContentType::Mistakes => "mistakes",
            ContentType::Case => "case",
            ContentType::Strategy => "strategy",
            ContentType::Other => "other",
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured summary and scoring of one reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedContent {
    pub reference_url: String,
    pub title: String,
    pub summary: String,
    pub key_points: Vec<String>,
    pub content_type: ContentType,
    /// Fit for a beginner seller audience, in `[0, 1]`.
    pub target_audience_score: f64,
    /// Overall usefulness, in `[0, 1]`.
    pub usefulness_score: f64,
    pub suggested_angle: String,
    #[serde(default)]
    pub raw_llm_output: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_label_known_values() {
        assert_eq!(ContentType::from_label("guide"), ContentType::Guide);
        assert_eq!(ContentType::from_label(" Mistakes "), ContentType::Mistakes);
        assert_eq!(ContentType::from_label("CASE"), ContentType::Case);
        assert_eq!(ContentType::from_label("strategy"), ContentType::Strategy);
    }

    #[test]
    fn from_label_unknown_falls_back_to_other() {
        assert_eq!(ContentType::from_label("tutorial"), ContentType::Other);
        assert_eq!(ContentType::from_label(""), ContentType::Other);
    }

    #[test]
    fn serde_uses_lowercase_tags() {
        let json = serde_json::to_string(&ContentType::Strategy).unwrap();
        assert_eq!(json, "\"strategy\"");
        let back: ContentType = serde_json::from_str("\"case\"").unwrap();
        assert_eq!(back, ContentType::Case);
    }
}
