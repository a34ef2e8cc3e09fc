use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Youtube,
    Tiktok,
    Instagram,
}

impl Platform {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Youtube => "youtube",
            Platform::Tiktok => "tiktok",
            Platform::Instagram => "instagram",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "youtube" => Ok(Platform::Youtube),
            "tiktok" => Ok(Platform::Tiktok),
            "instagram" => Ok(Platform::Instagram),
            other => Err(format!(
                "unknown platform '{other}'; expected youtube, tiktok, or instagram"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementMetrics {
    pub views: i64,
    pub likes: i64,
    pub comments: i64,
    #[serde(default)]
    pub shares: i64,
}

impl EngagementMetrics {
    /// `(likes + comments + shares) / views`, or `0.0` when there are no views.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn engagement_rate(&self) -> f64 {
        if self.views <= 0 {
            return 0.0;
        }
        (self.likes + self.comments + self.shares) as f64 / self.views as f64
    }
}

/// One discovered video with normalized metadata.
///
/// `url` keeps the value the source reported; comparisons between references
/// go through URL normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    pub platform: Platform,
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    pub published_at: DateTime<Utc>,
    pub metrics: EngagementMetrics,
    #[serde(default)]
    pub duration_secs: Option<u32>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub raw: serde_json::Value,
}

impl Reference {
    /// Whether the reference was published at most `max_age_days` whole days
    /// before `now`. Future-dated references count as recent.
    #[must_use]
    pub fn is_recent(&self, max_age_days: i64, now: DateTime<Utc>) -> bool {
        (now - self.published_at).num_days() <= max_age_days
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn reference_published(at: DateTime<Utc>) -> Reference {
        Reference {
            platform: Platform::Youtube,
            url: "https://www.youtube.com/watch?v=abc".to_string(),
            title: "Sample".to_string(),
            author: None,
            published_at: at,
            metrics: EngagementMetrics::default(),
            duration_secs: None,
            description: None,
            tags: vec![],
            raw: serde_json::Value::Null,
        }
    }

    #[test]
    fn engagement_rate_zero_views_is_zero() {
        let metrics = EngagementMetrics {
            views: 0,
            likes: 50,
            comments: 10,
            shares: 3,
        };
        assert!(metrics.engagement_rate().abs() < f64::EPSILON);
    }

    #[test]
    fn engagement_rate_counts_likes_comments_shares() {
        let metrics = EngagementMetrics {
            views: 100,
            likes: 5,
            comments: 3,
            shares: 2,
        };
        assert!((metrics.engagement_rate() - 0.10).abs() < 1e-9);
    }

    #[test]
    fn engagement_rate_negative_views_is_zero() {
        let metrics = EngagementMetrics {
            views: -5,
            likes: 1,
            comments: 0,
            shares: 0,
        };
        assert!(metrics.engagement_rate().abs() < f64::EPSILON);
    }

    #[test]
    fn is_recent_boundary_is_inclusive() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let exactly_90 = reference_published(now - Duration::days(90));
        let older = reference_published(now - Duration::days(91));
        assert!(exactly_90.is_recent(90, now));
        assert!(!older.is_recent(90, now));
    }

    #[test]
    fn is_recent_uses_whole_days() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        // 90 days and 23 hours is still 90 whole days.
        let r = reference_published(now - Duration::days(90) - Duration::hours(23));
        assert!(r.is_recent(90, now));
    }

    #[test]
    fn platform_parses_case_insensitively() {
        assert_eq!("YouTube".parse::<Platform>().unwrap(), Platform::Youtube);
        assert!("vimeo".parse::<Platform>().is_err());
    }

    #[test]
    fn platform_serializes_lowercase() {
        let json = serde_json::to_string(&Platform::Instagram).unwrap();
        assert_eq!(json, "\"instagram\"");
    }
}
