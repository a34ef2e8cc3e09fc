//! Table-driven mapping from actor dataset items to [`Reference`] records.
//!
//! Each target attribute has an ordered list of candidate keys and one
//! extractor. Candidates are tried in order; absent or falsy values are
//! skipped, and the first value the extractor accepts wins.

use chrono::{DateTime, Utc};
use serde_json::Value;
use zavod_core::{EngagementMetrics, Platform, Reference};

use crate::parse::{
    is_falsy, non_empty_string, parse_count, parse_duration, parse_publish_date, string_list,
};

pub const DEFAULT_TITLE: &str = "No title";

/// One attribute's candidate keys and the extractor applied to each.
pub struct FieldRule<T> {
    pub keys: &'static [&'static str],
    pub extract: fn(&Value) -> Option<T>,
}

impl<T> FieldRule<T> {
    /// First successful extraction across `keys`, in priority order.
    pub fn resolve(&self, item: &Value) -> Option<T> {
        self.keys
            .iter()
            .filter_map(|key| item.get(*key))
            .filter(|value| !is_falsy(value))
            .find_map(|value| (self.extract)(value))
    }
}

pub const URL: FieldRule<String> = FieldRule {
    keys: &["url", "videoUrl"],
    extract: non_empty_string,
};

pub const TITLE: FieldRule<String> = FieldRule {
    keys: &["title"],
    extract: non_empty_string,
};

pub const AUTHOR: FieldRule<String> = FieldRule {
    keys: &["channelName", "author"],
    extract: non_empty_string,
};

pub const PUBLISHED_AT: FieldRule<DateTime<Utc>> = FieldRule {
    keys: &["uploadDate", "publishedAt", "publishDate", "date"],
    extract: parse_publish_date,
};

pub const DESCRIPTION: FieldRule<String> = FieldRule {
    keys: &["description", "text"],
    extract: non_empty_string,
};

pub const TAGS: FieldRule<Vec<String>> = FieldRule {
    keys: &["hashtags", "tags"],
    extract: string_list,
};

pub const DURATION: FieldRule<u32> = FieldRule {
    keys: &["durationSeconds", "duration"],
    extract: parse_duration,
};

pub const VIEWS: FieldRule<i64> = FieldRule {
    keys: &["viewCount", "views"],
    extract: parse_count,
};

pub const LIKES: FieldRule<i64> = FieldRule {
    keys: &["likeCount", "likes"],
    extract: parse_count,
};

pub const COMMENTS: FieldRule<i64> = FieldRule {
    keys: &["commentCount", "comments"],
    extract: parse_count,
};

pub const SHARES: FieldRule<i64> = FieldRule {
    keys: &["shareCount", "shares"],
    extract: parse_count,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct MappingOptions {
    /// Use `now` when no publish date can be parsed instead of skipping the item.
    pub default_missing_publish_date: bool,
}

/// Map one dataset item to a [`Reference`].
///
/// Returns `None` for items that are not objects, have no URL, or have no
/// parseable publish date (unless [`MappingOptions::default_missing_publish_date`]
/// is set).
#[must_use]
pub fn map_item(
    item: &Value,
    platform: Platform,
    options: &MappingOptions,
    now: DateTime<Utc>,
) -> Option<Reference> {
    if !item.is_object() {
        return None;
    }

    let url = URL.resolve(item)?;
    let published_at = match PUBLISHED_AT.resolve(item) {
        Some(dt) => dt,
        None if options.default_missing_publish_date => now,
        None => return None,
    };

    let metrics = EngagementMetrics {
        views: VIEWS.resolve(item).unwrap_or(0),
        likes: LIKES.resolve(item).unwrap_or(0),
        comments: COMMENTS.resolve(item).unwrap_or(0),
        shares: SHARES.resolve(item).unwrap_or(0),
    };

    Some(Reference {
        platform,
        url,
        title: TITLE
            .resolve(item)
            .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        author: AUTHOR.resolve(item),
        published_at,
        metrics,
        duration_secs: DURATION.resolve(item),
        description: DESCRIPTION.resolve(item),
        tags: TAGS.resolve(item).unwrap_or_default(),
        raw: item.clone(),
    })
}

/// Map every item, dropping the ones [`map_item`] rejects.
#[must_use]
pub fn map_items(
    items: &[Value],
    platform: Platform,
    options: &MappingOptions,
    now: DateTime<Utc>,
) -> Vec<Reference> {
    let references: Vec<Reference> = items
        .iter()
        .filter_map(|item| map_item(item, platform, options, now))
        .collect();

    let skipped = items.len() - references.len();
    if skipped > 0 {
        tracing::debug!(
            total = items.len(),
            skipped,
            "dropped dataset items without a usable url or publish date"
        );
    }
    references
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 1, 0, 0, 0).unwrap()
    }

    fn strict() -> MappingOptions {
        MappingOptions::default()
    }

    #[test]
    fn maps_primary_keys() {
        let item = json!({
            "url": "https://www.youtube.com/watch?v=abc",
            "title": "Юнит экономика",
            "channelName": "WB School",
            "uploadDate": "2025-04-20T10:00:00Z",
            "description": "Считаем маржу",
            "hashtags": ["#wb", "#ozon"],
            "durationSeconds": 754,
            "viewCount": "35,369",
            "likeCount": 1200,
            "commentCount": "87"
        });
        let r = map_item(&item, Platform::Youtube, &strict(), now()).unwrap();
        assert_eq!(r.url, "https://www.youtube.com/watch?v=abc");
        assert_eq!(r.title, "Юнит экономика");
        assert_eq!(r.author.as_deref(), Some("WB School"));
        assert_eq!(r.metrics.views, 35_369);
        assert_eq!(r.metrics.likes, 1200);
        assert_eq!(r.metrics.comments, 87);
        assert_eq!(r.metrics.shares, 0);
        assert_eq!(r.duration_secs, Some(754));
        assert_eq!(r.tags, vec!["#wb", "#ozon"]);
        assert_eq!(r.raw, item);
    }

    #[test]
    fn falls_through_to_alternate_keys() {
        let item = json!({
            "url": "",
            "videoUrl": "https://youtu.be/xyz",
            "author": "Seller",
            "uploadDate": null,
            "publishedAt": "not a date",
            "date": "2025-04-01",
            "text": "Описание",
            "duration": "10:05",
            "views": 12
        });
        let r = map_item(&item, Platform::Youtube, &strict(), now()).unwrap();
        assert_eq!(r.url, "https://youtu.be/xyz");
        assert_eq!(r.author.as_deref(), Some("Seller"));
        assert_eq!(
            r.published_at,
            Utc.with_ymd_and_hms(2025, 4, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(r.description.as_deref(), Some("Описание"));
        assert_eq!(r.duration_secs, Some(605));
        assert_eq!(r.metrics.views, 12);
        assert_eq!(r.title, DEFAULT_TITLE);
        assert!(r.tags.is_empty());
    }

    #[test]
    fn missing_url_is_skipped() {
        let item = json!({"title": "x", "uploadDate": "2025-04-01"});
        assert!(map_item(&item, Platform::Youtube, &strict(), now()).is_none());
    }

    #[test]
    fn missing_date_is_skipped_unless_defaulted() {
        let item = json!({"url": "https://youtu.be/a", "uploadDate": "yesterday"});
        assert!(map_item(&item, Platform::Youtube, &strict(), now()).is_none());

        let lenient = MappingOptions {
            default_missing_publish_date: true,
        };
        let r = map_item(&item, Platform::Youtube, &lenient, now()).unwrap();
        assert_eq!(r.published_at, now());
    }

    #[test]
    fn non_object_items_are_skipped() {
        assert!(map_item(&json!("https://youtu.be/a"), Platform::Youtube, &strict(), now()).is_none());
    }

    #[test]
    fn map_items_keeps_order_and_drops_invalid() {
        let items = vec![
            json!({"url": "https://youtu.be/1", "date": "2025-04-01"}),
            json!({"title": "no url"}),
            json!({"url": "https://youtu.be/2", "date": "2025-04-02"}),
        ];
        let refs = map_items(&items, Platform::Youtube, &strict(), now());
        let urls: Vec<&str> = refs.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(urls, vec!["https://youtu.be/1", "https://youtu.be/2"]);
    }

    #[test]
    fn rule_skips_values_the_extractor_rejects() {
        let item = json!({"viewCount": "n/a", "views": "1,000"});
        assert_eq!(VIEWS.resolve(&item), Some(1000));
    }
}
