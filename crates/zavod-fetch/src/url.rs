//! URL normalization shared by deduplication and single-URL lookup.

use percent_encoding::percent_decode_str;
use reqwest::Url;

const SHORT_LINK_HOSTS: [&str; 1] = ["youtu.be"];
const CANONICAL_HOSTS: [&str; 3] = ["youtube.com", "www.youtube.com", "m.youtube.com"];
const VIDEO_ID_PARAM: &str = "v";

/// Normalize a video URL so that equivalent links compare equal.
///
/// - short links (`youtu.be/ID`) become `https://www.youtube.com/watch?v=ID`;
/// - canonical YouTube hosts keep only the `v` query parameter;
/// - any other host loses its query, fragment, and trailing slash.
///
/// The function is pure and idempotent. Input that does not parse as a URL
/// is stripped textually.
#[must_use]
pub fn normalize_url(raw: &str) -> String {
    let trimmed = raw.trim();
    let Ok(mut url) = Url::parse(trimmed) else {
        return strip_textually(trimmed);
    };

    let host = url.host_str().unwrap_or_default().to_lowercase();

    if SHORT_LINK_HOSTS.contains(&host.as_str()) {
        if let Some(id) = first_path_segment(&url) {
            return watch_url(&id);
        }
    }

    url.set_fragment(None);

    if CANONICAL_HOSTS.contains(&host.as_str()) {
        let video_id = url
            .query_pairs()
            .find(|(k, v)| k == VIDEO_ID_PARAM && !v.is_empty())
            .map(|(_, v)| v.into_owned());
        match video_id {
            Some(id) => {
                url.query_pairs_mut().clear().append_pair(VIDEO_ID_PARAM, &id);
            }
            None => url.set_query(None),
        }
    } else {
        url.set_query(None);
    }

    trim_trailing_slash(&mut url);
    url.to_string()
}

fn watch_url(video_id: &str) -> String {
    let mut url = Url::parse("https://www.youtube.com/watch").expect("static URL is valid");
    url.query_pairs_mut().append_pair(VIDEO_ID_PARAM, video_id);
    url.to_string()
}

fn first_path_segment(url: &Url) -> Option<String> {
    url.path_segments()?
        .find(|s| !s.is_empty())
        .map(|s| percent_decode_str(s).decode_utf8_lossy().into_owned())
}

fn trim_trailing_slash(url: &mut Url) {
    let path = url.path().to_string();
    if path.len() > 1 && path.ends_with('/') {
        url.set_path(path.trim_end_matches('/'));
    }
}

fn strip_textually(raw: &str) -> String {
    let without_fragment = raw.split('#').next().unwrap_or_default();
    let without_query = without_fragment.split('?').next().unwrap_or_default();
    without_query.trim_end_matches('/').to_string()
}
