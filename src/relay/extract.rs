//! Image URL extraction from the upstream reply.
//!
//! The upstream service does not commit to one response shape, so the relay
//! tries a fixed list of strategies in order and keeps the first hit. The
//! order is policy: a body matching several shapes resolves to the earliest.

use serde_json::Value;

pub struct UrlExtractor {
    pub name: &'static str,
    extract: fn(&Value) -> Option<String>,
}

impl UrlExtractor {
    pub fn extract(&self, body: &Value) -> Option<String> {
        (self.extract)(body)
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    let trimmed = value?.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn chat_message_content(body: &Value) -> Option<String> {
    non_empty(
        body.pointer("/choices/0/message/content")
            .and_then(|v| v.as_str()),
    )
}

fn bare_url_string(body: &Value) -> Option<String> {
    body.as_str()
        .map(str::trim)
        .filter(|value| value.starts_with("http"))
        .map(str::to_string)
}

fn url_field(body: &Value) -> Option<String> {
    non_empty(body.get("url").and_then(|v| v.as_str()))
}

fn image_url_field(body: &Value) -> Option<String> {
    non_empty(body.get("image_url").and_then(|v| v.as_str()))
}

pub const URL_EXTRACTORS: &[UrlExtractor] = &[
    UrlExtractor {
        name: "chat_message_content",
        extract: chat_message_content,
    },
    UrlExtractor {
        name: "bare_url_string",
        extract: bare_url_string,
    },
    UrlExtractor {
        name: "url_field",
        extract: url_field,
    },
    UrlExtractor {
        name: "image_url_field",
        extract: image_url_field,
    },
];

/// Returns the first URL any strategy produces, with the strategy's name.
pub fn extract_image_url(body: &Value) -> Option<(&'static str, String)> {
    URL_EXTRACTORS
        .iter()
        .find_map(|extractor| extractor.extract(body).map(|url| (extractor.name, url)))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn reads_chat_completion_content() {
        let body = json!({ "choices": [{ "message": { "content": "https://x/y.png" } }] });
        assert_eq!(
            extract_image_url(&body),
            Some(("chat_message_content", "https://x/y.png".to_string()))
        );
    }

    #[test]
    fn falls_back_to_url_field() {
        let body = json!({ "url": "https://x/y.png" });
        assert_eq!(
            extract_image_url(&body),
            Some(("url_field", "https://x/y.png".to_string()))
        );
    }

    #[test]
    fn accepts_a_bare_url_string() {
        let body = json!("https://x/y.png");
        assert_eq!(
            extract_image_url(&body),
            Some(("bare_url_string", "https://x/y.png".to_string()))
        );
        assert_eq!(extract_image_url(&json!("not a url")), None);
    }

    #[test]
    fn image_url_field_is_last_resort() {
        let body = json!({ "image_url": "https://x/z.png" });
        assert_eq!(
            extract_image_url(&body),
            Some(("image_url_field", "https://x/z.png".to_string()))
        );
    }

    #[test]
    fn earlier_strategy_wins_when_several_match() {
        let body = json!({
            "choices": [{ "message": { "content": "https://x/chat.png" } }],
            "url": "https://x/url.png",
            "image_url": "https://x/image.png"
        });
        assert_eq!(extract_image_url(&body).unwrap().1, "https://x/chat.png");

        let body = json!({ "url": "https://x/url.png", "image_url": "https://x/image.png" });
        assert_eq!(extract_image_url(&body).unwrap().1, "https://x/url.png");
    }

    #[test]
    fn empty_content_falls_through() {
        let body = json!({
            "choices": [{ "message": { "content": "" } }],
            "url": "https://x/url.png"
        });
        assert_eq!(extract_image_url(&body).unwrap().0, "url_field");
    }

    #[test]
    fn nothing_recognizable_yields_none() {
        assert_eq!(extract_image_url(&json!({})), None);
        assert_eq!(extract_image_url(&json!({ "choices": [] })), None);
        assert_eq!(extract_image_url(&json!({ "url": 42 })), None);
    }
}
