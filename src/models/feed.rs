// src/models/feed.rs

use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use super::lenient;

/// The three content feeds. They share one item shape and one set of operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedKind {
    Notes,
    News,
    Guides,
}

impl FeedKind {
    pub const ALL: [FeedKind; 3] = [FeedKind::Notes, FeedKind::News, FeedKind::Guides];

    /// Route segment and log label.
    pub fn as_str(self) -> &'static str {
        match self {
            FeedKind::Notes => "notes",
            FeedKind::News => "news",
            FeedKind::Guides => "guides",
        }
    }

    pub fn file_name(self) -> String {
        format!("{}.json", self.as_str())
    }
}

/// One entry of a feed document.
///
/// Older documents hold whatever clients posted, so every field reads `null`
/// as empty and other non-strings as their JSON text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedItem {
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub desc: String,
    /// Author login as reported by the client.
    #[serde(default, deserialize_with = "lenient::string")]
    pub user: String,
    /// Image URL or data URL.
    #[serde(default, deserialize_with = "lenient::string")]
    pub image: String,
}

/// DTO for posting a new feed item. Missing or `null` fields become empty strings.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct NewFeedItem {
    #[validate(length(max = 200))]
    #[serde(deserialize_with = "lenient::string")]
    pub title: String,
    #[validate(length(max = 20000))]
    #[serde(deserialize_with = "lenient::string")]
    pub desc: String,
    #[validate(length(max = 100))]
    #[serde(deserialize_with = "lenient::string")]
    pub user: String,
    #[serde(deserialize_with = "lenient::string")]
    pub image: String,
}

#[derive(Debug, Deserialize)]
pub struct FeedIndexRequest {
    pub index: Option<Value>,
}

/// DTO for editing a feed item. Only supplied fields change.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateFeedItemRequest {
    pub index: Option<Value>,
    #[validate(length(max = 200))]
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub title: Option<String>,
    #[validate(length(max = 20000))]
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub desc: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub image: Option<String>,
}

/// Reads a list position from an integer or a numeric string.
pub fn parse_index(raw: Option<&Value>) -> Option<usize> {
    let index = match raw? {
        Value::Number(n) => n.as_i64()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    usize::try_from(index).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_index_accepts_integers_and_numeric_strings() {
        assert_eq!(parse_index(Some(&json!(2))), Some(2));
        assert_eq!(parse_index(Some(&json!(" 4 "))), Some(4));
        assert_eq!(parse_index(Some(&json!(-1))), None);
        assert_eq!(parse_index(Some(&json!(1.5))), None);
        assert_eq!(parse_index(Some(&json!("two"))), None);
        assert_eq!(parse_index(None), None);
    }

    #[test]
    fn stored_items_with_loose_types_load() {
        let items: Vec<FeedItem> = serde_json::from_value(json!([
            {"title": "a", "desc": "b", "user": "u", "image": null},
            {"title": 7, "desc": false}
        ]))
        .unwrap();

        assert_eq!(items[0].image, "");
        assert_eq!(items[1].title, "7");
        assert_eq!(items[1].desc, "false");
        assert_eq!(items[1].user, "");
    }

    #[test]
    fn new_item_reads_null_as_empty() {
        let item: NewFeedItem =
            serde_json::from_value(json!({"title": "t", "image": null})).unwrap();

        assert_eq!(item.title, "t");
        assert_eq!(item.image, "");
        assert_eq!(item.desc, "");
    }
}
