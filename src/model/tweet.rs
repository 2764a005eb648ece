//! Tweets and tweet collections, as returned by Twitter's v2 API.
//!
//! The wizard only cares about one thing in a tweet: whether one of its links unwinds to a Spotify track. Everything
//! else in the response is carried along untouched so it can be handed to a front end for display.

use log::warn;
use serde::{Deserialize, Serialize};

use super::id::{TrackId, TRACK_URL_PREFIX};

/// A collection of tweets from a bookmarks lookup or a search.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct TweetCollection {
    /// Twitter omits `data` entirely when there are no results.
    #[serde(default)]
    pub data: Vec<Tweet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub includes: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tweet {
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entities: Option<TweetEntities>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct TweetEntities {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urls: Option<Vec<UrlEntity>>,
}

/// A link in a tweet. `url` is the shortened t.co link; `unwound_url` is where it finally leads, if Twitter managed
/// to resolve it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlEntity {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expanded_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unwound_url: Option<String>,
}

impl UrlEntity {
    pub fn is_track_link(&self) -> bool {
        self.unwound_url
            .as_deref()
            .map_or(false, |url| url.starts_with(TRACK_URL_PREFIX))
    }
}

impl Tweet {
    fn urls(&self) -> &[UrlEntity] {
        self.entities
            .as_ref()
            .and_then(|entities| entities.urls.as_deref())
            .unwrap_or_default()
    }

    /// Whether any link in this tweet unwinds to a Spotify track.
    pub fn has_track_link(&self) -> bool {
        self.urls().iter().any(UrlEntity::is_track_link)
    }

    /// The tracks this tweet links to. Links that look like track links but don't contain a valid ID are skipped.
    pub fn track_ids(&self) -> Vec<TrackId> {
        self.urls()
            .iter()
            .filter(|url| url.is_track_link())
            .filter_map(|url| {
                let unwound = url.unwound_url.as_deref()?;

                match TrackId::from_url(unwound) {
                    Ok(id) => Some(id),
                    Err(e) => {
                        warn!("Skipping unusable track link {unwound} in tweet {}: {e}", self.id);
                        None
                    }
                }
            })
            .collect()
    }
}

impl TweetCollection {
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn has_track_links(&self) -> bool {
        self.data.iter().any(Tweet::has_track_link)
    }

    /// Every `(tweet ID, track ID)` pair in the collection, in tweet order.
    pub fn track_links(&self) -> Vec<(String, TrackId)> {
        self.data
            .iter()
            .flat_map(|tweet| tweet.track_ids().into_iter().map(move |id| (tweet.id.clone(), id)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn bookmarks() -> TweetCollection {
        serde_json::from_value(json!({
            "data": [
                {
                    "id": "1",
                    "text": "no links here",
                    "author_id": "100"
                },
                {
                    "id": "2",
                    "text": "look at this album https://t.co/a",
                    "entities": {
                        "urls": [{
                            "url": "https://t.co/a",
                            "unwound_url": "https://open.spotify.com/album/0tDsHtvN9YNuZjlqHvDY2P"
                        }]
                    }
                },
                {
                    "id": "3",
                    "text": "banger https://t.co/b https://t.co/c",
                    "entities": {
                        "urls": [
                            {
                                "url": "https://t.co/b",
                                "expanded_url": "https://spoti.fi/xyz"
                            },
                            {
                                "url": "https://t.co/c",
                                "unwound_url": "https://open.spotify.com/track/2pDPOMX0kWA7kcPBcDCQBu?si=abc"
                            }
                        ]
                    }
                }
            ],
            "includes": { "users": [{ "id": "100", "verified": false }] },
            "meta": { "result_count": 3 }
        }))
        .unwrap()
    }

    #[test]
    fn detects_track_links() {
        let collection = bookmarks();

        assert!(!collection.data[0].has_track_link());
        assert!(!collection.data[1].has_track_link());
        assert!(collection.data[2].has_track_link());
        assert!(collection.has_track_links());
    }

    #[test]
    fn expanded_url_alone_is_not_a_track_link() {
        let mut collection = bookmarks();
        collection.data.truncate(2);

        assert!(!collection.has_track_links());
    }

    #[test]
    fn extracts_track_links() {
        let links = bookmarks().track_links();

        assert_eq!(links.len(), 1);
        assert_eq!(links[0].0, "3");
        assert_eq!(links[0].1.as_str(), "2pDPOMX0kWA7kcPBcDCQBu");
    }

    #[test]
    fn malformed_track_link_is_skipped() {
        let tweet: Tweet = serde_json::from_value(json!({
            "id": "4",
            "entities": { "urls": [{ "url": "https://t.co/d", "unwound_url": "https://open.spotify.com/track/short" }] }
        }))
        .unwrap();

        assert!(tweet.has_track_link());
        assert!(tweet.track_ids().is_empty());
    }

    #[test]
    fn missing_data_is_empty() {
        let collection: TweetCollection = serde_json::from_value(json!({ "meta": { "result_count": 0 } })).unwrap();

        assert!(collection.is_empty());
        assert!(!collection.has_track_links());
    }
}
