use serde::{Deserialize, Serialize};

use crate::model::track::Track;

pub const TWEET_FIELDS_QUERY: &str = "tweet.fields";
pub const EXPANSIONS_QUERY: &str = "expansions";
pub const USER_FIELDS_QUERY: &str = "user.fields";
pub const SEARCH_QUERY: &str = "query";
pub const MAX_RESULTS_QUERY: &str = "max_results";

pub const TWEET_FIELDS: &str = "entities";
pub const EXPANSIONS: &str = "author_id";
pub const USER_FIELDS: &str = "verified";

/// Tweets that link to a Spotify track, excluding retweets so the same tweet doesn't show up several times.
pub const TRACK_TWEETS_SEARCH: &str = "url:\"open.spotify.com/track\" has:links -is:retweet";

pub const TRACKS_IDS_QUERY: &str = "ids";

// the most IDs the several tracks endpoint accepts at once
pub const TRACKS_LOOKUP_LIMIT: usize = 50;
// the most URIs a single add items request accepts
pub const PLAYLIST_ADD_LIMIT: usize = 100;

/// Twitter wraps every v2 response's payload in a `data` field.
#[derive(Debug, Deserialize)]
pub struct DataResponse<T> {
    pub data: T,
}

#[derive(Debug, Serialize)]
pub struct AddBookmarkBody<'a> {
    pub tweet_id: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct BookmarkedResponse {
    pub bookmarked: bool,
}

#[derive(Debug, Deserialize)]
pub struct TracksResponse {
    tracks: Vec<Option<Track>>,
}

#[derive(Debug, Serialize)]
pub struct AddItemsBody<'a> {
    pub uris: &'a [String],
}

#[derive(Debug, Deserialize)]
pub struct SnapshotResponse {
    // the wizard doesn't need the snapshot but keep it around for logging purposes
    #[allow(dead_code)]
    pub snapshot_id: String,
}

impl From<TracksResponse> for Vec<Track> {
    fn from(response: TracksResponse) -> Self {
        // IDs Spotify doesn't know about come back as nulls
        response.tracks.into_iter().flatten().collect()
    }
}
