//! Finding Spotify tracks in tweets.
//!
//! Discovery happens in two places in the wizard: first the user's bookmarks are checked for track links, and if
//! there are none, recent tweets with track links are suggested for bookmarking. Either way the tweets eventually
//! have their links resolved into Spotify tracks with [resolve_tracks].

use std::collections::{HashMap, HashSet};

use log::{debug, info};

use crate::{
    client::{SpotifyClient, TwitterClient},
    error::Result,
    model::{id::TrackId, track::TrackSelection, tweet::TweetCollection},
};

/// Fetch the user's bookmarks. Returns the bookmarks if at least one of them links to a Spotify track, otherwise
/// `None`.
pub async fn find_bookmarked_tracks<C>(client: &C) -> Result<Option<TweetCollection>>
where
    C: TwitterClient + ?Sized,
{
    let user = client.authenticated_user().await?;
    let bookmarks = client.bookmarks(&user.id).await?;

    if bookmarks.has_track_links() {
        info!("Found track links in {}'s bookmarks", user.id);
        Ok(Some(bookmarks))
    } else {
        info!("No track links in {}'s {} bookmarks", user.id, bookmarks.data.len());
        Ok(None)
    }
}

/// Search for recent tweets that link to Spotify tracks. Tweets whose links Twitter couldn't unwind to a track are
/// dropped, since they wouldn't be recognized once bookmarked.
pub async fn suggest_track_tweets<C>(client: &C, count: u32) -> Result<TweetCollection>
where
    C: TwitterClient + ?Sized,
{
    let mut suggestions = client.search_track_tweets(count).await?;
    let found = suggestions.data.len();

    suggestions.data.retain(|tweet| tweet.has_track_link());
    debug!("Suggesting {} of {found} found tweets", suggestions.data.len());

    Ok(suggestions)
}

/// Look up every track the tweets link to. The selection is in tweet order and contains each track once. Links to
/// tracks Spotify doesn't know about are skipped.
pub async fn resolve_tracks<C>(client: &C, tweets: &TweetCollection) -> Result<TrackSelection>
where
    C: SpotifyClient + ?Sized,
{
    let links = tweets.track_links();

    let mut seen = HashSet::new();
    let ids: Vec<TrackId> = links
        .iter()
        .filter(|(_, id)| seen.insert(id.clone()))
        .map(|(_, id)| id.clone())
        .collect();

    if ids.is_empty() {
        return Ok(TrackSelection::new());
    }

    let tracks: HashMap<TrackId, _> = client
        .tracks(&ids)
        .await?
        .into_iter()
        .map(|track| (track.id.clone(), track))
        .collect();

    let mut selection = TrackSelection::new();
    for (tweet_id, id) in links {
        if let Some(track) = tracks.get(&id) {
            selection.insert(tweet_id, track.clone());
        }
    }

    debug!("Resolved {} tracks from {} links", selection.len(), ids.len());
    Ok(selection)
}
