use async_trait::async_trait;
use log::debug;
use reqwest::Method;

use super::{
    object::{self, AddItemsBody, SnapshotResponse, TracksResponse},
    proxy::SendProxyRequest,
    request_builder::RequestBuilder,
    SPOTIFY_ME_ENDPOINT, SPOTIFY_PLAYLISTS_ENDPOINT, SPOTIFY_TRACKS_ENDPOINT, SPOTIFY_USERS_ENDPOINT,
};
use crate::{
    error::Result,
    model::{
        id::TrackId,
        playlist::{Playlist, PlaylistDetails},
        track::Track,
        user::SpotifyUser,
    },
};

/// The Spotify endpoints the wizard uses. Every [SendProxyRequest] implements this trait.
///
/// Creating playlists requires the [PlaylistModifyPrivate or PlaylistModifyPublic scope][scopes], depending on the
/// playlist's visibility.
///
/// [scopes]: https://developer.spotify.com/documentation/web-api/concepts/scopes
#[async_trait]
pub trait SpotifyClient: SendProxyRequest {
    /// Get the current user's public profile.
    async fn current_user_profile(&self) -> Result<SpotifyUser> {
        RequestBuilder::new(self, Method::GET, SPOTIFY_ME_ENDPOINT).send().await
    }

    /// Get catalog information for the given tracks. IDs are looked up 50 at a time. Tracks Spotify cannot find are
    /// omitted from the result.
    async fn tracks(&self, ids: &[TrackId]) -> Result<Vec<Track>> {
        let mut tracks = Vec::with_capacity(ids.len());

        for chunk in ids.chunks(object::TRACKS_LOOKUP_LIMIT) {
            let joined = chunk.iter().map(TrackId::as_str).collect::<Vec<_>>().join(",");

            let response: TracksResponse = RequestBuilder::new(self, Method::GET, SPOTIFY_TRACKS_ENDPOINT)
                .append_query(object::TRACKS_IDS_QUERY, joined)
                .send()
                .await?;

            tracks.extend(Vec::<Track>::from(response));
        }

        debug!("Found {} of {} tracks", tracks.len(), ids.len());
        Ok(tracks)
    }

    /// Create a new, empty playlist for the user.
    async fn create_playlist(&self, user_id: &str, details: &PlaylistDetails) -> Result<Playlist> {
        RequestBuilder::new(
            self,
            Method::POST,
            format!("{}/{}/playlists", SPOTIFY_USERS_ENDPOINT, user_id),
        )
        .body(details)
        .send()
        .await
    }

    /// Append items to a playlist, 100 at a time.
    async fn add_tracks_to_playlist(&self, playlist_id: &str, uris: &[String]) -> Result<()> {
        for chunk in uris.chunks(object::PLAYLIST_ADD_LIMIT) {
            let response: SnapshotResponse = RequestBuilder::new(
                self,
                Method::POST,
                format!("{}/{}/tracks", SPOTIFY_PLAYLISTS_ENDPOINT, playlist_id),
            )
            .body(AddItemsBody { uris: chunk })
            .send()
            .await?;

            debug!("Added {} items to playlist {playlist_id}: {response:?}", chunk.len());
        }

        Ok(())
    }
}

impl<C> SpotifyClient for C where C: SendProxyRequest + ?Sized {}
