//! Creating the playlist at the end of the wizard.

use log::info;

use crate::{
    client::SpotifyClient,
    error::{Error, Result},
    model::{
        playlist::{Playlist, PlaylistDetails},
        track::TrackSelection,
    },
};

/// Create a playlist for the current Spotify user and add every selected track to it, in selection order.
///
/// An empty selection is rejected with [Error::EmptyPlaylist] before anything is sent to Spotify.
pub async fn build_playlist<C>(client: &C, details: &PlaylistDetails, selection: &TrackSelection) -> Result<Playlist>
where
    C: SpotifyClient + ?Sized,
{
    if selection.is_empty() {
        return Err(Error::EmptyPlaylist);
    }

    let user = client.current_user_profile().await?;
    let playlist = client.create_playlist(&user.id, details).await?;
    client.add_tracks_to_playlist(&playlist.id, &selection.uris()).await?;

    info!(
        "Created playlist {} with {} tracks for {}",
        playlist.id,
        selection.len(),
        user.id
    );

    Ok(playlist)
}
