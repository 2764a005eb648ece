//! Tracks and the selection of tracks discovered from tweets.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::{id::TrackId, ExternalUrls, Image};

/// A track from Spotify's catalog. Only the fields a track list needs for display are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: TrackId,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<TrackArtist>,
    pub album: Option<TrackAlbum>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackArtist {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackAlbum {
    pub name: String,
    #[serde(default)]
    pub images: Vec<Image>,
}

/// A track along with the tweet it was found in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveredTrack {
    pub tweet_id: String,
    pub track: Track,
}

/// The tracks the wizard has discovered, in the order their tweets were bookmarked. A track linked from several
/// tweets is only kept once, attributed to the first tweet.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackSelection {
    tracks: Vec<DiscoveredTrack>,
}

impl Track {
    /// The artist names joined for display, e.g. `Artist A, Artist B`.
    pub fn artist_names(&self) -> String {
        self.artists
            .iter()
            .map(|artist| artist.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl TrackSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a track. Returns `false` if the track was already in the selection.
    pub fn insert<S>(&mut self, tweet_id: S, track: Track) -> bool
    where
        S: Into<String>,
    {
        if self.contains(&track.id) {
            return false;
        }

        self.tracks.push(DiscoveredTrack {
            tweet_id: tweet_id.into(),
            track,
        });

        true
    }

    pub fn contains(&self, id: &TrackId) -> bool {
        self.tracks.iter().any(|discovered| &discovered.track.id == id)
    }

    /// Drop every track that isn't in the given set of IDs, e.g. after the user unticks some tracks.
    pub fn retain_ids(&mut self, ids: &HashSet<TrackId>) {
        self.tracks.retain(|discovered| ids.contains(&discovered.track.id));
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DiscoveredTrack> {
        self.tracks.iter()
    }

    /// The Spotify URIs of every track, in order.
    pub fn uris(&self) -> Vec<String> {
        self.tracks.iter().map(|discovered| discovered.track.id.as_uri()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(id: &str, name: &str) -> Track {
        Track {
            id: TrackId::from_bare(id).unwrap(),
            name: name.to_owned(),
            artists: vec![
                TrackArtist {
                    name: "Artist A".to_owned(),
                },
                TrackArtist {
                    name: "Artist B".to_owned(),
                },
            ],
            album: None,
            external_urls: ExternalUrls::default(),
        }
    }

    #[test]
    fn duplicate_tracks_are_kept_once() {
        let mut selection = TrackSelection::new();

        assert!(selection.insert("1", track("2pDPOMX0kWA7kcPBcDCQBu", "first")));
        assert!(selection.insert("2", track("3mXLyNsVeLelMakgpGUp1f", "second")));
        assert!(!selection.insert("3", track("2pDPOMX0kWA7kcPBcDCQBu", "first again")));

        assert_eq!(selection.len(), 2);
        assert_eq!(selection.iter().next().unwrap().tweet_id, "1");
        assert_eq!(
            selection.uris(),
            vec![
                "spotify:track:2pDPOMX0kWA7kcPBcDCQBu".to_owned(),
                "spotify:track:3mXLyNsVeLelMakgpGUp1f".to_owned()
            ]
        );
    }

    #[test]
    fn retain_selected_ids() {
        let mut selection = TrackSelection::new();
        selection.insert("1", track("2pDPOMX0kWA7kcPBcDCQBu", "first"));
        selection.insert("2", track("3mXLyNsVeLelMakgpGUp1f", "second"));

        let keep = HashSet::from([TrackId::from_bare("3mXLyNsVeLelMakgpGUp1f").unwrap()]);
        selection.retain_ids(&keep);

        assert_eq!(selection.len(), 1);
        assert_eq!(selection.iter().next().unwrap().track.name, "second");
    }

    #[test]
    fn artist_names() {
        assert_eq!(track("2pDPOMX0kWA7kcPBcDCQBu", "x").artist_names(), "Artist A, Artist B");
    }
}
