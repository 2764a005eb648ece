//! Playlists the wizard creates.

use serde::{Deserialize, Serialize};

use super::ExternalUrls;

/// A playlist as Spotify returns it after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub uri: String,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

/// The details of a playlist that's about to be created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaylistDetails {
    pub name: String,
    pub description: String,
    pub public: bool,
}

impl Playlist {
    /// The link a front end should point the user to.
    pub fn link(&self) -> Option<&str> {
        self.external_urls.spotify.as_deref()
    }
}

impl PlaylistDetails {
    pub fn new<S>(name: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            name: name.into(),
            description: String::from("Tracks found in my Twitter Bookmarks"),
            public: false,
        }
    }

    pub fn description<S>(self, description: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            description: description.into(),
            ..self
        }
    }

    pub fn public(self, public: bool) -> Self {
        Self { public, ..self }
    }
}
