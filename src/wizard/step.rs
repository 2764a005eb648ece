use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::service::Service;

/// A screen in the wizard. The wizard only ever moves forward, except for retrying after an error.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Step {
    /// The intro screen.
    #[default]
    Start,
    /// Asks the user to authorize Spotify.
    Spotify,
    /// Asks the user to authorize Twitter.
    Twitter,
    /// The user's bookmarks have no tracks; suggests tweets to bookmark.
    AddTracksFromSearch,
    /// Lists the tracks found in the user's bookmarks and offers to create a playlist.
    AddTracksFromBookmarks,
    /// The playlist has been created.
    End,
    /// Something went wrong while talking to the internet.
    Error,
}

impl Step {
    pub fn as_str(&self) -> &'static str {
        match self {
            Step::Start => "start",
            Step::Spotify => "spotify",
            Step::Twitter => "twitter",
            Step::AddTracksFromSearch => "addTracksFromSearch",
            Step::AddTracksFromBookmarks => "addTracksFromBookmarks",
            Step::End => "end",
            Step::Error => "error",
        }
    }
}

impl From<Service> for Step {
    fn from(service: Service) -> Self {
        match service {
            Service::Spotify => Step::Spotify,
            Service::Twitter => Step::Twitter,
        }
    }
}

impl Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
