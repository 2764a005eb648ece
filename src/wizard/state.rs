use serde::Serialize;

use super::Step;
use crate::{
    model::{playlist::Playlist, track::TrackSelection, tweet::TweetCollection},
    token::TokenValidity,
};

/// Everything a front end needs to render the wizard. The state is only changed through
/// [transition](super::transition).
#[derive(Debug, Default, Clone, PartialEq)]
pub struct WizardState {
    pub(super) step: Step,
    pub(super) step_before_error: Option<Step>,
    pub(super) tracks: TrackSelection,
    pub(super) bookmarkable_tweets: Option<TweetCollection>,
    pub(super) token_validity: TokenValidity,
    pub(super) flags: UiFlags,
    pub(super) playlist: Option<Playlist>,
    pub(super) bookmark_outcome: Option<BookmarkOutcome>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UiFlags {
    /// A long-running action, such as bookmarking or creating the playlist, is in progress.
    pub loading: bool,
    /// Loading the track list or bookmarking its tweets went wrong.
    pub track_list_error: bool,
    /// The "tweets bookmarked" notification is showing.
    pub notification_open: bool,
}

/// Which suggested tweets made it into the user's bookmarks.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct BookmarkOutcome {
    pub added: Vec<String>,
    pub failed: Vec<String>,
}

impl WizardState {
    pub fn new(token_validity: TokenValidity) -> Self {
        Self {
            token_validity,
            ..Default::default()
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    /// The step a retry returns to, if the wizard is at [Step::Error].
    pub fn step_before_error(&self) -> Option<Step> {
        self.step_before_error
    }

    pub fn tracks(&self) -> &TrackSelection {
        &self.tracks
    }

    /// The tweets the track list is built from: either the user's bookmarks or the suggestions to bookmark.
    pub fn bookmarkable_tweets(&self) -> Option<&TweetCollection> {
        self.bookmarkable_tweets.as_ref()
    }

    pub fn token_validity(&self) -> TokenValidity {
        self.token_validity
    }

    pub fn flags(&self) -> UiFlags {
        self.flags
    }

    pub fn playlist(&self) -> Option<&Playlist> {
        self.playlist.as_ref()
    }

    pub fn bookmark_outcome(&self) -> Option<&BookmarkOutcome> {
        self.bookmark_outcome.as_ref()
    }
}

impl BookmarkOutcome {
    pub fn all_failed(&self) -> bool {
        self.added.is_empty() && !self.failed.is_empty()
    }
}
