use log::{debug, warn};

use super::{BookmarkOutcome, Redirect, Step, WizardState};
use crate::{
    model::{playlist::Playlist, track::TrackSelection, tweet::TweetCollection},
    service::Service,
    token::TokenValidity,
};

/// Something that happened to the wizard: a user action or the completion of a network call.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The token store was checked.
    TokensChecked(TokenValidity),
    /// The user pressed "get started" on the intro screen.
    GetStarted,
    /// The page was loaded with redirect parameters from a sign-in flow.
    Redirected(Redirect),
    /// The sign-in flow of a service succeeded without a page load.
    SignedIn(Service),
    /// The user's bookmarks were fetched. `Some` if they contain track links.
    TrackSelectionLoaded(Option<TweetCollection>),
    /// Tweets to suggest for bookmarking were found.
    SuggestionsReceived(TweetCollection),
    /// The tracks in the tweets were resolved, or the user changed their selection.
    TracksReceived(TrackSelection),
    /// A long-running action started.
    LoadingStarted,
    /// Every suggested tweet has been attempted to be bookmarked.
    BookmarksWritten(BookmarkOutcome),
    PlaylistCreated(Playlist),
    /// A network call the current step depends on failed.
    NetworkFailed,
    /// The user pressed "retry" on the error screen.
    Retry,
    NotificationClosed,
    /// The track list couldn't be loaded.
    TrackListFailed,
}

/// Work the wizard has to do before it can settle on its next step. The controller performs the effect and feeds
/// the result back in as an [Event].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Check the user's bookmarks for tracks, resulting in [Event::TrackSelectionLoaded] or [Event::NetworkFailed].
    LoadTrackSelection,
}

/// Compute the wizard's next state. Events that make no sense at the current step leave the state untouched.
pub fn transition(mut state: WizardState, event: Event) -> (WizardState, Option<Effect>) {
    let step = state.step;
    debug!("{event:?} at step {step}");

    let effect = match (step, event) {
        (_, Event::TokensChecked(validity)) => {
            state.token_validity = validity;
            None
        }

        (Step::Start, Event::GetStarted) => match state.token_validity.first_unauthorized() {
            Some(service) => {
                state.step = service.into();
                None
            }
            None => Some(Effect::LoadTrackSelection),
        },

        (Step::Start, Event::Redirected(redirect)) => match (redirect.success, redirect.service) {
            (Some(true), Some(Service::Spotify)) => after_spotify_sign_in(&mut state),
            (Some(true), Some(Service::Twitter)) => Some(Effect::LoadTrackSelection),
            (Some(false), Some(service)) => {
                state.step = service.into();
                None
            }
            _ => None,
        },

        (Step::Spotify, Event::SignedIn(Service::Spotify)) => {
            state.token_validity.set_valid(Service::Spotify, true);
            after_spotify_sign_in(&mut state)
        }

        (Step::Twitter, Event::SignedIn(Service::Twitter)) => {
            state.token_validity.set_valid(Service::Twitter, true);
            Some(Effect::LoadTrackSelection)
        }

        (Step::Start | Step::Spotify | Step::Twitter, Event::TrackSelectionLoaded(bookmarks)) => {
            state.flags.loading = false;

            match bookmarks {
                Some(bookmarks) => {
                    state.step = Step::AddTracksFromBookmarks;
                    state.bookmarkable_tweets = Some(bookmarks);
                }
                None => state.step = Step::AddTracksFromSearch,
            }

            None
        }

        (Step::AddTracksFromSearch, Event::SuggestionsReceived(suggestions)) => {
            state.flags.track_list_error = false;
            state.bookmarkable_tweets = Some(suggestions);
            None
        }

        (Step::AddTracksFromSearch, Event::BookmarksWritten(outcome)) => {
            state.flags.loading = false;
            apply_bookmark_outcome(&mut state, outcome);
            None
        }

        (Step::AddTracksFromBookmarks, Event::TracksReceived(tracks)) => {
            state.flags.track_list_error = false;
            state.tracks = tracks;
            None
        }

        (Step::AddTracksFromBookmarks, Event::PlaylistCreated(playlist)) => {
            state.flags.loading = false;
            state.step = Step::End;
            state.playlist = Some(playlist);
            None
        }

        (_, Event::LoadingStarted) => {
            state.flags.loading = true;
            None
        }

        (Step::Error, Event::NetworkFailed) => {
            // keep the step captured by the first failure
            state.flags.loading = false;
            None
        }

        (_, Event::NetworkFailed) => {
            state.flags.loading = false;
            state.step_before_error = Some(step);
            state.step = Step::Error;
            None
        }

        (Step::Error, Event::Retry) => {
            state.step = state.step_before_error.take().unwrap_or_default();
            None
        }

        (_, Event::NotificationClosed) => {
            state.flags.notification_open = false;
            None
        }

        (_, Event::TrackListFailed) => {
            state.flags.track_list_error = true;
            None
        }

        (step, event) => {
            warn!("Ignoring {event:?} at step {step}");
            None
        }
    };

    (state, effect)
}

fn after_spotify_sign_in(state: &mut WizardState) -> Option<Effect> {
    if state.token_validity.twitter {
        Some(Effect::LoadTrackSelection)
    } else {
        state.step = Step::Twitter;
        None
    }
}

fn apply_bookmark_outcome(state: &mut WizardState, outcome: BookmarkOutcome) {
    if outcome.all_failed() {
        warn!("None of the {} tweets could be bookmarked", outcome.failed.len());
        state.flags.track_list_error = true;
    } else {
        state.flags.track_list_error = !outcome.failed.is_empty();
        state.flags.notification_open = true;
        state.step = Step::AddTracksFromBookmarks;

        if let Some(tweets) = state.bookmarkable_tweets.as_mut() {
            tweets.data.retain(|tweet| outcome.added.contains(&tweet.id));
        }
    }

    state.bookmark_outcome = Some(outcome);
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn at(step: Step) -> WizardState {
        WizardState {
            step,
            ..Default::default()
        }
    }

    fn valid(spotify: bool, twitter: bool) -> WizardState {
        WizardState::new(TokenValidity { spotify, twitter })
    }

    fn tweets(ids: &[&str]) -> TweetCollection {
        serde_json::from_value(json!({
            "data": ids.iter().map(|id| json!({"id": id, "text": ""})).collect::<Vec<_>>()
        }))
        .unwrap()
    }

    #[test]
    fn get_started_asks_for_spotify_first() {
        let (state, effect) = transition(valid(false, false), Event::GetStarted);
        assert_eq!(state.step, Step::Spotify);
        assert_eq!(effect, None);

        let (state, _) = transition(valid(false, true), Event::GetStarted);
        assert_eq!(state.step, Step::Spotify);
    }

    #[test]
    fn get_started_asks_for_twitter_second() {
        let (state, effect) = transition(valid(true, false), Event::GetStarted);
        assert_eq!(state.step, Step::Twitter);
        assert_eq!(effect, None);
    }

    #[test]
    fn get_started_with_both_tokens_loads_tracks() {
        let (state, effect) = transition(valid(true, true), Event::GetStarted);
        assert_eq!(state.step, Step::Start);
        assert_eq!(effect, Some(Effect::LoadTrackSelection));
    }

    #[test]
    fn spotify_redirect_with_valid_twitter_token_skips_twitter() {
        let redirect = Redirect {
            service: Some(Service::Spotify),
            success: Some(true),
        };

        let (_, effect) = transition(valid(true, true), Event::Redirected(redirect));
        assert_eq!(effect, Some(Effect::LoadTrackSelection));

        let (state, effect) = transition(valid(true, false), Event::Redirected(redirect));
        assert_eq!(state.step, Step::Twitter);
        assert_eq!(effect, None);
    }

    #[test]
    fn failed_redirect_returns_to_authorization() {
        let redirect = Redirect {
            service: Some(Service::Spotify),
            success: Some(false),
        };

        let (state, effect) = transition(valid(true, true), Event::Redirected(redirect));
        assert_eq!(state.step, Step::Spotify);
        assert_eq!(effect, None);
    }

    #[test]
    fn redirect_is_ignored_past_start() {
        let redirect = Redirect {
            service: Some(Service::Twitter),
            success: Some(true),
        };

        let (state, effect) = transition(at(Step::End), Event::Redirected(redirect));
        assert_eq!(state.step, Step::End);
        assert_eq!(effect, None);
    }

    #[test]
    fn spotify_sign_in_moves_to_twitter() {
        let (state, effect) = transition(at(Step::Spotify), Event::SignedIn(Service::Spotify));

        assert_eq!(state.step, Step::Twitter);
        assert!(state.token_validity.spotify);
        assert_eq!(effect, None);
    }

    #[test]
    fn twitter_sign_in_loads_tracks() {
        let (_, effect) = transition(at(Step::Twitter), Event::SignedIn(Service::Twitter));
        assert_eq!(effect, Some(Effect::LoadTrackSelection));
    }

    #[test]
    fn sign_in_for_the_wrong_screen_is_ignored() {
        let (state, effect) = transition(at(Step::Spotify), Event::SignedIn(Service::Twitter));

        assert_eq!(state, at(Step::Spotify));
        assert_eq!(effect, None);
    }

    #[test]
    fn bookmarks_with_tracks_go_to_bookmarks_path() {
        let (state, _) = transition(at(Step::Twitter), Event::TrackSelectionLoaded(Some(tweets(&["1"]))));

        assert_eq!(state.step, Step::AddTracksFromBookmarks);
        assert_eq!(state.bookmarkable_tweets, Some(tweets(&["1"])));
    }

    #[test]
    fn bookmarks_without_tracks_go_to_search_path() {
        let (state, _) = transition(at(Step::Start), Event::TrackSelectionLoaded(None));

        assert_eq!(state.step, Step::AddTracksFromSearch);
        assert_eq!(state.bookmarkable_tweets, None);
    }

    #[test]
    fn failure_captures_step_and_retry_restores_it() {
        let (state, _) = transition(at(Step::AddTracksFromBookmarks), Event::NetworkFailed);
        assert_eq!(state.step, Step::Error);
        assert_eq!(state.step_before_error, Some(Step::AddTracksFromBookmarks));

        let (state, _) = transition(state, Event::Retry);
        assert_eq!(state.step, Step::AddTracksFromBookmarks);
        assert_eq!(state.step_before_error, None);
    }

    #[test]
    fn second_failure_keeps_first_capture() {
        let (state, _) = transition(at(Step::Twitter), Event::NetworkFailed);
        let (state, _) = transition(state, Event::NetworkFailed);

        assert_eq!(state.step_before_error, Some(Step::Twitter));
    }

    #[test]
    fn retry_only_applies_to_error() {
        let (state, _) = transition(at(Step::End), Event::Retry);
        assert_eq!(state.step, Step::End);
    }

    #[test]
    fn all_bookmarks_written() {
        let mut state = at(Step::AddTracksFromSearch);
        state.bookmarkable_tweets = Some(tweets(&["1", "2"]));
        state.flags.loading = true;

        let outcome = BookmarkOutcome {
            added: vec!["1".to_owned(), "2".to_owned()],
            failed: Vec::new(),
        };

        let (state, _) = transition(state, Event::BookmarksWritten(outcome));

        assert_eq!(state.step, Step::AddTracksFromBookmarks);
        assert!(state.flags.notification_open);
        assert!(!state.flags.track_list_error);
        assert!(!state.flags.loading);
        assert_eq!(state.bookmarkable_tweets, Some(tweets(&["1", "2"])));
    }

    #[test]
    fn some_bookmarks_failed() {
        let mut state = at(Step::AddTracksFromSearch);
        state.bookmarkable_tweets = Some(tweets(&["1", "2"]));

        let outcome = BookmarkOutcome {
            added: vec!["2".to_owned()],
            failed: vec!["1".to_owned()],
        };

        let (state, _) = transition(state, Event::BookmarksWritten(outcome));

        assert_eq!(state.step, Step::AddTracksFromBookmarks);
        assert!(state.flags.notification_open);
        assert!(state.flags.track_list_error);
        assert_eq!(state.bookmarkable_tweets, Some(tweets(&["2"])));
        assert_eq!(state.bookmark_outcome.as_ref().unwrap().failed, vec!["1"]);

        let (state, _) = transition(state, Event::TracksReceived(TrackSelection::new()));
        assert!(!state.flags.track_list_error);
        assert!(state.bookmark_outcome.is_some());
    }

    #[test]
    fn all_bookmarks_failed() {
        let mut state = at(Step::AddTracksFromSearch);
        state.bookmarkable_tweets = Some(tweets(&["1"]));

        let outcome = BookmarkOutcome {
            added: Vec::new(),
            failed: vec!["1".to_owned()],
        };

        let (state, _) = transition(state, Event::BookmarksWritten(outcome));

        assert_eq!(state.step, Step::AddTracksFromSearch);
        assert!(state.flags.track_list_error);
        assert!(!state.flags.notification_open);
        assert_eq!(state.bookmarkable_tweets, Some(tweets(&["1"])));
    }

    #[test]
    fn playlist_created() {
        let playlist = Playlist {
            id: "p1".to_owned(),
            name: "x".to_owned(),
            uri: "spotify:playlist:p1".to_owned(),
            external_urls: Default::default(),
        };

        let (state, _) = transition(at(Step::AddTracksFromBookmarks), Event::PlaylistCreated(playlist.clone()));

        assert_eq!(state.step, Step::End);
        assert_eq!(state.playlist, Some(playlist));
    }

    #[test]
    fn notification_and_track_list_flags() {
        let (state, _) = transition(at(Step::AddTracksFromSearch), Event::TrackListFailed);
        assert!(state.flags.track_list_error);

        let mut state = state;
        state.flags.notification_open = true;
        let (state, _) = transition(state, Event::NotificationClosed);
        assert!(!state.flags.notification_open);
    }
}
