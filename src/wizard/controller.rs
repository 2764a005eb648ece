use std::collections::HashSet;

use log::{debug, error, info};

use super::{
    redirect::{Redirect, CLEANED_URL},
    transition::{transition, Effect, Event},
    BookmarkOutcome, Step, WizardState,
};
use crate::{
    bookmark_writer,
    client::{SendProxyRequest, TwitterClient},
    config::Config,
    discovery,
    error::{Error, Result},
    model::{id::TrackId, playlist::PlaylistDetails},
    playlist_builder,
    service::Service,
    token::{TokenStore, TokenValidity},
};

/// Drives the wizard: performs the network calls each step needs and feeds their results through
/// [transition](super::transition).
///
/// Network failures are logged and move the wizard to [Step::Error]; they are not returned to the caller. The
/// methods only return an error when they're called at a step where they make no sense, in which case the state is
/// left untouched.
pub struct Wizard<C, S> {
    client: C,
    token_store: S,
    config: Config,
    state: WizardState,
}

impl<C, S> Wizard<C, S>
where
    C: SendProxyRequest,
    S: TokenStore,
{
    pub fn new(client: C, token_store: S, config: Config) -> Self {
        let state = WizardState::new(TokenValidity::check(&token_store));

        Self {
            client,
            token_store,
            config,
            state,
        }
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn step(&self) -> Step {
        self.state.step
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn token_store(&self) -> &S {
        &self.token_store
    }

    /// The link that starts a service's sign-in flow.
    pub fn authorize_url(&self, service: Service) -> String {
        self.config.authorize_url(service)
    }

    /// Handle the page load. If the URL carries the parameters a sign-in redirect leaves behind, they're acted upon
    /// and the URL the front end should replace the current one with is returned.
    ///
    /// Redirects are only acted upon on the intro screen.
    pub async fn mount(&mut self, url: &str) -> Result<Option<&'static str>> {
        if self.state.step != Step::Start {
            return Ok(None);
        }

        let redirect = match Redirect::from_url(url)? {
            Some(redirect) => redirect,
            None => return Ok(None),
        };

        info!("Returned from sign-in: {redirect:?}");
        self.refresh_tokens();
        self.dispatch(Event::Redirected(redirect)).await;

        Ok(Some(CLEANED_URL))
    }

    /// Move past the intro screen to the first service that needs authorizing, or straight to the tracks.
    pub async fn get_started(&mut self) -> Result<()> {
        self.expect_step(Step::Start)?;
        self.refresh_tokens();
        self.dispatch(Event::GetStarted).await;

        Ok(())
    }

    /// Called when a service's sign-in flow completes without reloading the page.
    pub async fn sign_in_succeeded(&mut self, service: Service) -> Result<()> {
        self.expect_step(service.into())?;
        self.dispatch(Event::SignedIn(service)).await;

        Ok(())
    }

    /// Find tweets with track links for the user to bookmark. A failure is shown in the track list rather than on
    /// the error screen.
    pub async fn load_suggestions(&mut self) -> Result<()> {
        self.expect_step(Step::AddTracksFromSearch)?;

        match discovery::suggest_track_tweets(&self.client, self.config.suggestion_count()).await {
            Ok(suggestions) => self.dispatch(Event::SuggestionsReceived(suggestions)).await,
            Err(e) => {
                error!("Failed to load suggestions: {e}");
                self.dispatch(Event::TrackListFailed).await;
            }
        }

        Ok(())
    }

    /// Bookmark every suggested tweet. The wizard moves on to the bookmarked tracks if at least one tweet was
    /// bookmarked.
    pub async fn add_tweets_to_bookmarks(&mut self) -> Result<()> {
        self.expect_step(Step::AddTracksFromSearch)?;

        let tweets = match &self.state.bookmarkable_tweets {
            Some(tweets) if !tweets.is_empty() => tweets.clone(),
            _ => return Err(Error::NothingToBookmark),
        };

        self.dispatch(Event::LoadingStarted).await;

        let user = match self.client.authenticated_user().await {
            Ok(user) => user,
            Err(e) => {
                error!("Failed to get the Twitter user for bookmarking: {e}");
                self.dispatch(Event::NetworkFailed).await;
                return Ok(());
            }
        };

        let report = bookmark_writer::write_bookmarks(&self.client, &user.id, &tweets).await;
        let outcome = BookmarkOutcome {
            failed: report.failed_ids().map(String::from).collect(),
            added: report.added,
        };

        self.dispatch(Event::BookmarksWritten(outcome)).await;
        Ok(())
    }

    /// Resolve the tracks linked from the bookmarked tweets.
    pub async fn load_tracks(&mut self) -> Result<()> {
        self.expect_step(Step::AddTracksFromBookmarks)?;

        let tweets = self.state.bookmarkable_tweets.clone().unwrap_or_default();

        match discovery::resolve_tracks(&self.client, &tweets).await {
            Ok(tracks) => self.dispatch(Event::TracksReceived(tracks)).await,
            Err(e) => {
                error!("Failed to resolve tracks: {e}");
                self.dispatch(Event::NetworkFailed).await;
            }
        }

        Ok(())
    }

    /// Narrow the track selection down to the given tracks.
    pub async fn select_tracks(&mut self, ids: &HashSet<TrackId>) -> Result<()> {
        self.expect_step(Step::AddTracksFromBookmarks)?;

        let mut tracks = self.state.tracks.clone();
        tracks.retain_ids(ids);
        self.dispatch(Event::TracksReceived(tracks)).await;

        Ok(())
    }

    /// Create the playlist from the selected tracks and finish the wizard.
    pub async fn create_playlist(&mut self) -> Result<()> {
        self.expect_step(Step::AddTracksFromBookmarks)?;

        if self.state.tracks.is_empty() {
            return Err(Error::EmptyPlaylist);
        }

        self.dispatch(Event::LoadingStarted).await;

        let details = PlaylistDetails::new(self.config.playlist_name());
        match playlist_builder::build_playlist(&self.client, &details, &self.state.tracks).await {
            Ok(playlist) => self.dispatch(Event::PlaylistCreated(playlist)).await,
            Err(e) => {
                error!("Failed to create playlist: {e}");
                self.dispatch(Event::NetworkFailed).await;
            }
        }

        Ok(())
    }

    /// Return to the step that failed.
    pub async fn retry(&mut self) -> Result<()> {
        self.expect_step(Step::Error)?;
        self.dispatch(Event::Retry).await;

        Ok(())
    }

    pub async fn close_notification(&mut self) {
        self.dispatch(Event::NotificationClosed).await;
    }

    /// Called by a track list that failed to load on its own.
    pub async fn track_list_failed(&mut self) {
        self.dispatch(Event::TrackListFailed).await;
    }

    fn expect_step(&self, expected: Step) -> Result<()> {
        if self.state.step == expected {
            Ok(())
        } else {
            debug!("Expected step {expected}, at {}", self.state.step);
            Err(Error::UnexpectedStep(self.state.step))
        }
    }

    fn refresh_tokens(&mut self) {
        let validity = TokenValidity::check(&self.token_store);
        self.apply(Event::TokensChecked(validity));
    }

    fn apply(&mut self, event: Event) -> Option<Effect> {
        let (state, effect) = transition(std::mem::take(&mut self.state), event);
        self.state = state;
        effect
    }

    async fn dispatch(&mut self, event: Event) {
        let mut next = Some(event);

        while let Some(event) = next.take() {
            if let Some(effect) = self.apply(event) {
                next = Some(self.perform(effect).await);
            }
        }
    }

    async fn perform(&self, effect: Effect) -> Event {
        debug!("Performing {effect:?}");

        match effect {
            Effect::LoadTrackSelection => match discovery::find_bookmarked_tracks(&self.client).await {
                Ok(bookmarks) => Event::TrackSelectionLoaded(bookmarks),
                Err(e) => {
                    error!("Failed to check bookmarks for tracks: {e}");
                    Event::NetworkFailed
                }
            },
        }
    }
}
