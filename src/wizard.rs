//! The wizard state machine.
//!
//! The wizard walks the user through a fixed sequence of [steps](Step):
//!
//! 1. [Start](Step::Start), the intro screen.
//! 2. [Spotify](Step::Spotify) and [Twitter](Step::Twitter), which ask the user to authorize each service. Services
//!    that already have a valid token are skipped.
//! 3. Either [AddTracksFromBookmarks](Step::AddTracksFromBookmarks) if the user's bookmarks link to Spotify tracks, or
//!    [AddTracksFromSearch](Step::AddTracksFromSearch), which suggests tweets to bookmark first.
//! 4. [End](Step::End) once the playlist is created.
//!
//! A network failure at any step moves the wizard to [Error](Step::Error), from which the user can retry the step
//! that failed.
//!
//! The state changes in [transition], a pure function from the current state and an [Event] to the next state. Some
//! transitions need network calls before the wizard can settle; those are returned as an [Effect]. [Wizard] performs
//! the effects and the network calls of each user action.
//!
//! ```no_run
//! # async fn run() -> tweetjam::error::Result<()> {
//! use std::sync::Arc;
//!
//! use tweetjam::{
//!     client::ProxyClient,
//!     config::Config,
//!     token::CookieTokenStore,
//!     wizard::{Step, Wizard},
//! };
//!
//! let config = Config::from_env();
//! let cookies = Arc::new(CookieTokenStore::from_cookie_header("spotify_token=..."));
//! let client = ProxyClient::builder(config.proxy_url())
//!     .cookie_jar(Arc::clone(&cookies))
//!     .build()?;
//!
//! let mut wizard = Wizard::new(client, cookies, config);
//! wizard.mount("/?service=twitter&success=1").await?;
//!
//! if wizard.step() == Step::AddTracksFromBookmarks {
//!     wizard.load_tracks().await?;
//!     wizard.create_playlist().await?;
//! }
//! # Ok(())
//! # }
//! ```

mod controller;
mod redirect;
mod state;
mod step;
mod transition;

pub use controller::Wizard;
pub use redirect::{Redirect, CLEANED_URL};
pub use state::{BookmarkOutcome, UiFlags, WizardState};
pub use step::Step;
pub use transition::{transition, Effect, Event};
