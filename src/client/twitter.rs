use async_trait::async_trait;
use log::debug;
use reqwest::Method;

use super::{
    object::{self, AddBookmarkBody, BookmarkedResponse, DataResponse},
    proxy::SendProxyRequest,
    request_builder::RequestBuilder,
    TWITTER_RECENT_SEARCH_ENDPOINT, TWITTER_USERS_ENDPOINT, TWITTER_USERS_ME_ENDPOINT,
};
use crate::{
    error::Result,
    model::{tweet::TweetCollection, user::TwitterUser},
};

/// The Twitter endpoints the wizard uses. Every [SendProxyRequest] implements this trait.
///
/// The user must have authorized Twitter with at least the `tweet.read`, `users.read`, `bookmark.read` and
/// `bookmark.write` scopes.
#[async_trait]
pub trait TwitterClient: SendProxyRequest {
    /// Get the user the Twitter token belongs to.
    async fn authenticated_user(&self) -> Result<TwitterUser> {
        let response: DataResponse<TwitterUser> = RequestBuilder::new(self, Method::GET, TWITTER_USERS_ME_ENDPOINT)
            .send()
            .await?;

        debug!("Authenticated Twitter user: {}", response.data.id);
        Ok(response.data)
    }

    /// Get the user's bookmarked tweets with their link entities and authors expanded. Only the first page is
    /// fetched.
    async fn bookmarks(&self, user_id: &str) -> Result<TweetCollection> {
        RequestBuilder::new(
            self,
            Method::GET,
            format!("{}/{}/bookmarks", TWITTER_USERS_ENDPOINT, user_id),
        )
        .append_query(object::TWEET_FIELDS_QUERY, object::TWEET_FIELDS)
        .append_query(object::EXPANSIONS_QUERY, object::EXPANSIONS)
        .append_query(object::USER_FIELDS_QUERY, object::USER_FIELDS)
        .send()
        .await
    }

    /// Bookmark a tweet on behalf of the user. Returns whether the tweet is now bookmarked.
    async fn add_bookmark(&self, user_id: &str, tweet_id: &str) -> Result<bool> {
        let response: DataResponse<BookmarkedResponse> = RequestBuilder::new(
            self,
            Method::POST,
            format!("{}/{}/bookmarks", TWITTER_USERS_ENDPOINT, user_id),
        )
        .body(AddBookmarkBody { tweet_id })
        .send()
        .await?;

        Ok(response.data.bookmarked)
    }

    /// Search recent tweets that link to Spotify tracks. Twitter accepts `max_results` between 10 and 100.
    async fn search_track_tweets(&self, max_results: u32) -> Result<TweetCollection> {
        RequestBuilder::new(self, Method::GET, TWITTER_RECENT_SEARCH_ENDPOINT)
            .append_query(object::SEARCH_QUERY, object::TRACK_TWEETS_SEARCH)
            .append_query(object::TWEET_FIELDS_QUERY, object::TWEET_FIELDS)
            .append_query(object::EXPANSIONS_QUERY, object::EXPANSIONS)
            .append_query(object::USER_FIELDS_QUERY, object::USER_FIELDS)
            .append_query(object::MAX_RESULTS_QUERY, max_results.to_string())
            .send()
            .await
    }
}

impl<C> TwitterClient for C where C: SendProxyRequest + ?Sized {}
