//! Writing suggested tweets back to the user's bookmarks.

use futures::future::join_all;
use log::{debug, warn};

use crate::{
    client::TwitterClient,
    error::{Error, Result},
    model::tweet::TweetCollection,
};

/// The result of bookmarking a batch of tweets. Every tweet ends up in exactly one of the lists, in the order the
/// tweets were given.
#[derive(Debug, Default)]
pub struct BookmarkReport {
    pub added: Vec<String>,
    pub failed: Vec<(String, Error)>,
}

impl BookmarkReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// Whether there was something to bookmark and none of it succeeded.
    pub fn all_failed(&self) -> bool {
        self.added.is_empty() && !self.failed.is_empty()
    }

    pub fn failed_ids(&self) -> impl Iterator<Item = &str> {
        self.failed.iter().map(|(id, _)| id.as_str())
    }
}

/// Bookmark every tweet in the collection on behalf of the user. The requests are sent concurrently and all of them
/// are attempted even if some fail.
pub async fn write_bookmarks<C>(client: &C, user_id: &str, tweets: &TweetCollection) -> BookmarkReport
where
    C: TwitterClient + ?Sized,
{
    let writes = tweets.data.iter().map(|tweet| async move {
        let result = bookmark(client, user_id, &tweet.id).await;
        (tweet.id.clone(), result)
    });

    let mut report = BookmarkReport::default();

    for (tweet_id, result) in join_all(writes).await {
        match result {
            Ok(()) => report.added.push(tweet_id),
            Err(e) => {
                warn!("Failed to bookmark tweet {tweet_id}: {e}");
                report.failed.push((tweet_id, e));
            }
        }
    }

    debug!(
        "Bookmarked {} tweets, {} failed",
        report.added.len(),
        report.failed.len()
    );

    report
}

async fn bookmark<C>(client: &C, user_id: &str, tweet_id: &str) -> Result<()>
where
    C: TwitterClient + ?Sized,
{
    if client.add_bookmark(user_id, tweet_id).await? {
        Ok(())
    } else {
        Err(Error::Api {
            status: None,
            message: format!("Twitter did not bookmark tweet {tweet_id}"),
        })
    }
}
