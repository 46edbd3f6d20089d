//! Thread posting: a chain of tweets where each one replies to the previous.

use log::{error, info};

use super::api::{TweetClient, TwitterError};
use super::models::Tweet;

/// Posts `texts` as a thread, strictly in order.
///
/// The first tweet has no reply target; every following tweet replies to the
/// id returned for the one before it. If posting tweet *k* fails the remaining
/// texts are never sent and the error is returned. Tweets already posted stay
/// on the timeline.
pub async fn post_thread(
    client: &dyn TweetClient,
    texts: &[String],
) -> Result<Vec<Tweet>, TwitterError> {
    info!("Posting thread of {} tweets", texts.len());

    let mut thread: Vec<Tweet> = Vec::with_capacity(texts.len());
    for (index, text) in texts.iter().enumerate() {
        let reply_to = thread.last().map(|previous| previous.id.as_str());
        match client.create_tweet(text, reply_to).await {
            Ok(tweet) => thread.push(tweet),
            Err(e) => {
                error!(
                    "Thread aborted at tweet {} of {} ({} already posted): {}",
                    index + 1,
                    texts.len(),
                    thread.len(),
                    e
                );
                return Err(e);
            }
        }
    }

    info!("Thread posted successfully");
    Ok(thread)
}
