//! Splitting text into fragments and pacing them out.

use futures::stream::{Stream, StreamExt};
use std::time::Duration;

/// Fragment size used when a full reply is broken up for streaming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    /// One fragment per `char`.
    Char,
    /// One fragment per space-separated word, each followed by a single space.
    Word,
}

pub fn split(text: &str, granularity: Granularity) -> Vec<String> {
    match granularity {
        Granularity::Char => text.chars().map(String::from).collect(),
        Granularity::Word => text.split(' ').map(|w| format!("{w} ")).collect(),
    }
}

/// Sleep `delay` before releasing each item of `items`.
pub fn paced<S>(items: S, delay: Duration) -> impl Stream<Item = S::Item> + Send
where
    S: Stream + Send,
    S::Item: Send,
{
    items.then(move |item| async move {
        tokio::time::sleep(delay).await;
        item
    })
}
