//! Boundary to the external summarization collaborator.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

/// Failure talking to the external summarizer.
///
/// All variants surface as upstream failures to callers; none of them
/// affects inventory state, which the insight path never mutates.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SummaryError {
    /// The request never completed (connect, DNS, timeout).
    #[error("summarizer transport failure: {0}")]
    Transport(String),

    /// The summarizer answered with a non-success status. The body is
    /// passed through untouched so callers see the upstream's own words.
    #[error("summarizer returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// A response arrived but did not carry text where expected.
    #[error("malformed summarizer response: {0}")]
    MalformedResponse(String),

    /// The summarizer returned no usable text.
    #[error("summarizer returned empty analysis")]
    Empty,
}

/// Opaque text-in, text-out summarization collaborator.
///
/// Implementations receive the finished digest and return free prose. The
/// caller checks nothing about the prose beyond non-emptiness.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, digest: &str) -> Result<String, SummaryError>;
}

#[async_trait]
impl<S> Summarizer for Arc<S>
where
    S: Summarizer + ?Sized,
{
    async fn summarize(&self, digest: &str) -> Result<String, SummaryError> {
        (**self).summarize(digest).await
    }
}
