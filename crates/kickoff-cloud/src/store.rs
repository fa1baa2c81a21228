use async_trait::async_trait;
use kickoff_core::ArticleRef;

use crate::CloudError;

/// Document storage holding staged articles.
#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// All documents in `collection` whose `field` equals `value`.
    async fn find_by_status(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<ArticleRef>, CloudError>;

    /// Set `field` to `value` on an existing document, leaving other fields untouched.
    async fn set_status(
        &self,
        article: &ArticleRef,
        field: &str,
        value: &str,
    ) -> Result<(), CloudError>;
}

/// Message broker topic that downstream processors subscribe to.
#[async_trait]
pub trait MessagePublisher: Send + Sync {
    /// Publish one message and wait for the broker to acknowledge it.
    ///
    /// Returns the server-assigned message ID.
    async fn publish(&self, data: &[u8]) -> Result<String, CloudError>;
}
