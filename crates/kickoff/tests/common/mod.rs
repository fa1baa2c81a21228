#![allow(dead_code)]

use async_trait::async_trait;
use kickoff_cloud::{ArticleStore, CloudError, MessagePublisher};
use kickoff_core::ArticleRef;
use mockall::mock;

mock! {
    pub Store {}

    #[async_trait]
    impl ArticleStore for Store {
        async fn find_by_status(
            &self,
            collection: &str,
            field: &str,
            value: &str,
        ) -> Result<Vec<ArticleRef>, CloudError>;

        async fn set_status(
            &self,
            article: &ArticleRef,
            field: &str,
            value: &str,
        ) -> Result<(), CloudError>;
    }
}

mock! {
    pub Publisher {}

    #[async_trait]
    impl MessagePublisher for Publisher {
        async fn publish(&self, data: &[u8]) -> Result<String, CloudError>;
    }
}

pub fn article(id: &str) -> ArticleRef {
    ArticleRef::from_name(format!(
        "projects/memory-library/databases/(default)/documents/staging_articles/{id}"
    ))
}

pub fn api_error(status: u16) -> CloudError {
    CloudError::Api {
        service: "test",
        status,
        body: "boom".to_owned(),
    }
}
