//! Pub/Sub REST API v1 publisher.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use serde_json::json;

use crate::auth::{NoAuth, TokenProvider, authorize};
use crate::{CloudError, MessagePublisher};

const SERVICE: &str = "pubsub";
const DEFAULT_BASE_URL: &str = "https://pubsub.googleapis.com";

pub struct PubSubClient {
    http: reqwest::Client,
    tokens: Arc<dyn TokenProvider>,
    base_url: String,
    topic_path: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PublishResponse {
    #[serde(default)]
    message_ids: Vec<String>,
}

/// `projects/{project}/topics/{topic}`
pub fn topic_path(project_id: &str, topic_id: &str) -> String {
    format!("projects/{project_id}/topics/{topic_id}")
}

impl PubSubClient {
    pub fn new(
        http: reqwest::Client,
        tokens: Arc<dyn TokenProvider>,
        base_url: impl Into<String>,
        project_id: &str,
        topic_id: &str,
    ) -> Self {
        Self {
            http,
            tokens,
            base_url: base_url.into(),
            topic_path: topic_path(project_id, topic_id),
        }
    }

    /// Production endpoint, or the emulator named by `PUBSUB_EMULATOR_HOST`.
    pub fn from_env(
        http: reqwest::Client,
        tokens: Arc<dyn TokenProvider>,
        project_id: &str,
        topic_id: &str,
    ) -> Self {
        match crate::emulator_host("PUBSUB_EMULATOR_HOST") {
            Some(host) => {
                tracing::info!(%host, "using Pub/Sub emulator");
                Self::new(
                    http,
                    Arc::new(NoAuth),
                    format!("http://{host}"),
                    project_id,
                    topic_id,
                )
            }
            None => Self::new(http, tokens, DEFAULT_BASE_URL, project_id, topic_id),
        }
    }

    /// Fully qualified topic name.
    pub fn topic(&self) -> &str {
        &self.topic_path
    }
}

impl fmt::Debug for PubSubClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PubSubClient")
            .field("base_url", &self.base_url)
            .field("topic_path", &self.topic_path)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl MessagePublisher for PubSubClient {
    async fn publish(&self, data: &[u8]) -> Result<String, CloudError> {
        let url = format!("{}/v1/{}:publish", self.base_url, self.topic_path);
        let body = json!({
            "messages": [{ "data": STANDARD.encode(data) }]
        });

        let request = authorize(self.http.post(&url).json(&body), self.tokens.as_ref()).await?;
        let response = request.send().await.map_err(|e| CloudError::Http {
            service: SERVICE,
            source: e,
        })?;

        if !response.status().is_success() {
            return Err(CloudError::from_response(SERVICE, response).await);
        }

        let reply: PublishResponse = response.json().await.map_err(|e| CloudError::Malformed {
            service: SERVICE,
            detail: e.to_string(),
        })?;

        reply
            .message_ids
            .into_iter()
            .next()
            .ok_or_else(|| CloudError::Malformed {
                service: SERVICE,
                detail: "publish response carried no message id".to_owned(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topic_path_format() {
        assert_eq!(
            topic_path("memory-library", "article-processing"),
            "projects/memory-library/topics/article-processing"
        );
    }
}
