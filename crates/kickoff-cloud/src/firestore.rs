//! Firestore REST API v1 client.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use kickoff_core::ArticleRef;
use serde::Deserialize;
use serde_json::json;

use crate::auth::{NoAuth, TokenProvider, authorize};
use crate::{ArticleStore, CloudError};

const SERVICE: &str = "firestore";
const DEFAULT_BASE_URL: &str = "https://firestore.googleapis.com/v1";

pub struct FirestoreClient {
    http: reqwest::Client,
    tokens: Arc<dyn TokenProvider>,
    base_url: String,
    /// `projects/{project}/databases/{database}`
    database_path: String,
}

#[derive(Deserialize)]
struct RunQueryRow {
    #[serde(default)]
    document: Option<Document>,
}

#[derive(Deserialize)]
struct Document {
    name: String,
}

impl FirestoreClient {
    pub fn new(
        http: reqwest::Client,
        tokens: Arc<dyn TokenProvider>,
        base_url: impl Into<String>,
        project_id: &str,
        database: &str,
    ) -> Self {
        Self {
            http,
            tokens,
            base_url: base_url.into(),
            database_path: format!("projects/{project_id}/databases/{database}"),
        }
    }

    /// Production endpoint, or the emulator named by `FIRESTORE_EMULATOR_HOST`.
    pub fn from_env(
        http: reqwest::Client,
        tokens: Arc<dyn TokenProvider>,
        project_id: &str,
        database: &str,
    ) -> Self {
        match crate::emulator_host("FIRESTORE_EMULATOR_HOST") {
            Some(host) => {
                tracing::info!(%host, "using Firestore emulator");
                Self::new(
                    http,
                    Arc::new(NoAuth),
                    format!("http://{host}/v1"),
                    project_id,
                    database,
                )
            }
            None => Self::new(http, tokens, DEFAULT_BASE_URL, project_id, database),
        }
    }

    pub fn database_path(&self) -> &str {
        &self.database_path
    }

    /// URL of a document resource. Each segment of `name` is percent-encoded,
    /// so ids containing `?`, `#` or `%` address the document itself.
    pub fn document_url(&self, name: &str) -> Result<reqwest::Url, CloudError> {
        let invalid = |detail: String| CloudError::InvalidUrl {
            service: SERVICE,
            base: self.base_url.clone(),
            detail,
        };
        let mut url = reqwest::Url::parse(&self.base_url).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| invalid("base URL cannot carry a path".to_owned()))?
            .pop_if_empty()
            .extend(name.split('/'));
        Ok(url)
    }
}

impl fmt::Debug for FirestoreClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FirestoreClient")
            .field("base_url", &self.base_url)
            .field("database_path", &self.database_path)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ArticleStore for FirestoreClient {
    async fn find_by_status(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<ArticleRef>, CloudError> {
        let url = format!("{}/{}/documents:runQuery", self.base_url, self.database_path);
        let body = json!({
            "structuredQuery": {
                "from": [{ "collectionId": collection }],
                "where": {
                    "fieldFilter": {
                        "field": { "fieldPath": field },
                        "op": "EQUAL",
                        "value": { "stringValue": value },
                    }
                }
            }
        });

        let request = authorize(self.http.post(&url).json(&body), self.tokens.as_ref()).await?;
        let response = request.send().await.map_err(|e| CloudError::Http {
            service: SERVICE,
            source: e,
        })?;

        if !response.status().is_success() {
            return Err(CloudError::from_response(SERVICE, response).await);
        }

        let rows: Vec<RunQueryRow> = response.json().await.map_err(|e| CloudError::Malformed {
            service: SERVICE,
            detail: e.to_string(),
        })?;

        // Rows without a document only carry a read time (e.g. an empty result).
        let articles: Vec<ArticleRef> = rows
            .into_iter()
            .filter_map(|row| row.document)
            .map(|doc| ArticleRef::from_name(doc.name))
            .collect();

        tracing::debug!(collection, field, value, found = articles.len(), "query complete");
        Ok(articles)
    }

    async fn set_status(
        &self,
        article: &ArticleRef,
        field: &str,
        value: &str,
    ) -> Result<(), CloudError> {
        let url = self.document_url(&article.name)?;
        let body = json!({
            "fields": { field: { "stringValue": value } }
        });

        let request = self
            .http
            .patch(url)
            .query(&[
                ("updateMask.fieldPaths", field),
                ("currentDocument.exists", "true"),
            ])
            .json(&body);
        let response = authorize(request, self.tokens.as_ref())
            .await?
            .send()
            .await
            .map_err(|e| CloudError::Http {
                service: SERVICE,
                source: e,
            })?;

        if !response.status().is_success() {
            return Err(CloudError::from_response(SERVICE, response).await);
        }

        tracing::debug!(document = %article.id, field, value, "status updated");
        Ok(())
    }
}
