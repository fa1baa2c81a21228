use std::fmt;
use std::sync::Arc;

use kickoff_cloud::{
    ArticleStore, CloudError, FirestoreClient, MessagePublisher, PubSubClient, TokenProvider,
};
use kickoff_core::{KickoffConfig, WorkflowConfig};
use secrecy::SecretString;

use crate::error::InitError;

/// Shared application state.
///
/// Backends that failed to initialize are `None`: the service still starts
/// and answers `POST /` with a configuration error, mirroring how Cloud Run
/// keeps a revision serving while its dependencies are misconfigured.
///
/// The optional `server_key` is wrapped in [`SecretString`] to prevent
/// accidental logging or debug output.
#[derive(Clone)]
pub struct AppState {
    pub store: Option<Arc<dyn ArticleStore>>,
    pub publisher: Option<Arc<dyn MessagePublisher>>,
    pub workflow: WorkflowConfig,
    /// Optional pre-shared key required on `POST /`.
    /// Set `KICKOFF_SERVER_KEY` environment variable to enable `X-Server-Key` header auth.
    pub server_key: Option<SecretString>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("store", &self.store.is_some())
            .field("publisher", &self.publisher.is_some())
            .field("workflow", &self.workflow)
            .field(
                "server_key",
                &self.server_key.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl AppState {
    pub fn new(
        store: Option<Arc<dyn ArticleStore>>,
        publisher: Option<Arc<dyn MessagePublisher>>,
        workflow: WorkflowConfig,
    ) -> Self {
        Self {
            store,
            publisher,
            workflow,
            server_key: None,
        }
    }

    pub fn with_server_key(mut self, key: Option<SecretString>) -> Self {
        self.server_key = key;
        self
    }

    /// Build Firestore and Pub/Sub clients from config.
    ///
    /// Both clients share one HTTP client and one token provider. Failures
    /// are logged and leave the corresponding handle empty.
    pub fn initialize(config: &KickoffConfig) -> Self {
        let server_key = server_key_from_env();
        tracing::debug!(
            server_key_configured = server_key.is_some(),
            "initializing AppState"
        );
        let state = Self::new(None, None, config.workflow.clone()).with_server_key(server_key);

        let credentials = match Credentials::from_env() {
            Ok(credentials) => credentials,
            Err(e) => {
                tracing::error!(error = %e, "failed to load Google credentials");
                return state;
            }
        };

        let store = match connect_store(config, &credentials) {
            Ok(client) => {
                tracing::info!(database = %client.database_path(), "Firestore client initialized");
                Some(Arc::new(client) as Arc<dyn ArticleStore>)
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to initialize Firestore client");
                None
            }
        };

        let publisher = match connect_publisher(config, &credentials) {
            Ok(client) => {
                tracing::info!(topic = %client.topic(), "Pub/Sub publisher initialized");
                Some(Arc::new(client) as Arc<dyn MessagePublisher>)
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to initialize Pub/Sub publisher");
                None
            }
        };

        Self {
            store,
            publisher,
            ..state
        }
    }

    /// Both backends are available.
    pub fn is_ready(&self) -> bool {
        self.store.is_some() && self.publisher.is_some()
    }
}

/// HTTP client and token provider shared by every backend.
struct Credentials {
    http: reqwest::Client,
    tokens: Arc<dyn TokenProvider>,
}

impl Credentials {
    fn from_env() -> Result<Self, CloudError> {
        let http = kickoff_cloud::http_client()?;
        let tokens = kickoff_cloud::auth::default_provider(http.clone())?;
        Ok(Self { http, tokens })
    }

    /// Configured project, else the one recorded in the credentials.
    fn project_id<'a>(&'a self, config: &'a KickoffConfig) -> Result<&'a str, InitError> {
        config
            .gcp
            .project_id
            .as_deref()
            .or(self.tokens.project_id())
            .ok_or(InitError::MissingSetting("GCP_PROJECT_ID"))
    }
}

fn connect_store(
    config: &KickoffConfig,
    credentials: &Credentials,
) -> Result<FirestoreClient, InitError> {
    let project_id = credentials.project_id(config)?;
    Ok(FirestoreClient::from_env(
        credentials.http.clone(),
        Arc::clone(&credentials.tokens),
        project_id,
        &config.gcp.database,
    ))
}

fn connect_publisher(
    config: &KickoffConfig,
    credentials: &Credentials,
) -> Result<PubSubClient, InitError> {
    let project_id = credentials.project_id(config)?;
    let topic_id = config
        .gcp
        .topic_id
        .as_deref()
        .ok_or(InitError::MissingSetting("ARTICLE_PROCESSING_TOPIC_ID"))?;
    Ok(PubSubClient::from_env(
        credentials.http.clone(),
        Arc::clone(&credentials.tokens),
        project_id,
        topic_id,
    ))
}

fn server_key_from_env() -> Option<SecretString> {
    std::env::var("KICKOFF_SERVER_KEY")
        // arch-lint: allow(no-silent-result-drop) reason="env var absence means server key is not configured, a valid operational state"
        .ok()
        .filter(|k| !k.trim().is_empty())
        .map(SecretString::from)
}
