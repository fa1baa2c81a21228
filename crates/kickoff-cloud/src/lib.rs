//! Google Cloud backends for kickoff.
//!
//! The trigger only needs two capabilities, expressed as the seams in
//! [`store`]: finding/updating staged articles ([`ArticleStore`]) and
//! publishing article ids ([`MessagePublisher`]). Production implementations
//! talk to the Firestore and Pub/Sub REST APIs with tokens from [`auth`].
//!
//! Both clients honour the standard emulator variables
//! (`FIRESTORE_EMULATOR_HOST`, `PUBSUB_EMULATOR_HOST`); an emulated client
//! sends no credentials.

pub mod auth;
pub mod error;
pub mod firestore;
pub mod pubsub;
pub mod store;

use std::time::Duration;

pub use auth::{MetadataTokenProvider, NoAuth, ServiceAccountTokenProvider, TokenProvider};
pub use error::CloudError;
pub use firestore::FirestoreClient;
pub use pubsub::PubSubClient;
pub use store::{ArticleStore, MessagePublisher};

/// Timeout applied to every Google API request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared HTTP client for all Google API calls.
pub fn http_client() -> Result<reqwest::Client, CloudError> {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(concat!("kickoff/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| CloudError::Http {
            service: "http client",
            source: e,
        })
}

/// Read an emulator host variable, treating empty values as unset.
pub(crate) fn emulator_host(var: &str) -> Option<String> {
    std::env::var(var)
        // arch-lint: allow(no-silent-result-drop) reason="an unset emulator variable means the real API is used"
        .ok()
        .map(|v| v.trim().trim_end_matches('/').to_owned())
        .filter(|v| !v.is_empty())
}
