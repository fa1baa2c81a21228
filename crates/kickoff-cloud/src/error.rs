use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CloudError {
    #[error("failed to read credentials at {path}")]
    CredentialsRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid service account key at {path}")]
    CredentialsParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to sign token assertion")]
    Sign { source: jsonwebtoken::errors::Error },

    #[error("request to {service} failed")]
    Http {
        service: &'static str,
        source: reqwest::Error,
    },

    #[error("{service} returned HTTP {status}: {body}")]
    Api {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("cannot build {service} URL from {base}: {detail}")]
    InvalidUrl {
        service: &'static str,
        base: String,
        detail: String,
    },

    #[error("malformed {service} response: {detail}")]
    Malformed {
        service: &'static str,
        detail: String,
    },
}

impl CloudError {
    /// Turn a non-2xx reply into [`CloudError::Api`], keeping the body for diagnostics.
    pub(crate) async fn from_response(service: &'static str, response: reqwest::Response) -> Self {
        let status = response.status().as_u16();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => format!("<unreadable body: {e}>"),
        };
        Self::Api {
            service,
            status,
            body,
        }
    }
}
