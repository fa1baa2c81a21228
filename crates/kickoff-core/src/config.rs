use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Name of the optional configuration file looked up in the project directory.
pub const CONFIG_FILE: &str = "kickoff.toml";

/// kickoff.toml configuration, overridable from the environment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KickoffConfig {
    #[serde(default)]
    pub gcp: GcpConfig,
    #[serde(default)]
    pub workflow: WorkflowConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub build: BuildConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GcpConfig {
    /// GCP project ID (`GCP_PROJECT_ID`, falling back to `GOOGLE_CLOUD_PROJECT`)
    pub project_id: Option<String>,
    /// Pub/Sub topic receiving article ids (`ARTICLE_PROCESSING_TOPIC_ID`)
    pub topic_id: Option<String>,
    /// Firestore database ID
    #[serde(default = "default_database")]
    pub database: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowConfig {
    /// Firestore collection holding staged articles
    #[serde(default = "default_collection")]
    pub collection: String,
    /// Document field carrying the processing status
    #[serde(default = "default_status_field")]
    pub status_field: String,
    /// Status selecting articles that are waiting to be queued
    #[serde(default = "default_pending_status")]
    pub pending_status: String,
    /// Status written once an article has been published
    #[serde(default = "default_queued_status")]
    pub queued_status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface the HTTP server binds to
    #[serde(default = "default_host")]
    pub host: String,
    /// Port the application listens on (`PORT`)
    #[serde(default = "default_port")]
    pub port: u16,
    /// Runtime worker threads (`KICKOFF_WORKERS`)
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// Working directory inside the container (`APP_HOME`)
    #[serde(default = "default_app_home")]
    pub app_home: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Rust builder image
    #[serde(default = "default_builder_image")]
    pub base_image: String,
    /// Runtime base image. Must provide `groupadd`/`useradd`.
    #[serde(default = "default_runtime_image")]
    pub runtime_image: String,
    /// Cargo Chef version
    #[serde(default = "default_cargo_chef_version")]
    pub cargo_chef_version: String,
    /// Additional system packages to install via apt-get
    #[serde(default)]
    pub extra_packages: Vec<String>,
    /// Unprivileged account the service runs as
    #[serde(default = "default_user")]
    pub user: String,
    /// UID/GID of the unprivileged account
    #[serde(default = "default_uid")]
    pub uid: u32,
    /// Static environment variables baked into the container image.
    /// These become ENV directives in the Dockerfile.
    #[serde(default)]
    pub env: HashMap<String, String>,
}

impl Default for GcpConfig {
    fn default() -> Self {
        Self {
            project_id: None,
            topic_id: None,
            database: default_database(),
        }
    }
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            collection: default_collection(),
            status_field: default_status_field(),
            pending_status: default_pending_status(),
            queued_status: default_queued_status(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: default_workers(),
            app_home: default_app_home(),
        }
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            base_image: default_builder_image(),
            runtime_image: default_runtime_image(),
            cargo_chef_version: default_cargo_chef_version(),
            extra_packages: Vec::new(),
            user: default_user(),
            uid: default_uid(),
            env: HashMap::new(),
        }
    }
}

impl ServerConfig {
    /// `host:port` address the listener binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl KickoffConfig {
    /// Load from kickoff.toml at the given path, or return defaults if not found.
    pub fn load(project_dir: &Path) -> crate::Result<Self> {
        let config_path = project_dir.join(CONFIG_FILE);
        let config: Self = if config_path.exists() {
            let content =
                std::fs::read_to_string(&config_path).map_err(|e| crate::Error::ConfigLoad {
                    path: config_path.clone(),
                    source: e,
                })?;
            toml::from_str(&content).map_err(|e| crate::Error::ConfigParse {
                path: config_path.clone(),
                source: e,
            })?
        } else {
            Self::default()
        };

        config.validate()?;
        tracing::debug!(
            path = %config_path.display(),
            found = config_path.exists(),
            "config loaded"
        );
        Ok(config)
    }

    /// Load `.env` (if any), the config file, then apply process environment overrides.
    pub fn from_env(project_dir: &Path) -> crate::Result<Self> {
        // A missing .env in the project directory is not an error.
        let dotenv_loaded = dotenvy::from_path(project_dir.join(".env")).is_ok();
        tracing::debug!(dotenv = dotenv_loaded, "loading KickoffConfig");

        let mut config = Self::load(project_dir)?;
        // arch-lint: allow(no-silent-result-drop) reason="an unset or non-unicode variable means no override"
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Override fields from environment variables resolved through `lookup`.
    ///
    /// Empty values are treated as unset.
    pub fn apply_env<F>(&mut self, lookup: F) -> crate::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(project) = get("GCP_PROJECT_ID").or_else(|| get("GOOGLE_CLOUD_PROJECT")) {
            self.gcp.project_id = Some(project);
        }
        if let Some(topic) = get("ARTICLE_PROCESSING_TOPIC_ID") {
            self.gcp.topic_id = Some(topic);
        }
        if let Some(database) = get("FIRESTORE_DATABASE") {
            self.gcp.database = database;
        }
        if let Some(port) = get("PORT") {
            self.server.port = parse_env("PORT", &port)?;
        }
        if let Some(workers) = get("KICKOFF_WORKERS") {
            self.server.workers = parse_env("KICKOFF_WORKERS", &workers)?;
        }
        if let Some(app_home) = get("APP_HOME") {
            self.server.app_home = app_home;
        }

        self.validate()
    }

    /// Check invariants that serde defaults cannot express.
    pub fn validate(&self) -> crate::Result<()> {
        if self.server.workers == 0 {
            return Err(crate::Error::InvalidConfig {
                field: "server.workers",
                reason: "must be at least 1".to_owned(),
            });
        }
        if !is_valid_account_name(&self.build.user) {
            return Err(crate::Error::InvalidConfig {
                field: "build.user",
                reason: format!(
                    "{:?} is not a valid account name ([a-z_][a-z0-9_-]*, max 32 chars)",
                    self.build.user
                ),
            });
        }
        if self.build.uid == 0 {
            return Err(crate::Error::InvalidConfig {
                field: "build.uid",
                reason: "uid 0 is root; the service must run unprivileged".to_owned(),
            });
        }
        if self.server.app_home.chars().any(char::is_control) {
            return Err(crate::Error::InvalidConfig {
                field: "server.app_home",
                reason: "must not contain control characters".to_owned(),
            });
        }
        let mut env_keys: Vec<&String> = self.build.env.keys().collect();
        env_keys.sort();
        for key in env_keys {
            if !is_valid_env_key(key) {
                return Err(crate::Error::InvalidConfig {
                    field: "build.env",
                    reason: format!("{key:?} is not a valid variable name ([A-Za-z_][A-Za-z0-9_]*)"),
                });
            }
            if !is_valid_env_value(&self.build.env[key]) {
                return Err(crate::Error::InvalidConfig {
                    field: "build.env",
                    reason: format!("value of {key} must not contain control characters"),
                });
            }
        }
        for (field, value) in [
            ("workflow.collection", &self.workflow.collection),
            ("workflow.status_field", &self.workflow.status_field),
            ("workflow.pending_status", &self.workflow.pending_status),
            ("workflow.queued_status", &self.workflow.queued_status),
        ] {
            if value.trim().is_empty() {
                return Err(crate::Error::InvalidConfig {
                    field,
                    reason: "must not be empty".to_owned(),
                });
            }
        }
        Ok(())
    }
}

fn parse_env<T>(key: &'static str, value: &str) -> crate::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| crate::Error::InvalidEnv {
            key,
            value: value.to_owned(),
            reason: e.to_string(),
        })
}

/// POSIX-portable account name as accepted by `useradd` on Debian.
pub fn is_valid_account_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    name.len() <= 32
        && (first.is_ascii_lowercase() || first == '_')
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
}

/// Environment variable name that can appear in an `ENV` directive.
pub fn is_valid_env_key(key: &str) -> bool {
    let mut chars = key.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Control characters (newlines in particular) would end an `ENV` directive early.
pub fn is_valid_env_value(value: &str) -> bool {
    !value.chars().any(char::is_control)
}

fn default_database() -> String {
    "(default)".to_owned()
}

fn default_collection() -> String {
    "staging_articles".to_owned()
}

fn default_status_field() -> String {
    "status".to_owned()
}

fn default_pending_status() -> String {
    "received".to_owned()
}

fn default_queued_status() -> String {
    "queued".to_owned()
}

fn default_host() -> String {
    "0.0.0.0".to_owned()
}

fn default_port() -> u16 {
    8080
}

fn default_workers() -> usize {
    2
}

fn default_app_home() -> String {
    "/app".to_owned()
}

fn default_builder_image() -> String {
    "rust:1.85-bookworm".to_owned()
}

fn default_runtime_image() -> String {
    "debian:bookworm-slim".to_owned()
}

fn default_cargo_chef_version() -> String {
    "0.1.68".to_owned()
}

fn default_user() -> String {
    "kickoff".to_owned()
}

fn default_uid() -> u32 {
    10001
}
