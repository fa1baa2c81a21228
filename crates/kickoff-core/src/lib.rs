//! Core types and configuration for kickoff.
//!
//! This crate defines the `kickoff.toml` schema ([`KickoffConfig`]) with its
//! environment overrides, the article/summary types shared by the server and
//! the CLI, and the shared error type.

pub mod article;
pub mod config;
pub mod error;

pub use article::{ArticleRef, ErrorResponse, TriggerResponse, TriggerSummary};
pub use config::{BuildConfig, GcpConfig, KickoffConfig, ServerConfig, WorkflowConfig};
pub use error::{Error, Result};
