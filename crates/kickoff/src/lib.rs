//! Manual workflow trigger for the article processing pipeline.
//!
//! `POST /` looks up staged articles whose status is still pending, publishes
//! each document id to the processing topic, and marks the article as queued.
//! The service is built to run on Cloud Run behind the container produced by
//! `kickoff-build`.
//!
//! ```rust,no_run
//! use kickoff::{AppState, router};
//! use kickoff_core::KickoffConfig;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = KickoffConfig::from_env(std::path::Path::new("."))?;
//! let state = AppState::initialize(&config);
//! kickoff::serve(&config.server.bind_addr(), router(state)).await?;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod error;
pub mod routes;
pub mod server;
pub mod state;
pub mod workflow;

pub use auth::ServerKeyAuth;
pub use error::{ApiError, InitError};
pub use routes::router;
pub use server::serve;
pub use state::AppState;
pub use workflow::run_trigger;
