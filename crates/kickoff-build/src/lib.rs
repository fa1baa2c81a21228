//! Dockerfile generation and eject for kickoff.
//!
//! # Image layout
//!
//! ```text
//! chef     ── rust builder image + cargo-chef
//! planner  ── cargo chef prepare   (recipe.json from manifests)
//! cacher   ── cargo chef cook      (dependencies only, cached layer)
//! builder  ── cargo build --bin    (application sources)
//! runtime  ── packages → service account → ENV → binary → USER → CMD
//! ```
//!
//! Inside the runtime stage everything that needs root (package installs,
//! account creation) happens before `USER`; the binary is copied in owned by
//! the service account and the container starts unprivileged.

pub mod dockerfile;
pub mod eject;

pub use dockerfile::DockerfileGenerator;
pub use eject::{EjectError, eject, is_ejected, load_ejected_dockerfile};
