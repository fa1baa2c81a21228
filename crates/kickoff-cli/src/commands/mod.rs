mod dockerfile;
mod eject;
mod serve;
mod trigger;

/// Name of the binary baked into the container image.
pub(crate) const BINARY_NAME: &str = env!("CARGO_BIN_NAME");

pub use dockerfile::dockerfile;
pub use eject::eject;
pub use serve::serve;
pub use trigger::trigger;
