//! Shared types, constants and error taxonomy for the Latchkey
//! two-node door-lock appliance.
//!
//! Both nodes (HMI and Control) depend on this crate so that the
//! credential format, persistent layout and timing constants cannot
//! silently diverge between the two programs.

pub mod constants;
pub mod error;
pub mod types;

pub use constants::Timings;
pub use error::{Error, Result};
pub use types::{AuthOutcome, Credential};

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
