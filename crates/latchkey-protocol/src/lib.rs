//! Wire vocabulary for the HMI/Control serial link.
//!
//! The link is a raw byte pipe with no framing layer; the meaning of a
//! byte depends on where in an exchange it appears. This crate defines
//! the three disjoint byte classes and the types that name them:
//!
//! - [`Command`]: the single-byte request codes (`0x0A..=0x0F`)
//! - [`FirstUseReply`]: the two reply bytes to a first-use query
//! - credential payload: printable ASCII, terminated by the sentinel
//!
//! Framing itself (who sends what when) lives in `latchkey-link`.

pub mod command;

pub use command::{Command, FirstUseReply};
