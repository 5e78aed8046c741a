//! Point-to-point byte link between the HMI and Control nodes.
//!
//! The physical appliance joins the two nodes with a full-duplex
//! serial line carrying raw bytes; this crate reproduces that contract
//! over any async byte stream. There is no framing layer: the meaning
//! of a byte depends on where in an exchange it appears, so [`Link`]
//! exposes one method per exchange element (command, reply,
//! credential string) instead of a generic message codec.
//!
//! # Architecture
//!
//! ```text
//! HMI Session                        Control Dispatcher
//!     │                                   │
//!     └─> Link<A> ───(byte pipe)───> Link<B>
//!          send_command / recv_command
//!          send_reply   / recv_reply
//!          send_credential / recv_credential
//! ```
//!
//! For in-process wiring (tests, the demo binary) use [`pair`], which
//! builds two connected links over `tokio::io::duplex`.

pub mod link;

pub use link::{Link, pair};
