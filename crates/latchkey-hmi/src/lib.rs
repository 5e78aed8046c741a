//! HMI node: keypad, display, and the authentication state machine.
//!
//! The HMI node is the protocol initiator. It waits for the Control
//! node's ready announcement, provisions a credential on first use,
//! then serves a non-terminating home loop: authenticate the user and
//! dispatch to the door cycle or a credential change.
//!
//! ```text
//! Keypad ──> Session ──> Link ──> Control node
//!              │
//!              └──> TextDisplay
//! ```
//!
//! Authentication failure is an outcome, not an error: after three
//! failed passes the session raises the alarm and returns to the home
//! prompt without performing the requested action.

pub mod screens;
pub mod session;

pub use session::Session;
