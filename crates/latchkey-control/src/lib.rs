//! Control node: command dispatcher and actuator sequencers.
//!
//! The Control node owns the credential store, the door motor and the
//! alarm siren. It boots, announces readiness on the link, then serves
//! commands from the HMI one at a time for the life of the process.
//!
//! # Architecture
//!
//! ```text
//! Link ──> Dispatcher ──┬─> CredentialVault (store queries/updates)
//!                       ├─> DoorSequencer   (timed door cycle)
//!                       └─> AlarmSequencer  (timed alarm burst)
//! ```
//!
//! The dispatcher is strictly serial: while a door cycle or alarm
//! burst runs, no new command is read. The HMI mirrors the same
//! durations on its own clock, so both nodes come back to listening at
//! the same moment without any completion handshake.

pub mod dispatcher;
pub mod sequencer;

pub use dispatcher::Dispatcher;
pub use sequencer::{AlarmSequencer, DoorSequencer};
