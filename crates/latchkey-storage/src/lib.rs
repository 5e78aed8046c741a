//! Persistent credential storage for the Control node.
//!
//! The appliance keeps exactly one credential in a small byte-addressed
//! non-volatile store (an EEPROM part on the real board). The
//! [`Eeprom`] trait abstracts the part; [`CredentialVault`] owns the
//! layout: the credential occupies the first five addresses and a
//! provisioning flag sits immediately after it.
//!
//! Every individual byte access is followed by a settling delay, a
//! requirement of the part's write cycle. The delay comes from the
//! injected [`Timings`](latchkey_core::Timings), so tests run it under
//! a paused clock.

#![allow(async_fn_in_trait)]

pub mod eeprom;
pub mod vault;

pub use eeprom::{Eeprom, MockEeprom};
pub use vault::CredentialVault;
