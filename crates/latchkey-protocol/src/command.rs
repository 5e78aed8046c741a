use std::fmt;

use latchkey_core::constants::{REPLY_NOT_PROVISIONED, REPLY_PROVISIONED};
use latchkey_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Single-byte command codes sent over the link.
///
/// Both nodes share this one vocabulary; every code has exactly one
/// producer and one consumer, noted per variant. The codes live in
/// `0x0A..=0x0F`, outside both the printable payload range and the
/// string sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Command {
    /// Control -> HMI, once at startup: the Control node finished its
    /// boot work and the HMI may begin its session loop.
    Ready = 0x0A,

    /// HMI -> Control: is a credential already stored? Answered with a
    /// [`FirstUseReply`] byte.
    QueryFirstUse = 0x0B,

    /// HMI -> Control: send me the stored credential. Answered with a
    /// sentinel-terminated credential string.
    GetCredential = 0x0C,

    /// HMI -> Control: the next bytes are a new credential to store,
    /// sentinel-terminated. No reply.
    SetCredential = 0x0D,

    /// HMI -> Control: authentication failed out; engage the alarm.
    /// No reply; both nodes time the alarm independently.
    TriggerAlarm = 0x0E,

    /// HMI -> Control: run the full door cycle. No reply; both nodes
    /// time the cycle independently.
    OpenDoor = 0x0F,
}

impl Command {
    /// Decode a wire byte into a command, if it is one.
    #[must_use]
    pub fn from_u8(byte: u8) -> Option<Self> {
        match byte {
            0x0A => Some(Command::Ready),
            0x0B => Some(Command::QueryFirstUse),
            0x0C => Some(Command::GetCredential),
            0x0D => Some(Command::SetCredential),
            0x0E => Some(Command::TriggerAlarm),
            0x0F => Some(Command::OpenDoor),
            _ => None,
        }
    }

    /// The wire byte for this command.
    #[inline]
    #[must_use]
    pub fn to_u8(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Command::Ready => "Ready",
            Command::QueryFirstUse => "QueryFirstUse",
            Command::GetCredential => "GetCredential",
            Command::SetCredential => "SetCredential",
            Command::TriggerAlarm => "TriggerAlarm",
            Command::OpenDoor => "OpenDoor",
        };
        write!(f, "{name}")
    }
}

/// Reply byte to a [`Command::QueryFirstUse`] exchange.
///
/// The reply bytes are distinct from the raw storage flag values as
/// well as from the sentinel and command codes: the erased flag
/// (`0xFF`) answers as `NotProvisioned` (`0x01`), so a reply byte
/// leaking into the wrong exchange cannot be mistaken for the flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FirstUseReply {
    /// No credential has ever been stored; the HMI must provision.
    NotProvisioned,

    /// A credential is present; the HMI runs the normal home cycle.
    Provisioned,
}

impl FirstUseReply {
    /// Decode a reply byte.
    ///
    /// # Errors
    /// Returns `Error::InvalidReply` for any byte other than the two
    /// defined reply values.
    pub fn from_u8(byte: u8) -> Result<Self> {
        match byte {
            REPLY_NOT_PROVISIONED => Ok(FirstUseReply::NotProvisioned),
            REPLY_PROVISIONED => Ok(FirstUseReply::Provisioned),
            other => Err(Error::InvalidReply { byte: other }),
        }
    }

    /// The wire byte for this reply.
    #[must_use]
    pub fn to_u8(self) -> u8 {
        match self {
            FirstUseReply::NotProvisioned => REPLY_NOT_PROVISIONED,
            FirstUseReply::Provisioned => REPLY_PROVISIONED,
        }
    }

    /// Convenience predicate for the HMI's branch at boot.
    #[inline]
    #[must_use]
    pub fn is_provisioned(self) -> bool {
        matches!(self, FirstUseReply::Provisioned)
    }
}

impl fmt::Display for FirstUseReply {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FirstUseReply::NotProvisioned => write!(f, "NotProvisioned"),
            FirstUseReply::Provisioned => write!(f, "Provisioned"),
        }
    }
}
