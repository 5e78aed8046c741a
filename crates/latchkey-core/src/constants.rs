//! Protocol, layout and timing constants shared by both nodes.
//!
//! Every duration the appliance waits on is a named constant here, and
//! the [`Timings`] struct carries them as injectable configuration so
//! that the actuator sequencers and the HMI mirror can be exercised
//! under a paused test clock instead of real time.
//!
//! # Wire byte ranges
//!
//! The link carries three disjoint byte classes:
//!
//! | Range | Meaning |
//! |---|---|
//! | `0x00` | string sentinel (end of credential payload) |
//! | `0x01`, `0xFF` | first-use reply bytes |
//! | `0x0A..=0x0F` | command codes (see `latchkey-protocol`) |
//! | `0x20..=0x7E` | credential payload characters (printable ASCII) |
//!
//! Disjointness is asserted by tests here and in `latchkey-protocol`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

// ============================================================================
// Credential format
// ============================================================================

/// Credential length in characters. Fixed by the protocol; never
/// transmitted or stored with a trailing sentinel.
pub const CREDENTIAL_LEN: usize = 5;

/// Lowest byte accepted as a credential character (ASCII space).
pub const PRINTABLE_MIN: u8 = 0x20;

/// Highest byte accepted as a credential character (ASCII tilde).
pub const PRINTABLE_MAX: u8 = 0x7E;

/// Reserved end-of-string marker for multi-byte link messages.
///
/// Must never appear as a payload character; the printable range
/// starts well above it.
pub const STRING_SENTINEL: u8 = 0x00;

// ============================================================================
// Persistent layout (Control node credential store)
// ============================================================================

/// First store address of the credential region (addresses 0..=4).
pub const CREDENTIAL_BASE_ADDR: u8 = 0;

/// Store address of the first-use flag, immediately after the
/// credential region.
pub const FIRST_USE_FLAG_ADDR: u8 = 5;

/// Erased-storage value; a flag byte equal to this means the system
/// was never provisioned.
pub const FLAG_ERASED: u8 = 0xFF;

/// Value written to the first-use flag by a successful credential
/// store. Anything other than [`FLAG_ERASED`] reads as provisioned.
pub const FLAG_PROVISIONED: u8 = 0x00;

// ============================================================================
// Reply bytes
// ============================================================================

/// First-use query reply: no credential has ever been stored.
///
/// Deliberately not `0x00`: reply bytes share the wire with the
/// string sentinel and must stay distinct from it, the command
/// codes, and the payload range.
pub const REPLY_NOT_PROVISIONED: u8 = 0x01;

/// First-use query reply: a credential is present.
pub const REPLY_PROVISIONED: u8 = 0xFF;

// ============================================================================
// Authentication policy
// ============================================================================

/// Password attempts granted per authentication session before the
/// alarm outcome. Reset at the start of every session; never persisted.
pub const MAX_AUTH_ATTEMPTS: u8 = 3;

// ============================================================================
// Timing
// ============================================================================

/// Door travel time for each of the open and close phases.
pub const DOOR_TRAVEL: Duration = Duration::from_secs(15);

/// Hold time with the door fully open, between travel phases.
pub const DOOR_HOLD: Duration = Duration::from_secs(3);

/// Alarm engagement time after authentication is exhausted. Both
/// nodes wait this same constant on independent clocks.
pub const ALARM_HOLD: Duration = Duration::from_secs(10);

/// Mandatory settling delay after every individual store byte access.
pub const STORE_SETTLE: Duration = Duration::from_millis(50);

/// Injectable timing configuration for the actuator sequencers and
/// the HMI's local mirroring of them.
///
/// Defaults to the appliance constants above. Tests and demos shorten
/// these or run them under `tokio::time::pause`.
///
/// # Examples
///
/// ```
/// use latchkey_core::Timings;
/// use std::time::Duration;
///
/// let timings = Timings::default();
/// assert_eq!(timings.door_travel, Duration::from_secs(15));
/// assert_eq!(timings.door_hold, Duration::from_secs(3));
/// assert_eq!(timings.alarm_hold, Duration::from_secs(10));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timings {
    /// Door travel time (open phase and close phase each).
    pub door_travel: Duration,

    /// Hold time with the door open.
    pub door_hold: Duration,

    /// Alarm engagement time.
    pub alarm_hold: Duration,

    /// Settling delay between consecutive store byte accesses.
    pub store_settle: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            door_travel: DOOR_TRAVEL,
            door_hold: DOOR_HOLD,
            alarm_hold: ALARM_HOLD,
            store_settle: STORE_SETTLE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timings_match_constants() {
        let t = Timings::default();
        assert_eq!(t.door_travel, Duration::from_secs(15));
        assert_eq!(t.door_hold, Duration::from_secs(3));
        assert_eq!(t.alarm_hold, Duration::from_secs(10));
        assert_eq!(t.store_settle, Duration::from_millis(50));
    }

    #[test]
    fn test_timings_serde_round_trip() {
        let t = Timings::default();
        let json = serde_json::to_string(&t).unwrap();
        let back: Timings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);
    }

    #[test]
    fn test_flag_values_distinct() {
        assert_ne!(FLAG_ERASED, FLAG_PROVISIONED);
    }

    #[test]
    fn test_sentinel_below_printable_range() {
        assert!(STRING_SENTINEL < PRINTABLE_MIN);
    }

    #[test]
    fn test_reply_bytes_disjoint_from_sentinel_and_payload() {
        for reply in [REPLY_NOT_PROVISIONED, REPLY_PROVISIONED] {
            assert_ne!(reply, STRING_SENTINEL);
            assert!(!(PRINTABLE_MIN..=PRINTABLE_MAX).contains(&reply));
        }
        assert_ne!(REPLY_NOT_PROVISIONED, REPLY_PROVISIONED);
    }

    #[test]
    fn test_flag_follows_credential_region() {
        assert_eq!(
            FIRST_USE_FLAG_ADDR as usize,
            CREDENTIAL_BASE_ADDR as usize + CREDENTIAL_LEN
        );
    }
}
