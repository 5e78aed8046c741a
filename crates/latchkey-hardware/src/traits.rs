//! Peripheral trait definitions.
//!
//! These traits establish the contract between the node logic and the
//! physical devices, enabling substitution between mock and real
//! hardware implementations.

#![allow(async_fn_in_trait)]

use crate::error::Result;

/// Display width in characters.
pub const DISPLAY_COLS: usize = 16;

/// Display height in rows.
pub const DISPLAY_ROWS: usize = 2;

/// Character keypad on the HMI node.
///
/// The keypad produces one printable ASCII character per press. The
/// `+` and `-` keys double as the home-screen action keys (open door,
/// change credential); everything else is credential input.
pub trait Keypad: Send {
    /// Wait for the next key press.
    ///
    /// # Errors
    ///
    /// Returns an error if the device is disconnected.
    async fn read_key(&mut self) -> Result<char>;
}

/// 2x16 character display on the HMI node.
pub trait TextDisplay: Send {
    /// Clear both rows.
    async fn clear(&mut self) -> Result<()>;

    /// Write a string starting at column 0 of a row, padding the rest
    /// of the row with spaces. Text beyond the row width is truncated.
    ///
    /// # Errors
    ///
    /// Returns an error if `row` is outside the display.
    async fn print(&mut self, row: usize, text: &str) -> Result<()>;

    /// Write a single character at a position. Used for keystroke
    /// echo during credential entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the position is outside the display.
    async fn put_char(&mut self, row: usize, col: usize, ch: char) -> Result<()>;
}

/// Drive phase of the door motor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotorPhase {
    /// Driving the door open.
    Forward,

    /// Not driving.
    Stopped,

    /// Driving the door closed.
    Reverse,
}

impl std::fmt::Display for MotorPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            MotorPhase::Forward => write!(f, "Forward"),
            MotorPhase::Stopped => write!(f, "Stopped"),
            MotorPhase::Reverse => write!(f, "Reverse"),
        }
    }
}

/// Door motor on the Control node.
///
/// The motor has no position feedback; the door cycle is open-loop and
/// timed by the caller.
pub trait DoorMotor: Send {
    /// Switch the motor into a drive phase. Takes effect immediately.
    async fn set_phase(&mut self, phase: MotorPhase) -> Result<()>;
}

/// Alarm siren on the Control node.
pub trait Alarm: Send {
    /// Engage or silence the siren.
    async fn set_active(&mut self, active: bool) -> Result<()>;
}
