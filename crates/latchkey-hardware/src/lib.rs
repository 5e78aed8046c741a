//! Hardware abstraction layer for the door-lock appliance.
//!
//! The appliance spreads its peripherals across two nodes: the HMI
//! node owns a character keypad and a 2x16 text display, the Control
//! node owns the door motor and the alarm siren. This crate defines
//! trait contracts for all four and mock implementations that stand in
//! for them in tests and the demo binary.
//!
//! All traits use native `async fn` methods (Rust 1.90 + Edition 2024
//! RPITIT); no `async_trait` macro is needed. The traits are therefore
//! not object-safe; use generic type parameters.
//!
//! # Example
//!
//! ```no_run
//! use latchkey_hardware::traits::{Keypad, TextDisplay};
//! use latchkey_hardware::Result;
//!
//! async fn read_one<K: Keypad, D: TextDisplay>(
//!     keypad: &mut K,
//!     display: &mut D,
//! ) -> Result<char> {
//!     let key = keypad.read_key().await?;
//!     display.put_char(1, 0, key).await?;
//!     Ok(key)
//! }
//! ```

pub mod error;
pub mod mock;
pub mod traits;

pub use error::{HardwareError, Result};
pub use traits::{Alarm, DoorMotor, Keypad, MotorPhase, TextDisplay};
