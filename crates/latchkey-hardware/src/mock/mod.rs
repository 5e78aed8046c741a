//! Mock peripheral implementations for testing and development.
//!
//! Each mock comes with a cloneable handle: the device side is owned
//! by the node task, the handle side by the test (or the demo binary's
//! stdin pump) to inject input and observe output.

pub mod alarm;
pub mod display;
pub mod keypad;
pub mod motor;

pub use alarm::{MockAlarm, MockAlarmHandle};
pub use display::{VirtualDisplay, VirtualDisplayHandle};
pub use keypad::{MockKeypad, MockKeypadHandle};
pub use motor::{MockDoorMotor, MockDoorMotorHandle};
