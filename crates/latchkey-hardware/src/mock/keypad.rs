//! Mock keypad driven through an in-process channel.

use crate::{Result, traits::Keypad};
use tokio::sync::mpsc;

/// Mock keypad device.
///
/// Simulates the HMI keypad by receiving key presses through an
/// internal channel. Tests and the demo binary send keys through a
/// [`MockKeypadHandle`].
///
/// # Examples
///
/// ```
/// use latchkey_hardware::mock::MockKeypad;
/// use latchkey_hardware::traits::Keypad;
///
/// #[tokio::main]
/// async fn main() -> latchkey_hardware::Result<()> {
///     let (mut keypad, handle) = MockKeypad::new();
///
///     tokio::spawn(async move {
///         handle.send_text("12345").await.unwrap();
///     });
///
///     assert_eq!(keypad.read_key().await?, '1');
///     assert_eq!(keypad.read_key().await?, '2');
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockKeypad {
    key_rx: mpsc::Receiver<char>,
}

impl MockKeypad {
    /// Create a mock keypad and its control handle.
    pub fn new() -> (Self, MockKeypadHandle) {
        let (key_tx, key_rx) = mpsc::channel(32);
        (Self { key_rx }, MockKeypadHandle { key_tx })
    }
}

impl Keypad for MockKeypad {
    async fn read_key(&mut self) -> Result<char> {
        self.key_rx
            .recv()
            .await
            .ok_or_else(|| crate::HardwareError::disconnected("keypad channel closed"))
    }
}

/// Handle for injecting key presses into a [`MockKeypad`].
///
/// Can be cloned and shared across tasks.
#[derive(Debug, Clone)]
pub struct MockKeypadHandle {
    key_tx: mpsc::Sender<char>,
}

impl MockKeypadHandle {
    /// Send a single key press.
    ///
    /// # Errors
    ///
    /// Returns an error if the keypad has been dropped.
    pub async fn send_key(&self, key: char) -> Result<()> {
        self.key_tx
            .send(key)
            .await
            .map_err(|_| crate::HardwareError::disconnected("keypad channel closed"))
    }

    /// Send every character of a string as individual key presses.
    ///
    /// Convenience for typing a whole credential in tests.
    pub async fn send_text(&self, text: &str) -> Result<()> {
        for key in text.chars() {
            self.send_key(key).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_key_in_order() {
        let (mut keypad, handle) = MockKeypad::new();

        handle.send_text("+a").await.unwrap();

        assert_eq!(keypad.read_key().await.unwrap(), '+');
        assert_eq!(keypad.read_key().await.unwrap(), 'a');
    }

    #[tokio::test]
    async fn test_handle_clone() {
        let (mut keypad, handle) = MockKeypad::new();
        let clone = handle.clone();

        clone.send_key('9').await.unwrap();
        assert_eq!(keypad.read_key().await.unwrap(), '9');
    }

    #[tokio::test]
    async fn test_closed_channel() {
        let (mut keypad, handle) = MockKeypad::new();
        drop(handle);

        assert!(keypad.read_key().await.is_err());
    }
}
