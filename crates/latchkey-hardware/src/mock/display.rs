//! Virtual 2x16 character display.

use std::sync::{Arc, Mutex};

use crate::{
    HardwareError, Result,
    traits::{DISPLAY_COLS, DISPLAY_ROWS, TextDisplay},
};

#[derive(Debug)]
struct DisplayState {
    rows: [[char; DISPLAY_COLS]; DISPLAY_ROWS],
}

impl DisplayState {
    fn new() -> Self {
        Self {
            rows: [[' '; DISPLAY_COLS]; DISPLAY_ROWS],
        }
    }
}

/// In-memory stand-in for the HMI's 2x16 LCD.
///
/// Writes go through the [`TextDisplay`] trait; the paired
/// [`VirtualDisplayHandle`] reads the current contents back out, so
/// tests can assert on exactly what the user would see.
#[derive(Debug)]
pub struct VirtualDisplay {
    state: Arc<Mutex<DisplayState>>,
}

impl VirtualDisplay {
    /// Create a blank display and its observation handle.
    pub fn new() -> (Self, VirtualDisplayHandle) {
        let state = Arc::new(Mutex::new(DisplayState::new()));
        (
            Self {
                state: Arc::clone(&state),
            },
            VirtualDisplayHandle { state },
        )
    }
}

impl TextDisplay for VirtualDisplay {
    async fn clear(&mut self) -> Result<()> {
        let mut state = self.state.lock().expect("display lock poisoned");
        state.rows = [[' '; DISPLAY_COLS]; DISPLAY_ROWS];
        Ok(())
    }

    async fn print(&mut self, row: usize, text: &str) -> Result<()> {
        if row >= DISPLAY_ROWS {
            return Err(HardwareError::out_of_bounds(format!(
                "row {row} on a {DISPLAY_ROWS}-row display"
            )));
        }
        let mut state = self.state.lock().expect("display lock poisoned");
        let line = &mut state.rows[row];
        for (col, slot) in line.iter_mut().enumerate() {
            *slot = text.chars().nth(col).unwrap_or(' ');
        }
        Ok(())
    }

    async fn put_char(&mut self, row: usize, col: usize, ch: char) -> Result<()> {
        if row >= DISPLAY_ROWS || col >= DISPLAY_COLS {
            return Err(HardwareError::out_of_bounds(format!(
                "position ({row},{col}) on a {DISPLAY_ROWS}x{DISPLAY_COLS} display"
            )));
        }
        let mut state = self.state.lock().expect("display lock poisoned");
        state.rows[row][col] = ch;
        Ok(())
    }
}

/// Read-side handle for a [`VirtualDisplay`].
///
/// Can be cloned and shared across tasks.
#[derive(Debug, Clone)]
pub struct VirtualDisplayHandle {
    state: Arc<Mutex<DisplayState>>,
}

impl VirtualDisplayHandle {
    /// The current contents of one row, trailing spaces trimmed.
    pub fn line(&self, row: usize) -> String {
        let state = self.state.lock().expect("display lock poisoned");
        state
            .rows
            .get(row)
            .map(|r| r.iter().collect::<String>().trim_end().to_string())
            .unwrap_or_default()
    }

    /// Both rows, trailing spaces trimmed.
    pub fn lines(&self) -> [String; DISPLAY_ROWS] {
        [self.line(0), self.line(1)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_print_pads_and_truncates() {
        let (mut display, handle) = VirtualDisplay::new();

        display.print(0, "hello").await.unwrap();
        assert_eq!(handle.line(0), "hello");

        display
            .print(0, "a string much longer than sixteen chars")
            .await
            .unwrap();
        assert_eq!(handle.line(0), "a string much lo");
    }

    #[tokio::test]
    async fn test_put_char_echo() {
        let (mut display, handle) = VirtualDisplay::new();

        display.print(1, "").await.unwrap();
        display.put_char(1, 0, '*').await.unwrap();
        display.put_char(1, 1, '*').await.unwrap();
        assert_eq!(handle.line(1), "**");
    }

    #[tokio::test]
    async fn test_clear() {
        let (mut display, handle) = VirtualDisplay::new();

        display.print(0, "top").await.unwrap();
        display.print(1, "bottom").await.unwrap();
        display.clear().await.unwrap();
        assert_eq!(handle.lines(), ["", ""]);
    }

    #[tokio::test]
    async fn test_out_of_bounds() {
        let (mut display, _handle) = VirtualDisplay::new();

        assert!(display.print(2, "nope").await.is_err());
        assert!(display.put_char(0, 16, 'x').await.is_err());
    }
}
