//! Interactive two-node appliance demo.
//!
//! Runs the HMI session and the Control dispatcher as two tasks joined
//! by an in-process duplex link, with mock peripherals. Keystrokes
//! come from stdin (one character at a time, newlines ignored); the
//! 2x16 display is rendered to stdout after every change.
//!
//! ```text
//! latchkey                 # appliance timings (15s door travel...)
//! latchkey --fast          # scaled-down timings for a quick demo
//! RUST_LOG=debug latchkey  # with protocol tracing
//! ```

use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use latchkey_core::Timings;
use latchkey_hardware::mock::{MockAlarm, MockDoorMotor, MockKeypad, MockKeypadHandle};
use latchkey_hardware::traits::{DISPLAY_COLS, DISPLAY_ROWS, TextDisplay};
use latchkey_hmi::Session;
use latchkey_link::pair;
use latchkey_storage::MockEeprom;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "latchkey")]
#[command(about = "Two-node door-lock appliance demo", version)]
struct Cli {
    /// Run with timings scaled down 10x for interactive use
    #[arg(long)]
    fast: bool,

    /// Door travel time in seconds (open phase and close phase each)
    #[arg(long)]
    door_travel: Option<u64>,

    /// Door hold time in seconds
    #[arg(long)]
    door_hold: Option<u64>,

    /// Alarm hold time in seconds
    #[arg(long)]
    alarm_hold: Option<u64>,
}

impl Cli {
    fn timings(&self) -> Timings {
        let mut timings = Timings::default();
        if self.fast {
            timings.door_travel /= 10;
            timings.door_hold /= 10;
            timings.alarm_hold /= 10;
        }
        if let Some(secs) = self.door_travel {
            timings.door_travel = Duration::from_secs(secs);
        }
        if let Some(secs) = self.door_hold {
            timings.door_hold = Duration::from_secs(secs);
        }
        if let Some(secs) = self.alarm_hold {
            timings.alarm_hold = Duration::from_secs(secs);
        }
        timings
    }
}

/// Renders the 2x16 display to stdout after every change.
struct ConsoleDisplay {
    rows: [[char; DISPLAY_COLS]; DISPLAY_ROWS],
}

impl ConsoleDisplay {
    fn new() -> Self {
        Self {
            rows: [[' '; DISPLAY_COLS]; DISPLAY_ROWS],
        }
    }

    fn render(&self) {
        let top: String = self.rows[0].iter().collect();
        let bottom: String = self.rows[1].iter().collect();
        println!("\u{250c}{}\u{2510}", "\u{2500}".repeat(DISPLAY_COLS));
        println!("\u{2502}{top}\u{2502}");
        println!("\u{2502}{bottom}\u{2502}");
        println!("\u{2514}{}\u{2518}", "\u{2500}".repeat(DISPLAY_COLS));
    }
}

impl TextDisplay for ConsoleDisplay {
    async fn clear(&mut self) -> latchkey_hardware::Result<()> {
        self.rows = [[' '; DISPLAY_COLS]; DISPLAY_ROWS];
        Ok(())
    }

    async fn print(&mut self, row: usize, text: &str) -> latchkey_hardware::Result<()> {
        let line = self
            .rows
            .get_mut(row)
            .ok_or_else(|| latchkey_hardware::HardwareError::out_of_bounds("display row"))?;
        for (col, slot) in line.iter_mut().enumerate() {
            *slot = text.chars().nth(col).unwrap_or(' ');
        }
        self.render();
        Ok(())
    }

    async fn put_char(&mut self, row: usize, col: usize, ch: char) -> latchkey_hardware::Result<()> {
        let slot = self
            .rows
            .get_mut(row)
            .and_then(|line| line.get_mut(col))
            .ok_or_else(|| latchkey_hardware::HardwareError::out_of_bounds("display position"))?;
        *slot = ch;
        self.render();
        Ok(())
    }
}

/// Feed stdin characters into the mock keypad, skipping line endings.
async fn pump_stdin(keypad: MockKeypadHandle) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        for key in line.chars() {
            if keypad.send_key(key).await.is_err() {
                return;
            }
        }
    }
    warn!("stdin closed, keypad detached");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let timings = cli.timings();

    let (hmi_link, control_link) = pair();
    let (motor, _motor_handle) = MockDoorMotor::new();
    let (alarm, _alarm_handle) = MockAlarm::new();
    let (keypad, keypad_handle) = MockKeypad::new();

    let dispatcher = latchkey_control::Dispatcher::new(
        control_link,
        MockEeprom::new(),
        motor,
        alarm,
        timings,
    );
    let session = Session::new(hmi_link, keypad, ConsoleDisplay::new(), timings);

    tokio::spawn(pump_stdin(keypad_handle));
    let control = tokio::spawn(dispatcher.run());
    let hmi = tokio::spawn(session.run());

    tokio::select! {
        result = control => result
            .context("Control node panicked")?
            .context("Control node failed")?,
        result = hmi => result
            .context("HMI node panicked")?
            .context("HMI node failed")?,
    }

    Ok(())
}
