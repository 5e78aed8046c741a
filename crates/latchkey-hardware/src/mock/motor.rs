//! Mock door motor that records its phase transitions.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

use crate::{
    Result,
    traits::{DoorMotor, MotorPhase},
};

/// Mock door motor.
///
/// Records every phase transition with a timestamp so tests can assert
/// on the full drive sequence of a door cycle, not just the final
/// state.
#[derive(Debug)]
pub struct MockDoorMotor {
    log: Arc<Mutex<Vec<(DateTime<Utc>, MotorPhase)>>>,
}

impl MockDoorMotor {
    /// Create a stopped motor and its observation handle.
    pub fn new() -> (Self, MockDoorMotorHandle) {
        let log = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                log: Arc::clone(&log),
            },
            MockDoorMotorHandle { log },
        )
    }
}

impl DoorMotor for MockDoorMotor {
    async fn set_phase(&mut self, phase: MotorPhase) -> Result<()> {
        let mut log = self.log.lock().expect("motor lock poisoned");
        log.push((Utc::now(), phase));
        Ok(())
    }
}

/// Read-side handle for a [`MockDoorMotor`].
#[derive(Debug, Clone)]
pub struct MockDoorMotorHandle {
    log: Arc<Mutex<Vec<(DateTime<Utc>, MotorPhase)>>>,
}

impl MockDoorMotorHandle {
    /// Every phase transition so far, in order.
    pub fn phases(&self) -> Vec<MotorPhase> {
        let log = self.log.lock().expect("motor lock poisoned");
        log.iter().map(|(_, phase)| *phase).collect()
    }

    /// The phase the motor is currently driven in. A motor that was
    /// never commanded reads as stopped.
    pub fn current_phase(&self) -> MotorPhase {
        let log = self.log.lock().expect("motor lock poisoned");
        log.last().map_or(MotorPhase::Stopped, |(_, phase)| *phase)
    }
}
