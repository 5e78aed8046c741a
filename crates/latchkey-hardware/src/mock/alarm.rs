//! Mock alarm siren that records engage/silence events.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

use crate::{Result, traits::Alarm};

/// Mock alarm siren.
///
/// Records every engage/silence event with a timestamp.
#[derive(Debug)]
pub struct MockAlarm {
    log: Arc<Mutex<Vec<(DateTime<Utc>, bool)>>>,
}

impl MockAlarm {
    /// Create a silent alarm and its observation handle.
    pub fn new() -> (Self, MockAlarmHandle) {
        let log = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                log: Arc::clone(&log),
            },
            MockAlarmHandle { log },
        )
    }
}

impl Alarm for MockAlarm {
    async fn set_active(&mut self, active: bool) -> Result<()> {
        let mut log = self.log.lock().expect("alarm lock poisoned");
        log.push((Utc::now(), active));
        Ok(())
    }
}

/// Read-side handle for a [`MockAlarm`].
#[derive(Debug, Clone)]
pub struct MockAlarmHandle {
    log: Arc<Mutex<Vec<(DateTime<Utc>, bool)>>>,
}

impl MockAlarmHandle {
    /// Every engage/silence event so far, in order.
    pub fn events(&self) -> Vec<bool> {
        let log = self.log.lock().expect("alarm lock poisoned");
        log.iter().map(|(_, active)| *active).collect()
    }

    /// Whether the siren is currently sounding.
    pub fn is_active(&self) -> bool {
        let log = self.log.lock().expect("alarm lock poisoned");
        log.last().is_some_and(|(_, active)| *active)
    }

    /// How many times the siren has been engaged.
    pub fn engage_count(&self) -> usize {
        let log = self.log.lock().expect("alarm lock poisoned");
        log.iter().filter(|(_, active)| *active).count()
    }
}
