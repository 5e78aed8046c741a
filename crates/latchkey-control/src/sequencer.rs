//! Timed actuator sequences.
//!
//! The door and alarm cycles are open-loop: there is no position or
//! state feedback, only fixed durations. Both sequencers take their
//! durations from an injected [`Timings`], so tests drive them under a
//! paused clock.

use latchkey_core::{Result, Timings};
use latchkey_hardware::traits::{Alarm, DoorMotor, MotorPhase};
use tokio::time::sleep;
use tracing::{info, warn};

/// Runs the full door cycle: open, hold, close.
///
/// The sequence is `Forward` for the travel time, `Stopped` for the
/// hold time, `Reverse` for the travel time, then `Stopped`. The motor
/// is always left stopped, including on error.
#[derive(Debug, Clone, Copy)]
pub struct DoorSequencer {
    timings: Timings,
}

impl DoorSequencer {
    pub fn new(timings: Timings) -> Self {
        Self { timings }
    }

    /// Drive one complete door cycle.
    ///
    /// If a phase change fails mid-cycle, a stop command is still
    /// issued before the error is returned.
    pub async fn run<M: DoorMotor>(&self, motor: &mut M) -> Result<()> {
        let result = self.cycle(motor).await;
        if result.is_err() {
            warn!("Door cycle failed; stopping motor");
            if let Err(stop_err) = motor.set_phase(MotorPhase::Stopped).await {
                warn!(error = %stop_err, "Motor did not accept stop");
            }
        }
        result
    }

    async fn cycle<M: DoorMotor>(&self, motor: &mut M) -> Result<()> {
        info!("Door cycle: opening");
        motor.set_phase(MotorPhase::Forward).await?;
        sleep(self.timings.door_travel).await;

        info!("Door cycle: holding open");
        motor.set_phase(MotorPhase::Stopped).await?;
        sleep(self.timings.door_hold).await;

        info!("Door cycle: closing");
        motor.set_phase(MotorPhase::Reverse).await?;
        sleep(self.timings.door_travel).await;

        motor.set_phase(MotorPhase::Stopped).await?;
        info!("Door cycle: complete");
        Ok(())
    }
}

/// Runs one alarm burst: engage, hold, silence.
#[derive(Debug, Clone, Copy)]
pub struct AlarmSequencer {
    timings: Timings,
}

impl AlarmSequencer {
    pub fn new(timings: Timings) -> Self {
        Self { timings }
    }

    /// Sound the alarm for the configured hold time.
    pub async fn run<A: Alarm>(&self, alarm: &mut A) -> Result<()> {
        info!("Alarm: engaged");
        alarm.set_active(true).await?;
        sleep(self.timings.alarm_hold).await;

        alarm.set_active(false).await?;
        info!("Alarm: silenced");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use latchkey_hardware::mock::{MockAlarm, MockDoorMotor};
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_door_cycle_phase_order() {
        let (mut motor, handle) = MockDoorMotor::new();
        let sequencer = DoorSequencer::new(Timings::default());

        sequencer.run(&mut motor).await.unwrap();

        assert_eq!(
            handle.phases(),
            vec![
                MotorPhase::Forward,
                MotorPhase::Stopped,
                MotorPhase::Reverse,
                MotorPhase::Stopped,
            ]
        );
        assert_eq!(handle.current_phase(), MotorPhase::Stopped);
    }

    #[tokio::test(start_paused = true)]
    async fn test_door_cycle_duration() {
        let (mut motor, _handle) = MockDoorMotor::new();
        let sequencer = DoorSequencer::new(Timings::default());

        let start = tokio::time::Instant::now();
        sequencer.run(&mut motor).await.unwrap();

        // 15s open + 3s hold + 15s close.
        assert_eq!(start.elapsed(), Duration::from_secs(33));
    }

    #[tokio::test(start_paused = true)]
    async fn test_alarm_burst() {
        let (mut alarm, handle) = MockAlarm::new();
        let sequencer = AlarmSequencer::new(Timings::default());

        let start = tokio::time::Instant::now();
        sequencer.run(&mut alarm).await.unwrap();

        assert_eq!(start.elapsed(), Duration::from_secs(10));
        assert_eq!(handle.events(), vec![true, false]);
        assert!(!handle.is_active());
    }

    /// Motor that faults on one particular phase change and records
    /// every phase it did accept.
    struct FaultyMotor {
        accepted: Vec<MotorPhase>,
        fail_on_call: usize,
        calls: usize,
    }

    impl FaultyMotor {
        fn new(fail_on_call: usize) -> Self {
            Self {
                accepted: Vec::new(),
                fail_on_call,
                calls: 0,
            }
        }
    }

    impl DoorMotor for FaultyMotor {
        async fn set_phase(&mut self, phase: MotorPhase) -> latchkey_hardware::Result<()> {
            self.calls += 1;
            if self.calls == self.fail_on_call {
                return Err(latchkey_hardware::HardwareError::communication(
                    "motor driver fault",
                ));
            }
            self.accepted.push(phase);
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_door_cycle_stops_motor_on_mid_cycle_fault() {
        // Fault on the Reverse command; the door is moving at that
        // point and must still receive a stop.
        let mut motor = FaultyMotor::new(3);
        let sequencer = DoorSequencer::new(Timings::default());

        let result = sequencer.run(&mut motor).await;

        assert!(result.is_err());
        assert_eq!(
            motor.accepted,
            vec![MotorPhase::Forward, MotorPhase::Stopped, MotorPhase::Stopped]
        );
        assert_eq!(motor.accepted.last(), Some(&MotorPhase::Stopped));
    }

    #[tokio::test(start_paused = true)]
    async fn test_door_cycle_stops_motor_when_first_phase_faults() {
        let mut motor = FaultyMotor::new(1);
        let sequencer = DoorSequencer::new(Timings::default());

        let result = sequencer.run(&mut motor).await;

        assert!(result.is_err());
        // Only the recovery stop went through.
        assert_eq!(motor.accepted, vec![MotorPhase::Stopped]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_timings() {
        let timings = Timings {
            door_travel: Duration::from_millis(10),
            door_hold: Duration::from_millis(5),
            ..Timings::default()
        };
        let (mut motor, _handle) = MockDoorMotor::new();

        let start = tokio::time::Instant::now();
        DoorSequencer::new(timings).run(&mut motor).await.unwrap();
        assert_eq!(start.elapsed(), Duration::from_millis(25));
    }
}
