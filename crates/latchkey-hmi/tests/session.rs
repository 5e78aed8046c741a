//! Two-node scenario tests: a real Session against a real Dispatcher
//! over an in-process link, with mock peripherals on both sides.
//!
//! All tests run under a paused clock; the 15s/3s/10s appliance
//! timings elapse instantly once every task is blocked on a timer.

use latchkey_control::Dispatcher;
use latchkey_core::{Credential, Timings};
use latchkey_hardware::mock::{
    MockAlarm, MockAlarmHandle, MockDoorMotor, MockDoorMotorHandle, MockKeypad,
    MockKeypadHandle, VirtualDisplay, VirtualDisplayHandle,
};
use latchkey_hardware::traits::MotorPhase;
use latchkey_hmi::Session;
use latchkey_link::pair;
use latchkey_storage::{Eeprom, MockEeprom};
use std::time::Duration;

struct Appliance {
    keypad: MockKeypadHandle,
    display: VirtualDisplayHandle,
    motor: MockDoorMotorHandle,
    alarm: MockAlarmHandle,
}

/// Wire up both nodes and spawn them. A `stored` credential seeds the
/// Control node's store; `None` leaves it factory-erased.
async fn boot(stored: Option<&str>) -> Appliance {
    let mut eeprom = MockEeprom::new();
    if let Some(text) = stored {
        let cred = Credential::new(text).unwrap();
        for (offset, &byte) in cred.as_bytes().iter().enumerate() {
            eeprom.write_byte(offset as u8, byte).await.unwrap();
        }
        eeprom.write_byte(5, 0x00).await.unwrap();
    }

    let (hmi_link, control_link) = pair();
    let (motor, motor_handle) = MockDoorMotor::new();
    let (alarm, alarm_handle) = MockAlarm::new();
    let (keypad, keypad_handle) = MockKeypad::new();
    let (display, display_handle) = VirtualDisplay::new();

    let dispatcher = Dispatcher::new(control_link, eeprom, motor, alarm, Timings::default());
    let session = Session::new(hmi_link, keypad, display, Timings::default());

    tokio::spawn(dispatcher.run());
    tokio::spawn(session.run());

    Appliance {
        keypad: keypad_handle,
        display: display_handle,
        motor: motor_handle,
        alarm: alarm_handle,
    }
}

/// Let every spawned task run to its next quiescent point. Under the
/// paused clock this also burns through any pending sleeps.
async fn settle() {
    tokio::time::sleep(Duration::from_secs(120)).await;
}

#[tokio::test(start_paused = true)]
async fn wrong_credential_three_times_raises_one_alarm_and_no_door() {
    let app = boot(Some("12345")).await;

    app.keypad.send_key('+').await.unwrap();
    for _ in 0..3 {
        app.keypad.send_text("12346").await.unwrap();
    }
    settle().await;

    assert_eq!(app.alarm.engage_count(), 1);
    assert!(!app.alarm.is_active());
    assert!(app.motor.phases().is_empty());

    // Back at the home prompt, action skipped.
    assert_eq!(app.display.line(0), "+:Open door");
}

#[tokio::test(start_paused = true)]
async fn correct_credential_first_try_opens_the_door() {
    let app = boot(Some("12345")).await;

    app.keypad.send_key('+').await.unwrap();
    app.keypad.send_text("12345").await.unwrap();
    settle().await;

    assert!(app.alarm.events().is_empty());
    assert_eq!(
        app.motor.phases(),
        vec![
            MotorPhase::Forward,
            MotorPhase::Stopped,
            MotorPhase::Reverse,
            MotorPhase::Stopped,
        ]
    );
    assert_eq!(app.display.line(0), "+:Open door");
}

#[tokio::test(start_paused = true)]
async fn failed_pass_then_success_still_opens_the_door() {
    let app = boot(Some("12345")).await;

    app.keypad.send_key('+').await.unwrap();
    // First pass fails on the last keystroke, second succeeds.
    app.keypad.send_text("12346").await.unwrap();
    app.keypad.send_text("12345").await.unwrap();
    settle().await;

    assert!(app.alarm.events().is_empty());
    assert_eq!(app.motor.current_phase(), MotorPhase::Stopped);
    assert_eq!(app.motor.phases().len(), 4);
}

#[tokio::test(start_paused = true)]
async fn provisioning_then_door_open_with_the_new_credential() {
    let app = boot(None).await;

    // Two matching captures provision the appliance.
    app.keypad.send_text("abcde").await.unwrap();
    app.keypad.send_text("abcde").await.unwrap();

    app.keypad.send_key('+').await.unwrap();
    app.keypad.send_text("abcde").await.unwrap();
    settle().await;

    assert!(app.alarm.events().is_empty());
    assert_eq!(app.motor.phases().len(), 4);
}

#[tokio::test(start_paused = true)]
async fn provisioning_mismatch_restarts_both_captures() {
    let app = boot(None).await;

    // Confirmation diverges at the last keystroke; provisioning
    // restarts from the first capture.
    app.keypad.send_text("abcde").await.unwrap();
    app.keypad.send_text("abcdX").await.unwrap();

    app.keypad.send_text("fghij").await.unwrap();
    app.keypad.send_text("fghij").await.unwrap();

    app.keypad.send_key('+').await.unwrap();
    app.keypad.send_text("fghij").await.unwrap();
    settle().await;

    assert!(app.alarm.events().is_empty());
    assert_eq!(app.motor.phases().len(), 4);
}

#[tokio::test(start_paused = true)]
async fn change_credential_takes_effect_immediately() {
    let app = boot(Some("12345")).await;

    // Authenticate with the old value, change to a new one.
    app.keypad.send_key('-').await.unwrap();
    app.keypad.send_text("12345").await.unwrap();
    app.keypad.send_text("54321").await.unwrap();

    // The replacement is authoritative for the next authentication.
    app.keypad.send_key('+').await.unwrap();
    app.keypad.send_text("54321").await.unwrap();
    settle().await;

    assert!(app.alarm.events().is_empty());
    assert_eq!(app.motor.phases().len(), 4);
}

#[tokio::test(start_paused = true)]
async fn home_prompt_ignores_unbound_keys() {
    let app = boot(Some("12345")).await;

    app.keypad.send_text("xz9").await.unwrap();
    app.keypad.send_key('+').await.unwrap();
    app.keypad.send_text("12345").await.unwrap();
    settle().await;

    assert_eq!(app.motor.phases().len(), 4);
}

#[tokio::test(start_paused = true)]
async fn one_home_cycle_returns_to_the_caller_after_the_alarm_outcome() {
    let mut eeprom = MockEeprom::new();
    let cred = Credential::new("12345").unwrap();
    for (offset, &byte) in cred.as_bytes().iter().enumerate() {
        eeprom.write_byte(offset as u8, byte).await.unwrap();
    }
    eeprom.write_byte(5, 0x00).await.unwrap();

    let (mut hmi_link, control_link) = pair();
    let (motor, motor_handle) = MockDoorMotor::new();
    let (alarm, alarm_handle) = MockAlarm::new();
    let (keypad, keypad_handle) = MockKeypad::new();
    let (display, display_handle) = VirtualDisplay::new();

    let dispatcher = Dispatcher::new(control_link, eeprom, motor, alarm, Timings::default());
    tokio::spawn(dispatcher.run());

    // Drive the session by hand instead of spawning run(): take the
    // handshake, then ask for exactly one home cycle.
    hmi_link.wait_ready().await.unwrap();
    let mut session = Session::new(hmi_link, keypad, display, Timings::default());

    keypad_handle.send_key('+').await.unwrap();
    for _ in 0..3 {
        keypad_handle.send_text("00000").await.unwrap();
    }

    session.run_home_cycle().await.unwrap();

    // The cycle ended in the alarm outcome: siren fired once, the door
    // never moved, and the alarm notice is still up because the home
    // screen belongs to the next cycle.
    assert_eq!(alarm_handle.engage_count(), 1);
    assert!(motor_handle.phases().is_empty());
    assert_eq!(display_handle.line(0), "!! EMERGENCY !!");
}

#[tokio::test(start_paused = true)]
async fn alarm_notice_is_shown_while_the_siren_sounds() {
    let app = boot(Some("12345")).await;

    app.keypad.send_key('+').await.unwrap();
    for _ in 0..3 {
        app.keypad.send_text("00000").await.unwrap();
    }

    // Step just past the third failed pass; the alarm hold is still
    // running on both nodes.
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert!(app.alarm.is_active());
    assert_eq!(app.display.line(0), "!! EMERGENCY !!");

    settle().await;
    assert!(!app.alarm.is_active());
    assert_eq!(app.alarm.engage_count(), 1);
}
