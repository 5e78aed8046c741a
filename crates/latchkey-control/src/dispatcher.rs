use latchkey_core::{Error, Result, Timings};
use latchkey_hardware::traits::{Alarm, DoorMotor};
use latchkey_link::Link;
use latchkey_protocol::{Command, FirstUseReply};
use latchkey_storage::{CredentialVault, Eeprom};
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{info, warn};

use crate::sequencer::{AlarmSequencer, DoorSequencer};

/// The Control node's command loop.
///
/// Announces readiness once, then serves commands from the HMI until
/// the link closes. Commands are served strictly one at a time; the
/// HMI never pipelines, and the timed sequences rely on both nodes
/// counting the same durations from the same command.
///
/// # Error policy
///
/// - A malformed credential string after `SetCredential` is logged and
///   dropped; the link resynchronizes on the string's sentinel and the
///   loop keeps serving. The store is not touched.
/// - Storage failures are fatal: a Control node that cannot read its
///   own store has nothing useful to serve.
pub struct Dispatcher<T, E, M, A> {
    link: Link<T>,
    vault: CredentialVault<E>,
    motor: M,
    alarm: A,
    door_seq: DoorSequencer,
    alarm_seq: AlarmSequencer,
}

impl<T, E, M, A> Dispatcher<T, E, M, A>
where
    T: AsyncRead + AsyncWrite + Unpin,
    E: Eeprom,
    M: DoorMotor,
    A: Alarm,
{
    /// Assemble a Control node from its parts.
    pub fn new(link: Link<T>, eeprom: E, motor: M, alarm: A, timings: Timings) -> Self {
        Self {
            link,
            vault: CredentialVault::new(eeprom, timings),
            motor,
            alarm,
            door_seq: DoorSequencer::new(timings),
            alarm_seq: AlarmSequencer::new(timings),
        }
    }

    /// Announce readiness and serve commands until the link closes.
    pub async fn run(mut self) -> Result<()> {
        info!("Control node ready");
        self.link.send_command(Command::Ready).await?;

        loop {
            let command = match self.link.recv_command().await {
                Ok(command) => command,
                Err(Error::LinkClosed) => {
                    info!("Link closed, Control node shutting down");
                    return Ok(());
                }
                Err(e) => return Err(e),
            };
            self.dispatch(command).await?;
        }
    }

    async fn dispatch(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Ready => {
                // Only the Control node announces readiness.
                warn!("Ignoring Ready from peer");
                Ok(())
            }
            Command::QueryFirstUse => {
                let reply = if self.vault.is_provisioned().await? {
                    FirstUseReply::Provisioned
                } else {
                    FirstUseReply::NotProvisioned
                };
                self.link.send_reply(reply).await
            }
            Command::GetCredential => {
                let credential = self.vault.load_credential().await?;
                self.link.send_credential(&credential).await
            }
            Command::SetCredential => match self.link.recv_credential().await {
                Ok(credential) => self.vault.store_credential(&credential).await,
                Err(
                    e @ (Error::TextTooShort { .. }
                    | Error::TextTooLong { .. }
                    | Error::InvalidCredential(_)),
                ) => {
                    warn!(error = %e, "Rejecting malformed credential string");
                    Ok(())
                }
                Err(e) => Err(e),
            },
            Command::TriggerAlarm => self.alarm_seq.run(&mut self.alarm).await,
            Command::OpenDoor => self.door_seq.run(&mut self.motor).await,
        }
    }
}
