use latchkey_core::{
    AuthOutcome, Credential, Result, Timings,
    constants::{CREDENTIAL_LEN, MAX_AUTH_ATTEMPTS},
};
use latchkey_hardware::traits::{Keypad, TextDisplay};
use latchkey_link::Link;
use latchkey_protocol::Command;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::screens;

/// The HMI node's session loop.
///
/// Owns the keypad, the display, and the HMI end of the link. All
/// session state is local to the procedure that needs it: each capture
/// builds a fresh [`Credential`], so nothing stale can leak between
/// provisioning, authentication, and change flows.
pub struct Session<T, K, D> {
    link: Link<T>,
    keypad: K,
    display: D,
    timings: Timings,
}

impl<T, K, D> Session<T, K, D>
where
    T: AsyncRead + AsyncWrite + Unpin,
    K: Keypad,
    D: TextDisplay,
{
    /// Assemble an HMI node from its parts.
    pub fn new(link: Link<T>, keypad: K, display: D, timings: Timings) -> Self {
        Self {
            link,
            keypad,
            display,
            timings,
        }
    }

    /// Run the session: boot handshake, first-use provisioning, then
    /// the home loop until the link closes or a device fails.
    pub async fn run(mut self) -> Result<()> {
        self.link.wait_ready().await?;

        self.link.send_command(Command::QueryFirstUse).await?;
        let reply = self.link.recv_reply().await?;
        info!(%reply, "Control node answered first-use query");

        if !reply.is_provisioned() {
            self.provision().await?;
        }

        loop {
            self.run_home_cycle().await?;
        }
    }

    /// One pass of the home loop: prompt, authenticate, dispatch.
    ///
    /// On the alarm outcome the requested action is skipped and the
    /// session returns to the home prompt.
    pub async fn run_home_cycle(&mut self) -> Result<()> {
        self.display.clear().await?;
        self.display.print(0, screens::HOME_TOP).await?;
        self.display.print(1, screens::HOME_BOTTOM).await?;

        let action = loop {
            match self.keypad.read_key().await? {
                key @ (screens::KEY_OPEN_DOOR | screens::KEY_CHANGE_CREDENTIAL) => break key,
                other => debug!(key = %other, "Ignoring key outside home actions"),
            }
        };

        match self.authenticate().await? {
            AuthOutcome::Granted => match action {
                screens::KEY_OPEN_DOOR => self.open_door().await,
                _ => self.change_credential().await,
            },
            AuthOutcome::AlarmRaised => {
                info!("Authentication exhausted, returning to home prompt");
                Ok(())
            }
        }
    }

    /// First-use provisioning: two matching captures, then store.
    ///
    /// Retries without bound until the confirmation pass matches the
    /// first capture; there is no cancel path.
    async fn provision(&mut self) -> Result<()> {
        info!("Unprovisioned, starting provisioning");
        loop {
            let candidate = self.capture(screens::PROMPT_NEW_PASSWORD).await?;
            if self.confirm(&candidate).await? {
                self.push_credential(&candidate).await?;
                info!("Provisioning complete");
                return Ok(());
            }
            warn!("Provisioning captures disagreed, restarting");
        }
    }

    /// Authentication: up to three passes against the stored value.
    ///
    /// The authoritative credential is fetched fresh from the Control
    /// node every time; the HMI never caches it. The attempt counter
    /// is consumed by every pass, including the one that succeeds.
    async fn authenticate(&mut self) -> Result<AuthOutcome> {
        self.link.send_command(Command::GetCredential).await?;
        let stored = self.link.recv_credential().await?;

        let mut attempts = MAX_AUTH_ATTEMPTS;
        while attempts > 0 {
            attempts -= 1;
            if self.try_pass(&stored).await? {
                info!(remaining = attempts, "Authentication succeeded");
                return Ok(AuthOutcome::Granted);
            }
        }

        warn!("Authentication exhausted, raising alarm");
        self.link.send_command(Command::TriggerAlarm).await?;
        self.display.clear().await?;
        self.display.print(0, screens::NOTICE_ALARM).await?;
        // The Control node holds its siren for the same duration on
        // its own clock.
        sleep(self.timings.alarm_hold).await;
        Ok(AuthOutcome::AlarmRaised)
    }

    /// One authentication pass: masked entry compared per keystroke.
    ///
    /// Aborts on the first mismatching position; the rest of the pass
    /// is never captured.
    async fn try_pass(&mut self, stored: &Credential) -> Result<bool> {
        self.display.clear().await?;
        self.display.print(0, screens::PROMPT_PASSWORD).await?;

        for position in 0..CREDENTIAL_LEN {
            let key = self.keypad.read_key().await?;
            self.display
                .put_char(1, position, screens::MASK_CHAR)
                .await?;
            if stored.char_at(position) != Some(key) {
                debug!(position, "Keystroke mismatch, aborting pass");
                self.display.print(0, screens::NOTICE_MISMATCH).await?;
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Door cycle mirror: the Control node drives the motor while the
    /// display walks the same phases on this node's clock.
    async fn open_door(&mut self) -> Result<()> {
        self.link.send_command(Command::OpenDoor).await?;

        self.display.clear().await?;
        self.display.print(0, screens::NOTICE_OPENING).await?;
        sleep(self.timings.door_travel).await;

        self.display.print(0, screens::NOTICE_HOLDING).await?;
        sleep(self.timings.door_hold).await;

        self.display.print(0, screens::NOTICE_CLOSING).await?;
        sleep(self.timings.door_travel).await;
        Ok(())
    }

    /// Credential change: one capture, no confirmation pass.
    async fn change_credential(&mut self) -> Result<()> {
        let replacement = self.capture(screens::PROMPT_NEW_PASSWORD).await?;
        self.push_credential(&replacement).await
    }

    /// Capture five masked keystrokes into a fresh credential.
    async fn capture(&mut self, prompt: &str) -> Result<Credential> {
        self.display.clear().await?;
        self.display.print(0, prompt).await?;

        let mut bytes = [0u8; CREDENTIAL_LEN];
        for (position, slot) in bytes.iter_mut().enumerate() {
            let key = self.keypad.read_key().await?;
            self.display
                .put_char(1, position, screens::MASK_CHAR)
                .await?;
            // Non-ASCII keys become an invalid byte and fail the
            // credential validation below.
            *slot = u8::try_from(u32::from(key)).unwrap_or(0);
        }
        Credential::from_bytes(&bytes)
    }

    /// Provisioning confirmation pass: compared per keystroke against
    /// the first capture, aborting on the first mismatch.
    async fn confirm(&mut self, candidate: &Credential) -> Result<bool> {
        self.display.clear().await?;
        self.display.print(0, screens::PROMPT_CONFIRM).await?;

        for position in 0..CREDENTIAL_LEN {
            let key = self.keypad.read_key().await?;
            self.display
                .put_char(1, position, screens::MASK_CHAR)
                .await?;
            if candidate.char_at(position) != Some(key) {
                self.display.print(0, screens::NOTICE_MISMATCH).await?;
                return Ok(false);
            }
        }
        Ok(true)
    }

    async fn push_credential(&mut self, credential: &Credential) -> Result<()> {
        self.link.send_command(Command::SetCredential).await?;
        self.link.send_credential(credential).await?;
        debug!("Pushed credential to Control node");
        Ok(())
    }
}
