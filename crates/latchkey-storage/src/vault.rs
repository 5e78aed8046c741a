use latchkey_core::{
    Credential, Result, Timings,
    constants::{CREDENTIAL_BASE_ADDR, CREDENTIAL_LEN, FIRST_USE_FLAG_ADDR, FLAG_ERASED,
        FLAG_PROVISIONED},
};
use tracing::{debug, info};

use crate::eeprom::Eeprom;

/// Layout-aware view over the credential store.
///
/// Owns the fixed layout (credential at addresses `0..=4`, flag at
/// `5`) and the settling discipline: every byte access is followed by
/// the configured settle delay before the next one.
///
/// # Provisioning flag
///
/// The flag cell is only ever written together with a full credential,
/// and it is written last. A power loss mid-store therefore leaves the
/// flag erased and the system still reads as unprovisioned.
pub struct CredentialVault<E> {
    eeprom: E,
    timings: Timings,
}

impl<E: Eeprom> CredentialVault<E> {
    /// Wrap a store.
    pub fn new(eeprom: E, timings: Timings) -> Self {
        Self { eeprom, timings }
    }

    /// Whether a credential has ever been stored.
    ///
    /// Any flag value other than the erased byte counts as
    /// provisioned; a partially decayed cell must not lock the user
    /// out of the normal flow.
    pub async fn is_provisioned(&mut self) -> Result<bool> {
        let flag = self.read_settled(FIRST_USE_FLAG_ADDR).await?;
        debug!(flag = format_args!("{flag:#04x}"), "Read provisioning flag");
        Ok(flag != FLAG_ERASED)
    }

    /// Load the stored credential.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidCredential` if the cells do not hold a
    /// valid credential, which means the store was never provisioned
    /// or has been corrupted.
    pub async fn load_credential(&mut self) -> Result<Credential> {
        let mut bytes = [0u8; CREDENTIAL_LEN];
        for (offset, slot) in bytes.iter_mut().enumerate() {
            *slot = self
                .read_settled(CREDENTIAL_BASE_ADDR + offset as u8)
                .await?;
        }
        Credential::from_bytes(&bytes)
    }

    /// Store a credential and mark the system provisioned.
    ///
    /// The flag is written after the last credential byte.
    pub async fn store_credential(&mut self, credential: &Credential) -> Result<()> {
        for (offset, &byte) in credential.as_bytes().iter().enumerate() {
            self.write_settled(CREDENTIAL_BASE_ADDR + offset as u8, byte)
                .await?;
        }
        self.write_settled(FIRST_USE_FLAG_ADDR, FLAG_PROVISIONED)
            .await?;
        info!("Stored credential and provisioning flag");
        Ok(())
    }

    async fn read_settled(&mut self, addr: u8) -> Result<u8> {
        let value = self.eeprom.read_byte(addr).await?;
        tokio::time::sleep(self.timings.store_settle).await;
        Ok(value)
    }

    async fn write_settled(&mut self, addr: u8, value: u8) -> Result<()> {
        self.eeprom.write_byte(addr, value).await?;
        tokio::time::sleep(self.timings.store_settle).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eeprom::MockEeprom;
    use std::time::Duration;

    fn vault() -> CredentialVault<MockEeprom> {
        CredentialVault::new(MockEeprom::new(), Timings::default())
    }

    #[tokio::test(start_paused = true)]
    async fn test_fresh_store_is_unprovisioned() {
        let mut vault = vault();
        assert!(!vault.is_provisioned().await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_then_load() {
        let mut vault = vault();
        let cred = Credential::new("12345").unwrap();

        vault.store_credential(&cred).await.unwrap();
        assert!(vault.is_provisioned().await.unwrap());
        assert_eq!(vault.load_credential().await.unwrap(), cred);
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_overwrites_previous_credential() {
        let mut vault = vault();

        vault
            .store_credential(&Credential::new("11111").unwrap())
            .await
            .unwrap();
        let newer = Credential::new("22222").unwrap();
        vault.store_credential(&newer).await.unwrap();

        assert_eq!(vault.load_credential().await.unwrap(), newer);
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_from_erased_store_fails() {
        let mut vault = vault();
        // Erased cells are 0xFF, not printable.
        assert!(vault.load_credential().await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_settles_after_every_access() {
        let mut vault = vault();
        let cred = Credential::new("12345").unwrap();

        let start = tokio::time::Instant::now();
        vault.store_credential(&cred).await.unwrap();

        // Five credential bytes plus the flag, 50ms settle each.
        assert_eq!(start.elapsed(), Duration::from_millis(300));
    }

    mod round_trip {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Every credential over the permitted charset survives a
            /// store/load cycle unchanged.
            #[test]
            fn prop_store_load_round_trip(text in "[ -~]{5}") {
                let rt = tokio::runtime::Builder::new_current_thread()
                    .enable_time()
                    .build()
                    .expect("runtime");
                rt.block_on(async {
                    let timings = Timings {
                        store_settle: Duration::ZERO,
                        ..Timings::default()
                    };
                    let mut vault = CredentialVault::new(MockEeprom::new(), timings);
                    let cred = Credential::new(&text).unwrap();

                    vault.store_credential(&cred).await.unwrap();
                    prop_assert_eq!(vault.load_credential().await.unwrap(), cred);
                    Ok(())
                })?;
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_shortened_settle_is_honored() {
        let timings = Timings {
            store_settle: Duration::from_millis(1),
            ..Timings::default()
        };
        let mut vault = CredentialVault::new(MockEeprom::new(), timings);

        let start = tokio::time::Instant::now();
        vault
            .store_credential(&Credential::new("12345").unwrap())
            .await
            .unwrap();
        assert_eq!(start.elapsed(), Duration::from_millis(6));
    }
}
