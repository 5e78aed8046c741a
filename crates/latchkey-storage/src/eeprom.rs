//! Byte-addressed non-volatile store abstraction.

#![allow(async_fn_in_trait)]

use latchkey_core::{Error, Result, constants::FLAG_ERASED};

/// A byte-addressed non-volatile store.
///
/// The contract mirrors the real part: single-byte reads and writes,
/// no transactions, no wear management. Settling delays between
/// accesses are the caller's responsibility (see
/// [`CredentialVault`](crate::CredentialVault)).
pub trait Eeprom: Send {
    /// Read one byte.
    ///
    /// # Errors
    ///
    /// Returns `Error::AddressOutOfRange` if `addr` is beyond the
    /// part's capacity.
    async fn read_byte(&mut self, addr: u8) -> Result<u8>;

    /// Write one byte.
    ///
    /// # Errors
    ///
    /// Returns `Error::AddressOutOfRange` if `addr` is beyond the
    /// part's capacity.
    async fn write_byte(&mut self, addr: u8, value: u8) -> Result<()>;
}

/// In-memory EEPROM.
///
/// Fresh cells read as the erased value (`0xFF`), exactly like a part
/// that has never been written.
#[derive(Debug, Clone)]
pub struct MockEeprom {
    cells: Vec<u8>,
}

impl MockEeprom {
    /// Default capacity in bytes.
    pub const DEFAULT_CAPACITY: usize = 256;

    /// Create an erased store with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Create an erased store with a specific capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cells: vec![FLAG_ERASED; capacity],
        }
    }

    fn check(&self, addr: u8) -> Result<usize> {
        let index = addr as usize;
        if index >= self.cells.len() {
            return Err(Error::AddressOutOfRange {
                addr,
                capacity: self.cells.len(),
            });
        }
        Ok(index)
    }
}

impl Default for MockEeprom {
    fn default() -> Self {
        Self::new()
    }
}

impl Eeprom for MockEeprom {
    async fn read_byte(&mut self, addr: u8) -> Result<u8> {
        let index = self.check(addr)?;
        Ok(self.cells[index])
    }

    async fn write_byte(&mut self, addr: u8, value: u8) -> Result<()> {
        let index = self.check(addr)?;
        self.cells[index] = value;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fresh_cells_read_erased() {
        let mut eeprom = MockEeprom::new();
        for addr in [0u8, 5, 255] {
            assert_eq!(eeprom.read_byte(addr).await.unwrap(), FLAG_ERASED);
        }
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let mut eeprom = MockEeprom::new();
        eeprom.write_byte(3, b'x').await.unwrap();
        assert_eq!(eeprom.read_byte(3).await.unwrap(), b'x');
    }

    #[tokio::test]
    async fn test_address_out_of_range() {
        let mut eeprom = MockEeprom::with_capacity(8);
        let err = eeprom.read_byte(8).await.unwrap_err();
        assert!(matches!(
            err,
            Error::AddressOutOfRange { addr: 8, capacity: 8 }
        ));
        assert!(eeprom.write_byte(200, 0).await.is_err());
    }
}
