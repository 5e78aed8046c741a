use crate::{
    Result,
    constants::{CREDENTIAL_LEN, PRINTABLE_MAX, PRINTABLE_MIN},
    error::Error,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use subtle::ConstantTimeEq;

/// A door credential: exactly [`CREDENTIAL_LEN`] printable ASCII
/// characters.
///
/// # Security
/// This type implements constant-time comparison to prevent timing
/// attacks when comparing a typed credential against the stored one.
/// (The HMI's per-keystroke echo comparison is position-by-position by
/// design; this equality covers whole-value checks.)
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
pub struct Credential([u8; CREDENTIAL_LEN]);

impl Credential {
    /// Create a credential with validation.
    ///
    /// # Errors
    /// Returns `Error::InvalidCredential` if:
    /// - The input is not exactly 5 characters long
    /// - Any character is outside printable ASCII (`0x20..=0x7E`)
    pub fn new(value: &str) -> Result<Self> {
        Self::from_bytes(value.as_bytes())
    }

    /// Create a credential from raw wire bytes with validation.
    ///
    /// # Errors
    /// Same rules as [`Credential::new`]. The sentinel byte and
    /// command bytes are rejected implicitly: both sit below the
    /// printable range.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != CREDENTIAL_LEN {
            return Err(Error::InvalidCredential(format!(
                "Credential must be exactly {CREDENTIAL_LEN} characters, got {}",
                bytes.len()
            )));
        }

        if let Some(&bad) = bytes
            .iter()
            .find(|b| !(PRINTABLE_MIN..=PRINTABLE_MAX).contains(*b))
        {
            return Err(Error::InvalidCredential(format!(
                "Credential byte {bad:#04x} outside printable range"
            )));
        }

        let mut buf = [0u8; CREDENTIAL_LEN];
        buf.copy_from_slice(bytes);
        Ok(Credential(buf))
    }

    /// Check whether a single byte is valid as a credential character.
    #[inline]
    #[must_use]
    pub fn is_valid_char(byte: u8) -> bool {
        (PRINTABLE_MIN..=PRINTABLE_MAX).contains(&byte)
    }

    /// Get the credential as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        // Invariant: constructor only admits printable ASCII.
        std::str::from_utf8(&self.0).unwrap_or("")
    }

    /// Get the raw credential bytes, in store/wire order.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; CREDENTIAL_LEN] {
        &self.0
    }

    /// The character at a given position (0-based).
    #[must_use]
    pub fn char_at(&self, index: usize) -> Option<char> {
        self.0.get(index).map(|b| *b as char)
    }
}

impl fmt::Display for Credential {
    /// Masked rendering; the raw value never reaches logs or screens.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", "*".repeat(CREDENTIAL_LEN))
    }
}

impl std::str::FromStr for Credential {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Credential::new(s)
    }
}

/// Constant-time comparison implementation for Credential
///
/// This prevents timing attacks by ensuring comparison takes the same
/// time regardless of where the values differ.
impl PartialEq for Credential {
    fn eq(&self, other: &Self) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

/// Terminal outcome of one authentication session.
///
/// The session always ends in exactly one of these states; there is no
/// fall-through path out of the attempt loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthOutcome {
    /// A pass matched all positions; the requested action may proceed.
    Granted,

    /// All attempts were consumed; the alarm was triggered and the
    /// requested action must not run.
    AlarmRaised,
}

impl AuthOutcome {
    /// Returns `true` if the outcome permits the requested action.
    #[inline]
    #[must_use]
    pub fn is_granted(self) -> bool {
        matches!(self, AuthOutcome::Granted)
    }
}

impl fmt::Display for AuthOutcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AuthOutcome::Granted => write!(f, "Granted"),
            AuthOutcome::AlarmRaised => write!(f, "AlarmRaised"),
        }
    }
}
