//! Error types for peripheral operations.

/// Result type alias for peripheral operations.
pub type Result<T> = std::result::Result<T, HardwareError>;

/// Errors that can occur while driving a peripheral.
#[derive(Debug, thiserror::Error)]
pub enum HardwareError {
    /// Device is not connected or has been disconnected.
    #[error("Device disconnected: {device}")]
    Disconnected { device: String },

    /// Coordinates outside the device surface (display rows/columns).
    #[error("Out of bounds: {message}")]
    OutOfBounds { message: String },

    /// Device communication error.
    #[error("Communication error: {message}")]
    CommunicationError { message: String },

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HardwareError {
    /// Create a new disconnected error.
    pub fn disconnected(device: impl Into<String>) -> Self {
        Self::Disconnected {
            device: device.into(),
        }
    }

    /// Create a new out-of-bounds error.
    pub fn out_of_bounds(message: impl Into<String>) -> Self {
        Self::OutOfBounds {
            message: message.into(),
        }
    }

    /// Create a new communication error.
    pub fn communication(message: impl Into<String>) -> Self {
        Self::CommunicationError {
            message: message.into(),
        }
    }
}

impl From<HardwareError> for latchkey_core::Error {
    fn from(err: HardwareError) -> Self {
        latchkey_core::Error::Hardware(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = HardwareError::disconnected("keypad");
        assert_eq!(err.to_string(), "Device disconnected: keypad");
    }

    #[test]
    fn test_conversion_to_core_error() {
        let err: latchkey_core::Error = HardwareError::disconnected("display").into();
        assert!(matches!(err, latchkey_core::Error::Hardware(_)));
    }
}
