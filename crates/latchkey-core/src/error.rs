use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Credential errors
    #[error("Invalid credential: {0}")]
    InvalidCredential(String),

    // Link / protocol errors
    #[error("Peer closed the link")]
    LinkClosed,

    #[error("Credential string exceeds {max} characters before the sentinel")]
    TextTooLong { max: usize },

    #[error("Credential string ended after {got} of {expected} characters")]
    TextTooShort { expected: usize, got: usize },

    #[error("Invalid reply byte: {byte:#04x}")]
    InvalidReply { byte: u8 },

    // Storage errors
    #[error("Store address {addr} out of range (capacity {capacity})")]
    AddressOutOfRange { addr: u8, capacity: usize },

    // Hardware errors (converted from the hardware crate's own type)
    #[error("Hardware error: {0}")]
    Hardware(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
