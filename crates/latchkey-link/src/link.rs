use latchkey_core::{
    Credential, Error, Result,
    constants::{CREDENTIAL_LEN, STRING_SENTINEL},
};
use latchkey_protocol::{Command, FirstUseReply};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, DuplexStream};
use tracing::{debug, trace, warn};

/// One end of the HMI/Control byte link.
///
/// Wraps any async byte stream and speaks the exchange elements of the
/// door-lock protocol over it. Each send flushes immediately; the
/// appliance exchanges single bytes and short strings, never bulk
/// data.
///
/// # Thread Safety
///
/// `Link` is owned by a single node task. The protocol is strictly
/// half-duplex at the exchange level (one side talks, the other
/// listens), so there is nothing to share.
pub struct Link<T> {
    stream: T,
    /// Name used in traces ("hmi" or "control").
    role: &'static str,
}

impl<T> Link<T>
where
    T: AsyncRead + AsyncWrite + Unpin,
{
    /// Wrap a byte stream as a link endpoint.
    pub fn new(stream: T, role: &'static str) -> Self {
        debug!(role, "Creating link endpoint");
        Self { stream, role }
    }

    /// Send a single command byte.
    pub async fn send_command(&mut self, command: Command) -> Result<()> {
        trace!(role = self.role, %command, "Sending command");
        self.write_byte(command.to_u8()).await
    }

    /// Receive the next command.
    ///
    /// Bytes that do not decode as a command are logged and discarded;
    /// a byte from a desynchronized exchange must not be misread as a
    /// request.
    ///
    /// # Errors
    /// Returns `Error::LinkClosed` if the peer goes away.
    pub async fn recv_command(&mut self) -> Result<Command> {
        loop {
            let byte = self.read_byte().await?;
            match Command::from_u8(byte) {
                Some(command) => {
                    trace!(role = self.role, %command, "Received command");
                    return Ok(command);
                }
                None => {
                    warn!(
                        role = self.role,
                        byte = format_args!("{byte:#04x}"),
                        "Discarding byte that is not a command"
                    );
                }
            }
        }
    }

    /// Block until the peer announces it is ready.
    ///
    /// Anything received before the ready command is discarded; the
    /// peer may still be flushing boot noise.
    pub async fn wait_ready(&mut self) -> Result<()> {
        debug!(role = self.role, "Waiting for peer ready");
        loop {
            if self.recv_command().await? == Command::Ready {
                debug!(role = self.role, "Peer is ready");
                return Ok(());
            }
        }
    }

    /// Send a first-use reply byte.
    pub async fn send_reply(&mut self, reply: FirstUseReply) -> Result<()> {
        trace!(role = self.role, %reply, "Sending reply");
        self.write_byte(reply.to_u8()).await
    }

    /// Receive a first-use reply byte.
    ///
    /// # Errors
    /// Returns `Error::InvalidReply` if the byte is neither defined
    /// reply value, `Error::LinkClosed` if the peer goes away.
    pub async fn recv_reply(&mut self) -> Result<FirstUseReply> {
        let byte = self.read_byte().await?;
        let reply = FirstUseReply::from_u8(byte)?;
        trace!(role = self.role, %reply, "Received reply");
        Ok(reply)
    }

    /// Send a credential as a sentinel-terminated string.
    pub async fn send_credential(&mut self, credential: &Credential) -> Result<()> {
        trace!(role = self.role, "Sending credential string");
        self.stream.write_all(credential.as_bytes()).await?;
        self.stream.write_all(&[STRING_SENTINEL]).await?;
        self.stream.flush().await?;
        Ok(())
    }

    /// Receive a sentinel-terminated credential string.
    ///
    /// Exactly [`CREDENTIAL_LEN`] payload bytes must arrive before the
    /// sentinel. An early sentinel is reported as too short. Extra
    /// payload bytes are drained through their sentinel before the
    /// error is returned, so the next exchange starts on a message
    /// boundary.
    pub async fn recv_credential(&mut self) -> Result<Credential> {
        let mut buf = [0u8; CREDENTIAL_LEN];
        let mut got = 0usize;

        loop {
            let byte = self.read_byte().await?;
            if byte == STRING_SENTINEL {
                if got < CREDENTIAL_LEN {
                    warn!(
                        role = self.role,
                        got, "Credential string ended early"
                    );
                    return Err(Error::TextTooShort {
                        expected: CREDENTIAL_LEN,
                        got,
                    });
                }
                trace!(role = self.role, "Received credential string");
                return Credential::from_bytes(&buf);
            }

            if got == CREDENTIAL_LEN {
                // Overlong string: resynchronize on its sentinel.
                let mut extra = 1usize;
                while self.read_byte().await? != STRING_SENTINEL {
                    extra += 1;
                }
                warn!(
                    role = self.role,
                    extra, "Credential string overlong, drained to sentinel"
                );
                return Err(Error::TextTooLong {
                    max: CREDENTIAL_LEN,
                });
            }

            buf[got] = byte;
            got += 1;
        }
    }

    /// Direct access to the underlying stream.
    ///
    /// Tests use this to inject raw bytes below the exchange methods.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.stream
    }

    /// Unwrap the link back into its stream.
    pub fn into_inner(self) -> T {
        self.stream
    }

    async fn write_byte(&mut self, byte: u8) -> Result<()> {
        self.stream.write_all(&[byte]).await?;
        self.stream.flush().await?;
        Ok(())
    }

    async fn read_byte(&mut self) -> Result<u8> {
        match self.stream.read_u8().await {
            Ok(byte) => Ok(byte),
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                debug!(role = self.role, "Peer closed the link");
                Err(Error::LinkClosed)
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Build a connected pair of in-process links.
///
/// Returns `(hmi, control)` endpoints over a `tokio::io::duplex` pipe.
/// Used by the demo binary and the integration tests; the appliance
/// itself wires each node to a real serial port instead.
pub fn pair() -> (Link<DuplexStream>, Link<DuplexStream>) {
    // 64 bytes is generous; the longest message is 6 bytes.
    let (a, b) = tokio::io::duplex(64);
    (Link::new(a, "hmi"), Link::new(b, "control"))
}
