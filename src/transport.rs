use crate::dns;
use std::{
    io::{self, prelude::*},
    net::{Shutdown, TcpStream},
    num::NonZeroUsize,
};

/// Read size used when draining a connection.
pub const DEFAULT_CHUNK_SIZE: NonZeroUsize = match NonZeroUsize::new(1024) {
    Some(size) => size,
    None => unreachable!(),
};

/// A single blocking TCP connection, used for exactly one exchange.
///
/// Dropping the connection closes the socket, so every early return closes it too.
#[derive(Debug)]
pub struct Connection {
    stream: TcpStream,
}

impl Connection {
    /// Open a connection to `host:port`.
    ///
    /// Blocks until the operating system connect completes. No timeout is applied.
    ///
    /// # Errors
    ///
    /// Fails when the name cannot be resolved or the peer refuses the connection.
    pub fn connect(host: &str, port: u16) -> io::Result<Self> {
        let addresses = dns::resolve(host, port)?;
        log::debug!("connecting to {host} ({addresses:?})");
        let stream = TcpStream::connect(&addresses[..])?;
        Ok(Self { stream })
    }

    /// Write the whole message to the peer.
    ///
    /// # Errors
    ///
    /// Fails when the peer goes away before every byte is written.
    pub fn send_all(&mut self, message: &[u8]) -> io::Result<()> {
        self.stream.write_all(message)?;
        self.stream.flush()?;
        log::debug!("sent {} bytes", message.len());
        Ok(())
    }

    /// Read until the peer closes the connection and decode what arrived.
    ///
    /// Never returns if the peer keeps the connection open.
    ///
    /// # Errors
    ///
    /// Fails on any read error other than an interrupted read.
    pub fn receive_all(&mut self, chunk_size: NonZeroUsize) -> io::Result<String> {
        let mut buffer = Vec::new();
        let mut chunk = vec![0u8; chunk_size.get()];
        loop {
            match self.stream.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => buffer.extend_from_slice(&chunk[..n]),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        log::debug!("received {} bytes", buffer.len());
        Ok(decode_latin1(&buffer))
    }

    /// Shut the connection down in both directions and release the socket.
    ///
    /// Shutdown errors are logged, never returned.
    pub fn close(self) {
        match self.stream.shutdown(Shutdown::Both) {
            Err(e) if e.kind() != io::ErrorKind::NotConnected => {
                log::debug!("shutting down the connection failed: {e}");
            }
            _ => {}
        }
    }
}

/// Decode bytes as ISO-8859-1: every byte becomes the code point of the same value.
///
/// # Examples
///
/// ```rust
/// # use httpclient::transport::decode_latin1;
/// assert_eq!(decode_latin1(b"caf\xe9"), "café");
/// ```
#[must_use]
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().copied().map(char::from).collect()
}
