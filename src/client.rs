use crate::{
    request::{FormFields, Method, Request},
    transport::{Connection, DEFAULT_CHUNK_SIZE},
    ParsedUrl, Response, Result,
};
use std::num::NonZeroUsize;

/// Issues one request per call over a fresh connection.
///
/// # Examples
///
/// A URL without a host is skipped rather than sent:
/// ```rust
/// # use httpclient::Client;
/// let client = Client::new().echo(false);
/// assert!(client.get("example.org/index.html").unwrap().is_none());
/// ```
#[must_use]
#[derive(Debug, Clone, Copy)]
pub struct Client {
    /// Size of each read while draining the connection.
    chunk_size: NonZeroUsize,
    /// Print the raw response to standard output before parsing it.
    echo: bool,
}

impl Default for Client {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            echo: true,
        }
    }
}

impl Client {
    /// Create a client that echoes responses and reads 1024 bytes at a time.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how many bytes are read per call while draining a response.
    ///
    /// A size of zero reads one byte at a time.
    pub fn chunk_size(self, size: usize) -> Self {
        let mut client = self;
        client.chunk_size = NonZeroUsize::new(size).unwrap_or(NonZeroUsize::MIN);
        client
    }

    /// Turn printing of the raw response on or off.
    pub fn echo(self, echo: bool) -> Self {
        let mut client = self;
        client.echo = echo;
        client
    }

    /// Dispatch on a command verb. Exactly `"POST"` posts `fields`, any other verb issues a GET.
    ///
    /// # Errors
    ///
    /// See [`Client::get`].
    pub fn command(
        &self,
        url: &str,
        verb: &str,
        fields: Option<&FormFields>,
    ) -> Result<Option<Response>> {
        match Method::from_verb(verb) {
            Method::POST => self.post(url, fields),
            Method::GET => self.get(url),
        }
    }

    /// Send a GET request.
    ///
    /// Returns `Ok(None)` without touching the network when the URL has no host or port.
    ///
    /// # Errors
    ///
    /// Fails on an invalid explicit port, on connection or transfer errors,
    /// and when the response has no numeric status code.
    pub fn get(&self, url: &str) -> Result<Option<Response>> {
        let url = ParsedUrl::parse(url)?;
        self.exchange(&Request::get(&url))
    }

    /// Send a POST request with `fields` as a form body.
    ///
    /// # Errors
    ///
    /// See [`Client::get`].
    pub fn post(&self, url: &str, fields: Option<&FormFields>) -> Result<Option<Response>> {
        let url = ParsedUrl::parse(url)?;
        self.exchange(&Request::post(&url, fields))
    }

    /// Run one request/response exchange on its own connection.
    ///
    /// # Errors
    ///
    /// See [`Client::get`].
    pub fn exchange(&self, request: &Request<'_>) -> Result<Option<Response>> {
        let url = request.url();
        log::debug!("{:?} {url}", request.method());
        if !url.is_resolvable() {
            log::warn!("skipping request, no host or port in {url:?}");
            return Ok(None);
        }

        // format the message
        let message = request.to_string();
        log::trace!("outgoing message:\n{message}");

        // send it and wait for the peer to hang up
        let mut connection = Connection::connect(&url.host, url.port)?;
        connection.send_all(message.as_bytes())?;
        let received = connection.receive_all(self.chunk_size)?;
        connection.close();

        if self.echo {
            println!("{received}");
        }

        // process response
        let response = Response::parse(&received)?;
        log::debug!("status {}", response.code);

        Ok(Some(response))
    }
}
