use crate::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

// generic uri splitter: scheme ":" "//" netloc path "?" query "#" fragment
static URI_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?s)^",
        r"(?:(?P<scheme>[A-Za-z][A-Za-z0-9+.\-]*):)?",
        r"(?://(?P<netloc>[^/?#]*))?",
        r"(?P<path>[^?#]*)",
        r"(?:\?(?P<query>[^#]*))?",
        r"(?:#(?P<fragment>.*))?$",
    ))
    .expect("uri regex is valid")
});

/// The parts of a URL needed to open a connection and write a request line.
///
/// # Examples
///
/// ```rust
/// # use httpclient::ParsedUrl;
/// let url = ParsedUrl::parse("http://example.org:8080/search?q=rust#top").unwrap();
/// assert_eq!(url.host, "example.org");
/// assert_eq!(url.port, 8080);
/// assert_eq!(url.target(), "/search?q=rust#top");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedUrl {
    /// Host name or address, without the port.
    pub host: String,
    /// Explicit port, or the scheme default. Zero when neither is known.
    pub port: u16,
    /// Request path, `/` when the URL has none.
    pub path: String,
    /// Empty, or `?` followed by the raw query.
    pub query: String,
    /// Empty, or `#` followed by the raw fragment.
    pub fragment: String,
}

impl ParsedUrl {
    /// Decompose a URL string.
    ///
    /// `http` defaults to port 80 and `https` to port 443. Unknown schemes
    /// leave the port at zero unless the network location names one.
    ///
    /// # Errors
    ///
    /// Fails when the network location is `host:port` and the port is not a
    /// number in `0..=65535`.
    pub fn parse(url: &str) -> Result<Self> {
        // every part of the pattern is optional, so it matches any input
        let parts = URI_REGEX.captures(url);
        let part = |name| {
            parts
                .as_ref()
                .and_then(|p| p.name(name))
                .map_or("", |m| m.as_str())
        };

        let port = default_port(part("scheme"));
        let netloc = part("netloc");
        let (host, port) = match netloc.split(':').collect::<Vec<_>>()[..] {
            [host, port] => (
                host,
                port.parse::<u16>()
                    .map_err(|_| Error::InvalidPort(port.to_string()))?,
            ),
            _ => (netloc, port),
        };

        let path = match part("path") {
            "" => "/".to_string(),
            path => path.to_string(),
        };
        let query = match part("query") {
            "" => String::new(),
            query => format!("?{query}"),
        };
        let fragment = match part("fragment") {
            "" => String::new(),
            fragment => format!("#{fragment}"),
        };

        Ok(Self {
            host: host.to_string(),
            port,
            path,
            query,
            fragment,
        })
    }

    /// Whether there is enough information to open a connection.
    #[must_use]
    pub fn is_resolvable(&self) -> bool {
        !self.host.is_empty() && self.port != 0
    }

    /// The request target: path, query and fragment as written on the request line.
    #[must_use]
    pub fn target(&self) -> String {
        format!("{}{}{}", self.path, self.query, self.fragment)
    }
}

impl fmt::Display for ParsedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}{}", self.host, self.port, self.target())
    }
}

fn default_port(scheme: &str) -> u16 {
    match scheme.to_ascii_lowercase().as_str() {
        "http" => 80,
        // no tls is negotiated, the request goes out as plain text
        "https" => 443,
        _ => 0,
    }
}
