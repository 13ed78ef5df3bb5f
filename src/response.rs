use crate::{Error, Result};
use std::fmt;

/// An HTTP response, reduced to its status code and first body line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Status code.
    ///
    /// 100-199: info, 200-299: success, 300-399: redir, 400-499: client error,
    /// 500-599: server error.
    pub code: u16,
    /// First line of the message body, if the response carried one.
    pub body: Option<String>,
}

impl Response {
    /// Parse the raw HTTP response into a structured [`Response`].
    ///
    /// # Errors
    ///
    /// Fails when the status line has no numeric status code.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use httpclient::Response;
    /// let message = "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\n\r\nhello";
    /// let response = Response::parse(message).unwrap();
    /// assert_eq!(response.code, 200);
    /// assert_eq!(response.body.as_deref(), Some("hello"));
    /// ```
    pub fn parse(message: &str) -> Result<Self> {
        let code = status_code(message)?;
        let body = body(message).map(str::to_string);
        Ok(Response { code, body })
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.body {
            Some(body) => write!(f, "{} {body}", self.code),
            None => write!(f, "{}", self.code),
        }
    }
}

/// Read the status code from the first line: `HTTP-Version SP Status-Code SP Reason-Phrase`.
///
/// # Errors
///
/// Fails when the line has no second space-separated token or it is not a number.
pub fn status_code(message: &str) -> Result<u16> {
    let line = message.split("\r\n").next().unwrap_or_default();
    line.split(' ')
        .nth(1)
        .and_then(|code| code.parse().ok())
        .ok_or_else(|| Error::MalformedStatusLine(line.to_string()))
}

/// Collect the header lines: everything after the status line up to the first empty line.
#[must_use]
pub fn headers(message: &str) -> Vec<&str> {
    message
        .split("\r\n")
        .skip(1)
        .take_while(|l| !l.is_empty())
        .collect()
}

/// Find the body: the first line after the status line that is neither empty nor a header.
///
/// Only that single line is returned, the rest of a multi-line body is dropped.
#[must_use]
pub fn body(message: &str) -> Option<&str> {
    let headers = headers(message);
    message
        .split("\r\n")
        .skip(1)
        .find(|l| !l.is_empty() && !headers.contains(l))
}
