#![warn(clippy::all, clippy::pedantic)]
#![deny(unsafe_code)]
#![doc = include_str!("../README.md")]

#[cfg(test)]
mod tests;

mod client;
mod dns;
mod error;
pub mod request;
pub mod response;
pub mod transport;
mod uri;

pub use client::Client;
pub use error::{Error, Result};
pub use request::{FormFields, Method, Request};
pub use response::Response;
pub use uri::ParsedUrl;

/// Send a GET request with the default [`Client`].
///
/// # Errors
///
/// See [`Client::get`].
pub fn get(url: &str) -> Result<Option<Response>> {
    Client::new().get(url)
}

/// Send a POST request with the default [`Client`].
///
/// # Errors
///
/// See [`Client::get`].
pub fn post(url: &str, fields: Option<&FormFields>) -> Result<Option<Response>> {
    Client::new().post(url, fields)
}

/// Dispatch a command verb with the default [`Client`].
///
/// # Errors
///
/// See [`Client::get`].
pub fn command(url: &str, verb: &str, fields: Option<&FormFields>) -> Result<Option<Response>> {
    Client::new().command(url, verb, fields)
}
