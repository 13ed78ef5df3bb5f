use crate::ParsedUrl;
use std::{collections::BTreeMap, fmt};

/// Form fields sent in a POST body, encoded in name order.
pub type FormFields = BTreeMap<String, String>;

/// An HTTP/1.1 request, rendered to its wire form through [`fmt::Display`].
///
/// # Examples
///
/// A GET request:
/// ```rust
/// # use httpclient::{ParsedUrl, Request};
/// let url = ParsedUrl::parse("http://example.org/index.html?page=2").unwrap();
/// assert_eq!(
///     Request::get(&url).to_string(),
///     "GET /index.html?page=2 HTTP/1.1\r\nHost: example.org\r\nConnection: close\r\n\r\n"
/// );
/// ```
///
/// A POST request with form fields:
/// ```rust
/// # use httpclient::{FormFields, ParsedUrl, Request};
/// let url = ParsedUrl::parse("http://example.org/submit").unwrap();
/// let fields = FormFields::from([("a".to_string(), "b c".to_string())]);
/// assert_eq!(
///     Request::post(&url, Some(&fields)).to_string(),
///     "POST /submit HTTP/1.1\r\nHost: example.org\r\nConnection: close\r\n\
///      Content-Type: application/x-www-form-urlencoded\r\nContent-Length: 7\r\n\r\na=b%20c"
/// );
/// ```
#[must_use]
#[derive(Debug, Clone)]
pub struct Request<'a> {
    /// Where the request goes.
    url: &'a ParsedUrl,
    /// GET or POST.
    method: Method,
    /// Request body, empty for GET.
    body: String,
}

impl<'a> Request<'a> {
    /// Create a new request without a body.
    pub fn new(url: &'a ParsedUrl, method: Method) -> Self {
        Self {
            url,
            method,
            body: String::new(),
        }
    }

    /// Construct a new GET request.
    pub fn get(url: &'a ParsedUrl) -> Self {
        Request::new(url, Method::GET)
    }

    /// Construct a new POST request carrying `fields` as a form body.
    ///
    /// Without fields the body is empty and `Content-Length` is zero.
    pub fn post(url: &'a ParsedUrl, fields: Option<&FormFields>) -> Self {
        let mut request = Request::new(url, Method::POST);
        request.body = fields.map(encode_form).unwrap_or_default();
        request
    }

    /// The URL the request is addressed to.
    #[must_use]
    pub fn url(&self) -> &'a ParsedUrl {
        self.url
    }

    /// The request method.
    #[must_use]
    pub fn method(&self) -> Method {
        self.method
    }

    /// The encoded request body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }
}

impl fmt::Display for Request<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let method = self.method;
        let target = self.url.target();
        let host = &self.url.host;

        // format: Method Request-URI HTTP-Version CRLF headers CRLF CRLF message-body
        write!(f, "{method:?} {target} HTTP/1.1\r\n")?;
        write!(f, "Host: {host}\r\nConnection: close\r\n")?;
        if self.method == Method::POST {
            write!(f, "Content-Type: application/x-www-form-urlencoded\r\n")?;
            write!(f, "Content-Length: {}\r\n", self.body.len())?;
        }
        write!(f, "\r\n{}", self.body)
    }
}

/// HTTP methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[allow(missing_docs)]
pub enum Method {
    GET,
    POST,
}

impl Method {
    /// Pick the method for a command verb: exactly `"POST"` posts, anything else gets.
    #[must_use]
    pub fn from_verb(verb: &str) -> Self {
        if verb == "POST" {
            Method::POST
        } else {
            Method::GET
        }
    }
}

/// Escape the six characters that would break a form body.
///
/// `%` goes first so the escapes added afterwards are not escaped again.
/// Every other character, reserved or not, is written as is.
///
/// # Examples
///
/// ```rust
/// # use httpclient::request::percent_encode;
/// assert_eq!(percent_encode("100% \"ok\""), "100%25%20%22ok%22");
/// assert_eq!(percent_encode("a&b=c"), "a&b=c");
/// ```
#[must_use]
pub fn percent_encode(text: &str) -> String {
    text.replace('%', "%25")
        .replace('\n', "%0A")
        .replace('\r', "%0D")
        .replace(' ', "%20")
        .replace('"', "%22")
        .replace('\'', "%27")
}

/// Join fields as `name=value` pairs separated by `&`.
#[must_use]
pub fn encode_form(fields: &FormFields) -> String {
    fields
        .iter()
        .map(|(name, value)| format!("{}={}", percent_encode(name), percent_encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}
