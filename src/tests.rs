use super::*;

#[test]
fn get() {
    let (port, server) =
        common::server(b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\n\r\nhello");

    let response = Client::new()
        .get(&format!("http://127.0.0.1:{port}/greeting?lang=en"))
        .unwrap()
        .unwrap();
    assert_eq!(
        response,
        Response {
            code: 200,
            body: Some("hello".to_string())
        }
    );

    let request = server.join().unwrap();
    assert_eq!(
        request,
        "GET /greeting?lang=en HTTP/1.1\r\nHost: 127.0.0.1\r\nConnection: close\r\n\r\n"
    );
}

#[test]
fn get_not_found() {
    let (port, server) = common::server(b"HTTP/1.1 404 Not Found\r\n\r\n");

    let response = Client::new()
        .echo(false)
        .get(&format!("http://localhost:{port}"))
        .unwrap()
        .unwrap();
    assert_eq!(response.code, 404);
    assert_eq!(response.body, None);

    assert!(server
        .join()
        .unwrap()
        .starts_with("GET / HTTP/1.1\r\nHost: localhost\r\n"));
}

#[test]
fn hosts_file_names_resolve() {
    let (port, server) = common::server(b"HTTP/1.1 200 OK\r\n\r\nfound");
    let host = common::loopback_alias();

    let response = Client::new()
        .echo(false)
        .get(&format!("http://{host}:{port}/"))
        .unwrap()
        .unwrap();
    assert_eq!(response.body.as_deref(), Some("found"));

    let request = server.join().unwrap();
    assert!(request.contains(&format!("\r\nHost: {host}\r\n")));
}

#[test]
fn post() {
    let (port, server) = common::server(b"HTTP/1.1 201 Created\r\n\r\nstored");

    let fields = FormFields::from([
        ("name".to_string(), "Jane Doe".to_string()),
        ("note".to_string(), "100% \"ok\"".to_string()),
    ]);
    let response = Client::new()
        .echo(false)
        .post(&format!("http://127.0.0.1:{port}/form"), Some(&fields))
        .unwrap()
        .unwrap();
    assert_eq!(response.code, 201);
    assert_eq!(response.body.as_deref(), Some("stored"));

    let body = "name=Jane%20Doe&note=100%25%20%22ok%22";
    let request = server.join().unwrap();
    assert!(request.starts_with("POST /form HTTP/1.1\r\nHost: 127.0.0.1\r\n"));
    assert!(request.contains("Content-Type: application/x-www-form-urlencoded\r\n"));
    assert!(request.contains(&format!("Content-Length: {}\r\n", body.len())));
    assert!(request.ends_with(&format!("\r\n\r\n{body}")));
}

#[test]
fn command_routes_on_exact_verb() {
    let (port, server) = common::server(b"HTTP/1.1 200 OK\r\n\r\n");
    let url = format!("http://127.0.0.1:{port}/");
    let client = Client::new().echo(false);
    client.command(&url, "post", None).unwrap();
    assert!(server.join().unwrap().starts_with("GET / "));

    let (port, server) = common::server(b"HTTP/1.1 200 OK\r\n\r\n");
    let url = format!("http://127.0.0.1:{port}/");
    client.command(&url, "POST", None).unwrap();
    let request = server.join().unwrap();
    assert!(request.starts_with("POST / "));
    assert!(request.ends_with("Content-Length: 0\r\n\r\n"));
}

#[test]
fn large_body_is_read_until_close() {
    let mut reply =
        b"HTTP/1.1 200 OK\r\nContent-Type: application/octet-stream\r\n\r\n".to_vec();
    reply.extend(std::iter::repeat(b'x').take(10_000));
    reply.extend(b"\xff\r\nsecond line");
    let (port, server) = common::server(&reply);

    let response = Client::new()
        .echo(false)
        .chunk_size(7)
        .get(&format!("http://127.0.0.1:{port}/blob"))
        .unwrap()
        .unwrap();
    server.join().unwrap();

    // only the first body line survives, every byte decoded to one char
    let body = response.body.unwrap();
    assert_eq!(body.chars().count(), 10_001);
    assert!(body.ends_with('\u{ff}'));
}

#[test]
fn unresolvable_urls_are_skipped() {
    let client = Client::new().echo(false);
    assert!(client.get("example.org/index.html").unwrap().is_none());
    assert!(client.get("ftp://example.org/file").unwrap().is_none());
    assert!(client.post("http:///nohost", None).unwrap().is_none());
    assert!(client.get("http://127.0.0.1:0/").unwrap().is_none());
}

#[test]
fn connection_refused() {
    let port = common::unused_port();
    let result = Client::new().get(&format!("http://127.0.0.1:{port}/"));
    assert!(matches!(result, Err(Error::Io(_))));
}

#[test]
fn malformed_status_line() {
    let (port, server) = common::server(b"SSH-2.0-OpenSSH_9.6\r\n");
    let result = Client::new()
        .echo(false)
        .get(&format!("http://127.0.0.1:{port}/"));
    server.join().unwrap();
    assert!(
        matches!(result, Err(Error::MalformedStatusLine(line)) if line == "SSH-2.0-OpenSSH_9.6")
    );
}

#[test]
fn invalid_port() {
    assert!(matches!(
        Client::new().get("http://127.0.0.1:eighty/"),
        Err(Error::InvalidPort(_))
    ));
}

pub(crate) mod common {
    use std::{
        io::{BufRead, BufReader, Read, Write},
        net, thread,
    };

    /// Serve one connection: read the request, send `reply`, then hang up.
    ///
    /// The join handle yields the request exactly as it was received.
    pub fn server(reply: &[u8]) -> (u16, thread::JoinHandle<String>) {
        let listener = net::TcpListener::bind("127.0.0.1:0").expect("bind loopback");
        let port = listener.local_addr().unwrap().port();
        let reply = reply.to_vec();

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());

            // head, up to and including the blank line
            let mut request = String::new();
            let mut length = 0;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if let Some(value) = line.strip_prefix("Content-Length: ") {
                    length = value.trim().parse().unwrap();
                }
                request.push_str(&line);
                if line == "\r\n" || line.is_empty() {
                    break;
                }
            }

            let mut body = vec![0u8; length];
            reader.read_exact(&mut body).unwrap();
            request.push_str(&String::from_utf8(body).unwrap());

            stream.write_all(&reply).unwrap();
            request
        });

        (port, handle)
    }

    /// A name the hosts file maps to 127.0.0.1, other than `localhost` when there is one.
    pub fn loopback_alias() -> String {
        std::fs::read_to_string("/etc/hosts")
            .unwrap_or_default()
            .lines()
            .filter_map(|l| l.split('#').next())
            .filter_map(|l| l.strip_prefix("127.0.0.1"))
            .filter(|rest| rest.starts_with(char::is_whitespace))
            .flat_map(str::split_whitespace)
            .find(|name| *name != "localhost")
            .unwrap_or("localhost")
            .to_string()
    }

    /// A loopback port with nothing listening on it.
    pub fn unused_port() -> u16 {
        net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port()
    }
}
