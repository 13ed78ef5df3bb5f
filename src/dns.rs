use once_cell::sync::Lazy;
use std::{
    io, iter,
    net::{IpAddr, Ipv4Addr, SocketAddr, ToSocketAddrs, UdpSocket},
    time::{Duration, SystemTime, UNIX_EPOCH},
};

/// How long to wait for a nameserver before trying the next one.
const QUERY_TIMEOUT: Duration = Duration::from_secs(5);

// record type A, class IN
const TYPE_A: u16 = 0x0001;
const CLASS_IN: u16 = 0x0001;

/// Resolve `host:port` to the addresses worth trying, in order.
///
/// The operating system resolver goes first, so hosts files, search domains and
/// IPv6 answers all apply. Only when it has nothing does a hand-built `A` query
/// go out to the configured nameservers.
pub(crate) fn resolve(host: &str, port: u16) -> io::Result<Vec<SocketAddr>> {
    let system_error = match (host, port).to_socket_addrs() {
        Ok(addresses) => {
            let addresses = addresses.collect::<Vec<_>>();
            if !addresses.is_empty() {
                log::debug!("resolved {host} to {addresses:?}");
                return Ok(addresses);
            }
            io::Error::new(io::ErrorKind::NotFound, "no addresses for host")
        }
        Err(e) => e,
    };
    log::debug!("system resolver failed for {host}: {system_error}");

    match query(host) {
        Ok(address) => Ok(vec![SocketAddr::new(IpAddr::V4(address), port)]),
        Err(e) => {
            log::debug!("nameserver lookup failed for {host}: {e}");
            Err(system_error)
        }
    }
}

/// Ask the nameservers from the resolver configuration for the `A` record of `host`.
fn query(host: &str) -> io::Result<Ipv4Addr> {
    let lower = host.to_ascii_lowercase();
    if lower == "localhost" || lower.ends_with(".localhost") {
        return Ok(Ipv4Addr::LOCALHOST);
    }

    let id = query_id();
    let message = encode_query(id, host)?;

    let socket = UdpSocket::bind("0.0.0.0:0")?;
    socket.set_read_timeout(Some(QUERY_TIMEOUT))?;

    let mut last_error = io::Error::new(io::ErrorKind::NotFound, "no nameservers configured");
    for server in NAMESERVERS.iter() {
        match ask(&socket, *server, &message, id) {
            Ok(address) => {
                log::debug!("resolved {host} to {address} via {server}");
                return Ok(address);
            }
            Err(e) => {
                log::debug!("nameserver {server} failed for {host}: {e}");
                last_error = e;
            }
        }
    }

    Err(last_error)
}

fn ask(socket: &UdpSocket, server: SocketAddr, message: &[u8], id: u16) -> io::Result<Ipv4Addr> {
    socket.send_to(message, server)?;

    // plain udp answers are capped at 512 bytes
    let mut buf = vec![0u8; 512];
    let (n, _) = socket.recv_from(&mut buf)?;
    buf.truncate(n);

    parse_answer(id, &buf)
}

/// Build a standard recursive query for the `A` record of `name`.
pub(crate) fn encode_query(id: u16, name: &str) -> io::Result<Vec<u8>> {
    // header: [id, flags, questions, answers, authority, additional]
    let header: [u16; 6] = [id, 0x0100, 0x0001, 0x0000, 0x0000, 0x0000].map(u16::to_be);
    let question: [u16; 2] = [TYPE_A, CLASS_IN].map(u16::to_be);

    let mut message = bytemuck::cast::<[u16; 6], [u8; 12]>(header).to_vec();
    message.extend(encode_name(name)?);
    message.extend(bytemuck::cast_slice::<u16, u8>(&question));
    Ok(message)
}

/// Convert a dotted name to length-prefixed labels (at most 63 bytes each).
///
/// Names must already be ASCII; internationalized names are not converted.
fn encode_name(name: &str) -> io::Result<Vec<u8>> {
    if !name.is_ascii() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{name:?} is not an ascii host name"),
        ));
    }
    let encoded = name
        .split('.')
        .filter(|l| !l.is_empty())
        .flat_map(|l| {
            let label = &l.as_bytes()[..l.len().min(63)];
            let length = u8::try_from(label.len()).unwrap_or(63);
            iter::once(length).chain(label.iter().copied())
        })
        .chain(iter::once(0))
        .collect();
    Ok(encoded)
}

/// Pull the first `A` record out of a nameserver response.
pub(crate) fn parse_answer(id: u16, packet: &[u8]) -> io::Result<Ipv4Addr> {
    let header = packet.get(..12).ok_or_else(|| invalid("truncated header"))?;
    let [answer_id, flags, questions, answers, _, _] =
        bytemuck::pod_read_unaligned::<[u16; 6]>(header).map(u16::from_be);

    if answer_id != id {
        return Err(invalid("response id does not match query"));
    }
    if flags & 0x8000 == 0 {
        return Err(invalid("packet is not a response"));
    }
    match flags & 0x000f {
        0 => {}
        3 => return Err(io::Error::new(io::ErrorKind::NotFound, "no such host")),
        code => return Err(invalid(&format!("nameserver returned rcode {code}"))),
    }

    // skip the echoed questions
    let mut offset = 12;
    for _ in 0..questions {
        offset = skip_name(packet, offset)? + 4;
    }

    for _ in 0..answers {
        offset = skip_name(packet, offset)?;
        let fixed = packet
            .get(offset..offset + 10)
            .ok_or_else(|| invalid("truncated resource record"))?;
        let kind = u16::from_be_bytes([fixed[0], fixed[1]]);
        let class = u16::from_be_bytes([fixed[2], fixed[3]]);
        let length = usize::from(u16::from_be_bytes([fixed[8], fixed[9]]));
        offset += 10;

        let data = packet
            .get(offset..offset + length)
            .ok_or_else(|| invalid("truncated record data"))?;
        if kind == TYPE_A && class == CLASS_IN && length == 4 {
            return Ok(Ipv4Addr::new(data[0], data[1], data[2], data[3]));
        }
        offset += length;
    }

    Err(io::Error::new(
        io::ErrorKind::NotFound,
        "no address record in response",
    ))
}

/// Step over a (possibly compressed) name, returning the offset just past it.
fn skip_name(packet: &[u8], mut offset: usize) -> io::Result<usize> {
    loop {
        let length = *packet
            .get(offset)
            .ok_or_else(|| invalid("truncated name"))?;
        match length {
            0 => return Ok(offset + 1),
            // a pointer always ends the name
            l if l & 0xc0 == 0xc0 => return Ok(offset + 2),
            l => offset += 1 + usize::from(l),
        }
    }
}

fn invalid(message: &str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, message.to_string())
}

#[allow(clippy::cast_possible_truncation)]
fn query_id() -> u16 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.subsec_nanos());
    (nanos ^ std::process::id()) as u16
}

static NAMESERVERS: Lazy<Vec<SocketAddr>> = Lazy::new(|| {
    let fallback = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8)), 53);

    // find name servers (platform-dependent)
    #[cfg(unix)]
    {
        let servers = std::fs::read_to_string("/etc/resolv.conf")
            .map(|resolv| {
                resolv
                    .lines()
                    .filter_map(|l| l.trim().strip_prefix("nameserver"))
                    .filter_map(|s| s.trim().parse::<IpAddr>().ok())
                    .map(|ip| SocketAddr::new(ip, 53))
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        if servers.is_empty() {
            vec![fallback]
        } else {
            servers
        }
    }
    #[cfg(not(unix))]
    {
        // todo: read the windows resolver configuration
        vec![fallback]
    }
});
