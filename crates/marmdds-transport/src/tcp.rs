use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use tracing::debug;

use crate::error::{Result, TransportError};
use crate::stream::DdsStream;

/// Port the device firmware listens on.
pub const DEFAULT_PORT: u16 = 1234;

/// TCP transport to a device.
///
/// Stateless: each call opens a fresh connection. The firmware accepts only
/// one active connection at a time and resets its playback on accept.
pub struct TcpTransport;

impl TcpTransport {
    /// Connect to a device (blocking until the OS resolves the attempt).
    ///
    /// `address` may be an IP literal or a host name; every resolved address
    /// is tried in order.
    pub fn connect(address: &str, port: u16) -> Result<DdsStream> {
        Self::connect_inner(address, port, None)
    }

    /// Connect to a device, giving up on each resolved address after `timeout`.
    pub fn connect_timeout(address: &str, port: u16, timeout: Duration) -> Result<DdsStream> {
        Self::connect_inner(address, port, Some(timeout))
    }

    fn connect_inner(address: &str, port: u16, timeout: Option<Duration>) -> Result<DdsStream> {
        let candidates = resolve(address, port)?;

        let mut last_err = None;
        for addr in candidates {
            let attempt = match timeout {
                Some(timeout) => TcpStream::connect_timeout(&addr, timeout),
                None => TcpStream::connect(addr),
            };
            match attempt {
                Ok(stream) => {
                    debug!(%addr, "connected to device");
                    return Ok(DdsStream::from_tcp(stream, addr));
                }
                Err(err) => {
                    debug!(%addr, error = %err, "connect attempt failed");
                    last_err = Some(err);
                }
            }
        }

        Err(TransportError::Connect {
            address: display_address(address, port),
            source: last_err.unwrap_or_else(|| {
                std::io::Error::new(
                    std::io::ErrorKind::AddrNotAvailable,
                    "address resolved to no socket addresses",
                )
            }),
        })
    }

    /// Transport name for diagnostics.
    pub fn transport_name() -> &'static str {
        "tcp"
    }
}

fn resolve(address: &str, port: u16) -> Result<Vec<SocketAddr>> {
    (address, port)
        .to_socket_addrs()
        .map(Iterator::collect)
        .map_err(|source| TransportError::Resolve {
            address: display_address(address, port),
            source,
        })
}

fn display_address(address: &str, port: u16) -> String {
    if address.contains(':') {
        format!("[{address}]:{port}")
    } else {
        format!("{address}:{port}")
    }
}
