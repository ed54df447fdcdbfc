//! TCP transport to a MARM DDS device.
//!
//! The device runs a single-connection TCP server on a fixed port. This is
//! the lowest layer of marmdds: it only knows how to open a connection and
//! hand back a [`DdsStream`]. Framing lives in `marmdds-frame`.

pub mod error;
pub mod stream;
pub mod tcp;

pub use error::{Result, TransportError};
pub use stream::DdsStream;
pub use tcp::{TcpTransport, DEFAULT_PORT};
