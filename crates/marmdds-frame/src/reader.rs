use std::io::{ErrorKind, Read};

use bytes::Bytes;
use marmdds_transport::DdsStream;
use tracing::debug;

use crate::codec::FrameConfig;
use crate::error::{transport_to_frame_error, FrameError, Result};

/// Reads the device's reply to an uploaded frame.
///
/// The device answers with a short status string and closes the
/// connection. The reply is not parsed.
pub struct ReplyReader<T> {
    inner: T,
    config: FrameConfig,
}

impl<T: Read> ReplyReader<T> {
    /// Create a new reply reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new reply reader with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self { inner, config }
    }

    /// Perform one read of at most `max_reply_size` bytes (blocking).
    ///
    /// An empty reply (peer closed without writing) is returned as empty
    /// bytes, not as an error.
    pub fn read_reply(&mut self) -> Result<Bytes> {
        let mut buf = vec![0u8; self.config.max_reply_size];
        loop {
            match self.inner.read(&mut buf) {
                Ok(n) => {
                    buf.truncate(n);
                    debug!(bytes = n, "reply received");
                    return Ok(Bytes::from(buf));
                }
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl ReplyReader<DdsStream> {
    /// Create a reply reader for a device stream and apply read timeout from config.
    pub fn with_config_dds(inner: DdsStream, config: FrameConfig) -> Result<Self> {
        inner
            .set_read_timeout(config.read_timeout)
            .map_err(transport_to_frame_error)?;
        Ok(Self::with_config(inner, config))
    }
}
