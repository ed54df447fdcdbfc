use std::io::{ErrorKind, Write};

use marmdds_transport::DdsStream;
use tracing::{debug, warn};

use crate::codec::FrameConfig;
use crate::error::{transport_to_frame_error, FrameError, Result};

/// Writes complete frames to any `Write` stream.
///
/// A frame is either written in full or the call fails; there is no
/// partial-frame recovery. With a write timeout configured, `WouldBlock` and
/// `TimedOut` from the stream are returned as errors instead of retried.
pub struct FrameWriter<T> {
    inner: T,
    config: FrameConfig,
}

impl<T: Write> FrameWriter<T> {
    /// Create a new frame writer with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new frame writer with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self { inner, config }
    }

    /// Send an encoded frame (blocking).
    pub fn send(&mut self, frame: &[u8]) -> Result<()> {
        if frame.len() > self.config.device_buffer_size {
            warn!(
                frame_size = frame.len(),
                device_buffer = self.config.device_buffer_size,
                "frame exceeds device buffer; device will likely refuse it"
            );
        }

        let mut offset = 0usize;
        while offset < frame.len() {
            match self.inner.write(&frame[offset..]) {
                Ok(0) => return Err(FrameError::ConnectionClosed),
                Ok(n) => offset += n,
                Err(err) if self.should_retry(&err) => continue,
                Err(err) => {
                    debug!(sent = offset, bytes = frame.len(), error = %err, "frame send failed");
                    return Err(FrameError::Io(err));
                }
            }
        }

        self.flush()?;
        debug!(bytes = frame.len(), "frame sent");
        Ok(())
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if self.should_retry(&err) => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
    }

    // A blocking socket reports an expired write timeout as WouldBlock.
    fn should_retry(&self, err: &std::io::Error) -> bool {
        match err.kind() {
            ErrorKind::Interrupted => true,
            ErrorKind::WouldBlock => self.config.write_timeout.is_none(),
            _ => false,
        }
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Current frame writer configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}

impl FrameWriter<DdsStream> {
    /// Create a frame writer for a device stream and apply write timeout from config.
    pub fn with_config_dds(inner: DdsStream, config: FrameConfig) -> Result<Self> {
        inner
            .set_write_timeout(config.write_timeout)
            .map_err(transport_to_frame_error)?;
        Ok(Self::with_config(inner, config))
    }
}
