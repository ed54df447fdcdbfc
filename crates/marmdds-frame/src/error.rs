use marmdds_transport::TransportError;

/// Errors that can occur during frame encoding/decoding and transmission.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The frame header does not start with the "MARM" magic.
    #[error("invalid frame magic (expected \"MARM\")")]
    InvalidMagic,

    /// The samples do not fit a frame whose size is a 32-bit field.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// Fewer bytes were supplied than the structure being decoded needs.
    #[error("truncated frame ({available} bytes, need {needed})")]
    Truncated { needed: usize, available: usize },

    /// The header's size field is smaller than the fixed frame overhead.
    #[error("invalid frame size field: {0}")]
    InvalidSize(u32),

    /// A data format name outside `8bit`, `12bit_LEFT`, `12bit_RIGHT`.
    #[error("unknown data format: {0}")]
    UnknownFormat(String),

    /// A mode name outside `independent`, `single_trigger`, `dual`.
    #[error("unknown mode: {0}")]
    UnknownMode(String),

    /// An I/O error occurred while writing the frame or reading the reply.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The device stopped accepting bytes before the whole frame was sent.
    #[error("connection closed (incomplete frame)")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, FrameError>;

pub(crate) fn transport_to_frame_error(err: TransportError) -> FrameError {
    match err {
        TransportError::Io(io) => FrameError::Io(io),
        TransportError::Resolve { source, .. } | TransportError::Connect { source, .. } => {
            FrameError::Io(source)
        }
    }
}
