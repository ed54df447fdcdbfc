//! Frame encoding for the MARM DDS sample upload protocol.
//!
//! This is the core of marmdds. Every upload is one frame:
//! - A 13-byte header: magic "MARM", reserved word, total frame size, mode
//! - Two 16-byte channel configurations (channel 1 is always disabled)
//! - The raw sample bytes for channel 0
//!
//! All multi-byte fields are little-endian and nothing is padded.

pub mod codec;
pub mod error;
pub mod format;
pub mod reader;
pub mod writer;

pub use codec::{
    build_frame, decode_channel_config, decode_frame, decode_header, encode_channel_config,
    encode_header, frame_size, ChannelConfig, DecodedFrame, FrameConfig, FrameSpec, Header,
    CHANNEL_CONFIG_SIZE, CHANNEL_COUNT, DEFAULT_MAX_REPLY, DEVICE_BUFFER_SIZE, FRAME_OVERHEAD,
    HEADER_SIZE, MAGIC,
};
pub use error::{FrameError, Result};
pub use format::{DataFormat, Mode};
pub use reader::ReplyReader;
pub use writer::FrameWriter;
