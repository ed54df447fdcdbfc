use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{FrameError, Result};
use crate::format::{DataFormat, Mode};

/// Magic bytes: "MARM".
pub const MAGIC: [u8; 4] = *b"MARM";

/// Header: magic (4) + reserved (4) + size (4) + mode (1) = 13 bytes.
pub const HEADER_SIZE: usize = 13;

/// Channel config: enabled (1) + format (1) + offset (4) + size (4) + period (4) + prescaler (2) = 16 bytes.
pub const CHANNEL_CONFIG_SIZE: usize = 16;

/// Every frame carries exactly this many channel configs.
pub const CHANNEL_COUNT: usize = 2;

/// Bytes in a frame before the first sample (45).
pub const FRAME_OVERHEAD: usize = HEADER_SIZE + CHANNEL_COUNT * CHANNEL_CONFIG_SIZE;

/// Receive buffer of the device firmware. Larger frames are refused by the
/// device with "no enough memory".
pub const DEVICE_BUFFER_SIZE: usize = 1024;

/// Default bound on the single reply read.
pub const DEFAULT_MAX_REPLY: usize = 128;

/// Decoded frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Always zero when encoded by this crate.
    pub reserved: u32,
    /// Total frame length in bytes.
    pub size: u32,
    /// Device mode byte.
    pub mode: u8,
}

/// Playback configuration for one DAC channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChannelConfig {
    pub enabled: bool,
    /// [`DataFormat`] index.
    pub format: u8,
    /// Start of this channel's samples, relative to the sample region.
    pub offset: u32,
    /// Length of this channel's samples in bytes.
    pub size: u32,
    pub period: u32,
    pub prescaler: u16,
}

impl ChannelConfig {
    /// A channel the device leaves idle (all fields zero).
    pub const fn disabled() -> Self {
        Self {
            enabled: false,
            format: 0,
            offset: 0,
            size: 0,
            period: 0,
            prescaler: 0,
        }
    }

    /// An enabled channel playing `size` bytes starting at `offset`.
    pub fn enabled(format: DataFormat, offset: u32, size: u32, period: u32, prescaler: u16) -> Self {
        Self {
            enabled: true,
            format: format.index(),
            offset,
            size,
            period,
            prescaler,
        }
    }
}

/// Parameters for [`build_frame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSpec {
    pub format: DataFormat,
    pub period: u32,
    pub prescaler: u16,
    pub mode: Mode,
}

impl Default for FrameSpec {
    fn default() -> Self {
        Self {
            format: DataFormat::default(),
            period: 1,
            prescaler: 1,
            mode: Mode::default(),
        }
    }
}

/// A frame split back into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedFrame {
    pub header: Header,
    pub channels: [ChannelConfig; CHANNEL_COUNT],
    pub samples: Bytes,
}

impl DecodedFrame {
    /// The total wire size of this frame (overhead + samples).
    pub fn wire_size(&self) -> usize {
        FRAME_OVERHEAD + self.samples.len()
    }
}

/// Encode a frame header.
///
/// No validation: the caller guarantees `total_size` is the real frame
/// length and `mode` is a code the device understands.
pub fn encode_header(mode: u8, total_size: u32) -> [u8; HEADER_SIZE] {
    let mut out = [0u8; HEADER_SIZE];
    let mut dst = &mut out[..];
    dst.put_slice(&MAGIC);
    dst.put_u32_le(0);
    dst.put_u32_le(total_size);
    dst.put_u8(mode);
    out
}

/// Encode one channel configuration record.
pub fn encode_channel_config(config: &ChannelConfig) -> [u8; CHANNEL_CONFIG_SIZE] {
    let mut out = [0u8; CHANNEL_CONFIG_SIZE];
    let mut dst = &mut out[..];
    dst.put_u8(u8::from(config.enabled));
    dst.put_u8(config.format);
    dst.put_u32_le(config.offset);
    dst.put_u32_le(config.size);
    dst.put_u32_le(config.period);
    dst.put_u16_le(config.prescaler);
    out
}

/// Total frame size for `sample_len` bytes of samples.
pub fn frame_size(sample_len: usize) -> Result<u32> {
    let max = u32::MAX as usize - FRAME_OVERHEAD;
    if sample_len > max {
        return Err(FrameError::PayloadTooLarge {
            size: sample_len,
            max,
        });
    }
    Ok((FRAME_OVERHEAD + sample_len) as u32)
}

/// Build a complete upload frame.
///
/// Wire format:
/// ```text
/// ┌────────────────────────────────┬──────────────┬──────────────┬──────────┐
/// │ Header (13B)                   │ Channel 0    │ Channel 1    │ Samples  │
/// │ "MARM" | 0 | size | mode       │ (16B, on)    │ (16B, zero)  │          │
/// └────────────────────────────────┴──────────────┴──────────────┴──────────┘
/// ```
///
/// Channel 0 plays all samples from offset 0; channel 1 is disabled. The
/// output depends only on the inputs.
pub fn build_frame(samples: &[u8], spec: &FrameSpec) -> Result<Bytes> {
    let total = frame_size(samples.len())?;
    let channels = [
        ChannelConfig::enabled(
            spec.format,
            0,
            samples.len() as u32,
            spec.period,
            spec.prescaler,
        ),
        ChannelConfig::disabled(),
    ];

    let mut dst = BytesMut::with_capacity(total as usize);
    dst.put_slice(&encode_header(spec.mode.code(), total));
    for channel in &channels {
        dst.put_slice(&encode_channel_config(channel));
    }
    dst.put_slice(samples);
    Ok(dst.freeze())
}

/// Decode a frame header, verifying the magic.
pub fn decode_header(src: &[u8]) -> Result<Header> {
    ensure_len(src, HEADER_SIZE)?;
    if src[..MAGIC.len()] != MAGIC {
        return Err(FrameError::InvalidMagic);
    }

    let mut buf = &src[MAGIC.len()..HEADER_SIZE];
    Ok(Header {
        reserved: buf.get_u32_le(),
        size: buf.get_u32_le(),
        mode: buf.get_u8(),
    })
}

/// Decode one channel configuration record.
pub fn decode_channel_config(src: &[u8]) -> Result<ChannelConfig> {
    ensure_len(src, CHANNEL_CONFIG_SIZE)?;

    let mut buf = &src[..CHANNEL_CONFIG_SIZE];
    Ok(ChannelConfig {
        enabled: buf.get_u8() != 0,
        format: buf.get_u8(),
        offset: buf.get_u32_le(),
        size: buf.get_u32_le(),
        period: buf.get_u32_le(),
        prescaler: buf.get_u16_le(),
    })
}

/// Decode a whole frame.
///
/// Like the device, this trusts the header's size field: bytes past it are
/// ignored and a shorter buffer is reported as truncated.
pub fn decode_frame(src: &[u8]) -> Result<DecodedFrame> {
    let header = decode_header(src)?;
    let size = header.size as usize;
    if size < FRAME_OVERHEAD {
        return Err(FrameError::InvalidSize(header.size));
    }
    ensure_len(src, size)?;

    let mut channels = [ChannelConfig::disabled(); CHANNEL_COUNT];
    for (idx, channel) in channels.iter_mut().enumerate() {
        let start = HEADER_SIZE + idx * CHANNEL_CONFIG_SIZE;
        *channel = decode_channel_config(&src[start..])?;
    }

    Ok(DecodedFrame {
        header,
        channels,
        samples: Bytes::copy_from_slice(&src[FRAME_OVERHEAD..size]),
    })
}

fn ensure_len(src: &[u8], needed: usize) -> Result<()> {
    if src.len() < needed {
        return Err(FrameError::Truncated {
            needed,
            available: src.len(),
        });
    }
    Ok(())
}

/// Configuration for sending a frame and reading the reply.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Upper bound of the single reply read. Default: 128 bytes.
    pub max_reply_size: usize,
    /// Frames larger than this are logged as likely to be refused.
    pub device_buffer_size: usize,
    /// Read timeout for blocking operations.
    pub read_timeout: Option<std::time::Duration>,
    /// Write timeout for blocking operations.
    pub write_timeout: Option<std::time::Duration>,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_reply_size: DEFAULT_MAX_REPLY,
            device_buffer_size: DEVICE_BUFFER_SIZE,
            read_timeout: None,
            write_timeout: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: [u8; 4] = [0x01, 0x02, 0x03, 0x04];

    #[test]
    fn test_layout_constants() {
        assert_eq!(HEADER_SIZE, 13);
        assert_eq!(CHANNEL_CONFIG_SIZE, 16);
        assert_eq!(FRAME_OVERHEAD, 45);
    }

    #[test]
    fn test_encode_header_bytes() {
        let header = encode_header(1, 49);
        assert_eq!(
            header,
            [
                0x4D, 0x41, 0x52, 0x4D, // "MARM"
                0x00, 0x00, 0x00, 0x00, // reserved
                0x31, 0x00, 0x00, 0x00, // size = 49
                0x01, // mode
            ]
        );
    }

    #[test]
    fn test_encode_channel_config_bytes() {
        let config = ChannelConfig::enabled(DataFormat::Bits12Right, 0x10, 0x0200, 0x0304_0506, 0x0708);
        assert_eq!(
            encode_channel_config(&config),
            [
                0x01, 0x02, // enabled, format
                0x10, 0x00, 0x00, 0x00, // offset
                0x00, 0x02, 0x00, 0x00, // size
                0x06, 0x05, 0x04, 0x03, // period
                0x08, 0x07, // prescaler
            ]
        );
    }

    #[test]
    fn test_disabled_channel_is_all_zero() {
        assert_eq!(ChannelConfig::disabled(), ChannelConfig::default());
        assert_eq!(
            encode_channel_config(&ChannelConfig::disabled()),
            [0u8; CHANNEL_CONFIG_SIZE]
        );
    }

    #[test]
    fn test_build_frame_reference_bytes() {
        let frame = build_frame(&SAMPLES, &FrameSpec::default()).unwrap();

        let mut expected = vec![
            0x4D, 0x41, 0x52, 0x4D, 0x00, 0x00, 0x00, 0x00, 0x31, 0x00, 0x00, 0x00, 0x01,
        ];
        expected.extend_from_slice(&[
            0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x04, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00,
            0x01, 0x00,
        ]);
        expected.extend_from_slice(&[0u8; CHANNEL_CONFIG_SIZE]);
        expected.extend_from_slice(&SAMPLES);

        assert_eq!(frame.len(), 49);
        assert_eq!(frame.as_ref(), expected.as_slice());
    }

    #[test]
    fn test_size_field_matches_length() {
        for len in [0usize, 1, 4, 977, 4096] {
            let samples = vec![0xA5; len];
            let frame = build_frame(&samples, &FrameSpec::default()).unwrap();
            assert_eq!(frame.len(), 13 + 16 + 16 + len);

            let size = u32::from_le_bytes([frame[8], frame[9], frame[10], frame[11]]);
            assert_eq!(size as usize, frame.len());
        }
    }

    #[test]
    fn test_decoded_header_fields() {
        let frame = build_frame(&SAMPLES, &FrameSpec::default()).unwrap();
        let header = decode_header(&frame).unwrap();

        assert_eq!(&frame[..4], b"MARM");
        assert_eq!(header.reserved, 0);
        assert_eq!(header.mode, 1);
        assert_eq!(header.size as usize, frame.len());
    }

    #[test]
    fn test_channels_decode_as_expected() {
        let spec = FrameSpec {
            format: DataFormat::Bits12Left,
            period: 250,
            prescaler: 83,
            ..FrameSpec::default()
        };
        let samples = vec![0x0F; 64];
        let decoded = decode_frame(&build_frame(&samples, &spec).unwrap()).unwrap();

        let ch0 = decoded.channels[0];
        assert!(ch0.enabled);
        assert_eq!(ch0.format, 1);
        assert_eq!(ch0.offset, 0);
        assert_eq!(ch0.size, 64);
        assert_eq!(ch0.period, 250);
        assert_eq!(ch0.prescaler, 83);

        assert_eq!(decoded.channels[1], ChannelConfig::disabled());
        assert_eq!(decoded.samples.as_ref(), samples.as_slice());
        assert_eq!(decoded.wire_size(), 45 + 64);
    }

    #[test]
    fn test_format_index_in_channel_zero() {
        for format in DataFormat::ALL {
            let spec = FrameSpec {
                format,
                ..FrameSpec::default()
            };
            let frame = build_frame(&SAMPLES, &spec).unwrap();
            let ch0 = decode_channel_config(&frame[HEADER_SIZE..]).unwrap();
            let expected = DataFormat::NAMES
                .iter()
                .position(|name| *name == format.name())
                .unwrap();
            assert_eq!(usize::from(ch0.format), expected);
        }
    }

    #[test]
    fn test_mode_byte_follows_selection() {
        for mode in Mode::ALL {
            let spec = FrameSpec {
                mode,
                ..FrameSpec::default()
            };
            let frame = build_frame(&SAMPLES, &spec).unwrap();
            assert_eq!(frame[HEADER_SIZE - 1], mode.code());
        }
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let spec = FrameSpec {
            period: 9,
            prescaler: 3,
            ..FrameSpec::default()
        };
        let a = build_frame(b"waveform", &spec).unwrap();
        let b = build_frame(b"waveform", &spec).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_samples() {
        let frame = build_frame(&[], &FrameSpec::default()).unwrap();
        assert_eq!(frame.len(), FRAME_OVERHEAD);

        let decoded = decode_frame(&frame).unwrap();
        assert!(decoded.channels[0].enabled);
        assert_eq!(decoded.channels[0].size, 0);
        assert!(decoded.samples.is_empty());
    }

    #[test]
    fn test_frame_size_limit() {
        let max = u32::MAX as usize - FRAME_OVERHEAD;
        assert_eq!(frame_size(max).unwrap(), u32::MAX);
        assert!(matches!(
            frame_size(max + 1),
            Err(FrameError::PayloadTooLarge { .. })
        ));
    }

    #[test]
    fn test_decode_invalid_magic() {
        let mut frame = build_frame(&SAMPLES, &FrameSpec::default()).unwrap().to_vec();
        frame[3] = b'X';
        assert!(matches!(decode_header(&frame), Err(FrameError::InvalidMagic)));
    }

    #[test]
    fn test_decode_truncated() {
        let frame = build_frame(&SAMPLES, &FrameSpec::default()).unwrap();

        assert!(matches!(
            decode_header(&frame[..10]),
            Err(FrameError::Truncated {
                needed: HEADER_SIZE,
                available: 10
            })
        ));
        assert!(matches!(
            decode_frame(&frame[..frame.len() - 1]),
            Err(FrameError::Truncated { .. })
        ));
    }

    #[test]
    fn test_decode_ignores_trailing_bytes() {
        let mut wire = build_frame(&SAMPLES, &FrameSpec::default()).unwrap().to_vec();
        wire.extend_from_slice(b"junk");

        let decoded = decode_frame(&wire).unwrap();
        assert_eq!(decoded.samples.as_ref(), &SAMPLES);
    }

    #[test]
    fn test_decode_size_below_overhead() {
        let mut wire = encode_header(1, 20).to_vec();
        wire.extend_from_slice(&[0u8; 2 * CHANNEL_CONFIG_SIZE]);
        assert!(matches!(decode_frame(&wire), Err(FrameError::InvalidSize(20))));
    }

    #[test]
    fn test_frame_config_defaults() {
        let cfg = FrameConfig::default();
        assert_eq!(cfg.max_reply_size, 128);
        assert_eq!(cfg.device_buffer_size, 1024);
        assert!(cfg.read_timeout.is_none());
        assert!(cfg.write_timeout.is_none());
    }
}
