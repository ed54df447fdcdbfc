use std::path::PathBuf;

use bytes::Bytes;
use clap::builder::{PossibleValuesParser, TypedValueParser};
use clap::Args;
use marmdds_frame::{DataFormat, Mode};
use marmdds_transport::DEFAULT_PORT;

pub mod upload;

#[derive(Args, Debug)]
pub struct UploadArgs {
    /// IP address or host name of the MARM DDS device.
    pub address: String,

    /// File with samples (sent verbatim).
    #[arg(value_parser = SampleFile::load)]
    pub file: SampleFile,

    /// DDS mode.
    #[arg(
        long,
        default_value = "single_trigger",
        value_parser = PossibleValuesParser::new(Mode::NAMES).try_map(|name| name.parse::<Mode>())
    )]
    pub mode: Mode,

    /// Samples format.
    #[arg(
        long,
        default_value = "8bit",
        value_parser = PossibleValuesParser::new(DataFormat::NAMES)
            .try_map(|name| name.parse::<DataFormat>())
    )]
    pub format: DataFormat,

    /// DAC timer period.
    #[arg(long, default_value_t = 1)]
    pub period: u32,

    /// DAC timer prescaler.
    #[arg(long, default_value_t = 1)]
    pub prescaler: u16,

    /// Device TCP port.
    #[arg(long, env = "MARMDDS_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Connect/send/receive timeout (e.g. 5s, 500ms). Blocks indefinitely when unset.
    #[arg(long, env = "MARMDDS_TIMEOUT")]
    pub timeout: Option<String>,

    /// Encode the frame and print it instead of sending it.
    #[arg(long)]
    pub dry_run: bool,
}

/// Sample file contents, read while arguments are parsed so an unreadable
/// file is reported before any network activity.
#[derive(Debug, Clone)]
pub struct SampleFile {
    pub path: PathBuf,
    pub data: Bytes,
}

impl SampleFile {
    fn load(path: &str) -> Result<Self, String> {
        let data = std::fs::read(path).map_err(|err| format!("can't open '{path}': {err}"))?;
        Ok(Self {
            path: PathBuf::from(path),
            data: Bytes::from(data),
        })
    }
}
