use std::time::Duration;

use marmdds_frame::{build_frame, DataFormat, FrameConfig, FrameSpec, FrameWriter, ReplyReader};
use marmdds_transport::{DdsStream, TcpTransport};
use tracing::{debug, info, warn};

use crate::cmd::UploadArgs;
use crate::exit::{frame_error, io_error, transport_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_dry_run, print_reply, OutputFormat, UploadSummary};

pub fn run(args: UploadArgs, format: OutputFormat) -> CliResult<i32> {
    let timeout = args.timeout.as_deref().map(parse_duration).transpose()?;
    let spec = FrameSpec {
        format: args.format,
        period: args.period,
        prescaler: args.prescaler,
        mode: args.mode,
    };

    let samples = args.file.data.as_ref();
    if !is_sample_aligned(samples.len(), args.format) {
        warn!(
            bytes = samples.len(),
            format = %args.format,
            sample_width = args.format.sample_width(),
            "sample data is not a whole number of samples"
        );
    }
    let frame = build_frame(samples, &spec).map_err(|err| frame_error("encode failed", err))?;
    let summary = UploadSummary::new(
        format!("{}:{}", args.address, args.port),
        &spec,
        samples.len(),
        frame.len(),
    );
    debug!(
        file = %args.file.path.display(),
        frame_size = frame.len(),
        mode = %spec.mode,
        format = %spec.format,
        "frame encoded"
    );

    if args.dry_run {
        print_dry_run(&mut std::io::stdout().lock(), &frame, &summary, format)
            .map_err(|err| io_error("write output failed", err))?;
        return Ok(SUCCESS);
    }

    let stream = connect(&args.address, args.port, timeout)?;
    info!(
        peer = %stream.peer_addr(),
        transport = TcpTransport::transport_name(),
        bytes = frame.len(),
        "uploading samples"
    );

    let config = FrameConfig {
        read_timeout: timeout,
        write_timeout: timeout,
        ..FrameConfig::default()
    };
    let mut writer = FrameWriter::with_config_dds(stream, config.clone())
        .map_err(|err| frame_error("connect failed", err))?;
    writer
        .send(&frame)
        .map_err(|err| frame_error("send failed", err))?;

    let mut reader = ReplyReader::with_config_dds(writer.into_inner(), config)
        .map_err(|err| frame_error("receive failed", err))?;
    let reply = reader
        .read_reply()
        .map_err(|err| frame_error("receive failed", err))?;
    if reply.is_empty() {
        warn!("device closed the connection without a reply");
    }

    print_reply(&mut std::io::stdout().lock(), &reply, &summary, format)
        .map_err(|err| io_error("write output failed", err))?;
    Ok(SUCCESS)
}

fn connect(address: &str, port: u16, timeout: Option<Duration>) -> CliResult<DdsStream> {
    let result = match timeout {
        Some(timeout) => TcpTransport::connect_timeout(address, port, timeout),
        None => TcpTransport::connect(address, port),
    };
    result.map_err(|err| transport_error("connect failed", err))
}

fn is_sample_aligned(len: usize, format: DataFormat) -> bool {
    len % format.sample_width() == 0
}

fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, millis) = if let Some(num) = input.strip_suffix("ms") {
        (num, true)
    } else if let Some(num) = input.strip_suffix('s') {
        (num, false)
    } else {
        (input, false)
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    Ok(if millis {
        Duration::from_millis(value)
    } else {
        Duration::from_secs(value)
    })
}
