mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::UploadArgs;
use crate::logging::{init_logging, LoggingArgs};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "marmdds", version, about = "MARM_DDS client.")]
struct Cli {
    #[command(flatten)]
    upload: UploadArgs,

    /// How to print the device reply.
    #[arg(long, value_name = "FORMAT", default_value = "raw")]
    output: OutputFormat,

    #[command(flatten)]
    logging: LoggingArgs,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.logging);

    match cmd::upload::run(cli.upload, cli.output) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}
