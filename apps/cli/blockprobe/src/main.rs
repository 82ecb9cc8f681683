use blockprobe::app::execute;
use blockprobe::cli::Cli;
use blockprobe::logger::initialize as LoggerInitialize;

use std::io::stdout;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use log::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let started = Instant::now();
    let cli = Cli::parse();

    if let Err(e) = LoggerInitialize(cli.log_level(), cli.log_dir.as_deref()) {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    info!("blockprobe starting against {}", cli.base_url);

    let mut out = stdout().lock();
    match execute(&cli, started, &mut out).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
