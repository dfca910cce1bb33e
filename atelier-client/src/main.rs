//! atelier command-line entry point

use atelier_client::cli::Args;
use atelier_client::commands;
use atelier_utils::logging::{init_logging_with_config, LogConfig};

#[tokio::main]
async fn main() {
    let args = Args::parse_args();

    let log_config = if args.verbose {
        LogConfig::development()
    } else {
        LogConfig::client()
    };
    if let Err(e) = init_logging_with_config(log_config) {
        eprintln!("warning: {}", e);
    }

    if let Err(e) = commands::run(args).await {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
