use std::process::ExitCode;

use staticd::config::{self, Command, Config};
use staticd::server;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = match config::parse_args(std::env::args().skip(1)) {
        Ok(Command::Serve(args)) => args,
        Ok(Command::Help) => {
            println!("{}", config::USAGE);
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    // Requests go to stdout, warnings and errors to stderr.
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr.with_max_level(Level::WARN).or_else(std::io::stdout))
        .init();

    let cfg = match Config::load(args) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("{:#}", e);
            return ExitCode::FAILURE;
        }
    };

    tokio::select! {
        res = server::listener::run(&cfg) => {
            if let Err(e) = res {
                tracing::error!("Server stopped: {:#}", e);
                return ExitCode::FAILURE;
            }
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    ExitCode::SUCCESS
}
