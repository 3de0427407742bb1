//! Server entry point: config, logging, then serve.

use std::process::ExitCode;

use log::error;
use portfolio_core::init_logging;
use portfolio_server::config::Config;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match Config::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("portfolio-server: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = init_logging(&config.log_level, config.log_dir.as_deref()) {
        eprintln!("portfolio-server: {err}");
        return ExitCode::FAILURE;
    }

    match portfolio_server::run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(
                "event=server_exit module=http status=error error_code={} error={err}",
                err.code()
            );
            ExitCode::FAILURE
        }
    }
}
