//! gcdlab: barrier-synchronized GCD races and pooled primality checks.

use gcdlab_core::error::HarnessError;
use gcdlab_core::exit_codes;
use gcdlab_lib::{app, config, errors};

fn main() {
    let config = config::AppConfig::parse();

    // Initialize tracing
    let default_level = if config.verbose {
        tracing::Level::DEBUG
    } else if config.quiet {
        tracing::Level::WARN
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .init();

    if let Err(e) = app::run(&config) {
        eprintln!("error: {e:#}");
        let code = e
            .downcast_ref::<HarnessError>()
            .map_or(exit_codes::ERROR_GENERIC, errors::exit_code);
        std::process::exit(code);
    }
}
