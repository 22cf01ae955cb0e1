//! # Fedcall CLI Entry Point
//!
//! The main executable for the `fedcall` tool. This file drives the application lifecycle:
//!
//! 1. **Initialization**: Installs logging and parses command-line arguments using [`cli::Cli`].
//! 2. **Configuration**: Reads `FEDCALL_*` environment variables and applies command-line overrides.
//! 3. **Execution**: Delegates the call to the `Dispatcher` of `fedcall_core`.
//! 4. **Presentation**: Prints the result as JSON and exits non-zero when the retcode is not 0.

mod cli;
mod formatter;

use clap::Parser;
use cli::Cli;
use fedcall_core::{Dispatcher, DispatcherConfig, ResultEnvelope};
use formatter::FormattedString;
use std::process;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    init_tracing();

    let args = Cli::parse();

    let config = match DispatcherConfig::from_env() {
        Ok(config) => args.apply(config),
        Err(err) => {
            eprintln!("{}", FormattedString::from(err));
            process::exit(1);
        }
    };

    let dispatcher = match Dispatcher::from_config(config) {
        Ok(dispatcher) => dispatcher,
        Err(err) => {
            eprintln!("{}", FormattedString::from(err));
            process::exit(1);
        }
    };

    let request = args.to_request();
    let result = dispatcher.dispatch(&request).await;
    let failed = !result.is_success();

    if args.envelope {
        let envelope = ResultEnvelope::from_result(result, Some(request.job_id));
        println!("{}", FormattedString::from(envelope));
    } else {
        println!("{}", FormattedString::from(result));
    }

    if failed {
        process::exit(1);
    }
}

/// Logs go to stderr so stdout only carries the result. Filtered by `FEDCALL_LOG` (default `info`).
fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_env("FEDCALL_LOG").unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
