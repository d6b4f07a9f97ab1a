mod cli;
mod commands;
mod formatting;
mod settings;

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use cli::Commands;
use commands::compile::CompilePaths;
use commands::{run_compile, run_diff};

#[tokio::main]
async fn main() -> ExitCode {
    let args = cli::parse();
    init_tracing(args.verbose);

    match args.command {
        Commands::Compile {
            manifest,
            output,
            cache,
            previous,
            snapshot_out,
            format,
        } => {
            run_compile(
                args.config,
                CompilePaths {
                    manifest,
                    output,
                    cache,
                    previous,
                    snapshot_out,
                },
                format,
            )
            .await
        }
        Commands::Diff {
            manifest,
            previous,
            format,
        } => run_diff(args.config, manifest, previous, format),
    }
}

/// Logs go to stderr so stdout stays a clean report. `RUST_LOG` wins over
/// `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "figrbx=debug,figrbx_lib=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
