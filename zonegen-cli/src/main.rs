//! zonegen entry point
//!
//! Reads live Route 53 hosted zones and writes `terraform-aws-modules/route53`
//! configuration plus the plan to import the existing resources.
//!
//! Results go to stdout, logs to stderr.

mod cli;
mod report;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use cli::Cli;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use zonegen_core::{CoreError, GeneratorService};
use zonegen_provider::{Route53Credentials, Route53Provider};

const EXIT_INCOMPLETE: u8 = 1;
const EXIT_USAGE: u8 = 2;
const EXIT_INTERRUPTED: u8 = 130;

fn main() -> ExitCode {
    // clap exits with status 2 on invalid arguments
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to start runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    runtime.block_on(run(cli))
}

/// Logs to stderr; `RUST_LOG` wins over `--verbose`, `RUST_LOG_FORMAT=json` switches format.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let json = std::env::var("RUST_LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .json(),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .without_time()
                    .compact(),
            )
            .init();
    }
}

async fn run(cli: Cli) -> ExitCode {
    let service = match build_service(&cli) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("{e:#}");
            return ExitCode::from(EXIT_USAGE);
        }
    };
    let scope = cli.scope();

    tracing::info!(
        "Writing zone files to {}",
        service.options().zones_dir.display()
    );

    tokio::select! {
        result = service.run(&scope) => match result {
            Ok(summary) => {
                print!("{}", report::render(&summary, &service.options().root_dir()));
                if summary.is_clean() {
                    ExitCode::SUCCESS
                } else {
                    ExitCode::from(EXIT_INCOMPLETE)
                }
            }
            Err(CoreError::Usage(msg)) => {
                tracing::error!("{msg}");
                ExitCode::from(EXIT_USAGE)
            }
            Err(e) => {
                tracing::error!("{e}");
                ExitCode::from(EXIT_INCOMPLETE)
            }
        },
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("Interrupted; files already written are complete");
            ExitCode::from(EXIT_INTERRUPTED)
        }
    }
}

/// Credentials, provider and options; every failure here is a usage error.
fn build_service(cli: &Cli) -> anyhow::Result<GeneratorService> {
    let credentials =
        Route53Credentials::from_env().context("AWS credentials are not configured")?;
    let provider = Route53Provider::builder(credentials)
        .endpoint(cli.endpoint_url.clone())
        .max_retries(cli.max_retries)
        .build()
        .context("Failed to create the Route 53 client")?;

    GeneratorService::new(Arc::new(provider), cli.generator_options())
        .context("Invalid options")
}
