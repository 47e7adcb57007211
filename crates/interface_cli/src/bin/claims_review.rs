//! Claims Review - Operator CLI
//!
//! # Usage
//!
//! ```bash
//! CLAIMS_ACCESS_TOKEN=... claims-review show CLM-1
//! CLAIMS_ACCESS_TOKEN=... claims-review review CLM-1 doc1 reject blurry image
//! ```
//!
//! Output is JSON on stdout; logs go to stderr. Run `claims-review help` for
//! the full command and environment reference.

use anyhow::Context;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use core_kernel::Session;
use infra_http::ServiceConfig;
use interface_cli::{Command, ErrorResponse, ReviewApp, USAGE};

const ACCESS_TOKEN_VAR: &str = "CLAIMS_ACCESS_TOKEN";

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    let command = match Command::parse(std::env::args().skip(1)) {
        Ok(Command::Help) => {
            println!("{}", USAGE);
            return Ok(ExitCode::SUCCESS);
        }
        Ok(command) => command,
        Err(err) => {
            eprintln!("error: {}\n\n{}", err, USAGE);
            return Ok(ExitCode::from(err.exit_code() as u8));
        }
    };

    let config = ServiceConfig::load().context("Failed to load configuration")?;
    init_tracing(&config.log_level);

    let session = load_session()?;
    tracing::debug!(
        api_base_url = %config.api_base_url,
        signed_in = session.is_some(),
        "Starting claims review"
    );

    let app = ReviewApp::from_config(&config, session)?;

    match app.run(command).await {
        Ok(output) => {
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            tracing::warn!(error = %err, "Command failed");
            println!("{}", serde_json::to_string_pretty(&ErrorResponse::from(&err))?);
            Ok(ExitCode::from(err.exit_code() as u8))
        }
    }
}

/// Builds the session from the access token, if one is set.
///
/// A missing token is not an error here; commands that need one fail with
/// an auth error before any request.
fn load_session() -> anyhow::Result<Option<Session>> {
    match std::env::var(ACCESS_TOKEN_VAR) {
        Ok(token) if !token.trim().is_empty() => {
            let session = Session::from_access_token(token.trim())
                .with_context(|| format!("{} is not a valid access token", ACCESS_TOKEN_VAR))?;
            Ok(Some(session))
        }
        _ => Ok(None),
    }
}

/// Initializes logging to stderr
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .init();
}

