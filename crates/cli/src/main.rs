//! Salon CLI - account and session front end for the salon API.
//!
//! # Usage
//!
//! ```bash
//! # Show session status
//! salon status
//!
//! # List services
//! salon services
//!
//! # Create an account
//! salon register --nom Martin --prenom Léa -e lea@example.fr
//!
//! # Interactive session (login, reservations, profile, ...)
//! salon shell
//! ```
//!
//! # Commands
//!
//! - `status` - Run the authentication check
//! - `services` - List active services by category
//! - `register` - Create a client account
//! - `forgot-password`, `verify-reset-token`, `reset-password` - Password reset flow
//! - `verify-email` - Confirm an email address
//! - `shell` - Interactive loop keeping the session cookie

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use salon_client::{AppState, ClientConfig};

mod commands;
mod error;
mod prompt;
mod views;

use commands::account::RegisterArgs;
use error::CliError;

#[derive(Parser)]
#[command(name = "salon")]
#[command(version, about = "Salon client account tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show whether a client is logged in
    Status,
    /// List the salon's services
    Services,
    /// Create a client account
    Register(RegisterArgs),
    /// Send a password reset email
    ForgotPassword {
        /// Account email address
        email: String,
    },
    /// Check a password reset token
    VerifyResetToken {
        /// Token from the reset email
        token: String,
    },
    /// Set a new password with a reset token
    ResetPassword {
        /// Token from the reset email
        token: String,
    },
    /// Confirm an email address
    VerifyEmail {
        /// Token from the verification email
        token: String,
    },
    /// Interactive shell keeping one session
    Shell,
}

/// Initialize Sentry error tracking.
///
/// Returns a guard that must be kept alive for the duration of the program.
fn init_sentry(config: &ClientConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Warnings and errors become Sentry events, info and debug become
/// breadcrumbs.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "salon_client=info,salon_cli=info".into());

    // Logs go to stderr; stdout carries command output
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = ClientConfig::from_env();
    let sentry_guard = config.as_ref().ok().and_then(init_sentry);
    init_tracing();

    let result = match config {
        Ok(config) => run(cli, config).await,
        Err(e) => Err(salon_client::Error::from(e).into()),
    };

    if let Err(e) = result {
        if !matches!(e, CliError::Rejected) {
            tracing::error!("Command failed: {e}");
        }
        // Flush pending Sentry events before exiting
        drop(sentry_guard);
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: ClientConfig) -> Result<(), CliError> {
    let state = AppState::new(config)?;
    let session = state.session();
    let mut out = std::io::stdout();

    match cli.command {
        Commands::Status => commands::account::status(session, &mut out).await?,
        Commands::Services => commands::catalog::services(state.catalog(), false, &mut out).await?,
        Commands::Register(args) => commands::account::register(session, args, &mut out).await?,
        Commands::ForgotPassword { email } => {
            commands::account::forgot_password(session, &email, &mut out).await?;
        }
        Commands::VerifyResetToken { token } => {
            commands::account::verify_reset_token(session, &token, &mut out).await?;
        }
        Commands::ResetPassword { token } => {
            commands::account::reset_password(session, &token, &mut out).await?;
        }
        Commands::VerifyEmail { token } => {
            commands::account::verify_email(session, &token, &mut out).await?;
        }
        Commands::Shell => commands::shell::run(session, state.catalog(), &mut out).await?,
    }
    Ok(())
}
