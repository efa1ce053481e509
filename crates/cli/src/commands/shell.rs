//! Interactive shell.
//!
//! The API keeps the session in a cookie, which only lives as long as the
//! process. The shell keeps one session store alive across lines so `login`
//! followed by `reservations` works. Each line is parsed with clap.

use std::io::Write;

use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use salon_client::{SalonApi, ServiceCatalog, SessionStore};

use super::account::{self, ProfileArgs};
use super::catalog;
use crate::error::CliError;
use crate::{prompt, views};

#[derive(Debug, Parser)]
#[command(name = "salon>", no_binary_name = true, disable_version_flag = true)]
struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

#[derive(Debug, Subcommand)]
enum ShellCommand {
    /// Log in (the password is prompted for)
    Login {
        /// Email address
        email: String,
    },
    /// Log out
    Logout,
    /// Show who is logged in
    Whoami,
    /// Ask the API again who is logged in
    Refresh,
    /// Update profile fields
    Profile(ProfileArgs),
    /// Change password
    Password,
    /// List your reservations
    Reservations,
    /// List the salon's services
    Services {
        /// Drop the cached listing first
        #[arg(long)]
        refresh: bool,
    },
    /// Confirm an email address
    VerifyEmail {
        /// Token from the verification email
        token: String,
    },
    /// Leave the shell
    #[command(alias = "exit")]
    Quit,
}

enum Flow {
    Continue,
    Quit,
}

/// Run the shell on stdin until `quit` or end of input.
pub async fn run<A: SalonApi>(
    session: &SessionStore<A>,
    catalog: &ServiceCatalog<A>,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    account::status(session, out).await?;

    loop {
        prompt::shell_prompt()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = match parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(LineError::Words(err)) => {
                writeln!(out, "✘ {err}")?;
                continue;
            }
            Err(LineError::Clap(err)) => {
                write!(out, "{}", err.render())?;
                continue;
            }
        };

        match execute(session, catalog, command, out).await {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            // The outcome was already rendered
            Err(CliError::Rejected) => {}
            Err(err @ (CliError::Signup(_) | CliError::Api(_))) => {
                writeln!(out, "✘ {err}")?;
            }
            Err(err) => return Err(err),
        }
        out.flush()?;
    }

    debug!("Shell closed");
    Ok(())
}

enum LineError {
    Words(CliError),
    Clap(clap::Error),
}

fn parse_line(line: &str) -> Result<Option<ShellCommand>, LineError> {
    let words = prompt::split_words(line).map_err(LineError::Words)?;
    if words.is_empty() {
        return Ok(None);
    }
    ShellLine::try_parse_from(words)
        .map(|parsed| Some(parsed.command))
        .map_err(LineError::Clap)
}

async fn execute<A: SalonApi>(
    session: &SessionStore<A>,
    catalog: &ServiceCatalog<A>,
    command: ShellCommand,
    out: &mut impl Write,
) -> Result<Flow, CliError> {
    match command {
        ShellCommand::Login { email } => account::login(session, &email, out).await?,
        ShellCommand::Logout => account::logout(session, out).await?,
        ShellCommand::Whoami => views::session(out, &session.snapshot())?,
        ShellCommand::Refresh => account::status(session, out).await?,
        ShellCommand::Profile(args) => account::update_profile(session, args, out).await?,
        ShellCommand::Password => account::change_password(session, out).await?,
        ShellCommand::Reservations => account::reservations(session, out).await?,
        ShellCommand::Services { refresh } => catalog::services(catalog, refresh, out).await?,
        ShellCommand::VerifyEmail { token } => account::verify_email(session, &token, out).await?,
        ShellCommand::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Option<ShellCommand> {
        match parse_line(line) {
            Ok(command) => command,
            Err(_) => panic!("failed to parse {line:?}"),
        }
    }

    #[test]
    fn test_blank_line_is_skipped() {
        assert!(parse("   ").is_none());
    }

    #[test]
    fn test_login_line() {
        assert!(matches!(
            parse("login lea@salon.fr"),
            Some(ShellCommand::Login { email }) if email == "lea@salon.fr"
        ));
    }

    #[test]
    fn test_profile_line_with_quotes() {
        let Some(ShellCommand::Profile(args)) =
            parse(r#"profile --adresse "3 rue des Lilas" --telephone 0611223344"#)
        else {
            panic!("expected profile command");
        };
        assert_eq!(args.adresse.as_deref(), Some("3 rue des Lilas"));
        assert_eq!(args.telephone.as_deref(), Some("0611223344"));
        assert!(args.nom.is_none());
    }

    #[test]
    fn test_exit_alias_and_kebab_case() {
        assert!(matches!(parse("exit"), Some(ShellCommand::Quit)));
        assert!(matches!(
            parse("verify-email abc"),
            Some(ShellCommand::VerifyEmail { token }) if token == "abc"
        ));
        assert!(matches!(
            parse("services --refresh"),
            Some(ShellCommand::Services { refresh: true })
        ));
    }

    #[test]
    fn test_unknown_command_is_a_clap_error() {
        assert!(matches!(parse_line("book 3"), Err(LineError::Clap(_))));
        assert!(matches!(
            parse_line("login \"lea"),
            Err(LineError::Words(CliError::UnterminatedQuote))
        ));
    }
}
