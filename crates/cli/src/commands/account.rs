//! Session and account commands.
//!
//! # Usage
//!
//! ```bash
//! # Who is logged in (always anonymous for a fresh process)
//! salon status
//!
//! # Create an account; passwords are prompted for
//! salon register --nom Martin --prenom Léa -e lea@example.fr
//!
//! # Password reset flow
//! salon forgot-password lea@example.fr
//! salon verify-reset-token <token>
//! salon reset-password <token>
//! ```

use std::io::Write;

use clap::Args;

use salon_client::api::ProfileUpdate;
use salon_client::{SalonApi, SessionStore, SignupForm};

use crate::error::{CliError, ensure};
use crate::{prompt, views};

/// Account fields for `register`.
#[derive(Debug, Args)]
pub struct RegisterArgs {
    /// Last name
    #[arg(long)]
    pub nom: String,

    /// First name
    #[arg(long)]
    pub prenom: String,

    /// Email address
    #[arg(short, long)]
    pub email: String,

    /// Phone number
    #[arg(long)]
    pub telephone: Option<String>,

    /// Postal address
    #[arg(long)]
    pub adresse: Option<String>,
}

/// Profile fields to change; omitted fields are left as they are.
#[derive(Debug, Args)]
pub struct ProfileArgs {
    #[arg(long)]
    pub nom: Option<String>,

    #[arg(long)]
    pub prenom: Option<String>,

    #[arg(short, long)]
    pub email: Option<String>,

    #[arg(long)]
    pub telephone: Option<String>,

    #[arg(long)]
    pub adresse: Option<String>,
}

impl From<ProfileArgs> for ProfileUpdate {
    fn from(args: ProfileArgs) -> Self {
        Self {
            nom: args.nom,
            prenom: args.prenom,
            email: args.email,
            telephone: args.telephone,
            adresse: args.adresse,
        }
    }
}

/// Run the authentication check and show the result.
pub async fn status<A: SalonApi>(
    session: &SessionStore<A>,
    out: &mut impl Write,
) -> Result<(), CliError> {
    session.check_auth_status().await;
    views::session(out, &session.snapshot())?;
    Ok(())
}

/// Log in, prompting for the password.
pub async fn login<A: SalonApi>(
    session: &SessionStore<A>,
    email: &str,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let password = prompt::secret("Mot de passe").await?;
    let result = session.login(email, &password).await;
    views::outcome(out, &result)?;
    if result.success {
        views::session(out, &session.snapshot())?;
    }
    ensure(result.success)
}

pub async fn logout<A: SalonApi>(
    session: &SessionStore<A>,
    out: &mut impl Write,
) -> Result<(), CliError> {
    session.logout().await;
    views::session(out, &session.snapshot())?;
    Ok(())
}

/// Validate the signup form locally, then register.
pub async fn register<A: SalonApi>(
    session: &SessionStore<A>,
    args: RegisterArgs,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let password = prompt::secret("Mot de passe").await?;
    let password_confirmation = prompt::secret("Confirmer le mot de passe").await?;

    let request = SignupForm {
        nom: args.nom,
        prenom: args.prenom,
        email: args.email,
        telephone: args.telephone,
        adresse: args.adresse,
        password,
        password_confirmation,
    }
    .validate()?;

    let result = session.register(&request).await;
    views::registration(out, &result)?;
    ensure(result.success)
}

pub async fn update_profile<A: SalonApi>(
    session: &SessionStore<A>,
    args: ProfileArgs,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let update = ProfileUpdate::from(args);
    if update.is_empty() {
        writeln!(out, "Rien à modifier")?;
        return Ok(());
    }

    let result = session.update_profile(&update).await;
    views::outcome(out, &result)?;
    if result.success {
        views::session(out, &session.snapshot())?;
    }
    ensure(result.success)
}

pub async fn change_password<A: SalonApi>(
    session: &SessionStore<A>,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let current = prompt::secret("Mot de passe actuel").await?;
    let new = prompt::new_password().await?;
    let result = session.change_password(&current, &new).await;
    views::outcome(out, &result)?;
    ensure(result.success)
}

pub async fn verify_email<A: SalonApi>(
    session: &SessionStore<A>,
    token: &str,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let result = session.verify_email(token).await;
    views::outcome(out, &result)?;
    ensure(result.success)
}

pub async fn forgot_password<A: SalonApi>(
    session: &SessionStore<A>,
    email: &str,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let result = session.forgot_password(email).await;
    views::outcome(out, &result)?;
    ensure(result.success)
}

/// Check the token first so an expired link fails before any prompt.
pub async fn reset_password<A: SalonApi>(
    session: &SessionStore<A>,
    token: &str,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let validity = session.verify_reset_token(token).await;
    if !validity.valid {
        views::token_validity(out, &validity)?;
        return Err(CliError::Rejected);
    }

    let password = prompt::new_password().await?;
    let result = session.reset_password(token, &password).await;
    views::outcome(out, &result)?;
    ensure(result.success)
}

pub async fn verify_reset_token<A: SalonApi>(
    session: &SessionStore<A>,
    token: &str,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let validity = session.verify_reset_token(token).await;
    views::token_validity(out, &validity)?;
    ensure(validity.valid)
}

pub async fn reservations<A: SalonApi>(
    session: &SessionStore<A>,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let result = session.my_reservations().await;
    views::reservations(out, &result)?;
    ensure(result.success)
}
