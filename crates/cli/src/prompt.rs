//! Terminal prompts.
//!
//! Prompts go to stderr so stdout only carries command output.

use std::io::Write;

use secrecy::{ExposeSecret, SecretString};

use salon_client::SignupError;
use salon_client::signup::MIN_PASSWORD_LENGTH;

use crate::error::CliError;

/// Read a password without echo.
pub async fn secret(label: &str) -> Result<SecretString, CliError> {
    let label = format!("{label}: ");
    let password = tokio::task::spawn_blocking(move || rpassword::prompt_password(label)).await??;
    Ok(SecretString::from(password))
}

/// Read a new password twice, checking its length and that both entries
/// match.
pub async fn new_password() -> Result<SecretString, CliError> {
    let password = secret("Nouveau mot de passe").await?;
    if password.expose_secret().chars().count() < MIN_PASSWORD_LENGTH {
        return Err(SignupError::PasswordTooShort.into());
    }
    let confirmation = secret("Confirmer le mot de passe").await?;
    if password.expose_secret() != confirmation.expose_secret() {
        return Err(SignupError::PasswordMismatch.into());
    }
    Ok(password)
}

/// Write the shell prompt.
pub fn shell_prompt() -> Result<(), CliError> {
    let mut stderr = std::io::stderr().lock();
    write!(stderr, "salon> ")?;
    stderr.flush()?;
    Ok(())
}

/// Split a shell line into words. Single and double quotes group words;
/// there are no escapes.
pub fn split_words(line: &str) -> Result<Vec<String>, CliError> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), c) => current.push(c),
            (None, '"' | '\'') => {
                quote = Some(c);
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if quote.is_some() {
        return Err(CliError::UnterminatedQuote);
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}
