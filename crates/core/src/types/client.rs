//! Client profile record.

use serde::{Deserialize, Serialize};

use super::flag::bool_from_flag;
use crate::{ClientId, Email};

/// An authenticated salon client, as returned by the API.
///
/// Field names follow the API's JSON keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientProfile {
    pub id: ClientId,
    pub nom: String,
    pub prenom: String,
    pub email: Email,
    #[serde(default)]
    pub telephone: Option<String>,
    #[serde(default)]
    pub adresse: Option<String>,
    #[serde(default, deserialize_with = "bool_from_flag")]
    pub email_verifie: bool,
}

impl ClientProfile {
    /// "Prenom Nom", as shown in greetings.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.prenom, self.nom)
    }
}
