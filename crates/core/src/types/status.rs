//! Status and category enums for reservations and salon services.

use serde::{Deserialize, Serialize};

/// Reservation lifecycle status, as stored by the salon API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    /// Booked by the client, not yet confirmed by the salon.
    #[default]
    EnAttente,
    /// Confirmed by the salon.
    Confirmee,
    /// Cancelled by either side.
    Annulee,
    /// The appointment took place.
    Terminee,
}

impl ReservationStatus {
    /// Whether the reservation still lies ahead of the client.
    #[must_use]
    pub const fn is_upcoming(self) -> bool {
        matches!(self, Self::EnAttente | Self::Confirmee)
    }

    /// Human-readable French label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::EnAttente => "En attente",
            Self::Confirmee => "Confirmée",
            Self::Annulee => "Annulée",
            Self::Terminee => "Terminée",
        }
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EnAttente => write!(f, "en_attente"),
            Self::Confirmee => write!(f, "confirmee"),
            Self::Annulee => write!(f, "annulee"),
            Self::Terminee => write!(f, "terminee"),
        }
    }
}

impl std::str::FromStr for ReservationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en_attente" => Ok(Self::EnAttente),
            "confirmee" => Ok(Self::Confirmee),
            "annulee" => Ok(Self::Annulee),
            "terminee" => Ok(Self::Terminee),
            _ => Err(format!("invalid reservation status: {s}")),
        }
    }
}

/// Category of a salon service.
///
/// Categories the client does not know about deserialize as [`Self::Autre`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum ServiceCategory {
    Ongles,
    Sourcils,
    Soins,
    Maquillage,
    #[default]
    #[serde(other)]
    Autre,
}

impl ServiceCategory {
    /// Heading used when listing services.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ongles => "Ongles",
            Self::Sourcils => "Sourcils",
            Self::Soins => "Soins",
            Self::Maquillage => "Maquillage",
            Self::Autre => "Autres prestations",
        }
    }
}
