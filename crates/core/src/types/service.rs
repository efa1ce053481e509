//! Salon service (prestation) record.

use serde::{Deserialize, Serialize};

use super::flag::bool_from_flag;
use crate::{Price, ServiceCategory, ServiceId};

/// A service offered by the salon, as listed on the services page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalonService {
    pub id: ServiceId,
    pub nom: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub categorie: ServiceCategory,
    pub prix: Price,
    /// Duration in minutes.
    pub duree: u32,
    #[serde(default = "default_actif", deserialize_with = "bool_from_flag")]
    pub actif: bool,
}

const fn default_actif() -> bool {
    true
}

impl SalonService {
    /// Duration formatted as "45 min" or "1 h 30".
    #[must_use]
    pub fn duration_label(&self) -> String {
        let (hours, minutes) = (self.duree / 60, self.duree % 60);
        match (hours, minutes) {
            (0, m) => format!("{m} min"),
            (h, 0) => format!("{h} h"),
            (h, m) => format!("{h} h {m:02}"),
        }
    }
}
