//! Text rendering of session state and operation results.
//!
//! Views only read: they render a snapshot or a result value and branch on
//! `success`/`valid`, never on error details.

use std::collections::BTreeMap;
use std::io::{self, Write};

use salon_client::session::{
    OperationResult, RegisterResult, ReservationsResult, SessionPhase, SessionState,
    TokenValidity,
};
use salon_core::{SalonService, ServiceCategory};

fn mark(success: bool) -> &'static str {
    if success { "✔" } else { "✘" }
}

pub fn session(out: &mut impl Write, state: &SessionState) -> io::Result<()> {
    match (state.phase(), state.client()) {
        (SessionPhase::Authenticated, Some(client)) => {
            writeln!(out, "Connecté : {} <{}>", client.full_name(), client.email)?;
            if !client.email_verifie {
                writeln!(out, "  Email non vérifié")?;
            }
            Ok(())
        }
        (SessionPhase::Unknown, _) => writeln!(out, "Vérification de la session…"),
        _ => writeln!(out, "Non connecté"),
    }
}

pub fn outcome(out: &mut impl Write, result: &OperationResult) -> io::Result<()> {
    writeln!(out, "{} {}", mark(result.success), result.message)
}

pub fn registration(out: &mut impl Write, result: &RegisterResult) -> io::Result<()> {
    writeln!(out, "{} {}", mark(result.success), result.message)?;
    if let Some(id) = result.client_id {
        writeln!(out, "  Client n° {id}")?;
    }
    if let Some(token) = &result.verification_token {
        writeln!(out, "  Jeton de vérification : {token}")?;
    }
    Ok(())
}

pub fn token_validity(out: &mut impl Write, result: &TokenValidity) -> io::Result<()> {
    writeln!(out, "{} {}", mark(result.valid), result.message)
}

pub fn reservations(out: &mut impl Write, result: &ReservationsResult) -> io::Result<()> {
    if !result.success {
        let message = result.message.as_deref().unwrap_or_default();
        return writeln!(out, "{} {message}", mark(false));
    }

    if result.reservations.is_empty() {
        return writeln!(out, "Aucune réservation");
    }

    for reservation in &result.reservations {
        write!(
            out,
            "{} {}  {}  [{}]",
            reservation.date_reservation.format("%d/%m/%Y"),
            reservation.heure.format("%H:%M"),
            reservation.service_nom.as_deref().unwrap_or("Prestation"),
            reservation.statut.label(),
        )?;
        if let Some(prix) = &reservation.prix {
            write!(out, "  {prix}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}

pub fn services(
    out: &mut impl Write,
    catalog: &BTreeMap<ServiceCategory, Vec<SalonService>>,
) -> io::Result<()> {
    if catalog.is_empty() {
        return writeln!(out, "Aucune prestation disponible");
    }

    for (category, services) in catalog {
        writeln!(out, "{}", category.label())?;
        for service in services {
            writeln!(
                out,
                "  {} · {} · {}",
                service.nom,
                service.duration_label(),
                service.prix
            )?;
        }
    }
    Ok(())
}
