//! Fehlertypen fuer das Datenbank-Crate

use thiserror::Error;

/// Datenbank-Fehlertypen
#[derive(Debug, Error)]
pub enum DbError {
    #[error("Datensatz nicht gefunden: {0}")]
    NichtGefunden(String),

    #[error("Eindeutigkeitsverletzung: {0}")]
    Eindeutigkeit(String),

    #[error("Skalare Abfrage lieferte kein Ergebnis: {0}")]
    LeeresErgebnis(String),

    #[error("Keine Parameter uebergeben: {0}")]
    ParameterFehlen(String),

    #[error("Weniger Werte als Schluessel uebergeben: {0}")]
    SchluesselWerteFehlen(String),

    #[error("SQLx-Fehler: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Migration-Fehler: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Interner DB-Fehler: {0}")]
    Intern(String),
}

impl DbError {
    pub fn nicht_gefunden(msg: impl Into<String>) -> Self {
        Self::NichtGefunden(msg.into())
    }

    pub fn intern(msg: impl Into<String>) -> Self {
        Self::Intern(msg.into())
    }

    /// Gibt true zurueck wenn es sich um einen Eindeutigkeitsfehler handelt
    pub fn ist_eindeutigkeit(&self) -> bool {
        matches!(self, Self::Eindeutigkeit(_))
            || matches!(self, Self::Sqlx(e) if {
                let msg = e.to_string();
                msg.contains("UNIQUE") || msg.contains("unique")
            })
    }

    /// Stabiler Fehlercode der DATABASE-Gruppe, falls vorhanden
    ///
    /// SQLx-/Migrations-Fehler sind keine bekannten Fachfehler und werden
    /// vom Aufrufer als unerwarteter Systemfehler gemeldet.
    pub fn code(&self) -> Option<&'static str> {
        match self {
            Self::LeeresErgebnis(_) => Some("DATABASE_001"),
            Self::ParameterFehlen(_) => Some("DATABASE_002"),
            Self::SchluesselWerteFehlen(_) => Some("DATABASE_003"),
            _ => None,
        }
    }
}

/// Result-Alias fuer Datenbankoperationen
pub type DbResult<T> = Result<T, DbError>;
