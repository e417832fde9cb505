//! Fehlertypen fuer den Auth-Service
//!
//! Jede Variante traegt einen stabilen Code aus der Taxonomie in
//! torhaus-core und wird nach aussen als `{group, code, message}` gemeldet.

use thiserror::Error;
use torhaus_core::{FehlerGruppe, FehlerInfo};
use torhaus_db::DbError;

/// Alle moeglichen Fehler im Auth-Service
#[derive(Debug, Error)]
pub enum AuthFehler {
    // --- Validierung ---
    #[error("Pflichtfeld fehlt: {0}")]
    PflichtfeldFehlt(String),

    #[error("Feld ist ungueltig: {0}")]
    UngueltigesFeld(String),

    #[error("Ungueltige E-Mail-Adresse")]
    UngueltigeEmail,

    #[error("Ungueltige Telefonnummer")]
    UngueltigeTelefonnummer,

    // --- Authentifizierung ---
    #[error("Benutzer nicht gefunden")]
    BenutzerNichtGefunden,

    #[error("Passwort falsch")]
    FalschesPasswort,

    #[error("Benutzername bereits vergeben")]
    BenutzerExistiert,

    #[error("Rolle ist ungueltig")]
    UngueltigeRolle,

    #[error("Registrierung fehlgeschlagen: {0}")]
    RegistrierungFehlgeschlagen(String),

    #[error("Rollenzuweisung fehlgeschlagen: {0}")]
    RollenZuweisungFehlgeschlagen(String),

    #[error("Access-Token ungueltig")]
    UngueltigerAccessToken,

    #[error("Login-Session abgelaufen")]
    SitzungAbgelaufen,

    // --- Infrastruktur ---
    #[error("Passwort-Hashing fehlgeschlagen: {0}")]
    PasswortHashing(String),

    #[error("Datenbankfehler: {0}")]
    Datenbank(#[from] DbError),

    #[error("Interner Fehler: {0}")]
    Intern(String),
}

impl AuthFehler {
    pub fn intern(msg: impl Into<String>) -> Self {
        Self::Intern(msg.into())
    }

    /// Fehlergruppe der Taxonomie
    pub fn gruppe(&self) -> FehlerGruppe {
        match self {
            Self::PflichtfeldFehlt(_)
            | Self::UngueltigesFeld(_)
            | Self::UngueltigeEmail
            | Self::UngueltigeTelefonnummer => FehlerGruppe::Validierung,

            Self::BenutzerNichtGefunden
            | Self::FalschesPasswort
            | Self::BenutzerExistiert
            | Self::UngueltigeRolle
            | Self::RegistrierungFehlgeschlagen(_)
            | Self::RollenZuweisungFehlgeschlagen(_)
            | Self::UngueltigerAccessToken
            | Self::SitzungAbgelaufen => FehlerGruppe::Authentifizierung,

            Self::Datenbank(db) if db.code().is_some() => FehlerGruppe::Datenbank,

            Self::PasswortHashing(_) | Self::Datenbank(_) | Self::Intern(_) => FehlerGruppe::System,
        }
    }

    /// Stabiler Fehlercode
    pub fn code(&self) -> &'static str {
        match self {
            Self::PflichtfeldFehlt(_) => "VALIDATION_001",
            Self::UngueltigesFeld(_) => "VALIDATION_002",
            Self::UngueltigeEmail => "VALIDATION_004",
            Self::UngueltigeTelefonnummer => "VALIDATION_005",

            Self::BenutzerNichtGefunden => "AUTHENTICATION_001",
            Self::FalschesPasswort => "AUTHENTICATION_002",
            Self::BenutzerExistiert => "AUTHENTICATION_003",
            Self::UngueltigeRolle => "AUTHENTICATION_004",
            Self::RegistrierungFehlgeschlagen(_) => "AUTHENTICATION_005",
            Self::RollenZuweisungFehlgeschlagen(_) => "AUTHENTICATION_006",
            Self::UngueltigerAccessToken => "AUTHENTICATION_007",
            Self::SitzungAbgelaufen => "AUTHENTICATION_008",

            Self::Datenbank(db) => db.code().unwrap_or("SYSTEM_001"),
            Self::PasswortHashing(_) | Self::Intern(_) => "SYSTEM_001",
        }
    }

    /// HTTP-Status fuer die API-Antwort
    ///
    /// 401 fuer Fehler die falsche Anmeldedaten oder eine abgelaufene
    /// Session bedeuten, 500 fuer alles andere.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::BenutzerNichtGefunden
            | Self::FalschesPasswort
            | Self::UngueltigerAccessToken
            | Self::SitzungAbgelaufen => 401,
            _ => 500,
        }
    }

    /// Strukturierter Fehlerkoerper fuer die API
    pub fn info(&self) -> FehlerInfo {
        FehlerInfo::neu(self.gruppe(), self.code(), self.to_string())
    }
}

/// Result-Alias fuer den Auth-Service
pub type AuthResult<T> = Result<T, AuthFehler>;
