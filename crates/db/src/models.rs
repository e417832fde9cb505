//! Datenbankmodelle fuer Torhaus
//!
//! Diese Typen repraesentieren Datensaetze aus der Datenbank.
//! Sie sind von den API-Modellen getrennt und dienen als reine
//! Datenuebertragungsobjekte zwischen Repository und Service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Benutzer
// ---------------------------------------------------------------------------

/// Benutzer-Datensatz aus der Datenbank
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenutzerRecord {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    /// Wird bei der Anlage frisch erzeugt und bei Passwortwechseln erneuert
    pub security_stamp: String,
    pub phone_number: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

/// Daten zum Erstellen eines neuen Benutzers
#[derive(Debug, Clone)]
pub struct NeuerBenutzer<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub security_stamp: &'a str,
    pub phone_number: &'a str,
    pub first_name: &'a str,
    pub middle_name: Option<&'a str>,
    pub last_name: &'a str,
}

/// Daten zum Aktualisieren eines Benutzers
///
/// Nur gesetzte Felder werden geaendert; `modified_at` wird von der
/// Implementierung immer mitgefuehrt.
#[derive(Debug, Clone, Default)]
pub struct BenutzerUpdate {
    pub first_name: Option<String>,
    pub middle_name: Option<Option<String>>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub password_hash: Option<String>,
    pub security_stamp: Option<String>,
}

/// Filterkriterien fuer Benutzerabfragen
///
/// Alle Felder sind optional und werden UND-verknuepft. `name` matcht
/// gegen Vor-, Zweit- und Nachnamen (LIKE).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BenutzerFilter {
    pub username: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub phone_number: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

// ---------------------------------------------------------------------------
// Rollen und Claims
// ---------------------------------------------------------------------------

/// Rollen-Datensatz aus der Datenbank
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RolleRecord {
    pub id: i64,
    pub name: String,
}

/// Claim-Datensatz einer Rolle (z.B. permission = users.view)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimRecord {
    pub claim_type: String,
    pub claim_value: String,
}

// ---------------------------------------------------------------------------
// Login-Sessions (Refresh-Tokens)
// ---------------------------------------------------------------------------

/// Login-Session-Datensatz (ein aktives Refresh-Token)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SitzungRecord {
    pub id: Uuid,
    pub user_id: i64,
    /// Opaker Refresh-Token-Wert (eindeutig)
    pub refresh_token: String,
    pub user_agent: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl SitzungRecord {
    /// Gibt `true` zurueck wenn die Session noch gueltig ist
    pub fn ist_gueltig(&self) -> bool {
        Utc::now() < self.expires_at
    }
}

/// Daten zum Erstellen einer neuen Login-Session
#[derive(Debug, Clone)]
pub struct NeueSitzung<'a> {
    pub user_id: i64,
    pub refresh_token: &'a str,
    pub user_agent: &'a str,
    pub expires_at: DateTime<Utc>,
}
