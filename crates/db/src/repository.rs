//! Repository-Trait-Definitionen
//!
//! Das Repository-Pattern entkoppelt die Geschaeftslogik von der konkreten
//! Datenbank-Implementierung. torhaus-auth ist generisch ueber diese Traits;
//! fuer Unit-Tests existieren dort In-Memory-Doubles, in Produktion
//! implementiert `SqliteDb` alle drei Traits.

use uuid::Uuid;

use crate::error::DbResult;
use crate::models::{
    BenutzerFilter, BenutzerRecord, BenutzerUpdate, ClaimRecord, NeueSitzung, NeuerBenutzer,
    RolleRecord, SitzungRecord,
};

/// Repository fuer Benutzer-Datenzugriffe
///
/// Soft-geloeschte Benutzer sind fuer alle Lesezugriffe unsichtbar.
#[allow(async_fn_in_trait)]
pub trait UserRepository: Send + Sync {
    /// Einen neuen Benutzer anlegen
    async fn create(&self, data: NeuerBenutzer<'_>) -> DbResult<BenutzerRecord>;

    /// Einen Benutzer anhand seiner ID laden
    async fn get_by_id(&self, id: i64) -> DbResult<Option<BenutzerRecord>>;

    /// Einen Benutzer anhand seines Benutzernamens laden
    async fn get_by_username(&self, username: &str) -> DbResult<Option<BenutzerRecord>>;

    /// Benutzer nach Filterkriterien laden
    async fn get_by_filter(&self, filter: &BenutzerFilter) -> DbResult<Vec<BenutzerRecord>>;

    /// Anzahl der Benutzer nach Filterkriterien (ohne Limit/Offset)
    async fn count_by_filter(&self, filter: &BenutzerFilter) -> DbResult<i64>;

    /// Einen Benutzer aktualisieren (nur gesetzte Felder)
    async fn update(&self, id: i64, data: BenutzerUpdate) -> DbResult<BenutzerRecord>;

    /// Einen Benutzer soft-loeschen
    async fn remove(&self, id: i64) -> DbResult<bool>;
}

/// Repository fuer Rollen- und Claim-Datenzugriffe
#[allow(async_fn_in_trait)]
pub trait RoleRepository: Send + Sync {
    /// Prueft ob eine Rolle mit exakt diesem Namen existiert
    async fn exists(&self, name: &str) -> DbResult<bool>;

    /// Eine neue Rolle anlegen
    async fn create(&self, name: &str) -> DbResult<RolleRecord>;

    /// Eine Rolle anhand ihres Namens laden
    async fn get_by_name(&self, name: &str) -> DbResult<Option<RolleRecord>>;

    /// Anzahl der existierenden Rollen aus der gegebenen Namensliste
    async fn count_by_names(&self, names: &[String]) -> DbResult<i64>;

    /// Einen Claim an eine Rolle anhaengen
    async fn add_claim(&self, role_id: i64, claim_type: &str, claim_value: &str) -> DbResult<()>;

    /// Alle Claims einer Rolle laden
    async fn get_claims(&self, role_id: i64) -> DbResult<Vec<ClaimRecord>>;

    /// Rollen (per Name) einem Benutzer zuweisen
    async fn add_user_roles(&self, user_id: i64, role_names: &[String]) -> DbResult<()>;

    /// Alle Rollen eines Benutzers laden
    async fn get_user_roles(&self, user_id: i64) -> DbResult<Vec<RolleRecord>>;
}

/// Repository fuer Login-Sessions (Refresh-Tokens)
#[allow(async_fn_in_trait)]
pub trait SessionRepository: Send + Sync {
    /// Eine neue Login-Session persistieren
    async fn add(&self, data: NeueSitzung<'_>) -> DbResult<SitzungRecord>;

    /// Eine Login-Session loeschen
    async fn remove(&self, id: Uuid) -> DbResult<bool>;

    /// Mehrere Login-Sessions loeschen; gibt die Anzahl geloeschter Zeilen zurueck
    async fn remove_many(&self, ids: &[Uuid]) -> DbResult<u64>;

    /// Alle Login-Sessions eines Benutzers laden
    async fn get_user_sessions(&self, user_id: i64) -> DbResult<Vec<SitzungRecord>>;
}
