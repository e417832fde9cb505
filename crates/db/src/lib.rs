//! torhaus-db – Datenbank-Abstraktion
//!
//! Dieses Crate stellt das Repository-Pattern bereit: Traits fuer Benutzer-,
//! Rollen- und Session-Datenzugriffe sowie deren SQLite-Implementierung
//! (sqlx, WAL-Modus, eingebettete Migrationen). Die Geschaeftslogik in
//! torhaus-auth ist generisch ueber die Traits und kennt keine SQL-Details.

pub mod error;
pub mod models;
pub mod repository;
pub mod sqlite;

pub use error::{DbError, DbResult};
pub use models::{
    BenutzerFilter, BenutzerRecord, BenutzerUpdate, ClaimRecord, NeueSitzung, NeuerBenutzer,
    RolleRecord, SitzungRecord,
};
pub use repository::{RoleRepository, SessionRepository, UserRepository};
pub use sqlite::pool::DatabaseConfig;
pub use sqlite::SqliteDb;
