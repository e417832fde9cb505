//! torhaus-core – Gemeinsame Typen und Fehler-Taxonomie
//!
//! Dieses Crate stellt die fundamentalen Bausteine bereit, die von allen
//! anderen Torhaus-Crates gemeinsam genutzt werden: Id-Typen und die
//! Fehlergruppen fuer strukturierte API-Fehlerantworten.

pub mod error;
pub mod types;

// Re-Exporte fuer bequemen Zugriff
pub use error::{FehlerGruppe, FehlerInfo};
pub use types::{BenutzerId, RollenId};
