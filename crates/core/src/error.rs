//! Fehler-Taxonomie fuer Torhaus
//!
//! Jeder bekannte Fehler wird nach aussen als strukturiertes Tripel
//! `{group, code, message}` gemeldet. Die Gruppen und stabilen Codes sind
//! hier zentral definiert; die konkreten Fehler-Enums der einzelnen Crates
//! bilden auf diese Taxonomie ab.

use serde::{Deserialize, Serialize};

/// Fehlergruppe eines bekannten Fehlers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FehlerGruppe {
    Validierung,
    Authentifizierung,
    Datenbank,
    System,
}

impl FehlerGruppe {
    /// Stabiler Gruppenname wie er auf dem Draht erscheint
    pub fn als_str(&self) -> &'static str {
        match self {
            Self::Validierung => "VALIDATION",
            Self::Authentifizierung => "AUTHENTICATION",
            Self::Datenbank => "DATABASE",
            Self::System => "SYSTEM",
        }
    }
}

impl std::fmt::Display for FehlerGruppe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.als_str())
    }
}

/// Strukturierter Fehlerkoerper fuer API-Antworten
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FehlerInfo {
    pub group: String,
    pub code: String,
    pub message: String,
}

impl FehlerInfo {
    /// Baut einen Fehlerkoerper aus Gruppe, Code und Nachricht
    pub fn neu(gruppe: FehlerGruppe, code: &str, message: impl Into<String>) -> Self {
        Self {
            group: gruppe.als_str().to_string(),
            code: code.to_string(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gruppen_namen_stabil() {
        assert_eq!(FehlerGruppe::Validierung.als_str(), "VALIDATION");
        assert_eq!(FehlerGruppe::Authentifizierung.als_str(), "AUTHENTICATION");
        assert_eq!(FehlerGruppe::Datenbank.als_str(), "DATABASE");
        assert_eq!(FehlerGruppe::System.als_str(), "SYSTEM");
    }

    #[test]
    fn fehler_info_serialisierung() {
        let info = FehlerInfo::neu(
            FehlerGruppe::Authentifizierung,
            "AUTHENTICATION_002",
            "Incorrect password.",
        );
        let json = serde_json::to_string(&info).unwrap();
        assert!(json.contains("\"group\":\"AUTHENTICATION\""));
        assert!(json.contains("\"code\":\"AUTHENTICATION_002\""));
    }
}
