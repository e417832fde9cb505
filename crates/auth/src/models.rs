//! Request- und Response-Modelle des Auth-Service
//!
//! Die Feldnamen auf dem Draht sind camelCase (beibehaltener
//! REST/JSON-Vertrag).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use torhaus_db::BenutzerRecord;

/// Login-Anfrage
///
/// Fehlende Felder werden zu leeren Strings; die Pflichtfeld-Pruefung
/// uebernimmt der Service.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Registrierungs-Anfrage
///
/// `roles` wird nur vom Admin-Register-Endpunkt aus dem Body uebernommen;
/// die Selbstregistrierung erzwingt die jeweilige Standardrolle.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterRequest {
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub phone_number: String,
    pub roles: Vec<String>,
}

/// Token-Erneuerungs-Anfrage
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RefreshTokenRequest {
    pub access_token: String,
    pub refresh_token: String,
}

/// Logout-Anfrage (die Benutzer-Id kommt aus den Claims des Aufrufers)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LogoutRequest {
    pub refresh_token: String,
}

/// Anfrage zum Aktualisieren der Namensfelder eines Benutzers
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BenutzerUpdateRequest {
    pub id: i64,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
}

/// Antwort auf Login, Registrierung und Token-Erneuerung
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginAntwort {
    /// Signierter Access-Token
    pub token: String,
    pub expiration: DateTime<Utc>,
    pub refresh_token: String,
    pub refresh_token_expiration: DateTime<Utc>,
    pub user: LoginBenutzerDaten,
}

/// Projektion der Benutzerdaten in der Login-Antwort
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginBenutzerDaten {
    pub id: i64,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub phone_number: String,
    pub email: String,
    pub roles: Vec<String>,
}

/// Benutzer-Ansicht fuer die CRUD-Endpunkte (ohne Credentials)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenutzerAnsicht {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub phone_number: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl From<BenutzerRecord> for BenutzerAnsicht {
    fn from(benutzer: BenutzerRecord) -> Self {
        Self {
            id: benutzer.id,
            username: benutzer.username,
            email: benutzer.email,
            phone_number: benutzer.phone_number,
            first_name: benutzer.first_name,
            middle_name: benutzer.middle_name,
            last_name: benutzer.last_name,
            created_at: benutzer.created_at,
            modified_at: benutzer.modified_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_antwort_camel_case() {
        let antwort = LoginAntwort {
            token: "t".into(),
            expiration: Utc::now(),
            refresh_token: "r".into(),
            refresh_token_expiration: Utc::now(),
            user: LoginBenutzerDaten {
                id: 1,
                first_name: "Alice".into(),
                middle_name: None,
                last_name: "Beispiel".into(),
                phone_number: "+4915112345678".into(),
                email: "alice@example.com".into(),
                roles: vec!["User".into()],
            },
        };

        let json = serde_json::to_string(&antwort).unwrap();
        assert!(json.contains("\"refreshToken\""));
        assert!(json.contains("\"refreshTokenExpiration\""));
        assert!(json.contains("\"firstName\""));
        assert!(json.contains("\"phoneNumber\""));
    }

    #[test]
    fn register_request_mit_fehlenden_feldern() {
        // Fehlende Felder werden zu leeren Strings, die Pruefung uebernimmt der Service
        let request: RegisterRequest = serde_json::from_str("{}").unwrap();
        assert!(request.username.is_empty());
        assert!(request.roles.is_empty());
        assert!(request.middle_name.is_none());
    }
}
