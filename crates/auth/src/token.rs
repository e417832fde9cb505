//! JWT-Ausstellung und -Pruefung
//!
//! Der TokenService stellt signierte Access-Tokens (HMAC-SHA256) mit
//! Identitaets-, Rollen- und Berechtigungs-Claims aus. Fuer den
//! Refresh-Flow koennen absichtlich abgelaufene Tokens dekodiert werden:
//! Signatur und Algorithmus werden geprueft, der Ablauf nicht.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use torhaus_db::{BenutzerRecord, ClaimRecord, RolleRecord};

use crate::error::{AuthFehler, AuthResult};
use crate::roles::CLAIM_TYP_BERECHTIGUNG;

/// JWT-Konfiguration
///
/// Wird explizit in die Konstruktoren gereicht; es gibt keinen globalen
/// Konfigurationszustand.
#[derive(Debug, Clone)]
pub struct JwtKonfig {
    /// Aussteller-Claim (iss)
    pub issuer: String,
    /// Audience-Claim (aud)
    pub audience: String,
    /// Gemeinsames Geheimnis fuer HMAC-SHA256
    pub secret: String,
    /// Lebensdauer des Access-Tokens in Stunden
    pub ablauf_stunden: i64,
    /// Lebensdauer des Refresh-Tokens in Stunden
    pub refresh_ablauf_stunden: i64,
}

/// Claims eines Access-Tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Benutzer-Id
    pub sub: String,
    /// Benutzername
    pub name: String,
    /// Eindeutige Token-Id (fuer Widerruf/Anti-Replay)
    pub jti: String,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
    /// Rollennamen des Benutzers
    #[serde(default)]
    pub roles: Vec<String>,
    /// Deduplizierte Berechtigungswerte aus allen Rollen
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl TokenClaims {
    /// Numerische Benutzer-Id aus dem sub-Claim
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }

    /// Prueft ob der Token eine Rolle traegt
    pub fn hat_rolle(&self, rolle: &str) -> bool {
        self.roles.iter().any(|r| r == rolle)
    }

    /// Prueft ob der Token eine Berechtigung traegt
    pub fn hat_berechtigung(&self, berechtigung: &str) -> bool {
        self.permissions.iter().any(|p| p == berechtigung)
    }
}

/// Service fuer Ausstellung und Pruefung von Access-Tokens
pub struct TokenService {
    konfig: JwtKonfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenService {
    /// Erstellt einen neuen TokenService aus der JWT-Konfiguration
    pub fn neu(konfig: JwtKonfig) -> Self {
        let encoding_key = EncodingKey::from_secret(konfig.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(konfig.secret.as_bytes());
        Self {
            konfig,
            encoding_key,
            decoding_key,
        }
    }

    /// Stellt einen signierten Access-Token fuer einen Benutzer aus
    ///
    /// Claim-Menge: Identitaet (sub, name, frische jti), ein Rollen-Claim
    /// pro Rolle sowie die ueber alle Rollen deduplizierten
    /// Berechtigungs-Claims. Gibt Token-String und Ablaufzeitpunkt zurueck.
    pub fn ausstellen(
        &self,
        benutzer: &BenutzerRecord,
        rollen: &[RolleRecord],
        rollen_claims: &[ClaimRecord],
    ) -> AuthResult<(String, DateTime<Utc>)> {
        let jetzt = Utc::now();
        let ablauf = jetzt + Duration::hours(self.konfig.ablauf_stunden);

        // Deduplizierung ueber das (Typ, Wert)-Paar
        let paare: BTreeSet<(&str, &str)> = rollen_claims
            .iter()
            .map(|c| (c.claim_type.as_str(), c.claim_value.as_str()))
            .collect();
        let permissions: Vec<String> = paare
            .iter()
            .filter(|(typ, _)| *typ == CLAIM_TYP_BERECHTIGUNG)
            .map(|(_, wert)| wert.to_string())
            .collect();

        let claims = TokenClaims {
            sub: benutzer.id.to_string(),
            name: benutzer.username.clone(),
            jti: Uuid::new_v4().to_string(),
            iss: self.konfig.issuer.clone(),
            aud: self.konfig.audience.clone(),
            iat: jetzt.timestamp(),
            exp: ablauf.timestamp(),
            roles: rollen.iter().map(|r| r.name.clone()).collect(),
            permissions,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthFehler::intern(format!("Token-Ausstellung fehlgeschlagen: {e}")))?;

        Ok((token, ablauf))
    }

    /// Dekodiert einen (moeglicherweise abgelaufenen) Access-Token
    ///
    /// Signatur und Algorithmus (HMAC-SHA256) werden geprueft, der Ablauf
    /// nicht – der Refresh-Flow praesentiert absichtlich abgelaufene Tokens.
    pub fn abgelaufenen_dekodieren(&self, token: &str) -> AuthResult<TokenClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.set_required_spec_claims::<&str>(&[]);

        decode::<TokenClaims>(token, &self.decoding_key, &validation)
            .map(|daten| daten.claims)
            .map_err(|_| AuthFehler::UngueltigerAccessToken)
    }

    /// Volle Token-Pruefung (Signatur, Ablauf, Issuer, Audience)
    ///
    /// Wird von der Request-Middleware fuer geschuetzte Endpunkte genutzt.
    pub fn validieren(&self, token: &str) -> AuthResult<TokenClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.konfig.issuer]);
        validation.set_audience(&[&self.konfig.audience]);

        decode::<TokenClaims>(token, &self.decoding_key, &validation)
            .map(|daten| daten.claims)
            .map_err(|_| AuthFehler::UngueltigerAccessToken)
    }

    /// Lebensdauer des Refresh-Tokens in Stunden
    pub fn refresh_ablauf_stunden(&self) -> i64 {
        self.konfig.refresh_ablauf_stunden
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("issuer", &self.konfig.issuer)
            .field("audience", &self.konfig.audience)
            .field("ablauf_stunden", &self.konfig.ablauf_stunden)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::berechtigungen;

    fn test_konfig() -> JwtKonfig {
        JwtKonfig {
            issuer: "torhaus-test".into(),
            audience: "torhaus-clients".into(),
            secret: "test-geheimnis-mit-ausreichender-laenge".into(),
            ablauf_stunden: 3,
            refresh_ablauf_stunden: 168,
        }
    }

    fn test_benutzer() -> BenutzerRecord {
        let jetzt = Utc::now();
        BenutzerRecord {
            id: 7,
            username: "alice".into(),
            email: "alice@example.com".into(),
            password_hash: "hash".into(),
            security_stamp: "stempel".into(),
            phone_number: "+4915112345678".into(),
            first_name: "Alice".into(),
            middle_name: None,
            last_name: "Beispiel".into(),
            is_deleted: false,
            deleted_at: None,
            created_at: jetzt,
            modified_at: jetzt,
        }
    }

    fn claim(wert: &str) -> ClaimRecord {
        ClaimRecord {
            claim_type: CLAIM_TYP_BERECHTIGUNG.into(),
            claim_value: wert.into(),
        }
    }

    #[test]
    fn ausstellen_und_dekodieren_roundtrip() {
        let service = TokenService::neu(test_konfig());
        let rollen = vec![
            RolleRecord { id: 1, name: "Admin".into() },
            RolleRecord { id: 2, name: "User".into() },
        ];
        let claims = vec![claim(berechtigungen::USERS_VIEW)];

        let (token, ablauf) = service
            .ausstellen(&test_benutzer(), &rollen, &claims)
            .expect("Ausstellung fehlgeschlagen");

        let dekodiert = service.validieren(&token).expect("Validierung fehlgeschlagen");
        assert_eq!(dekodiert.sub, "7");
        assert_eq!(dekodiert.user_id(), Some(7));
        assert_eq!(dekodiert.name, "alice");
        assert_eq!(dekodiert.roles, vec!["Admin", "User"]);
        assert_eq!(dekodiert.exp, ablauf.timestamp());
        assert!(dekodiert.hat_rolle("Admin"));
        assert!(dekodiert.hat_berechtigung(berechtigungen::USERS_VIEW));
    }

    #[test]
    fn berechtigungen_werden_dedupliziert() {
        let service = TokenService::neu(test_konfig());
        let rollen = vec![
            RolleRecord { id: 1, name: "Admin".into() },
            RolleRecord { id: 2, name: "User".into() },
        ];
        // users.view kommt aus beiden Rollen, darf aber nur einmal erscheinen
        let claims = vec![
            claim(berechtigungen::USERS_VIEW),
            claim(berechtigungen::USERS_UPDATE),
            claim(berechtigungen::USERS_VIEW),
        ];

        let (token, _) = service
            .ausstellen(&test_benutzer(), &rollen, &claims)
            .unwrap();
        let dekodiert = service.validieren(&token).unwrap();

        let anzahl_view = dekodiert
            .permissions
            .iter()
            .filter(|p| *p == berechtigungen::USERS_VIEW)
            .count();
        assert_eq!(anzahl_view, 1);
        assert_eq!(dekodiert.permissions.len(), 2);
    }

    #[test]
    fn jti_ist_pro_token_frisch() {
        let service = TokenService::neu(test_konfig());
        let benutzer = test_benutzer();

        let (token1, _) = service.ausstellen(&benutzer, &[], &[]).unwrap();
        let (token2, _) = service.ausstellen(&benutzer, &[], &[]).unwrap();

        let jti1 = service.abgelaufenen_dekodieren(&token1).unwrap().jti;
        let jti2 = service.abgelaufenen_dekodieren(&token2).unwrap().jti;
        assert_ne!(jti1, jti2, "jti muss pro Token eindeutig sein");
    }

    #[test]
    fn abgelaufener_token_wird_dekodiert_aber_nicht_validiert() {
        let konfig = JwtKonfig {
            ablauf_stunden: -1, // Token ist bei Ausstellung bereits abgelaufen
            ..test_konfig()
        };
        let service = TokenService::neu(konfig);

        let (token, _) = service.ausstellen(&test_benutzer(), &[], &[]).unwrap();

        assert!(matches!(
            service.validieren(&token),
            Err(AuthFehler::UngueltigerAccessToken)
        ));

        let dekodiert = service
            .abgelaufenen_dekodieren(&token)
            .expect("Abgelaufener Token muss dekodierbar sein");
        assert_eq!(dekodiert.name, "alice");
    }

    #[test]
    fn falsches_geheimnis_wird_abgelehnt() {
        let service1 = TokenService::neu(test_konfig());
        let service2 = TokenService::neu(JwtKonfig {
            secret: "ein-anderes-geheimnis-mit-laenge".into(),
            ..test_konfig()
        });

        let (token, _) = service1.ausstellen(&test_benutzer(), &[], &[]).unwrap();

        assert!(matches!(
            service2.abgelaufenen_dekodieren(&token),
            Err(AuthFehler::UngueltigerAccessToken)
        ));
    }

    #[test]
    fn falscher_algorithmus_wird_abgelehnt() {
        let konfig = test_konfig();
        let service = TokenService::neu(konfig.clone());

        // Token mit HS384 statt HS256 signieren
        let jetzt = Utc::now();
        let claims = TokenClaims {
            sub: "7".into(),
            name: "alice".into(),
            jti: Uuid::new_v4().to_string(),
            iss: konfig.issuer.clone(),
            aud: konfig.audience.clone(),
            iat: jetzt.timestamp(),
            exp: (jetzt + Duration::hours(1)).timestamp(),
            roles: vec![],
            permissions: vec![],
        };
        let fremd_token = encode(
            &Header::new(Algorithm::HS384),
            &claims,
            &EncodingKey::from_secret(konfig.secret.as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            service.abgelaufenen_dekodieren(&fremd_token),
            Err(AuthFehler::UngueltigerAccessToken)
        ));
    }

    #[test]
    fn unparsbarer_token_wird_abgelehnt() {
        let service = TokenService::neu(test_konfig());
        assert!(matches!(
            service.abgelaufenen_dekodieren("kein.gueltiger.token"),
            Err(AuthFehler::UngueltigerAccessToken)
        ));
    }
}
