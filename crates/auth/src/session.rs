//! Login-Session-Verwaltung fuer Torhaus
//!
//! Eine Login-Session entspricht einem aktiven Refresh-Token und wird in
//! der Datenbank persistiert (eine Zeile pro Geraet). Der SessionManager
//! kapselt Erstellung, Rotation beim Refresh und das Aufraeumen
//! abgelaufener Sessions.

use std::sync::Arc;

use chrono::{Duration, Utc};
use rand::Rng;
use uuid::Uuid;

use torhaus_db::{NeueSitzung, SessionRepository, SitzungRecord};

use crate::error::{AuthFehler, AuthResult};

/// Verwaltet Login-Sessions (Refresh-Tokens) ueber dem SessionRepository
pub struct SessionManager<S: SessionRepository> {
    repo: Arc<S>,
    /// Lebensdauer neuer Sessions in Stunden
    refresh_ablauf_stunden: i64,
}

impl<S: SessionRepository> SessionManager<S> {
    /// Erstellt einen neuen SessionManager
    pub fn neu(repo: Arc<S>, refresh_ablauf_stunden: i64) -> Self {
        Self {
            repo,
            refresh_ablauf_stunden,
        }
    }

    /// Erstellt und persistiert eine neue Login-Session
    ///
    /// Der Token-Wert ist kryptografisch zufaellig (32 Bytes); Eindeutigkeit
    /// ist probabilistisch, Kollisionen werden nicht explizit geprueft.
    pub async fn erstellen(&self, user_id: i64, user_agent: &str) -> AuthResult<SitzungRecord> {
        let token = refresh_token_generieren();
        let sitzung = self
            .repo
            .add(NeueSitzung {
                user_id,
                refresh_token: &token,
                user_agent,
                expires_at: Utc::now() + Duration::hours(self.refresh_ablauf_stunden),
            })
            .await?;

        tracing::debug!(user_id = user_id, "Neue Login-Session erstellt");
        Ok(sitzung)
    }

    /// Laedt alle Login-Sessions eines Benutzers
    pub async fn fuer_benutzer(&self, user_id: i64) -> AuthResult<Vec<SitzungRecord>> {
        Ok(self.repo.get_user_sessions(user_id).await?)
    }

    /// Rotiert eine Session anhand des praesentierten Refresh-Tokens
    ///
    /// Die gefundene Session wird ZUERST entfernt und erst danach auf
    /// Ablauf geprueft – eine abgelaufene Session wird also entfernt und
    /// der Aufruf schlaegt trotzdem mit `SitzungAbgelaufen` fehl. Diese
    /// Reihenfolge darf nicht zu "pruefen, dann entfernen" umgestellt
    /// werden.
    ///
    /// Gibt die entfernte Session und die verbleibenden Sessions zurueck.
    pub async fn rotieren(
        &self,
        sitzungen: Vec<SitzungRecord>,
        refresh_token: &str,
    ) -> AuthResult<(SitzungRecord, Vec<SitzungRecord>)> {
        let aktuelle = sitzungen
            .iter()
            .find(|s| s.refresh_token == refresh_token)
            .cloned()
            .ok_or(AuthFehler::SitzungAbgelaufen)?;

        self.repo.remove(aktuelle.id).await?;

        if !aktuelle.ist_gueltig() {
            tracing::debug!(
                user_id = aktuelle.user_id,
                "Abgelaufene Session beim Refresh entfernt"
            );
            return Err(AuthFehler::SitzungAbgelaufen);
        }

        let verbleibende = sitzungen
            .into_iter()
            .filter(|s| s.refresh_token != refresh_token)
            .collect();

        Ok((aktuelle, verbleibende))
    }

    /// Entfernt alle abgelaufenen Sessions aus der gegebenen Menge
    ///
    /// Gibt die Anzahl der entfernten Sessions zurueck.
    pub async fn abgelaufene_bereinigen(&self, sitzungen: &[SitzungRecord]) -> AuthResult<usize> {
        let abgelaufene: Vec<Uuid> = sitzungen
            .iter()
            .filter(|s| !s.ist_gueltig())
            .map(|s| s.id)
            .collect();

        if abgelaufene.is_empty() {
            return Ok(0);
        }

        let entfernt = self.repo.remove_many(&abgelaufene).await?;
        if entfernt > 0 {
            tracing::debug!(anzahl = entfernt, "Abgelaufene Login-Sessions bereinigt");
        }
        Ok(entfernt as usize)
    }

    /// Entfernt die angegebenen Sessions
    pub async fn entfernen(&self, ids: &[Uuid]) -> AuthResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        Ok(self.repo.remove_many(ids).await?)
    }
}

/// Generiert einen kryptografisch sicheren Refresh-Token (URL-sicheres Base64)
fn refresh_token_generieren() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    base64::Engine::encode(&base64::engine::general_purpose::URL_SAFE_NO_PAD, bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use torhaus_db::DbResult;

    // Minimales In-Memory SessionRepository fuer Tests
    #[derive(Default)]
    struct TestSitzungsRepo {
        sitzungen: Mutex<Vec<SitzungRecord>>,
    }

    impl SessionRepository for TestSitzungsRepo {
        async fn add(&self, data: NeueSitzung<'_>) -> DbResult<SitzungRecord> {
            let sitzung = SitzungRecord {
                id: Uuid::new_v4(),
                user_id: data.user_id,
                refresh_token: data.refresh_token.to_string(),
                user_agent: data.user_agent.to_string(),
                expires_at: data.expires_at,
                created_at: Utc::now(),
            };
            self.sitzungen.lock().unwrap().push(sitzung.clone());
            Ok(sitzung)
        }

        async fn remove(&self, id: Uuid) -> DbResult<bool> {
            let mut sitzungen = self.sitzungen.lock().unwrap();
            let vorher = sitzungen.len();
            sitzungen.retain(|s| s.id != id);
            Ok(sitzungen.len() < vorher)
        }

        async fn remove_many(&self, ids: &[Uuid]) -> DbResult<u64> {
            let mut sitzungen = self.sitzungen.lock().unwrap();
            let vorher = sitzungen.len();
            sitzungen.retain(|s| !ids.contains(&s.id));
            Ok((vorher - sitzungen.len()) as u64)
        }

        async fn get_user_sessions(&self, user_id: i64) -> DbResult<Vec<SitzungRecord>> {
            Ok(self
                .sitzungen
                .lock()
                .unwrap()
                .iter()
                .filter(|s| s.user_id == user_id)
                .cloned()
                .collect())
        }
    }

    fn manager() -> (SessionManager<TestSitzungsRepo>, Arc<TestSitzungsRepo>) {
        let repo = Arc::new(TestSitzungsRepo::default());
        (SessionManager::neu(Arc::clone(&repo), 168), repo)
    }

    /// Fuegt dem Repo eine Session mit gegebenem Ablauf hinzu
    async fn sitzung_mit_ablauf(
        repo: &TestSitzungsRepo,
        user_id: i64,
        token: &str,
        stunden: i64,
    ) -> SitzungRecord {
        repo.add(NeueSitzung {
            user_id,
            refresh_token: token,
            user_agent: "TestAgent/1.0",
            expires_at: Utc::now() + Duration::hours(stunden),
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn erstellen_persistiert_session() {
        let (manager, repo) = manager();

        let sitzung = manager.erstellen(1, "TestAgent/1.0").await.unwrap();
        assert!(sitzung.ist_gueltig());
        assert!(!sitzung.refresh_token.is_empty());

        let gespeichert = repo.get_user_sessions(1).await.unwrap();
        assert_eq!(gespeichert.len(), 1);
        assert_eq!(gespeichert[0].refresh_token, sitzung.refresh_token);
    }

    #[tokio::test]
    async fn token_sind_eindeutig() {
        let (manager, _) = manager();

        let s1 = manager.erstellen(1, "").await.unwrap();
        let s2 = manager.erstellen(1, "").await.unwrap();
        assert_ne!(s1.refresh_token, s2.refresh_token);
    }

    #[tokio::test]
    async fn rotieren_entfernt_und_behaelt_restliche() {
        let (manager, repo) = manager();

        sitzung_mit_ablauf(&repo, 1, "token-a", 24).await;
        sitzung_mit_ablauf(&repo, 1, "token-b", 24).await;

        let sitzungen = manager.fuer_benutzer(1).await.unwrap();
        let (entfernte, verbleibende) = manager.rotieren(sitzungen, "token-a").await.unwrap();

        assert_eq!(entfernte.refresh_token, "token-a");
        assert_eq!(verbleibende.len(), 1);
        assert_eq!(verbleibende[0].refresh_token, "token-b");

        let gespeichert = repo.get_user_sessions(1).await.unwrap();
        assert_eq!(gespeichert.len(), 1);
        assert_eq!(gespeichert[0].refresh_token, "token-b");
    }

    #[tokio::test]
    async fn rotieren_mit_unbekanntem_token_gibt_fehler() {
        let (manager, repo) = manager();
        sitzung_mit_ablauf(&repo, 1, "token-a", 24).await;

        let sitzungen = manager.fuer_benutzer(1).await.unwrap();
        let ergebnis = manager.rotieren(sitzungen, "unbekannt").await;
        assert!(matches!(ergebnis, Err(AuthFehler::SitzungAbgelaufen)));

        // Nichts wurde entfernt
        assert_eq!(repo.get_user_sessions(1).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn abgelaufene_session_wird_trotzdem_entfernt() {
        let (manager, repo) = manager();
        sitzung_mit_ablauf(&repo, 1, "abgelaufen", -1).await;

        let sitzungen = manager.fuer_benutzer(1).await.unwrap();
        let ergebnis = manager.rotieren(sitzungen, "abgelaufen").await;

        assert!(matches!(ergebnis, Err(AuthFehler::SitzungAbgelaufen)));
        // Die abgelaufene Session darf nicht haengen bleiben
        assert!(repo.get_user_sessions(1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn bereinigen_entfernt_nur_abgelaufene() {
        let (manager, repo) = manager();

        sitzung_mit_ablauf(&repo, 1, "frisch", 24).await;
        sitzung_mit_ablauf(&repo, 1, "alt-1", -1).await;
        sitzung_mit_ablauf(&repo, 1, "alt-2", -48).await;

        let sitzungen = manager.fuer_benutzer(1).await.unwrap();
        let entfernt = manager.abgelaufene_bereinigen(&sitzungen).await.unwrap();

        assert_eq!(entfernt, 2);
        let uebrig = repo.get_user_sessions(1).await.unwrap();
        assert_eq!(uebrig.len(), 1);
        assert_eq!(uebrig[0].refresh_token, "frisch");
    }

    #[tokio::test]
    async fn bereinigen_ohne_abgelaufene_ist_noop() {
        let (manager, repo) = manager();
        sitzung_mit_ablauf(&repo, 1, "frisch", 24).await;

        let sitzungen = manager.fuer_benutzer(1).await.unwrap();
        assert_eq!(manager.abgelaufene_bereinigen(&sitzungen).await.unwrap(), 0);
        assert_eq!(repo.get_user_sessions(1).await.unwrap().len(), 1);
    }
}
