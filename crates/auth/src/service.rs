//! Auth-Service fuer Torhaus
//!
//! Zentraler Service fuer Login, Registrierung, Token-Erneuerung, Logout
//! und Benutzer-CRUD. Orchestriert Repositories, TokenService,
//! SessionManager und RollenService; haelt selbst keinen Zustand ueber
//! einen Aufruf hinaus.

use std::sync::Arc;

use uuid::Uuid;

use torhaus_core::types::ist_gueltige_id;
use torhaus_db::{
    BenutzerFilter, BenutzerRecord, BenutzerUpdate, NeuerBenutzer, RoleRepository,
    SessionRepository, SitzungRecord, UserRepository,
};

use crate::{
    error::{AuthFehler, AuthResult},
    models::{
        BenutzerAnsicht, BenutzerUpdateRequest, LoginAntwort, LoginBenutzerDaten, LoginRequest,
        RefreshTokenRequest, RegisterRequest,
    },
    password::{passwort_hashen, passwort_verifizieren},
    roles::{admin_berechtigungen, user_berechtigungen, RollenService, ROLLE_ADMIN, ROLLE_USER},
    session::SessionManager,
    token::TokenService,
    validation::Validierung,
};

/// Auth-Service – zentraler Einstiegspunkt fuer alle Authentifizierungsvorgaenge
pub struct AuthService<U, R, S>
where
    U: UserRepository,
    R: RoleRepository,
    S: SessionRepository,
{
    benutzer_repo: Arc<U>,
    rollen_repo: Arc<R>,
    rollen_service: RollenService<R>,
    sessions: SessionManager<S>,
    token_service: Arc<TokenService>,
    validierung: Validierung,
}

impl<U, R, S> AuthService<U, R, S>
where
    U: UserRepository,
    R: RoleRepository,
    S: SessionRepository,
{
    /// Erstellt einen neuen AuthService
    pub fn neu(
        benutzer_repo: Arc<U>,
        rollen_repo: Arc<R>,
        sitzungs_repo: Arc<S>,
        token_service: Arc<TokenService>,
    ) -> Self {
        let sessions = SessionManager::neu(sitzungs_repo, token_service.refresh_ablauf_stunden());
        Self {
            benutzer_repo,
            rollen_repo: Arc::clone(&rollen_repo),
            rollen_service: RollenService::neu(rollen_repo),
            sessions,
            token_service,
            validierung: Validierung::neu(),
        }
    }

    /// Meldet einen Benutzer an
    ///
    /// Prueft Benutzername und Passwort, erstellt eine neue Login-Session
    /// und bereinigt dabei opportunistisch abgelaufene Sessions.
    pub async fn anmelden(
        &self,
        request: LoginRequest,
        user_agent: &str,
    ) -> AuthResult<LoginAntwort> {
        pflichtfeld(&request.username, "username")?;
        if request.password.is_empty() {
            return Err(AuthFehler::PflichtfeldFehlt("password".into()));
        }

        // Benutzernamen werden normalisiert (klein) gespeichert
        let benutzer = self
            .benutzer_repo
            .get_by_username(&request.username.trim().to_lowercase())
            .await?
            .ok_or(AuthFehler::BenutzerNichtGefunden)?;

        if !passwort_verifizieren(&request.password, &benutzer.password_hash)? {
            tracing::warn!(username = %benutzer.username, "Fehlgeschlagener Login-Versuch");
            return Err(AuthFehler::FalschesPasswort);
        }

        let sitzungen = self.sessions.fuer_benutzer(benutzer.id).await?;

        tracing::info!(
            user_id = benutzer.id,
            username = %benutzer.username,
            "Benutzer angemeldet"
        );

        self.login_antwort_erstellen(benutzer, user_agent, Some(sitzungen))
            .await
    }

    /// Registriert einen neuen Benutzer mit den angefragten Rollen
    ///
    /// Wird direkt vom Admin-Register-Endpunkt genutzt; die
    /// Selbstregistrierung laeuft ueber `benutzer_registrieren` /
    /// `admin_registrieren`, die die Rollenliste erzwingen.
    pub async fn registrieren(
        &self,
        mut request: RegisterRequest,
        user_agent: &str,
    ) -> AuthResult<LoginAntwort> {
        pflichtfeld(&request.first_name, "firstName")?;
        pflichtfeld(&request.last_name, "lastName")?;
        pflichtfeld(&request.username, "username")?;
        if request.password.is_empty() {
            return Err(AuthFehler::PflichtfeldFehlt("password".into()));
        }
        pflichtfeld(&request.email, "email")?;
        pflichtfeld(&request.phone_number, "phoneNumber")?;
        if request.roles.is_empty() {
            return Err(AuthFehler::PflichtfeldFehlt("roles".into()));
        }

        if !self.validierung.ist_gueltige_email(request.email.trim()) {
            return Err(AuthFehler::UngueltigeEmail);
        }
        if !self
            .validierung
            .ist_gueltige_telefonnummer(request.phone_number.trim())
        {
            return Err(AuthFehler::UngueltigeTelefonnummer);
        }

        register_request_normalisieren(&mut request);

        if self
            .benutzer_repo
            .get_by_username(&request.username)
            .await?
            .is_some()
        {
            return Err(AuthFehler::BenutzerExistiert);
        }

        let rollen_anzahl = self.rollen_repo.count_by_names(&request.roles).await?;
        if rollen_anzahl != request.roles.len() as i64 {
            return Err(AuthFehler::UngueltigeRolle);
        }

        let passwort_hash = passwort_hashen(&request.password)?;
        let security_stamp = Uuid::new_v4().to_string();

        let benutzer = self
            .benutzer_repo
            .create(NeuerBenutzer {
                username: &request.username,
                email: &request.email,
                password_hash: &passwort_hash,
                security_stamp: &security_stamp,
                phone_number: &request.phone_number,
                first_name: &request.first_name,
                middle_name: request.middle_name.as_deref(),
                last_name: &request.last_name,
            })
            .await
            .map_err(|e| AuthFehler::RegistrierungFehlgeschlagen(e.to_string()))?;

        // Kein kompensierendes Loeschen: schlaegt die Zuweisung fehl,
        // bleibt der Benutzer ohne Rollen bestehen
        if let Err(e) = self
            .rollen_repo
            .add_user_roles(benutzer.id, &request.roles)
            .await
        {
            return Err(AuthFehler::RollenZuweisungFehlgeschlagen(e.to_string()));
        }

        tracing::info!(
            user_id = benutzer.id,
            username = %benutzer.username,
            rollen = ?request.roles,
            "Neuer Benutzer registriert"
        );

        self.login_antwort_erstellen(benutzer, user_agent, None)
            .await
    }

    /// Selbstregistrierung mit der Standardrolle `User`
    pub async fn benutzer_registrieren(
        &self,
        mut request: RegisterRequest,
        user_agent: &str,
    ) -> AuthResult<LoginAntwort> {
        request.roles = vec![ROLLE_USER.to_string()];
        self.rollen_service
            .sicherstellen(ROLLE_USER, &user_berechtigungen())
            .await?;
        self.registrieren(request, user_agent).await
    }

    /// Selbstregistrierung mit der Rolle `Admin`
    pub async fn admin_registrieren(
        &self,
        mut request: RegisterRequest,
        user_agent: &str,
    ) -> AuthResult<LoginAntwort> {
        request.roles = vec![ROLLE_ADMIN.to_string()];
        self.rollen_service
            .sicherstellen(ROLLE_ADMIN, &admin_berechtigungen())
            .await?;
        self.registrieren(request, user_agent).await
    }

    /// Erneuert das Access-Token gegen ein gueltiges Refresh-Token
    ///
    /// Das praesentierte Refresh-Token wird rotiert: die zugehoerige
    /// Session wird entfernt und eine neue ausgestellt. War die Session
    /// bereits abgelaufen, wird sie trotzdem entfernt und der Aufruf
    /// schlaegt fehl – der Aufrufer muss sich neu anmelden.
    pub async fn token_erneuern(
        &self,
        request: RefreshTokenRequest,
        user_agent: &str,
    ) -> AuthResult<LoginAntwort> {
        pflichtfeld(&request.access_token, "accessToken")?;
        pflichtfeld(&request.refresh_token, "refreshToken")?;

        // Signatur pruefen, Ablauf bewusst ignorieren
        let claims = self
            .token_service
            .abgelaufenen_dekodieren(&request.access_token)?;

        let benutzer = self
            .benutzer_repo
            .get_by_username(&claims.name)
            .await?
            .ok_or(AuthFehler::BenutzerNichtGefunden)?;

        let sitzungen = self.sessions.fuer_benutzer(benutzer.id).await?;
        let (_, verbleibende) = self
            .sessions
            .rotieren(sitzungen, &request.refresh_token)
            .await?;

        tracing::debug!(user_id = benutzer.id, "Access-Token erneuert");

        self.login_antwort_erstellen(benutzer, user_agent, Some(verbleibende))
            .await
    }

    /// Meldet einen Benutzer ab
    ///
    /// Entfernt die Session mit dem praesentierten Refresh-Token und
    /// raeumt dabei alle bereits abgelaufenen Sessions des Benutzers mit ab.
    pub async fn abmelden(&self, user_id: i64, refresh_token: &str) -> AuthResult<()> {
        if !ist_gueltige_id(user_id) {
            return Err(AuthFehler::UngueltigesFeld("userId".into()));
        }
        pflichtfeld(refresh_token, "refreshToken")?;

        let sitzungen = self.sessions.fuer_benutzer(user_id).await?;
        let zu_entfernen: Vec<Uuid> = sitzungen
            .iter()
            .filter(|s| !s.ist_gueltig() || s.refresh_token == refresh_token)
            .map(|s| s.id)
            .collect();

        let entfernt = self.sessions.entfernen(&zu_entfernen).await?;
        tracing::debug!(user_id = user_id, anzahl = entfernt, "Benutzer abgemeldet");
        Ok(())
    }

    /// Laedt einen Benutzer anhand seiner Id
    pub async fn nach_id(&self, id: i64) -> AuthResult<BenutzerAnsicht> {
        if !ist_gueltige_id(id) {
            return Err(AuthFehler::UngueltigesFeld("id".into()));
        }

        let benutzer = self
            .benutzer_repo
            .get_by_id(id)
            .await?
            .ok_or(AuthFehler::BenutzerNichtGefunden)?;
        Ok(benutzer.into())
    }

    /// Laedt Benutzer nach Filterkriterien
    pub async fn nach_filter(&self, filter: &BenutzerFilter) -> AuthResult<Vec<BenutzerAnsicht>> {
        let benutzer = self.benutzer_repo.get_by_filter(filter).await?;
        Ok(benutzer.into_iter().map(Into::into).collect())
    }

    /// Anzahl der Benutzer nach Filterkriterien
    pub async fn anzahl(&self, filter: &BenutzerFilter) -> AuthResult<i64> {
        Ok(self.benutzer_repo.count_by_filter(filter).await?)
    }

    /// Aktualisiert die Namensfelder eines Benutzers
    pub async fn aktualisieren(&self, request: BenutzerUpdateRequest) -> AuthResult<()> {
        if !ist_gueltige_id(request.id) {
            return Err(AuthFehler::UngueltigesFeld("id".into()));
        }
        pflichtfeld(&request.first_name, "firstName")?;
        pflichtfeld(&request.last_name, "lastName")?;

        self.benutzer_repo
            .get_by_id(request.id)
            .await?
            .ok_or(AuthFehler::BenutzerNichtGefunden)?;

        self.benutzer_repo
            .update(
                request.id,
                BenutzerUpdate {
                    first_name: Some(titel_schreibweise(request.first_name.trim())),
                    middle_name: Some(
                        request
                            .middle_name
                            .as_deref()
                            .map(|n| titel_schreibweise(n.trim())),
                    ),
                    last_name: Some(titel_schreibweise(request.last_name.trim())),
                    ..Default::default()
                },
            )
            .await?;
        Ok(())
    }

    /// Soft-loescht einen Benutzer
    pub async fn loeschen(&self, id: i64) -> AuthResult<()> {
        if !ist_gueltige_id(id) {
            return Err(AuthFehler::UngueltigesFeld("id".into()));
        }
        self.benutzer_repo.remove(id).await?;
        Ok(())
    }

    /// Baut die gemeinsame Login-Antwort
    ///
    /// Laedt Rollen und Claims, stellt den Access-Token aus, erstellt eine
    /// neue Login-Session und bereinigt – falls bestehende Sessions
    /// uebergeben wurden – deren abgelaufene best-effort: ein Fehler dabei
    /// wird geloggt und verhindert die Antwort nicht.
    async fn login_antwort_erstellen(
        &self,
        benutzer: BenutzerRecord,
        user_agent: &str,
        bestehende: Option<Vec<SitzungRecord>>,
    ) -> AuthResult<LoginAntwort> {
        let rollen = self.rollen_repo.get_user_roles(benutzer.id).await?;

        let mut rollen_claims = Vec::new();
        for rolle in &rollen {
            rollen_claims.extend(self.rollen_repo.get_claims(rolle.id).await?);
        }

        let (token, ablauf) = self
            .token_service
            .ausstellen(&benutzer, &rollen, &rollen_claims)?;

        let sitzung = self.sessions.erstellen(benutzer.id, user_agent).await?;

        if let Some(bestehende) = bestehende {
            if let Err(fehler) = self.sessions.abgelaufene_bereinigen(&bestehende).await {
                tracing::warn!(
                    user_id = benutzer.id,
                    %fehler,
                    "Bereinigung abgelaufener Sessions fehlgeschlagen"
                );
            }
        }

        let rollen_namen: Vec<String> = rollen.into_iter().map(|r| r.name).collect();

        Ok(LoginAntwort {
            token,
            expiration: ablauf,
            refresh_token: sitzung.refresh_token,
            refresh_token_expiration: sitzung.expires_at,
            user: LoginBenutzerDaten {
                id: benutzer.id,
                first_name: benutzer.first_name,
                middle_name: benutzer.middle_name,
                last_name: benutzer.last_name,
                phone_number: benutzer.phone_number,
                email: benutzer.email,
                roles: rollen_namen,
            },
        })
    }
}

/// Prueft ein Pflichtfeld auf nicht-leeren Inhalt
fn pflichtfeld(wert: &str, feld: &str) -> AuthResult<()> {
    if wert.trim().is_empty() {
        return Err(AuthFehler::PflichtfeldFehlt(feld.into()));
    }
    Ok(())
}

/// Normalisiert die Felder einer Registrierungs-Anfrage
///
/// Benutzername und E-Mail werden getrimmt und kleingeschrieben, Namen
/// getrimmt und in Titel-Schreibweise gebracht, die Telefonnummer getrimmt.
fn register_request_normalisieren(request: &mut RegisterRequest) {
    request.username = request.username.trim().to_lowercase();
    request.email = request.email.trim().to_lowercase();
    request.first_name = titel_schreibweise(request.first_name.trim());
    request.middle_name = request
        .middle_name
        .as_deref()
        .map(|n| titel_schreibweise(n.trim()));
    request.last_name = titel_schreibweise(request.last_name.trim());
    request.phone_number = request.phone_number.trim().to_string();
}

/// Bringt einen String in Titel-Schreibweise
///
/// Jedes Wort beginnt mit einem Grossbuchstaben, der Rest wird klein
/// geschrieben. Woerter die komplett gross geschrieben sind gelten als
/// Akronyme und bleiben unveraendert.
fn titel_schreibweise(wert: &str) -> String {
    wert.split_whitespace()
        .map(|wort| {
            if wort.chars().all(|c| !c.is_lowercase()) {
                return wort.to_string();
            }
            let mut zeichen = wort.chars();
            match zeichen.next() {
                Some(erstes) => {
                    erstes.to_uppercase().collect::<String>() + &zeichen.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
