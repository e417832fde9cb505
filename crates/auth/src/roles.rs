//! Rollen-Seeding und Berechtigungs-Konstanten
//!
//! Die Standardrollen `Admin` und `User` werden nicht beim Serverstart,
//! sondern lazy vor der jeweils ersten Selbstregistrierung angelegt –
//! die erste Registrierung jeder Art traegt die Seeding-Kosten.

use std::sync::Arc;

use torhaus_db::RoleRepository;

use crate::error::{AuthFehler, AuthResult};

/// Name der Administrator-Rolle
pub const ROLLE_ADMIN: &str = "Admin";

/// Name der Standard-Benutzerrolle
pub const ROLLE_USER: &str = "User";

/// Claim-Typ fuer Berechtigungs-Claims
pub const CLAIM_TYP_BERECHTIGUNG: &str = "permission";

/// Berechtigungswerte die als Claims an Rollen haengen
pub mod berechtigungen {
    pub const ADMINISTRATION: &str = "administration";

    pub const USERS_VIEW: &str = "users.view";
    pub const USERS_UPDATE: &str = "users.update";
    pub const USERS_CREATE: &str = "users.create";
    pub const USERS_DELETE: &str = "users.delete";

    pub const ROLES_VIEW: &str = "roles.view";
    pub const ROLES_UPDATE: &str = "roles.update";
    pub const ROLES_CREATE: &str = "roles.create";
    pub const ROLES_DELETE: &str = "roles.delete";
}

/// Vollstaendiger Berechtigungssatz der Admin-Rolle
pub fn admin_berechtigungen() -> [&'static str; 9] {
    use berechtigungen::*;
    [
        ADMINISTRATION,
        USERS_VIEW,
        USERS_UPDATE,
        USERS_CREATE,
        USERS_DELETE,
        ROLES_VIEW,
        ROLES_UPDATE,
        ROLES_CREATE,
        ROLES_DELETE,
    ]
}

/// Berechtigungssatz der User-Rolle
pub fn user_berechtigungen() -> [&'static str; 2] {
    use berechtigungen::*;
    [USERS_VIEW, USERS_UPDATE]
}

/// Service fuer das idempotente Anlegen der Standardrollen
pub struct RollenService<R: RoleRepository> {
    repo: Arc<R>,
}

impl<R: RoleRepository> RollenService<R> {
    /// Erstellt einen neuen RollenService
    pub fn neu(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Stellt sicher dass eine Rolle mit ihren Berechtigungs-Claims existiert
    ///
    /// No-op wenn die Rolle bereits existiert. Andernfalls wird die Rolle
    /// angelegt und jeder Berechtigungswert als Claim angehaengt. Fehler
    /// beim Anlegen oder Anhaengen werden mit den Details des Speichers als
    /// `RollenZuweisungFehlgeschlagen` gemeldet.
    pub async fn sicherstellen(
        &self,
        name: &str,
        berechtigungen: &[&str],
    ) -> AuthResult<()> {
        if self.repo.exists(name).await? {
            return Ok(());
        }

        let rolle = self
            .repo
            .create(name)
            .await
            .map_err(|e| AuthFehler::RollenZuweisungFehlgeschlagen(e.to_string()))?;

        for berechtigung in berechtigungen {
            self.repo
                .add_claim(rolle.id, CLAIM_TYP_BERECHTIGUNG, berechtigung)
                .await
                .map_err(|e| AuthFehler::RollenZuweisungFehlgeschlagen(e.to_string()))?;
        }

        tracing::info!(
            rolle = name,
            claims = berechtigungen.len(),
            "Standardrolle angelegt"
        );

        Ok(())
    }
}
