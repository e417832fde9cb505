//! REST-Interface des Torhaus-Servers

pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

use torhaus_auth::{AuthFehler, AuthService, TokenService};
use torhaus_core::FehlerGruppe;
use torhaus_db::SqliteDb;

/// Konkreter AuthService ueber dem SQLite-Backend
pub type DbAuthService = AuthService<SqliteDb, SqliteDb, SqliteDb>;

/// Axum-State fuer den REST-Server
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<DbAuthService>,
    pub tokens: Arc<TokenService>,
}

impl AppState {
    pub fn neu(auth: Arc<DbAuthService>, tokens: Arc<TokenService>) -> Self {
        Self { auth, tokens }
    }
}

/// Wandelt einen Service-Fehler in eine strukturierte API-Antwort um
///
/// Bekannte Fehler werden mit Gruppe/Code/Nachricht gemeldet (401 fuer die
/// Anmeldedaten-/Session-Klasse, sonst 500). Systemfehler werden als
/// unerwartet geloggt; das Logging selbst darf die Antwort nie verhindern.
pub fn fehler_zu_response(fehler: AuthFehler) -> Response {
    let status = StatusCode::from_u16(fehler.http_status())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let info = fehler.info();

    if fehler.gruppe() == FehlerGruppe::System {
        tracing::error!(code = info.code, %fehler, "Unerwarteter Fehler");
    } else {
        tracing::warn!(code = info.code, %fehler, "Anfrage fehlgeschlagen");
    }

    (status, Json(json!({ "error": info }))).into_response()
}
