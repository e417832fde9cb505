//! Axum-Middleware fuer Bearer-Auth und Berechtigungspruefung

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

use torhaus_auth::TokenClaims;

use crate::rest::AppState;

/// Wrapper-Typ fuer die authentifizierten Claims (als Extension gespeichert)
#[derive(Clone)]
pub struct AuthBenutzer(pub TokenClaims);

impl AuthBenutzer {
    /// Numerische Benutzer-Id aus dem sub-Claim
    pub fn user_id(&self) -> Option<i64> {
        self.0.user_id()
    }
}

/// Extrahiert den User-Agent aus den Request-Headern
pub fn user_agent_aus_headers(headers: &HeaderMap) -> String {
    headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string()
}

/// Extrahiert Bearer-Token aus Authorization-Header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
}

/// Fehlerantwort fuer Middleware-Ablehnungen
pub fn fehler_antwort(status: StatusCode, nachricht: &str) -> Response {
    (
        status,
        Json(json!({
            "error": {
                "code": status.as_u16(),
                "message": nachricht
            }
        })),
    )
        .into_response()
}

/// Axum-Middleware: validiert den Bearer-Token und haengt die Claims an
///
/// Volle Token-Pruefung (Signatur, Ablauf, Issuer, Audience). Die Claims
/// stehen den Handlern danach als `Extension<AuthBenutzer>` zur Verfuegung.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let token = match bearer_token(req.headers()) {
        Some(token) => token,
        None => {
            return fehler_antwort(StatusCode::UNAUTHORIZED, "Authorization-Header fehlt");
        }
    };

    match state.tokens.validieren(token) {
        Ok(claims) => {
            req.extensions_mut().insert(AuthBenutzer(claims));
            next.run(req).await
        }
        Err(_) => fehler_antwort(
            StatusCode::UNAUTHORIZED,
            "Ungueltiger oder abgelaufener Token",
        ),
    }
}

/// Erfordert eine Berechtigung aus den Claims des Aufrufers
pub fn berechtigung_erfordern(benutzer: &AuthBenutzer, berechtigung: &str) -> Result<(), Response> {
    if benutzer.0.hat_berechtigung(berechtigung) {
        Ok(())
    } else {
        tracing::warn!(
            user_id = ?benutzer.user_id(),
            berechtigung = berechtigung,
            "Zugriff verweigert"
        );
        Err(fehler_antwort(
            StatusCode::FORBIDDEN,
            "Berechtigung fehlt",
        ))
    }
}
