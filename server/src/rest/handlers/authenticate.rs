//! REST-Handler fuer die Authentifizierungs-Endpunkte
//!
//! Der User-Agent-Header wird als Geraetekennung an die Login-Sessions
//! durchgereicht.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};

use torhaus_auth::roles::berechtigungen;
use torhaus_auth::{LoginRequest, LogoutRequest, RefreshTokenRequest, RegisterRequest};

use crate::rest::middleware::{
    berechtigung_erfordern, fehler_antwort, user_agent_aus_headers, AuthBenutzer,
};
use crate::rest::{fehler_zu_response, AppState};

/// POST /v1/authenticate/login
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<LoginRequest>,
) -> Response {
    let user_agent = user_agent_aus_headers(&headers);
    match state.auth.anmelden(body, &user_agent).await {
        Ok(antwort) => (StatusCode::OK, Json(antwort)).into_response(),
        Err(e) => fehler_zu_response(e),
    }
}

/// POST /v1/authenticate/register-user – Selbstregistrierung (Rolle `User`)
pub async fn register_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<RegisterRequest>,
) -> Response {
    let user_agent = user_agent_aus_headers(&headers);
    match state.auth.benutzer_registrieren(body, &user_agent).await {
        Ok(antwort) => (StatusCode::OK, Json(antwort)).into_response(),
        Err(e) => fehler_zu_response(e),
    }
}

/// POST /v1/authenticate/register-admin – Selbstregistrierung (Rolle `Admin`)
pub async fn register_admin(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<RegisterRequest>,
) -> Response {
    let user_agent = user_agent_aus_headers(&headers);
    match state.auth.admin_registrieren(body, &user_agent).await {
        Ok(antwort) => (StatusCode::OK, Json(antwort)).into_response(),
        Err(e) => fehler_zu_response(e),
    }
}

/// POST /v1/admin/authenticate/register – Registrierung mit Rollen aus dem Body
///
/// Nur fuer Verwalter: erfordert `administration` und `users.create`.
pub async fn admin_register(
    State(state): State<AppState>,
    axum::Extension(benutzer): axum::Extension<AuthBenutzer>,
    headers: HeaderMap,
    Json(body): Json<RegisterRequest>,
) -> Response {
    if let Err(antwort) = berechtigung_erfordern(&benutzer, berechtigungen::ADMINISTRATION) {
        return antwort;
    }
    if let Err(antwort) = berechtigung_erfordern(&benutzer, berechtigungen::USERS_CREATE) {
        return antwort;
    }

    let user_agent = user_agent_aus_headers(&headers);
    match state.auth.registrieren(body, &user_agent).await {
        Ok(antwort) => (StatusCode::OK, Json(antwort)).into_response(),
        Err(e) => fehler_zu_response(e),
    }
}

/// POST /v1/authenticate/refresh-token
pub async fn refresh_token(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<RefreshTokenRequest>,
) -> Response {
    let user_agent = user_agent_aus_headers(&headers);
    match state.auth.token_erneuern(body, &user_agent).await {
        Ok(antwort) => (StatusCode::OK, Json(antwort)).into_response(),
        Err(e) => fehler_zu_response(e),
    }
}

/// POST /v1/authenticate/logout
///
/// Die Benutzer-Id kommt aus den Claims des Aufrufers, nicht aus dem Body.
pub async fn logout(
    State(state): State<AppState>,
    axum::Extension(benutzer): axum::Extension<AuthBenutzer>,
    Json(body): Json<LogoutRequest>,
) -> Response {
    let user_id = match benutzer.user_id() {
        Some(id) => id,
        None => {
            return fehler_antwort(StatusCode::UNAUTHORIZED, "Ungueltiger sub-Claim");
        }
    };

    match state.auth.abmelden(user_id, &body.refresh_token).await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(e) => fehler_zu_response(e),
    }
}
