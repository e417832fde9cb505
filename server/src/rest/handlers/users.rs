//! REST-Handler fuer die Benutzer-Endpunkte
//!
//! Alle Endpunkte liegen hinter Bearer-Auth; die jeweilige Berechtigung
//! kommt aus den Claims des Aufrufers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    Extension,
};

use torhaus_auth::roles::berechtigungen;
use torhaus_auth::BenutzerUpdateRequest;
use torhaus_db::BenutzerFilter;

use crate::rest::middleware::{berechtigung_erfordern, AuthBenutzer};
use crate::rest::{fehler_zu_response, AppState};

/// GET /v1/users/:id
pub async fn get_by_id(
    State(state): State<AppState>,
    Extension(benutzer): Extension<AuthBenutzer>,
    Path(id): Path<i64>,
) -> Response {
    if let Err(antwort) = berechtigung_erfordern(&benutzer, berechtigungen::USERS_VIEW) {
        return antwort;
    }

    match state.auth.nach_id(id).await {
        Ok(ansicht) => (StatusCode::OK, Json(ansicht)).into_response(),
        Err(e) => fehler_zu_response(e),
    }
}

/// POST /v1/users/filter
pub async fn filter(
    State(state): State<AppState>,
    Extension(benutzer): Extension<AuthBenutzer>,
    Json(filter): Json<BenutzerFilter>,
) -> Response {
    if let Err(antwort) = berechtigung_erfordern(&benutzer, berechtigungen::USERS_VIEW) {
        return antwort;
    }

    match state.auth.nach_filter(&filter).await {
        Ok(ansichten) => (StatusCode::OK, Json(ansichten)).into_response(),
        Err(e) => fehler_zu_response(e),
    }
}

/// POST /v1/users/count
pub async fn count(
    State(state): State<AppState>,
    Extension(benutzer): Extension<AuthBenutzer>,
    Json(filter): Json<BenutzerFilter>,
) -> Response {
    if let Err(antwort) = berechtigung_erfordern(&benutzer, berechtigungen::USERS_VIEW) {
        return antwort;
    }

    match state.auth.anzahl(&filter).await {
        Ok(anzahl) => (StatusCode::OK, Json(serde_json::json!({ "count": anzahl }))).into_response(),
        Err(e) => fehler_zu_response(e),
    }
}

/// PUT /v1/users
pub async fn update(
    State(state): State<AppState>,
    Extension(benutzer): Extension<AuthBenutzer>,
    Json(body): Json<BenutzerUpdateRequest>,
) -> Response {
    if let Err(antwort) = berechtigung_erfordern(&benutzer, berechtigungen::USERS_UPDATE) {
        return antwort;
    }

    match state.auth.aktualisieren(body).await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(e) => fehler_zu_response(e),
    }
}

/// DELETE /v1/users/:id
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(benutzer): Extension<AuthBenutzer>,
    Path(id): Path<i64>,
) -> Response {
    if let Err(antwort) = berechtigung_erfordern(&benutzer, berechtigungen::USERS_DELETE) {
        return antwort;
    }

    match state.auth.loeschen(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => fehler_zu_response(e),
    }
}
