//! Route-Definitionen fuer die REST-API (/v1/...)

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::rest::{handlers, middleware::auth_middleware, AppState};

/// Erstellt den vollstaendigen /v1/-Router
pub fn v1_router(state: AppState) -> Router {
    // Anonyme Endpunkte
    let oeffentlich = Router::new()
        .route("/v1/authenticate/login", post(handlers::authenticate::login))
        .route(
            "/v1/authenticate/register-user",
            post(handlers::authenticate::register_user),
        )
        .route(
            "/v1/authenticate/register-admin",
            post(handlers::authenticate::register_admin),
        )
        .route(
            "/v1/authenticate/refresh-token",
            post(handlers::authenticate::refresh_token),
        );

    // Endpunkte hinter Bearer-Auth
    let geschuetzt = Router::new()
        .route(
            "/v1/authenticate/logout",
            post(handlers::authenticate::logout),
        )
        .route(
            "/v1/admin/authenticate/register",
            post(handlers::authenticate::admin_register),
        )
        .route(
            "/v1/users/:id",
            get(handlers::users::get_by_id).delete(handlers::users::delete_user),
        )
        .route("/v1/users/filter", post(handlers::users::filter))
        .route("/v1/users/count", post(handlers::users::count))
        .route("/v1/users", put(handlers::users::update))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    oeffentlich
        .merge(geschuetzt)
        .route("/health", get(crate::rest::server::health))
        .with_state(state)
}
