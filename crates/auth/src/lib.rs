//! torhaus-auth – Authentifizierungs- und Session-Service
//!
//! Dieses Crate implementiert:
//! - Passwort-Hashing mit Argon2id
//! - JWT-Ausstellung mit Rollen- und Berechtigungs-Claims (TokenService)
//! - Login-Session-Verwaltung mit Refresh-Token-Rotation (SessionManager)
//! - Idempotentes Seeding der Standardrollen (RollenService)
//! - AuthService (Login, Registrierung, Token-Erneuerung, Logout, Benutzer-CRUD)

pub mod error;
pub mod models;
pub mod password;
pub mod roles;
pub mod service;
pub mod session;
pub mod token;
pub mod validation;

// Bequeme Re-Exporte
pub use error::{AuthFehler, AuthResult};
pub use models::{
    BenutzerAnsicht, BenutzerUpdateRequest, LoginAntwort, LoginBenutzerDaten, LoginRequest,
    LogoutRequest, RefreshTokenRequest, RegisterRequest,
};
pub use password::{passwort_hashen, passwort_verifizieren};
pub use roles::{RollenService, ROLLE_ADMIN, ROLLE_USER};
pub use service::AuthService;
pub use session::SessionManager;
pub use token::{JwtKonfig, TokenClaims, TokenService};
pub use validation::Validierung;
