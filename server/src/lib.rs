//! torhaus-server – Bibliotheks-Root
//!
//! Deklariert die Server-Module und stellt den oeffentlichen
//! Einstiegspunkt bereit: Konfiguration laden, Datenbank oeffnen,
//! Services verdrahten, REST-API starten.

pub mod config;
pub mod rest;

use std::sync::Arc;

use anyhow::{bail, Result};

use torhaus_auth::{AuthService, TokenService};
use torhaus_db::SqliteDb;

use config::ServerConfig;
use rest::server::{RestServer, RestServerKonfig};
use rest::AppState;

/// Haelt den laufenden Server-Zustand zusammen
pub struct Server {
    pub config: ServerConfig,
}

impl Server {
    /// Erstellt einen neuen Server aus der gegebenen Konfiguration
    pub fn neu(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Startet alle Server-Subsysteme und laeuft bis zum Shutdown-Signal
    ///
    /// Reihenfolge:
    /// 1. Konfiguration pruefen (JWT-Geheimnis muss gesetzt sein)
    /// 2. Datenbankverbindung herstellen, Migrationen ausfuehren
    /// 3. Services verdrahten
    /// 4. REST-API starten und auf Ctrl-C / SIGTERM warten
    pub async fn starten(self) -> Result<()> {
        tracing::info!(
            server_name = %self.config.server.name,
            api = %self.config.api_bind_adresse(),
            "Server startet"
        );

        if self.config.jwt.secret.is_empty() {
            bail!("JWT-Geheimnis ist nicht konfiguriert ([jwt] secret)");
        }
        if self.config.jwt.secret.len() < 32 {
            tracing::warn!("JWT-Geheimnis ist kuerzer als empfohlen (32 Bytes)");
        }

        let db = SqliteDb::oeffnen(&self.config.datenbank_konfig()).await?;
        let db = Arc::new(db);

        let tokens = Arc::new(TokenService::neu(self.config.jwt_konfig()));
        let auth = Arc::new(AuthService::neu(
            Arc::clone(&db),
            Arc::clone(&db),
            Arc::clone(&db),
            Arc::clone(&tokens),
        ));

        let state = AppState::neu(auth, tokens);

        let rest = RestServer::neu(RestServerKonfig {
            bind_addr: self.config.api_bind_adresse().parse()?,
            cors_origins: self.config.netzwerk.cors_origins.clone(),
        });
        rest.starten(state).await
    }
}
