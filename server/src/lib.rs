//! einlass-server – Bibliotheks-Root
//!
//! Deklariert alle Server-Module und stellt den oeffentlichen Einstiegspunkt
//! fuer Integrationstests bereit.

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod routes;
pub mod state;

use anyhow::{Context, Result};
use config::ServerConfig;
use einlass_auth::{AuthService, PasswortManager, TokenService};
use einlass_db::Datenbank;
use state::AppState;

/// Haelt den laufenden Server-Zustand zusammen
pub struct Server {
    pub config: ServerConfig,
}

impl Server {
    /// Erstellt einen neuen Server aus der gegebenen Konfiguration
    pub fn neu(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Baut den Auth-Service fuer eine bereits geoeffnete Datenbank
    pub fn auth_service(&self, db: Datenbank) -> Result<AuthService<Datenbank>> {
        let passwoerter = PasswortManager::neu(self.config.passwort)?;
        let tokens = TokenService::mit_systemuhr(self.config.token_konfig())?;
        Ok(AuthService::neu(std::sync::Arc::new(db), passwoerter, tokens))
    }

    /// Startet den HTTP-Server und laeuft bis zum Shutdown-Signal
    ///
    /// Reihenfolge:
    /// 1. Datenbankverbindung herstellen, Migrationen ausfuehren
    /// 2. Auth-Service aufbauen
    /// 3. HTTP-Listener binden
    /// 4. Auf Ctrl-C warten und geordnet beenden
    pub async fn starten(self) -> Result<()> {
        let db_config = self.config.datenbank_config();
        let db = Datenbank::oeffnen(&db_config)
            .await
            .context("Datenbank konnte nicht geoeffnet werden")?;
        tracing::info!(backend = %db.backend(), "Datenbank bereit");

        let auth = self.auth_service(db)?;
        let app = routes::app(AppState::neu(auth), &self.config.cors);

        let adresse = self.config.bind_adresse();
        let listener = tokio::net::TcpListener::bind(&adresse)
            .await
            .with_context(|| format!("Adresse {adresse} kann nicht gebunden werden"))?;

        tracing::info!(
            adresse = %adresse,
            origins = ?self.config.cors.origins(),
            token_minuten = self.config.auth.token_gueltigkeit_minuten,
            "HTTP-Server laeuft"
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server beendet");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(fehler = %e, "Ctrl-C-Handler konnte nicht installiert werden");
        return;
    }
    tracing::info!("Shutdown-Signal empfangen, Server wird beendet");
}
