//! Server-Konfiguration
//!
//! Wird beim Start aus einer optionalen TOML-Datei geladen und danach von
//! Umgebungsvariablen ueberschrieben. Bis auf das Signatur-Geheimnis haben
//! alle Felder sinnvolle Standardwerte.

use einlass_auth::{PasswortParameter, TokenKonfig};
use einlass_db::{DatabaseBackend, DatabaseConfig};
use einlass_observability::{log_format_gueltig, log_level_gueltig};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Umgebungsvariable fuer den Pfad der Konfigurationsdatei
pub const CONFIG_PFAD_ENV: &str = "EINLASS_CONFIG";

/// Fehler beim Anwenden oder Pruefen der Konfiguration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KonfigFehler {
    #[error("SECRET_KEY ist nicht gesetzt oder leer")]
    GeheimnisFehlt,

    #[error("ACCESS_TOKEN_EXPIRE_MINUTES muss groesser als 0 sein")]
    GueltigkeitNull,

    #[error("Umgebungsvariable {variable} hat ungueltigen Wert '{wert}'")]
    UngueltigerWert { variable: &'static str, wert: String },

    #[error("Datenbank-Konfiguration ungueltig: {0}")]
    Datenbank(String),

    #[error("CORS-Origin '{0}' mit Wildcard ist zusammen mit Credentials nicht erlaubt")]
    WildcardOrigin(String),

    #[error("Log-Level '{0}' ist ungueltig")]
    LogLevel(String),

    #[error("Log-Format '{0}' ist ungueltig (erlaubt: text, json)")]
    LogFormat(String),
}

/// Vollstaendige Server-Konfiguration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Netzwerk-Einstellungen
    pub netzwerk: NetzwerkEinstellungen,
    /// Datenbank-Einstellungen
    pub datenbank: DatenbankEinstellungen,
    /// Token-Einstellungen
    pub auth: AuthEinstellungen,
    /// Argon2-Arbeitsfaktor
    pub passwort: PasswortParameter,
    /// Erlaubte Browser-Origins
    pub cors: CorsEinstellungen,
    /// Logging-Einstellungen
    pub logging: LoggingEinstellungen,
    /// Ob die Konfigurationsdatei gelesen wurde
    #[serde(skip)]
    pub datei_gefunden: bool,
    /// Ob `DATABASE_URL` beim Laden gesetzt war
    #[serde(skip)]
    pub datenbank_url_aus_umgebung: bool,
}

/// Netzwerk-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetzwerkEinstellungen {
    pub bind_adresse: String,
    pub port: u16,
}

impl Default for NetzwerkEinstellungen {
    fn default() -> Self {
        Self {
            bind_adresse: "0.0.0.0".into(),
            port: 8000,
        }
    }
}

/// Datenbank-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatenbankEinstellungen {
    /// Verbindungs-URL, das Schema bestimmt das Backend
    pub url: String,
    /// Maximale Verbindungspool-Groesse
    pub max_verbindungen: u32,
    /// WAL-Modus fuer SQLite
    pub sqlite_wal: bool,
}

impl Default for DatenbankEinstellungen {
    fn default() -> Self {
        let standard = DatabaseConfig::default();
        Self {
            url: standard.url,
            max_verbindungen: standard.max_verbindungen,
            sqlite_wal: standard.sqlite_wal,
        }
    }
}

/// Token-Einstellungen
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthEinstellungen {
    /// HMAC-Geheimnis fuer die Token-Signatur
    pub geheimnis: String,
    pub token_gueltigkeit_minuten: u32,
}

impl Default for AuthEinstellungen {
    fn default() -> Self {
        Self {
            geheimnis: String::new(),
            token_gueltigkeit_minuten: 30,
        }
    }
}

impl std::fmt::Debug for AuthEinstellungen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthEinstellungen")
            .field("geheimnis", &"***")
            .field("token_gueltigkeit_minuten", &self.token_gueltigkeit_minuten)
            .finish()
    }
}

/// Erlaubte Browser-Origins
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsEinstellungen {
    /// Origin des Frontends
    pub frontend_url: String,
    /// Weitere erlaubte Origins
    pub zusaetzliche_origins: Vec<String>,
}

impl Default for CorsEinstellungen {
    fn default() -> Self {
        Self {
            frontend_url: "http://localhost:4200".into(),
            zusaetzliche_origins: vec!["http://localhost:4200".into()],
        }
    }
}

impl CorsEinstellungen {
    /// Alle erlaubten Origins ohne Duplikate, Frontend zuerst
    pub fn origins(&self) -> Vec<String> {
        let mut origins: Vec<String> = Vec::new();
        for origin in std::iter::once(&self.frontend_url).chain(&self.zusaetzliche_origins) {
            let origin = origin.trim().trim_end_matches('/');
            if !origin.is_empty() && !origins.iter().any(|o| o == origin) {
                origins.push(origin.to_string());
            }
        }
        origins
    }
}

/// Logging-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingEinstellungen {
    /// Log-Level: "trace", "debug", "info", "warn", "error"
    pub level: String,
    /// Format: "json" oder "text"
    pub format: String,
}

impl Default for LoggingEinstellungen {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "text".into(),
        }
    }
}

impl ServerConfig {
    /// Laedt die Konfiguration aus einer TOML-Datei und wendet die
    /// Umgebungsvariablen an.
    /// Fehlt die Datei, wird mit Standardwerten weitergemacht.
    pub fn laden(pfad: &str) -> anyhow::Result<Self> {
        let mut config = Self::aus_datei(pfad)?;
        config.datenbank_url_aus_umgebung =
            config.umgebung_anwenden(|name| std::env::var(name).ok())?;
        config.validieren()?;
        Ok(config)
    }

    /// Liest nur die TOML-Datei
    pub fn aus_datei(pfad: &str) -> anyhow::Result<Self> {
        match std::fs::read_to_string(pfad) {
            Ok(inhalt) => {
                let mut config: Self = toml::from_str(&inhalt)
                    .map_err(|e| anyhow::anyhow!("Konfigurationsfehler in '{pfad}': {e}"))?;
                config.datei_gefunden = true;
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(anyhow::anyhow!(
                "Konfigurationsdatei '{pfad}' nicht lesbar: {e}"
            )),
        }
    }

    /// Ueberschreibt Felder mit Werten aus der Umgebung.
    ///
    /// `lesen` liefert den Wert einer Variablen. Gibt zurueck, ob
    /// `DATABASE_URL` gesetzt war.
    pub fn umgebung_anwenden<F>(&mut self, lesen: F) -> Result<bool, KonfigFehler>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(wert) = lesen("SECRET_KEY") {
            self.auth.geheimnis = wert;
        }
        if let Some(wert) = lesen("ACCESS_TOKEN_EXPIRE_MINUTES") {
            self.auth.token_gueltigkeit_minuten = zahl_lesen("ACCESS_TOKEN_EXPIRE_MINUTES", &wert)?;
        }
        if let Some(wert) = lesen("FRONTEND_URL") {
            self.cors.frontend_url = wert;
        }
        if let Some(wert) = lesen("HOST") {
            self.netzwerk.bind_adresse = wert;
        }
        if let Some(wert) = lesen("PORT") {
            self.netzwerk.port = zahl_lesen("PORT", &wert)?;
        }
        if let Some(wert) = lesen("EINLASS_LOG_LEVEL") {
            self.logging.level = wert;
        }
        if let Some(wert) = lesen("EINLASS_LOG_FORMAT") {
            self.logging.format = wert;
        }

        let url = lesen("DATABASE_URL").filter(|u| !u.trim().is_empty());
        let gesetzt = url.is_some();
        if let Some(url) = url {
            self.datenbank.url = url;
        }
        Ok(gesetzt)
    }

    /// Prueft die Konfiguration auf Werte, mit denen der Server nicht starten darf
    pub fn validieren(&self) -> Result<(), KonfigFehler> {
        if self.auth.geheimnis.trim().is_empty() {
            return Err(KonfigFehler::GeheimnisFehlt);
        }
        if self.auth.token_gueltigkeit_minuten == 0 {
            return Err(KonfigFehler::GueltigkeitNull);
        }
        self.datenbank_config()
            .backend()
            .map_err(|e| KonfigFehler::Datenbank(e.to_string()))?;
        // tower-http lehnt "*" in einer Origin-Liste mit Panic ab
        if let Some(origin) = self.cors.origins().into_iter().find(|o| o.contains('*')) {
            return Err(KonfigFehler::WildcardOrigin(origin));
        }
        if !log_level_gueltig(&self.logging.level) {
            return Err(KonfigFehler::LogLevel(self.logging.level.clone()));
        }
        if !log_format_gueltig(&self.logging.format) {
            return Err(KonfigFehler::LogFormat(self.logging.format.clone()));
        }
        Ok(())
    }

    /// True wenn weder Umgebung noch Datei eine Datenbank angeben und die
    /// lokale SQLite-Datei verwendet wird
    pub fn nutzt_standard_datenbank(&self) -> bool {
        !self.datenbank_url_aus_umgebung
            && self.datenbank.url == DatenbankEinstellungen::default().url
            && matches!(self.datenbank_config().backend(), Ok(DatabaseBackend::Sqlite))
    }

    /// Meldet die Herkunft der Konfiguration, sobald das Logging laeuft
    pub fn herkunft_protokollieren(&self, pfad: &str) {
        if self.datei_gefunden {
            tracing::info!(pfad = pfad, "Konfigurationsdatei geladen");
        } else {
            tracing::info!(
                pfad = pfad,
                "Keine Konfigurationsdatei gefunden, verwende Standardwerte"
            );
        }
        if self.nutzt_standard_datenbank() {
            tracing::warn!(
                url = %self.datenbank.url,
                "DATABASE_URL nicht gesetzt, verwende lokale SQLite-Datei"
            );
        }
    }

    /// Gibt die Bind-Adresse fuer den HTTP-Server zurueck
    pub fn bind_adresse(&self) -> String {
        format!("{}:{}", self.netzwerk.bind_adresse, self.netzwerk.port)
    }

    pub fn datenbank_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: self.datenbank.url.clone(),
            max_verbindungen: self.datenbank.max_verbindungen,
            sqlite_wal: self.datenbank.sqlite_wal,
        }
    }

    pub fn token_konfig(&self) -> TokenKonfig {
        TokenKonfig {
            geheimnis: self.auth.geheimnis.clone(),
            gueltigkeit: chrono::Duration::minutes(i64::from(self.auth.token_gueltigkeit_minuten)),
        }
    }
}

fn zahl_lesen<T: std::str::FromStr>(variable: &'static str, wert: &str) -> Result<T, KonfigFehler> {
    wert.trim().parse().map_err(|_| KonfigFehler::UngueltigerWert {
        variable,
        wert: wert.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn umgebung(paare: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let werte: HashMap<String, String> = paare
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| werte.get(name).cloned()
    }

    #[test]
    fn standardwerte() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.netzwerk.port, 8000);
        assert_eq!(cfg.bind_adresse(), "0.0.0.0:8000");
        assert_eq!(cfg.datenbank.url, "sqlite://local.db");
        assert_eq!(cfg.auth.token_gueltigkeit_minuten, 30);
        assert_eq!(cfg.cors.frontend_url, "http://localhost:4200");
        assert_eq!(cfg.logging.level, "info");
        assert_eq!(cfg.passwort, PasswortParameter::default());
    }

    #[test]
    fn standard_config_ohne_geheimnis_ist_ungueltig() {
        assert_eq!(
            ServerConfig::default().validieren(),
            Err(KonfigFehler::GeheimnisFehlt)
        );
    }

    #[test]
    fn config_aus_toml_string() {
        let toml = r#"
            [netzwerk]
            port = 9000

            [auth]
            geheimnis = "aus-der-datei"

            [passwort]
            speicher_kib = 19456
            iterationen = 2
        "#;
        let cfg: ServerConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.netzwerk.port, 9000);
        assert_eq!(cfg.auth.geheimnis, "aus-der-datei");
        assert_eq!(cfg.passwort.speicher_kib, 19456);
        assert_eq!(cfg.passwort.iterationen, 2);
        // Nicht angegebene Felder behalten Standardwerte
        assert_eq!(cfg.netzwerk.bind_adresse, "0.0.0.0");
        assert_eq!(cfg.auth.token_gueltigkeit_minuten, 30);
        assert_eq!(cfg.passwort.parallelitaet, 1);
        assert!(cfg.validieren().is_ok());
    }

    #[test]
    fn umgebung_ueberschreibt_datei() {
        let mut cfg: ServerConfig = toml::from_str("[auth]\ngeheimnis = \"alt\"").unwrap();
        let gesetzt = cfg
            .umgebung_anwenden(umgebung(&[
                ("SECRET_KEY", "neu"),
                ("ACCESS_TOKEN_EXPIRE_MINUTES", "5"),
                ("FRONTEND_URL", "https://app.example.org"),
                ("DATABASE_URL", "postgres://einlass@localhost/einlass"),
                ("HOST", "127.0.0.1"),
                ("PORT", "8081"),
                ("EINLASS_LOG_FORMAT", "json"),
            ]))
            .unwrap();

        assert!(gesetzt);
        assert_eq!(cfg.auth.geheimnis, "neu");
        assert_eq!(cfg.auth.token_gueltigkeit_minuten, 5);
        assert_eq!(cfg.cors.frontend_url, "https://app.example.org");
        assert_eq!(cfg.datenbank.url, "postgres://einlass@localhost/einlass");
        assert_eq!(cfg.bind_adresse(), "127.0.0.1:8081");
        assert_eq!(cfg.logging.format, "json");
        assert_eq!(cfg.token_konfig().gueltigkeit, chrono::Duration::minutes(5));
        assert!(cfg.validieren().is_ok());
    }

    #[test]
    fn fehlende_database_url_wird_gemeldet() {
        let mut cfg = ServerConfig::default();
        let gesetzt = cfg
            .umgebung_anwenden(umgebung(&[("SECRET_KEY", "s"), ("DATABASE_URL", "  ")]))
            .unwrap();
        assert!(!gesetzt);
        assert_eq!(cfg.datenbank.url, "sqlite://local.db");
    }

    #[test]
    fn nicht_numerische_werte_werden_abgelehnt() {
        let mut cfg = ServerConfig::default();
        let fehler = cfg
            .umgebung_anwenden(umgebung(&[("ACCESS_TOKEN_EXPIRE_MINUTES", "dreissig")]))
            .unwrap_err();
        assert_eq!(
            fehler,
            KonfigFehler::UngueltigerWert {
                variable: "ACCESS_TOKEN_EXPIRE_MINUTES",
                wert: "dreissig".into()
            }
        );

        let mut cfg = ServerConfig::default();
        assert!(cfg.umgebung_anwenden(umgebung(&[("PORT", "70000")])).is_err());
    }

    #[test]
    fn gueltigkeit_null_wird_abgelehnt() {
        let mut cfg = ServerConfig::default();
        cfg.umgebung_anwenden(umgebung(&[
            ("SECRET_KEY", "geheim"),
            ("ACCESS_TOKEN_EXPIRE_MINUTES", "0"),
        ]))
        .unwrap();
        assert_eq!(cfg.validieren(), Err(KonfigFehler::GueltigkeitNull));
    }

    #[test]
    fn unbekanntes_datenbankschema_wird_abgelehnt() {
        let mut cfg = ServerConfig::default();
        cfg.auth.geheimnis = "geheim".into();
        cfg.datenbank.url = "mysql://localhost/einlass".into();
        assert!(matches!(cfg.validieren(), Err(KonfigFehler::Datenbank(_))));
    }

    #[test]
    fn cors_origins_ohne_duplikate() {
        let cors = CorsEinstellungen {
            frontend_url: "https://app.example.org/".into(),
            zusaetzliche_origins: vec![
                "http://localhost:4200".into(),
                "https://app.example.org".into(),
                "".into(),
            ],
        };
        assert_eq!(
            cors.origins(),
            vec!["https://app.example.org", "http://localhost:4200"]
        );
        assert_eq!(CorsEinstellungen::default().origins(), vec!["http://localhost:4200"]);
    }

    #[test]
    fn debug_verbirgt_geheimnis() {
        let mut cfg = ServerConfig::default();
        cfg.auth.geheimnis = "streng-geheim".into();
        let ausgabe = format!("{cfg:?}");
        assert!(!ausgabe.contains("streng-geheim"));
    }

    #[test]
    fn fehlende_datei_ergibt_standardwerte() {
        let cfg = ServerConfig::aus_datei("/gibt/es/nicht/einlass.toml").unwrap();
        assert_eq!(cfg.netzwerk.port, 8000);
        assert!(!cfg.datei_gefunden);
    }

    #[test]
    fn gelesene_datei_wird_vermerkt() {
        let pfad = std::env::temp_dir().join(format!("einlass-config-{}.toml", std::process::id()));
        std::fs::write(&pfad, "[netzwerk]\nport = 9100\n").unwrap();

        let cfg = ServerConfig::aus_datei(pfad.to_str().unwrap()).unwrap();
        std::fs::remove_file(&pfad).unwrap();

        assert!(cfg.datei_gefunden);
        assert_eq!(cfg.netzwerk.port, 9100);
    }

    fn gueltige_config() -> ServerConfig {
        let mut cfg = ServerConfig::default();
        cfg.auth.geheimnis = "geheim".into();
        cfg
    }

    #[test]
    fn wildcard_origin_wird_abgelehnt() {
        let mut cfg = gueltige_config();
        cfg.cors.frontend_url = "*".into();
        assert_eq!(cfg.validieren(), Err(KonfigFehler::WildcardOrigin("*".into())));

        let mut cfg = gueltige_config();
        cfg.cors
            .zusaetzliche_origins
            .push("https://*.up.railway.app".into());
        assert!(matches!(cfg.validieren(), Err(KonfigFehler::WildcardOrigin(_))));
    }

    #[test]
    fn wildcard_aus_umgebung_wird_abgelehnt() {
        let mut cfg = gueltige_config();
        cfg.umgebung_anwenden(umgebung(&[("FRONTEND_URL", "*")])).unwrap();
        assert!(matches!(cfg.validieren(), Err(KonfigFehler::WildcardOrigin(_))));
    }

    #[test]
    fn ungueltiges_log_format_wird_abgelehnt() {
        let mut cfg = gueltige_config();
        cfg.logging.format = "xml".into();
        assert_eq!(cfg.validieren(), Err(KonfigFehler::LogFormat("xml".into())));
    }

    #[test]
    fn log_filter_wird_geprueft() {
        let mut cfg = gueltige_config();
        cfg.logging.level = "warn,einlass_auth=debug".into();
        assert!(cfg.validieren().is_ok());

        cfg.logging.level = "gespraechig".into();
        assert_eq!(
            cfg.validieren(),
            Err(KonfigFehler::LogLevel("gespraechig".into()))
        );
    }

    #[test]
    fn standard_datenbank_nur_ohne_eigene_url() {
        let cfg = gueltige_config();
        assert!(cfg.nutzt_standard_datenbank());

        // URL aus der Datei, nicht aus der Umgebung
        let mut cfg = gueltige_config();
        cfg.datenbank.url = "postgres://einlass@db/einlass".into();
        assert!(!cfg.nutzt_standard_datenbank());

        let mut cfg = gueltige_config();
        cfg.datenbank_url_aus_umgebung = true;
        assert!(!cfg.nutzt_standard_datenbank());
    }
}
