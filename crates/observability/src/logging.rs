//! Structured Logging Setup via tracing-subscriber
//!
//! Konfigurierbar per Umgebungsvariable:
//! - `EINLASS_LOG_LEVEL`: Log-Filter (z.B. `info` oder `einlass_auth=debug`), Standard: info
//! - `EINLASS_LOG_FORMAT`: Format (text/json), Standard: text

use tracing_subscriber::{fmt, EnvFilter};

/// Umgebungsvariable fuer den Log-Filter
pub const LOG_LEVEL_ENV: &str = "EINLASS_LOG_LEVEL";
/// Umgebungsvariable fuer das Log-Format
pub const LOG_FORMAT_ENV: &str = "EINLASS_LOG_FORMAT";

/// Initialisiert das Logging-System.
///
/// Die Umgebungsvariablen haben Vorrang vor den uebergebenen Werten.
/// Faellt auf `info` / `text` zurueck falls beides ungueltig ist.
/// Ein zweiter Aufruf im selben Prozess ist wirkungslos.
pub fn logging_initialisieren(level: &str, format: &str) {
    let filter = EnvFilter::try_from_env(LOG_LEVEL_ENV)
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let format_env = std::env::var(LOG_FORMAT_ENV).unwrap_or_else(|_| format.to_string());

    let ergebnis = match format_env.as_str() {
        "json" => fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(true)
            .with_current_span(true)
            .try_init(),
        _ => fmt().with_env_filter(filter).with_target(true).try_init(),
    };

    if ergebnis.is_err() {
        tracing::debug!("Logging war bereits initialisiert");
    }
}

/// Unterstuetzte Ausgabeformate
pub const LOG_FORMATE: &[&str] = &["text", "json"];

/// Prueft einen Log-Filter aus Level-Direktiven.
///
/// Erlaubt sind ein globales Level (`info`) und `ziel=level`-Paare, durch
/// Komma getrennt, z.B. `warn,einlass_auth=debug`.
pub fn log_level_gueltig(filter: &str) -> bool {
    fn ist_level(wert: &str) -> bool {
        matches!(
            wert.trim().to_ascii_lowercase().as_str(),
            "trace" | "debug" | "info" | "warn" | "error" | "off"
        )
    }

    let direktiven_ok = filter.split(',').all(|direktive| match direktive.split_once('=') {
        Some((ziel, level)) => !ziel.trim().is_empty() && ist_level(level),
        None => ist_level(direktive),
    });

    direktiven_ok && EnvFilter::try_new(filter).is_ok()
}

/// Prueft ob das Ausgabeformat unterstuetzt wird
pub fn log_format_gueltig(format: &str) -> bool {
    LOG_FORMATE.contains(&format)
}
