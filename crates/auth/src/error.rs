//! Fehlertypen fuer den Auth-Service

use thiserror::Error;

/// Interne Ursache einer fehlgeschlagenen Token-Pruefung
///
/// Nach aussen werden alle Varianten gleich behandelt (401), intern bleiben
/// sie fuer Logging und Tests unterscheidbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenFehler {
    #[error("Token-Signatur ungueltig")]
    Signatur,

    #[error("Token-Struktur ungueltig")]
    Format,

    #[error("Token abgelaufen")]
    Abgelaufen,
}

/// Alle moeglichen Fehler im Auth-Service
#[derive(Debug, Error)]
pub enum AuthError {
    // --- Passwort ---
    #[error("Passwort-Hashing fehlgeschlagen: {0}")]
    PasswortHashing(String),

    // --- Registrierung ---
    #[error("E-Mail bereits registriert")]
    EmailVergeben,

    #[error("Ungueltige Eingabe: {0}")]
    UngueltigeEingabe(String),

    // --- Authentifizierung ---
    #[error("E-Mail oder Passwort falsch")]
    UngueltigeAnmeldedaten,

    #[error("Token ungueltig: {0}")]
    TokenUngueltig(#[from] TokenFehler),

    // --- Benutzerverwaltung ---
    #[error("Benutzer nicht gefunden")]
    BenutzerNichtGefunden,

    // --- Konfiguration ---
    #[error("Ungueltige Auth-Konfiguration: {0}")]
    Konfiguration(String),

    // --- Datenbank ---
    #[error("Datenbankfehler: {0}")]
    Datenbank(#[from] einlass_db::DbError),

    // --- Intern ---
    #[error("Interner Fehler: {0}")]
    Intern(String),
}

impl AuthError {
    pub fn intern(msg: impl Into<String>) -> Self {
        Self::Intern(msg.into())
    }

    pub fn eingabe(msg: impl Into<String>) -> Self {
        Self::UngueltigeEingabe(msg.into())
    }
}

/// Result-Alias fuer den Auth-Service
pub type AuthResult<T> = Result<T, AuthError>;
