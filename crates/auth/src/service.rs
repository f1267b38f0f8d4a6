//! Auth-Service fuer Einlass
//!
//! Zentraler Service fuer Registrierung, Login und die Aufloesung von
//! Bearer-Tokens. Nutzt das UserRepository, den PasswortManager und den
//! TokenService; eigener Zustand existiert nicht.

use std::sync::Arc;

use einlass_db::{models::NeuerBenutzer, repository::UserRepository, BenutzerRecord};

use crate::{
    error::{AuthError, AuthResult},
    password::PasswortManager,
    token::{AusgestelltesToken, TokenClaims, TokenService},
};

/// Eingabe fuer eine Registrierung
#[derive(Debug, Clone, Copy)]
pub struct NeueRegistrierung<'a> {
    pub email: &'a str,
    pub passwort: &'a str,
    pub name: &'a str,
}

/// Auth-Service – zentraler Einstiegspunkt fuer alle Authentifizierungsvorgaenge
pub struct AuthService<U: UserRepository> {
    user_repo: Arc<U>,
    passwoerter: PasswortManager,
    tokens: TokenService,
}

impl<U: UserRepository> AuthService<U> {
    /// Erstellt einen neuen AuthService
    pub fn neu(user_repo: Arc<U>, passwoerter: PasswortManager, tokens: TokenService) -> Self {
        Self {
            user_repo,
            passwoerter,
            tokens,
        }
    }

    /// Registriert einen neuen Benutzer und stellt ein Token fuer ihn aus
    ///
    /// Die Eindeutigkeit der E-Mail prueft die Datenbank beim Einfuegen.
    pub async fn registrieren(
        &self,
        eingabe: NeueRegistrierung<'_>,
    ) -> AuthResult<(BenutzerRecord, AusgestelltesToken)> {
        let email = email_normalisieren(eingabe.email)?;
        let name = eingabe.name.trim();
        if name.is_empty() {
            return Err(AuthError::eingabe("Name darf nicht leer sein"));
        }
        if eingabe.passwort.is_empty() {
            return Err(AuthError::eingabe("Passwort darf nicht leer sein"));
        }

        let passwort_hash = self.passwoerter.hashen(eingabe.passwort)?;

        let benutzer = self
            .user_repo
            .insert_if_absent(NeuerBenutzer {
                email: &email,
                name,
                password_hash: &passwort_hash,
            })
            .await?
            .ok_or(AuthError::EmailVergeben)?;

        let token = self.tokens.ausstellen(&benutzer.email)?;

        tracing::info!(user_id = %benutzer.id, "Neuer Benutzer registriert");

        Ok((benutzer, token))
    }

    /// Meldet einen Benutzer an und stellt ein neues Token aus
    ///
    /// Unbekannte E-Mail und falsches Passwort ergeben denselben Fehler.
    pub async fn anmelden(&self, email: &str, passwort: &str) -> AuthResult<AusgestelltesToken> {
        let Ok(email) = email_normalisieren(email) else {
            return Err(AuthError::UngueltigeAnmeldedaten);
        };

        let benutzer = match self.user_repo.find_by_email(&email).await? {
            Some(b) => b,
            None => {
                self.passwoerter.attrappe_verifizieren(passwort);
                tracing::debug!("Login fuer unbekannte E-Mail");
                return Err(AuthError::UngueltigeAnmeldedaten);
            }
        };

        if !self.passwoerter.verifizieren(passwort, &benutzer.password_hash) {
            tracing::warn!(user_id = %benutzer.id, "Fehlgeschlagener Login-Versuch");
            return Err(AuthError::UngueltigeAnmeldedaten);
        }

        let token = self.tokens.ausstellen(&benutzer.email)?;

        tracing::info!(user_id = %benutzer.id, "Benutzer angemeldet");

        Ok(token)
    }

    /// Prueft ein Bearer-Token ohne Datenbankzugriff
    pub fn authentifizieren(&self, token: &str) -> AuthResult<TokenClaims> {
        self.tokens.pruefen(token).map_err(|fehler| {
            tracing::debug!(grund = %fehler, "Token abgelehnt");
            AuthError::TokenUngueltig(fehler)
        })
    }

    /// Prueft ein Bearer-Token und laedt den zugehoerigen Benutzer
    ///
    /// Ein gueltiges Token kann auf einen inzwischen entfernten Benutzer zeigen.
    pub async fn aktueller_benutzer(&self, token: &str) -> AuthResult<BenutzerRecord> {
        let claims = self.authentifizieren(token)?;
        self.benutzer_zu_claims(&claims).await
    }

    /// Loest das Subjekt bereits gepruefter Claims zum Benutzer auf
    pub async fn benutzer_zu_claims(&self, claims: &TokenClaims) -> AuthResult<BenutzerRecord> {
        self.user_repo
            .find_by_subject(&claims.sub)
            .await?
            .ok_or(AuthError::BenutzerNichtGefunden)
    }
}

/// Trimmt und verkleinert die E-Mail und prueft eine Minimalform `lokal@domain`
///
/// Verkleinert wird die ganze Adresse, nicht nur die Domain: `Ada@x.com` und
/// `ada@x.com` sind dasselbe Konto.
fn email_normalisieren(email: &str) -> AuthResult<String> {
    let email = email.trim().to_lowercase();
    match email.split_once('@') {
        Some((lokal, domain))
            if !lokal.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace) =>
        {
            Ok(email)
        }
        _ => Err(AuthError::eingabe("Ungueltige E-Mail-Adresse")),
    }
}
