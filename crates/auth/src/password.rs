//! Passwort-Hashing mit Argon2id
//!
//! Stellt sichere Passwort-Hashfunktionen mit Argon2id bereit.
//! Argon2id ist der empfohlene Algorithmus gemaess OWASP-Richtlinien.
//! Der Arbeitsfaktor wird beim Start festgelegt und danach nicht mehr geaendert.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use serde::{Deserialize, Serialize};

use crate::error::{AuthError, AuthResult};

/// Argon2id-Arbeitsfaktor
///
/// Standardwerte gemaess OWASP-Empfehlungen (Stand 2024):
/// - Speicher: 64 MiB
/// - Iterationen: 3
/// - Parallelismus: 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PasswortParameter {
    /// m_cost in KiB
    pub speicher_kib: u32,
    /// t_cost
    pub iterationen: u32,
    /// p_cost
    pub parallelitaet: u32,
}

impl Default for PasswortParameter {
    fn default() -> Self {
        Self {
            speicher_kib: 64 * 1024,
            iterationen: 3,
            parallelitaet: 1,
        }
    }
}

/// Hasht und verifiziert Passwoerter mit einem festen Arbeitsfaktor
#[derive(Debug, Clone)]
pub struct PasswortManager {
    params: Params,
    /// Vergleichshash fuer unbekannte Benutzer, damit beide Login-Pfade gleich teuer sind
    attrappe: String,
}

impl PasswortManager {
    /// Erstellt einen neuen PasswortManager
    ///
    /// Gibt `AuthError::Konfiguration` zurueck wenn Argon2 die Parameter ablehnt.
    pub fn neu(parameter: PasswortParameter) -> AuthResult<Self> {
        let params = Params::new(
            parameter.speicher_kib,
            parameter.iterationen,
            parameter.parallelitaet,
            None, // output_len: Standard (32 Bytes)
        )
        .map_err(|e| AuthError::Konfiguration(format!("Argon2-Parameter ungueltig: {e}")))?;

        let mut manager = Self {
            params,
            attrappe: String::new(),
        };
        manager.attrappe = manager.hashen("einlass-attrappe")?;
        Ok(manager)
    }

    fn argon2_instanz(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hasht ein Passwort mit Argon2id und einem zufaelligen Salt
    ///
    /// Gibt den PHC-String zurueck (inkl. Algorithmus, Parameter und Salt).
    pub fn hashen(&self, passwort: &str) -> AuthResult<String> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2_instanz()
            .hash_password(passwort.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::PasswortHashing(e.to_string()))
    }

    /// Verifiziert ein Passwort gegen einen gespeicherten PHC-Hash
    ///
    /// Die Parameter und das Salt stammen aus dem Hash selbst, der Vergleich
    /// laeuft in konstanter Zeit. Ein unlesbarer Hash ergibt `false`.
    pub fn verifizieren(&self, passwort: &str, hash: &str) -> bool {
        let parsed_hash = match PasswordHash::new(hash) {
            Ok(h) => h,
            Err(e) => {
                tracing::warn!(fehler = %e, "Gespeicherter Passwort-Hash ist nicht lesbar");
                return false;
            }
        };

        match self
            .argon2_instanz()
            .verify_password(passwort.as_bytes(), &parsed_hash)
        {
            Ok(()) => true,
            Err(argon2::password_hash::Error::Password) => false,
            Err(e) => {
                tracing::warn!(fehler = %e, "Passwort-Verifikation fehlgeschlagen");
                false
            }
        }
    }

    /// Verifiziert gegen den internen Vergleichshash und gibt immer `false` zurueck
    pub fn attrappe_verifizieren(&self, passwort: &str) -> bool {
        let _ = self.verifizieren(passwort, &self.attrappe);
        false
    }
}

#[cfg(test)]
pub(crate) fn test_manager() -> PasswortManager {
    PasswortManager::neu(PasswortParameter {
        speicher_kib: 1024,
        iterationen: 1,
        parallelitaet: 1,
    })
    .expect("Test-Parameter muessen gueltig sein")
}
