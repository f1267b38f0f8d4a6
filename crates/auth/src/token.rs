//! Zustandslose Bearer-Tokens (HS256-JWT)
//!
//! Ein Token enthaelt Subjekt (E-Mail), Ausstellungs- und Ablaufzeitpunkt.
//! Gueltig ist es allein durch Signatur und Ablauf; es gibt keine
//! Widerrufsliste. Ein neuer Signaturschluessel macht alle ausgestellten
//! Tokens ungueltig.

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

use crate::error::{AuthError, AuthResult, TokenFehler};
use crate::uhr::{SystemUhr, Uhr};

/// Claims eines Einlass-Tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subjekt: E-Mail des Benutzers
    pub sub: String,
    /// Ausgestellt am (Unix-Sekunden)
    pub iat: i64,
    /// Laeuft ab am (Unix-Sekunden)
    pub exp: i64,
}

impl TokenClaims {
    pub fn laeuft_ab_am(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.exp, 0).single().unwrap_or_default()
    }
}

/// Ergebnis einer Token-Ausstellung
#[derive(Debug, Clone)]
pub struct AusgestelltesToken {
    pub token: String,
    pub laeuft_ab_am: DateTime<Utc>,
}

/// Konfiguration des Token-Service, einmal beim Start geladen
#[derive(Clone)]
pub struct TokenKonfig {
    /// HMAC-Schluessel
    pub geheimnis: String,
    /// Standard-Gueltigkeit neuer Tokens
    pub gueltigkeit: Duration,
}

impl std::fmt::Debug for TokenKonfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenKonfig")
            .field("geheimnis", &"***")
            .field("gueltigkeit", &self.gueltigkeit)
            .finish()
    }
}

/// Stellt Tokens aus und prueft sie
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    gueltigkeit: Duration,
    uhr: Arc<dyn Uhr>,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("gueltigkeit", &self.gueltigkeit)
            .field("uhr", &self.uhr)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    /// Erstellt einen Token-Service mit der angegebenen Zeitquelle
    ///
    /// Ein leeres Geheimnis oder eine negative Gueltigkeit werden abgelehnt.
    pub fn neu(konfig: TokenKonfig, uhr: Arc<dyn Uhr>) -> AuthResult<Self> {
        if konfig.geheimnis.is_empty() {
            return Err(AuthError::Konfiguration(
                "Token-Geheimnis darf nicht leer sein".into(),
            ));
        }
        if konfig.gueltigkeit < Duration::zero() {
            return Err(AuthError::Konfiguration(
                "Token-Gueltigkeit darf nicht negativ sein".into(),
            ));
        }

        // Ablauf wird gegen die eigene Uhr geprueft, nicht gegen die Systemzeit
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["sub", "exp"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(konfig.geheimnis.as_bytes()),
            decoding_key: DecodingKey::from_secret(konfig.geheimnis.as_bytes()),
            validation,
            gueltigkeit: konfig.gueltigkeit,
            uhr,
        })
    }

    /// Erstellt einen Token-Service mit der Systemuhr
    pub fn mit_systemuhr(konfig: TokenKonfig) -> AuthResult<Self> {
        Self::neu(konfig, Arc::new(SystemUhr))
    }

    /// Stellt ein Token mit der konfigurierten Gueltigkeit aus
    pub fn ausstellen(&self, subjekt: &str) -> AuthResult<AusgestelltesToken> {
        self.ausstellen_mit_ttl(subjekt, self.gueltigkeit)
    }

    /// Stellt ein Token aus, das `ttl` nach jetzt ablaeuft
    ///
    /// Bei `ttl = 0` ist das Token sofort abgelaufen.
    pub fn ausstellen_mit_ttl(&self, subjekt: &str, ttl: Duration) -> AuthResult<AusgestelltesToken> {
        if subjekt.is_empty() {
            return Err(AuthError::eingabe("Token-Subjekt darf nicht leer sein"));
        }
        if ttl < Duration::zero() {
            return Err(AuthError::eingabe("Token-Gueltigkeit darf nicht negativ sein"));
        }

        let jetzt = self.uhr.jetzt();
        let ablauf = jetzt
            .checked_add_signed(ttl)
            .ok_or_else(|| AuthError::eingabe("Token-Gueltigkeit zu gross"))?;

        let claims = TokenClaims {
            sub: subjekt.to_string(),
            iat: jetzt.timestamp(),
            exp: ablauf.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::intern(format!("Token-Signierung fehlgeschlagen: {e}")))?;

        Ok(AusgestelltesToken {
            token,
            laeuft_ab_am: claims.laeuft_ab_am(),
        })
    }

    /// Prueft Signatur und Ablauf eines Tokens und gibt die Claims zurueck
    pub fn pruefen(&self, token: &str) -> Result<TokenClaims, TokenFehler> {
        let daten = decode::<TokenClaims>(token, &self.decoding_key, &self.validation).map_err(
            |e| match e.kind() {
                ErrorKind::InvalidSignature => TokenFehler::Signatur,
                ErrorKind::ExpiredSignature => TokenFehler::Abgelaufen,
                _ => TokenFehler::Format,
            },
        )?;

        let claims = daten.claims;
        if claims.sub.is_empty() {
            return Err(TokenFehler::Format);
        }
        if self.uhr.jetzt().timestamp() >= claims.exp {
            return Err(TokenFehler::Abgelaufen);
        }

        Ok(claims)
    }
}
