//! einlass-auth – Authentifizierungskern
//!
//! Dieses Crate implementiert:
//! - Passwort-Hashing mit Argon2id (einstellbarer Arbeitsfaktor)
//! - Zustandslose, signierte Bearer-Tokens mit Ablaufzeit
//! - Eine austauschbare Zeitquelle fuer deterministische Ablauftests
//! - AuthService (Registrierung, Login, Aufloesung des aktuellen Benutzers)

pub mod error;
pub mod password;
pub mod service;
pub mod token;
pub mod uhr;

// Bequeme Re-Exporte
pub use error::{AuthError, AuthResult, TokenFehler};
pub use password::{PasswortManager, PasswortParameter};
pub use service::{AuthService, NeueRegistrierung};
pub use token::{AusgestelltesToken, TokenClaims, TokenKonfig, TokenService};
pub use uhr::{FesteUhr, SystemUhr, Uhr};
