//! Handler fuer Registrierung, Login und Benutzerabfrage

use axum::{extract::State, Json};
use einlass_auth::NeueRegistrierung;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::ApiFehler;
use crate::extract::{Authentifiziert, GeprueftesJson};
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct RegistrierungAnfrage {
    #[validate(email(message = "value is not a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "password must not be empty"))]
    pub password: String,
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginAnfrage {
    #[validate(email(message = "value is not a valid email address"))]
    pub email: String,
    pub password: String,
}

/// Antwort auf Registrierung und Login
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenAntwort {
    pub access_token: String,
    pub token_type: String,
}

impl TokenAntwort {
    fn bearer(token: String) -> Self {
        Self {
            access_token: token,
            token_type: "bearer".into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BenutzerAntwort {
    pub email: String,
    pub name: String,
}

/// POST /api/auth/register
pub async fn registrieren(
    State(state): State<AppState>,
    GeprueftesJson(anfrage): GeprueftesJson<RegistrierungAnfrage>,
) -> Result<Json<TokenAntwort>, ApiFehler> {
    let (_, token) = state
        .auth
        .registrieren(NeueRegistrierung {
            email: &anfrage.email,
            passwort: &anfrage.password,
            name: &anfrage.name,
        })
        .await?;
    Ok(Json(TokenAntwort::bearer(token.token)))
}

/// POST /api/auth/login
pub async fn anmelden(
    State(state): State<AppState>,
    GeprueftesJson(anfrage): GeprueftesJson<LoginAnfrage>,
) -> Result<Json<TokenAntwort>, ApiFehler> {
    let token = state.auth.anmelden(&anfrage.email, &anfrage.password).await?;
    Ok(Json(TokenAntwort::bearer(token.token)))
}

/// GET /api/auth/me
pub async fn ich(
    State(state): State<AppState>,
    Authentifiziert(claims): Authentifiziert,
) -> Result<Json<BenutzerAntwort>, ApiFehler> {
    let benutzer = state.auth.benutzer_zu_claims(&claims).await?;
    Ok(Json(BenutzerAntwort {
        email: benutzer.email,
        name: benutzer.name,
    }))
}
