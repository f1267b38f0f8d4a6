//! Axum-Extraktoren fuer Bearer-Authentifizierung und gepruefte JSON-Koerper

use async_trait::async_trait;
use axum::{
    extract::{FromRequest, FromRequestParts, Request},
    http::{header, request::Parts, HeaderMap},
    Json,
};
use einlass_auth::{AuthError, TokenClaims, TokenFehler};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::error::ApiFehler;
use crate::state::AppState;

/// Extrahiert das Bearer-Token aus dem Authorization-Header.
///
/// Das Schema wird ohne Beachtung der Gross-/Kleinschreibung verglichen.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let wert = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (schema, token) = wert.split_once(' ')?;
    let token = token.trim();
    (schema.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Gepruefte Claims des aufrufenden Benutzers
///
/// Fehlt der Header oder ist das Token ungueltig, antwortet der Handler mit 401.
#[derive(Debug, Clone)]
pub struct Authentifiziert(pub TokenClaims);

#[async_trait]
impl FromRequestParts<AppState> for Authentifiziert {
    type Rejection = ApiFehler;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)
            .ok_or(AuthError::TokenUngueltig(TokenFehler::Format))?;
        let claims = state.auth.authentifizieren(token)?;
        Ok(Self(claims))
    }
}

/// JSON-Koerper, der nach dem Deserialisieren mit `validator` geprueft wird
///
/// Syntax- und Validierungsfehler ergeben beide 422.
#[derive(Debug, Clone)]
pub struct GeprueftesJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for GeprueftesJson<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = ApiFehler;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(wert) = Json::<T>::from_request(req, state)
            .await
            .map_err(|ablehnung| ApiFehler::eingabe(ablehnung.body_text()))?;

        wert.validate()
            .map_err(|fehler| ApiFehler::eingabe(validierung_beschreiben(&fehler)))?;
        Ok(Self(wert))
    }
}

/// Fasst Validierungsfehler als "feld: meldung; ..." zusammen, sortiert nach Feld
fn validierung_beschreiben(fehler: &ValidationErrors) -> String {
    let mut felder: Vec<_> = fehler.field_errors().into_iter().collect();
    felder.sort_by(|a, b| a.0.cmp(&b.0));

    felder
        .into_iter()
        .flat_map(|(feld, fehler)| {
            fehler.iter().map(move |f| {
                let meldung = f
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| f.code.to_string());
                format!("{feld}: {meldung}")
            })
        })
        .collect::<Vec<_>>()
        .join("; ")
}
