//! Abbildung der Auth-Fehler auf HTTP-Antworten
//!
//! Jede Fehlerart hat einen festen Status und eine feste Meldung im Feld
//! `detail`. Interne Fehler werden nur geloggt, der Client sieht lediglich
//! "Internal server error".

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
};
use einlass_auth::AuthError;
use serde::Serialize;

/// Fehlerkoerper aller Endpunkte
#[derive(Debug, Serialize)]
pub struct FehlerAntwort {
    pub detail: String,
}

/// Fehler eines HTTP-Handlers
#[derive(Debug)]
pub struct ApiFehler(pub AuthError);

impl From<AuthError> for ApiFehler {
    fn from(fehler: AuthError) -> Self {
        Self(fehler)
    }
}

impl ApiFehler {
    /// Abgelehnte Eingabe (422)
    pub fn eingabe(msg: impl Into<String>) -> Self {
        Self(AuthError::eingabe(msg))
    }

    pub fn status(&self) -> StatusCode {
        match &self.0 {
            AuthError::EmailVergeben => StatusCode::BAD_REQUEST,
            AuthError::UngueltigeAnmeldedaten | AuthError::TokenUngueltig(_) => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::BenutzerNichtGefunden => StatusCode::NOT_FOUND,
            AuthError::UngueltigeEingabe(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AuthError::PasswortHashing(_)
            | AuthError::Konfiguration(_)
            | AuthError::Datenbank(_)
            | AuthError::Intern(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Meldung fuer den Client
    pub fn detail(&self) -> String {
        match &self.0 {
            AuthError::EmailVergeben => "Email already registered".into(),
            AuthError::UngueltigeAnmeldedaten => "Incorrect email or password".into(),
            AuthError::TokenUngueltig(_) => "Could not validate credentials".into(),
            AuthError::BenutzerNichtGefunden => "User not found".into(),
            AuthError::UngueltigeEingabe(msg) => msg.clone(),
            _ => "Internal server error".into(),
        }
    }
}

impl IntoResponse for ApiFehler {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(fehler = %self.0, "Anfrage mit internem Fehler abgebrochen");
        } else {
            tracing::debug!(status = status.as_u16(), fehler = %self.0, "Anfrage abgelehnt");
        }

        let mut response = (
            status,
            Json(FehlerAntwort {
                detail: self.detail(),
            }),
        )
            .into_response();

        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}
