//! Route-Definitionen und Middleware-Stapel der API (/api/...)

use axum::{
    http::HeaderValue,
    middleware,
    routing::{get, post},
    Router,
};
use einlass_observability::{request_timing_layer, timing_middleware};
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};

use crate::config::CorsEinstellungen;
use crate::handlers;
use crate::state::AppState;

/// Erstellt den /api/-Router ohne Middleware
pub fn api_router() -> Router<AppState> {
    Router::new()
        // Auth
        .route("/api/auth/register", post(handlers::auth::registrieren))
        .route("/api/auth/login", post(handlers::auth::anmelden))
        .route("/api/auth/me", get(handlers::auth::ich))
        // Geschuetzt
        .route("/api/protected", get(handlers::system::geschuetzt))
        // Oeffentlich
        .route("/api/health", get(handlers::system::health))
        .route("/api/test", get(handlers::system::test))
}

/// CORS fuer die konfigurierten Origins, mit Credentials
///
/// Bei erlaubten Credentials darf tower-http keine Wildcards verwenden,
/// daher werden Methoden und Header aus dem Preflight gespiegelt.
/// Origins mit `*` werden uebergangen; `ServerConfig::validieren` lehnt sie
/// schon beim Start ab.
pub fn cors_layer(cors: &CorsEinstellungen) -> CorsLayer {
    let origins: Vec<HeaderValue> = cors
        .origins()
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(wert) if !o.contains('*') => Some(wert),
            _ => {
                tracing::warn!(origin = %o, "Ungueltiger CORS-Origin wird ignoriert");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// Vollstaendige Anwendung mit Tracing, Timing und CORS
pub fn app(state: AppState, cors: &CorsEinstellungen) -> Router {
    api_router()
        .layer(middleware::from_fn(timing_middleware))
        .layer(request_timing_layer())
        .layer(cors_layer(cors))
        .with_state(state)
}
