//! Request-Timing fuer Axum
//!
//! `request_timing_layer` oeffnet pro Anfrage einen Span, `timing_middleware`
//! schreibt nach der Antwort ein einzelnes Log-Event mit Route, Status und
//! Dauer. Header werden nie geloggt, das Authorization-Token bleibt draussen.

use std::time::Instant;

use axum::{
    body::Body,
    extract::MatchedPath,
    http::{Request, Response},
    middleware::Next,
};
use tower_http::{
    classify::{ServerErrorsAsFailures, SharedClassifier},
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Span pro Anfrage auf INFO, Abschluss-Event von tower-http nur auf DEBUG
pub fn request_timing_layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::DEBUG))
}

/// Routen-Schablone (z.B. `/api/auth/me`) oder der rohe Pfad fuer unbekannte Routen
fn route_fuer_log(req: &Request<Body>) -> String {
    req.extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| req.uri().path().to_owned())
}

/// Axum-Middleware: misst die Antwortzeit und loggt strukturiert.
///
/// Serverfehler landen auf ERROR, alles andere auf INFO.
pub async fn timing_middleware(req: Request<Body>, next: Next) -> Response<Body> {
    let methode = req.method().clone();
    let route = route_fuer_log(&req);
    let start = Instant::now();

    let response = next.run(req).await;

    let dauer_ms = start.elapsed().as_millis();
    let status = response.status();

    if status.is_server_error() {
        tracing::error!(
            method = %methode,
            route = %route,
            status = status.as_u16(),
            duration_ms = dauer_ms,
            "HTTP-Anfrage mit Serverfehler"
        );
    } else {
        tracing::info!(
            method = %methode,
            route = %route,
            status = status.as_u16(),
            duration_ms = dauer_ms,
            "HTTP-Anfrage abgeschlossen"
        );
    }

    response
}
