//! Oeffentliche Status-Endpunkte und die geschuetzte Beispielroute

use axum::Json;
use serde_json::{json, Value};

use crate::extract::Authentifiziert;

/// GET /api/protected
pub async fn geschuetzt(Authentifiziert(claims): Authentifiziert) -> Json<Value> {
    Json(json!({
        "message": "This is a protected route",
        "user": claims.sub,
    }))
}

/// GET /api/health
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "message": "Backend is running" }))
}

/// GET /api/test
pub async fn test() -> Json<Value> {
    Json(json!({ "data": "Hello from Einlass!" }))
}
