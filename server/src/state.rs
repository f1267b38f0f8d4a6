//! Gemeinsamer Zustand aller Handler

use std::sync::Arc;

use einlass_auth::AuthService;
use einlass_db::Datenbank;

/// Axum-State: nur der Auth-Service, alles Weitere haengt daran
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService<Datenbank>>,
}

impl AppState {
    pub fn neu(auth: AuthService<Datenbank>) -> Self {
        Self {
            auth: Arc::new(auth),
        }
    }
}
