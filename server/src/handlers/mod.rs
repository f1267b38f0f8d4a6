//! HTTP-Handler der Einlass-API

pub mod auth;
pub mod system;
