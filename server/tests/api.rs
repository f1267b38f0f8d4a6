//! HTTP-Tests gegen den vollstaendigen Router mit In-Memory-SQLite

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use einlass_auth::{AuthService, FesteUhr, PasswortManager, PasswortParameter, TokenKonfig, TokenService};
use einlass_db::{Datenbank, SqliteDb};
use einlass_server::{config::CorsEinstellungen, routes, state::AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

struct TestApp {
    app: Router,
    db: SqliteDb,
    uhr: Arc<FesteUhr>,
}

struct Antwort {
    status: StatusCode,
    headers: axum::http::HeaderMap,
    json: Value,
}

async fn test_app() -> TestApp {
    let db = SqliteDb::in_memory().await.unwrap();
    let passwoerter = PasswortManager::neu(PasswortParameter {
        speicher_kib: 1024,
        iterationen: 1,
        parallelitaet: 1,
    })
    .unwrap();
    let uhr = Arc::new(FesteUhr::neu(Utc::now()));
    let tokens = TokenService::neu(
        TokenKonfig {
            geheimnis: "test-geheimnis".into(),
            gueltigkeit: Duration::minutes(30),
        },
        uhr.clone(),
    )
    .unwrap();
    let auth = AuthService::neu(Arc::new(Datenbank::from(db.clone())), passwoerter, tokens);
    let app = routes::app(AppState::neu(auth), &CorsEinstellungen::default());

    TestApp { app, db, uhr }
}

impl TestApp {
    async fn senden(&self, req: Request<Body>) -> Antwort {
        let response = self.app.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        Antwort { status, headers, json }
    }

    async fn post(&self, pfad: &str, body: Value) -> Antwort {
        self.senden(
            Request::post(pfad)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    async fn get(&self, pfad: &str, token: Option<&str>) -> Antwort {
        let mut req = Request::get(pfad);
        if let Some(token) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        self.senden(req.body(Body::empty()).unwrap()).await
    }

    async fn registrieren(&self, email: &str, passwort: &str, name: &str) -> String {
        let antwort = self
            .post(
                "/api/auth/register",
                json!({ "email": email, "password": passwort, "name": name }),
            )
            .await;
        assert_eq!(antwort.status, StatusCode::OK, "{}", antwort.json);
        antwort.json["access_token"].as_str().unwrap().to_string()
    }
}

fn assert_detail(antwort: &Antwort, status: StatusCode, detail: &str) {
    assert_eq!(antwort.status, status, "{}", antwort.json);
    assert_eq!(antwort.json["detail"], detail);
}

#[tokio::test]
async fn health_und_test() {
    let t = test_app().await;

    let health = t.get("/api/health", None).await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.json, json!({ "status": "ok", "message": "Backend is running" }));

    let test = t.get("/api/test", None).await;
    assert_eq!(test.status, StatusCode::OK);
    assert!(test.json["data"].is_string());
}

#[tokio::test]
async fn registrieren_und_me() {
    let t = test_app().await;

    let antwort = t
        .post(
            "/api/auth/register",
            json!({ "email": "Ada@Example.com", "password": "geheim123", "name": "Ada" }),
        )
        .await;
    assert_eq!(antwort.status, StatusCode::OK);
    assert_eq!(antwort.json["token_type"], "bearer");
    let token = antwort.json["access_token"].as_str().unwrap();
    assert_eq!(token.split('.').count(), 3);

    let me = t.get("/api/auth/me", Some(token)).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.json, json!({ "email": "ada@example.com", "name": "Ada" }));
}

#[tokio::test]
async fn doppelte_registrierung_ergibt_400() {
    let t = test_app().await;
    t.registrieren("a@x.com", "erstes", "Erster").await;

    let zweite = t
        .post(
            "/api/auth/register",
            json!({ "email": "A@X.com", "password": "zweites", "name": "Zweiter" }),
        )
        .await;
    assert_detail(&zweite, StatusCode::BAD_REQUEST, "Email already registered");

    // Das erste Passwort gilt weiterhin
    let login = t
        .post("/api/auth/login", json!({ "email": "a@x.com", "password": "erstes" }))
        .await;
    assert_eq!(login.status, StatusCode::OK);
}

#[tokio::test]
async fn ungueltige_registrierungen_ergeben_422() {
    let t = test_app().await;

    let faelle = [
        json!({ "email": "keine-email", "password": "pw", "name": "N" }),
        json!({ "email": "a@x.com", "password": "", "name": "N" }),
        json!({ "email": "a@x.com", "password": "pw", "name": "" }),
        json!({ "email": "a@x.com", "password": "pw" }),
        json!({ "email": "a@x.com", "password": "pw", "user_name": "N" }),
    ];
    for body in faelle {
        let antwort = t.post("/api/auth/register", body.clone()).await;
        assert_eq!(antwort.status, StatusCode::UNPROCESSABLE_ENTITY, "{body}");
        assert!(antwort.json["detail"].is_string());
    }

    let kaputt = t
        .senden(
            Request::post("/api/auth/register")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{kaputt"))
                .unwrap(),
        )
        .await;
    assert_eq!(kaputt.status, StatusCode::UNPROCESSABLE_ENTITY);

    // Nur Leerzeichen im Namen lehnt der Auth-Service ab
    let leer = t
        .post(
            "/api/auth/register",
            json!({ "email": "a@x.com", "password": "pw", "name": "   " }),
        )
        .await;
    assert_eq!(leer.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn login_erfolgreich() {
    let t = test_app().await;
    t.registrieren("ada@example.com", "geheim123", "Ada").await;

    let login = t
        .post(
            "/api/auth/login",
            json!({ "email": "ADA@example.com", "password": "geheim123" }),
        )
        .await;
    assert_eq!(login.status, StatusCode::OK);
    assert_eq!(login.json["token_type"], "bearer");

    let token = login.json["access_token"].as_str().unwrap();
    let me = t.get("/api/auth/me", Some(token)).await;
    assert_eq!(me.json["email"], "ada@example.com");
}

#[tokio::test]
async fn login_fehler_sind_nicht_unterscheidbar() {
    let t = test_app().await;
    t.registrieren("ada@example.com", "geheim123", "Ada").await;

    let falsch = t
        .post(
            "/api/auth/login",
            json!({ "email": "ada@example.com", "password": "falsch" }),
        )
        .await;
    let unbekannt = t
        .post(
            "/api/auth/login",
            json!({ "email": "niemand@example.com", "password": "geheim123" }),
        )
        .await;

    assert_detail(&falsch, StatusCode::UNAUTHORIZED, "Incorrect email or password");
    assert_detail(&unbekannt, StatusCode::UNAUTHORIZED, "Incorrect email or password");
    assert_eq!(falsch.json, unbekannt.json);
}

#[tokio::test]
async fn login_mit_ungueltiger_email_ergibt_422() {
    let t = test_app().await;
    let antwort = t
        .post("/api/auth/login", json!({ "email": "ohne-at", "password": "pw" }))
        .await;
    assert_eq!(antwort.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn me_ohne_oder_mit_kaputtem_token_ergibt_401() {
    let t = test_app().await;

    let ohne = t.get("/api/auth/me", None).await;
    assert_detail(&ohne, StatusCode::UNAUTHORIZED, "Could not validate credentials");
    assert_eq!(ohne.headers.get(header::WWW_AUTHENTICATE).unwrap(), "Bearer");

    let kaputt = t.get("/api/auth/me", Some("kein.gueltiges.token")).await;
    assert_detail(&kaputt, StatusCode::UNAUTHORIZED, "Could not validate credentials");

    let basic = t
        .senden(
            Request::get("/api/auth/me")
                .header(header::AUTHORIZATION, "Basic dXNlcjpwdw==")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(basic.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn abgelaufenes_token_ergibt_401() {
    let t = test_app().await;
    let token = t.registrieren("ada@example.com", "geheim123", "Ada").await;

    t.uhr.vorspulen(Duration::minutes(29));
    assert_eq!(t.get("/api/protected", Some(&token)).await.status, StatusCode::OK);

    t.uhr.vorspulen(Duration::minutes(1));
    let abgelaufen = t.get("/api/protected", Some(&token)).await;
    assert_detail(&abgelaufen, StatusCode::UNAUTHORIZED, "Could not validate credentials");
}

#[tokio::test]
async fn me_nach_loeschen_ergibt_404() {
    let t = test_app().await;
    let token = t.registrieren("ada@example.com", "geheim123", "Ada").await;

    sqlx::query("DELETE FROM users WHERE email = ?")
        .bind("ada@example.com")
        .execute(t.db.pool())
        .await
        .unwrap();

    let me = t.get("/api/auth/me", Some(&token)).await;
    assert_detail(&me, StatusCode::NOT_FOUND, "User not found");

    // Die geschuetzte Route prueft nur das Token
    let geschuetzt = t.get("/api/protected", Some(&token)).await;
    assert_eq!(geschuetzt.status, StatusCode::OK);
}

#[tokio::test]
async fn geschuetzte_route() {
    let t = test_app().await;
    let token = t.registrieren("ada@example.com", "geheim123", "Ada").await;

    let antwort = t.get("/api/protected", Some(&token)).await;
    assert_eq!(antwort.status, StatusCode::OK);
    assert_eq!(
        antwort.json,
        json!({ "message": "This is a protected route", "user": "ada@example.com" })
    );

    let ohne = t.get("/api/protected", None).await;
    assert_eq!(ohne.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn cors_preflight_fuer_erlaubten_origin() {
    let t = test_app().await;

    let preflight = t
        .senden(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/api/auth/login")
                .header(header::ORIGIN, "http://localhost:4200")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type,authorization")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(preflight.status, StatusCode::OK);
    assert_eq!(
        preflight
            .headers
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "http://localhost:4200"
    );
    assert_eq!(
        preflight
            .headers
            .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
            .unwrap(),
        "true"
    );
}

#[tokio::test]
async fn cors_fremder_origin_erhaelt_keine_freigabe() {
    let t = test_app().await;

    let antwort = t
        .senden(
            Request::get("/api/health")
                .header(header::ORIGIN, "https://boese.example")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(antwort.status, StatusCode::OK);
    assert!(antwort
        .headers
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}
