//! Session provider against a mocked CMMS API over HTTP.

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cmms_auth::{Permission, Role, SessionState};
use cmms_desktop::{
    ApiError, AuthApi, ClientConfig, CredentialStore, Credentials, FileCredentialStore, HttpAuthApi,
    LoginError, SessionProvider, StoredCredentials,
};

fn token(claims: serde_json::Value) -> String {
    format!(
        "{}.{}.signature",
        URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#),
        URL_SAFE_NO_PAD.encode(claims.to_string())
    )
}

fn config(server: &MockServer) -> ClientConfig {
    ClientConfig {
        api_url: format!("{}/api", server.uri()),
        request_timeout: Duration::from_millis(500),
        ..ClientConfig::default()
    }
}

fn credentials() -> Credentials {
    Credentials::new("tech@plant.example", "s3cret").unwrap()
}

#[tokio::test]
async fn login_then_logout_round_trip() {
    let server = MockServer::start().await;
    let access = token(json!({ "sub": 7, "role": "staff_employee", "organization_id": 4 }));

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({ "email": "tech@plant.example", "password": "s3cret" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": access,
            "refresh_token": "refresh-1"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .and(header("authorization", format!("Bearer {access}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 7,
            "email": "tech@plant.example",
            "full_name": "Field Tech",
            "role": "staff_employee",
            "organization_id": 4
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/logout"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store = FileCredentialStore::new(dir.path().join("credentials.json"));
    let session = SessionProvider::new(HttpAuthApi::new(&config(&server)).unwrap(), store.clone());

    assert_eq!(session.hydrate().await, SessionState::Anonymous);
    session.login(&credentials()).await.unwrap();

    assert_eq!(session.role(), Some(Role::StaffEmployee));
    assert!(session.has_permission(Permission::CanRecordAttendance));
    assert!(!session.has_permission(Permission::CanManageUsers));
    let saved = store.load().unwrap().unwrap();
    assert_eq!(saved.refresh_token.as_deref(), Some("refresh-1"));

    session.logout().await;
    assert_eq!(session.snapshot(), SessionState::Anonymous);
    assert!(store.load().unwrap().is_none());
}

#[tokio::test]
async fn hydrates_from_stored_credential() {
    let server = MockServer::start().await;
    let access = token(json!({ "role": "orgadmin", "organization_id": "north" }));

    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "email": "admin@plant.example",
            "organizations": [{ "id": "north", "name": "Plant North" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store = FileCredentialStore::new(dir.path().join("credentials.json"));
    store
        .save(&StoredCredentials {
            access_token: access,
            refresh_token: None,
        })
        .unwrap();

    let session = SessionProvider::new(HttpAuthApi::new(&config(&server)).unwrap(), store);
    let state = session.hydrate().await;

    let identity = state.identity().unwrap();
    assert_eq!(identity.role, Some(Role::OrgAdmin));
    assert_eq!(identity.organizations.len(), 1);
    assert!(session.has_permission(Permission::CanManageUsers));
    assert!(!session.has_permission(Permission::CanManageOrganizations));
}

#[tokio::test]
async fn unauthorized_me_discards_stored_credential() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store = FileCredentialStore::new(dir.path().join("credentials.json"));
    store
        .save(&StoredCredentials {
            access_token: "stale".into(),
            refresh_token: Some("stale-refresh".into()),
        })
        .unwrap();

    let session = SessionProvider::new(HttpAuthApi::new(&config(&server)).unwrap(), store.clone());
    assert_eq!(session.hydrate().await, SessionState::Anonymous);
    assert!(store.load().unwrap().is_none());
}

#[tokio::test]
async fn wrong_password_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "detail": "Invalid credentials" })),
        )
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store = FileCredentialStore::new(dir.path().join("credentials.json"));
    let session = SessionProvider::new(HttpAuthApi::new(&config(&server)).unwrap(), store.clone());
    session.hydrate().await;

    let err = session.login(&credentials()).await.unwrap_err();
    assert!(matches!(err, LoginError::Rejected));
    assert_eq!(session.snapshot(), SessionState::Anonymous);
    assert!(store.load().unwrap().is_none());
}

#[tokio::test]
async fn slow_server_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let api = HttpAuthApi::new(&config(&server)).unwrap();
    let err = api.me("token").await.unwrap_err();
    assert!(matches!(err, ApiError::Timeout), "got {err:?}");
}

#[tokio::test]
async fn hydration_timeout_signs_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store = FileCredentialStore::new(dir.path().join("credentials.json"));
    store
        .save(&StoredCredentials {
            access_token: token(json!({ "role": "manager" })),
            refresh_token: Some("refresh-1".into()),
        })
        .unwrap();

    let session = SessionProvider::new(HttpAuthApi::new(&config(&server)).unwrap(), store.clone());
    assert_eq!(session.hydrate().await, SessionState::Anonymous);
    assert!(store.load().unwrap().is_none());
    assert!(!session.has_permission(Permission::CanViewAssets));
}

#[tokio::test]
async fn server_errors_surface_as_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store = FileCredentialStore::new(dir.path().join("credentials.json"));
    let session = SessionProvider::new(HttpAuthApi::new(&config(&server)).unwrap(), store);

    let err = session.login(&credentials()).await.unwrap_err();
    assert!(matches!(
        err,
        LoginError::Unavailable(ApiError::Api(503, ref body)) if body == "maintenance"
    ));
}
