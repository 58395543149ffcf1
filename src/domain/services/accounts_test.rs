use anyhow::Result;
use mockito::Matcher;
use tempfile::TempDir;

use super::Accounts;
use super::ADMIN_REAUTH_TEXT;
use super::FILL_ALL_FIELDS_TEXT;
use super::INVALID_CREDENTIALS_TEXT;
use super::PASSWORD_MISMATCH_TEXT;
use crate::domain::models::TransportError;
use crate::domain::services::SessionStore;
use crate::domain::services::ADMIN_TOKEN_KEY;
use crate::domain::services::USER_TOKEN_KEY;
use crate::infrastructure::transport::http::HttpTransport;

fn accounts(url: &str, dir: &TempDir) -> Accounts {
    return Accounts::new(
        Box::new(HttpTransport::new(url)),
        SessionStore::new(dir.path().join("storage.json")),
    );
}

fn store(dir: &TempDir) -> SessionStore {
    return SessionStore::new(dir.path().join("storage.json"));
}

#[tokio::test]
async fn it_stores_the_token_on_login() -> Result<()> {
    let dir = TempDir::new()?;
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/login")
        .with_status(200)
        .with_body(r#"{"token":"user-token"}"#)
        .create_async()
        .await;

    let session = accounts(&server.url(), &dir).login("asha", "secret").await?;

    assert_eq!(session.user_token, Some("user-token".to_string()));
    assert_eq!(store(&dir).get(USER_TOKEN_KEY).await?, Some("user-token".to_string()));
    mock.assert_async().await;
    return Ok(());
}

#[tokio::test]
async fn it_rejects_blank_login_fields_without_a_request() -> Result<()> {
    let dir = TempDir::new()?;
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/login")
        .expect(0)
        .create_async()
        .await;

    let err = accounts(&server.url(), &dir)
        .login("asha", "  ")
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), FILL_ALL_FIELDS_TEXT);
    mock.assert_async().await;
    return Ok(());
}

#[tokio::test]
async fn it_hides_the_login_failure_reason() -> Result<()> {
    let dir = TempDir::new()?;
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/login")
        .with_status(404)
        .with_body(r#"{"error":"User not found"}"#)
        .create_async()
        .await;

    let err = accounts(&server.url(), &dir)
        .login("nobody", "secret")
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), INVALID_CREDENTIALS_TEXT);
    assert!(!store(&dir).session().await?.is_logged_in());
    return Ok(());
}

#[tokio::test]
async fn it_validates_signup_fields() -> Result<()> {
    let dir = TempDir::new()?;
    let accounts = accounts("http://127.0.0.1:9", &dir);

    let err = accounts.signup("asha", "", "a", "a").await.unwrap_err();
    assert_eq!(err.to_string(), FILL_ALL_FIELDS_TEXT);

    let err = accounts
        .signup("asha", "asha@example.com", "one", "two")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), PASSWORD_MISMATCH_TEXT);
    return Ok(());
}

#[tokio::test]
async fn it_logs_in_after_a_signup_without_token() -> Result<()> {
    let dir = TempDir::new()?;
    let mut server = mockito::Server::new_async().await;
    let signup = server
        .mock("POST", "/api/signup")
        .match_body(Matcher::Json(serde_json::json!({
            "username": "asha",
            "email": "asha@example.com",
            "password": "secret"
        })))
        .with_status(201)
        .with_body(r#"{"message":"User created successfully","user_id":"1"}"#)
        .create_async()
        .await;
    let login = server
        .mock("POST", "/api/login")
        .with_status(200)
        .with_body(r#"{"token":"fresh-token"}"#)
        .create_async()
        .await;

    let session = accounts(&server.url(), &dir)
        .signup("asha", "asha@example.com", "secret", "secret")
        .await?;

    assert_eq!(session.user_token, Some("fresh-token".to_string()));
    signup.assert_async().await;
    login.assert_async().await;
    return Ok(());
}

#[tokio::test]
async fn it_uses_the_signup_token_when_given() -> Result<()> {
    let dir = TempDir::new()?;
    let mut server = mockito::Server::new_async().await;
    let _signup = server
        .mock("POST", "/api/signup")
        .with_status(201)
        .with_body(r#"{"token":"signup-token"}"#)
        .create_async()
        .await;
    let login = server
        .mock("POST", "/api/login")
        .expect(0)
        .create_async()
        .await;

    let session = accounts(&server.url(), &dir)
        .signup("asha", "asha@example.com", "secret", "secret")
        .await?;

    assert_eq!(session.user_token, Some("signup-token".to_string()));
    login.assert_async().await;
    return Ok(());
}

#[tokio::test]
async fn it_logs_out() -> Result<()> {
    let dir = TempDir::new()?;
    store(&dir).set(USER_TOKEN_KEY, "user-token").await?;
    store(&dir).set(ADMIN_TOKEN_KEY, "admin-token").await?;

    let session = accounts("http://127.0.0.1:9", &dir).logout().await?;

    assert!(!session.is_logged_in());
    assert!(session.is_admin());
    return Ok(());
}

#[tokio::test]
async fn it_logs_in_an_admin() -> Result<()> {
    let dir = TempDir::new()?;
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/admin/login")
        .with_status(200)
        .with_body(r#"{"token":"admin-token"}"#)
        .create_async()
        .await;

    let accounts = accounts(&server.url(), &dir);
    let session = accounts.admin_login("admin@example.com", "secret").await?;

    assert!(session.is_admin());
    assert_eq!(accounts.admin_token().await?, "admin-token");
    return Ok(());
}

#[tokio::test]
async fn it_requires_an_admin_login() -> Result<()> {
    let dir = TempDir::new()?;
    let accounts = accounts("http://127.0.0.1:9", &dir);

    assert!(accounts.admin_token().await.is_err());
    assert!(accounts.user_token().await.is_err());
    return Ok(());
}

#[tokio::test]
async fn it_clears_the_admin_token_on_unauthorized() -> Result<()> {
    let dir = TempDir::new()?;
    store(&dir).set(ADMIN_TOKEN_KEY, "expired").await?;
    let accounts = accounts("http://127.0.0.1:9", &dir);

    let res: Result<()> = Err(TransportError::Unauthorized.into());
    let err = accounts.check_admin(res).await.unwrap_err();

    assert_eq!(err.to_string(), ADMIN_REAUTH_TEXT);
    assert!(!accounts.session().await?.is_admin());
    return Ok(());
}

#[tokio::test]
async fn it_keeps_the_admin_token_on_other_errors() -> Result<()> {
    let dir = TempDir::new()?;
    store(&dir).set(ADMIN_TOKEN_KEY, "still-good").await?;
    let accounts = accounts("http://127.0.0.1:9", &dir);

    let res: Result<()> = Err(TransportError::Status(500).into());
    assert!(accounts.check_admin(res).await.is_err());
    assert!(accounts.session().await?.is_admin());

    assert_eq!(accounts.check_admin(Ok(3)).await?, 3);
    return Ok(());
}
