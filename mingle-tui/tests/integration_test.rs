use std::fs;
use std::path::PathBuf;

use mingle::api::{ApiClient, ApiError, RegisterRequest};
use mingle_types::LoginRequest;
use mockito::Matcher;
use serde_json::json;
use tempfile::TempDir;

fn sample_register_request(picture: PathBuf) -> RegisterRequest {
    RegisterRequest {
        first_name: "Aliya".to_string(),
        last_name: "Chen".to_string(),
        email: "aliya@example.com".to_string(),
        password: "hunter22".to_string(),
        location: "Lagos, NG".to_string(),
        occupation: "Botanist".to_string(),
        picture_path: picture
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default(),
        picture,
    }
}

#[tokio::test]
async fn test_login_round_trip() {
    let mut server = mockito::Server::new_async().await;

    // Mock: POST /auth/login with the exact credential payload
    let mock = server
        .mock("POST", "/auth/login")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({
            "email": "aliya@example.com",
            "password": "hunter22"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "token": "eyJhbGciOiJIUzI1NiJ9.payload.sig",
                "user": {
                    "_id": "64031f1e2b6a0f3a9c000001",
                    "firstName": "Aliya",
                    "lastName": "Chen",
                    "email": "aliya@example.com",
                    "location": "Lagos, NG",
                    "occupation": "Botanist",
                    "picturePath": "avatar.png",
                    "friends": []
                }
            }"#,
        )
        .expect(1)
        .create_async()
        .await;

    let client = ApiClient::new(server.url());
    let request = LoginRequest {
        email: "aliya@example.com".to_string(),
        password: "hunter22".to_string(),
    };
    let response = client.login(&request).await.expect("login should succeed");

    assert_eq!(response.token, "eyJhbGciOiJIUzI1NiJ9.payload.sig");
    assert_eq!(response.user.first_name, "Aliya");
    assert_eq!(response.user.display_name(), "Aliya Chen");
    assert_eq!(response.user.picture_path, "avatar.png");

    mock.assert_async().await;
}

#[tokio::test]
async fn test_login_rejected_credentials() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("POST", "/auth/login")
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(r#"{"msg": "Invalid credentials. "}"#)
        .expect(1)
        .create_async()
        .await;

    let client = ApiClient::new(server.url());
    let request = LoginRequest {
        email: "aliya@example.com".to_string(),
        password: "wrong".to_string(),
    };
    let error = client
        .login(&request)
        .await
        .expect_err("login should be rejected");

    match error {
        ApiError::BadRequest(message) => assert_eq!(message, "Invalid credentials. "),
        other => panic!("expected BadRequest, got {:?}", other),
    }

    mock.assert_async().await;
}

#[tokio::test]
async fn test_register_multipart_round_trip() {
    let temp_dir = TempDir::new().expect("temp dir should be created");
    let picture = temp_dir.path().join("avatar.png");
    fs::write(&picture, b"not really a png").expect("picture should be written");

    let mut server = mockito::Server::new_async().await;

    // Mock: POST /auth/register expecting every field plus the picture
    // bytes and the derived picturePath in one multipart body
    let mock = server
        .mock("POST", "/auth/register")
        .match_header(
            "content-type",
            Matcher::Regex("multipart/form-data.*".to_string()),
        )
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"name="firstName""#.to_string()),
            Matcher::Regex("Aliya".to_string()),
            Matcher::Regex(r#"name="lastName""#.to_string()),
            Matcher::Regex(r#"name="email""#.to_string()),
            Matcher::Regex(r#"name="password""#.to_string()),
            Matcher::Regex(r#"name="location""#.to_string()),
            Matcher::Regex(r#"name="occupation""#.to_string()),
            Matcher::Regex(r#"name="picture"; filename="avatar\.png""#.to_string()),
            Matcher::Regex("image/png".to_string()),
            Matcher::Regex("not really a png".to_string()),
            Matcher::Regex(r#"name="picturePath""#.to_string()),
        ]))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "_id": "64031f1e2b6a0f3a9c000002",
                "firstName": "Aliya",
                "lastName": "Chen",
                "email": "aliya@example.com",
                "location": "Lagos, NG",
                "occupation": "Botanist",
                "picturePath": "avatar.png",
                "friends": [],
                "viewedProfile": 0,
                "impressions": 0
            }"#,
        )
        .expect(1)
        .create_async()
        .await;

    let client = ApiClient::new(server.url());
    let user = client
        .register(sample_register_request(picture))
        .await
        .expect("register should succeed");

    assert_eq!(user.email, "aliya@example.com");
    assert_eq!(user.picture_path, "avatar.png");

    mock.assert_async().await;
}

#[tokio::test]
async fn test_register_unreadable_picture_skips_request() {
    let mut server = mockito::Server::new_async().await;

    // The request must never reach the server when the picture file
    // cannot be read
    let mock = server
        .mock("POST", "/auth/register")
        .expect(0)
        .create_async()
        .await;

    let client = ApiClient::new(server.url());
    let request = sample_register_request(PathBuf::from("/definitely/missing/avatar.png"));
    let error = client
        .register(request)
        .await
        .expect_err("register should fail before sending");

    assert!(matches!(error, ApiError::File(_)));

    mock.assert_async().await;
}

#[tokio::test]
async fn test_html_error_page_is_cleaned() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("POST", "/auth/login")
        .with_status(404)
        .with_header("content-type", "text/html")
        .with_body("<html><body><h1>404 Not Found</h1></body></html>")
        .expect(1)
        .create_async()
        .await;

    let client = ApiClient::new(server.url());
    let request = LoginRequest {
        email: "aliya@example.com".to_string(),
        password: "hunter22".to_string(),
    };
    let error = client
        .login(&request)
        .await
        .expect_err("login should fail against an HTML error page");

    match error {
        ApiError::NotFound(message) => {
            assert_eq!(message, "Server returned 404 error. Please check the server URL.")
        }
        other => panic!("expected NotFound, got {:?}", other),
    }

    mock.assert_async().await;
}
