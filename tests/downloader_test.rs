//! Integration tests for the download session against a mock site

#[path = "common/mod.rs"]
mod common;

use common::*;
use scdb_downloader::config::Config;
use scdb_downloader::downloader::ScdbClient;
use scdb_downloader::errors::AppError;
use scdb_downloader::models::DownloadKind;
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{body_string_contains, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer, config: Config) -> ScdbClient {
    ScdbClient::with_base_url(config, Url::parse(&server.uri()).unwrap()).unwrap()
}

fn zip_response(files: &[(&str, &str)]) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(zip_bytes(files), "application/zip")
}

#[tokio::test]
async fn test_login_posts_token_and_credentials() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/en/login/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(login_page()))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/en/login/"))
        .and(body_string_contains(format!("{TOKEN_NAME}={TOKEN_VALUE}").as_str()))
        .and(body_string_contains("u_name=testuser"))
        .and(body_string_contains("u_password=testpass"))
        .and(body_string_contains("login_submit=Login"))
        .and(header("referer", format!("{}/en/login/", server.uri()).as_str()))
        .and(header("origin", server.uri().as_str()))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    client(&server, test_config(dir.path())).login().await.unwrap();
}

#[tokio::test]
async fn test_login_follows_redirect_after_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/en/login/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(login_page()))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/en/login/"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/my/"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/my/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>My account</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    assert!(client(&server, test_config(dir.path())).login().await.is_ok());
}

#[tokio::test]
async fn test_login_without_token_fails() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/en/login/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/en/login/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let err = client(&server, test_config(dir.path()))
        .login()
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AuthError(ref msg) if msg.contains("CSRF")));
}

#[tokio::test]
async fn test_login_rejected_status_fails() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/en/login/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(login_page()))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/en/login/"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let err = client(&server, test_config(dir.path()))
        .login()
        .await
        .unwrap_err();
    assert!(err.to_string().contains("login failed with status: 403"));
}

#[tokio::test]
async fn test_fixed_download_submits_settings_and_countries() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/my/downloadsection"))
        .and(body_string_contains("download_agreement_accept=1"))
        .and(body_string_contains("typ=2"))
        .and(body_string_contains("iconsize=3"))
        .and(body_string_contains("vorwarnzeit=300"))
        .and(body_string_contains("france_danger=1"))
        .and(body_string_contains("land%5B%5D=NL&land%5B%5D=B&land%5B%5D=D"))
        .respond_with(zip_response(&[("garmin.csv", "lon,lat,name")]))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = Config {
        display_type: 2,
        icon_size: 3,
        warning_time: 300,
        france_danger_mode: true,
        ..test_config(dir.path())
    };

    let saved = client(&server, config)
        .download(DownloadKind::Fixed)
        .await
        .unwrap();
    assert_eq!(saved, dir.path().join("garmin.zip"));
    assert!(saved.exists());
    assert!(!dir.path().join("garmin.zip.part").exists());
}

#[tokio::test]
async fn test_mobile_download_accepts_octet_stream() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/intern/download/garmin-mobile.zip"))
        .and(body_string_contains("mobile_submit=Download"))
        .and(header("referer", format!("{}/my/", server.uri()).as_str()))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(zip_bytes(&[("mobile.csv", "1,2")]), "application/octet-stream"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let saved = client(&server, test_config(dir.path()))
        .download(DownloadKind::Mobile)
        .await
        .unwrap();
    assert_eq!(saved, dir.path().join("garmin-mobile.zip"));
    assert!(saved.exists());
}

#[tokio::test]
async fn test_html_response_is_rejected_with_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/my/downloadsection"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<html>Please log in</html>", "text/html; charset=utf-8"),
        )
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let err = client(&server, test_config(dir.path()))
        .download(DownloadKind::Fixed)
        .await
        .unwrap_err();

    match err {
        AppError::UnexpectedResponse { content_type, body } => {
            assert!(content_type.starts_with("text/html"));
            assert!(body.contains("Please log in"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!dir.path().join("garmin.zip").exists());
}

#[tokio::test]
async fn test_corrupt_archive_is_removed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/my/downloadsection"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("not a zip", "application/zip"))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let err = client(&server, test_config(dir.path()))
        .download(DownloadKind::Fixed)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::ArchiveError(_)));
    assert!(!dir.path().join("garmin.zip").exists());
    assert!(!dir.path().join("garmin.zip.part").exists());
}

#[tokio::test]
async fn test_corrupt_archive_keeps_previous_download() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/my/downloadsection"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("not a zip", "application/zip"))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let existing = dir.path().join("garmin.zip");
    let previous = zip_bytes(&[("garmin.csv", "lon,lat,name")]);
    std::fs::write(&existing, &previous).unwrap();

    let err = client(&server, test_config(dir.path()))
        .download(DownloadKind::Fixed)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::ArchiveError(_)));
    assert_eq!(std::fs::read(&existing).unwrap(), previous);
    assert!(!dir.path().join("garmin.zip.part").exists());
}

#[tokio::test]
async fn test_successful_download_replaces_previous_archive() {
    let server = MockServer::start().await;

    let fresh = zip_bytes(&[("garmin.csv", "lon,lat,new")]);
    Mock::given(method("POST"))
        .and(path("/my/downloadsection"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(fresh.clone(), "application/zip"))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let existing = dir.path().join("garmin.zip");
    std::fs::write(&existing, zip_bytes(&[("garmin.csv", "lon,lat,old")])).unwrap();

    client(&server, test_config(dir.path()))
        .download(DownloadKind::Fixed)
        .await
        .unwrap();

    assert_eq!(std::fs::read(&existing).unwrap(), fresh);
    assert!(!dir.path().join("garmin.zip.part").exists());
}

#[tokio::test]
async fn test_server_error_status_fails() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/intern/download/garmin-mobile.zip"))
        .respond_with(ResponseTemplate::new(500).set_body_raw("boom", "application/zip"))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let err = client(&server, test_config(dir.path()))
        .download(DownloadKind::Mobile)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("HTTP 500"));
}

#[tokio::test]
async fn test_run_logs_in_then_downloads_with_session_cookie() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    Mock::given(method("POST"))
        .and(path("/my/downloadsection"))
        .and(header_exists("cookie"))
        .respond_with(zip_response(&[("fixed.csv", "a")]))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/intern/download/garmin-mobile.zip"))
        .and(header_exists("cookie"))
        .respond_with(zip_response(&[("mobile.csv", "b")]))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    client(&server, test_config(dir.path())).run().await.unwrap();

    assert!(dir.path().join("garmin.zip").exists());
    assert!(dir.path().join("garmin-mobile.zip").exists());
}

#[tokio::test]
async fn test_run_skips_disabled_downloads() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    Mock::given(method("POST"))
        .and(path("/my/downloadsection"))
        .respond_with(zip_response(&[("fixed.csv", "a")]))
        .expect(0)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/intern/download/garmin-mobile.zip"))
        .respond_with(zip_response(&[("mobile.csv", "b")]))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = Config {
        download_fixed: false,
        ..test_config(dir.path())
    };
    client(&server, config).run().await.unwrap();

    assert!(!dir.path().join("garmin.zip").exists());
    assert!(dir.path().join("garmin-mobile.zip").exists());
}

#[tokio::test]
async fn test_run_stops_when_fixed_download_fails() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    Mock::given(method("POST"))
        .and(path("/my/downloadsection"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html/>", "text/html"))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/intern/download/garmin-mobile.zip"))
        .respond_with(zip_response(&[("mobile.csv", "b")]))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let err = client(&server, test_config(dir.path())).run().await.unwrap_err();
    assert!(err.to_string().starts_with("failed to download fixed speed cameras"));
    match &err {
        AppError::Context { source, .. } => {
            assert!(matches!(**source, AppError::UnexpectedResponse { .. }));
        }
        other => panic!("expected a download context error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_run_reports_login_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/en/login/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let err = client(&server, test_config(dir.path())).run().await.unwrap_err();
    assert!(err.to_string().starts_with("login failed"));
    match &err {
        AppError::Context { source, .. } => {
            assert!(matches!(**source, AppError::AuthError(_)));
        }
        other => panic!("expected a login context error, got {other:?}"),
    }
}
