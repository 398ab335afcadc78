//! Common test utilities for integration tests

use scdb_downloader::config::Config;
use std::io::Write;
use std::path::Path;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// CSRF field name served by the fake login page
#[allow(dead_code)]
pub const TOKEN_NAME: &str = "3f786850e387550fdab836ed7e6dc881de23001b";

/// CSRF field value served by the fake login page
#[allow(dead_code)]
pub const TOKEN_VALUE: &str = "89e6c98d92887913cadf06b2adb97f26cde4849b";

/// Login page shaped like the real one: a hidden CSRF input plus credentials.
#[allow(dead_code)]
pub fn login_page() -> String {
    format!(
        r#"<!DOCTYPE html>
<html><body>
  <form action="/en/login/" method="post">
    <input type="hidden" name="{TOKEN_NAME}" value="{TOKEN_VALUE}" />
    <input type="text" name="u_name" />
    <input type="password" name="u_password" />
    <input type="submit" name="login_submit" value="Login" />
  </form>
</body></html>"#
    )
}

/// Builds an in-memory ZIP archive with the given files
#[allow(dead_code)]
pub fn zip_bytes(files: &[(&str, &str)]) -> Vec<u8> {
    use zip::write::FileOptions;
    use zip::ZipWriter;

    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(zip::CompressionMethod::Stored);

    for (name, content) in files {
        zip.start_file(*name, options).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
    }

    zip.finish().unwrap().into_inner()
}

/// Config with credentials, writing into `output_dir`
#[allow(dead_code)]
pub fn test_config(output_dir: &Path) -> Config {
    Config {
        username: "testuser".into(),
        password: "testpass".into(),
        output_dir: output_dir.to_path_buf(),
        countries: vec!["NL".into(), "B".into(), "D".into()],
        ..Config::default()
    }
}

/// Mounts the login page and a login endpoint that accepts any credentials
#[allow(dead_code)]
pub async fn mount_login(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/en/login/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(login_page()))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/en/login/"))
        .respond_with(
            ResponseTemplate::new(200).insert_header("set-cookie", "PHPSESSID=abc123; Path=/"),
        )
        .mount(server)
        .await;
}
