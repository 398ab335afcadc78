use super::ScdbClient;
use crate::constants::{CSRF_INPUT_SELECTOR, CSRF_TOKEN_PATTERN, LOGIN_PATH};
use crate::errors::{AppError, AppResult};
use regex::Regex;
use reqwest::StatusCode;
use scraper::{Html, Selector};
use std::sync::OnceLock;
use tracing::{debug, info};

/// Cached regex matching the 40 hex character CSRF field name and value.
static CSRF_TOKEN_REGEX: OnceLock<Regex> = OnceLock::new();

/// Cached CSS selector for inputs carrying both a name and a value.
static CSRF_INPUT_SELECTOR_CACHED: OnceLock<Selector> = OnceLock::new();

/// Finds the CSRF field of the login form.
///
/// The site names the hidden field after a random token, so the field is
/// recognised by shape: both its `name` and `value` are 40 lowercase hex
/// characters. Returns `(name, value)` of the first such input.
pub fn extract_csrf_token(html: &str) -> Option<(String, String)> {
    let document = Html::parse_document(html);

    let selector = CSRF_INPUT_SELECTOR_CACHED.get_or_init(|| {
        Selector::parse(CSRF_INPUT_SELECTOR).expect("CSRF_INPUT_SELECTOR is a valid CSS selector")
    });
    let token_regex = CSRF_TOKEN_REGEX.get_or_init(|| {
        Regex::new(CSRF_TOKEN_PATTERN).expect("CSRF_TOKEN_PATTERN is a valid regex pattern")
    });

    document
        .select(selector)
        .filter_map(|el| Some((el.value().attr("name")?, el.value().attr("value")?)))
        .find(|(name, value)| token_regex.is_match(name) && token_regex.is_match(value))
        .map(|(name, value)| (name.to_string(), value.to_string()))
}

impl ScdbClient {
    /// Signs in with the configured credentials.
    ///
    /// Fetches the login page to obtain the CSRF token, then posts the login
    /// form. The session cookie is kept by the client for later downloads.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` if the token cannot be found or the login post is
    /// answered with a status other than 200 or 302, and `NetworkError` if a
    /// request fails.
    pub async fn login(&self) -> AppResult<()> {
        info!("Logging in");

        let page = self
            .get_page(LOGIN_PATH)
            .await
            .map_err(|e| AppError::NetworkError(format!("failed to get login page: {e}")))?
            .text()
            .await
            .map_err(|e| AppError::NetworkError(format!("failed to read login page: {e}")))?;

        let (token_name, token_value) = extract_csrf_token(&page).ok_or_else(|| {
            AppError::AuthError("failed to find CSRF token in login page".to_string())
        })?;
        debug!(token_name = %token_name, "Found CSRF token");

        let config = self.config();
        let form = [
            (token_name.as_str(), token_value.as_str()),
            ("u_name", config.username.as_str()),
            ("u_password", config.password.as_str()),
            ("login_submit", "Login"),
        ];

        let response = self
            .browser_request(LOGIN_PATH, LOGIN_PATH)?
            .form(&form)
            .send()
            .await
            .map_err(|e| AppError::NetworkError(format!("login request failed: {e}")))?;

        let status = response.status();
        if status != StatusCode::OK && status != StatusCode::FOUND {
            return Err(AppError::AuthError(format!(
                "login failed with status: {}",
                status.as_u16()
            )));
        }

        info!(user = %config.username, "Login successful");
        Ok(())
    }
}
