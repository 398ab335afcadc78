//! Authenticated downloads from scdb.info.
//!
//! [`ScdbClient`] keeps a cookie-backed HTTP session: [`ScdbClient::login`]
//! scrapes the CSRF token from the login form and signs in, after which the
//! fixed and mobile camera archives can be fetched with
//! [`ScdbClient::download`]. [`ScdbClient::run`] performs the whole sequence
//! according to the configuration.

mod file_downloader;
mod session;

pub use file_downloader::{save_response, verify_archive};
pub use session::extract_csrf_token;

use crate::config::Config;
use crate::constants;
use crate::errors::{AppError, AppResult};
use crate::models::DownloadKind;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, ORIGIN, REFERER, USER_AGENT};
use reqwest::{RequestBuilder, Response};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

/// HTTP session against a single scdb.info site.
pub struct ScdbClient {
    client: reqwest::Client,
    base_url: Url,
    config: Config,
}

impl ScdbClient {
    /// Creates a client for the public site.
    pub fn new(config: Config) -> AppResult<Self> {
        let base_url = Url::parse(constants::BASE_URL)?;
        Self::with_base_url(config, base_url)
    }

    /// Creates a client that talks to `base_url` instead of the public site.
    pub fn with_base_url(config: Config, base_url: Url) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(constants::REQUEST_TIMEOUT_SECS))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;

        if config.accept_invalid_certs {
            warn!("TLS certificate verification is disabled");
        }

        Ok(Self {
            client,
            base_url,
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Logs in and downloads every enabled archive, stopping at the first failure.
    pub async fn run(&self) -> AppResult<()> {
        self.login().await.map_err(|e| e.context("login failed"))?;

        for kind in self.enabled_downloads() {
            let path = self.download(kind).await.map_err(|e| {
                warn!(download = kind.display_name(), error = %e, "Download failed");
                e.context(format!("failed to download {}", kind.display_name()))
            })?;
            info!(download = kind.display_name(), path = %path.display(), "Saved archive");
        }

        Ok(())
    }

    /// Downloads one archive into the output directory and returns its path.
    pub async fn download(&self, kind: DownloadKind) -> AppResult<PathBuf> {
        info!(download = kind.display_name(), "Downloading");

        let fields = kind.form_fields(&self.config);
        let response = self
            .browser_request(kind.endpoint(), kind.referer())?
            .form(&fields)
            .send()
            .await
            .map_err(|e| {
                AppError::NetworkError(format!("{} request failed: {e}", kind.display_name()))
            })?;

        let path = self.config.output_dir.join(kind.file_name());
        save_response(response, &path).await?;
        Ok(path)
    }

    fn enabled_downloads(&self) -> Vec<DownloadKind> {
        let mut kinds = Vec::with_capacity(2);
        if self.config.download_fixed {
            kinds.push(DownloadKind::Fixed);
        }
        if self.config.download_mobile {
            kinds.push(DownloadKind::Mobile);
        }
        kinds
    }

    fn url(&self, path: &str) -> AppResult<Url> {
        Ok(self.base_url.join(path)?)
    }

    /// Builds a POST with the headers a browser submitting the site's forms would send.
    fn browser_request(&self, path: &str, referer: &str) -> AppResult<RequestBuilder> {
        let url = self.url(path)?;
        let referer = self.url(referer)?;
        Ok(self
            .client
            .post(url)
            .header(USER_AGENT, constants::USER_AGENT)
            .header(ACCEPT, constants::ACCEPT)
            .header(ACCEPT_LANGUAGE, constants::ACCEPT_LANGUAGE)
            .header(ORIGIN, self.base_url.origin().ascii_serialization())
            .header(REFERER, referer.as_str()))
    }

    async fn get_page(&self, path: &str) -> AppResult<Response> {
        let url = self.url(path)?;
        Ok(self
            .client
            .get(url)
            .header(USER_AGENT, constants::USER_AGENT)
            .header(ACCEPT, constants::ACCEPT)
            .header(ACCEPT_LANGUAGE, constants::ACCEPT_LANGUAGE)
            .send()
            .await?)
    }
}
