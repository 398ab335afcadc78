//! scdb-downloader library
//!
//! This crate provides the core functionality for the `scdb-downloader` binary.
//!
//! ## Overview
//!
//! - [`countries`] - Expands region presets and country codes into the list submitted with downloads
//! - [`downloader`] - Logs in to scdb.info and downloads the fixed and mobile camera archives
//! - [`config`] - TOML configuration with defaults, validation and a standard location
//! - [`cli`] - Command-line interface layering flags, environment and config file
//! - [`models`] - The downloadable archives and their form fields
//! - [`errors`] - Error types used throughout the application
//!
//! ## Example Usage
//!
//! ```no_run
//! use scdb_downloader::{config::Config, countries, downloader::ScdbClient, errors::AppResult};
//!
//! # async fn example() -> AppResult<()> {
//! let codes = countries::expand_countries(&["dach", "benelux"])?;
//! let config = Config {
//!     username: "user".into(),
//!     password: "secret".into(),
//!     countries: codes.iter().map(|c| c.to_string()).collect(),
//!     ..Config::default()
//! };
//!
//! ScdbClient::new(config)?.run().await?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod countries;
pub mod downloader;
pub mod errors;
pub mod logging;
pub mod models;
pub mod utils;
