use crate::constants::ALL_COUNTRIES_KEYWORD;
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Downloader settings.
///
/// Every field has a default, so a config file only needs the keys it wants
/// to change. Unknown keys are rejected to catch typos.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Account name on scdb.info
    pub username: String,
    /// Account password on scdb.info
    pub password: String,
    /// Directory the archives are written to
    pub output_dir: PathBuf,
    /// Country codes, region names or `all`
    pub countries: Vec<String>,
    /// 1=Split all, 2=Split speed/red, 3=All in one, 4=All in one (alt icon)
    pub display_type: u8,
    /// Include danger zones
    pub danger_zones: bool,
    /// France: true=display as danger zone, false=display correct position
    pub france_danger_mode: bool,
    /// 1=22x22, 2=24x24, 3=32x32, 4=48x48, 5=80x80
    pub icon_size: u8,
    /// Warning time in seconds (0 = disabled)
    pub warning_time: u32,
    /// Download fixed speed cameras
    pub download_fixed: bool,
    /// Download mobile speed cameras
    pub download_mobile: bool,
    /// Enable verbose output
    pub verbose: bool,
    /// Skip TLS certificate verification
    pub accept_invalid_certs: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            output_dir: PathBuf::from("."),
            countries: vec![ALL_COUNTRIES_KEYWORD.to_string()],
            display_type: 1,
            danger_zones: true,
            france_danger_mode: false,
            icon_size: 5,
            warning_time: 0,
            download_fixed: true,
            download_mobile: true,
            verbose: false,
            accept_invalid_certs: false,
        }
    }
}

// Keeps the password out of logs and panic messages.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("output_dir", &self.output_dir)
            .field("countries", &self.countries)
            .field("display_type", &self.display_type)
            .field("danger_zones", &self.danger_zones)
            .field("france_danger_mode", &self.france_danger_mode)
            .field("icon_size", &self.icon_size)
            .field("warning_time", &self.warning_time)
            .field("download_fixed", &self.download_fixed)
            .field("download_mobile", &self.download_mobile)
            .field("verbose", &self.verbose)
            .field("accept_invalid_certs", &self.accept_invalid_certs)
            .finish()
    }
}

impl Config {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `IoError` if the file cannot be read and `ConfigError` if the
    /// TOML is malformed or contains unknown keys.
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            AppError::IoError(format!("Failed to read config file {}: {e}", path.display()))
        })?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Writes the configuration to a TOML file, creating parent directories.
    ///
    /// On Unix the file is created with mode `0600` since it may hold credentials.
    pub fn save_toml_file(&self, path: &Path) -> AppResult<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| {
                AppError::IoError(format!(
                    "Failed to create config directory {}: {e}",
                    dir.display()
                ))
            })?;
        }

        let contents = toml::to_string(self)?;
        write_private(path, contents.as_bytes()).map_err(|e| {
            AppError::IoError(format!("Failed to write config file {}: {e}", path.display()))
        })
    }

    /// Validates the settings that do not involve credentials.
    pub fn validate_settings(&self) -> AppResult<()> {
        if !(1..=4).contains(&self.display_type) {
            return Err(AppError::ConfigError(format!(
                "display type must be 1-4 (got {})",
                self.display_type
            )));
        }
        if !(1..=5).contains(&self.icon_size) {
            return Err(AppError::ConfigError(format!(
                "icon size must be 1-5 (got {})",
                self.icon_size
            )));
        }
        Ok(())
    }

    /// Validates everything needed to start a download run.
    pub fn validate(&self) -> AppResult<()> {
        if self.username.is_empty() || self.password.is_empty() {
            return Err(AppError::ConfigError(
                "username and password are required\nProvide via --user/--pass flags or SCDB_USER/SCDB_PASS environment variables".into(),
            ));
        }
        self.validate_settings()?;
        if !self.download_fixed && !self.download_mobile {
            return Err(AppError::ConfigError(
                "at least one of --fixed or --mobile must be enabled".into(),
            ));
        }
        if self.countries.is_empty() {
            return Err(AppError::ConfigError("no countries specified".into()));
        }
        Ok(())
    }
}

/// Returns the default location of the configuration file.
///
/// Prefers `$XDG_CONFIG_HOME/scdb/config.toml`, then `~/.config/scdb/config.toml`,
/// and falls back to `./scdb-config.toml` when no home directory is known.
pub fn default_config_path() -> PathBuf {
    config_path_from(std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from), dirs::home_dir())
}

fn config_path_from(xdg_config: Option<PathBuf>, home: Option<PathBuf>) -> PathBuf {
    match (xdg_config, home) {
        (Some(xdg), _) if !xdg.as_os_str().is_empty() => xdg.join("scdb").join("config.toml"),
        (_, Some(home)) => home.join(".config").join("scdb").join("config.toml"),
        _ => PathBuf::from("./scdb-config.toml"),
    }
}

#[cfg(unix)]
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // mode() only applies on creation
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    file.write_all(contents)
}

#[cfg(not(unix))]
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    fs::write(path, contents)
}
