use crate::config::{default_config_path, Config};
use crate::constants::{ALL_COUNTRIES_KEYWORD, ENV_PASS, ENV_USER};
use crate::countries::{all_countries, expand_countries, region_names, CountryCode};
use crate::downloader::ScdbClient;
use crate::errors::{AppError, AppResult};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::io;
use std::path::PathBuf;
use tracing::info;

// CLI metadata constants
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
const APP_ABOUT: &str = env!("CARGO_PKG_DESCRIPTION");

const COUNTRIES_HELP: &str = "Comma-separated country codes (NL,B,D), regions, or 'all' [default: all]";
const SAVE_CONFIG_DEFAULT: &str = "default";

/// What the program should do once its configuration is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Write the configuration to the given path and exit.
    SaveConfig(PathBuf),
    /// Log in and download the enabled archives.
    Download,
}

/// Fully resolved command line: configuration plus the action to run.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub config: Config,
    pub action: Action,
    /// Config file the settings were loaded from, if any
    pub config_file: Option<PathBuf>,
}

/// Builds the command-line definition.
pub fn command() -> Command {
    Command::new("scdb-downloader")
        .version(APP_VERSION)
        .about(APP_ABOUT)
        .after_help(format!(
            "Regions:\n  {}\n\nExamples:\n  scdb-downloader -u myuser -p mypass\n  scdb-downloader -c \"dach,benelux\" --francedanger --warningtime 300\n  scdb-downloader --config ~/.config/scdb/config.toml",
            region_names().collect::<Vec<_>>().join(", ")
        ))
        .arg(
            Arg::new("user")
                .short('u')
                .long("user")
                .env(ENV_USER)
                .help("SCDB username")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("pass")
                .short('p')
                .long("pass")
                .env(ENV_PASS)
                .hide_env_values(true)
                .help("SCDB password")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .help("Output directory [default: .]")
                .value_parser(value_parser!(PathBuf))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("countries")
                .short('c')
                .long("countries")
                .help(COUNTRIES_HELP)
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("display")
                .long("display")
                .help("Display type: 1=Split all, 2=Split speed/red, 3=All in one, 4=Alt icon [default: 1]")
                .value_parser(value_parser!(u8))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("iconsize")
                .long("iconsize")
                .help("Icon size: 1=22x22, 2=24x24, 3=32x32, 4=48x48, 5=80x80 [default: 5]")
                .value_parser(value_parser!(u8))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("warningtime")
                .long("warningtime")
                .help("Warning time in seconds, 0=disabled [default: 0]")
                .value_parser(value_parser!(u32))
                .action(ArgAction::Set),
        )
        .arg(bool_arg("dangerzones", "Include danger zones [default: true]"))
        .arg(bool_arg(
            "francedanger",
            "France: true=danger zone, false=correct position [default: false]",
        ))
        .arg(bool_arg("fixed", "Download fixed cameras [default: true]"))
        .arg(bool_arg("mobile", "Download mobile cameras [default: true]"))
        .arg(
            Arg::new("config")
                .long("config")
                .help("Load settings from a TOML config file")
                .value_parser(value_parser!(PathBuf))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("save_config")
                .long("save-config")
                .value_name("PATH")
                .help("Save current settings to a TOML config file ('default' for the standard location)")
                .num_args(0..=1)
                .default_missing_value(SAVE_CONFIG_DEFAULT)
                .value_parser(value_parser!(String))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("insecure")
                .long("insecure")
                .help("Skip TLS certificate verification")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose output")
                .action(ArgAction::SetTrue),
        )
}

/// A switch that accepts `--name`, `--name true` and `--name=false`.
fn bool_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .help(help)
        .value_name("BOOL")
        .num_args(0..=1)
        .default_missing_value("true")
        .value_parser(value_parser!(bool))
        .action(ArgAction::Set)
}

/// Resolves parsed arguments into an [`Invocation`].
///
/// Settings are layered: built-in defaults, then the config file given with
/// `--config`, then explicit flags and environment variables. Country tokens
/// from either source are expanded to country codes.
///
/// # Errors
///
/// Returns an error if the config file cannot be loaded or a country token
/// cannot be resolved.
pub fn invocation_from_matches(matches: &ArgMatches) -> AppResult<Invocation> {
    let config_file = matches.get_one::<PathBuf>("config").cloned();
    let mut config = match &config_file {
        Some(path) => Config::from_toml_file(path)?,
        None => Config::default(),
    };

    if let Some(user) = matches.get_one::<String>("user") {
        config.username = user.clone();
    }
    if let Some(pass) = matches.get_one::<String>("pass") {
        config.password = pass.clone();
    }
    if let Some(output) = matches.get_one::<PathBuf>("output") {
        config.output_dir = output.clone();
    }
    if let Some(&display_type) = matches.get_one::<u8>("display") {
        config.display_type = display_type;
    }
    if let Some(&icon_size) = matches.get_one::<u8>("iconsize") {
        config.icon_size = icon_size;
    }
    if let Some(&warning_time) = matches.get_one::<u32>("warningtime") {
        config.warning_time = warning_time;
    }
    if let Some(&danger_zones) = matches.get_one::<bool>("dangerzones") {
        config.danger_zones = danger_zones;
    }
    if let Some(&france_danger) = matches.get_one::<bool>("francedanger") {
        config.france_danger_mode = france_danger;
    }
    if let Some(&fixed) = matches.get_one::<bool>("fixed") {
        config.download_fixed = fixed;
    }
    if let Some(&mobile) = matches.get_one::<bool>("mobile") {
        config.download_mobile = mobile;
    }
    if matches.get_flag("insecure") {
        config.accept_invalid_certs = true;
    }
    if matches.get_flag("verbose") {
        config.verbose = true;
    }

    let countries = match matches.get_one::<String>("countries") {
        Some(arg) => parse_country_argument(arg)?,
        None => resolve_country_tokens(&config.countries)?,
    };
    config.countries = countries.iter().map(|code| code.to_string()).collect();

    let action = match matches.get_one::<String>("save_config") {
        Some(path) if path == SAVE_CONFIG_DEFAULT => Action::SaveConfig(default_config_path()),
        Some(path) => Action::SaveConfig(PathBuf::from(path)),
        None => Action::Download,
    };

    Ok(Invocation {
        config,
        action,
        config_file,
    })
}

/// Parses the `--countries` value: `all` or a comma-separated token list.
///
/// Tokens are trimmed here; the resolver itself matches tokens verbatim.
pub fn parse_country_argument(arg: &str) -> AppResult<Vec<CountryCode>> {
    let tokens: Vec<&str> = arg.split(',').map(str::trim).collect();
    resolve_country_tokens(&tokens)
}

/// Resolves country tokens from any source, honouring the `all` keyword.
pub fn resolve_country_tokens<S: AsRef<str>>(tokens: &[S]) -> AppResult<Vec<CountryCode>> {
    if let [only] = tokens {
        if only.as_ref().trim().eq_ignore_ascii_case(ALL_COUNTRIES_KEYWORD) {
            return Ok(all_countries().to_vec());
        }
    }
    let trimmed: Vec<&str> = tokens.iter().map(|t| t.as_ref().trim()).collect();
    expand_countries(&trimmed)
}

/// Runs the resolved invocation.
pub async fn execute(invocation: Invocation) -> AppResult<()> {
    let Invocation {
        config,
        action,
        config_file,
    } = invocation;

    match action {
        Action::SaveConfig(path) => {
            config.validate_settings()?;
            config.save_toml_file(&path)?;
            println!("Configuration saved to: {}", path.display());
        }
        Action::Download => {
            config.validate()?;
            tokio::fs::create_dir_all(&config.output_dir)
                .await
                .map_err(|e| {
                    AppError::IoError(format!(
                        "Failed to create output directory {}: {e}",
                        config.output_dir.display()
                    ))
                })?;
            log_configuration(&config, config_file.as_ref());

            let client = ScdbClient::new(config)?;
            client.run().await?;
            info!("Downloads completed successfully");
        }
    }

    Ok(())
}

/// Prints an error for the user on stderr.
pub fn report_error(err: &AppError) {
    let _ = write_error_report(&mut io::stderr().lock(), err);
}

/// Writes the user-facing error text, adding the region list for country errors.
pub fn write_error_report<W: io::Write>(out: &mut W, err: &AppError) -> io::Result<()> {
    match err {
        AppError::UnresolvableToken(_) => {
            writeln!(out, "Error parsing countries: {err}")?;
            writeln!(
                out,
                "\nAvailable regions: {}",
                region_names().collect::<Vec<_>>().join(", ")
            )
        }
        _ => writeln!(out, "Error: {err}"),
    }
}

fn log_configuration(config: &Config, config_file: Option<&PathBuf>) {
    info!(
        user = %config.username,
        output = %config.output_dir.display(),
        countries = config.countries.len(),
        display_type = config.display_type,
        icon_size = config.icon_size,
        warning_time = config.warning_time,
        danger_zones = config.danger_zones,
        france_danger_mode = config.france_danger_mode,
        download_fixed = config.download_fixed,
        download_mobile = config.download_mobile,
        config_file = config_file.map(|p| p.display().to_string()).unwrap_or_default(),
        "Starting download"
    );
}
