use crate::config::Config;
use crate::constants::*;

/// Camera database offered by the download section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadKind {
    /// Fixed speed and red light cameras, filtered by country.
    Fixed,
    /// Mobile speed camera locations.
    Mobile,
}

impl DownloadKind {
    /// Returns a human-readable name for the download.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Fixed => "fixed speed cameras",
            Self::Mobile => "mobile speed cameras",
        }
    }

    /// Path of the endpoint the form is posted to.
    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::Fixed => FIXED_DOWNLOAD_PATH,
            Self::Mobile => MOBILE_DOWNLOAD_PATH,
        }
    }

    /// Path sent in the `Referer` header, matching the page the browser form lives on.
    pub fn referer(&self) -> &'static str {
        match self {
            Self::Fixed => FIXED_DOWNLOAD_PATH,
            Self::Mobile => MOBILE_REFERER_PATH,
        }
    }

    /// Name of the archive written to the output directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Fixed => FIXED_FILE_NAME,
            Self::Mobile => MOBILE_FILE_NAME,
        }
    }

    /// Builds the form fields submitted for this download.
    ///
    /// Fields may repeat (`land[]` once per country), so a list of pairs is
    /// returned rather than a map.
    pub fn form_fields(&self, config: &Config) -> Vec<(&'static str, String)> {
        match self {
            Self::Fixed => {
                let mut fields = vec![
                    ("download_agreement_accept", "1".to_string()),
                    ("download_wave_right_of_rescission", "1".to_string()),
                    ("typ", config.display_type.to_string()),
                    ("dangerzones", flag_value(config.danger_zones)),
                    ("vorwarnzeit", config.warning_time.to_string()),
                    ("iconsize", config.icon_size.to_string()),
                    ("download_start", "Download+Now".to_string()),
                    ("france_danger", flag_value(config.france_danger_mode)),
                ];
                fields.extend(
                    config
                        .countries
                        .iter()
                        .map(|country| ("land[]", country.clone())),
                );
                fields
            }
            Self::Mobile => vec![("mobile_submit", "Download+For+Free".to_string())],
        }
    }
}

fn flag_value(enabled: bool) -> String {
    if enabled { "1" } else { "0" }.to_string()
}
