// Site
pub const BASE_URL: &str = "https://www.scdb.info";
pub const LOGIN_PATH: &str = "/en/login/";
pub const FIXED_DOWNLOAD_PATH: &str = "/my/downloadsection";
pub const MOBILE_DOWNLOAD_PATH: &str = "/intern/download/garmin-mobile.zip";
pub const MOBILE_REFERER_PATH: &str = "/my/";

// Output files
pub const FIXED_FILE_NAME: &str = "garmin.zip";
pub const MOBILE_FILE_NAME: &str = "garmin-mobile.zip";

// Browser headers expected by the site
pub const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/139.0.0.0 Safari/537.36";
pub const ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8";
pub const ACCEPT_LANGUAGE: &str = "en-GB,en;q=0.9";

// Login form
pub const CSRF_INPUT_SELECTOR: &str = "input[name][value]";
pub const CSRF_TOKEN_PATTERN: &str = r"^[a-f0-9]{40}$";

// Request timeout in seconds
pub const REQUEST_TIMEOUT_SECS: u64 = 300;

// Environment variables
pub const ENV_USER: &str = "SCDB_USER";
pub const ENV_PASS: &str = "SCDB_PASS";

// Literal that selects every country
pub const ALL_COUNTRIES_KEYWORD: &str = "all";
