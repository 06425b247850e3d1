/// Configuration default values
///
/// All defaults live here so they can be changed in one place.
// Web server defaults
pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_BASE_PATH: &str = "/";
pub const DEFAULT_SHUTDOWN_TIMEOUT: &str = "10s";

// Metadata service defaults
pub const DEFAULT_BCHD_URL: &str = "bchd.fountainhead.cash:443";
pub const DEFAULT_REQUEST_TIMEOUT: &str = "30s";

// Storage defaults
pub const DEFAULT_CARDS_PATH: &str = "./cards";
pub const DEFAULT_CACHE_PATH: &str = "./cache";

// Card response defaults
pub const CARD_CACHE_MAX_AGE_SECS: u64 = 86400;

/// Prefix for fully qualified environment overrides, e.g. `SPHERE_CARDS_WEB__PORT`
pub const ENV_PREFIX: &str = "SPHERE_CARDS_";
