//! Configuration management.
//!
//! Settings come from a TOML file in the platform config directory,
//! overridden by `PROMPTDECK_*` environment variables. The sheet endpoint
//! URL and shared secret gate only the importer; everything else has a
//! working default.

use serde::Deserialize;
use std::path::PathBuf;

/// Default HTTP port.
const DEFAULT_PORT: u16 = 3000;

/// Main configuration for promptdeck.
#[derive(Debug, Clone)]
pub struct DeckConfig {
    /// Directory holding the filesystem key-value store.
    pub data_dir: PathBuf,
    /// HTTP transport port.
    pub port: u16,
    /// Public base URL used to build deep-link URLs in `search`/`fetch`.
    pub public_url: String,
    /// Apps Script web app URL for the importer.
    pub sheet_url: Option<String>,
    /// Shared secret for the importer.
    pub shared_secret: Option<String>,
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    /// Data directory.
    pub data_dir: Option<String>,
    /// HTTP port.
    pub port: Option<u16>,
    /// Public base URL.
    pub public_url: Option<String>,
    /// Sheet endpoint URL.
    pub sheet_url: Option<String>,
    /// Sheet shared secret.
    pub shared_secret: Option<String>,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".promptdeck"),
            port: DEFAULT_PORT,
            public_url: format!("http://localhost:{DEFAULT_PORT}"),
            sheet_url: None,
            shared_secret: None,
        }
    }
}

impl DeckConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &std::path::Path) -> crate::Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| crate::Error::OperationFailed {
                operation: "read_config_file".to_string(),
                cause: e.to_string(),
            })?;

        let file: ConfigFile =
            toml::from_str(&contents).map_err(|e| crate::Error::OperationFailed {
                operation: "parse_config_file".to_string(),
                cause: e.to_string(),
            })?;

        Ok(Self::from_config_file(file).with_env_overrides())
    }

    /// Loads configuration from the default location.
    ///
    /// Checks the platform config dir, then `~/.config/promptdeck/` for
    /// Unix compatibility. Returns defaults (plus environment overrides)
    /// if no config file is found.
    #[must_use]
    pub fn load_default() -> Self {
        if let Some(base_dirs) = directories::BaseDirs::new() {
            let platform_config = base_dirs.config_dir().join("promptdeck").join("config.toml");
            if platform_config.exists()
                && let Ok(config) = Self::load_from_file(&platform_config)
            {
                return config;
            }

            let xdg_config = base_dirs
                .home_dir()
                .join(".config")
                .join("promptdeck")
                .join("config.toml");
            if xdg_config.exists()
                && let Ok(config) = Self::load_from_file(&xdg_config)
            {
                return config;
            }
        }

        Self::default().with_env_overrides()
    }

    /// Converts a `ConfigFile` to `DeckConfig`.
    fn from_config_file(file: ConfigFile) -> Self {
        let mut config = Self::default();

        if let Some(data_dir) = file.data_dir {
            config.data_dir = PathBuf::from(data_dir);
        }
        if let Some(port) = file.port {
            config.port = port;
        }
        if let Some(public_url) = file.public_url {
            config.public_url = public_url;
        }
        config.sheet_url = file.sheet_url;
        config.shared_secret = file.shared_secret;

        config
    }

    /// Applies `PROMPTDECK_*` environment variable overrides.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(dir) = std::env::var("PROMPTDECK_DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }
        if let Ok(url) = std::env::var("PROMPTDECK_PUBLIC_URL") {
            self.public_url = url;
        }
        if let Ok(url) = std::env::var("PROMPTDECK_SHEET_URL") {
            self.sheet_url = Some(url);
        }
        if let Ok(secret) = std::env::var("PROMPTDECK_SHARED_SECRET") {
            self.shared_secret = Some(secret);
        }
        self
    }

    /// Sets the data directory.
    #[must_use]
    pub fn with_data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_dir = path.into();
        self
    }

    /// Sets the HTTP port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// True when both importer settings are present.
    #[must_use]
    pub fn sheet_configured(&self) -> bool {
        self.sheet_url.is_some() && self.shared_secret.is_some()
    }
}
