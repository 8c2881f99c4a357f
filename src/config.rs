use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub tmdb: TmdbConfig,

    pub club: ClubConfig,

    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub database_path: String,

    pub log_level: String,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,

    pub max_db_connections: u32,

    pub min_db_connections: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_path: "sqlite:data/filmclub.db".to_string(),
            log_level: "info".to_string(),
            worker_threads: 2,
            max_db_connections: 5,
            min_db_connections: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub enabled: bool,

    pub bind_address: String,

    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bind_address: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TmdbConfig {
    /// v3 API key. Empty disables metadata lookups; pages still render.
    pub api_key: String,

    /// Primary response language.
    pub language: String,

    /// Used to fill in an overview or tagline missing in the primary language.
    pub fallback_language: String,

    pub region: String,

    pub base_url: String,

    /// Prefix prepended to poster paths returned by the API.
    pub image_base_url: String,

    /// Prefix for person profile links; the IMDb id and a trailing slash are appended.
    pub profile_base_url: String,

    /// Where person links go when no profile is known.
    pub fallback_profile_url: String,

    pub request_timeout_seconds: u64,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            language: "es-MX".to_string(),
            fallback_language: "en-US".to_string(),
            region: "MX".to_string(),
            base_url: "https://api.themoviedb.org/3".to_string(),
            image_base_url: "https://image.tmdb.org/t/p/w500".to_string(),
            profile_base_url: "https://www.imdb.com/name/".to_string(),
            fallback_profile_url: "https://www.imdb.com/".to_string(),
            request_timeout_seconds: 15,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClubConfig {
    /// Members inserted at startup when missing. Existing members are never removed.
    pub members: Vec<String>,
}

impl Default for ClubConfig {
    fn default() -> Self {
        Self {
            members: [
                "Julian", "Cata", "Leo", "Marco", "Sofi", "Chata", "Lety", "Guero", "Roci",
                "Pepe", "Mau", "Coqui", "Lalo", "Rafa", "Luly",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub metrics_enabled: bool,

    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: true,
            json_logs: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            server: ServerConfig::default(),
            tmdb: TmdbConfig::default(),
            club: ClubConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl Config {
    /// Loads the first config file found, then applies environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_file()?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn load_file() -> Result<Self> {
        let paths = Self::config_paths();

        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Applies `DB_PATH`, `TMDB_API_KEY`, `TMDB_LANGUAGE`, `TMDB_REGION` and `PORT`.
    ///
    /// `lookup` is injected so tests do not have to touch the process environment.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(path) = lookup("DB_PATH") {
            self.general.database_path = if path.starts_with("sqlite:") {
                path
            } else {
                format!("sqlite:{path}")
            };
        }
        if let Some(key) = lookup("TMDB_API_KEY") {
            self.tmdb.api_key = key;
        }
        if let Some(language) = lookup("TMDB_LANGUAGE") {
            self.tmdb.language = language;
        }
        if let Some(region) = lookup("TMDB_REGION") {
            self.tmdb.region = region;
        }
        if let Some(port) = lookup("PORT").and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config.toml")];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("filmclub").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".filmclub").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            let config = Self::default();
            config.save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.general.database_path.trim().is_empty() {
            anyhow::bail!("Database path cannot be empty");
        }

        if self.tmdb.base_url.trim().is_empty() {
            anyhow::bail!("TMDB base URL cannot be empty");
        }

        if self.tmdb.request_timeout_seconds == 0 {
            anyhow::bail!("TMDB request timeout must be > 0");
        }

        if self.club.members.iter().any(|m| m.trim().is_empty()) {
            anyhow::bail!("Club member names cannot be blank");
        }

        Ok(())
    }
}
