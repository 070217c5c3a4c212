//! Layered client configuration.
//!
//! Sources in order of precedence (later sources override earlier):
//! 1. Bundled defaults (`murmur.toml` shipped with the library)
//! 2. `~/.config/murmur/murmur.toml`
//! 3. `./murmur.toml`
//! 4. `MURMUR_<SECTION>__<KEY>` environment variables

use crate::CredentialScheme;
use config::{Config, Environment, File, FileFormat};
use murmur_error::{ConfigError, MurmurError, MurmurResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

const DEFAULT_CONFIG: &str = include_str!("../../../murmur.toml");

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_upload_timeout_ms() -> u64 {
    300_000 // 5 minutes
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    1_000
}

fn default_video_max_reloads() -> u32 {
    3
}

/// Transport client settings.
///
/// Keys are accepted in snake_case or in the camelCase spelling
/// (`baseURL`, `defaultTimeoutMs`, ...).
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_setters::Setters,
)]
#[setters(prefix = "with_", into)]
pub struct TransportConfig {
    /// Service endpoint every request path is resolved against
    #[serde(default = "default_base_url", alias = "baseURL", alias = "baseurl")]
    base_url: String,

    /// Deadline for ordinary requests (milliseconds)
    #[serde(
        default = "default_timeout_ms",
        alias = "defaultTimeoutMs",
        alias = "defaulttimeoutms"
    )]
    default_timeout_ms: u64,

    /// Deadline for multipart uploads (milliseconds)
    #[serde(
        default = "default_upload_timeout_ms",
        alias = "uploadTimeoutMs",
        alias = "uploadtimeoutms"
    )]
    upload_timeout_ms: u64,

    /// Total attempts for a request failing with a connectivity error
    #[serde(default = "default_max_retries", alias = "maxRetries", alias = "maxretries")]
    max_retries: u32,

    /// Fixed delay between attempts (milliseconds)
    #[serde(
        default = "default_retry_delay_ms",
        alias = "retryDelayMs",
        alias = "retrydelayms"
    )]
    retry_delay_ms: u64,

    /// How the session credential is encoded
    #[serde(default, alias = "credentialScheme", alias = "credentialscheme")]
    credential_scheme: CredentialScheme,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            default_timeout_ms: default_timeout_ms(),
            upload_timeout_ms: default_upload_timeout_ms(),
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
            credential_scheme: CredentialScheme::default(),
        }
    }
}

impl TransportConfig {
    /// Default request deadline.
    pub fn default_timeout(&self) -> Duration {
        Duration::from_millis(self.default_timeout_ms)
    }

    /// Upload deadline.
    pub fn upload_timeout(&self) -> Duration {
        Duration::from_millis(self.upload_timeout_ms)
    }

    /// Delay between attempts.
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

/// Where renderable media comes from.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumString,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MediaStrategy {
    /// Fetch `/api/media/{id}` with the session credential into a local handle
    #[default]
    #[display("authenticated")]
    Authenticated,
    /// Hand the declared URL straight to the renderer
    #[display("direct")]
    Direct,
}

/// Media resolution settings.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Default,
    derive_getters::Getters,
    derive_setters::Setters,
)]
#[setters(prefix = "with_")]
pub struct MediaConfig {
    /// Authenticated fetch or direct URLs
    #[serde(default)]
    strategy: MediaStrategy,

    /// Origin relative fallback URLs are joined onto (defaults to the transport base URL)
    #[serde(default, alias = "publicOrigin", alias = "publicorigin")]
    #[setters(strip_option, into)]
    public_origin: Option<String>,

    /// Presentation-level reloads before a video is marked failed
    #[serde(default = "default_video_max_reloads", alias = "videoMaxReloads")]
    video_max_reloads: u32,

    /// Delay before each video reload (milliseconds)
    #[serde(default = "default_retry_delay_ms", alias = "videoReloadDelayMs")]
    video_reload_delay_ms: u64,
}

impl MediaConfig {
    /// Delay before each video reload.
    pub fn video_reload_delay(&self) -> Duration {
        Duration::from_millis(self.video_reload_delay_ms)
    }
}

/// Top-level client configuration.
///
/// # Example
///
/// ```
/// use murmur_core::MurmurConfig;
///
/// let config = MurmurConfig::from_toml_str(r#"
///     [transport]
///     baseURL = "https://feed.example.com"
///     maxRetries = 5
/// "#).unwrap();
///
/// assert_eq!(config.transport().base_url(), "https://feed.example.com");
/// assert_eq!(*config.transport().max_retries(), 5);
/// assert_eq!(*config.transport().retry_delay_ms(), 1000);
/// assert_eq!(config.public_origin(), "https://feed.example.com");
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Default,
    derive_getters::Getters,
    derive_setters::Setters,
)]
#[setters(prefix = "with_")]
pub struct MurmurConfig {
    /// Transport client settings
    #[serde(default)]
    transport: TransportConfig,

    /// Media resolution settings
    #[serde(default)]
    media: MediaConfig,
}

impl MurmurConfig {
    /// Load configuration with precedence: environment > current dir > home dir > bundled defaults.
    ///
    /// User config files are optional and silently skipped if not found.
    #[instrument]
    pub fn load() -> MurmurResult<Self> {
        debug!("Loading configuration with precedence: env > current dir > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/murmur/murmur.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder
            .add_source(File::with_name("murmur").required(false))
            .add_source(
                Environment::with_prefix("MURMUR")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        Self::finish(builder)
    }

    /// Load configuration from a specific file, on top of the bundled defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or fails validation.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> MurmurResult<Self> {
        debug!("Loading configuration from file");
        let builder = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::from(path.as_ref()));
        Self::finish(builder)
    }

    /// Parse TOML text on top of the bundled defaults.
    pub fn from_toml_str(toml: &str) -> MurmurResult<Self> {
        let builder = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::from_str(toml, FileFormat::Toml));
        Self::finish(builder)
    }

    fn finish(builder: config::ConfigBuilder<config::builder::DefaultState>) -> MurmurResult<Self> {
        let config: Self = builder
            .build()
            .map_err(|e| {
                MurmurError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                MurmurError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the client cannot run with.
    pub fn validate(&self) -> MurmurResult<()> {
        let transport = &self.transport;
        if !(transport.base_url.starts_with("http://") || transport.base_url.starts_with("https://")) {
            return Err(ConfigError::new(format!(
                "base_url must be an http(s) URL, got {:?}",
                transport.base_url
            ))
            .into());
        }
        if transport.default_timeout_ms == 0 || transport.upload_timeout_ms == 0 {
            return Err(ConfigError::new("timeouts must be greater than zero").into());
        }
        if transport.max_retries == 0 {
            return Err(ConfigError::new("max_retries counts total attempts and must be at least 1").into());
        }
        if let Some(origin) = &self.media.public_origin
            && !(origin.starts_with("http://") || origin.starts_with("https://"))
        {
            return Err(ConfigError::new(format!(
                "public_origin must be an http(s) URL, got {:?}",
                origin
            ))
            .into());
        }
        Ok(())
    }

    /// Origin used to absolutise relative media references.
    pub fn public_origin(&self) -> &str {
        self.media
            .public_origin
            .as_deref()
            .unwrap_or(&self.transport.base_url)
    }
}
