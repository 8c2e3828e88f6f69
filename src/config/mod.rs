use crate::models::ClientSettings;
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use config::{Config, Environment, File, FileFormat};
use std::fs;

/// File name of the client settings inside the configuration directory.
pub const SETTINGS_FILE: &str = "finrecon.yaml";

/// Prefix of environment variables overriding settings, e.g. `FINRECON_BACKEND_URL`.
pub const ENV_PREFIX: &str = "FINRECON";

/// Configuration manager for loading and saving client settings.
///
/// Settings are layered: defaults, then `finrecon.yaml` (optional), then
/// `FINRECON_*` environment variables.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_dir: Utf8PathBuf,
    settings_path: Utf8PathBuf,
}

impl ConfigManager {
    /// Create a new ConfigManager with the specified configuration directory.
    ///
    /// The directory is created if it does not exist.
    pub fn new<P: AsRef<Utf8Path>>(config_dir: P) -> Result<Self> {
        let config_dir = config_dir.as_ref().to_path_buf();

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {}", config_dir))?;
        }

        Ok(Self {
            settings_path: config_dir.join(SETTINGS_FILE),
            config_dir,
        })
    }

    /// Load settings from the file and the process environment.
    pub fn load_settings(&self) -> Result<ClientSettings> {
        self.load_settings_with_env(None)
    }

    /// Load settings, reading overrides from `env` instead of the process
    /// environment when it is given.
    ///
    /// Keys in `env` are full variable names (`FINRECON_DEBUG_MODE`).
    pub fn load_settings_with_env(
        &self,
        env: Option<config::Map<String, String>>,
    ) -> Result<ClientSettings> {
        if self.settings_path.exists() {
            tracing::debug!("Reading settings from {}", self.settings_path);
        } else {
            tracing::debug!(
                "Settings file not found at {}, using defaults",
                self.settings_path
            );
        }

        let settings = Config::builder()
            .add_source(
                File::from(self.settings_path.as_std_path())
                    .format(FileFormat::Yaml)
                    .required(false),
            )
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .source(env),
            )
            .build()
            .with_context(|| format!("Failed to load settings: {}", self.settings_path))?;

        let settings: ClientSettings = settings
            .try_deserialize()
            .with_context(|| format!("Failed to parse settings: {}", self.settings_path))?;

        tracing::info!("Loaded settings (backend: {})", settings.backend_url);
        Ok(settings)
    }

    /// Save the settings file.
    pub fn save_settings(&self, settings: &ClientSettings) -> Result<()> {
        let yaml_string =
            serde_yaml_ng::to_string(settings).context("Failed to serialize settings to YAML")?;

        fs::write(&self.settings_path, yaml_string)
            .with_context(|| format!("Failed to write settings: {}", self.settings_path))?;

        tracing::info!("Saved settings to {}", self.settings_path);
        Ok(())
    }

    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }

    pub fn settings_path(&self) -> &Utf8Path {
        &self.settings_path
    }
}
