use super::{
    encoder::EncoderConfig,
    generation::GenerationConfig,
    logging::LoggingConfig,
    store::StoreConfig,
    traits::ConfigSection,
};
use crate::error::ProteinDbError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Environment variables with this prefix override file values,
/// e.g. `PROTEIN_DB__GENERATION__GENERATIONS=20`.
pub const ENV_PREFIX: &str = "PROTEIN_DB";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub generation: GenerationConfig,
    pub encoder: EncoderConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ProteinDbError> {
        self.store.validate()?;
        self.generation.validate()?;
        self.encoder.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

pub struct ConfigManager {
    config: Arc<RwLock<AppConfig>>,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(AppConfig::default())),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, AppConfig>, ProteinDbError> {
        self.config
            .read()
            .map_err(|_| ProteinDbError::Configuration("Config lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, AppConfig>, ProteinDbError> {
        self.config
            .write()
            .map_err(|_| ProteinDbError::Configuration("Config lock poisoned".to_string()))
    }

    fn build(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<AppConfig, ProteinDbError> {
        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| ProteinDbError::Configuration(format!("Failed to read config: {}", e)))?;

        let config: AppConfig = settings
            .try_deserialize()
            .map_err(|e| ProteinDbError::Configuration(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load a TOML or JSON file (by extension), layered under environment overrides
    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ProteinDbError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ProteinDbError::Configuration(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        let config = Self::build(config::Config::builder().add_source(config::File::from(path)))?;
        log::debug!("Loaded configuration from {}", path.display());

        *self.write()? = config;
        Ok(())
    }

    /// Defaults plus environment overrides only
    pub fn load_from_env(&self) -> Result<(), ProteinDbError> {
        let config = Self::build(config::Config::builder())?;
        *self.write()? = config;
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ProteinDbError> {
        let config = self.read()?;
        let toml_str = toml::to_string_pretty(&*config)
            .map_err(|e| ProteinDbError::Configuration(format!("Failed to serialize: {}", e)))?;

        std::fs::write(path, toml_str)
            .map_err(|e| ProteinDbError::Configuration(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    pub fn get(&self) -> Result<AppConfig, ProteinDbError> {
        Ok(self.read()?.clone())
    }

    /// Apply `f` to a copy and commit it only if the result validates
    pub fn update<F>(&self, f: F) -> Result<(), ProteinDbError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut config = self.write()?;
        let mut candidate = config.clone();
        f(&mut candidate);
        candidate.validate()?;
        *config = candidate;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::store::StoreMode;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("protein_db.toml");
        std::fs::write(
            &path,
            "[generation]\ngenerations = 3\ncos_threshold = 0.5\n\n[store]\nmode = \"full\"\n",
        )
        .unwrap();

        let manager = ConfigManager::new();
        manager.load_from_file(&path).unwrap();
        let config = manager.get().unwrap();

        assert_eq!(config.generation.generations, 3);
        assert_eq!(config.generation.cos_threshold, 0.5);
        assert_eq!(config.generation.population_size, 200);
        assert_eq!(config.store.mode, StoreMode::Full);
        assert_eq!(config.encoder.timeout_ms, 30_000);
    }

    #[test]
    fn test_invalid_file_is_rejected_and_previous_config_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[generation]\nelite_count = 500\n").unwrap();

        let manager = ConfigManager::new();
        assert!(manager.load_from_file(&path).is_err());
        assert_eq!(manager.get().unwrap(), AppConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saved.toml");

        let manager = ConfigManager::new();
        manager
            .update(|c| {
                c.generation.seed = Some(7);
                c.logging.level = "debug".to_string();
            })
            .unwrap();
        manager.save_to_file(&path).unwrap();

        let reloaded = ConfigManager::new();
        reloaded.load_from_file(&path).unwrap();
        assert_eq!(reloaded.get().unwrap(), manager.get().unwrap());
    }

    #[test]
    fn test_update_rejects_invalid_change() {
        let manager = ConfigManager::new();
        let result = manager.update(|c| c.encoder.timeout_ms = 0);
        assert!(result.is_err());
        assert_eq!(manager.get().unwrap().encoder.timeout_ms, 30_000);
    }
}
