use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use super::{
    ConfigSerializer, ContentProvider, FileContentProvider, Validate, YamlConfigSerializer,
};

pub struct ConfigManager<TContentProvider, TConfig, TConfigSerializer = YamlConfigSerializer>
where
    TContentProvider: ContentProvider,
    TConfig: Clone + for<'de> Deserialize<'de> + Serialize + Validate + Default,
    TConfigSerializer: ConfigSerializer<TConfig>,
{
    config_serializer: TConfigSerializer,
    content_provider: TContentProvider,
    config: Arc<Mutex<Option<TConfig>>>,
}

impl<TConfig> ConfigManager<FileContentProvider, TConfig, YamlConfigSerializer>
where
    TConfig: Clone + for<'de> Deserialize<'de> + Serialize + Validate + Default,
{
    pub fn from_yaml_file(file_path: impl Into<PathBuf>) -> Self {
        Self::new(FileContentProvider::new(file_path), YamlConfigSerializer::new())
    }
}

impl<TContentProvider, TConfig, TConfigSerializer>
    ConfigManager<TContentProvider, TConfig, TConfigSerializer>
where
    TContentProvider: ContentProvider,
    TConfig: Clone + for<'de> Deserialize<'de> + Serialize + Validate + Default,
    TConfigSerializer: ConfigSerializer<TConfig>,
{
    pub fn new(content_provider: TContentProvider, config_serializer: TConfigSerializer) -> Self {
        Self {
            config: Arc::new(Mutex::new(None)),
            content_provider,
            config_serializer,
        }
    }

    /// Loads once and caches. A missing document yields `TConfig::default()`
    /// without caching it, so a later `set_config` still wins.
    pub fn get_config(&self) -> Result<TConfig, String> {
        let mut current = self
            .config
            .lock()
            .map_err(|_| "Config cache lock poisoned".to_string())?;

        if let Some(config) = current.as_ref() {
            return Ok(config.clone());
        }

        let Some(content) = self.content_provider.get_content()? else {
            return Ok(TConfig::default());
        };

        let config = self.config_serializer.deserialize(&content)?;
        config
            .validate()
            .map_err(|e| format!("Config validation error: {}", e))?;

        *current = Some(config.clone());
        Ok(config)
    }

    pub fn set_config(&self, config: &TConfig) -> Result<(), String> {
        config
            .validate()
            .map_err(|e| format!("Config validation error: {}", e))?;

        let serialized = self.config_serializer.serialize(config)?;
        self.content_provider.set_content(&serialized)?;

        let mut current = self
            .config
            .lock()
            .map_err(|_| "Config cache lock poisoned".to_string())?;
        *current = Some(config.clone());
        Ok(())
    }
}
