use crate::scorer::model_config::ModelConfig;
use crate::upload::{DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_PREVIEW_MAX_WIDTH};
use chrono::{FixedOffset, Offset, Utc};
use std::path::PathBuf;

pub const ENV_MODEL_URL: &str = "LOTTO_MODEL_URL";
pub const ENV_STORAGE_DIR: &str = "LOTTO_STORAGE_DIR";

#[derive(Debug, Clone)]
pub struct Config {
    pub model: ModelConfig,
    pub storage_dir: PathBuf,
    pub logger_timezone: FixedOffset,
    pub max_upload_bytes: usize,
    pub preview_max_width: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: ModelConfig::default(),
            storage_dir: PathBuf::from(".lotto-picture"),
            logger_timezone: korea_standard_time(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            preview_max_width: DEFAULT_PREVIEW_MAX_WIDTH,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(model_url) = var(ENV_MODEL_URL).filter(|v| !v.trim().is_empty()) {
            config.model.model_url = model_url;
        }
        if let Some(storage_dir) = var(ENV_STORAGE_DIR).filter(|v| !v.trim().is_empty()) {
            config.storage_dir = PathBuf::from(storage_dir);
        }

        config
    }
}

fn korea_standard_time() -> FixedOffset {
    FixedOffset::east_opt(9 * 3600).unwrap_or_else(|| Utc.fix())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();

        assert_eq!(config.model.image_size, 224);
        assert_eq!(config.model.num_classes, 45);
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
        assert_eq!(config.preview_max_width, 800);
        assert_eq!(config.logger_timezone.local_minus_utc(), 9 * 3600);
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::from_vars(|key| match key {
            ENV_MODEL_URL => Some("file:///models/lotto".to_string()),
            ENV_STORAGE_DIR => Some("/tmp/lotto".to_string()),
            _ => None,
        });

        assert_eq!(config.model.model_url, "file:///models/lotto");
        assert_eq!(config.storage_dir, PathBuf::from("/tmp/lotto"));
    }

    #[test]
    fn test_blank_env_is_ignored() {
        let config = Config::from_vars(|_| Some("  ".to_string()));

        assert_eq!(config.model.model_url, ModelConfig::default().model_url);
    }
}
