use std::{
    fs,
    path::PathBuf,
    sync::{LazyLock, RwLock},
};

use documented::{Documented, DocumentedFields};
use serde::{Deserialize, Serialize};
use toml_edit::DocumentMut;
use tracing::{debug, info};

use crate::{
    annotations::annotate_toml_table,
    error::{ConfigError, Result},
    paths::{resolve_path, xdg_config_home, xdg_data_home},
};

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Application's configuration
#[derive(Clone, Debug, Deserialize, Serialize, Documented, DocumentedFields)]
pub struct Config {
    /// Path to the SQLite database file.
    /// Default: $XDG_DATA_HOME/minishop/shop.db
    pub db_path: Option<String>,

    /// Number of rows returned by a search when no page size is given.
    /// Default: 20
    pub default_page_size: Option<i64>,

    /// Upper bound for any requested page size.
    /// Default: 100
    pub max_page_size: Option<i64>,

    /// Skip the count query when the fetched page proves there are no further rows.
    /// Default: true
    pub optimized_count: Option<bool>,
}

pub static CONFIG: LazyLock<RwLock<Option<Config>>> = LazyLock::new(|| RwLock::new(None));

pub static CONFIG_PATH: LazyLock<RwLock<PathBuf>> = LazyLock::new(|| {
    RwLock::new(match std::env::var("MINISHOP_CONFIG") {
        Ok(path_str) => PathBuf::from(path_str),
        Err(_) => xdg_config_home().join("minishop").join("config.toml"),
    })
});

pub fn init() -> Result<()> {
    let config = Config::new()?;
    let mut global_config = CONFIG.write().unwrap();
    *global_config = Some(config);
    Ok(())
}

pub fn get_config() -> Config {
    {
        let config_guard = CONFIG.read().unwrap();
        if let Some(config) = config_guard.as_ref() {
            return config.clone();
        }
    }

    let mut config_guard = CONFIG.write().unwrap();
    config_guard.get_or_insert_with(Config::default_config).clone()
}

impl Config {
    pub fn default_config() -> Self {
        let data_root = xdg_data_home().join("minishop");

        Self {
            db_path: Some(format!("{}/shop.db", data_root.display())),
            default_page_size: Some(DEFAULT_PAGE_SIZE),
            max_page_size: Some(MAX_PAGE_SIZE),
            optimized_count: Some(true),
        }
    }

    /// Loads the configuration from the configuration file.
    /// If the configuration file is not found, the default configuration is used.
    pub fn new() -> Result<Self> {
        let config_path = CONFIG_PATH.read().unwrap().to_path_buf();

        let mut config = match fs::read_to_string(&config_path) {
            Ok(content) => toml::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(
                    path = %config_path.display(),
                    "config file not found, using defaults"
                );
                Self::default_config()
            }
            Err(err) => return Err(ConfigError::IoError(err)),
        };

        config.resolve()?;

        Ok(config)
    }

    pub fn resolve(&mut self) -> Result<()> {
        let default_page_size = *self.default_page_size.get_or_insert(DEFAULT_PAGE_SIZE);
        let max_page_size = *self.max_page_size.get_or_insert(MAX_PAGE_SIZE);
        self.optimized_count.get_or_insert(true);

        if max_page_size <= 0 {
            return Err(ConfigError::InvalidPageSize {
                field: "max_page_size",
                value: max_page_size,
            });
        }
        if default_page_size <= 0 || default_page_size > max_page_size {
            return Err(ConfigError::InvalidPageSize {
                field: "default_page_size",
                value: default_page_size,
            });
        }

        Ok(())
    }

    pub fn get_db_path(&self) -> Result<PathBuf> {
        if let Ok(env_path) = std::env::var("MINISHOP_DB") {
            return resolve_path(&env_path);
        }
        if let Some(db_path) = &self.db_path {
            return resolve_path(db_path);
        }
        Ok(xdg_data_home().join("minishop").join("shop.db"))
    }

    pub fn default_page_size(&self) -> i64 {
        self.default_page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    pub fn max_page_size(&self) -> i64 {
        self.max_page_size.unwrap_or(MAX_PAGE_SIZE)
    }

    pub fn optimized_count(&self) -> bool {
        self.optimized_count.unwrap_or(true)
    }

    /// Clamps a requested page size to `max_page_size`, using
    /// `default_page_size` when none was requested.
    pub fn page_size(&self, requested: Option<i64>) -> i64 {
        requested
            .unwrap_or_else(|| self.default_page_size())
            .min(self.max_page_size())
    }

    pub fn to_annotated_document(&self) -> Result<DocumentMut> {
        let toml_string = toml::to_string_pretty(self)?;
        let mut doc = toml_string.parse::<DocumentMut>()?;

        annotate_toml_table::<Config>(doc.as_table_mut(), true)?;

        Ok(doc)
    }
}

pub fn generate_default_config() -> Result<()> {
    let config_path = CONFIG_PATH.read().unwrap().to_path_buf();

    if config_path.exists() {
        return Err(ConfigError::ConfigAlreadyExists);
    }

    let annotated_doc = Config::default_config().to_annotated_document()?;

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(&config_path, annotated_doc.to_string())?;
    info!(
        "Default configuration file generated with documentation at: {}",
        config_path.display()
    );
    Ok(())
}
