//! Configuration loading and management

use crate::core::error::ConfigError;
use crate::core::query::DEFAULT_MAX_PAGE_SIZE;
use crate::mapping::MappedProperty;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Paging limits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagingConfig {
    /// Upper bound for client-requested page sizes
    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,
}

fn default_max_page_size() -> usize {
    DEFAULT_MAX_PAGE_SIZE
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
        }
    }
}

/// Page link settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinksSettings {
    /// Absolute base URL that route paths are resolved against
    pub base_url: String,
}

impl Default for LinksSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000/".to_string(),
        }
    }
}

/// Field mapping declared for one resource/entity pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingConfig {
    /// Resource type name (e.g., "country")
    pub resource: String,

    /// Entity type name (e.g., "country")
    pub entity: String,

    /// Resource field -> mapped entity fields, in declaration order
    pub fields: IndexMap<String, Vec<MappedProperty>>,
}

/// Complete configuration of the shaping engine
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapingConfig {
    #[serde(default)]
    pub paging: PagingConfig,

    #[serde(default)]
    pub links: LinksSettings,

    /// Field mappings, one per resource/entity pair
    #[serde(default)]
    pub mappings: Vec<MappingConfig>,
}

impl ShapingConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => ConfigError::IoError {
                message: e.to_string(),
            },
        })?;

        Self::parse(&content, Some(path.display().to_string()))
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Self::parse(yaml, None)
    }

    fn parse(yaml: &str, file: Option<String>) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError {
            file,
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configured values are usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.paging.max_page_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "paging.max_page_size".to_string(),
                value: "0".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        if let Err(e) = url::Url::parse(&self.links.base_url) {
            return Err(ConfigError::InvalidValue {
                field: "links.base_url".to_string(),
                value: self.links.base_url.clone(),
                message: e.to_string(),
            });
        }

        Ok(())
    }

    /// Find the mapping declared for a resource/entity pair
    pub fn find_mapping(&self, resource: &str, entity: &str) -> Option<&MappingConfig> {
        self.mappings
            .iter()
            .find(|m| m.resource == resource && m.entity == entity)
    }

    /// Create a default configuration for the country demo and tests
    pub fn default_config() -> Self {
        let same = |name: &str| vec![MappedProperty::new(name)];

        Self {
            paging: PagingConfig::default(),
            links: LinksSettings::default(),
            mappings: vec![MappingConfig {
                resource: "country".to_string(),
                entity: "country".to_string(),
                fields: IndexMap::from([
                    ("id".to_string(), same("id")),
                    ("englishName".to_string(), same("englishName")),
                    ("chineseName".to_string(), same("chineseName")),
                    ("abbreviation".to_string(), same("abbreviation")),
                ]),
            }],
        }
    }
}
