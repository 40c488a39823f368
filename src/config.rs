use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;
use validator::{Validate, ValidationError};

use crate::sql_generator::DialectKind;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    #[error("Parse error for {field}: {value} - {source}")]
    Parse {
        field: String,
        value: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Compiler configuration with validation
#[derive(Clone, Debug, Validate, Serialize, Deserialize, PartialEq)]
#[validate(schema(function = "validate_page_sizes"))]
#[serde(default)]
pub struct CompilerConfig {
    /// SQL dialect the renderer targets
    pub dialect: DialectKind,

    /// Longest accepted include path, in relationship segments
    #[validate(range(
        min = 1,
        max = 16,
        message = "Max include depth must be between 1 and 16"
    ))]
    pub max_include_depth: u32,

    /// Page size applied when a paginated query does not name one
    #[validate(range(min = 1, message = "Default page size must be at least 1"))]
    pub default_page_size: u32,

    /// Largest page size a query may request
    #[validate(range(
        min = 1,
        max = 10000,
        message = "Max page size must be between 1 and 10000"
    ))]
    pub max_page_size: u32,
}

fn validate_page_sizes(config: &CompilerConfig) -> Result<(), ValidationError> {
    if config.default_page_size > config.max_page_size {
        let mut error = ValidationError::new("page_sizes");
        error.message = Some("Default page size cannot exceed max page size".into());
        return Err(error);
    }
    Ok(())
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            dialect: DialectKind::Ansi,
            max_include_depth: 4,
            default_page_size: 10,
            max_page_size: 100,
        }
    }
}

impl CompilerConfig {
    /// Create configuration from environment variables with validation
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            dialect: parse_env_var("RESOURCE_SQL_DIALECT", "ansi")?,
            max_include_depth: parse_env_var("RESOURCE_SQL_MAX_INCLUDE_DEPTH", "4")?,
            default_page_size: parse_env_var("RESOURCE_SQL_DEFAULT_PAGE_SIZE", "10")?,
            max_page_size: parse_env_var("RESOURCE_SQL_MAX_PAGE_SIZE", "100")?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Create configuration from YAML file
    pub fn from_yaml_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Parse {
            field: "yaml_file".to_string(),
            value: "file read failed".to_string(),
            source: Box::new(e),
        })?;

        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
            field: "yaml_content".to_string(),
            value: content,
            source: Box::new(e),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Overlay the values the CLI set explicitly; the rest keep their
    /// current (environment or file) values.
    pub fn merge(&mut self, cli: &CliConfig) -> Result<(), ConfigError> {
        if let Some(dialect) = cli.dialect {
            self.dialect = dialect;
        }
        if let Some(depth) = cli.max_include_depth {
            self.max_include_depth = depth;
        }
        if let Some(size) = cli.default_page_size {
            self.default_page_size = size;
        }
        if let Some(size) = cli.max_page_size {
            self.max_page_size = size;
        }
        self.validate()?;
        Ok(())
    }
}

/// CLI configuration (parsed from command line arguments)
#[derive(Clone, Debug, Default)]
pub struct CliConfig {
    pub dialect: Option<DialectKind>,
    pub max_include_depth: Option<u32>,
    pub default_page_size: Option<u32>,
    pub max_page_size: Option<u32>,
}

/// Parse an environment variable with a default value
fn parse_env_var<T: std::str::FromStr>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = match env::var(key) {
        Ok(value) => value,
        Err(env::VarError::NotPresent) => default.to_string(),
        Err(error) => return Err(error.into()),
    };
    value.parse().map_err(|e| ConfigError::Parse {
        field: key.to_string(),
        value,
        source: Box::new(e),
    })
}
