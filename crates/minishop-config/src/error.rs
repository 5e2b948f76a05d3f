use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("TOML serialization error: {0}")]
    #[diagnostic(
        code(minishop_config::toml_serialize),
        help("Check your configuration structure for invalid values")
    )]
    TomlSerError(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    #[diagnostic(
        code(minishop_config::toml_deserialize),
        help("Check your config.toml syntax and structure")
    )]
    TomlDeError(#[from] toml::de::Error),

    #[error("Failed to parse TOML: {0}")]
    #[diagnostic(code(minishop_config::toml))]
    Toml(#[from] toml_edit::TomlError),

    #[error("Configuration file already exists")]
    #[diagnostic(
        code(minishop_config::already_exists),
        help("Remove the existing config file or use a different location")
    )]
    ConfigAlreadyExists,

    #[error("Invalid page size setting `{field}`: {value}")]
    #[diagnostic(
        code(minishop_config::invalid_page_size),
        help("Page sizes must be positive and default_page_size must not exceed max_page_size")
    )]
    InvalidPageSize { field: &'static str, value: i64 },

    #[error("Path is empty")]
    #[diagnostic(code(minishop_config::empty_path))]
    EmptyPath,

    #[error("Environment variable `{var}` not set in `{input}`")]
    #[diagnostic(
        code(minishop_config::missing_env_var),
        help("Export the variable or use an absolute path")
    )]
    MissingEnvVar { var: String, input: String },

    #[error("Unclosed variable expression starting at `{0}`")]
    #[diagnostic(code(minishop_config::unclosed_variable))]
    UnclosedVariable(String),

    #[error("Encountered unexpected TOML item: {0}")]
    #[diagnostic(code(minishop_config::unexpected_toml_item))]
    UnexpectedTomlItem(String),

    #[error("IO error: {0}")]
    #[diagnostic(code(minishop_config::io))]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
