use thiserror::Error;

#[derive(Error, Debug)]
pub enum GpError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Variable index {index} out of range for {num_vars} declared inputs")]
    VariableOutOfRange { index: usize, num_vars: usize },

    #[error("Cannot select from an empty population")]
    EmptyPopulation,

    #[error("No individual with a valid fitness")]
    NoValidIndividual,

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config source error: {0}")]
    ConfigSource(#[from] config::ConfigError),

    #[error("TOML error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, GpError>;
