//! Errors raised while loading, saving, or validating `config.ron`.

/// Everything that can go wrong between the config file and a usable [`crate::Config`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    #[error("failed to read config: {0}")]
    ReadError(#[source] std::io::Error),

    /// The config directory or file could not be written.
    #[error("failed to write config: {0}")]
    WriteError(#[source] std::io::Error),

    /// The file is not valid RON for [`crate::Config`].
    #[error("failed to parse config: {0}")]
    ParseError(#[source] ron::error::SpannedError),

    /// The in-memory config could not be turned into RON.
    #[error("failed to serialize config: {0}")]
    SerializeError(#[source] ron::Error),

    /// A value parsed fine but is outside the range the generator or LOD
    /// controller can work with.
    #[error("invalid config value `{field}`: {reason}")]
    Invalid {
        /// Dotted path of the offending field, e.g. `generator.width`.
        field: &'static str,
        /// Human-readable constraint that was violated.
        reason: String,
    },
}
