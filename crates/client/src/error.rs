/// Crate-wide result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Client and connection errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration subsystem failure.
    #[error(transparent)]
    Config(#[from] simpleirc_config::Error),

    /// A resolved server instance is not usable as connection settings.
    #[error("server instance {instance} is not connectable: {source}")]
    InvalidServer {
        instance: String,
        #[source]
        source: serde_json::Error,
    },

    /// No server instance with this name exists in the resolved data.
    #[error("no server instance named {instance}")]
    UnknownServer { instance: String },

    /// Socket-level failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    #[must_use]
    pub fn unknown_server(instance: impl Into<String>) -> Self {
        Self::UnknownServer {
            instance: instance.into(),
        }
    }
}
