//! Client and bot front doors.
//!
//! A [`Client`] loads the client profile; a [`Bot`] loads the client
//! profile and a bot profile parented to it, so bot configuration only
//! declares overrides. Both resolve named server instances into
//! [`ServerParams`] for the connection layer.

use std::path::PathBuf;

use {
    serde_json::Value,
    simpleirc_config::{BotProfile, ClientProfile, default_config_dir},
};

pub mod connection;
pub mod error;

pub use {
    connection::{Connection, DEFAULT_PORT, ServerParams},
    error::{Error, Result},
};

fn server_params(servers: &Value, name: &str) -> Result<ServerParams> {
    let instance = servers.get(name).ok_or_else(|| Error::unknown_server(name))?;
    ServerParams::from_instance(name, instance)
}

/// An IRC client driven by the client profile.
#[derive(Debug)]
pub struct Client {
    config: ClientProfile,
    connection: Option<Connection>,
}

impl Client {
    /// Load (or seed) the client configuration under `~/.simpleirc`.
    pub fn new() -> Result<Self> {
        Self::new_in(default_config_dir())
    }

    /// Load (or seed) the client configuration under `dir`.
    pub fn new_in(dir: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            config: ClientProfile::open_in(dir)?,
            connection: None,
        })
    }

    #[must_use]
    pub fn config(&self) -> &ClientProfile {
        &self.config
    }

    #[must_use]
    pub fn connection(&self) -> Option<&Connection> {
        self.connection.as_ref()
    }

    /// Resolved connection settings for one named server instance.
    pub fn server(&self, name: &str) -> Result<ServerParams> {
        let servers = self.config.get("server")?;
        server_params(&servers, name)
    }

    /// Open a connection to the named server instance.
    pub fn connect(&mut self, name: &str) -> Result<()> {
        let params = self.server(name)?;
        let mut connection = Connection::new();
        connection.connect(&params)?;
        self.connection = Some(connection);
        Ok(())
    }
}

/// An IRC bot: client configuration plus bot overrides.
#[derive(Debug)]
pub struct Bot {
    client_config: ClientProfile,
    config: BotProfile,
    connection: Option<Connection>,
}

impl Bot {
    /// Load (or seed) both profiles under `~/.simpleirc`.
    pub fn new() -> Result<Self> {
        Self::new_in(default_config_dir())
    }

    /// Load (or seed) both profiles under `dir`. The client profile loads
    /// first; the bot profile inherits from its store.
    pub fn new_in(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        let client_config = ClientProfile::open_in(&dir)?;
        let config = BotProfile::open_in(dir, client_config.store())?;
        Ok(Self {
            client_config,
            config,
            connection: None,
        })
    }

    #[must_use]
    pub fn config(&self) -> &BotProfile {
        &self.config
    }

    #[must_use]
    pub fn client_config(&self) -> &ClientProfile {
        &self.client_config
    }

    #[must_use]
    pub fn connection(&self) -> Option<&Connection> {
        self.connection.as_ref()
    }

    /// Resolved connection settings for one named server instance, with
    /// client-profile values showing through bot overrides.
    pub fn server(&self, name: &str) -> Result<ServerParams> {
        let servers = self.config.get("server")?;
        server_params(&servers, name)
    }

    /// Open a connection to the named server instance.
    pub fn connect(&mut self, name: &str) -> Result<()> {
        let params = self.server(name)?;
        let mut connection = Connection::new();
        connection.connect(&params)?;
        self.connection = Some(connection);
        Ok(())
    }
}
