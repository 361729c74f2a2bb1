//! Unfinished socket wrapper.
//!
//! Opens a TCP connection to a server and tracks nickname state. There is
//! no message framing, no read loop, and no protocol state machine yet;
//! this type only consumes validated configuration values and holds the
//! open stream.

use std::net::{SocketAddr, TcpStream, ToSocketAddrs};

use {serde::Deserialize, serde_json::Value, tracing::info};

use crate::error::{Error, Result};

/// Default IRC port used when a server instance does not set one.
pub const DEFAULT_PORT: u16 = 6667;

const fn default_port() -> u16 {
    DEFAULT_PORT
}

/// Connection settings for one server instance, as produced by the
/// configuration subsystem (a resolved `server` instance map).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerParams {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub nick: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub realname: Option<String>,
}

impl ServerParams {
    /// Extract connection settings from one resolved server instance.
    pub fn from_instance(name: &str, instance: &Value) -> Result<Self> {
        serde_json::from_value(instance.clone()).map_err(|source| Error::InvalidServer {
            instance: name.to_string(),
            source,
        })
    }
}

/// A single blocking TCP connection to an IRC server.
#[derive(Debug)]
pub struct Connection {
    ipv6: bool,
    connected: bool,
    nickname: Option<String>,
    real_nickname: Option<String>,
    server: Option<String>,
    port: u16,
    stream: Option<TcpStream>,
}

impl Default for Connection {
    fn default() -> Self {
        Self {
            ipv6: false,
            connected: false,
            nickname: None,
            real_nickname: None,
            server: None,
            port: DEFAULT_PORT,
            stream: None,
        }
    }
}

impl Connection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A connection that resolves the server to an IPv6 address.
    #[must_use]
    pub fn ipv6() -> Self {
        Self {
            ipv6: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn connected(&self) -> bool {
        self.connected
    }

    #[must_use]
    pub fn server(&self) -> Option<&str> {
        self.server.as_deref()
    }

    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Nickname as acknowledged by the server. Until registration is
    /// implemented this mirrors the requested nickname.
    #[must_use]
    pub fn real_nickname(&self) -> Option<&str> {
        self.real_nickname.as_deref()
    }

    /// Open the socket and stage registration state.
    ///
    /// An absent username falls back to the nickname, and an absent
    /// realname falls back to the username, matching what will eventually
    /// be sent in USER.
    pub fn connect(&mut self, params: &ServerParams) -> Result<()> {
        let addr = self.resolve(&params.host, params.port)?;
        info!(host = %params.host, port = params.port, "connecting");
        let stream = TcpStream::connect(addr)?;
        self.server = Some(params.host.clone());
        self.port = params.port;
        self.stream = Some(stream);
        self.connected = true;

        if let Some(password) = &params.password {
            self.password(password);
        }
        let username = params.username.as_deref().unwrap_or(&params.nick);
        self.nick(&params.nick);
        self.user(username, params.realname.as_deref().unwrap_or(username));
        Ok(())
    }

    /// Stage the nickname.
    ///
    /// TODO: send NICK on the wire once message framing exists.
    pub fn nick(&mut self, nickname: &str) {
        self.nickname = Some(nickname.to_string());
        self.real_nickname = Some(nickname.to_string());
    }

    /// Stage the connection password.
    ///
    /// TODO: send PASS on the wire once message framing exists.
    pub fn password(&mut self, _password: &str) {}

    /// Stage username and realname.
    ///
    /// TODO: send USER on the wire once message framing exists.
    pub fn user(&mut self, _username: &str, _realname: &str) {}

    fn resolve(&self, host: &str, port: u16) -> Result<SocketAddr> {
        let wanted_v6 = self.ipv6;
        (host, port)
            .to_socket_addrs()?
            .find(|addr| addr.is_ipv6() == wanted_v6)
            .ok_or_else(|| {
                Error::Io(std::io::Error::new(
                    std::io::ErrorKind::AddrNotAvailable,
                    format!(
                        "no {} address for {host}",
                        if wanted_v6 { "IPv6" } else { "IPv4" }
                    ),
                ))
            })
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn params_from_full_instance() {
        let instance = json!({
            "auto": false,
            "host": "irc.freenode.net",
            "nick": "simpleirc",
            "password": null,
            "port": 6667,
            "realname": null,
            "username": null
        });
        let params = ServerParams::from_instance("freenode", &instance).unwrap();
        assert_eq!(params.host, "irc.freenode.net");
        assert_eq!(params.port, 6667);
        assert_eq!(params.nick, "simpleirc");
        assert_eq!(params.username, None);
        assert_eq!(params.password, None);
        assert_eq!(params.realname, None);
    }

    #[test]
    fn params_port_defaults_when_absent() {
        let instance = json!({"host": "h", "nick": "n"});
        let params = ServerParams::from_instance("x", &instance).unwrap();
        assert_eq!(params.port, DEFAULT_PORT);
    }

    #[test]
    fn params_missing_host_is_invalid() {
        let instance = json!({"nick": "n", "port": 6667});
        let result = ServerParams::from_instance("x", &instance);
        assert!(matches!(result, Err(Error::InvalidServer { .. })));
    }

    #[test]
    fn new_connection_state() {
        let conn = Connection::new();
        assert!(!conn.connected());
        assert_eq!(conn.port(), DEFAULT_PORT);
        assert_eq!(conn.server(), None);
        assert_eq!(conn.real_nickname(), None);
    }

    #[test]
    fn nick_stages_real_nickname() {
        let mut conn = Connection::new();
        conn.nick("simpleirc");
        assert_eq!(conn.real_nickname(), Some("simpleirc"));
    }
}
