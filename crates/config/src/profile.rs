//! Client and bot profiles: fixed filenames and seed data.
//!
//! A profile binds a [`ConfigFile`] to its default filename and the initial
//! settings written when no file exists yet. The bot profile holds the
//! client profile's store as parent, so bot configuration only declares
//! overrides and inherits the rest at lookup time.

use std::path::PathBuf;

use serde_json::{Map, Value, json};

use crate::{
    error::Result,
    file::{ConfigFile, Json, default_config_dir},
    store::SharedStore,
};

/// Default file name for the client profile.
pub const CLIENT_FILENAME: &str = "client.json";

/// Default file name for the bot profile.
pub const BOT_FILENAME: &str = "bot.json";

fn object(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap_or_default()
}

/// The client-side configuration file (`client.json`).
#[derive(Debug)]
pub struct ClientProfile {
    file: ConfigFile,
}

impl ClientProfile {
    /// Open (or seed) the client profile under the default `~/.simpleirc`.
    pub fn open() -> Result<Self> {
        Self::open_in(default_config_dir())
    }

    /// Open (or seed) the client profile under `dir`.
    pub fn open_in(dir: impl Into<PathBuf>) -> Result<Self> {
        let file = ConfigFile::open(dir, CLIENT_FILENAME, Box::new(Json), Self::seed(), None)?;
        Ok(Self { file })
    }

    /// Initial settings written when no client file exists yet.
    #[must_use]
    pub fn seed() -> Map<String, Value> {
        object(json!({
            "server": {
                "freenode": {
                    "auto": false,
                    "host": "irc.freenode.net",
                    "nick": "simpleirc",
                    "password": null,
                    "port": 6667,
                    "realname": null,
                    "username": null
                }
            }
        }))
    }

    #[must_use]
    pub fn file(&self) -> &ConfigFile {
        &self.file
    }

    /// Shared handle to the backing store, for parenting a bot profile.
    #[must_use]
    pub fn store(&self) -> SharedStore {
        self.file.store()
    }

    /// Resolve a top-level key.
    pub fn get(&self, key: &str) -> Result<Value> {
        self.file.get(key)
    }

    /// Persist the current (corrected) data.
    pub fn write(&self) -> Result<()> {
        self.file.write()
    }
}

/// The bot-side configuration file (`bot.json`), parented to a client
/// profile's store.
#[derive(Debug)]
pub struct BotProfile {
    file: ConfigFile,
}

impl BotProfile {
    /// Open (or seed) the bot profile under the default `~/.simpleirc`.
    pub fn open(parent: SharedStore) -> Result<Self> {
        Self::open_in(default_config_dir(), parent)
    }

    /// Open (or seed) the bot profile under `dir`.
    pub fn open_in(dir: impl Into<PathBuf>, parent: SharedStore) -> Result<Self> {
        let file = ConfigFile::open(dir, BOT_FILENAME, Box::new(Json), Self::seed(), Some(parent))?;
        Ok(Self { file })
    }

    /// Initial settings written when no bot file exists yet. Only the
    /// override; everything else is inherited from the client profile.
    #[must_use]
    pub fn seed() -> Map<String, Value> {
        object(json!({
            "server": {
                "freenode": {
                    "auto": true
                }
            }
        }))
    }

    #[must_use]
    pub fn file(&self) -> &ConfigFile {
        &self.file
    }

    #[must_use]
    pub fn store(&self) -> SharedStore {
        self.file.store()
    }

    /// Resolve a top-level key, merged over the client profile's data.
    pub fn get(&self, key: &str) -> Result<Value> {
        self.file.get(key)
    }

    /// Persist the current (corrected) data.
    pub fn write(&self) -> Result<()> {
        self.file.write()
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn client_profile_seeds_expected_file() {
        let tmp = TempDir::new().unwrap();
        let client = ClientProfile::open_in(tmp.path()).unwrap();

        assert_eq!(client.file().filename(), CLIENT_FILENAME);
        assert!(tmp.path().join(CLIENT_FILENAME).is_file());
        assert_eq!(
            client.get("server").unwrap(),
            json!({
                "freenode": {
                    "auto": false,
                    "host": "irc.freenode.net",
                    "nick": "simpleirc",
                    "password": null,
                    "port": 6667,
                    "realname": null,
                    "username": null
                }
            })
        );
    }

    #[test]
    fn bot_lookup_inherits_from_client_and_overrides_auto() {
        let tmp = TempDir::new().unwrap();
        let client = ClientProfile::open_in(tmp.path()).unwrap();
        let bot = BotProfile::open_in(tmp.path(), client.store()).unwrap();

        assert!(tmp.path().join(BOT_FILENAME).is_file());

        let servers = bot.get("server").unwrap();
        let freenode = servers.get("freenode").unwrap();
        assert_eq!(freenode.get("auto"), Some(&json!(true)));
        assert_eq!(freenode.get("host"), Some(&json!("irc.freenode.net")));
        assert_eq!(freenode.get("nick"), Some(&json!("simpleirc")));
        assert_eq!(freenode.get("port"), Some(&json!(6667)));

        // The bot's own file carries only the override.
        let on_disk: Value = serde_json::from_str(
            &std::fs::read_to_string(tmp.path().join(BOT_FILENAME)).unwrap(),
        )
        .unwrap();
        assert_eq!(on_disk, json!({"server": {"freenode": {"auto": true}}}));
    }

    #[test]
    fn client_edit_shows_through_bot_until_shadowed() {
        let tmp = TempDir::new().unwrap();
        let client = ClientProfile::open_in(tmp.path()).unwrap();
        let bot = BotProfile::open_in(tmp.path(), client.store()).unwrap();

        client.store().borrow_mut().set_data(
            json!({"server": {"freenode": {"auto": false, "nick": "renamed"}}})
                .as_object()
                .cloned()
                .unwrap(),
        );

        let servers = bot.get("server").unwrap();
        let freenode = servers.get("freenode").unwrap();
        assert_eq!(freenode.get("nick"), Some(&json!("renamed")));
        assert_eq!(freenode.get("auto"), Some(&json!(true)));
    }
}
