//! Configuration loading, validation, inheritance, and persistence for
//! simpleirc.
//!
//! Configuration lives in a dot-directory (default `~/.simpleirc`, created
//! owner-only) as one JSON file per profile: `client.json` and `bot.json`.
//! Each file is a nested mapping of section → instance → field, validated
//! against per-field schemas (type, required, default). A bot profile holds
//! the client profile's store as parent and only declares overrides;
//! lookups merge parent and local data at call time with local values
//! winning.
//!
//! File-level problems (unparseable file, unknown section, IO) abort
//! construction. Per-field problems are logged and remove only the
//! offending instance; the corrected data is what gets persisted on the
//! next write.

pub mod error;
pub mod file;
pub mod profile;
pub mod property;
pub mod store;

pub use {
    error::{Error, FieldError, Result},
    file::{ConfigFile, ConfigFormat, Json, default_config_dir},
    profile::{BOT_FILENAME, BotProfile, CLIENT_FILENAME, ClientProfile},
    property::{Outcome, PropertySchema, PropertyType, SectionSchema},
    store::{ConfigStore, SharedStore, deep_merge},
};
