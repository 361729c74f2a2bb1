//! Configuration file lifecycle: directory creation, seeding, load,
//! validation, and write-back.
//!
//! Construction runs the whole lifecycle to completion: ensure the config
//! directory exists (created owner-only, the files may hold server
//! passwords), then either seed a missing file from profile defaults or
//! load, parse, and validate an existing one. There is no
//! partially-constructed [`ConfigFile`]; file-level failures abort
//! construction while per-field failures only remove the offending
//! instance from the corrected data.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde_json::{Map, Value};
use tracing::{debug, error, info};

use crate::{
    error::{Error, FieldError, Result},
    property::{Outcome, SectionSchema},
    store::{ConfigStore, SharedStore},
};

/// Mode for freshly created configuration directories: owner-only.
#[cfg(unix)]
pub const CONFIG_DIR_MODE: u32 = 0o700;

/// Default configuration directory: `~/.simpleirc`.
#[must_use]
pub fn default_config_dir() -> PathBuf {
    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".simpleirc"))
        .unwrap_or_else(|| PathBuf::from(".simpleirc"))
}

/// On-disk serialization format for a configuration file.
///
/// JSON is the shipped implementation; other formats are additional
/// variants satisfying the same contract.
pub trait ConfigFormat: std::fmt::Debug {
    /// Parse raw file contents into the nested config mapping.
    fn parse(&self, raw: &str, path: &Path) -> Result<Map<String, Value>>;

    /// Render the mapping as human-readable (indented) text.
    fn render(&self, data: &Map<String, Value>) -> Result<String>;
}

/// Pretty-printed JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json;

impl ConfigFormat for Json {
    fn parse(&self, raw: &str, path: &Path) -> Result<Map<String, Value>> {
        serde_json::from_str(raw).map_err(|source| Error::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn render(&self, data: &Map<String, Value>) -> Result<String> {
        serde_json::to_string_pretty(data).map_err(|source| Error::Render { source })
    }
}

/// A [`ConfigStore`] bound to a file on disk.
///
/// The file is exclusively owned by this instance for the process's
/// lifetime; a fresh load requires a new instance.
#[derive(Debug)]
pub struct ConfigFile {
    dir: PathBuf,
    filename: String,
    path: PathBuf,
    format: Box<dyn ConfigFormat>,
    store: SharedStore,
    loaded: bool,
}

impl ConfigFile {
    /// Open the file at `dir/filename`, seeding it with `seed` when it does
    /// not exist yet. A `parent` store makes lookups through this file's
    /// store inherit the parent's values, and lets validation skip fields
    /// the parent has already validated.
    pub fn open(
        dir: impl Into<PathBuf>,
        filename: impl Into<String>,
        format: Box<dyn ConfigFormat>,
        seed: Map<String, Value>,
        parent: Option<SharedStore>,
    ) -> Result<Self> {
        let dir = dir.into();
        let filename = filename.into();
        let path = dir.join(&filename);
        let store = match parent {
            Some(parent) => ConfigStore::with_parent(parent),
            None => ConfigStore::new(),
        }
        .shared();
        let mut file = Self {
            dir,
            filename,
            path,
            format,
            store,
            loaded: false,
        };
        file.ensure_dir()?;
        if file.path.is_file() {
            file.load()?;
        } else {
            file.create_from_seed(seed)?;
        }
        Ok(file)
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Resolved path of the file on disk.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the data came from a successful read of the file. Stays
    /// false when the file was just created from seed data.
    #[must_use]
    pub const fn loaded(&self) -> bool {
        self.loaded
    }

    /// Shared handle to the backing store.
    #[must_use]
    pub fn store(&self) -> SharedStore {
        SharedStore::clone(&self.store)
    }

    /// Resolve a top-level key through the backing store (parent-merged).
    pub fn get(&self, key: &str) -> Result<Value> {
        self.store.borrow().get(key)
    }

    fn ensure_dir(&self) -> Result<()> {
        if self.dir.is_dir() {
            return Ok(());
        }
        info!(path = %self.dir.display(), "creating configuration directory");
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            fs::DirBuilder::new()
                .recursive(true)
                .mode(CONFIG_DIR_MODE)
                .create(&self.dir)?;
        }
        #[cfg(not(unix))]
        fs::create_dir_all(&self.dir)?;
        Ok(())
    }

    fn create_from_seed(&mut self, seed: Map<String, Value>) -> Result<()> {
        info!(file = %self.filename, "creating configuration file and loading initial settings");
        self.store.borrow_mut().set_data(seed);
        self.write()
    }

    /// Read, parse, and validate the file, replacing the store's data with
    /// the corrected mapping.
    fn load(&mut self) -> Result<()> {
        info!(file = %self.filename, "loading configuration file");
        let raw = fs::read_to_string(&self.path)?;
        let data = self.format.parse(&raw, &self.path)?;
        let corrected = self.validate(data)?;
        self.store.borrow_mut().set_data(corrected);
        self.loaded = true;
        Ok(())
    }

    /// Persist the store's current data to disk.
    pub fn write(&self) -> Result<()> {
        info!(file = %self.filename, "writing settings out");
        let rendered = self.format.render(self.store.borrow().data())?;
        fs::write(&self.path, rendered)?;
        Ok(())
    }

    /// Validate a raw nested mapping against the section registry.
    ///
    /// Per instance, every schema-declared field is checked even after one
    /// fails, so all problems are reported; any failure removes the whole
    /// instance from the corrected data. Substituted defaults are written
    /// back in place. Fields a validated parent store already holds are
    /// skipped, and fields not declared in the schema pass through
    /// untouched. An unknown section fails the whole load.
    fn validate(&self, mut data: Map<String, Value>) -> Result<Map<String, Value>> {
        let parent = self.store.borrow().parent().cloned();
        let mut bad_sections = Vec::new();

        for (section, body) in &mut data {
            let schema = SectionSchema::for_section(section)
                .ok_or_else(|| Error::unknown_section(section.as_str()))?;
            debug!(section = %section, "validating section");

            let Some(instances) = body.as_object_mut() else {
                error!(section = %section, "section is not a mapping of instances and is being removed from the config");
                bad_sections.push(section.clone());
                continue;
            };

            let mut invalid = Vec::new();
            for (instance, fields) in instances.iter_mut() {
                debug!(section = %section, instance = %instance, "validating instance");
                let mut instance_valid = true;

                for (field, property) in schema.fields() {
                    if fields.get(field).is_none()
                        && parent_has(parent.as_ref(), section, instance, field)
                    {
                        // Already passed validation in the parent profile.
                        continue;
                    }
                    match property.validate(fields.get(field)) {
                        Ok(Outcome::Accepted) => {},
                        Ok(Outcome::Default(value)) => {
                            if let Some(map) = fields.as_object_mut() {
                                map.insert(field.to_string(), value);
                            }
                        },
                        Err(FieldError::TypeMismatch { expected, found }) => {
                            instance_valid = false;
                            error!(
                                section = %section,
                                instance = %instance,
                                field,
                                found,
                                expected = %expected,
                                "field is the wrong type"
                            );
                        },
                        Err(FieldError::MissingRequired) => {
                            instance_valid = false;
                            error!(
                                section = %section,
                                instance = %instance,
                                field,
                                "field is a required value and must be defined"
                            );
                        },
                    }
                }

                if !instance_valid {
                    error!(
                        section = %section,
                        instance = %instance,
                        "instance is not valid and is being removed from the config"
                    );
                    invalid.push(instance.clone());
                }
            }
            for name in invalid {
                instances.remove(&name);
            }
        }

        for name in bad_sections {
            data.remove(&name);
        }
        Ok(data)
    }
}

/// Whether the parent's (already validated) store holds
/// `section.instance.field`. Presence at all three levels is enough; the
/// value itself was checked when the parent loaded.
fn parent_has(parent: Option<&SharedStore>, section: &str, instance: &str, field: &str) -> bool {
    let Some(parent) = parent else {
        return false;
    };
    let parent = parent.borrow();
    parent
        .data()
        .get(section)
        .and_then(|s| s.get(instance))
        .and_then(|i| i.get(field))
        .is_some()
}
