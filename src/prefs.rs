//! Preference store interfaces and the configuration codec.
//!
//! The host exposes one flat string key-value namespace per plugin. The codec
//! lays a `Configuration` out as sequential per-slot keys and discovers the
//! entry count on load by probing `source_location_{i}` until a key is
//! missing; there is no stored length.

use indexmap::IndexMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::config::{Configuration, DestinationSelection, SourceEntry};
use crate::constants::config::{DEFAULT_DESTINATION_NAME, DEFAULT_REQUESTED_COUNT};
use crate::constants::prefs::{
    DESTINATION_LOCATION_KEY, DESTINATION_NAME_KEY, SOURCE_COUNT_KEY_PREFIX,
    SOURCE_LOCATION_KEY_PREFIX,
};
use crate::errors::PickError;
use crate::location::Location;
use crate::store::{CollectionInfo, ContainerInfo};
use crate::types::{PrefKey, PrefValue};

/// Flat key-value preference namespace owned by the host.
///
/// One instance covers exactly one plugin namespace; `clear` therefore wipes
/// everything the codec ever wrote and nothing else.
pub trait PrefStore {
    /// Stored value for `key`, if present.
    fn get(&self, key: &str) -> Option<PrefValue>;
    /// Store `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<(), PickError>;
    /// Every key currently present in this namespace.
    fn keys(&self) -> Vec<PrefKey>;
    /// Delete every key in this namespace.
    fn clear(&mut self) -> Result<(), PickError>;
}

/// In-memory preference store with insertion-ordered iteration.
#[derive(Debug, Default)]
pub struct MemoryPrefStore {
    values: IndexMap<PrefKey, PrefValue>,
}

impl PrefStore for MemoryPrefStore {
    fn get(&self, key: &str) -> Option<PrefValue> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PickError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn keys(&self) -> Vec<PrefKey> {
        self.values.keys().cloned().collect()
    }

    fn clear(&mut self) -> Result<(), PickError> {
        self.values.clear();
        Ok(())
    }
}

/// File-backed preference store persisting the namespace as one JSON map.
///
/// Writes through on every mutation so a crashed session never loses a saved
/// configuration.
#[derive(Debug)]
pub struct FilePrefStore {
    path: PathBuf,
    values: IndexMap<PrefKey, PrefValue>,
}

impl FilePrefStore {
    /// Open (or create) a preference file at `path`.
    pub fn open<P: Into<PathBuf>>(path: P) -> Result<Self, PickError> {
        let path = path.into();
        ensure_parent_dir(&path)?;
        let values = if path.is_file() {
            let raw = fs::read_to_string(&path)?;
            serde_json::from_str(&raw).map_err(|err| {
                PickError::PrefStore(format!("corrupt preference file {path:?}: {err}"))
            })?
        } else {
            IndexMap::new()
        };
        Ok(Self { path, values })
    }

    fn flush(&self) -> Result<(), PickError> {
        let payload = serde_json::to_string_pretty(&self.values).map_err(|err| {
            PickError::PrefStore(format!("failed to encode preference file: {err}"))
        })?;
        fs::write(&self.path, payload)?;
        Ok(())
    }
}

impl PrefStore for FilePrefStore {
    fn get(&self, key: &str) -> Option<PrefValue> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PickError> {
        self.values.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn keys(&self) -> Vec<PrefKey> {
        self.values.keys().cloned().collect()
    }

    fn clear(&mut self) -> Result<(), PickError> {
        self.values.clear();
        self.flush()
    }
}

/// Persist `config` into `prefs`, replacing everything previously stored.
///
/// The namespace is cleared first so orphaned rows from a longer previous
/// list cannot leak through a later, shorter one.
pub fn save_configuration(
    prefs: &mut dyn PrefStore,
    config: &Configuration,
) -> Result<(), PickError> {
    prefs.clear()?;
    prefs.set(
        DESTINATION_LOCATION_KEY,
        &encode_location(&config.destination.location)?,
    )?;
    prefs.set(DESTINATION_NAME_KEY, &config.destination.name)?;
    for (idx, entry) in config.entries.iter().enumerate() {
        let slot = idx + 1;
        prefs.set(
            &format!("{SOURCE_LOCATION_KEY_PREFIX}{slot}"),
            &encode_location(&entry.location)?,
        )?;
        prefs.set(
            &format!("{SOURCE_COUNT_KEY_PREFIX}{slot}"),
            &entry.requested_count.to_string(),
        )?;
    }
    Ok(())
}

/// Load the persisted configuration, validating it against the live catalogs.
///
/// Entries whose stored location no longer exists in `sources` are dropped
/// silently; an unreadable stored value is treated the same way. A missing or
/// stale destination falls back to the first available container. On first
/// run (empty namespace) the result is one default entry over the first
/// source plus the first container, never an empty configuration.
///
/// Empty catalogs are the only fatal case: with no sources or no containers
/// at all, a session cannot begin.
pub fn load_configuration(
    prefs: &dyn PrefStore,
    sources: &[CollectionInfo],
    destinations: &[ContainerInfo],
) -> Result<Configuration, PickError> {
    let first_source = sources.first().ok_or_else(|| {
        PickError::Configuration("no source collections available to sample from".into())
    })?;
    let first_destination = destinations.first().ok_or_else(|| {
        PickError::Configuration("no destination containers available".into())
    })?;

    let first_run = prefs.keys().is_empty();
    let mut entries = Vec::new();
    for slot in 1.. {
        let Some(raw_location) = prefs.get(&format!("{SOURCE_LOCATION_KEY_PREFIX}{slot}")) else {
            break;
        };
        let requested_count = prefs
            .get(&format!("{SOURCE_COUNT_KEY_PREFIX}{slot}"))
            .and_then(|raw| raw.parse::<f64>().ok())
            .filter(|value| value.is_finite() && *value >= 0.0)
            .unwrap_or(DEFAULT_REQUESTED_COUNT);
        match decode_location(&raw_location) {
            Ok(location) if sources.iter().any(|info| info.location == location) => {
                entries.push(SourceEntry {
                    location,
                    requested_count,
                });
            }
            Ok(location) => {
                debug!(slot, ?location, "dropping persisted source row: collection no longer exists");
            }
            Err(err) => {
                warn!(slot, error = %err, "dropping persisted source row: unreadable location");
            }
        }
    }
    if first_run {
        entries.push(SourceEntry::with_default_count(
            first_source.location.clone(),
        ));
    }

    let stored_location = prefs
        .get(DESTINATION_LOCATION_KEY)
        .and_then(|raw| decode_location(&raw).ok())
        .filter(|location| {
            destinations
                .iter()
                .any(|info| info.location == *location)
        });
    let location = stored_location.unwrap_or_else(|| {
        if !first_run {
            debug!("persisted destination container is missing or stale; falling back to the first available");
        }
        first_destination.location.clone()
    });
    let name = prefs
        .get(DESTINATION_NAME_KEY)
        .map(|raw| raw.trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_DESTINATION_NAME.to_string());

    Ok(Configuration {
        entries,
        destination: DestinationSelection { location, name },
    })
}

fn encode_location(location: &Location) -> Result<PrefValue, PickError> {
    serde_json::to_string(location)
        .map_err(|err| PickError::PrefStore(format!("failed to encode location: {err}")))
}

fn decode_location(raw: &str) -> Result<Location, PickError> {
    serde_json::from_str(raw)
        .map_err(|err| PickError::PrefStore(format!("unreadable stored location: {err}")))
}

fn ensure_parent_dir(path: &Path) -> Result<(), PickError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}
