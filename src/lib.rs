#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod config;
pub mod constants;
pub mod destination;
mod errors;
pub mod location;
pub mod prefs;
pub mod row;
pub mod sampler;
pub mod session;
pub mod store;
pub mod types;

pub use config::{
    Configuration, DestinationSelection, SourceEntry, normalize_destination_name,
    validate_requested_count,
};
pub use destination::{Resolution, resolve_destination};
pub use errors::PickError;
pub use location::Location;
pub use prefs::{FilePrefStore, MemoryPrefStore, PrefStore, load_configuration, save_configuration};
pub use row::{RowFollowUp, SourceRow, TotalDisplay};
pub use sampler::sample;
pub use session::{ConfirmOutcome, EditSession, SessionState, ViewUpdate};
pub use store::{CollectionInfo, CollectionKind, ContainerInfo, InMemoryPhotoStore, PhotoStore};
pub use types::{CollectionName, ContainerId, ItemId, PrefKey, PrefValue, ServiceId};
