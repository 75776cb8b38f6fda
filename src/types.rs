//! Semantic aliases for the crate's string-typed identifiers.

/// Opaque identifier of one catalog item (stable across calls).
/// Example: `img_0042`
pub type ItemId = String;
/// Opaque identifier of a publish-style service namespace.
/// Example: `web_gallery`
pub type ServiceId = String;
/// Opaque identifier of a collection or grouping node inside a namespace.
/// Example: `col_17`
pub type ContainerId = String;
/// User-facing collection name.
/// Example: `Daily Shuffle`
pub type CollectionName = String;
/// Key in the flat preference namespace.
/// Example: `source_location_1`
pub type PrefKey = String;
/// Stored preference value (the host store only holds strings).
/// Example: `12.5`
pub type PrefValue = String;
