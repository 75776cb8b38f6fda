//! Crate-wide constants, grouped by the module that consumes them.

/// Constants used by configuration defaults and input validation.
pub mod config {
    /// Requested count assigned to newly added source rows and first-run defaults.
    pub const DEFAULT_REQUESTED_COUNT: f64 = 10.0;
    /// Destination collection name suggested when none has been persisted.
    pub const DEFAULT_DESTINATION_NAME: &str = "Sampled";
}

/// Constants used by the preference codec key layout.
pub mod prefs {
    /// Key prefix for per-entry source locations (1-based slot suffix).
    pub const SOURCE_LOCATION_KEY_PREFIX: &str = "source_location_";
    /// Key prefix for per-entry requested counts (1-based slot suffix).
    pub const SOURCE_COUNT_KEY_PREFIX: &str = "source_count_";
    /// Key for the persisted destination location.
    pub const DESTINATION_LOCATION_KEY: &str = "destination_location";
    /// Key for the persisted destination name.
    pub const DESTINATION_NAME_KEY: &str = "destination_name";
}

/// Constants used by row display rendering.
pub mod session {
    /// Marker rendered while a row's total refresh is outstanding.
    pub const TOTAL_PENDING_MARKER: &str = "…";
    /// Marker rendered when a row's collection cannot be counted.
    pub const TOTAL_UNKNOWN_MARKER: &str = "?";
}
