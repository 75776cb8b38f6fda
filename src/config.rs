//! Sampling configuration model and input validation.

use crate::constants::config::DEFAULT_REQUESTED_COUNT;
use crate::errors::PickError;
use crate::location::Location;
use crate::types::CollectionName;

/// One configured (collection, requested count) pair to sample from.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceEntry {
    /// Identity of the source collection.
    pub location: Location,
    /// How many items to draw. The fractional part is the probability of one
    /// extra item, so the expected draw equals this value exactly.
    pub requested_count: f64,
}

impl SourceEntry {
    /// Entry for `location` with the default requested count.
    pub fn with_default_count(location: Location) -> Self {
        Self {
            location,
            requested_count: DEFAULT_REQUESTED_COUNT,
        }
    }
}

/// Where the sampled collection is created and what it is called.
#[derive(Clone, Debug, PartialEq)]
pub struct DestinationSelection {
    /// Container the destination collection lives in.
    pub location: Location,
    /// Name of the destination collection.
    pub name: CollectionName,
}

/// Ordered source entries plus the destination for one editing session.
///
/// Entry order is significant only for persistence round-trip fidelity, not
/// for sampling outcome.
#[derive(Clone, Debug, PartialEq)]
pub struct Configuration {
    /// Source entries in user-visible row order.
    pub entries: Vec<SourceEntry>,
    /// Destination selection.
    pub destination: DestinationSelection,
}

/// Validate a requested-count input: finite and non-negative.
pub fn validate_requested_count(value: f64) -> Result<(), PickError> {
    if !value.is_finite() {
        return Err(PickError::Validation(format!(
            "requested count must be a finite number, got {value}"
        )));
    }
    if value < 0.0 {
        return Err(PickError::Validation(format!(
            "requested count must not be negative, got {value}"
        )));
    }
    Ok(())
}

/// Trim a destination-name input, rejecting names that trim to empty.
pub fn normalize_destination_name(raw: &str) -> Result<CollectionName, PickError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(PickError::Validation(
            "destination name must not be empty".into(),
        ));
    }
    Ok(trimmed.to_string())
}
