//! Editable source rows and their cached total displays.

use crate::config::{SourceEntry, validate_requested_count};
use crate::constants::session::{TOTAL_PENDING_MARKER, TOTAL_UNKNOWN_MARKER};
use crate::errors::PickError;
use crate::location::Location;

/// Cached total-count display for one row.
///
/// Purely presentational; it plays no role in sampling and is never
/// persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TotalDisplay {
    /// A refresh against the Photo Store is outstanding.
    Pending,
    /// Rendered total text.
    Ready(String),
}

impl TotalDisplay {
    /// Text to render for this state.
    pub fn text(&self) -> &str {
        match self {
            TotalDisplay::Pending => TOTAL_PENDING_MARKER,
            TotalDisplay::Ready(text) => text,
        }
    }
}

/// Follow-up work a row mutation asks the caller to schedule.
///
/// The row never reaches into the Photo Store itself; an edit that
/// invalidates the cached total returns `RefreshTotal` and the caller decides
/// when to complete it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowFollowUp {
    /// Nothing to schedule.
    None,
    /// The row's total display must be recomputed against the Photo Store.
    RefreshTotal,
}

/// One editable source row: a `SourceEntry` plus its total-count display.
#[derive(Clone, Debug)]
pub struct SourceRow {
    entry: SourceEntry,
    total: TotalDisplay,
}

impl SourceRow {
    /// Wrap `entry` with a pending total display.
    pub fn new(entry: SourceEntry) -> Self {
        Self {
            entry,
            total: TotalDisplay::Pending,
        }
    }

    /// Identity of the row's source collection.
    pub fn location(&self) -> &Location {
        &self.entry.location
    }

    /// Requested item count for this row.
    pub fn requested_count(&self) -> f64 {
        self.entry.requested_count
    }

    /// Current total-count display state.
    pub fn total_display(&self) -> &TotalDisplay {
        &self.total
    }

    /// The row's sampling input.
    pub fn entry(&self) -> &SourceEntry {
        &self.entry
    }

    /// Point the row at a different source collection.
    ///
    /// The cached total becomes stale, so the display flips to `Pending` and
    /// the caller must schedule a refresh. Re-selecting the current location
    /// is a no-op.
    pub fn set_location(&mut self, location: Location) -> RowFollowUp {
        if self.entry.location == location {
            return RowFollowUp::None;
        }
        self.entry.location = location;
        self.total = TotalDisplay::Pending;
        RowFollowUp::RefreshTotal
    }

    /// Update the requested count after validation. No follow-up work.
    pub fn set_requested_count(&mut self, value: f64) -> Result<RowFollowUp, PickError> {
        validate_requested_count(value)?;
        self.entry.requested_count = value;
        Ok(RowFollowUp::None)
    }

    /// Complete an outstanding total refresh.
    ///
    /// `None` means the collection could not be counted (stale location); the
    /// unknown marker is rendered rather than an error.
    pub fn apply_total(&mut self, count: Option<usize>) {
        self.total = TotalDisplay::Ready(match count {
            Some(count) => count.to_string(),
            None => TOTAL_UNKNOWN_MARKER.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> SourceRow {
        SourceRow::new(SourceEntry::with_default_count(Location::local("col_1")))
    }

    #[test]
    fn new_rows_start_pending() {
        let row = row();
        assert_eq!(row.total_display(), &TotalDisplay::Pending);
        assert_eq!(row.total_display().text(), TOTAL_PENDING_MARKER);
    }

    #[test]
    fn location_change_invalidates_the_total() {
        let mut row = row();
        row.apply_total(Some(42));
        assert_eq!(row.total_display().text(), "42");

        let follow_up = row.set_location(Location::local("col_2"));
        assert_eq!(follow_up, RowFollowUp::RefreshTotal);
        assert_eq!(row.total_display(), &TotalDisplay::Pending);
    }

    #[test]
    fn reselecting_the_same_location_keeps_the_total() {
        let mut row = row();
        row.apply_total(Some(7));
        let follow_up = row.set_location(Location::local("col_1"));
        assert_eq!(follow_up, RowFollowUp::None);
        assert_eq!(row.total_display().text(), "7");
    }

    #[test]
    fn count_edits_validate_and_need_no_follow_up() {
        let mut row = row();
        assert_eq!(row.set_requested_count(3.25).unwrap(), RowFollowUp::None);
        assert_eq!(row.requested_count(), 3.25);

        let err = row.set_requested_count(-0.1).unwrap_err();
        assert!(matches!(err, PickError::Validation(_)));
        assert_eq!(row.requested_count(), 3.25);
    }

    #[test]
    fn uncountable_totals_render_the_unknown_marker() {
        let mut row = row();
        row.apply_total(None);
        assert_eq!(row.total_display().text(), TOTAL_UNKNOWN_MARKER);
    }
}
