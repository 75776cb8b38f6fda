//! Interactive edit session.
//!
//! One `EditSession` exclusively owns the configuration for its lifetime. The
//! host renders from the read-only projections (`rows`, `destination`,
//! `state`) and drives exactly four transitions: add row, remove row,
//! confirm, cancel. Structural edits change the configuration's shape and
//! return `ViewUpdate::Rebuild`; value edits never do.

use rand::Rng;
use tracing::{debug, info, warn};

use crate::config::{
    Configuration, DestinationSelection, SourceEntry, normalize_destination_name,
    validate_requested_count,
};
use crate::destination::{Resolution, resolve_destination};
use crate::errors::PickError;
use crate::location::Location;
use crate::prefs::{PrefStore, load_configuration, save_configuration};
use crate::row::{RowFollowUp, SourceRow};
use crate::sampler::sample;
use crate::store::PhotoStore;

/// Lifecycle state of one editing session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// The configuration is being edited.
    Editing,
    /// The sample was committed; terminal.
    Confirmed,
    /// The session was abandoned; terminal.
    Cancelled,
}

/// How the host must update its view after a session mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewUpdate {
    /// The configuration's shape changed; any stateful widget tree is invalid
    /// and the view must be rebuilt from scratch.
    Rebuild,
    /// Only a value inside an existing row changed; the current view stands.
    ValueOnly,
}

/// Result of a confirm attempt that did not fail outright.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfirmOutcome {
    /// The sample was committed and the configuration saved.
    Committed {
        /// Location of the populated destination collection.
        destination: Location,
        /// Number of items added to it.
        items_added: usize,
    },
    /// Policy blocked the destination name; the session stays in `Editing`.
    Rejected {
        /// User-facing reason for the block.
        reason: String,
    },
    /// The user declined the overwrite prompt; the session stays in `Editing`
    /// with the configuration untouched.
    Declined,
}

/// Interactive editing session over a Photo Store and a preference namespace.
#[derive(Debug)]
pub struct EditSession<'a, S: PhotoStore, P: PrefStore> {
    store: &'a mut S,
    prefs: &'a mut P,
    rows: Vec<SourceRow>,
    destination: DestinationSelection,
    default_source: Location,
    state: SessionState,
}

impl<'a, S: PhotoStore, P: PrefStore> EditSession<'a, S, P> {
    /// Start a session: enumerate the live catalogs, load the persisted
    /// configuration against them, and run one synchronous bulk recount.
    ///
    /// Fails with `PickError::Configuration` when no source collections or no
    /// destination containers exist at all.
    pub fn begin(store: &'a mut S, prefs: &'a mut P) -> Result<Self, PickError> {
        let sources = store.source_collections()?;
        let destinations = store.destination_containers()?;
        let config = load_configuration(&*prefs, &sources, &destinations)?;
        let default_source = sources[0].location.clone();
        let mut session = Self {
            store,
            prefs,
            rows: config.entries.into_iter().map(SourceRow::new).collect(),
            destination: config.destination,
            default_source,
            state: SessionState::Editing,
        };
        session.refresh_totals()?;
        Ok(session)
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Read-only projection of the source rows, in display order.
    pub fn rows(&self) -> &[SourceRow] {
        &self.rows
    }

    /// Current destination selection.
    pub fn destination(&self) -> &DestinationSelection {
        &self.destination
    }

    /// Append a new default source row.
    ///
    /// The shape changed, so totals are recounted synchronously and the view
    /// must be rebuilt.
    pub fn add_row(&mut self) -> Result<ViewUpdate, PickError> {
        self.ensure_editing()?;
        self.rows.push(SourceRow::new(SourceEntry::with_default_count(
            self.default_source.clone(),
        )));
        self.refresh_totals()?;
        Ok(ViewUpdate::Rebuild)
    }

    /// Remove the source row at `index`.
    pub fn remove_row(&mut self, index: usize) -> Result<ViewUpdate, PickError> {
        self.ensure_editing()?;
        self.check_row_index(index)?;
        self.rows.remove(index);
        self.refresh_totals()?;
        Ok(ViewUpdate::Rebuild)
    }

    /// Point the row at `index` at a different source collection.
    ///
    /// A value-only edit; the returned follow-up tells the host whether to
    /// schedule [`EditSession::refresh_row_total`] for this row.
    pub fn set_row_location(
        &mut self,
        index: usize,
        location: Location,
    ) -> Result<RowFollowUp, PickError> {
        self.ensure_editing()?;
        self.check_row_index(index)?;
        Ok(self.rows[index].set_location(location))
    }

    /// Update the requested count of the row at `index`. Value-only.
    pub fn set_row_count(&mut self, index: usize, value: f64) -> Result<ViewUpdate, PickError> {
        self.ensure_editing()?;
        self.check_row_index(index)?;
        self.rows[index].set_requested_count(value)?;
        Ok(ViewUpdate::ValueOnly)
    }

    /// Complete an outstanding total refresh for the row at `index`.
    pub fn refresh_row_total(&mut self, index: usize) -> Result<(), PickError> {
        self.ensure_editing()?;
        self.check_row_index(index)?;
        let count = self.store.item_count(self.rows[index].location())?;
        self.rows[index].apply_total(count);
        Ok(())
    }

    /// Change the destination container. Value-only.
    pub fn set_destination_container(
        &mut self,
        location: Location,
    ) -> Result<ViewUpdate, PickError> {
        self.ensure_editing()?;
        self.destination.location = location;
        Ok(ViewUpdate::ValueOnly)
    }

    /// Change the destination name. Validated at confirm time, not here, so
    /// the host can echo partial input freely. Value-only.
    pub fn set_destination_name(&mut self, name: &str) -> Result<ViewUpdate, PickError> {
        self.ensure_editing()?;
        self.destination.name = name.to_string();
        Ok(ViewUpdate::ValueOnly)
    }

    /// Abandon the session. The Photo Store and the persisted preferences are
    /// left completely untouched.
    pub fn cancel(&mut self) {
        if self.state == SessionState::Editing {
            self.state = SessionState::Cancelled;
        }
    }

    /// Validate the configuration, resolve the destination, and commit.
    ///
    /// `ask_overwrite` is invoked with the destination name when an ordinary
    /// collection with that name already exists; returning `false` leaves the
    /// session editing and everything untouched. Validation failures return
    /// `PickError::Validation` and also leave the session editing.
    ///
    /// The catalog mutations (create-or-clear plus populate) run inside one
    /// Photo Store write transaction; any failure rolls back and the
    /// preferences are not saved.
    pub fn confirm<R, F>(&mut self, rng: &mut R, mut ask_overwrite: F) -> Result<ConfirmOutcome, PickError>
    where
        R: Rng + ?Sized,
        F: FnMut(&str) -> bool,
    {
        self.ensure_editing()?;
        for row in &self.rows {
            validate_requested_count(row.requested_count())?;
        }
        let name = normalize_destination_name(&self.destination.name)?;
        let selection = DestinationSelection {
            location: self.destination.location.clone(),
            name,
        };

        let overwrite_target = match resolve_destination(&*self.store, &selection)? {
            Resolution::RejectedSmart(reason) => {
                warn!(reason, "destination name collides with a smart collection");
                return Ok(ConfirmOutcome::Rejected { reason });
            }
            Resolution::Overwrite(location) => {
                if !ask_overwrite(&selection.name) {
                    debug!("user declined to overwrite the existing collection");
                    return Ok(ConfirmOutcome::Declined);
                }
                Some(location)
            }
            Resolution::Create => None,
        };

        let entries: Vec<SourceEntry> = self.rows.iter().map(|row| row.entry().clone()).collect();

        self.store.begin_write()?;
        let populated = self.populate_destination(&selection, overwrite_target, &entries, rng);
        let (target, items_added) = match populated {
            Ok(done) => done,
            Err(err) => {
                self.store.rollback_write();
                warn!(error = %err, "commit aborted; destination changes rolled back");
                return Err(err);
            }
        };
        if let Err(err) = self.store.commit_write() {
            self.store.rollback_write();
            return Err(err);
        }

        // The catalog commit stands from here on, even if activation or the
        // preference save fails.
        self.state = SessionState::Confirmed;
        if let Err(err) = self.store.set_active_collection(&target) {
            warn!(error = %err, "committed collection could not be activated");
        }
        let config = Configuration {
            entries,
            destination: selection.clone(),
        };
        self.destination = selection;
        save_configuration(&mut *self.prefs, &config)?;
        info!(items_added, destination = ?target, "sampled collection committed");
        Ok(ConfirmOutcome::Committed {
            destination: target,
            items_added,
        })
    }

    fn populate_destination<R: Rng + ?Sized>(
        &mut self,
        selection: &DestinationSelection,
        overwrite_target: Option<Location>,
        entries: &[SourceEntry],
        rng: &mut R,
    ) -> Result<(Location, usize), PickError> {
        let target = match overwrite_target {
            Some(location) => {
                self.store.clear_collection(&location)?;
                location
            }
            None => {
                self.store
                    .create_collection(&selection.location, &selection.name)?
                    .location
            }
        };
        let items = sample(&*self.store, entries, rng)?;
        self.store.add_items(&target, &items)?;
        Ok((target, items.len()))
    }

    /// Synchronous bulk recount of every row's total display.
    ///
    /// Runs before each rebuild so the fresh view never flashes a pending
    /// marker right after a structural edit.
    fn refresh_totals(&mut self) -> Result<(), PickError> {
        for row in &mut self.rows {
            let count = self.store.item_count(row.location())?;
            row.apply_total(count);
        }
        Ok(())
    }

    fn ensure_editing(&self) -> Result<(), PickError> {
        if self.state != SessionState::Editing {
            return Err(PickError::Configuration(format!(
                "session is terminal ({:?}) and accepts no further actions",
                self.state
            )));
        }
        Ok(())
    }

    fn check_row_index(&self, index: usize) -> Result<(), PickError> {
        if index >= self.rows.len() {
            return Err(PickError::Configuration(format!(
                "row index {index} out of range ({} rows)",
                self.rows.len()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::MemoryPrefStore;
    use crate::store::{CollectionKind, InMemoryPhotoStore};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn fixture() -> InMemoryPhotoStore {
        let mut store = InMemoryPhotoStore::new();
        let root = store.add_container("Catalog", Location::local_root());
        store.add_collection(
            root,
            "Pool",
            CollectionKind::Ordinary,
            (0..5).map(|n| format!("img_{n}")).collect(),
        );
        store
    }

    #[test]
    fn begin_fails_without_sources_or_destinations() {
        let mut empty = InMemoryPhotoStore::new();
        let mut prefs = MemoryPrefStore::default();
        let err = EditSession::begin(&mut empty, &mut prefs).unwrap_err();
        assert!(matches!(err, PickError::Configuration(_)));
    }

    #[test]
    fn terminal_sessions_reject_further_actions() {
        let mut store = fixture();
        let mut prefs = MemoryPrefStore::default();
        let mut session = EditSession::begin(&mut store, &mut prefs).unwrap();
        session.cancel();
        assert_eq!(session.state(), SessionState::Cancelled);
        assert!(session.add_row().is_err());
        let mut rng = StdRng::seed_from_u64(1);
        assert!(session.confirm(&mut rng, |_| true).is_err());
    }

    #[test]
    fn row_index_bounds_are_checked() {
        let mut store = fixture();
        let mut prefs = MemoryPrefStore::default();
        let mut session = EditSession::begin(&mut store, &mut prefs).unwrap();
        assert!(session.remove_row(5).is_err());
        assert!(session.set_row_count(5, 1.0).is_err());
    }
}
