//! Photo Store collaborator interface.
//!
//! Ownership model:
//! - `PhotoStore` is the session-facing interface over the host's item
//!   catalog: enumeration, item access, and destination writes.
//! - Read methods never mutate the catalog; the sampling engine only ever
//!   touches read methods.
//! - Writes performed during a commit run between `begin_write` and
//!   `commit_write` so hosts with transactional catalogs can make the commit
//!   atomic. The default hooks are no-ops for hosts without transactions.

use indexmap::IndexMap;

use crate::errors::PickError;
use crate::location::Location;
use crate::types::{CollectionName, ItemId};

/// Kind of an existing collection, as reported by the Photo Store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollectionKind {
    /// A plain collection whose membership is explicit.
    Ordinary,
    /// A rule-derived ("smart") collection whose membership cannot be replaced.
    Smart,
}

/// One enumerable collection.
#[derive(Clone, Debug)]
pub struct CollectionInfo {
    /// Identity of the collection.
    pub location: Location,
    /// User-facing name.
    pub name: CollectionName,
    /// Whether the collection is ordinary or rule-derived.
    pub kind: CollectionKind,
}

/// One enumerable destination container (a grouping node or service root).
#[derive(Clone, Debug)]
pub struct ContainerInfo {
    /// Identity of the container.
    pub location: Location,
    /// User-facing name.
    pub name: String,
}

/// Host catalog collaborator.
///
/// For a fixed catalog state, enumeration and item access should be
/// deterministic; item order within a collection is arbitrary but stable.
pub trait PhotoStore {
    /// Every collection usable as a sampling source.
    fn source_collections(&self) -> Result<Vec<CollectionInfo>, PickError>;

    /// Every container a new collection can be created in, including
    /// publish-style service namespaces.
    fn destination_containers(&self) -> Result<Vec<ContainerInfo>, PickError>;

    /// Full item list of the collection at `location`, in arbitrary order.
    ///
    /// `None` when the location no longer resolves (deleted out-of-band).
    fn items_in(&self, location: &Location) -> Result<Option<Vec<ItemId>>, PickError>;

    /// Exact item count at `location`, `None` when unresolved.
    fn item_count(&self, location: &Location) -> Result<Option<usize>, PickError>;

    /// Existing child collection of `container` with exactly `name`, if any.
    fn find_child_collection(
        &self,
        container: &Location,
        name: &str,
    ) -> Result<Option<CollectionInfo>, PickError>;

    /// Create a new empty ordinary collection named `name` in `container`.
    fn create_collection(
        &mut self,
        container: &Location,
        name: &str,
    ) -> Result<CollectionInfo, PickError>;

    /// Remove all items from the collection at `location`.
    fn clear_collection(&mut self, location: &Location) -> Result<(), PickError>;

    /// Append `items` to the collection at `location`.
    fn add_items(&mut self, location: &Location, items: &[ItemId]) -> Result<(), PickError>;

    /// Make the collection at `location` the host's active selection.
    fn set_active_collection(&mut self, location: &Location) -> Result<(), PickError>;

    /// Open a write transaction covering the commit's catalog mutations.
    fn begin_write(&mut self) -> Result<(), PickError> {
        Ok(())
    }

    /// Close the current write transaction, making its mutations durable.
    fn commit_write(&mut self) -> Result<(), PickError> {
        Ok(())
    }

    /// Discard every mutation made since `begin_write`.
    fn rollback_write(&mut self) {}
}

#[derive(Clone, Debug)]
struct StoredCollection {
    parent: Location,
    name: CollectionName,
    kind: CollectionKind,
    items: Vec<ItemId>,
}

/// In-memory Photo Store for tests, demos, and small hosts.
///
/// Implements the write-transaction hooks by snapshotting, so commit
/// rollbacks behave like a transactional host catalog.
#[derive(Debug, Default)]
pub struct InMemoryPhotoStore {
    containers: Vec<ContainerInfo>,
    collections: IndexMap<Location, StoredCollection>,
    active: Option<Location>,
    next_id: u64,
    snapshot: Option<(IndexMap<Location, StoredCollection>, Option<Location>)>,
}

impl InMemoryPhotoStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a destination container at `location`.
    pub fn add_container(&mut self, name: &str, location: Location) -> Location {
        self.containers.push(ContainerInfo {
            location: location.clone(),
            name: name.to_string(),
        });
        location
    }

    /// Add a collection under `parent` with the given membership.
    pub fn add_collection(
        &mut self,
        parent: Location,
        name: &str,
        kind: CollectionKind,
        items: Vec<ItemId>,
    ) -> Location {
        let location = self.next_location(&parent);
        self.collections.insert(
            location.clone(),
            StoredCollection {
                parent,
                name: name.to_string(),
                kind,
                items,
            },
        );
        location
    }

    /// Delete the collection at `location`, simulating an out-of-band removal.
    pub fn remove_collection(&mut self, location: &Location) {
        self.collections.shift_remove(location);
    }

    /// Location of the host's active selection, if one has been set.
    pub fn active_collection(&self) -> Option<&Location> {
        self.active.as_ref()
    }

    fn next_location(&mut self, parent: &Location) -> Location {
        self.next_id += 1;
        let id = format!("col_{}", self.next_id);
        match parent.service() {
            Some(service) => Location::in_service(service, id),
            None => Location::local(id),
        }
    }

    fn collection_mut(&mut self, location: &Location) -> Result<&mut StoredCollection, PickError> {
        self.collections
            .get_mut(location)
            .ok_or_else(|| PickError::StoreInconsistent {
                details: format!("collection not found at {location:?}"),
            })
    }
}

impl PhotoStore for InMemoryPhotoStore {
    fn source_collections(&self) -> Result<Vec<CollectionInfo>, PickError> {
        Ok(self
            .collections
            .iter()
            .map(|(location, stored)| CollectionInfo {
                location: location.clone(),
                name: stored.name.clone(),
                kind: stored.kind,
            })
            .collect())
    }

    fn destination_containers(&self) -> Result<Vec<ContainerInfo>, PickError> {
        Ok(self.containers.clone())
    }

    fn items_in(&self, location: &Location) -> Result<Option<Vec<ItemId>>, PickError> {
        Ok(self
            .collections
            .get(location)
            .map(|stored| stored.items.clone()))
    }

    fn item_count(&self, location: &Location) -> Result<Option<usize>, PickError> {
        Ok(self
            .collections
            .get(location)
            .map(|stored| stored.items.len()))
    }

    fn find_child_collection(
        &self,
        container: &Location,
        name: &str,
    ) -> Result<Option<CollectionInfo>, PickError> {
        Ok(self
            .collections
            .iter()
            .find(|(_, stored)| stored.parent == *container && stored.name == name)
            .map(|(location, stored)| CollectionInfo {
                location: location.clone(),
                name: stored.name.clone(),
                kind: stored.kind,
            }))
    }

    fn create_collection(
        &mut self,
        container: &Location,
        name: &str,
    ) -> Result<CollectionInfo, PickError> {
        if !self
            .containers
            .iter()
            .any(|info| info.location == *container)
        {
            return Err(PickError::StoreInconsistent {
                details: format!("destination container not found at {container:?}"),
            });
        }
        let location = self.add_collection(
            container.clone(),
            name,
            CollectionKind::Ordinary,
            Vec::new(),
        );
        Ok(CollectionInfo {
            location,
            name: name.to_string(),
            kind: CollectionKind::Ordinary,
        })
    }

    fn clear_collection(&mut self, location: &Location) -> Result<(), PickError> {
        self.collection_mut(location)?.items.clear();
        Ok(())
    }

    fn add_items(&mut self, location: &Location, items: &[ItemId]) -> Result<(), PickError> {
        self.collection_mut(location)?
            .items
            .extend(items.iter().cloned());
        Ok(())
    }

    fn set_active_collection(&mut self, location: &Location) -> Result<(), PickError> {
        if !self.collections.contains_key(location) {
            return Err(PickError::StoreInconsistent {
                details: format!("cannot activate missing collection at {location:?}"),
            });
        }
        self.active = Some(location.clone());
        Ok(())
    }

    fn begin_write(&mut self) -> Result<(), PickError> {
        self.snapshot = Some((self.collections.clone(), self.active.clone()));
        Ok(())
    }

    fn commit_write(&mut self) -> Result<(), PickError> {
        self.snapshot = None;
        Ok(())
    }

    fn rollback_write(&mut self) {
        if let Some((collections, active)) = self.snapshot.take() {
            self.collections = collections;
            self.active = active;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_one_collection() -> (InMemoryPhotoStore, Location, Location) {
        let mut store = InMemoryPhotoStore::new();
        let root = store.add_container("Catalog", Location::local_root());
        let collection = store.add_collection(
            root.clone(),
            "Holidays",
            CollectionKind::Ordinary,
            vec!["a".into(), "b".into()],
        );
        (store, root, collection)
    }

    #[test]
    fn unresolved_locations_read_as_none() {
        let (store, _, _) = store_with_one_collection();
        let missing = Location::local("col_999");
        assert!(store.items_in(&missing).unwrap().is_none());
        assert!(store.item_count(&missing).unwrap().is_none());
    }

    #[test]
    fn find_child_matches_exact_name_within_container() {
        let (store, root, collection) = store_with_one_collection();
        let found = store.find_child_collection(&root, "Holidays").unwrap();
        assert_eq!(found.unwrap().location, collection);
        assert!(
            store
                .find_child_collection(&root, "holidays")
                .unwrap()
                .is_none()
        );
        let elsewhere = Location::service_root("web_gallery");
        assert!(
            store
                .find_child_collection(&elsewhere, "Holidays")
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn create_requires_known_container() {
        let (mut store, root, _) = store_with_one_collection();
        let err = store
            .create_collection(&Location::local("nowhere"), "New")
            .unwrap_err();
        assert!(matches!(err, PickError::StoreInconsistent { .. }));

        let created = store.create_collection(&root, "New").unwrap();
        assert_eq!(store.item_count(&created.location).unwrap(), Some(0));
    }

    #[test]
    fn rollback_restores_the_snapshot() {
        let (mut store, root, collection) = store_with_one_collection();
        store.begin_write().unwrap();
        let created = store.create_collection(&root, "Scratch").unwrap();
        store.add_items(&created.location, &["x".into()]).unwrap();
        store.clear_collection(&collection).unwrap();
        store.rollback_write();

        assert!(store.items_in(&created.location).unwrap().is_none());
        assert_eq!(store.item_count(&collection).unwrap(), Some(2));
    }

    #[test]
    fn commit_makes_mutations_stick() {
        let (mut store, root, _) = store_with_one_collection();
        store.begin_write().unwrap();
        let created = store.create_collection(&root, "Kept").unwrap();
        store.commit_write().unwrap();
        store.rollback_write();
        assert_eq!(store.item_count(&created.location).unwrap(), Some(0));
    }
}
