//! Destination name resolution: create, overwrite, or reject.

use crate::config::DestinationSelection;
use crate::errors::PickError;
use crate::location::Location;
use crate::store::{CollectionKind, PhotoStore};

/// Outcome of resolving the chosen destination name inside its container.
#[derive(Clone, Debug, PartialEq)]
pub enum Resolution {
    /// No collection with that name exists; create a new empty one.
    Create,
    /// An ordinary collection with that name exists; clearing and reusing it
    /// requires the user's confirmation.
    Overwrite(Location),
    /// A smart collection with that name exists; the commit is blocked.
    RejectedSmart(String),
}

/// Decide create vs. overwrite vs. reject for `selection`.
///
/// Looks up an existing child collection with exactly the selected name. The
/// caller is responsible for prompting before an `Overwrite` is acted on.
pub fn resolve_destination<S: PhotoStore + ?Sized>(
    store: &S,
    selection: &DestinationSelection,
) -> Result<Resolution, PickError> {
    match store.find_child_collection(&selection.location, &selection.name)? {
        None => Ok(Resolution::Create),
        Some(existing) if existing.kind == CollectionKind::Smart => {
            Ok(Resolution::RejectedSmart(format!(
                "'{}' is a smart collection and cannot be replaced",
                existing.name
            )))
        }
        Some(existing) => Ok(Resolution::Overwrite(existing.location)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryPhotoStore;

    fn selection(container: &Location, name: &str) -> DestinationSelection {
        DestinationSelection {
            location: container.clone(),
            name: name.to_string(),
        }
    }

    #[test]
    fn fresh_names_resolve_to_create() {
        let mut store = InMemoryPhotoStore::new();
        let root = store.add_container("Catalog", Location::local_root());
        let resolution = resolve_destination(&store, &selection(&root, "Fresh")).unwrap();
        assert_eq!(resolution, Resolution::Create);
    }

    #[test]
    fn ordinary_collisions_resolve_to_overwrite() {
        let mut store = InMemoryPhotoStore::new();
        let root = store.add_container("Catalog", Location::local_root());
        let existing = store.add_collection(
            root.clone(),
            "Taken",
            CollectionKind::Ordinary,
            vec!["x".into()],
        );
        let resolution = resolve_destination(&store, &selection(&root, "Taken")).unwrap();
        assert_eq!(resolution, Resolution::Overwrite(existing));
    }

    #[test]
    fn smart_collisions_are_rejected() {
        let mut store = InMemoryPhotoStore::new();
        let root = store.add_container("Catalog", Location::local_root());
        store.add_collection(root.clone(), "Rated", CollectionKind::Smart, Vec::new());
        let resolution = resolve_destination(&store, &selection(&root, "Rated")).unwrap();
        assert!(matches!(
            resolution,
            Resolution::RejectedSmart(reason) if reason.contains("Rated")
        ));
    }
}
