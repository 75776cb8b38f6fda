//! The random sampling engine.

use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::HashSet;
use tracing::debug;

use crate::config::SourceEntry;
use crate::errors::PickError;
use crate::store::PhotoStore;
use crate::types::ItemId;

/// Draw a deduplicated randomized sample across all `entries`.
///
/// Entries are processed in order against one call-wide chosen set, so an
/// item reachable from two entries appears at most once in the output. Each
/// entry tries to meet its own target and silently yields fewer items when
/// its collection is exhausted or its candidates were already claimed by an
/// earlier entry. An entry whose location no longer resolves contributes
/// nothing and does not fail the call.
///
/// The combined output is fully shuffled at the end so source order does not
/// bias destination ordering. Deterministic given a seeded `rng`; the engine
/// never mutates the Photo Store.
pub fn sample<S, R>(
    store: &S,
    entries: &[SourceEntry],
    rng: &mut R,
) -> Result<Vec<ItemId>, PickError>
where
    S: PhotoStore + ?Sized,
    R: Rng + ?Sized,
{
    let mut chosen: HashSet<ItemId> = HashSet::new();
    let mut output: Vec<ItemId> = Vec::new();
    for entry in entries {
        let Some(mut pool) = store.items_in(&entry.location)? else {
            debug!(
                location = ?entry.location,
                "skipping source entry: collection no longer resolves"
            );
            continue;
        };
        let wanted = wanted_count(entry.requested_count, rng);
        if wanted == 0 {
            continue;
        }
        draw_into(&mut pool, wanted, &mut chosen, &mut output, rng);
    }
    output.shuffle(rng);
    Ok(output)
}

/// Turn a possibly-fractional requested count into a concrete draw target.
///
/// The fractional remainder becomes the probability of one extra item, so the
/// expected target equals `requested` exactly (`10.4` is 11 with probability
/// 0.4, otherwise 10).
fn wanted_count<R: Rng + ?Sized>(requested: f64, rng: &mut R) -> usize {
    if requested <= 0.0 {
        return 0;
    }
    let base = requested.floor();
    let frac = requested - base;
    let mut wanted = base as usize;
    if frac > 0.0 && rng.random::<f64>() < frac {
        wanted += 1;
    }
    wanted
}

/// Incremental partial Fisher–Yates over `pool`.
///
/// Each step swaps a uniformly random remaining index into the cursor slot
/// and tests it against the call-wide chosen set; the cursor advances whether
/// or not the item is accepted, so rejected positions are never revisited.
fn draw_into<R: Rng + ?Sized>(
    pool: &mut [ItemId],
    wanted: usize,
    chosen: &mut HashSet<ItemId>,
    output: &mut Vec<ItemId>,
    rng: &mut R,
) {
    let mut accepted = 0;
    let mut cursor = 0;
    while accepted < wanted && cursor < pool.len() {
        let pick = rng.random_range(cursor..pool.len());
        pool.swap(cursor, pick);
        if chosen.insert(pool[cursor].clone()) {
            output.push(pool[cursor].clone());
            accepted += 1;
        }
        cursor += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use crate::location::Location;
    use crate::store::{CollectionKind, InMemoryPhotoStore};

    fn items(prefix: &str, count: usize) -> Vec<ItemId> {
        (0..count).map(|n| format!("{prefix}_{n:03}")).collect()
    }

    fn single_source_store(count: usize) -> (InMemoryPhotoStore, Location) {
        let mut store = InMemoryPhotoStore::new();
        let root = store.add_container("Catalog", Location::local_root());
        let collection =
            store.add_collection(root, "Pool", CollectionKind::Ordinary, items("img", count));
        (store, collection)
    }

    #[test]
    fn integer_counts_draw_exactly() {
        let (store, collection) = single_source_store(20);
        let mut rng = StdRng::seed_from_u64(11);
        for requested in [0.0, 1.0, 5.0, 20.0] {
            let entries = [SourceEntry {
                location: collection.clone(),
                requested_count: requested,
            }];
            let picked = sample(&store, &entries, &mut rng).unwrap();
            assert_eq!(picked.len(), requested as usize);
            let unique: HashSet<_> = picked.iter().collect();
            assert_eq!(unique.len(), picked.len());
        }
    }

    #[test]
    fn exhausted_sources_yield_what_they_have() {
        let (store, collection) = single_source_store(3);
        let entries = [SourceEntry {
            location: collection,
            requested_count: 50.0,
        }];
        let mut rng = StdRng::seed_from_u64(2);
        let picked = sample(&store, &entries, &mut rng).unwrap();
        assert_eq!(picked.len(), 3);
    }

    #[test]
    fn unresolved_entries_are_skipped_without_error() {
        let (store, collection) = single_source_store(4);
        let entries = [
            SourceEntry {
                location: Location::local("gone"),
                requested_count: 10.0,
            },
            SourceEntry {
                location: collection,
                requested_count: 2.0,
            },
        ];
        let mut rng = StdRng::seed_from_u64(3);
        let picked = sample(&store, &entries, &mut rng).unwrap();
        assert_eq!(picked.len(), 2);
    }

    #[test]
    fn seeded_sampling_is_reproducible() {
        let (store, collection) = single_source_store(30);
        let entries = [SourceEntry {
            location: collection,
            requested_count: 12.0,
        }];
        let first = sample(&store, &entries, &mut StdRng::seed_from_u64(99)).unwrap();
        let second = sample(&store, &entries, &mut StdRng::seed_from_u64(99)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn wanted_count_floor_and_fraction_bounds() {
        let mut rng = StdRng::seed_from_u64(5);
        assert_eq!(wanted_count(0.0, &mut rng), 0);
        assert_eq!(wanted_count(-3.0, &mut rng), 0);
        assert_eq!(wanted_count(7.0, &mut rng), 7);
        for _ in 0..200 {
            let wanted = wanted_count(10.4, &mut rng);
            assert!(wanted == 10 || wanted == 11);
            let wanted = wanted_count(0.5, &mut rng);
            assert!(wanted <= 1);
        }
    }

    #[test]
    fn overlapping_entries_never_duplicate_an_item() {
        let mut store = InMemoryPhotoStore::new();
        let root = store.add_container("Catalog", Location::local_root());
        let shared = items("img", 8);
        let first = store.add_collection(
            root.clone(),
            "First",
            CollectionKind::Ordinary,
            shared.clone(),
        );
        let second = store.add_collection(root, "Second", CollectionKind::Ordinary, shared);
        let entries = [
            SourceEntry {
                location: first,
                requested_count: 8.0,
            },
            SourceEntry {
                location: second,
                requested_count: 8.0,
            },
        ];
        let mut rng = StdRng::seed_from_u64(17);
        let picked = sample(&store, &entries, &mut rng).unwrap();
        assert_eq!(picked.len(), 8);
        let unique: HashSet<_> = picked.iter().collect();
        assert_eq!(unique.len(), 8);
    }
}
