//! End-to-end walkthrough: build an in-memory catalog, edit a sampling
//! configuration, commit it, and run a second session that reloads the saved
//! state.
//!
//! Run with `RUST_LOG=photopick=debug` to watch the engine's tracing output.

use photopick::{
    CollectionKind, ConfirmOutcome, EditSession, InMemoryPhotoStore, Location, MemoryPrefStore,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut store = InMemoryPhotoStore::new();
    let root = store.add_container("Catalog", Location::local_root());
    let holidays = store.add_collection(
        root.clone(),
        "Holidays",
        CollectionKind::Ordinary,
        (0..120).map(|n| format!("holiday_{n:04}")).collect(),
    );
    let portraits = store.add_collection(
        root.clone(),
        "Portraits",
        CollectionKind::Ordinary,
        (0..60).map(|n| format!("portrait_{n:04}")).collect(),
    );
    store.add_collection(root, "Five Stars", CollectionKind::Smart, Vec::new());

    let mut prefs = MemoryPrefStore::default();
    let mut rng = StdRng::seed_from_u64(2024);

    // First session: start from the defaults, add a second row, and commit.
    let mut session = EditSession::begin(&mut store, &mut prefs)?;
    session.set_row_location(0, holidays)?;
    session.refresh_row_total(0)?;
    session.set_row_count(0, 15.5)?;
    session.add_row()?;
    session.set_row_location(1, portraits)?;
    session.refresh_row_total(1)?;
    session.set_row_count(1, 8.0)?;
    session.set_destination_name("Weekly Picks")?;

    for (idx, row) in session.rows().iter().enumerate() {
        println!(
            "row {idx}: {:?} wants {} of {}",
            row.location(),
            row.requested_count(),
            row.total_display().text(),
        );
    }

    match session.confirm(&mut rng, |_| true)? {
        ConfirmOutcome::Committed {
            destination,
            items_added,
        } => println!("committed {items_added} items into {destination:?}"),
        other => println!("not committed: {other:?}"),
    }

    // Second session: the saved configuration comes back, and confirming the
    // same destination name asks before overwriting.
    let mut session = EditSession::begin(&mut store, &mut prefs)?;
    println!(
        "reloaded {} rows targeting '{}'",
        session.rows().len(),
        session.destination().name,
    );
    let outcome = session.confirm(&mut rng, |name| {
        println!("overwrite existing '{name}'? saying yes");
        true
    })?;
    println!("second commit: {outcome:?}");

    Ok(())
}
