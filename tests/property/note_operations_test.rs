//! Property-based tests for sticky note add/delete operations.
//!
//! Blank content never changes the list, non-blank content appends exactly
//! one note inside the spawn window, and deleting removes only the target.

use std::sync::Arc;

use notes_app::managers::note_store::{NoteStore, NoteStoreTrait};
use notes_app::services::memory_backend::MemoryBackend;
use notes_app::types::config::SpawnBounds;
use notes_app::types::note::StickyNote;
use notes_app::types::notebook::Notebook;
use proptest::prelude::*;

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("Failed to build runtime")
        .block_on(future)
}

fn store_with(notes: Vec<StickyNote>, bounds: SpawnBounds) -> NoteStore {
    let backend = Arc::new(MemoryBackend::new());
    let mut notebook = Notebook::new("nb-1", "Props");
    notebook.notes = notes.clone();
    backend.seed_notebook("user-1", notebook);
    NoteStore::new(backend, "nb-1", "user-1", notes, bounds)
}

fn arb_notes() -> impl Strategy<Value = Vec<StickyNote>> {
    prop::collection::vec((0.0f64..=100.0, 0.0f64..=100.0, "[a-z]{1,12}"), 0..8).prop_map(|items| {
        items
            .into_iter()
            .enumerate()
            .map(|(i, (x, y, content))| StickyNote {
                id: format!("note-{}", i),
                x_percent: x,
                y_percent: y,
                content,
            })
            .collect()
    })
}

fn arb_blank() -> impl Strategy<Value = String> {
    "[ \t\n\r]{0,10}"
}

fn arb_bounds() -> impl Strategy<Value = SpawnBounds> {
    prop_oneof![Just(SpawnBounds::default()), Just(SpawnBounds::WIDE)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(40))]

    #[test]
    fn blank_content_never_changes_note_count(notes in arb_notes(), blank in arb_blank()) {
        let mut store = store_with(notes.clone(), SpawnBounds::default());
        let id = block_on(store.add_note(&blank));
        prop_assert!(id.is_none());
        prop_assert_eq!(store.notes(), notes.as_slice());
    }

    #[test]
    fn add_appends_one_note_inside_spawn_bounds(
        notes in arb_notes(),
        content in "[A-Za-z0-9][A-Za-z0-9 ]{0,40}",
        bounds in arb_bounds(),
    ) {
        let mut store = store_with(notes.clone(), bounds);
        let id = block_on(store.add_note(&content)).expect("note should be created");

        prop_assert_eq!(store.note_count(), notes.len() + 1);
        let added = store.notes().last().expect("note list is not empty");
        prop_assert_eq!(&added.id, &id);
        prop_assert_eq!(&added.content, &content);
        prop_assert!(bounds.contains(added.x_percent, added.y_percent));
        prop_assert_eq!(&store.notes()[..notes.len()], notes.as_slice());
    }

    #[test]
    fn delete_removes_exactly_one_note_and_is_idempotent(
        notes in arb_notes().prop_filter("need a note to delete", |n| !n.is_empty()),
        pick in any::<prop::sample::Index>(),
    ) {
        let target = notes[pick.index(notes.len())].id.clone();
        let mut store = store_with(notes.clone(), SpawnBounds::default());

        prop_assert!(block_on(store.delete_note(&target)));
        let expected: Vec<StickyNote> = notes.iter().filter(|n| n.id != target).cloned().collect();
        prop_assert_eq!(store.notes(), expected.as_slice());

        prop_assert!(!block_on(store.delete_note(&target)));
        prop_assert_eq!(store.notes(), expected.as_slice());
    }
}
