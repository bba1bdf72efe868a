//! Unit tests for the sticky note store.

use std::sync::Arc;

use notes_app::managers::note_store::{NoteStore, NoteStoreTrait};
use notes_app::services::memory_backend::MemoryBackend;
use notes_app::types::config::SpawnBounds;
use notes_app::types::errors::{ApiError, NoteError};
use notes_app::types::geometry::{ContainerSize, PixelPosition};
use notes_app::types::note::StickyNote;
use notes_app::types::notebook::Notebook;
use notes_app::types::sync::{EntityKind, MutationAction};

fn note(id: &str, x: f64, y: f64, content: &str) -> StickyNote {
    StickyNote {
        id: id.to_string(),
        x_percent: x,
        y_percent: y,
        content: content.to_string(),
    }
}

/// Backend holding notebook `nb-1` for `user-1` with `notes`, and a store seeded with the same notes.
fn setup(notes: Vec<StickyNote>) -> (Arc<MemoryBackend>, NoteStore) {
    let backend = Arc::new(MemoryBackend::new());
    let mut notebook = Notebook::new("nb-1", "Ideas");
    notebook.notes = notes.clone();
    backend.seed_notebook("user-1", notebook);
    let store = NoteStore::new(backend.clone(), "nb-1", "user-1", notes, SpawnBounds::default());
    (backend, store)
}

// ─── Add ───

#[tokio::test]
async fn test_add_note_appends_and_posts() {
    let (backend, mut store) = setup(vec![]);
    let id = store.add_note("  buy milk  ").await.expect("note should be added");

    assert_eq!(store.note_count(), 1);
    let added = store.get_note(&id).unwrap();
    assert_eq!(added.content, "  buy milk  ");
    assert!(SpawnBounds::default().contains(added.x_percent, added.y_percent));
    assert_eq!(backend.notes_for("nb-1").len(), 1);
    assert!(backend.calls().contains(&"POST /notes/nb-1".to_string()));
}

#[tokio::test]
async fn test_add_blank_note_is_ignored_without_request() {
    let (backend, mut store) = setup(vec![]);
    assert!(store.add_note("   \n\t").await.is_none());
    assert_eq!(store.note_count(), 0);
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn test_add_note_kept_locally_when_backend_fails() {
    let (backend, mut store) = setup(vec![]);
    backend.set_fail_mutations(true);

    let id = store.add_note("offline").await.expect("note should still be added");
    assert_eq!(store.note_count(), 1);
    assert!(backend.notes_for("nb-1").is_empty());

    let failed = store.take_failed_mutations();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].entity, EntityKind::Note);
    assert_eq!(failed[0].id, id);
    assert_eq!(failed[0].action, MutationAction::Create);
    assert!(store.take_failed_mutations().is_empty());
}

// ─── Move / drag ───

#[tokio::test]
async fn test_move_note_clamps_and_syncs() {
    let (backend, mut store) = setup(vec![note("n1", 10.0, 10.0, "a")]);
    store.move_note("n1", 130.0, -5.0).await.unwrap();

    let moved = store.get_note("n1").unwrap();
    assert_eq!((moved.x_percent, moved.y_percent), (100.0, 0.0));
    let remote = &backend.notes_for("nb-1")[0];
    assert_eq!((remote.x_percent, remote.y_percent), (100.0, 0.0));
}

#[tokio::test]
async fn test_move_unknown_note_is_not_found() {
    let (_backend, mut store) = setup(vec![]);
    let err = store.move_note("ghost", 1.0, 1.0).await.unwrap_err();
    assert_eq!(err, NoteError::NotFound("ghost".to_string()));
}

#[tokio::test]
async fn test_drag_stop_converts_pixels_to_percent() {
    let (_backend, mut store) = setup(vec![note("n1", 0.0, 0.0, "a")]);
    store
        .drag_stop("n1", PixelPosition::new(200.0, 150.0), ContainerSize::new(800.0, 600.0))
        .await
        .unwrap();

    let moved = store.get_note("n1").unwrap();
    assert_eq!(moved.x_percent, 25.0);
    assert_eq!(moved.y_percent, 25.0);
}

#[tokio::test]
async fn test_drag_stop_on_unmeasured_container_lands_at_origin() {
    let (backend, mut store) = setup(vec![note("n1", 40.0, 40.0, "a")]);
    store
        .drag_stop("n1", PixelPosition::new(50.0, 30.0), ContainerSize::default())
        .await
        .unwrap();

    let moved = store.get_note("n1").unwrap();
    assert_eq!((moved.x_percent, moved.y_percent), (0.0, 0.0));
    let remote = backend.notes_for("nb-1");
    assert_eq!((remote[0].x_percent, remote[0].y_percent), (0.0, 0.0));
}

#[tokio::test]
async fn test_move_failure_is_recorded_not_rolled_back() {
    let (backend, mut store) = setup(vec![note("n1", 10.0, 10.0, "a")]);
    backend.set_fail_mutations(true);
    store.move_note("n1", 50.0, 60.0).await.unwrap();

    assert_eq!(store.get_note("n1").unwrap().x_percent, 50.0);
    assert_eq!(store.failed_mutations().len(), 1);
    assert_eq!(store.failed_mutations()[0].action, MutationAction::Update);
}

// ─── Delete ───

#[tokio::test]
async fn test_delete_twice_sends_one_request() {
    let (backend, mut store) = setup(vec![note("n1", 1.0, 1.0, "a"), note("n2", 2.0, 2.0, "b")]);
    assert!(store.delete_note("n1").await);
    assert!(!store.delete_note("n1").await);

    assert_eq!(store.notes(), &[note("n2", 2.0, 2.0, "b")]);
    let deletes = backend
        .calls()
        .into_iter()
        .filter(|c| c == "DELETE /notes/n1")
        .count();
    assert_eq!(deletes, 1);
}

// ─── Resize / render ───

#[test]
fn test_resize_clamps_out_of_range_notes() {
    let (_backend, mut store) = setup(vec![note("n1", 120.0, 50.0, "a"), note("n2", 30.0, 40.0, "b")]);
    let moved = store.handle_resize(ContainerSize::new(640.0, 480.0));

    assert_eq!(moved, 1);
    assert_eq!(store.get_note("n1").unwrap().x_percent, 100.0);
    assert_eq!(store.get_note("n2").unwrap().x_percent, 30.0);
}

#[test]
fn test_render_positions_scale_to_container() {
    let (_backend, store) = setup(vec![note("n1", 50.0, 25.0, "a")]);
    let rendered = store.render_positions(ContainerSize::new(1000.0, 400.0));
    assert_eq!(rendered.len(), 1);
    assert_eq!((rendered[0].x, rendered[0].y), (500.0, 100.0));
}

#[test]
fn test_render_with_unmeasured_container_does_not_panic() {
    let (_backend, store) = setup(vec![note("n1", 50.0, 50.0, "a")]);
    let rendered = store.render_positions(ContainerSize::default());
    assert!(rendered[0].x.is_finite());
}

// ─── Load ───

#[tokio::test]
async fn test_load_notes_replaces_and_clamps() {
    let (backend, mut store) = setup(vec![]);
    backend.seed_notebook("user-1", {
        let mut nb = Notebook::new("nb-2", "Other");
        nb.notes = vec![note("x", 1.0, 1.0, "x")];
        nb
    });
    let mut other = NoteStore::new(backend.clone(), "nb-2", "user-1", vec![], SpawnBounds::default());
    assert_eq!(other.load_notes().await.unwrap(), 1);
    assert_eq!(other.notes()[0].id, "x");

    // Out-of-range data from the server is clamped on load.
    let ticket = store.begin_load();
    let loaded = store
        .apply_loaded(ticket, Ok(vec![note("n1", 150.0, -2.0, "a")]))
        .unwrap();
    assert_eq!(loaded, Some(1));
    let n1 = store.get_note("n1").unwrap();
    assert_eq!((n1.x_percent, n1.y_percent), (100.0, 0.0));
}

#[tokio::test]
async fn test_reload_reconciles_failures_once() {
    let (backend, mut store) = setup(vec![note("n1", 10.0, 10.0, "a")]);
    backend.set_fail_mutations(true);
    store.move_note("n1", 70.0, 70.0).await.unwrap();
    assert_eq!(store.unreconciled_count(), 1);

    store.load_notes().await.unwrap();
    assert_eq!(store.unreconciled_count(), 0);
    assert_eq!(store.get_note("n1").unwrap().x_percent, 10.0);

    // The record stays available to the UI after the reload.
    assert_eq!(store.take_failed_mutations().len(), 1);
    store.load_notes().await.unwrap();
    assert_eq!(store.unreconciled_count(), 0);
}

#[tokio::test]
async fn test_load_failure_keeps_local_notes() {
    let (backend, mut store) = setup(vec![note("n1", 1.0, 1.0, "a")]);
    backend.set_fail_reads(true);

    let err = store.load_notes().await.unwrap_err();
    assert!(matches!(err, NoteError::LoadFailed(_)));
    assert_eq!(store.note_count(), 1);
}

#[test]
fn test_stale_fetch_result_is_dropped() {
    let (_backend, mut store) = setup(vec![note("n1", 1.0, 1.0, "local")]);
    let first = store.begin_load();
    let second = store.begin_load();

    let outcome = store.apply_loaded(first, Ok(vec![])).unwrap();
    assert_eq!(outcome, None);
    assert_eq!(store.note_count(), 1);

    let outcome = store
        .apply_loaded(second, Ok(vec![note("n2", 5.0, 5.0, "server")]))
        .unwrap();
    assert_eq!(outcome, Some(1));
    assert_eq!(store.notes()[0].id, "n2");
}

#[test]
fn test_stale_fetch_error_is_dropped_too() {
    let (_backend, mut store) = setup(vec![]);
    let first = store.begin_load();
    let _second = store.begin_load();
    let outcome = store.apply_loaded(first, Err(ApiError::Network("late".to_string())));
    assert_eq!(outcome, Ok(None));
}
