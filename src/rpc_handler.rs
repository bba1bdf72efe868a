//! RPC method handler for the notes JSON-RPC protocol.
//!
//! Kept apart from the binary so it can be unit-tested. `handle_method`
//! dispatches one call to the controllers held by [`App`].

use serde::Serialize;
use serde_json::{json, Value};

use crate::app::App;
use crate::managers::note_store::NoteStoreTrait;
use crate::managers::notebook_store::NotebookStoreTrait;
use crate::managers::overlay_controller::OverlayControllerTrait;
use crate::managers::session_controller::SessionControllerTrait;
use crate::types::geometry::{ContainerSize, PixelPosition};

fn to_json<T: Serialize>(value: &T) -> Result<Value, String> {
    serde_json::to_value(value).map_err(|e| e.to_string())
}

fn f64_param(params: &Value, key: &str) -> Result<f64, String> {
    params
        .get(key)
        .and_then(|v| v.as_f64())
        .ok_or_else(|| format!("missing {}", key))
}

fn container_param(params: &Value) -> Result<ContainerSize, String> {
    Ok(ContainerSize::new(
        f64_param(params, "width")?,
        f64_param(params, "height")?,
    ))
}

/// Dispatch a JSON-RPC method call to the appropriate handler.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
pub async fn handle_method(app: &mut App, method: &str, params: &Value) -> Result<Value, String> {
    match method {
        "ping" => Ok(json!({"pong": true})),
        "config.get" => to_json(&app.config),

        // ─── Session ───
        "session.restore" => {
            let state = app.startup().await;
            to_json(&state)
        }
        "session.login" => {
            let token = params.get("token").and_then(|v| v.as_str()).ok_or("missing token")?;
            let user = app.login(token).await.map_err(|e| e.to_string())?;
            to_json(&user)
        }
        "session.logout" => {
            app.logout().map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "session.state" => to_json(app.session.state()),

        // ─── Notebook list ───
        "notebooks.load" | "notebooks.retry" => {
            let store = app.notebook_store_mut().map_err(|e| e.to_string())?;
            let result = if method == "notebooks.retry" {
                store.retry().await
            } else {
                store.load_notebooks().await
            };
            let count = result.map_err(|e| e.to_string())?;
            Ok(json!({"count": count}))
        }
        "notebooks.list" => {
            let store = app.notebook_store().map_err(|e| e.to_string())?;
            to_json(&store.notebooks())
        }
        "notebooks.state" => {
            let store = app.notebook_store().map_err(|e| e.to_string())?;
            Ok(json!({
                "load_state": to_json(store.load_state())?,
                "error": store.error(),
                "rename": to_json(&store.rename_draft())?,
                "next_default_name": store.next_default_name(),
            }))
        }

        // ─── Notebook ───
        "notebook.create" => {
            let name = params.get("name").and_then(|v| v.as_str());
            let store = app.notebook_store_mut().map_err(|e| e.to_string())?;
            let notebook = store.create_notebook(name).await.map_err(|e| e.to_string())?;
            to_json(&notebook)
        }
        "notebook.delete" => {
            let id = params.get("id").and_then(|v| v.as_str()).ok_or("missing id")?;
            app.delete_notebook(id).await.map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "notebook.rename_begin" => {
            let id = params.get("id").and_then(|v| v.as_str()).ok_or("missing id")?;
            let store = app.notebook_store_mut().map_err(|e| e.to_string())?;
            store.begin_rename(id).map_err(|e| e.to_string())?;
            to_json(&store.rename_draft())
        }
        "notebook.rename_draft" => {
            let text = params.get("text").and_then(|v| v.as_str()).ok_or("missing text")?;
            let store = app.notebook_store_mut().map_err(|e| e.to_string())?;
            store.set_rename_draft(text).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "notebook.rename_save" => {
            let store = app.notebook_store_mut().map_err(|e| e.to_string())?;
            let notebook = store.save_rename().await.map_err(|e| e.to_string())?;
            to_json(&notebook)
        }
        "notebook.rename_cancel" => {
            let store = app.notebook_store_mut().map_err(|e| e.to_string())?;
            store.cancel_rename().map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }

        // ─── Overlay ───
        "overlay.open" => {
            let id = params.get("id").and_then(|v| v.as_str()).ok_or("missing id")?;
            let notebook = app.open_notebook(id).await.map_err(|e| e.to_string())?;
            Ok(json!({"session": app.overlay.session(), "notebook": to_json(&notebook)?}))
        }
        "overlay.create" => {
            let name = params.get("name").and_then(|v| v.as_str());
            let notebook = app.create_and_open(name).await.map_err(|e| e.to_string())?;
            Ok(json!({"session": app.overlay.session(), "notebook": to_json(&notebook)?}))
        }
        "overlay.animation_complete" => {
            app.overlay.animation_complete().map_err(|e| e.to_string())?;
            Ok(json!({"state": app.overlay.state()}))
        }
        "overlay.close" => {
            let notebook = app.close_overlay().await.map_err(|e| e.to_string())?;
            to_json(&notebook)
        }
        "overlay.outside_click" => {
            let outcome = app.outside_click().await.map_err(|e| e.to_string())?;
            Ok(json!({"outcome": outcome, "state": app.overlay.state()}))
        }
        "overlay.state" => Ok(json!({
            "state": app.overlay.state(),
            "session": app.overlay.session(),
            "composer_open": app.overlay.is_composer_open(),
            "notebook": to_json(&app.overlay.active_notebook())?,
        })),
        "overlay.resize" => {
            let container = container_param(params)?;
            let notes = app.note_store_mut().map_err(|e| e.to_string())?;
            let moved = notes.handle_resize(container);
            Ok(json!({"clamped": moved}))
        }
        "overlay.render" => {
            let container = container_param(params)?;
            let notes = app.note_store_mut().map_err(|e| e.to_string())?;
            to_json(&notes.render_positions(container))
        }

        // ─── Composer ───
        "composer.open" => {
            app.overlay.open_composer().map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "composer.close" => Ok(json!({"closed": app.overlay.close_composer()})),

        // ─── Notes ───
        "note.add" => {
            let content = params.get("content").and_then(|v| v.as_str()).ok_or("missing content")?;
            let notes = app.note_store_mut().map_err(|e| e.to_string())?;
            let id = notes.add_note(content).await;
            let note = id.as_deref().and_then(|id| notes.get_note(id));
            Ok(json!({"id": id, "note": to_json(&note)?}))
        }
        "note.drag" => {
            let id = params.get("id").and_then(|v| v.as_str()).ok_or("missing id")?;
            let position = PixelPosition::new(f64_param(params, "x")?, f64_param(params, "y")?);
            let container = container_param(params)?;
            let notes = app.note_store_mut().map_err(|e| e.to_string())?;
            notes.drag_stop(id, position, container).await.map_err(|e| e.to_string())?;
            to_json(&notes.get_note(id))
        }
        "note.move" => {
            let id = params.get("id").and_then(|v| v.as_str()).ok_or("missing id")?;
            let x = f64_param(params, "x_percent")?;
            let y = f64_param(params, "y_percent")?;
            let notes = app.note_store_mut().map_err(|e| e.to_string())?;
            notes.move_note(id, x, y).await.map_err(|e| e.to_string())?;
            to_json(&notes.get_note(id))
        }
        "note.delete" => {
            let id = params.get("id").and_then(|v| v.as_str()).ok_or("missing id")?;
            let notes = app.note_store_mut().map_err(|e| e.to_string())?;
            Ok(json!({"deleted": notes.delete_note(id).await}))
        }
        "note.list" => {
            let notes = app.note_store_mut().map_err(|e| e.to_string())?;
            to_json(&notes.notes())
        }

        // ─── Sync ───
        "sync.failures" => to_json(&app.take_failed_mutations()),

        _ => Err(format!("unknown method: {}", method)),
    }
}
