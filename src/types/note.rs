use serde::{Deserialize, Serialize};

/// A positioned text annotation inside a notebook.
///
/// Positions are stored as percentages of the overlay's rendered size so
/// notes keep their relative placement across viewport sizes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StickyNote {
    pub id: String,
    pub x_percent: f64,
    pub y_percent: f64,
    pub content: String,
}

/// Body of `PATCH /notes/:id`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NotePositionUpdate {
    pub x_percent: f64,
    pub y_percent: f64,
}

/// On-screen placement of a note for one render pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RenderedNote {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub content: String,
}
