use serde::{Deserialize, Serialize};

use super::note::StickyNote;

/// A named container of sticky notes owned by one user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notebook {
    pub id: String,
    pub name: String,
    /// The list endpoint omits notes, so this defaults to empty.
    #[serde(default)]
    pub notes: Vec<StickyNote>,
}

impl Notebook {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            notes: Vec::new(),
        }
    }
}

/// Progress of the notebook list fetch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", content = "message", rename_all = "snake_case")]
pub enum LoadState {
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

/// An in-progress rename of one notebook.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RenameDraft {
    pub notebook_id: String,
    pub original_name: String,
    pub draft: String,
}
