use serde::{Deserialize, Serialize};

/// Kind of entity a backend mutation touched.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Note,
    Notebook,
}

/// Mutation that was applied locally but rejected or lost by the backend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MutationAction {
    Create,
    Update,
    Delete,
}

/// Record of a local change the server never acknowledged.
///
/// The next full fetch replaces the local state it refers to with the
/// server's copy; the record itself stays until a caller drains it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FailedMutation {
    pub entity: EntityKind,
    pub id: String,
    pub action: MutationAction,
    pub error: String,
}

/// Ticket handed out when a full fetch starts.
///
/// A result is only applied if its ticket still matches the store's current
/// generation, so a slow fetch cannot overwrite newer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(pub u64);
