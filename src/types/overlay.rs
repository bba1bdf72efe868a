use serde::{Deserialize, Serialize};

/// Lifecycle of the note-editing overlay.
///
/// `Opening` and `Closing` cover the visibility transition; the overlay is
/// only unmounted once `Closing` has run its full animation delay.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OverlayState {
    Closed,
    Opening,
    Open,
    Closing,
}

impl OverlayState {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverlayState::Closed => "closed",
            OverlayState::Opening => "opening",
            OverlayState::Open => "open",
            OverlayState::Closing => "closing",
        }
    }
}

/// What a click outside the overlay's content region ended up doing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutsideClickOutcome {
    ComposerClosed,
    OverlayClosing,
    Ignored,
}
