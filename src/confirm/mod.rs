//! # Confirmation Workflow
//!
//! A single modal prompt, modelled as a state machine:
//!
//! ```text
//! Closed ──request──▶ Open(Pending) ──confirm (sync action)──▶ Closed
//!                         │  ▲
//!          confirm (async)│  │resolve
//!                         ▼  │
//!                     Open(Loading)
//! ```
//!
//! What happens on confirm is a tagged [`PendingAction`] that the caller
//! interprets. An async action parks the prompt in `Loading` until the caller
//! reports back with [`Confirmation::resolve`], which swaps in a follow-up
//! notice.

use std::fmt;
use thiserror::Error;
use tracing::debug;

use crate::model::RestaurantId;

pub const CANCEL_LABEL: &str = "Cancel";
pub const LOADING_LABEL: &str = "Loading...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    Success,
    Delete,
    Warning,
}

impl DialogKind {
    pub fn confirm_label(self) -> &'static str {
        match self {
            DialogKind::Success => "OK",
            DialogKind::Delete => "Delete",
            DialogKind::Warning => "Continue",
        }
    }
}

/// What confirming the open prompt should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    /// Close the prompt; nothing else.
    Acknowledge,
    /// Close the prompt and the add/edit form behind it.
    CloseForm,
    DeleteRestaurant { id: RestaurantId, name: String },
}

impl PendingAction {
    /// Async actions keep the prompt open in `Loading` until resolved.
    pub fn is_async(&self) -> bool {
        matches!(self, PendingAction::DeleteRestaurant { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialog {
    pub kind: DialogKind,
    pub title: String,
    pub description: String,
    pub action: PendingAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Pending,
    Loading,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfirmError {
    #[error("Confirmation is in progress")]
    Busy,
    #[error("No confirmation is open")]
    NotOpen,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Confirmation {
    #[default]
    Closed,
    Open { dialog: Dialog, phase: Phase },
}

impl Confirmation {
    /// Opens a prompt, replacing any prompt already shown.
    pub fn request(
        &mut self,
        kind: DialogKind,
        title: impl Into<String>,
        description: impl Into<String>,
        action: PendingAction,
    ) {
        let dialog = Dialog {
            kind,
            title: title.into(),
            description: description.into(),
            action,
        };
        debug!(?kind, title = %dialog.title, "Confirmation opened");
        *self = Confirmation::Open {
            dialog,
            phase: Phase::Pending,
        };
    }

    /// Takes the pending action. Sync actions close the prompt; async ones
    /// move it to `Loading`.
    pub fn confirm(&mut self) -> Result<PendingAction, ConfirmError> {
        match self {
            Confirmation::Closed => Err(ConfirmError::NotOpen),
            Confirmation::Open {
                phase: Phase::Loading,
                ..
            } => Err(ConfirmError::Busy),
            Confirmation::Open { dialog, phase } => {
                let action = dialog.action.clone();
                debug!(?action, "Confirmed");
                if action.is_async() {
                    *phase = Phase::Loading;
                } else {
                    *self = Confirmation::Closed;
                }
                Ok(action)
            }
        }
    }

    /// Replaces a loading prompt with an acknowledge-only notice.
    pub fn resolve(
        &mut self,
        kind: DialogKind,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<(), ConfirmError> {
        match self {
            Confirmation::Closed => Err(ConfirmError::NotOpen),
            Confirmation::Open { .. } => {
                self.request(kind, title, description, PendingAction::Acknowledge);
                Ok(())
            }
        }
    }

    /// The Cancel button.
    pub fn cancel(&mut self) -> Result<(), ConfirmError> {
        match self {
            Confirmation::Closed => Err(ConfirmError::NotOpen),
            Confirmation::Open {
                phase: Phase::Loading,
                ..
            } => Err(ConfirmError::Busy),
            Confirmation::Open { .. } => {
                debug!("Confirmation cancelled");
                *self = Confirmation::Closed;
                Ok(())
            }
        }
    }

    /// Closing from outside the buttons; a no-op when nothing is open.
    pub fn dismiss(&mut self) -> Result<(), ConfirmError> {
        match self {
            Confirmation::Closed => Ok(()),
            _ => self.cancel(),
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Confirmation::Open { .. })
    }

    pub fn is_loading(&self) -> bool {
        matches!(
            self,
            Confirmation::Open {
                phase: Phase::Loading,
                ..
            }
        )
    }

    pub fn dialog(&self) -> Option<&Dialog> {
        match self {
            Confirmation::Closed => None,
            Confirmation::Open { dialog, .. } => Some(dialog),
        }
    }

    /// Label on the confirm button, or `None` when closed.
    pub fn confirm_label(&self) -> Option<&'static str> {
        match self {
            Confirmation::Closed => None,
            Confirmation::Open {
                phase: Phase::Loading,
                ..
            } => Some(LOADING_LABEL),
            Confirmation::Open { dialog, .. } => Some(dialog.kind.confirm_label()),
        }
    }
}

impl fmt::Display for Confirmation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Confirmation::Open { dialog, .. } = self else {
            return Ok(());
        };
        writeln!(f, "{}", dialog.title)?;
        writeln!(f, "{}", dialog.description)?;
        writeln!(
            f,
            "[{CANCEL_LABEL}] [{}]",
            self.confirm_label().unwrap_or_default()
        )
    }
}
