//! # Realtime change notifications
//!
//! The Content Store publishes a [`ChangeEvent`] for every committed row change. A
//! subscriber receives them as [`FeedMessage`]s: first a single [`FeedMessage::Ready`]
//! once the stream handshake has completed, then one [`FeedMessage::Change`] per event.
//!
//! [`Link`] tracks the state of one subscription:
//!
//! ```text
//! Detached --subscribe--> Subscribing --handshake--> Active --teardown--> Detached
//! ```
//!
//! Only an `Active` link admits events. Events arriving before the handshake are not
//! buffered (the initial fetch covers that window) and events arriving after teardown are
//! dropped, so a callback that outlives its view never touches state.

use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use crate::models::{Content, Metadata, Project};

/// Path of the Server-Sent Events change feed.
pub const FEED_PATH: &str = "/api/realtime";
/// SSE event name of the handshake frame.
pub const READY_EVENT: &str = "ready";
/// SSE event name of a change frame; the data is a JSON [`ChangeEvent`].
pub const CHANGE_EVENT: &str = "change";

/// Tables that publish change notifications.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    Content,
    Metadata,
    Projects,
}

impl Table {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Content => "content",
            Self::Metadata => "metadata",
            Self::Projects => "projects",
        }
    }
}

/// A validated row change.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChangeEvent {
    ProjectInserted { project: Project },
    ProjectUpdated { project: Project },
    ProjectDeleted { id: i64 },
    ContentUpdated { content: Content },
    MetadataUpdated { metadata: Metadata },
}

impl ChangeEvent {
    pub fn table(&self) -> Table {
        match self {
            Self::ProjectInserted { .. }
            | Self::ProjectUpdated { .. }
            | Self::ProjectDeleted { .. } => Table::Projects,
            Self::ContentUpdated { .. } => Table::Content,
            Self::MetadataUpdated { .. } => Table::Metadata,
        }
    }
}

/// One item of a change stream.
#[derive(Clone, Debug, PartialEq)]
pub enum FeedMessage {
    Ready,
    Change(ChangeEvent),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LinkState {
    #[default]
    Detached,
    Subscribing,
    Active,
}

/// Shared handle on the state of one subscription.
///
/// Clones observe the same state, so the view that owns the subscription can tear it
/// down while the task pumping the stream still holds its own clone.
#[derive(Clone, Debug, Default)]
pub struct Link {
    state: Arc<Mutex<LinkState>>,
}

impl Link {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> LinkState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// `Detached -> Subscribing`. Returns `false` if the link was not detached.
    pub fn subscribe(&self) -> bool {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if *state == LinkState::Detached {
            *state = LinkState::Subscribing;
            true
        } else {
            false
        }
    }

    /// `Subscribing -> Active`; no effect in any other state.
    pub fn handshake(&self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if *state == LinkState::Subscribing {
            *state = LinkState::Active;
        }
    }

    pub fn is_active(&self) -> bool {
        self.state() == LinkState::Active
    }

    /// Back to `Detached` from any state. Safe to call repeatedly or after the
    /// underlying stream has already closed.
    pub fn teardown(&self) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = LinkState::Detached;
    }
}
