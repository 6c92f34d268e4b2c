//! Platform-neutral core of the portfolio site.
//!
//! Everything in here compiles for both the server and the `wasm32` client: the typed
//! rows of the three content tables, the ingress schema boundary, the [`SiteState`]
//! reducer, the realtime link state machine, the [`ContentSyncClient`] and the rules
//! shared by the image pickers and the upload path.

pub mod error;
pub mod images;
pub mod models;
pub mod realtime;
pub mod schema;
pub mod state;
pub mod sync;
pub mod urls;

mod memory;
pub use memory::MemoryRemote;

pub use error::{SchemaError, SyncError, ValidationError};
pub use models::{Content, Metadata, Project, ProjectDraft, SINGLETON_ID};
pub use realtime::{ChangeEvent, FeedMessage, Link, LinkState, Table};
pub use state::{Action, LoadMode, Notice, NoticeLevel, SiteState};
pub use sync::{ContentRemote, ContentSyncClient, Fetched, SharedState, StateCell};
