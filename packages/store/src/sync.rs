//! # Content Sync Client
//!
//! [`ContentSyncClient`] ties a [`ContentRemote`] (where the rows live) to a [`StateCell`]
//! (where the view keeps its [`SiteState`]). It owns the ordering rules of every
//! operation, so the UI and the tests exercise the same code:
//!
//! | Operation | Local state | On failure |
//! |-----------|-------------|------------|
//! | [`fetch_content`](ContentSyncClient::fetch_content) / [`fetch_metadata`](ContentSyncClient::fetch_metadata) | merged after the read | current values kept, nothing surfaced |
//! | [`update_content`](ContentSyncClient::update_content) / [`update_metadata`](ContentSyncClient::update_metadata) | applied *before* the write | edit kept, error notice |
//! | [`insert_project`](ContentSyncClient::insert_project) | prepended and opened after the insert returns | error notice |
//! | [`update_project`](ContentSyncClient::update_project) | replaced after the write returns, editor closed | error notice, editor stays open |
//! | [`delete_project`](ContentSyncClient::delete_project) | removed after the write returns | error notice |
//!
//! [`follow`](ContentSyncClient::follow) pumps a change stream into the same cell.
//! The state cell is never borrowed across an `.await`.

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use futures::{Stream, StreamExt};

use crate::error::SyncError;
use crate::models::{Content, Metadata, Project, ProjectDraft};
use crate::realtime::{FeedMessage, Link};
use crate::state::{Action, LoadMode, Notice, SiteState};

/// Async access to the Content Store.
pub trait ContentRemote {
    fn fetch_content(&self) -> impl Future<Output = Result<Content, SyncError>>;
    fn update_content(&self, content: Content) -> impl Future<Output = Result<(), SyncError>>;
    fn fetch_metadata(&self) -> impl Future<Output = Result<Metadata, SyncError>>;
    fn update_metadata(&self, metadata: Metadata)
        -> impl Future<Output = Result<(), SyncError>>;
    /// Newest first by creation time.
    fn list_projects(&self) -> impl Future<Output = Result<Vec<Project>, SyncError>>;
    /// One project, or `None` once it has been deleted.
    fn fetch_project(&self, id: i64) -> impl Future<Output = Result<Option<Project>, SyncError>> {
        async move {
            let projects = self.list_projects().await?;
            Ok(projects.into_iter().find(|p| p.id == id))
        }
    }
    /// The store assigns `id` and the creation timestamp.
    fn insert_project(&self, draft: ProjectDraft)
        -> impl Future<Output = Result<Project, SyncError>>;
    fn update_project(&self, project: Project) -> impl Future<Output = Result<(), SyncError>>;
    fn delete_project(&self, id: i64) -> impl Future<Output = Result<(), SyncError>>;
}

/// Somewhere a view keeps its [`SiteState`].
pub trait StateCell {
    fn read<T>(&self, f: impl FnOnce(&SiteState) -> T) -> T;
    fn dispatch(&self, action: Action);
}

/// Thread-safe [`StateCell`] for native callers and tests.
#[derive(Clone, Debug, Default)]
pub struct SharedState(Arc<Mutex<SiteState>>);

impl SharedState {
    pub fn new(state: SiteState) -> Self {
        Self(Arc::new(Mutex::new(state)))
    }

    pub fn snapshot(&self) -> SiteState {
        self.read(SiteState::clone)
    }
}

impl StateCell for SharedState {
    fn read<T>(&self, f: impl FnOnce(&SiteState) -> T) -> T {
        f(&self.0.lock().unwrap_or_else(PoisonError::into_inner))
    }

    fn dispatch(&self, action: Action) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .apply(action);
    }
}

/// Outcome of a singleton read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fetched {
    /// The stored row was merged into state.
    Row,
    /// The read failed; the values already in state (possibly the built-in defaults) stay.
    KeptCurrent,
}

#[derive(Clone, Copy)]
pub struct ContentSyncClient<R, C> {
    remote: R,
    cell: C,
}

impl<R: ContentRemote, C: StateCell> ContentSyncClient<R, C> {
    pub fn new(remote: R, cell: C) -> Self {
        Self { remote, cell }
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    pub fn cell(&self) -> &C {
        &self.cell
    }

    /// Initial load of all three tables for display. Never fails: whatever cannot be read
    /// keeps its current value.
    pub async fn load(&self) {
        self.load_as(LoadMode::Display).await
    }

    /// Like [`load`](Self::load), with `mode` deciding how the `content` row is applied.
    pub async fn load_as(&self, mode: LoadMode) {
        self.cell.dispatch(Action::Mode(mode));
        let (_, _, projects) = futures::join!(
            self.fetch_content(),
            self.fetch_metadata(),
            self.list_projects()
        );
        if let Err(err) = projects {
            tracing::warn!(error = %err, "project list unavailable, keeping current list");
        }
    }

    pub async fn fetch_content(&self) -> Fetched {
        match self.remote.fetch_content().await {
            Ok(content) => {
                self.cell.dispatch(Action::ContentLoaded(content));
                Fetched::Row
            }
            Err(err) => {
                tracing::warn!(error = %err, "content unavailable, keeping current copy");
                Fetched::KeptCurrent
            }
        }
    }

    pub async fn fetch_metadata(&self) -> Fetched {
        match self.remote.fetch_metadata().await {
            Ok(metadata) => {
                self.cell.dispatch(Action::MetadataLoaded(metadata));
                Fetched::Row
            }
            Err(err) => {
                tracing::warn!(error = %err, "metadata unavailable, keeping current values");
                Fetched::KeptCurrent
            }
        }
    }

    pub async fn list_projects(&self) -> Result<usize, SyncError> {
        let projects = self.remote.list_projects().await?;
        let count = projects.len();
        self.cell.dispatch(Action::ProjectsLoaded(projects));
        Ok(count)
    }

    /// Full replace of the `content` row, applied locally first.
    pub async fn update_content(&self, content: Content) -> Result<(), SyncError> {
        self.cell.dispatch(Action::ContentEdited(content.clone()));

        match self.remote.update_content(content).await {
            Ok(()) => {
                self.cell
                    .dispatch(Action::Notice(Notice::info("Content updated successfully")));
                Ok(())
            }
            Err(err) => {
                tracing::error!(error = %err, "content write failed, keeping the edit");
                self.cell
                    .dispatch(Action::Notice(Notice::error("Failed to update content")));
                Err(err)
            }
        }
    }

    /// Full replace of the `metadata` row, applied locally first.
    pub async fn update_metadata(&self, metadata: Metadata) -> Result<(), SyncError> {
        self.cell.dispatch(Action::MetadataEdited(metadata.clone()));

        match self.remote.update_metadata(metadata).await {
            Ok(()) => {
                self.cell
                    .dispatch(Action::Notice(Notice::info("SEO settings updated successfully")));
                Ok(())
            }
            Err(err) => {
                tracing::error!(error = %err, "metadata write failed, keeping the edit");
                self.cell
                    .dispatch(Action::Notice(Notice::error("Failed to update SEO settings")));
                Err(err)
            }
        }
    }

    /// Insert a project with the default draft and open it for editing.
    pub async fn insert_project(&self) -> Result<Project, SyncError> {
        self.insert_project_with(ProjectDraft::default()).await
    }

    pub async fn insert_project_with(&self, draft: ProjectDraft) -> Result<Project, SyncError> {
        match self.remote.insert_project(draft.normalized()).await {
            Ok(project) => {
                tracing::info!(id = project.id, "project created");
                self.cell.dispatch(Action::ProjectInserted(project.clone()));
                Ok(project)
            }
            Err(err) => {
                tracing::error!(error = %err, "project insert failed");
                self.cell
                    .dispatch(Action::Notice(Notice::error("Failed to add project")));
                Err(err)
            }
        }
    }

    /// Full-record update. Local state changes only once the write has succeeded.
    pub async fn update_project(&self, project: Project) -> Result<Project, SyncError> {
        let project = project.normalized();
        match self.remote.update_project(project.clone()).await {
            Ok(()) => {
                self.cell.dispatch(Action::ProjectSaved(project.clone()));
                Ok(project)
            }
            Err(err) => {
                tracing::error!(id = project.id, error = %err, "project update failed");
                self.cell
                    .dispatch(Action::Notice(Notice::error("Failed to update project")));
                Err(err)
            }
        }
    }

    pub async fn delete_project(&self, id: i64) -> Result<(), SyncError> {
        match self.remote.delete_project(id).await {
            Ok(()) => {
                tracing::info!(id, "project deleted");
                self.cell.dispatch(Action::ProjectRemoved(id));
                Ok(())
            }
            Err(err) => {
                tracing::error!(id, error = %err, "project delete failed");
                self.cell
                    .dispatch(Action::Notice(Notice::error("Failed to delete project")));
                Err(err)
            }
        }
    }

    pub fn select(&self, id: i64) {
        self.cell.dispatch(Action::Select(id));
    }

    pub fn close_editor(&self) {
        self.cell.dispatch(Action::CloseEditor);
    }

    pub fn dismiss_notice(&self) {
        self.cell.dispatch(Action::DismissNotice);
    }

    /// Apply a change stream to the state cell until it ends or `link` is torn down.
    ///
    /// Changes are admitted only after [`FeedMessage::Ready`]; anything earlier is
    /// dropped. The link is left `Detached` on return.
    pub async fn follow<S>(&self, feed: S, link: &Link)
    where
        S: Stream<Item = FeedMessage>,
    {
        if !link.subscribe() {
            tracing::debug!("link already attached, not following a second stream");
            return;
        }

        futures::pin_mut!(feed);
        while let Some(message) = feed.next().await {
            if link.state() == crate::realtime::LinkState::Detached {
                break;
            }
            match message {
                FeedMessage::Ready => link.handshake(),
                FeedMessage::Change(event) if link.is_active() => {
                    self.cell.dispatch(Action::Remote(event));
                }
                FeedMessage::Change(event) => {
                    tracing::debug!(
                        table = event.table().as_str(),
                        "dropping change received before handshake"
                    );
                }
            }
        }
        link.teardown();
    }
}
