use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::channel::mpsc;

use crate::error::SyncError;
use crate::models::{Content, Metadata, Project, ProjectDraft};
use crate::realtime::{ChangeEvent, FeedMessage};
use crate::sync::ContentRemote;

/// In-memory Content Store for tests and offline previews.
///
/// Behaves like the database-backed store: singleton rows must exist before they can be
/// updated, projects list newest first, and every committed change is published to all
/// open feeds.
#[derive(Clone, Debug, Default)]
pub struct MemoryRemote {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    content: Option<Content>,
    metadata: Option<Metadata>,
    /// `(insertion sequence, row)`.
    projects: Vec<(u64, Project)>,
    next_seq: u64,
    next_id: i64,
    feeds: Vec<mpsc::UnboundedSender<FeedMessage>>,
    offline: bool,
    fail_writes: bool,
}

impl Inner {
    fn read(&self) -> Result<(), SyncError> {
        if self.offline {
            return Err(SyncError::StoreRead("store unreachable".to_string()));
        }
        Ok(())
    }

    fn write(&self) -> Result<(), SyncError> {
        if self.offline || self.fail_writes {
            return Err(SyncError::StoreWrite("write rejected".to_string()));
        }
        Ok(())
    }

    fn push_project(&mut self, project: Project) {
        self.next_seq += 1;
        self.next_id = self.next_id.max(project.id);
        self.projects.push((self.next_seq, project));
    }

    fn publish(&mut self, event: ChangeEvent) {
        self.feeds
            .retain(|feed| feed.unbounded_send(FeedMessage::Change(event.clone())).is_ok());
    }
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding both singleton rows and two projects.
    pub fn seeded() -> Self {
        let remote = Self::new();
        {
            let mut inner = remote.lock();
            inner.content = Some(Content {
                hero_text: "Engineer building tools for the web.".to_string(),
                ..Content::default()
            });
            inner.metadata = Some(Metadata {
                title: "Jane Doe | Portfolio".to_string(),
                keywords: vec!["rust".to_string(), "web".to_string()],
                ..Metadata::default()
            });
            inner.push_project(Project {
                title: "Compiler".to_string(),
                date: "2023".to_string(),
                ..Project::from_draft(1, ProjectDraft::default())
            });
            inner.push_project(Project {
                title: "Website".to_string(),
                date: "2024".to_string(),
                live_url: "https://example.com".to_string(),
                ..Project::from_draft(2, ProjectDraft::default())
            });
        }
        remote
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Every read and write fails while offline.
    pub fn set_offline(&self, offline: bool) {
        self.lock().offline = offline;
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    pub fn content(&self) -> Option<Content> {
        self.lock().content.clone()
    }

    pub fn metadata(&self) -> Option<Metadata> {
        self.lock().metadata.clone()
    }

    pub fn project(&self, id: i64) -> Option<Project> {
        self.lock()
            .projects
            .iter()
            .find(|(_, p)| p.id == id)
            .map(|(_, p)| p.clone())
    }

    /// Store a row as-is without publishing a change.
    pub fn put_project(&self, project: Project) {
        self.lock().push_project(project);
    }

    /// Open a change feed. The first message is always [`FeedMessage::Ready`].
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<FeedMessage> {
        let (tx, rx) = mpsc::unbounded();
        // The receiver is still alive here, so the send cannot fail.
        let _ = tx.unbounded_send(FeedMessage::Ready);
        self.lock().feeds.push(tx);
        rx
    }

    /// End every open feed.
    pub fn close_feeds(&self) {
        self.lock().feeds.clear();
    }
}

impl ContentRemote for MemoryRemote {
    async fn fetch_content(&self) -> Result<Content, SyncError> {
        let inner = self.lock();
        inner.read()?;
        inner
            .content
            .clone()
            .ok_or_else(|| SyncError::NotFound("content".to_string()))
    }

    async fn update_content(&self, content: Content) -> Result<(), SyncError> {
        let mut inner = self.lock();
        inner.write()?;
        let row = inner
            .content
            .as_mut()
            .ok_or_else(|| SyncError::NotFound("content".to_string()))?;
        *row = content.clone();
        inner.publish(ChangeEvent::ContentUpdated { content });
        Ok(())
    }

    async fn fetch_metadata(&self) -> Result<Metadata, SyncError> {
        let inner = self.lock();
        inner.read()?;
        inner
            .metadata
            .clone()
            .ok_or_else(|| SyncError::NotFound("metadata".to_string()))
    }

    async fn update_metadata(&self, metadata: Metadata) -> Result<(), SyncError> {
        let mut inner = self.lock();
        inner.write()?;
        let row = inner
            .metadata
            .as_mut()
            .ok_or_else(|| SyncError::NotFound("metadata".to_string()))?;
        *row = metadata.clone();
        inner.publish(ChangeEvent::MetadataUpdated { metadata });
        Ok(())
    }

    async fn list_projects(&self) -> Result<Vec<Project>, SyncError> {
        let inner = self.lock();
        inner.read()?;
        let mut rows: Vec<&(u64, Project)> = inner.projects.iter().collect();
        rows.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(rows.into_iter().map(|(_, p)| p.clone()).collect())
    }

    async fn insert_project(&self, draft: ProjectDraft) -> Result<Project, SyncError> {
        let mut inner = self.lock();
        inner.write()?;
        let project = Project::from_draft(inner.next_id + 1, draft);
        inner.push_project(project.clone());
        inner.publish(ChangeEvent::ProjectInserted {
            project: project.clone(),
        });
        Ok(project)
    }

    async fn update_project(&self, project: Project) -> Result<(), SyncError> {
        let mut inner = self.lock();
        inner.write()?;
        let (_, row) = inner
            .projects
            .iter_mut()
            .find(|(_, p)| p.id == project.id)
            .ok_or_else(|| SyncError::NotFound(format!("project {}", project.id)))?;
        *row = project.clone();
        inner.publish(ChangeEvent::ProjectUpdated { project });
        Ok(())
    }

    async fn delete_project(&self, id: i64) -> Result<(), SyncError> {
        let mut inner = self.lock();
        inner.write()?;
        let before = inner.projects.len();
        inner.projects.retain(|(_, p)| p.id != id);
        if inner.projects.len() != before {
            inner.publish(ChangeEvent::ProjectDeleted { id });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[tokio::test]
    async fn test_singletons_must_exist() {
        let remote = MemoryRemote::new();
        assert!(matches!(
            remote.fetch_content().await,
            Err(SyncError::NotFound(_))
        ));
        assert!(matches!(
            remote.update_metadata(Metadata::default()).await,
            Err(SyncError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_insert_assigns_increasing_ids() {
        let remote = MemoryRemote::seeded();
        let first = remote.insert_project(ProjectDraft::default()).await.unwrap();
        let second = remote.insert_project(ProjectDraft::default()).await.unwrap();

        assert_eq!(first.id, 3);
        assert_eq!(second.id, 4);

        let ids: Vec<i64> = remote
            .list_projects()
            .await
            .unwrap()
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![4, 3, 2, 1]);
    }

    #[tokio::test]
    async fn test_delete_missing_row_is_not_an_error() {
        let remote = MemoryRemote::seeded();
        remote.delete_project(42).await.unwrap();
        assert_eq!(remote.list_projects().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_feed_starts_with_ready_then_changes() {
        let remote = MemoryRemote::seeded();
        let mut feed = remote.subscribe();

        remote.delete_project(1).await.unwrap();
        remote.close_feeds();

        assert_eq!(feed.next().await, Some(FeedMessage::Ready));
        assert_eq!(
            feed.next().await,
            Some(FeedMessage::Change(ChangeEvent::ProjectDeleted { id: 1 }))
        );
        assert_eq!(feed.next().await, None);
    }

    #[tokio::test]
    async fn test_failed_write_publishes_nothing() {
        let remote = MemoryRemote::seeded();
        let mut feed = remote.subscribe();
        remote.set_fail_writes(true);

        assert!(remote.delete_project(1).await.is_err());
        assert!(remote.fetch_content().await.is_ok());
        remote.close_feeds();

        assert_eq!(feed.next().await, Some(FeedMessage::Ready));
        assert_eq!(feed.next().await, None);
        assert!(remote.project(1).is_some());
    }
}
