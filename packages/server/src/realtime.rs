//! # Realtime change feed
//!
//! Postgres triggers publish every committed row change on the `site_changes` channel as
//! `{table, op, id}`. [`spawn_listener`] validates each payload, reads the named row back
//! from the [`ContentRepo`] and publishes the result into a [`ChangeHub`];
//! `GET /api/realtime` streams the hub to browsers as Server-Sent Events:
//!
//! ```text
//! event: ready      (once, after the subscription is registered)
//! event: change     (one per ChangeEvent, JSON data)
//! ```

use std::convert::Infallible;
use std::time::Duration;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::routing::get;
use axum::Router;
use futures::stream::{self, Stream, StreamExt};
use sqlx::postgres::PgListener;
use sqlx::PgPool;
use store::realtime::{CHANGE_EVENT, FEED_PATH, READY_EVENT};
use store::schema::{ChangeEnvelope, RowChange};
use store::{ChangeEvent, ContentRemote, SyncError};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use crate::repo::ContentRepo;

pub const CHANNEL: &str = "site_changes";

const HUB_CAPACITY: usize = 256;
const RECONNECT_DELAY: Duration = Duration::from_secs(2);

/// Fan-out of validated change events to every connected subscriber.
#[derive(Clone, Debug)]
pub struct ChangeHub {
    tx: broadcast::Sender<ChangeEvent>,
}

impl Default for ChangeHub {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeHub {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(HUB_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.tx.subscribe()
    }

    /// Returns the number of subscribers reached.
    pub fn publish(&self, event: ChangeEvent) -> usize {
        self.tx.send(event).unwrap_or(0)
    }

    /// Validate a raw notification payload, read the row it names from `store` and
    /// publish the row. A row that is gone by the time it is read publishes nothing; its
    /// delete notification follows.
    pub async fn relay<R: ContentRemote>(
        &self,
        store: &R,
        payload: &str,
    ) -> Result<usize, SyncError> {
        let change = ChangeEnvelope::parse(payload)?;
        tracing::debug!(table = change.table().as_str(), "change received");

        match resolve(store, change).await? {
            Some(event) => Ok(self.publish(event)),
            None => {
                tracing::debug!(?change, "changed row already deleted");
                Ok(0)
            }
        }
    }
}

/// The event for `change`, carrying the row as currently stored.
pub async fn resolve<R: ContentRemote>(
    store: &R,
    change: RowChange,
) -> Result<Option<ChangeEvent>, SyncError> {
    let event = match change {
        RowChange::ContentUpdated => Some(ChangeEvent::ContentUpdated {
            content: store.fetch_content().await?,
        }),
        RowChange::MetadataUpdated => Some(ChangeEvent::MetadataUpdated {
            metadata: store.fetch_metadata().await?,
        }),
        RowChange::ProjectInserted(id) => store
            .fetch_project(id)
            .await?
            .map(|project| ChangeEvent::ProjectInserted { project }),
        RowChange::ProjectUpdated(id) => store
            .fetch_project(id)
            .await?
            .map(|project| ChangeEvent::ProjectUpdated { project }),
        RowChange::ProjectDeleted(id) => Some(ChangeEvent::ProjectDeleted { id }),
    };
    Ok(event)
}

/// Relay `site_changes` notifications into `hub`, reconnecting on failure.
pub fn spawn_listener(pool: PgPool, hub: ChangeHub) -> JoinHandle<()> {
    let repo = ContentRepo::new(pool.clone());
    tokio::spawn(async move {
        loop {
            if let Err(err) = listen(&pool, &repo, &hub).await {
                tracing::warn!(error = %err, "change listener stopped, reconnecting");
            }
            tokio::time::sleep(RECONNECT_DELAY).await;
        }
    })
}

async fn listen(pool: &PgPool, repo: &ContentRepo, hub: &ChangeHub) -> Result<(), sqlx::Error> {
    let mut listener = PgListener::connect_with(pool).await?;
    listener.listen(CHANNEL).await?;
    tracing::info!(channel = CHANNEL, "listening for content changes");

    loop {
        let notification = listener.recv().await?;
        if let Err(err) = hub.relay(repo, notification.payload()).await {
            tracing::warn!(error = %err, "dropping change notification");
        }
    }
}

/// SSE frames for one subscriber: `ready`, then every change received on `changes`.
///
/// Subscribers that fall behind skip what they missed instead of disconnecting.
pub fn event_stream(
    changes: broadcast::Receiver<ChangeEvent>,
) -> impl Stream<Item = Result<Event, Infallible>> {
    let ready = stream::once(async { Ok(Event::default().event(READY_EVENT).data("ok")) });

    let changes = stream::unfold(changes, |mut changes| async move {
        loop {
            match changes.recv().await {
                Ok(change) => match serde_json::to_string(&change) {
                    Ok(json) => {
                        let frame = Event::default().event(CHANGE_EVENT).data(json);
                        return Some((Ok(frame), changes));
                    }
                    Err(err) => tracing::error!(error = %err, "failed to encode change"),
                },
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "realtime subscriber lagged");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    ready.chain(changes)
}

async fn subscribe(
    State(hub): State<ChangeHub>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    Sse::new(event_stream(hub.subscribe())).keep_alive(KeepAlive::default())
}

pub fn router(hub: ChangeHub) -> Router {
    Router::new()
        .route(FEED_PATH, get(subscribe))
        .with_state(hub)
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::{MemoryRemote, Project, ProjectDraft};

    #[test]
    fn publish_without_subscribers_is_fine() {
        let hub = ChangeHub::new();
        assert_eq!(hub.publish(ChangeEvent::ProjectDeleted { id: 1 }), 0);
    }

    #[tokio::test]
    async fn payloads_are_validated_before_fan_out() {
        let store = MemoryRemote::seeded();
        let hub = ChangeHub::new();
        let mut rx = hub.subscribe();

        assert!(hub.relay(&store, r#"{"table":"users","op":"INSERT"}"#).await.is_err());
        assert!(hub.relay(&store, "{").await.is_err());

        let reached = hub
            .relay(&store, r#"{"table":"projects","op":"DELETE","id":3}"#)
            .await
            .unwrap();
        assert_eq!(reached, 1);
        assert_eq!(rx.recv().await.unwrap(), ChangeEvent::ProjectDeleted { id: 3 });
    }

    #[tokio::test]
    async fn vanished_rows_publish_nothing() {
        let store = MemoryRemote::seeded();
        let hub = ChangeHub::new();
        let _rx = hub.subscribe();

        let reached = hub
            .relay(&store, r#"{"table":"projects","op":"UPDATE","id":99}"#)
            .await
            .unwrap();
        assert_eq!(reached, 0);
    }

    #[tokio::test]
    async fn unreadable_store_is_an_error() {
        let store = MemoryRemote::seeded();
        store.set_offline(true);
        let hub = ChangeHub::new();

        let err = hub
            .relay(&store, r#"{"table":"content","op":"UPDATE","id":1}"#)
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::StoreRead(_)));
    }

    #[tokio::test]
    async fn stream_starts_with_ready_and_ends_with_hub() {
        let hub = ChangeHub::new();
        let stream = event_stream(hub.subscribe());
        hub.publish(ChangeEvent::ProjectInserted {
            project: Project::from_draft(5, ProjectDraft::default()),
        });
        drop(hub);

        let frames: Vec<_> = stream.collect().await;
        assert_eq!(frames.len(), 2);
    }
}
