//! Browser side of the realtime change feed.
//!
//! [`LiveFeed::open`] connects an `EventSource` to the SSE endpoint and turns its
//! `ready` and `change` frames into [`FeedMessage`]s. Closing happens on drop, so the
//! view that owns the feed releases it when it unmounts. Outside the browser the feed
//! opens with no source and its stream ends immediately.

use dioxus::prelude::*;
use futures::channel::mpsc::{self, UnboundedReceiver};
use store::{FeedMessage, Link, LoadMode, SyncError};

use crate::cell::use_site_client;

pub struct LiveFeed {
    #[cfg(target_arch = "wasm32")]
    source: web_sys::EventSource,
    #[cfg(target_arch = "wasm32")]
    _listeners: Vec<wasm_bindgen::closure::Closure<dyn FnMut(web_sys::MessageEvent)>>,
}

impl LiveFeed {
    #[cfg(target_arch = "wasm32")]
    pub fn open() -> Result<(Self, UnboundedReceiver<FeedMessage>), SyncError> {
        use store::realtime::{CHANGE_EVENT, FEED_PATH, READY_EVENT};
        use store::schema::parse_change_frame;
        use wasm_bindgen::closure::Closure;
        use wasm_bindgen::JsCast;

        let feed_error = |err: wasm_bindgen::JsValue| SyncError::Feed(format!("{err:?}"));

        let source = web_sys::EventSource::new(FEED_PATH).map_err(feed_error)?;
        let (tx, rx) = mpsc::unbounded();

        let ready_tx = tx.clone();
        let on_ready = Closure::<dyn FnMut(web_sys::MessageEvent)>::new(move |_| {
            let _ = ready_tx.unbounded_send(FeedMessage::Ready);
        });

        let on_change =
            Closure::<dyn FnMut(web_sys::MessageEvent)>::new(move |event: web_sys::MessageEvent| {
                let Some(data) = event.data().as_string() else {
                    return;
                };
                match parse_change_frame(&data) {
                    Ok(change) => {
                        let _ = tx.unbounded_send(FeedMessage::Change(change));
                    }
                    Err(err) => tracing::warn!(error = %err, "ignoring malformed change frame"),
                }
            });

        source
            .add_event_listener_with_callback(READY_EVENT, on_ready.as_ref().unchecked_ref())
            .map_err(feed_error)?;
        source
            .add_event_listener_with_callback(CHANGE_EVENT, on_change.as_ref().unchecked_ref())
            .map_err(feed_error)?;

        Ok((
            Self {
                source,
                _listeners: vec![on_ready, on_change],
            },
            rx,
        ))
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn open() -> Result<(Self, UnboundedReceiver<FeedMessage>), SyncError> {
        let (_, rx) = mpsc::unbounded();
        Ok((Self {}, rx))
    }
}

impl Drop for LiveFeed {
    fn drop(&mut self) {
        #[cfg(target_arch = "wasm32")]
        self.source.close();
    }
}

/// Load the site state with `mode` and keep it current while the calling component is
/// mounted.
///
/// The feed is opened before the initial fetch so nothing committed in between is
/// missed once the handshake completes. Unmounting tears the link down; frames that
/// arrive afterwards are dropped.
pub fn use_site_sync(mode: LoadMode) -> Link {
    let client = use_site_client();
    let link = use_hook(Link::new);

    use_future({
        let link = link.clone();
        move || {
            let link = link.clone();
            async move {
                match LiveFeed::open() {
                    Ok((feed, messages)) => {
                        futures::join!(client.load_as(mode), client.follow(messages, &link));
                        drop(feed);
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "live updates unavailable");
                        client.load_as(mode).await;
                    }
                }
            }
        }
    });

    use_drop({
        let link = link.clone();
        move || link.teardown()
    });

    link
}
