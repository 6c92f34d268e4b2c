//! Glue between the Dioxus signal graph and the store's [`ContentSyncClient`].

use dioxus::prelude::*;
use store::{Action, ContentSyncClient, SiteState, StateCell};

use crate::activity_log::ActivityLog;
use crate::remote::ServerFnRemote;

/// A [`StateCell`] backed by a signal, so every dispatched action re-renders the
/// components that read the state.
#[derive(Clone, Copy, PartialEq)]
pub struct SignalCell(pub Signal<SiteState>);

impl StateCell for SignalCell {
    fn read<T>(&self, f: impl FnOnce(&SiteState) -> T) -> T {
        f(&*self.0.peek())
    }

    fn dispatch(&self, action: Action) {
        let mut signal = self.0;
        signal.write().apply(action);
    }
}

pub type SiteClient = ContentSyncClient<ServerFnRemote, SignalCell>;

/// Current site state. Panics outside a [`SiteProvider`].
pub fn use_site() -> Signal<SiteState> {
    use_context::<Signal<SiteState>>()
}

pub fn use_site_client() -> SiteClient {
    use_context::<SiteClient>()
}

/// Provides the site state, the sync client and the activity log to its children.
#[component]
pub fn SiteProvider(children: Element) -> Element {
    let state = use_context_provider(|| Signal::new(SiteState::new()));
    use_context_provider(|| Signal::new(ActivityLog::default()));
    use_context_provider(|| ContentSyncClient::new(ServerFnRemote, SignalCell(state)));

    rsx! {
        {children}
    }
}
