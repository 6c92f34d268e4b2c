use dioxus::prelude::*;
use store::NoticeLevel;

use crate::activity_log::use_activity_log;

const ACTIVITY_LOG_CSS: Asset = asset!("/assets/styling/activity_log.css");

/// Collapsible list of the notices raised during this admin session, newest first.
#[component]
pub fn ActivityLogPanel() -> Element {
    let mut log = use_activity_log();
    let entries = log().entries.clone();
    let count = entries.len();
    let has_errors = entries.iter().any(|e| e.level == NoticeLevel::Error);

    rsx! {
        document::Stylesheet { href: ACTIVITY_LOG_CSS }

        button {
            class: if has_errors { "activity-log-toggle has-errors" } else { "activity-log-toggle" },
            title: "Activity log",
            onclick: move |_| {
                let visible = log().visible;
                log.write().visible = !visible;
            },
            if count > 0 { "{count}" } else { "Log" }
        }

        if log().visible {
            div {
                class: "activity-log-panel",
                div {
                    class: "activity-log-header",
                    span { "Activity" }
                    div {
                        class: "activity-log-header-actions",
                        button {
                            onclick: move |_| log.write().entries.clear(),
                            "Clear"
                        }
                        button {
                            onclick: move |_| log.write().visible = false,
                            "Close"
                        }
                    }
                }
                div {
                    class: "activity-log-entries",
                    for entry in entries.iter().rev() {
                        div {
                            class: match entry.level {
                                NoticeLevel::Error => "activity-log-entry error",
                                NoticeLevel::Info => "activity-log-entry info",
                            },
                            span { class: "activity-log-time", "{entry.timestamp}" }
                            span { " {entry.message}" }
                        }
                    }
                }
            }
        }
    }
}
