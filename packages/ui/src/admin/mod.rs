//! Admin dashboard, served under the guarded `/admin` path.

mod content_tab;
mod image_picker;
mod projects_tab;
mod seo_tab;

pub use content_tab::ContentTab;
pub use image_picker::{ImagePicker, ImageTarget};
pub use projects_tab::{ProjectEditor, ProjectsTab};
pub use seo_tab::SeoTab;

use dioxus::prelude::*;
use store::{LoadMode, NoticeLevel};

use crate::activity_log::{log_notice, use_activity_log};
use crate::activity_log_panel::ActivityLogPanel;
use crate::auth::LogoutButton;
use crate::cell::{use_site, use_site_client};
use crate::live::use_site_sync;
use crate::modal::Modal;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Tab {
    Introduction,
    Seo,
    Projects,
}

impl Tab {
    const ALL: [Tab; 3] = [Tab::Introduction, Tab::Seo, Tab::Projects];

    fn label(self) -> &'static str {
        match self {
            Tab::Introduction => "Introduction",
            Tab::Seo => "SEO",
            Tab::Projects => "Projects",
        }
    }
}

#[component]
pub fn AdminDashboard() -> Element {
    use_site_sync(LoadMode::Raw);
    let mut tab = use_signal(|| Tab::Introduction);

    rsx! {
        document::Title { "Admin" }
        document::Meta { name: "robots", content: "noindex, nofollow" }

        div {
            class: "admin",
            header {
                class: "admin-header",
                h1 { "Site admin" }
                LogoutButton { class: "btn" }
            }

            nav {
                class: "admin-tabs",
                for candidate in Tab::ALL {
                    button {
                        key: "{candidate.label()}",
                        class: if tab() == candidate { "admin-tab active" } else { "admin-tab" },
                        onclick: move |_| tab.set(candidate),
                        "{candidate.label()}"
                    }
                }
            }

            section {
                class: "admin-panel",
                match tab() {
                    Tab::Introduction => rsx! { ContentTab {} },
                    Tab::Seo => rsx! { SeoTab {} },
                    Tab::Projects => rsx! { ProjectsTab {} },
                }
            }
        }

        NoticeBanner {}
        ActivityLogPanel {}
    }
}

/// Blocking notice the operator has to acknowledge. Every notice is also kept in the
/// activity log.
#[component]
pub fn NoticeBanner() -> Element {
    let site = use_site();
    let client = use_site_client();
    let mut log = use_activity_log();
    let notice = use_memo(move || site.read().notice.clone());

    use_effect(move || {
        if let Some(notice) = notice() {
            log_notice(&mut log, &notice);
        }
    });

    let Some(current) = notice() else {
        return rsx! {};
    };
    let title = match current.level {
        NoticeLevel::Info => "Done",
        NoticeLevel::Error => "Something went wrong",
    };

    rsx! {
        Modal {
            title: title,
            on_close: move |_| client.dismiss_notice(),
            p {
                class: if current.level == NoticeLevel::Error { "notice notice-error" } else { "notice" },
                role: "alert",
                "{current.message}"
            }
            div {
                class: "modal-actions",
                button {
                    class: "btn btn-primary",
                    onclick: move |_| client.dismiss_notice(),
                    "OK"
                }
            }
        }
    }
}
